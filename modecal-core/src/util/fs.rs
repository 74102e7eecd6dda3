use crate::ModecalError;
use csv::{Reader, ReaderBuilder, StringRecord};
use flate2::read::GzDecoder;
use std::{
    collections::HashMap,
    fs::File,
    io::{BufReader, Read},
    path::Path,
};

/// true if the file name ends with a gzip extension
pub fn is_gzip<P: AsRef<Path>>(path: P) -> bool {
    path.as_ref()
        .extension()
        .map(|ext| ext == "gz")
        .unwrap_or(false)
}

/// opens a delimited text file for reading, transparently decompressing
/// gzip files.
pub fn open_csv<P: AsRef<Path>>(
    path: P,
    delimiter: u8,
) -> Result<Reader<Box<dyn Read>>, ModecalError> {
    let path = path.as_ref();
    let f = File::open(path).map_err(|e| ModecalError::ReadError {
        filepath: path.to_string_lossy().to_string(),
        error: e.to_string(),
    })?;
    let r: Box<dyn Read> = if is_gzip(path) {
        Box::new(BufReader::new(GzDecoder::new(f)))
    } else {
        Box::new(BufReader::new(f))
    };
    let reader = ReaderBuilder::new()
        .has_headers(true)
        .delimiter(delimiter)
        .from_reader(r);
    Ok(reader)
}

/// builds a lookup from column name to column index for the reader's header row
pub fn header_lookup<R: Read>(
    reader: &mut Reader<R>,
    filepath: &str,
) -> Result<HashMap<String, usize>, ModecalError> {
    let headers = reader.headers().map_err(|e| ModecalError::ReadError {
        filepath: filepath.to_string(),
        error: format!("failure reading headers: {e}"),
    })?;
    Ok(headers
        .iter()
        .enumerate()
        .map(|(i, s)| (s.to_string(), i))
        .collect())
}

/// finds the index of a required column
pub fn require_column(
    lookup: &HashMap<String, usize>,
    column: &str,
    filepath: &str,
) -> Result<usize, ModecalError> {
    lookup
        .get(column)
        .copied()
        .ok_or_else(|| ModecalError::MissingColumn {
            filepath: filepath.to_string(),
            column: column.to_string(),
        })
}

/// reads a field, treating the missing-value markers `""` and `"na"` as absent.
pub fn get_optional(record: &StringRecord, index: usize) -> Option<&str> {
    match record.get(index).map(str::trim) {
        None | Some("") | Some("na") => None,
        Some(value) => Some(value),
    }
}

/// helper function to "mkdir -p path" - make all directories along a path
pub fn create_dirs<P>(path: P) -> Result<(), ModecalError>
where
    P: AsRef<Path>,
{
    let dirspath = path.as_ref();
    if !dirspath.is_dir() {
        std::fs::create_dir_all(dirspath).map_err(|e| ModecalError::WriteError {
            filepath: dirspath.to_string_lossy().to_string(),
            error: format!("error building directory: {e}"),
        })
    } else {
        Ok(())
    }
}
