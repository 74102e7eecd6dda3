use crate::ResidenceError;
use calamine::{open_workbook_auto, Data, Reader};
use kdam::tqdm;
use modecal_core::respondent::{canonical_integer, RESIDENCE_COLUMN};
use modecal_core::trip::MAIN_MODE_COLUMN;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

/// survey expansion weight column
pub const WEIGHT_COLUMN: &str = "mzmv.1";

/// one weighted survey observation: a respondent's residence zone and main mode
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct SurveyRow {
    pub residence_msr_id: String,
    pub main_mode: String,
    pub weight: f64,
}

impl SurveyRow {
    pub fn new(residence_msr_id: &str, main_mode: &str, weight: f64) -> SurveyRow {
        SurveyRow {
            residence_msr_id: residence_msr_id.to_string(),
            main_mode: main_mode.to_string(),
            weight,
        }
    }

    /// reads survey rows from one sheet of a spreadsheet workbook.
    ///
    /// # Arguments
    ///
    /// * `sheet_index` - zero-based position of the sheet in the workbook
    /// * `header_row` - zero-based row holding the column names; rows above it are ignored
    ///
    /// rows missing a residence id or main mode are skipped, as are rows
    /// without a weight. residence ids are written as integers.
    pub fn read_workbook<P: AsRef<Path>>(
        path: P,
        sheet_index: usize,
        header_row: usize,
    ) -> Result<Vec<SurveyRow>, ResidenceError> {
        let filepath = path.as_ref().to_string_lossy().to_string();
        let workbook_err = |e: calamine::Error| ResidenceError::WorkbookError {
            filepath: filepath.clone(),
            error: e.to_string(),
        };
        let mut workbook = open_workbook_auto(path.as_ref()).map_err(workbook_err)?;
        let sheet_name = workbook
            .sheet_names()
            .get(sheet_index)
            .cloned()
            .ok_or_else(|| ResidenceError::MissingSheet {
                filepath: filepath.clone(),
                index: sheet_index,
            })?;
        let range = workbook.worksheet_range(&sheet_name).map_err(workbook_err)?;

        let mut rows = range.rows().skip(header_row);
        let header: HashMap<String, usize> = rows
            .next()
            .map(|cells| {
                cells
                    .iter()
                    .enumerate()
                    .map(|(i, c)| (c.to_string().trim().to_string(), i))
                    .collect()
            })
            .unwrap_or_default();
        let column = |name: &str| {
            header
                .get(name)
                .copied()
                .ok_or_else(|| ResidenceError::MissingColumn {
                    filepath: filepath.clone(),
                    column: name.to_string(),
                })
        };
        let residence_idx = column(RESIDENCE_COLUMN)?;
        let mode_idx = column(MAIN_MODE_COLUMN)?;
        let weight_idx = column(WEIGHT_COLUMN)?;

        let mut result = vec![];
        let mut skipped = 0;
        let row_iter = tqdm!(rows.enumerate(), desc = format!("read sheet '{sheet_name}'"));
        for (idx, cells) in row_iter {
            let row_number = idx + header_row + 1;
            let residence = cells.get(residence_idx).and_then(cell_text);
            let mode = cells.get(mode_idx).and_then(cell_text);
            let weight = cells.get(weight_idx).map(cell_number).transpose().map_err(|e| {
                ResidenceError::InvalidRow {
                    row: row_number,
                    error: e,
                }
            })?;
            match (residence, mode, weight.flatten()) {
                (Some(residence), Some(mode), Some(weight)) => {
                    let residence_msr_id = canonical_integer(RESIDENCE_COLUMN, &residence)?;
                    result.push(SurveyRow {
                        residence_msr_id,
                        main_mode: mode,
                        weight,
                    });
                }
                _ => skipped += 1,
            }
        }
        eprintln!();
        log::info!(
            "read {} survey rows from sheet '{}' of {}, skipped {} incomplete rows",
            result.len(),
            sheet_name,
            filepath,
            skipped
        );
        Ok(result)
    }
}

/// non-empty text of a cell
fn cell_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty | Data::Error(_) => None,
        other => {
            let s = other.to_string().trim().to_string();
            if s.is_empty() || s == "na" {
                None
            } else {
                Some(s)
            }
        }
    }
}

/// numeric value of a cell, `None` when the cell is empty
fn cell_number(cell: &Data) -> Result<Option<f64>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::Float(f) => Ok(Some(*f)),
        Data::Int(i) => Ok(Some(*i as f64)),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => s
            .trim()
            .parse::<f64>()
            .map(Some)
            .map_err(|e| format!("weight '{s}' is not a number: {e}")),
        other => Err(format!("weight cell '{other}' is not a number")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_text() {
        assert_eq!(cell_text(&Data::Empty), None);
        assert_eq!(cell_text(&Data::String(String::from(" car "))), Some(String::from("car")));
        assert_eq!(cell_text(&Data::String(String::from("na"))), None);
        assert_eq!(cell_text(&Data::Float(12.0)), Some(String::from("12")));
    }

    #[test]
    fn test_cell_number() {
        assert_eq!(cell_number(&Data::Float(2.5)), Ok(Some(2.5)));
        assert_eq!(cell_number(&Data::Int(3)), Ok(Some(3.0)));
        assert_eq!(cell_number(&Data::String(String::from("4.5"))), Ok(Some(4.5)));
        assert_eq!(cell_number(&Data::Empty), Ok(None));
        assert!(cell_number(&Data::String(String::from("heavy"))).is_err());
    }

    fn fixture() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("test")
            .join("report_residence_msr.xlsx")
    }

    #[test]
    fn test_read_residence_sheet() {
        let rows = SurveyRow::read_workbook(fixture(), 2, 1).unwrap();
        // seven data rows, two of them without a weight or residence id
        assert_eq!(
            rows,
            vec![
                SurveyRow::new("1", "car", 10.0),
                SurveyRow::new("1", "pt", 10.0),
                SurveyRow::new("7", "car", 5.0),
                SurveyRow::new("7", "walk", 15.0),
                SurveyRow::new("2", "walk", 4.0),
            ]
        );
    }

    #[test]
    fn test_non_numeric_weight() {
        let result = SurveyRow::read_workbook(fixture(), 1, 1);
        assert!(matches!(result, Err(ResidenceError::InvalidRow { row: 2, .. })));
    }

    #[test]
    fn test_header_on_wrong_row() {
        let result = SurveyRow::read_workbook(fixture(), 2, 0);
        assert!(matches!(result, Err(ResidenceError::MissingColumn { .. })));
    }

    #[test]
    fn test_sheet_out_of_range() {
        let result = SurveyRow::read_workbook(fixture(), 3, 1);
        assert!(matches!(result, Err(ResidenceError::MissingSheet { index: 3, .. })));
    }

    #[test]
    fn test_missing_workbook() {
        let result = SurveyRow::read_workbook("does/not/exist.xlsx", 2, 1);
        assert!(matches!(result, Err(ResidenceError::WorkbookError { .. })));
    }
}
