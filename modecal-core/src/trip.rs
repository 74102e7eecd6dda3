use crate::util::fs;
use crate::{Mode, ModecalError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAIN_MODE_COLUMN: &str = "main_mode";

/// one reported (or simulated) trip
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Trip {
    pub person: String,
    pub main_mode: String,
}

impl Trip {
    pub fn new(person: &str, main_mode: &str) -> Trip {
        Trip {
            person: person.to_string(),
            main_mode: main_mode.to_string(),
        }
    }

    /// reads trips from a (possibly gzipped) delimited trips file
    pub fn read_file<P: AsRef<Path>>(path: P, delimiter: u8) -> Result<Vec<Trip>, ModecalError> {
        let filepath = path.as_ref().to_string_lossy().to_string();
        let mut reader = fs::open_csv(path.as_ref(), delimiter)?;
        let lookup = fs::header_lookup(&mut reader, &filepath)?;
        let person_idx = fs::require_column(&lookup, crate::respondent::PERSON_COLUMN, &filepath)?;
        let mode_idx = fs::require_column(&lookup, MAIN_MODE_COLUMN, &filepath)?;
        reader
            .records()
            .enumerate()
            .map(|(row_idx, row)| {
                let record = row.map_err(|e| ModecalError::ReadError {
                    filepath: filepath.clone(),
                    error: format!("row {row_idx}: {e}"),
                })?;
                Ok(Trip {
                    person: record.get(person_idx).unwrap_or_default().to_string(),
                    main_mode: record.get(mode_idx).unwrap_or_default().to_string(),
                })
            })
            .collect()
    }

    /// the calibrated mode of this trip, if it has one
    pub fn mode(&self) -> Option<Mode> {
        Mode::from_label(&self.main_mode)
    }
}

/// relabels `walk_main` trips to `walk` and drops every trip whose mode is
/// outside the calibrated mode set.
pub fn filter_modes(trips: &[Trip]) -> Vec<Trip> {
    trips
        .iter()
        .filter_map(|t| {
            t.mode().map(|mode| Trip {
                person: t.person.clone(),
                main_mode: mode.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_modes() {
        let trips = vec![
            Trip::new("1", "walk_main"),
            Trip::new("1", "car"),
            Trip::new("2", "freight"),
            Trip::new("2", "pt"),
            Trip::new("3", "bike"),
            Trip::new("3", "ride"),
            Trip::new("4", "walk"),
            Trip::new("4", "avtaxi"),
        ];
        let result = filter_modes(&trips);
        let modes: Vec<&str> = result.iter().map(|t| t.main_mode.as_str()).collect();
        assert_eq!(modes, vec!["walk", "car", "pt", "bike", "ride", "walk"]);
        assert!(result.iter().all(|t| t.main_mode != "walk_main"));
        assert_eq!(result[0].person, "1");
    }
}
