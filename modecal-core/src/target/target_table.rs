use super::{Partition, TargetRow};
use crate::mode::Mode;
use crate::trip::MAIN_MODE_COLUMN;
use crate::util::fs;
use crate::ModecalError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const SHARE_COLUMN: &str = "share";

/// reference mode shares. every column of the source file other than
/// `main_mode` and `share` is a group column; a row's non-empty group values
/// form its [`Partition`].
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct TargetTable {
    pub group_columns: Vec<String>,
    pub rows: Vec<TargetRow>,
}

impl TargetTable {
    pub fn new(group_columns: Vec<String>, rows: Vec<TargetRow>) -> TargetTable {
        TargetTable {
            group_columns,
            rows,
        }
    }

    /// reads a comma-delimited target file. `""` and `"na"` group values are
    /// treated as empty; no other missing-value markers are recognized.
    pub fn read_file<P: AsRef<Path>>(path: P) -> Result<TargetTable, ModecalError> {
        let filepath = path.as_ref().to_string_lossy().to_string();
        let mut reader = fs::open_csv(path.as_ref(), b',')?;
        let lookup = fs::header_lookup(&mut reader, &filepath)?;
        let mode_idx = fs::require_column(&lookup, MAIN_MODE_COLUMN, &filepath)?;
        let share_idx = fs::require_column(&lookup, SHARE_COLUMN, &filepath)?;
        let group_columns = lookup
            .iter()
            .filter(|(name, idx)| !name.is_empty() && **idx != mode_idx && **idx != share_idx)
            .sorted_by_key(|(_, idx)| **idx)
            .map(|(name, idx)| (name.clone(), *idx))
            .collect_vec();

        let mut rows = vec![];
        for (row_idx, row) in reader.records().enumerate() {
            let record = row.map_err(|e| ModecalError::ReadError {
                filepath: filepath.clone(),
                error: format!("row {row_idx}: {e}"),
            })?;
            let mut partition = Partition::overall();
            for (name, idx) in group_columns.iter() {
                if let Some(value) = fs::get_optional(&record, *idx) {
                    partition.insert(name, value);
                }
            }
            let main_mode = record.get(mode_idx).unwrap_or_default().trim();
            let share_str = record.get(share_idx).unwrap_or_default().trim();
            let share = share_str
                .parse::<f64>()
                .map_err(|_| ModecalError::InvalidShare {
                    filepath: filepath.clone(),
                    row: row_idx,
                    value: share_str.to_string(),
                })?;
            rows.push(TargetRow::new(partition, main_mode, share));
        }
        log::info!("read {} target rows from {}", rows.len(), filepath);
        Ok(TargetTable {
            group_columns: group_columns.into_iter().map(|(name, _)| name).collect(),
            rows,
        })
    }

    /// writes the table as `<group columns>,main_mode,share`
    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ModecalError> {
        let filepath = path.as_ref().to_string_lossy().to_string();
        let write_err = |e: csv::Error| ModecalError::WriteError {
            filepath: filepath.clone(),
            error: e.to_string(),
        };
        let mut writer = csv::Writer::from_path(path.as_ref()).map_err(write_err)?;
        let header = self
            .group_columns
            .iter()
            .map(String::as_str)
            .chain([MAIN_MODE_COLUMN, SHARE_COLUMN])
            .collect_vec();
        writer.write_record(&header).map_err(write_err)?;
        for row in self.rows.iter() {
            let mut record = self
                .group_columns
                .iter()
                .map(|c| row.partition.get(c).unwrap_or_default().to_string())
                .collect_vec();
            record.push(row.main_mode.clone());
            record.push(row.share.to_string());
            writer.write_record(&record).map_err(write_err)?;
        }
        writer.flush().map_err(|e| ModecalError::WriteError {
            filepath: filepath.clone(),
            error: e.to_string(),
        })
    }

    /// distinct partitions in order of first appearance
    pub fn partitions(&self) -> Vec<Partition> {
        self.rows
            .iter()
            .map(|r| r.partition.clone())
            .unique()
            .collect_vec()
    }

    pub fn rows_for<'a>(&'a self, partition: &'a Partition) -> impl Iterator<Item = &'a TargetRow> {
        self.rows.iter().filter(move |r| &r.partition == partition)
    }

    /// looks up the target share of a mode within a partition
    pub fn share(&self, partition: &Partition, mode: &str) -> Option<f64> {
        self.rows_for(partition)
            .find(|r| r.main_mode == mode)
            .map(|r| r.share)
    }

    /// forces the car share to zero for every row where `column == value` and
    /// rescales the shares of that segment so they sum to one. used for the
    /// car-unavailable population, which the simulator can never assign to car.
    /// a table without rows in the segment is returned unchanged.
    pub fn without_car_in_segment(
        &self,
        column: &str,
        value: &str,
    ) -> Result<TargetTable, ModecalError> {
        let in_segment = |row: &TargetRow| row.partition.get(column) == Some(value);
        if !self.rows.iter().any(|r| in_segment(r)) {
            log::warn!("no target rows with {column}={value}, car share left as is");
            return Ok(self.clone());
        }
        let car = Mode::Car.as_str();
        let total: f64 = self
            .rows
            .iter()
            .filter(|&r| in_segment(r) && r.main_mode != car)
            .map(|r| r.share)
            .sum();
        if total <= 0.0 {
            return Err(ModecalError::EmptySegment(format!("{column}={value}")));
        }
        let rows = self
            .rows
            .iter()
            .map(|row| {
                if !in_segment(row) {
                    row.clone()
                } else if row.main_mode == car {
                    TargetRow::new(row.partition.clone(), &row.main_mode, 0.0)
                } else {
                    TargetRow::new(row.partition.clone(), &row.main_mode, row.share / total)
                }
            })
            .collect_vec();
        Ok(TargetTable::new(self.group_columns.clone(), rows))
    }

    /// row-wise union of two tables. rows are appended, never merged; a group
    /// column present on only one side is empty for the other side's rows.
    pub fn concat(&self, other: &TargetTable) -> TargetTable {
        let group_columns = self
            .group_columns
            .iter()
            .chain(other.group_columns.iter())
            .unique()
            .cloned()
            .collect_vec();
        let rows = self
            .rows
            .iter()
            .chain(other.rows.iter())
            .cloned()
            .collect_vec();
        TargetTable::new(group_columns, rows)
    }
}
