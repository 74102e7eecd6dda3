use super::{CalibrationError, TrialRecord};
use itertools::Itertools;
use modecal_core::TargetTable;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, path::Path};

/// layout of the trial history table
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    /// trial, error, parameters and observed shares
    #[default]
    Simple,
    /// additionally repeats each target share next to its observation
    Detailed,
}

/// writes one row per trial:
/// `trial,mae,param:<name>..,share:<partition>:<mode>..[,target:<partition>:<mode>..]`
pub fn write_report(
    path: &Path,
    history: &[TrialRecord],
    targets: &TargetTable,
    format: ReportFormat,
) -> Result<(), CalibrationError> {
    let filepath = path.to_string_lossy().to_string();
    let write_err = |e: csv::Error| CalibrationError::WriteError {
        filepath: filepath.clone(),
        error: e.to_string(),
    };
    let param_names = history
        .first()
        .map(|r| r.params.entries().into_iter().map(|(n, _)| n).collect_vec())
        .unwrap_or_default();
    let share_keys = targets
        .rows
        .iter()
        .map(|r| format!("{}:{}", r.partition, r.main_mode))
        .collect_vec();

    let mut header = vec![String::from("trial"), String::from("mae")];
    header.extend(param_names.iter().map(|n| format!("param:{n}")));
    header.extend(share_keys.iter().map(|k| format!("share:{k}")));
    if format == ReportFormat::Detailed {
        header.extend(share_keys.iter().map(|k| format!("target:{k}")));
    }

    let mut writer = csv::Writer::from_path(path).map_err(write_err)?;
    writer.write_record(&header).map_err(write_err)?;
    for record in history.iter() {
        let params: HashMap<String, f64> = record.params.entries().into_iter().collect();
        let mut row = vec![
            record.trial_number.to_string(),
            record.mean_absolute_error.to_string(),
        ];
        row.extend(
            param_names
                .iter()
                .map(|n| params.get(n).map(|v| v.to_string()).unwrap_or_default()),
        );
        row.extend(targets.rows.iter().map(|t| {
            record
                .observed
                .get(&t.partition, &t.main_mode)
                .map(|v| v.to_string())
                .unwrap_or_default()
        }));
        if format == ReportFormat::Detailed {
            row.extend(targets.rows.iter().map(|t| t.share.to_string()));
        }
        writer.write_record(&row).map_err(write_err)?;
    }
    writer.flush().map_err(|e| CalibrationError::WriteError {
        filepath: filepath.clone(),
        error: e.to_string(),
    })?;
    log::info!("wrote {} trials to {}", history.len(), filepath);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calibration::AscParameters;
    use modecal_core::{Mode, ObservedShares, Partition, TargetRow};
    use std::collections::BTreeMap;

    #[test]
    fn test_detailed_report() {
        let zone = Partition::new(&[("residence_msr_id", "1,2")]);
        let targets = TargetTable::new(
            vec![String::from("residence_msr_id")],
            vec![
                TargetRow::new(Partition::overall(), "car", 0.4),
                TargetRow::new(zone.clone(), "car", 0.3),
            ],
        );
        let mut observed = ObservedShares::default();
        observed.insert(Partition::overall(), "car", 0.5);
        observed.insert(zone, "car", 0.25);
        let history = vec![TrialRecord {
            trial_number: 0,
            params: AscParameters {
                modes: BTreeMap::from([(Mode::Walk, 0.0), (Mode::Car, -0.15)]),
                groups: vec![],
            },
            observed,
            mean_absolute_error: 0.075,
        }];
        let path = std::env::temp_dir().join(format!("modecal-report-{}.csv", std::process::id()));
        write_report(&path, &history, &targets, ReportFormat::Detailed).unwrap();
        let contents = std::fs::read_to_string(&path).unwrap();
        let lines = contents.lines().collect_vec();
        assert_eq!(
            lines[0],
            r#"trial,mae,param:walk,param:car,share:overall:car,"share:residence_msr_id=1,2:car",target:overall:car,"target:residence_msr_id=1,2:car""#
        );
        assert_eq!(lines[1], "0,0.075,0,-0.15,0.5,0.25,0.4,0.3");
        std::fs::remove_file(path).unwrap();
    }
}
