use crate::calibration::{CalibrationError, LearningRate};
use crate::trial::SimulationOutput;
use config::Config;
use modecal_core::{Mode, TrialCommand};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// TOML configuration shared by the simple and grouped calibrators
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct CalibrationConfig {
    /// study name, shown in progress output
    #[serde(default = "default_name")]
    pub name: String,
    #[serde(default = "default_modes")]
    pub modes: Vec<String>,
    /// reference mode whose constant stays at zero
    #[serde(default = "default_fixed_mode")]
    pub fixed_mode: String,
    /// starting constants of the free modes
    #[serde(default = "default_initial")]
    pub initial: BTreeMap<String, f64>,
    pub n_trials: usize,
    /// reference shares, `ref_data.csv`
    pub target_file: String,
    /// per-residence-group reference shares, required by the grouped calibrator
    pub residence_target_file: Option<String>,
    /// target columns calibrated with their own constants per group value
    #[serde(default = "default_multi_groups")]
    pub multi_groups: Vec<String>,
    pub learning_rate: Option<LearningRate>,
    pub simulator: TrialCommand,
    #[serde(default)]
    pub output: SimulationOutput,
    /// directory holding per-trial params files and run directories
    #[serde(default = "default_run_root")]
    pub run_root: String,
    #[serde(default = "default_report_file")]
    pub report_file: String,
}

fn default_name() -> String {
    String::from("calib")
}

fn default_modes() -> Vec<String> {
    Mode::ALL.iter().map(|m| m.to_string()).collect()
}

fn default_fixed_mode() -> String {
    Mode::Walk.to_string()
}

fn default_initial() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (String::from("bike"), -0.55),
        (String::from("pt"), -0.03),
        (String::from("car"), -0.15),
        (String::from("ride"), -0.94),
    ])
}

fn default_multi_groups() -> Vec<String> {
    vec![String::from(modecal_core::respondent::RESIDENCE_COLUMN)]
}

fn default_run_root() -> String {
    String::from("calib")
}

fn default_report_file() -> String {
    String::from("report.csv")
}

impl CalibrationConfig {
    pub fn from_file(filepath: &str) -> Result<CalibrationConfig, CalibrationError> {
        let config_file = config::File::new(filepath, config::FileFormat::Toml);
        let config = Config::builder()
            .add_source(config_file)
            .build()
            .map_err(|e| CalibrationError::ConfigReadError {
                msg: format!("failed reading '{filepath}'"),
                source: e,
            })?;
        config
            .try_deserialize::<CalibrationConfig>()
            .map_err(|e| CalibrationError::ConfigReadError {
                msg: format!("failed deserializing '{filepath}'"),
                source: e,
            })
    }

    pub fn modes(&self) -> Result<Vec<Mode>, CalibrationError> {
        self.modes
            .iter()
            .map(|m| m.parse::<Mode>().map_err(CalibrationError::from))
            .collect()
    }

    pub fn fixed_mode(&self) -> Result<Mode, CalibrationError> {
        Ok(self.fixed_mode.parse::<Mode>()?)
    }

    pub fn initial(&self) -> Result<BTreeMap<Mode, f64>, CalibrationError> {
        self.initial
            .iter()
            .map(|(m, v)| Ok((m.parse::<Mode>()?, *v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_grouped_config() {
        let filepath = format!(
            "{}/config/grouped.toml",
            env!("CARGO_MANIFEST_DIR")
        );
        let conf = CalibrationConfig::from_file(&filepath).unwrap();
        assert_eq!(conf.modes().unwrap(), Mode::ALL.to_vec());
        assert_eq!(conf.fixed_mode().unwrap(), Mode::Walk);
        assert_eq!(conf.initial().unwrap().get(&Mode::Ride), Some(&-0.94));
        assert_eq!(
            conf.learning_rate,
            Some(LearningRate::Linear {
                start: 0.25,
                interval: 20
            })
        );
        assert_eq!(conf.multi_groups, vec![String::from("residence_msr_id")]);
        assert_eq!(conf.output, SimulationOutput::default());
        assert!(conf.simulator.run_args.contains("lastIteration 400"));
    }

    #[test]
    fn test_unknown_mode() {
        let mut conf = CalibrationConfig::from_file(&format!(
            "{}/config/simple.toml",
            env!("CARGO_MANIFEST_DIR")
        ))
        .unwrap();
        conf.initial.insert(String::from("hovercraft"), 1.0);
        assert!(conf.initial().is_err());
    }
}
