//! the simple and grouped calibration scripts.
use super::CalibrationConfig;
use crate::calibration::{
    AscCalibrator, CalibrationError, LearningRate, ReportFormat, Study,
};
use crate::trial::SimulatorTrialRunner;
use clap::Subcommand;
use modecal_core::{
    respondent::{PersonFilterPolicy, CAR_AVAILABLE_COLUMN},
    TargetTable,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// population segment without a car. the simulator never assigns car to these
/// persons, so their car target is removed.
const NO_CAR: &str = "0";

#[derive(Debug, Clone, Serialize, Deserialize, Subcommand)]
pub enum CalibrationOperation {
    /// calibrate one flat set of mode constants against fixed target shares
    Simple {
        /// TOML calibration configuration
        #[arg(long)]
        config: String,
        /// overrides the number of trials from the configuration
        #[arg(long)]
        n_trials: Option<usize>,
    },
    /// calibrate mode constants per residence group, with car removed from
    /// the targets of persons without a car
    Grouped {
        /// TOML calibration configuration
        #[arg(long)]
        config: String,
        /// overrides the number of trials from the configuration
        #[arg(long)]
        n_trials: Option<usize>,
    },
}

impl CalibrationOperation {
    pub fn run(&self) -> Result<(), CalibrationError> {
        match self {
            CalibrationOperation::Simple { config, n_trials } => {
                let conf = CalibrationConfig::from_file(config)?;
                let targets = TargetTable::read_file(&conf.target_file)?;
                let learning_rate = conf.learning_rate.unwrap_or_default();
                calibrate(
                    &conf,
                    targets,
                    PersonFilterPolicy::RegularOnly,
                    vec![],
                    learning_rate,
                    ReportFormat::Simple,
                    n_trials.unwrap_or(conf.n_trials),
                )
            }
            CalibrationOperation::Grouped { config, n_trials } => {
                let conf = CalibrationConfig::from_file(config)?;
                let targets = grouped_targets(&conf)?;
                let learning_rate = conf.learning_rate.unwrap_or(LearningRate::Linear {
                    start: 0.25,
                    interval: 20,
                });
                calibrate(
                    &conf,
                    targets,
                    PersonFilterPolicy::RegularWithGroupKeys,
                    conf.multi_groups.clone(),
                    learning_rate,
                    ReportFormat::Detailed,
                    n_trials.unwrap_or(conf.n_trials),
                )
            }
        }
    }
}

/// overall targets with car zeroed for the car-unavailable segment, followed
/// by the residence group targets
pub fn grouped_targets(conf: &CalibrationConfig) -> Result<TargetTable, CalibrationError> {
    let residence_file = conf.residence_target_file.as_ref().ok_or_else(|| {
        CalibrationError::InvalidConfiguration(String::from(
            "grouped calibration requires 'residence_target_file'",
        ))
    })?;
    let overall = TargetTable::read_file(&conf.target_file)?
        .without_car_in_segment(CAR_AVAILABLE_COLUMN, NO_CAR)?;
    let residence = TargetTable::read_file(residence_file)?;
    Ok(overall.concat(&residence))
}

fn calibrate(
    conf: &CalibrationConfig,
    targets: TargetTable,
    policy: PersonFilterPolicy,
    multi_groups: Vec<String>,
    learning_rate: LearningRate,
    report_format: ReportFormat,
    n_trials: usize,
) -> Result<(), CalibrationError> {
    let partitions = targets.partitions();
    log::info!(
        "calibrating {} target rows in {} partitions over {} trials",
        targets.rows.len(),
        partitions.len(),
        n_trials
    );
    let mut engine = AscCalibrator::new(
        conf.modes()?,
        conf.fixed_mode()?,
        conf.initial()?,
        targets.clone(),
        multi_groups,
        learning_rate,
    )?;
    let runner = SimulatorTrialRunner {
        command: conf.simulator.clone(),
        run_root: PathBuf::from(&conf.run_root),
        output: conf.output.clone(),
        policy,
        partitions,
    };
    let mut study = Study::new(&conf.name);
    study.optimize(&mut engine, &runner, &targets, n_trials)?;
    if let Some(best) = study.best() {
        log::info!(
            "best trial {} with mean absolute share error {:.5}",
            best.trial_number,
            best.mean_absolute_error
        );
    }
    study.write_report(&conf.report_file, &targets, report_format)
}
