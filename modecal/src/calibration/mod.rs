mod asc_calibrator;
mod asc_parameters;
mod calibration_engine;
mod calibration_error;
mod learning_rate;
mod report;
mod study;
mod trial_record;

pub use asc_calibrator::AscCalibrator;
pub use asc_parameters::{AscParameters, GroupAsc};
pub use calibration_engine::CalibrationEngine;
pub use calibration_error::CalibrationError;
pub use learning_rate::LearningRate;
pub use report::ReportFormat;
pub use study::Study;
pub use trial_record::TrialRecord;
