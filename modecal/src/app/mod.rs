mod calibration_app;
mod calibration_config;
mod calibration_operation;

pub use calibration_app::CalibrationApp;
pub use calibration_config::CalibrationConfig;
pub use calibration_operation::CalibrationOperation;
