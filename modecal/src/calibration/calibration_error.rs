use modecal_core::ModecalError;

#[derive(thiserror::Error, Debug)]
pub enum CalibrationError {
    #[error(transparent)]
    DataError(#[from] ModecalError),
    #[error("{msg}: {source}")]
    ConfigReadError {
        msg: String,
        source: config::ConfigError,
    },
    #[error("invalid calibration configuration: {0}")]
    InvalidConfiguration(String),
    #[error("failed launching trial {trial}: {error}")]
    LaunchError { trial: usize, error: String },
    #[error("trial {trial} failed with {status}, command: {command}")]
    SimulationFailed {
        trial: usize,
        status: String,
        command: String,
    },
    #[error("failed writing '{filepath}': {error}")]
    WriteError { filepath: String, error: String },
    #[error("{0}")]
    InternalError(String),
}
