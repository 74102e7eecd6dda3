use modecal_core::ModecalError;

#[derive(thiserror::Error, Debug)]
pub enum ResidenceError {
    #[error("failed reading workbook '{filepath}': {error}")]
    WorkbookError { filepath: String, error: String },
    #[error("workbook '{filepath}' has no sheet at index {index}")]
    MissingSheet { filepath: String, index: usize },
    #[error("workbook '{filepath}' is missing expected column '{column}'")]
    MissingColumn { filepath: String, column: String },
    #[error("invalid value in row {row}: {error}")]
    InvalidRow { row: usize, error: String },
    #[error("residence group '{0}' has no weighted respondents")]
    EmptyGroup(String),
    #[error("invalid residence group: {0}")]
    InvalidGroup(String),
    #[error("{msg}: {source}")]
    ConfigReadError {
        msg: String,
        source: config::ConfigError,
    },
    #[error("clustering failed: {0}")]
    ClusteringError(String),
    #[error("failed writing '{filepath}': {error}")]
    WriteError { filepath: String, error: String },
    #[error(transparent)]
    DataError(#[from] ModecalError),
}
