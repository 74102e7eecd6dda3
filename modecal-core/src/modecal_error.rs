#[derive(thiserror::Error, Debug)]
pub enum ModecalError {
    #[error("failed reading '{filepath}': {error}")]
    ReadError { filepath: String, error: String },
    #[error("failed writing '{filepath}': {error}")]
    WriteError { filepath: String, error: String },
    #[error("file '{filepath}' is missing expected column '{column}'")]
    MissingColumn { filepath: String, column: String },
    #[error("column '{column}' has value '{value}' that cannot be read as an integer")]
    IntegerCoercionError { column: String, value: String },
    #[error("row {row} of '{filepath}' has invalid share '{value}'")]
    InvalidShare {
        filepath: String,
        row: usize,
        value: String,
    },
    #[error("unknown travel mode '{0}'")]
    UnknownMode(String),
    #[error("target segment {0} has no remaining share after removing car")]
    EmptySegment(String),
    #[error("{0}")]
    OtherError(String),
}
