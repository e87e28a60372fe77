#[derive(Debug, thiserror::Error)]
pub enum HousingError {
    #[error("DuckDB error: {0}")]
    DuckDb(#[from] duckdb::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A filter selection the user has to change before anything is computed.
    #[error("{0}")]
    Validation(String),

    /// Corrupt input data; raised once while loading, never per request.
    #[error("Load error at row {row}, column '{column}': {reason} (value: {value:?})")]
    Load {
        row: usize,
        column: String,
        value: String,
        reason: String,
    },
}

impl HousingError {
    /// True for errors that should be shown to the user as a message
    /// rather than treated as a failure.
    pub fn is_validation(&self) -> bool {
        matches!(self, HousingError::Validation(_))
    }
}

pub type Result<T> = std::result::Result<T, HousingError>;
