use thiserror::Error;

#[derive(Error, Debug)]
pub enum BatchError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Cannot read {}: {cause}", .path.display())]
    SourceUnreadable {
        path: std::path::PathBuf,
        cause: std::io::Error,
    },

    #[error("Invalid configuration: {reason}")]
    InvalidConfig { reason: String },

    #[error("Missing column '{column}' in {source_name}")]
    MissingColumn { source_name: String, column: String },

    #[error("Invalid date '{value}' in {source_name} record {record}: {cause}")]
    InvalidDate {
        source_name: String,
        record: u64,
        value: String,
        cause: chrono::ParseError,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl BatchError {
    pub fn invalid_config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

pub type BatchResult<T> = Result<T, BatchError>;
