use modelmatch_schema::SchemaError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, EngineError>;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Model not found: {0}")]
    NotFound(String),

    #[error("top_n must be at least 1")]
    InvalidTopN,

    #[error("No dataset has been loaded")]
    NoSnapshot,

    #[error("Dataset contains no records")]
    EmptyDataset,

    #[error(transparent)]
    Schema(#[from] SchemaError),

    #[error("Index error: {0}")]
    Index(#[from] modelmatch_core::Error),

    #[error("Snapshot is internally inconsistent: {0}")]
    Inconsistent(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}
