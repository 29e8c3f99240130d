use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Invalid vector dimension: expected {expected}, got {actual}")]
    InvalidDimension { expected: usize, actual: usize },

    #[error("Cannot build an index from zero vectors")]
    EmptyIndex,

    #[error("Vector {index} contains a non-finite component")]
    NonFinite { index: usize },
}
