use crate::partition::Partition;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ShelfError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("no {partition} object found for dataset '{dataset}' in domain '{domain}'")]
    NotFound {
        partition: Partition,
        domain: String,
        dataset: String,
    },

    #[error("storage backend error: {0}")]
    Storage(#[from] opendal::Error),

    #[error("configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, ShelfError>;
