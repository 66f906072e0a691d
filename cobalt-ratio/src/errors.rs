use cobalt_core::CoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum RatioError {
    #[error("No read count table to drive the ratio merge")]
    MissingCounts,

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}
