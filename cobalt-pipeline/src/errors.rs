use std::io;

use cobalt_core::CoreError;
use cobalt_ratio::RatioError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Missing input: {0}")]
    MissingInput(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to launch segmentation program '{program}': {source}")]
    SegmentationLaunch {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("Segmentation of {column} into {output} failed: {status}")]
    SegmentationFailed {
        column: String,
        output: String,
        status: String,
    },

    #[error("Could not build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    #[error(transparent)]
    Ratio(#[from] RatioError),

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Io(#[from] io::Error),
}
