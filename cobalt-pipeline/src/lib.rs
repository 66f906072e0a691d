//! Run orchestration for cobalt.
//!
//! A run reads the GC profile and the per-sample read depth tables, picks one
//! of the three run modes, computes GC and diploid ratios with
//! [`cobalt_ratio`], writes the ratio table with its side files and finally
//! hands the ratio columns to an external segmentation program.

pub mod config;
pub mod counting;
pub mod errors;
pub mod mode;
pub mod orchestrator;
pub mod segmentation;

// re-exports
pub use config::{CobaltConfig, RunInputs, SampleInput, SegmentationConfig};
pub use errors::PipelineError;
pub use mode::RunMode;
pub use orchestrator::{RatioPipeline, RunSummary, build_pool};
pub use segmentation::{ProcessSegmenter, SegmentationJob, Segmenter, run_segmentation};
