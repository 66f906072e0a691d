//! Core types for cobalt: chromosome ordinals, the genomic window key codec,
//! the per-window data models and the tab-separated table I/O shared by the
//! ratio and pipeline crates.

pub mod chromosome;
pub mod codec;
pub mod errors;
pub mod io;
pub mod models;
pub mod utils;

// re-exports
pub use chromosome::{Chromosome, chromosome_ordinal};
pub use codec::PositionCodec;
pub use errors::CoreError;
