//! Ratio normalization for fixed-size genomic windows.
//!
//! This crate turns per-window read depths into copy-number ratios:
//!
//! - GC bias correction against a per-GC-bucket median depth model
//! - Per-chromosome median ratios, gender inference and germline aberration flags
//! - Diploid correction of reference ratios with a sliding-window median
//! - Target-region enrichment for panel data
//! - Merging reference, tumor and diploid ratio tables into one record per window
//!
//! # Example
//!
//! ```no_run
//! use cobalt_ratio::{GcBiasNormalizer, GcBucketRange};
//! # let records = vec![];
//!
//! let normalizer = GcBiasNormalizer::build(&records, GcBucketRange::default());
//! let ratios = normalizer.normalize(&records);
//! ```

pub mod diploid;
pub mod errors;
pub mod gc_bias;
pub mod gender;
pub mod median_ratio;
pub mod merger;
pub mod rolling_median;
pub mod statistics;
pub mod target;

// re-exports
pub use diploid::{
    DiploidBaseline, DiploidNormalizer, DiploidRegions, DiploidWindowConfig, diploid_ratios,
    diploid_region_baseline,
};
pub use errors::RatioError;
pub use gc_bias::{GcBiasNormalizer, GcBucketRange};
pub use gender::Gender;
pub use median_ratio::{
    AberrationBounds, AberrationKind, GermlineAberration, detect_germline_aberrations, median_ratios,
};
pub use merger::{PositionSelector, RatioInputs, merge_ratios};
pub use rolling_median::RollingMedian;
pub use target::TargetRegions;
