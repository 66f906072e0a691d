pub mod gc_median;
pub mod ratio;
pub mod region;
pub mod window;

// re-export for cleaner imports
pub use self::gc_median::{GcBucketStats, GcMedianReadDepth};
pub use self::ratio::{CobaltRatio, MedianRatio};
pub use self::region::Region;
pub use self::window::{
    GcProfileWindow, GenomeKeyed, ReadCountRecord, ReadDepth, ReadRatio, TargetEnrichment,
    UNKNOWN, check_sorted, chromosome_groups, is_valid_ratio,
};
