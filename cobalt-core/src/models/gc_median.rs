use std::collections::BTreeMap;

/// Median depth and window count of one GC bucket.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GcBucketStats {
    pub median_read_depth: f64,
    pub window_count: u64,
}

/// Per-GC-bucket depth model of one sample, built once per run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GcMedianReadDepth {
    pub sample_mean: f64,
    pub sample_median: f64,
    pub buckets: BTreeMap<u8, GcBucketStats>,
}

impl GcMedianReadDepth {
    pub fn median_read_depth(&self, bucket: u8) -> Option<f64> {
        self.buckets.get(&bucket).map(|b| b.median_read_depth)
    }

    /// `sample_median / sample_mean`, `None` when the model holds no windows.
    pub fn normalization_factor(&self) -> Option<f64> {
        if self.sample_mean > 0.0 && self.sample_mean.is_finite() {
            Some(self.sample_median / self.sample_mean)
        } else {
            None
        }
    }

    pub fn window_count(&self) -> u64 {
        self.buckets.values().map(|b| b.window_count).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }
}
