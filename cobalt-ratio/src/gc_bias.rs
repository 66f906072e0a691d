//! GC bias correction.
//!
//! Read depth tracks the GC content of a window. The normalizer groups
//! well-behaved windows by GC percentage, takes the median depth of each
//! bucket, and scales every window by its bucket median:
//!
//! `ratio = depth * (sample_median / sample_mean) / bucket_median`
//!

use std::collections::BTreeMap;

use log::{debug, info};

use cobalt_core::models::{
    GcBucketStats, GcMedianReadDepth, ReadCountRecord, ReadRatio, UNKNOWN,
};

use crate::statistics::{mean, median};

/// GC percentages whose buckets are populated densely enough to trust.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GcBucketRange {
    pub min: u8,
    pub max: u8,
}

impl Default for GcBucketRange {
    fn default() -> Self {
        Self { min: 20, max: 60 }
    }
}

impl GcBucketRange {
    pub fn contains(&self, bucket: u8) -> bool {
        (self.min..=self.max).contains(&bucket)
    }
}

/// Per-sample GC depth model plus the correction it implies.
#[derive(Debug, Clone)]
pub struct GcBiasNormalizer {
    model: GcMedianReadDepth,
}

impl GcBiasNormalizer {
    pub fn build(records: &[ReadCountRecord], range: GcBucketRange) -> Self {
        Self::build_with_filter(records, range, |_| true)
    }

    ///
    /// Build the model from the windows that pass both the standard filters
    /// (mappable, autosomal, non-negative depth, GC bucket in range) and
    /// `include`.
    ///
    pub fn build_with_filter<F>(records: &[ReadCountRecord], range: GcBucketRange, include: F) -> Self
    where
        F: Fn(&ReadCountRecord) -> bool,
    {
        let mut depths_by_bucket: BTreeMap<u8, Vec<f64>> = BTreeMap::new();
        let mut all_depths: Vec<f64> = Vec::new();

        for record in records {
            if !record.mappable || !record.autosome {
                continue;
            }
            if !record.read_depth.is_finite() || record.read_depth < 0.0 {
                continue;
            }
            let Some(bucket) = record.gc_bucket() else {
                continue;
            };
            if !range.contains(bucket) || !include(record) {
                continue;
            }

            depths_by_bucket.entry(bucket).or_default().push(record.read_depth);
            all_depths.push(record.read_depth);
        }

        let sample_mean = mean(&all_depths).unwrap_or(0.0);
        let sample_median = median(&mut all_depths).unwrap_or(0.0);

        let buckets: BTreeMap<u8, GcBucketStats> = depths_by_bucket
            .into_iter()
            .filter_map(|(bucket, mut depths)| {
                let window_count = depths.len() as u64;
                median(&mut depths).map(|median_read_depth| {
                    (
                        bucket,
                        GcBucketStats {
                            median_read_depth,
                            window_count,
                        },
                    )
                })
            })
            .collect();

        info!(
            "GC model from {} windows: {} buckets, sample mean {:.2}, sample median {:.2}",
            all_depths.len(),
            buckets.len(),
            sample_mean,
            sample_median
        );

        Self {
            model: GcMedianReadDepth {
                sample_mean,
                sample_median,
                buckets,
            },
        }
    }

    pub fn model(&self) -> &GcMedianReadDepth {
        &self.model
    }

    ///
    /// Corrected ratio of one window, or [`UNKNOWN`] when the window is
    /// unmappable or its bucket has no usable median.
    ///
    pub fn ratio(&self, record: &ReadCountRecord) -> f64 {
        if !record.mappable || !record.read_depth.is_finite() || record.read_depth < 0.0 {
            return UNKNOWN;
        }

        let Some(factor) = self.model.normalization_factor() else {
            return UNKNOWN;
        };

        match record
            .gc_bucket()
            .and_then(|bucket| self.model.median_read_depth(bucket))
        {
            Some(bucket_median) if bucket_median > 0.0 => {
                record.read_depth * factor / bucket_median
            }
            _ => UNKNOWN,
        }
    }

    pub fn normalize(&self, records: &[ReadCountRecord]) -> Vec<ReadRatio> {
        let ratios: Vec<ReadRatio> = records
            .iter()
            .map(|record| ReadRatio {
                chromosome: record.chromosome.clone(),
                position: record.position,
                key: record.key,
                ratio: self.ratio(record),
            })
            .collect();

        debug!(
            "GC normalized {} windows, {} without a ratio",
            ratios.len(),
            ratios.iter().filter(|r| r.ratio == UNKNOWN).count()
        );
        ratios
    }
}
