//! Diploid correction of reference ratios.
//!
//! Within one chromosome, each ratio is rescaled by the median of the valid
//! ratios around it so that the local baseline sits at the chromosome's
//! expected diploid ratio. The window spans list indices, not bases: every
//! index within `max_window_distance` of the current one is included.

use std::collections::HashMap;

use log::{debug, info};

use cobalt_core::chromosome_ordinal;
use cobalt_core::models::{
    ReadCountRecord, ReadRatio, Region, UNKNOWN, chromosome_groups, is_valid_ratio,
};

use crate::errors::RatioError;
use crate::gender::Gender;
use crate::rolling_median::RollingMedian;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiploidWindowConfig {
    pub max_window_distance: usize,
    pub min_window_coverage: usize,
}

impl Default for DiploidWindowConfig {
    fn default() -> Self {
        Self {
            max_window_distance: 5_000,
            min_window_coverage: 1_000,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DiploidNormalizer {
    expected_ratio: f64,
    config: DiploidWindowConfig,
}

impl DiploidNormalizer {
    pub fn new(expected_ratio: f64, config: DiploidWindowConfig) -> Result<Self, RatioError> {
        if !is_valid_ratio(expected_ratio) {
            return Err(RatioError::InvalidParameter(format!(
                "expected diploid ratio must be positive, got {}",
                expected_ratio
            )));
        }
        Ok(Self {
            expected_ratio,
            config,
        })
    }

    ///
    /// Correct the position-ordered ratios of one chromosome.
    ///
    /// A valid ratio whose window holds at least `min_window_coverage` valid
    /// samples becomes `expected * ratio / window_median`; everything else
    /// passes through unchanged.
    ///
    pub fn normalize(&self, ratios: &[ReadRatio]) -> Vec<ReadRatio> {
        let distance = self.config.max_window_distance;
        let mut window = RollingMedian::new();
        let mut corrected = Vec::with_capacity(ratios.len());

        // window covers [start, end) of the list
        let mut start = 0usize;
        let mut end = 0usize;

        for (index, current) in ratios.iter().enumerate() {
            let last = index.saturating_add(distance).min(ratios.len() - 1);
            while end <= last {
                if ratios[end].is_valid() {
                    window.add(ratios[end].ratio);
                }
                end += 1;
            }

            while start + distance < index {
                if ratios[start].is_valid() {
                    window.remove(ratios[start].ratio);
                }
                start += 1;
            }

            let ratio = if current.is_valid() && window.len() >= self.config.min_window_coverage {
                let window_median = window.median();
                if window_median > 0.0 {
                    self.expected_ratio * current.ratio / window_median
                } else {
                    UNKNOWN
                }
            } else {
                current.ratio
            };

            corrected.push(current.with_ratio(ratio));
        }

        corrected
    }
}

///
/// Diploid-correct a genome-wide, key-sorted reference ratio table.
/// Chromosomes without a diploid baseline are copied unchanged.
///
pub fn diploid_ratios(
    ratios: &[ReadRatio],
    gender: Gender,
    config: DiploidWindowConfig,
) -> Result<Vec<ReadRatio>, RatioError> {
    let mut corrected = Vec::with_capacity(ratios.len());

    for group in chromosome_groups(ratios) {
        let chromosome = &group[0].chromosome;
        match gender.expected_diploid_ratio(chromosome) {
            Some(expected) => {
                debug!("Diploid correction of {} towards {}", chromosome, expected);
                let normalizer = DiploidNormalizer::new(expected, config)?;
                corrected.extend(normalizer.normalize(group));
            }
            None => {
                debug!("No diploid baseline for {}, ratios left as is", chromosome);
                corrected.extend_from_slice(group);
            }
        }
    }

    Ok(corrected)
}

/// Diploid regions indexed by chromosome ordinal, so `chr1` and `1` match.
///
/// Regions keep their 0-based half-open BED coordinates; lookups take the
/// 1-based window start used everywhere else.
#[derive(Debug, Clone, Default)]
pub struct DiploidRegions {
    regions: HashMap<u8, Vec<Region>>,
}

impl DiploidRegions {
    pub fn from_regions(regions: &[Region]) -> Self {
        let mut by_chromosome: HashMap<u8, Vec<Region>> = HashMap::new();
        for region in regions {
            match chromosome_ordinal(&region.chr) {
                Some(ordinal) => by_chromosome.entry(ordinal).or_default().push(region.clone()),
                None => debug!("Skipping diploid region {}", region),
            }
        }

        let mut bases = 0i64;
        for intervals in by_chromosome.values_mut() {
            intervals.sort_unstable_by_key(|r| (r.start, r.end));
            // merge overlaps so the binary search below sees disjoint intervals
            let mut merged: Vec<Region> = Vec::with_capacity(intervals.len());
            for region in intervals.drain(..) {
                match merged.last_mut() {
                    Some(last) if region.start <= last.end => last.end = last.end.max(region.end),
                    _ => merged.push(region),
                }
            }
            bases += merged.iter().map(Region::width).sum::<i64>();
            *intervals = merged;
        }
        debug!("Diploid regions span {} bases", bases);

        Self {
            regions: by_chromosome,
        }
    }

    /// Is the base at 1-based `position` inside a region.
    pub fn contains(&self, chromosome: &str, position: i64) -> bool {
        let Some(intervals) = chromosome_ordinal(chromosome).and_then(|o| self.regions.get(&o))
        else {
            return false;
        };

        let offset = position - 1;
        let index = intervals.partition_point(|r| r.start <= offset);
        index > 0 && intervals[index - 1].contains(offset)
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// Reference columns of a tumor-only run: GC ratio and diploid ratio tables.
#[derive(Debug, Clone)]
pub struct DiploidBaseline {
    pub gc_ratios: Vec<ReadRatio>,
    pub diploid_ratios: Vec<ReadRatio>,
}

///
/// Stand-in reference for a tumor-only run. Windows inside a diploid region
/// get GC ratio 1.0 and the chromosome's expected diploid ratio; all other
/// windows are [`UNKNOWN`].
///
pub fn diploid_region_baseline(
    windows: &[ReadCountRecord],
    regions: &DiploidRegions,
    gender: Gender,
) -> DiploidBaseline {
    let mut gc_ratios = Vec::with_capacity(windows.len());
    let mut diploid_ratios = Vec::with_capacity(windows.len());
    let mut inside = 0usize;

    for window in windows {
        let diploid = window.mappable && regions.contains(&window.chromosome, window.position);
        let expected = gender.expected_diploid_ratio(&window.chromosome);

        let (gc_ratio, diploid_ratio) = match (diploid, expected) {
            (true, Some(expected)) => {
                inside += 1;
                (1.0, expected)
            }
            _ => (UNKNOWN, UNKNOWN),
        };

        let base = ReadRatio {
            chromosome: window.chromosome.clone(),
            position: window.position,
            key: window.key,
            ratio: gc_ratio,
        };
        diploid_ratios.push(base.with_ratio(diploid_ratio));
        gc_ratios.push(base);
    }

    info!(
        "Diploid baseline covers {} of {} windows",
        inside,
        windows.len()
    );

    DiploidBaseline {
        gc_ratios,
        diploid_ratios,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;

    fn chromosome_ratios(chromosome: &str, values: &[f64]) -> Vec<ReadRatio> {
        values
            .iter()
            .enumerate()
            .map(|(i, &ratio)| ReadRatio {
                chromosome: chromosome.to_string(),
                position: i as i64 * 1_000 + 1,
                key: i as i64 * 1_000 + 1,
                ratio,
            })
            .collect()
    }

    fn small_window(distance: usize, coverage: usize) -> DiploidWindowConfig {
        DiploidWindowConfig {
            max_window_distance: distance,
            min_window_coverage: coverage,
        }
    }

    #[rstest]
    fn test_constant_ratio_becomes_expected() {
        let ratios = chromosome_ratios("1", &vec![0.8; 3_000]);
        let normalizer = DiploidNormalizer::new(1.0, DiploidWindowConfig::default()).unwrap();

        let corrected = normalizer.normalize(&ratios);
        assert_eq!(corrected.len(), ratios.len());
        assert!(corrected.iter().all(|r| r.ratio == 1.0));
    }

    #[rstest]
    fn test_expected_ratio_scales_output() {
        let ratios = chromosome_ratios("X", &vec![0.7; 50]);
        let normalizer = DiploidNormalizer::new(0.5, small_window(10, 5)).unwrap();
        assert!(normalizer.normalize(&ratios).iter().all(|r| r.ratio == 0.5));
    }

    #[rstest]
    fn test_window_is_index_bounded() {
        // distance 1 => window of three indices around the current one
        let ratios = chromosome_ratios("1", &[1.0, 2.0, 4.0, 8.0, 16.0]);
        let normalizer = DiploidNormalizer::new(1.0, small_window(1, 2)).unwrap();
        let corrected: Vec<f64> = normalizer.normalize(&ratios).iter().map(|r| r.ratio).collect();

        // medians: [1,2]→1.5, [1,2,4]→2, [2,4,8]→4, [4,8,16]→8, [8,16]→12
        assert_eq!(
            corrected,
            vec![1.0 / 1.5, 1.0, 1.0, 1.0, 16.0 / 12.0]
        );
    }

    #[rstest]
    fn test_invalid_ratios_pass_through_and_do_not_count() {
        let mut values = vec![1.2; 20];
        values[5] = UNKNOWN;
        values[6] = 0.0;
        let ratios = chromosome_ratios("3", &values);

        // full window would hold 20 slots but only 18 valid samples
        let normalizer = DiploidNormalizer::new(1.0, small_window(100, 18)).unwrap();
        let corrected = normalizer.normalize(&ratios);
        assert_eq!(corrected[5].ratio, UNKNOWN);
        assert_eq!(corrected[6].ratio, 0.0);
        assert_eq!(corrected[0].ratio, 1.0);

        let strict = DiploidNormalizer::new(1.0, small_window(100, 19)).unwrap();
        assert!(strict.normalize(&ratios).iter().zip(&ratios).all(|(c, r)| c.ratio == r.ratio));
    }

    #[rstest]
    fn test_insufficient_coverage_passes_raw_ratio() {
        let ratios = chromosome_ratios("2", &[0.9, 1.1, 1.3]);
        let normalizer = DiploidNormalizer::new(1.0, DiploidWindowConfig::default()).unwrap();
        assert_eq!(normalizer.normalize(&ratios), ratios);
    }

    #[rstest]
    fn test_invalid_expected_ratio_is_rejected() {
        assert!(DiploidNormalizer::new(0.0, DiploidWindowConfig::default()).is_err());
        assert!(DiploidNormalizer::new(f64::NAN, DiploidWindowConfig::default()).is_err());
    }

    #[rstest]
    #[case(Gender::Male)]
    #[case(Gender::Female)]
    fn test_chr_y_is_never_modified(#[case] gender: Gender) {
        let mut ratios = chromosome_ratios("chr1", &vec![0.9; 40]);
        let y = chromosome_ratios("chrY", &vec![0.3; 40]);
        ratios.extend(y.iter().map(|r| ReadRatio {
            key: r.key + 24 * 10_000_000_000,
            ..r.clone()
        }));

        let corrected = diploid_ratios(&ratios, gender, small_window(10, 5)).unwrap();
        assert_eq!(corrected.len(), 80);
        assert!(corrected[..40].iter().all(|r| r.ratio == 1.0));
        assert!(corrected[40..].iter().zip(&ratios[40..]).all(|(c, r)| c == r));
    }

    fn region(chr: &str, start: i64, end: i64) -> Region {
        Region {
            chr: chr.to_string(),
            start,
            end,
        }
    }

    #[rstest]
    fn test_diploid_regions_contains() {
        let regions = DiploidRegions::from_regions(&[
            region("chr1", 5_000, 10_000),
            region("chr1", 0, 2_000),
            region("chr1", 1_500, 3_000),
            region("chrUn_gl000220", 0, 1_000),
        ]);

        assert!(regions.contains("chr1", 1));
        assert!(regions.contains("1", 2_500));
        assert!(regions.contains("chr1", 3_000));
        assert!(!regions.contains("chr1", 3_001));
        assert!(!regions.contains("chr1", 5_000));
        assert!(regions.contains("chr1", 5_001));
        assert!(regions.contains("chr1", 10_000));
        assert!(!regions.contains("chr1", 10_001));
        assert!(!regions.contains("chr2", 100));
    }

    #[rstest]
    #[case(1_000, 3_000, 1_001, true)]
    #[case(1_001, 3_000, 1_001, false)]
    #[case(1_001, 3_000, 1_002, true)]
    #[case(0, 1_001, 1_001, true)]
    #[case(0, 1_000, 1_001, false)]
    fn test_bed_bounds_against_window_starts(
        #[case] start: i64,
        #[case] end: i64,
        #[case] window_start: i64,
        #[case] expected: bool,
    ) {
        let regions = DiploidRegions::from_regions(&[region("chr1", start, end)]);
        assert_eq!(regions.contains("chr1", window_start), expected);
    }

    #[rstest]
    fn test_diploid_region_baseline() {
        let windows: Vec<ReadCountRecord> = [("1", 1), ("1", 5_001), ("X", 1), ("Y", 1)]
            .iter()
            .enumerate()
            .map(|(i, (chromosome, position))| ReadCountRecord {
                chromosome: chromosome.to_string(),
                position: *position,
                key: i as i64,
                read_depth: 30.0,
                gc_content: 0.4,
                mappable: true,
                autosome: *chromosome == "1",
            })
            .collect();

        let regions = DiploidRegions::from_regions(&[
            Region {
                chr: "1".to_string(),
                start: 0,
                end: 1_000,
            },
            Region {
                chr: "X".to_string(),
                start: 0,
                end: 1_000,
            },
            Region {
                chr: "Y".to_string(),
                start: 0,
                end: 1_000,
            },
        ]);

        let baseline = diploid_region_baseline(&windows, &regions, Gender::Male);
        let gc: Vec<f64> = baseline.gc_ratios.iter().map(|r| r.ratio).collect();
        let diploid: Vec<f64> = baseline.diploid_ratios.iter().map(|r| r.ratio).collect();

        assert_eq!(gc, vec![1.0, UNKNOWN, 1.0, UNKNOWN]);
        assert_eq!(diploid, vec![1.0, UNKNOWN, 0.5, UNKNOWN]);
    }
}
