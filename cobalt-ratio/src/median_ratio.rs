//! Per-chromosome median ratios and germline aberration flags.

use std::fmt::{self, Display};

use log::{info, warn};

use cobalt_core::models::{MedianRatio, ReadRatio, chromosome_groups};

use crate::gender::Gender;
use crate::statistics::median;

///
/// Median of the valid ratios on each chromosome, in table order.
/// Chromosomes without a single valid ratio are left out.
///
pub fn median_ratios(ratios: &[ReadRatio]) -> Vec<MedianRatio> {
    let mut medians = Vec::new();

    for group in chromosome_groups(ratios) {
        let mut valid: Vec<f64> = group.iter().filter(|r| r.is_valid()).map(|r| r.ratio).collect();
        let count = valid.len() as u64;

        if let Some(median_ratio) = median(&mut valid) {
            info!(
                "Median ratio of {}: {:.4} from {} windows",
                group[0].chromosome, median_ratio, count
            );
            medians.push(MedianRatio {
                chromosome: group[0].chromosome.clone(),
                median_ratio,
                count,
            });
        }
    }

    medians
}

/// Observed/expected bounds outside of which a chromosome is flagged.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AberrationBounds {
    pub min: f64,
    pub max: f64,
}

impl Default for AberrationBounds {
    fn default() -> Self {
        Self {
            min: 0.85,
            max: 1.15,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AberrationKind {
    Gain,
    Loss,
}

impl Display for AberrationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AberrationKind::Gain => write!(f, "gain"),
            AberrationKind::Loss => write!(f, "loss"),
        }
    }
}

/// A whole-chromosome germline copy-number change such as a trisomy or mosaic X loss.
#[derive(Debug, Clone, PartialEq)]
pub struct GermlineAberration {
    pub chromosome: String,
    pub observed: f64,
    pub expected: f64,
    pub kind: AberrationKind,
}

///
/// Flag chromosomes whose median ratio departs from the diploid expectation.
/// Each aberration is logged; none of them stop the run.
///
pub fn detect_germline_aberrations(
    medians: &[MedianRatio],
    gender: Gender,
    bounds: AberrationBounds,
) -> Vec<GermlineAberration> {
    let mut aberrations = Vec::new();

    for median in medians {
        let Some(expected) = gender.expected_diploid_ratio(&median.chromosome) else {
            continue;
        };

        let relative = median.median_ratio / expected;
        let kind = if relative < bounds.min {
            AberrationKind::Loss
        } else if relative > bounds.max {
            AberrationKind::Gain
        } else {
            continue;
        };

        warn!(
            "Germline {} on {}: median ratio {:.3} against expected {:.2}",
            kind, median.chromosome, median.median_ratio, expected
        );
        aberrations.push(GermlineAberration {
            chromosome: median.chromosome.clone(),
            observed: median.median_ratio,
            expected,
            kind,
        });
    }

    aberrations
}

#[cfg(test)]
mod tests {
    use super::*;

    use cobalt_core::models::UNKNOWN;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn ratio(chromosome: &str, position: i64, ratio: f64) -> ReadRatio {
        ReadRatio {
            chromosome: chromosome.to_string(),
            position,
            key: position,
            ratio,
        }
    }

    fn median_ratio(chromosome: &str, median_ratio: f64) -> MedianRatio {
        MedianRatio {
            chromosome: chromosome.to_string(),
            median_ratio,
            count: 100,
        }
    }

    #[rstest]
    fn test_median_ratios_skip_invalid_windows() {
        let ratios = vec![
            ratio("1", 1, 0.9),
            ratio("1", 2, UNKNOWN),
            ratio("1", 3, 1.1),
            ratio("1", 4, 1.0),
            ratio("2", 5, UNKNOWN),
            ratio("X", 6, 0.5),
            ratio("X", 7, 0.0),
        ];

        let medians = median_ratios(&ratios);
        assert_eq!(
            medians,
            vec![
                MedianRatio {
                    chromosome: "1".to_string(),
                    median_ratio: 1.0,
                    count: 3
                },
                MedianRatio {
                    chromosome: "X".to_string(),
                    median_ratio: 0.5,
                    count: 1
                },
            ]
        );
    }

    #[rstest]
    fn test_female_with_trisomy_21() {
        let medians = vec![
            median_ratio("1", 1.0),
            median_ratio("21", 1.5),
            median_ratio("X", 1.0),
            median_ratio("Y", 0.01),
        ];

        let aberrations =
            detect_germline_aberrations(&medians, Gender::Female, AberrationBounds::default());
        assert_eq!(aberrations.len(), 1);
        assert_eq!(aberrations[0].chromosome, "21");
        assert_eq!(aberrations[0].kind, AberrationKind::Gain);
    }

    #[rstest]
    #[case(0.5, None)]
    #[case(0.4, Some(AberrationKind::Loss))]
    #[case(1.0, Some(AberrationKind::Gain))]
    fn test_male_x_is_judged_against_half(
        #[case] x_ratio: f64,
        #[case] expected: Option<AberrationKind>,
    ) {
        let medians = vec![median_ratio("chr1", 1.0), median_ratio("chrX", x_ratio)];
        let aberrations =
            detect_germline_aberrations(&medians, Gender::Male, AberrationBounds::default());
        assert_eq!(aberrations.first().map(|a| a.kind), expected);
    }
}
