use std::fmt::{self, Display};

use log::info;

use cobalt_core::Chromosome;
use cobalt_core::models::MedianRatio;

/// Median chrX ratio below which a sample is called male.
pub const DEFAULT_MALE_X_RATIO_CUTOFF: f64 = 0.75;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    ///
    /// Infer gender from the chrX median ratio. Without chrX data the sample
    /// is treated as female, which leaves chrX expected at 1.0.
    ///
    pub fn from_median_ratios(medians: &[MedianRatio], male_x_ratio_cutoff: f64) -> Self {
        let x_median = medians
            .iter()
            .find(|m| Chromosome::from_name(&m.chromosome) == Some(Chromosome::X) && m.count > 0);

        let gender = match x_median {
            Some(m) if m.median_ratio < male_x_ratio_cutoff => Gender::Male,
            _ => Gender::Female,
        };

        info!(
            "Inferred gender {} from chrX median ratio {}",
            gender,
            x_median.map_or("n/a".to_string(), |m| format!("{:.3}", m.median_ratio))
        );
        gender
    }

    ///
    /// Ratio a copy-number-neutral window of this chromosome should show, or
    /// `None` for chromosomes without a diploid baseline (chrY, chrMT and
    /// unknown contigs).
    ///
    pub fn expected_diploid_ratio(&self, chromosome: &str) -> Option<f64> {
        match Chromosome::from_name(chromosome)? {
            Chromosome::Autosome(_) => Some(1.0),
            Chromosome::X => match self {
                Gender::Male => Some(0.5),
                Gender::Female => Some(1.0),
            },
            Chromosome::Y | Chromosome::MT => None,
        }
    }
}

impl Display for Gender {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gender::Male => write!(f, "MALE"),
            Gender::Female => write!(f, "FEMALE"),
        }
    }
}
