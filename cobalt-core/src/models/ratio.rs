use serde::{Deserialize, Serialize};

use super::window::{GenomeKeyed, UNKNOWN};

///
/// Final per-window record of a run. Every value that could not be computed
/// holds [`UNKNOWN`].
///
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CobaltRatio {
    pub chromosome: String,
    pub position: i64,
    #[serde(skip)]
    pub key: i64,
    pub reference_read_depth: f64,
    pub tumor_read_depth: f64,
    #[serde(rename = "referenceGCRatio")]
    pub reference_gc_ratio: f64,
    #[serde(rename = "tumorGCRatio")]
    pub tumor_gc_ratio: f64,
    #[serde(rename = "referenceGCDiploidRatio")]
    pub reference_gc_diploid_ratio: f64,
    #[serde(rename = "referenceGCContent")]
    pub reference_gc_content: f64,
    #[serde(rename = "tumorGCContent")]
    pub tumor_gc_content: f64,
}

impl CobaltRatio {
    pub fn unknown(chromosome: &str, position: i64, key: i64) -> Self {
        Self {
            chromosome: chromosome.to_string(),
            position,
            key,
            reference_read_depth: UNKNOWN,
            tumor_read_depth: UNKNOWN,
            reference_gc_ratio: UNKNOWN,
            tumor_gc_ratio: UNKNOWN,
            reference_gc_diploid_ratio: UNKNOWN,
            reference_gc_content: UNKNOWN,
            tumor_gc_content: UNKNOWN,
        }
    }
}

impl GenomeKeyed for CobaltRatio {
    fn key(&self) -> i64 {
        self.key
    }

    fn chromosome(&self) -> &str {
        &self.chromosome
    }

    fn position(&self) -> i64 {
        self.position
    }
}

/// Median reference ratio of one chromosome and the windows behind it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MedianRatio {
    pub chromosome: String,
    pub median_ratio: f64,
    pub count: u64,
}
