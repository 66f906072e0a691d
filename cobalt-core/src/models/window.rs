use crate::errors::CoreError;

/// Sentinel for "not computable". Consumers treat it as no information, never as zero.
pub const UNKNOWN: f64 = -1.0;

/// A ratio carries information only when it is finite and strictly positive.
#[inline]
pub fn is_valid_ratio(ratio: f64) -> bool {
    ratio.is_finite() && ratio > 0.0
}

/// Anything addressed by a fixed-size genomic window.
pub trait GenomeKeyed {
    /// Encoded window key, see [`crate::codec::PositionCodec`].
    fn key(&self) -> i64;
    fn chromosome(&self) -> &str;
    fn position(&self) -> i64;
}

macro_rules! impl_genome_keyed {
    ($($t:ty),*) => {
        $(
            impl GenomeKeyed for $t {
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
        )*
    };
}

/// Raw depth for one window, as produced by the counting collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadDepth {
    pub chromosome: String,
    pub position: i64,
    pub key: i64,
    pub read_depth: f64,
    /// GC fraction of the reads in the window, or [`UNKNOWN`].
    pub read_gc_content: f64,
}

/// One window of the static GC profile.
#[derive(Debug, Clone, PartialEq)]
pub struct GcProfileWindow {
    pub chromosome: String,
    pub position: i64,
    pub key: i64,
    pub gc_content: f64,
    pub mappable: bool,
}

///
/// Depth, GC content and filter flags for one window of one sample.
///
#[derive(Debug, Clone, PartialEq)]
pub struct ReadCountRecord {
    pub chromosome: String,
    pub position: i64,
    pub key: i64,
    pub read_depth: f64,
    pub gc_content: f64,
    pub mappable: bool,
    pub autosome: bool,
}

impl ReadCountRecord {
    ///
    /// GC content as an integer percentage, `None` when the content is unknown.
    ///
    pub fn gc_bucket(&self) -> Option<u8> {
        if !(0.0..=1.0).contains(&self.gc_content) {
            return None;
        }
        Some((self.gc_content * 100.0).round() as u8)
    }
}

/// A normalized ratio for one window.
#[derive(Debug, Clone, PartialEq)]
pub struct ReadRatio {
    pub chromosome: String,
    pub position: i64,
    pub key: i64,
    pub ratio: f64,
}

impl ReadRatio {
    pub fn with_ratio(&self, ratio: f64) -> Self {
        Self {
            chromosome: self.chromosome.clone(),
            position: self.position,
            key: self.key,
            ratio,
        }
    }

    pub fn is_valid(&self) -> bool {
        is_valid_ratio(self.ratio)
    }
}

/// Relative capture efficiency of a targeted window.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetEnrichment {
    pub chromosome: String,
    pub position: i64,
    pub key: i64,
    pub relative_enrichment: f64,
}

impl_genome_keyed!(ReadDepth, GcProfileWindow, ReadCountRecord, ReadRatio, TargetEnrichment);

///
/// Split a key-sorted table into one slice per chromosome, in table order.
///
pub fn chromosome_groups<T: GenomeKeyed>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunk_by(|a, b| a.chromosome() == b.chromosome())
}

///
/// Fail on the first window whose key does not strictly increase.
///
pub fn check_sorted<T: GenomeKeyed>(items: &[T]) -> Result<(), CoreError> {
    match items.windows(2).find(|w| w[0].key() >= w[1].key()) {
        Some(w) => Err(CoreError::UnsortedTable {
            chromosome: w[1].chromosome().to_string(),
            position: w[1].position(),
        }),
        None => Ok(()),
    }
}
