//! Per-window read depth collection and the join against the GC profile.

use std::collections::HashMap;
use std::path::Path;

use indicatif::ProgressBar;
use log::{debug, info};
use rayon::ThreadPool;
use rayon::prelude::*;

use cobalt_core::PositionCodec;
use cobalt_core::chromosome::is_autosome;
use cobalt_core::io::read_depths;
use cobalt_core::models::{GcProfileWindow, ReadCountRecord, ReadDepth, UNKNOWN, chromosome_groups};
use cobalt_ratio::PositionSelector;

use crate::errors::PipelineError;

/// Counting collaborator: produces key-sorted depths one chromosome at a time.
pub trait ReadDepthSource: Sync {
    fn read_depths(&self, chromosome: &str) -> Result<Vec<ReadDepth>, PipelineError>;
}

/// Depths loaded from a `chromosome position readDepth readGcContent` table.
///
/// This is a stand-in for a counting collaborator that reads alignments: the
/// whole table is parsed up front on the calling thread, and per-chromosome
/// requests only hand out copies of what was parsed.
#[derive(Debug, Default)]
pub struct TsvReadDepthSource {
    depths: HashMap<String, Vec<ReadDepth>>,
}

impl TsvReadDepthSource {
    pub fn open(path: &Path, codec: &PositionCodec) -> Result<Self, PipelineError> {
        let table = read_depths(path, codec)?;
        info!("Loaded {} read depth windows from {:?}", table.len(), path);

        let mut depths: HashMap<String, Vec<ReadDepth>> = HashMap::new();
        for group in chromosome_groups(&table) {
            depths
                .entry(group[0].chromosome.clone())
                .or_default()
                .extend_from_slice(group);
        }

        Ok(Self { depths })
    }
}

impl ReadDepthSource for TsvReadDepthSource {
    fn read_depths(&self, chromosome: &str) -> Result<Vec<ReadDepth>, PipelineError> {
        Ok(self.depths.get(chromosome).cloned().unwrap_or_default())
    }
}

///
/// Run one extraction task per chromosome on the pool and concatenate the
/// results in key order. The first failing task fails the whole collection.
///
pub fn collect_read_depths<S: ReadDepthSource>(
    source: &S,
    chromosomes: &[String],
    pool: &ThreadPool,
) -> Result<Vec<ReadDepth>, PipelineError> {
    let bar = ProgressBar::new(chromosomes.len() as u64);

    let per_chromosome: Vec<Vec<ReadDepth>> = pool.install(|| {
        chromosomes
            .par_iter()
            .map(|chromosome| {
                let depths = source.read_depths(chromosome);
                bar.inc(1);
                depths
            })
            .collect::<Result<Vec<_>, PipelineError>>()
    })?;
    bar.finish_and_clear();

    let mut depths: Vec<ReadDepth> = per_chromosome.into_iter().flatten().collect();
    depths.sort_by_key(|d| d.key);
    Ok(depths)
}

///
/// Fail when a profile window does not start on the `1 + k * window_size` grid.
///
pub fn check_window_grid(profile: &[GcProfileWindow], window_size: i64) -> Result<(), PipelineError> {
    match profile.iter().find(|w| (w.position - 1).rem_euclid(window_size) != 0) {
        Some(window) => Err(PipelineError::InvalidInput(format!(
            "GC profile window {}:{} is not aligned to window size {}",
            window.chromosome, window.position, window_size
        ))),
        None => Ok(()),
    }
}

/// Chromosomes of the profile, in key order.
pub fn profile_chromosomes(profile: &[GcProfileWindow]) -> Vec<String> {
    chromosome_groups(profile)
        .map(|group| group[0].chromosome.clone())
        .collect()
}

///
/// One record per profile window. Windows without a depth entry get depth 0;
/// the read GC content replaces the profile GC whenever it is known.
///
pub fn build_read_counts(profile: &[GcProfileWindow], depths: &[ReadDepth]) -> Vec<ReadCountRecord> {
    let mut selector = PositionSelector::new(depths);
    let mut missing = 0usize;

    let records: Vec<ReadCountRecord> = profile
        .iter()
        .map(|window| {
            let (read_depth, read_gc) = match selector.select(window.key) {
                Some(depth) => (depth.read_depth, depth.read_gc_content),
                None => {
                    missing += 1;
                    (0.0, UNKNOWN)
                }
            };

            let gc_content = if (0.0..=1.0).contains(&read_gc) {
                read_gc
            } else {
                window.gc_content
            };

            ReadCountRecord {
                chromosome: window.chromosome.clone(),
                position: window.position,
                key: window.key,
                read_depth,
                gc_content,
                mappable: window.mappable,
                autosome: is_autosome(&window.chromosome),
            }
        })
        .collect();

    debug!(
        "Joined {} profile windows to depths, {} without a depth entry",
        records.len(),
        missing
    );
    records
}
