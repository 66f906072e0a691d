//! Join of the per-window count and ratio tables into [`CobaltRatio`] records.

use log::debug;

use cobalt_core::models::{
    CobaltRatio, GenomeKeyed, ReadCountRecord, ReadRatio, UNKNOWN, check_sorted,
};

use crate::errors::RatioError;

///
/// Forward-only lookup over a key-sorted table. Queries must come in
/// non-decreasing key order; each table entry is visited at most once.
///
pub struct PositionSelector<'a, T> {
    items: &'a [T],
    cursor: usize,
}

impl<'a, T: GenomeKeyed> PositionSelector<'a, T> {
    pub fn new(items: &'a [T]) -> Self {
        Self { items, cursor: 0 }
    }

    pub fn select(&mut self, key: i64) -> Option<&'a T> {
        while self.cursor < self.items.len() && self.items[self.cursor].key() < key {
            self.cursor += 1;
        }

        self.items
            .get(self.cursor)
            .filter(|item| item.key() == key)
    }
}

/// Tables feeding one merge. Absent tables leave their columns at [`UNKNOWN`].
#[derive(Debug, Clone, Copy, Default)]
pub struct RatioInputs<'a> {
    pub reference_counts: Option<&'a [ReadCountRecord]>,
    pub tumor_counts: Option<&'a [ReadCountRecord]>,
    pub reference_gc_ratios: Option<&'a [ReadRatio]>,
    pub tumor_gc_ratios: Option<&'a [ReadRatio]>,
    pub reference_diploid_ratios: Option<&'a [ReadRatio]>,
}

fn selector<T: GenomeKeyed>(table: Option<&[T]>) -> Result<Option<PositionSelector<'_, T>>, RatioError> {
    match table {
        Some(items) => {
            check_sorted(items)?;
            Ok(Some(PositionSelector::new(items)))
        }
        None => Ok(None),
    }
}

fn ratio_at(selector: &mut Option<PositionSelector<'_, ReadRatio>>, key: i64) -> f64 {
    selector
        .as_mut()
        .and_then(|s| s.select(key))
        .map_or(UNKNOWN, |r| r.ratio)
}

///
/// One record per window of the driving count table: the reference counts
/// when present, otherwise the tumor counts. Windows missing from any other
/// table get [`UNKNOWN`] in the matching columns.
///
pub fn merge_ratios(inputs: &RatioInputs<'_>) -> Result<Vec<CobaltRatio>, RatioError> {
    let (driver, reference_driven) = match (inputs.reference_counts, inputs.tumor_counts) {
        (Some(reference), _) => (reference, true),
        (None, Some(tumor)) => (tumor, false),
        (None, None) => return Err(RatioError::MissingCounts),
    };
    check_sorted(driver)?;

    let mut tumor_counts = if reference_driven {
        selector(inputs.tumor_counts)?
    } else {
        None
    };
    let mut reference_gc = selector(inputs.reference_gc_ratios)?;
    let mut tumor_gc = selector(inputs.tumor_gc_ratios)?;
    let mut reference_diploid = selector(inputs.reference_diploid_ratios)?;

    let mut merged = Vec::with_capacity(driver.len());
    for window in driver {
        let mut ratio = CobaltRatio::unknown(&window.chromosome, window.position, window.key);

        if reference_driven {
            ratio.reference_read_depth = window.read_depth;
            ratio.reference_gc_content = window.gc_content;
            if let Some(tumor) = tumor_counts.as_mut().and_then(|s| s.select(window.key)) {
                ratio.tumor_read_depth = tumor.read_depth;
                ratio.tumor_gc_content = tumor.gc_content;
            }
        } else {
            ratio.tumor_read_depth = window.read_depth;
            ratio.tumor_gc_content = window.gc_content;
        }

        ratio.reference_gc_ratio = ratio_at(&mut reference_gc, window.key);
        ratio.tumor_gc_ratio = ratio_at(&mut tumor_gc, window.key);
        ratio.reference_gc_diploid_ratio = ratio_at(&mut reference_diploid, window.key);

        merged.push(ratio);
    }

    debug!("Merged {} windows", merged.len());
    Ok(merged)
}
