//! Panel mode: restricting and rescaling ratios to targeted windows.

use std::collections::HashMap;

use log::info;

use cobalt_core::models::{ReadCountRecord, ReadRatio, TargetEnrichment, UNKNOWN, is_valid_ratio};

/// Relative enrichment of every targeted window, looked up by encoded key.
#[derive(Debug, Clone, Default)]
pub struct TargetRegions {
    enrichment: HashMap<i64, f64>,
}

impl TargetRegions {
    pub fn new(targets: &[TargetEnrichment]) -> Self {
        let enrichment: HashMap<i64, f64> = targets
            .iter()
            .filter(|t| is_valid_ratio(t.relative_enrichment))
            .map(|t| (t.key, t.relative_enrichment))
            .collect();

        info!(
            "Loaded {} target windows ({} without a usable enrichment)",
            enrichment.len(),
            targets.len() - enrichment.len()
        );
        Self { enrichment }
    }

    pub fn is_target(&self, record: &ReadCountRecord) -> bool {
        self.enrichment.contains_key(&record.key)
    }

    pub fn len(&self) -> usize {
        self.enrichment.len()
    }

    pub fn is_empty(&self) -> bool {
        self.enrichment.is_empty()
    }

    ///
    /// Divide each ratio by its window's enrichment. Off-target windows and
    /// windows without a valid ratio become [`UNKNOWN`].
    ///
    pub fn apply(&self, ratios: &[ReadRatio]) -> Vec<ReadRatio> {
        ratios
            .iter()
            .map(|ratio| {
                let adjusted = match self.enrichment.get(&ratio.key) {
                    Some(&enrichment) if ratio.is_valid() => ratio.ratio / enrichment,
                    _ => UNKNOWN,
                };
                ratio.with_ratio(adjusted)
            })
            .collect()
    }
}
