//! Single-integer genomic window keys.
//!
//! A key is `ordinal * CHROMOSOME_MULTIPLIER + position`. Sorting keys sorts by
//! (chromosome rank, position), which lets every downstream join walk two
//! sorted vectors instead of matching (chromosome, position) pairs.

use std::collections::HashMap;
use std::sync::Mutex;

use log::error;

use crate::chromosome::chromosome_ordinal;
use crate::errors::CoreError;

/// Larger than any human chromosome, so positions never spill into the next range.
pub const CHROMOSOME_MULTIPLIER: i64 = 10_000_000_000;

/// Encodes and decodes window keys.
///
/// The codec remembers the exact contig string first used for each ordinal.
/// Normalising `chr1` against `1` later in the same run means two inputs were
/// aligned against different reference builds, which is fatal. The name map is
/// behind a mutex so counting workers can share one codec.
#[derive(Debug, Default)]
pub struct PositionCodec {
    names: Mutex<HashMap<u8, String>>,
}

impl PositionCodec {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn encode(&self, chromosome: &str, position: i64) -> Result<i64, CoreError> {
        let ordinal = chromosome_ordinal(chromosome)
            .ok_or_else(|| CoreError::UnknownChromosome(chromosome.to_string()))?;

        self.register(ordinal, chromosome)?;

        let out_of_range = || CoreError::PositionOutOfRange {
            chromosome: chromosome.to_string(),
            position,
        };

        if !(0..CHROMOSOME_MULTIPLIER).contains(&position) {
            return Err(out_of_range());
        }

        let key = (ordinal as i64)
            .checked_mul(CHROMOSOME_MULTIPLIER)
            .and_then(|base| base.checked_add(position))
            .ok_or_else(out_of_range)?;

        if key < 0 {
            return Err(out_of_range());
        }

        Ok(key)
    }

    /// Inverse of [`PositionCodec::encode`]. Keys whose ordinal was never
    /// encoded in this run are logged and return `None`.
    pub fn decode(&self, key: i64) -> Option<(String, i64)> {
        if key < 0 {
            error!("Cannot decode negative window key {}", key);
            return None;
        }

        let ordinal = key / CHROMOSOME_MULTIPLIER;
        let position = key % CHROMOSOME_MULTIPLIER;

        let names = self.lock_names();
        match u8::try_from(ordinal).ok().and_then(|o| names.get(&o)) {
            Some(name) => Some((name.clone(), position)),
            None => {
                error!("Unknown chromosome ordinal {} in window key {}", ordinal, key);
                None
            }
        }
    }

    fn register(&self, ordinal: u8, chromosome: &str) -> Result<(), CoreError> {
        let mut names = self.lock_names();
        match names.get(&ordinal) {
            Some(recorded) if recorded != chromosome => Err(CoreError::ChromosomeNameMismatch {
                ordinal,
                recorded: recorded.clone(),
                given: chromosome.to_string(),
            }),
            Some(_) => Ok(()),
            None => {
                names.insert(ordinal, chromosome.to_string());
                Ok(())
            }
        }
    }

    fn lock_names(&self) -> std::sync::MutexGuard<'_, HashMap<u8, String>> {
        // a poisoned map still holds valid names: the only writer inserts whole entries
        self.names.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
