use std::fmt::{self, Display};

use cobalt_core::models::CobaltRatio;

use crate::config::RunInputs;
use crate::errors::PipelineError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    TumorOnly,
    GermlineOnly,
    TumorNormalPair,
}

impl RunMode {
    ///
    /// Choose the mode from the samples present. Tumor-only runs need a
    /// diploid-region file to stand in for the reference.
    ///
    pub fn select(inputs: &RunInputs) -> Result<Self, PipelineError> {
        match (&inputs.reference, &inputs.tumor) {
            (Some(_), Some(_)) => Ok(RunMode::TumorNormalPair),
            (Some(_), None) => Ok(RunMode::GermlineOnly),
            (None, Some(_)) => {
                if inputs.diploid_regions.is_none() {
                    return Err(PipelineError::MissingInput(
                        "tumor-only runs require a diploid region file".to_string(),
                    ));
                }
                Ok(RunMode::TumorOnly)
            }
            (None, None) => Err(PipelineError::MissingInput(
                "at least one of the reference or tumor samples is required".to_string(),
            )),
        }
    }

    ///
    /// Recover the mode of a finished run from the depth columns its ratio
    /// table carries values in. Depths are written for every counted window,
    /// even where no ratio could be computed.
    ///
    pub fn from_ratios(ratios: &[CobaltRatio]) -> Result<Self, PipelineError> {
        let reference = ratios.iter().any(|r| r.reference_read_depth >= 0.0);
        let tumor = ratios.iter().any(|r| r.tumor_read_depth >= 0.0);

        match (reference, tumor) {
            (true, true) => Ok(RunMode::TumorNormalPair),
            (true, false) => Ok(RunMode::GermlineOnly),
            (false, true) => Ok(RunMode::TumorOnly),
            (false, false) => Err(PipelineError::InvalidInput(
                "ratio table holds no reference or tumor ratios".to_string(),
            )),
        }
    }

    pub fn has_reference(&self) -> bool {
        !matches!(self, RunMode::TumorOnly)
    }

    pub fn has_tumor(&self) -> bool {
        !matches!(self, RunMode::GermlineOnly)
    }
}

impl Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::TumorOnly => write!(f, "TUMOR_ONLY"),
            RunMode::GermlineOnly => write!(f, "GERMLINE_ONLY"),
            RunMode::TumorNormalPair => write!(f, "TUMOR_NORMAL_PAIR"),
        }
    }
}
