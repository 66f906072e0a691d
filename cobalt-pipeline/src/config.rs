use std::fs::read_to_string;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use cobalt_ratio::gender::DEFAULT_MALE_X_RATIO_CUTOFF;
use cobalt_ratio::{AberrationBounds, DiploidWindowConfig, GcBucketRange};

use crate::errors::PipelineError;

/// Tuned constants of a run. Every key is optional in the TOML file.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CobaltConfig {
    pub window_size: i64,
    pub threads: usize,
    pub gc_bucket_min: u8,
    pub gc_bucket_max: u8,
    pub max_window_distance: usize,
    pub min_window_coverage: usize,
    pub aberration_min: f64,
    pub aberration_max: f64,
    pub male_x_ratio_cutoff: f64,
    pub compress_output: bool,
}

impl Default for CobaltConfig {
    fn default() -> Self {
        Self {
            window_size: 1_000,
            threads: 4,
            gc_bucket_min: 20,
            gc_bucket_max: 60,
            max_window_distance: 5_000,
            min_window_coverage: 1_000,
            aberration_min: 0.85,
            aberration_max: 1.15,
            male_x_ratio_cutoff: DEFAULT_MALE_X_RATIO_CUTOFF,
            compress_output: true,
        }
    }
}

impl CobaltConfig {
    ///
    /// Load a config from a TOML file.
    ///
    /// # Arguments
    /// - path: path to the .toml file
    pub fn from_toml_file(path: &Path) -> Result<Self, PipelineError> {
        let toml_str = read_to_string(path)?;
        let config: CobaltConfig = toml::from_str(&toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.window_size <= 0 {
            return Err(PipelineError::InvalidInput(format!(
                "window_size must be positive, got {}",
                self.window_size
            )));
        }
        if self.threads == 0 {
            return Err(PipelineError::InvalidInput(
                "threads must be at least 1".to_string(),
            ));
        }
        if self.gc_bucket_min > self.gc_bucket_max || self.gc_bucket_max > 100 {
            return Err(PipelineError::InvalidInput(format!(
                "invalid GC bucket range {}..={}",
                self.gc_bucket_min, self.gc_bucket_max
            )));
        }
        if !(self.aberration_min < self.aberration_max) {
            return Err(PipelineError::InvalidInput(format!(
                "invalid aberration bounds [{}, {}]",
                self.aberration_min, self.aberration_max
            )));
        }
        Ok(())
    }

    pub fn gc_bucket_range(&self) -> GcBucketRange {
        GcBucketRange {
            min: self.gc_bucket_min,
            max: self.gc_bucket_max,
        }
    }

    pub fn diploid_window(&self) -> DiploidWindowConfig {
        DiploidWindowConfig {
            max_window_distance: self.max_window_distance,
            min_window_coverage: self.min_window_coverage,
        }
    }

    pub fn aberration_bounds(&self) -> AberrationBounds {
        AberrationBounds {
            min: self.aberration_min,
            max: self.aberration_max,
        }
    }
}

/// One sample of a run and its read depth table.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleInput {
    pub name: String,
    pub read_depths: PathBuf,
}

/// External segmentation program and the arguments placed before the job arguments.
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationConfig {
    pub program: String,
    pub args: Vec<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunInputs {
    pub reference: Option<SampleInput>,
    pub tumor: Option<SampleInput>,
    pub gc_profile: PathBuf,
    pub diploid_regions: Option<PathBuf>,
    pub target_regions: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub segmentation: Option<SegmentationConfig>,
}

impl RunInputs {
    pub fn new(gc_profile: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            reference: None,
            tumor: None,
            gc_profile,
            diploid_regions: None,
            target_regions: None,
            output_dir,
            segmentation: None,
        }
    }
}
