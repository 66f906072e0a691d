//! Sequencing of one run: inputs to ratio table, side files and segmentation.

use std::path::{Path, PathBuf};

use log::{info, warn};
use rayon::ThreadPool;

use cobalt_core::PositionCodec;
use cobalt_core::io::{
    read_bed_regions, read_gc_profile, read_target_enrichment, write_gc_medians,
    write_median_ratios, write_ratios,
};
use cobalt_core::models::{CobaltRatio, GcProfileWindow, ReadCountRecord, ReadRatio};
use cobalt_ratio::{
    DiploidRegions, GcBiasNormalizer, Gender, GermlineAberration, RatioInputs, TargetRegions,
    detect_germline_aberrations, diploid_ratios, diploid_region_baseline, median_ratios,
    merge_ratios,
};

use crate::config::{CobaltConfig, RunInputs, SampleInput};
use crate::counting::{
    TsvReadDepthSource, build_read_counts, check_window_grid, collect_read_depths,
    profile_chromosomes,
};
use crate::errors::PipelineError;
use crate::mode::RunMode;
use crate::segmentation::{ProcessSegmenter, SegmentationJob, Segmenter, run_segmentation};

/// What a finished run produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RunSummary {
    pub mode: RunMode,
    pub gender: Gender,
    pub aberrations: Vec<GermlineAberration>,
    pub window_count: usize,
    pub ratio_file: PathBuf,
    pub side_files: Vec<PathBuf>,
    pub segmentation_outputs: Vec<PathBuf>,
}

pub fn ratio_file_path(output_dir: &Path, sample: &str, compress: bool) -> PathBuf {
    let extension = if compress { ".gz" } else { "" };
    output_dir.join(format!("{}.cobalt.ratio.tsv{}", sample, extension))
}

pub fn gc_median_path(output_dir: &Path, sample: &str) -> PathBuf {
    output_dir.join(format!("{}.cobalt.gc.median.tsv", sample))
}

pub fn median_ratio_path(output_dir: &Path, sample: &str) -> PathBuf {
    output_dir.join(format!("{}.cobalt.ratio.median.tsv", sample))
}

type ModeOutput = (Vec<CobaltRatio>, Gender, Vec<GermlineAberration>);

/// Build the worker pool every parallel stage of a run shares.
pub fn build_pool(threads: usize) -> Result<ThreadPool, PipelineError> {
    Ok(rayon::ThreadPoolBuilder::new().num_threads(threads).build()?)
}

struct RunContext<'a> {
    codec: PositionCodec,
    profile: Vec<GcProfileWindow>,
    chromosomes: Vec<String>,
    targets: Option<TargetRegions>,
    pool: &'a ThreadPool,
    side_files: Vec<PathBuf>,
}

pub struct RatioPipeline<'a> {
    config: &'a CobaltConfig,
    inputs: &'a RunInputs,
}

impl<'a> RatioPipeline<'a> {
    pub fn new(config: &'a CobaltConfig, inputs: &'a RunInputs) -> Result<Self, PipelineError> {
        config.validate()?;
        Ok(Self { config, inputs })
    }

    ///
    /// Run with the segmentation program named in the inputs, if any.
    ///
    pub fn run(&self) -> Result<RunSummary, PipelineError> {
        match &self.inputs.segmentation {
            Some(segmentation) => {
                let segmenter = ProcessSegmenter::new(segmentation);
                self.run_with_segmenter(Some(&segmenter))
            }
            None => self.run_with_segmenter(None),
        }
    }

    pub fn run_with_segmenter(
        &self,
        segmenter: Option<&dyn Segmenter>,
    ) -> Result<RunSummary, PipelineError> {
        let mode = RunMode::select(self.inputs)?;
        info!("Running in {} mode", mode);

        let pool = build_pool(self.config.threads)?;
        let mut ctx = self.prepare(&pool)?;

        let output_dir = &self.inputs.output_dir;
        let (ratios, gender, aberrations) = match mode {
            RunMode::TumorNormalPair => self.tumor_normal_pair(&mut ctx)?,
            RunMode::GermlineOnly => self.germline_only(&mut ctx)?,
            RunMode::TumorOnly => self.tumor_only(&mut ctx)?,
        };

        let ratio_sample = self.ratio_sample_name(mode)?;
        let ratio_file = ratio_file_path(output_dir, ratio_sample, self.config.compress_output);
        write_ratios(&ratio_file, &ratios)?;
        info!("Wrote {} ratios to {:?}", ratios.len(), ratio_file);

        let segmentation_outputs = match segmenter {
            Some(segmenter) => {
                let jobs = SegmentationJob::for_mode(
                    mode,
                    &ratio_file,
                    output_dir,
                    self.inputs.reference.as_ref().map(|s| s.name.as_str()),
                    self.inputs.tumor.as_ref().map(|s| s.name.as_str()),
                )?;
                run_segmentation(segmenter, &jobs, &pool)?
            }
            None => {
                info!("No segmentation program configured, skipping segmentation");
                vec![]
            }
        };

        Ok(RunSummary {
            mode,
            gender,
            aberrations,
            window_count: ratios.len(),
            ratio_file,
            side_files: ctx.side_files,
            segmentation_outputs,
        })
    }

    fn ratio_sample_name(&self, mode: RunMode) -> Result<&str, PipelineError> {
        let sample = if mode.has_tumor() {
            self.inputs.tumor.as_ref()
        } else {
            self.inputs.reference.as_ref()
        };
        sample
            .map(|s| s.name.as_str())
            .ok_or_else(|| PipelineError::MissingInput("sample name".to_string()))
    }

    fn prepare<'p>(&self, pool: &'p ThreadPool) -> Result<RunContext<'p>, PipelineError> {
        let codec = PositionCodec::new();
        let profile = read_gc_profile(&self.inputs.gc_profile, &codec)?;
        if profile.is_empty() {
            return Err(PipelineError::InvalidInput(format!(
                "GC profile {:?} holds no windows",
                self.inputs.gc_profile
            )));
        }
        check_window_grid(&profile, self.config.window_size)?;
        let chromosomes = profile_chromosomes(&profile);

        let targets = match &self.inputs.target_regions {
            Some(path) => Some(TargetRegions::new(&read_target_enrichment(path, &codec)?)),
            None => None,
        };

        Ok(RunContext {
            codec,
            profile,
            chromosomes,
            targets,
            pool,
            side_files: vec![],
        })
    }

    fn load_counts(
        &self,
        ctx: &RunContext<'_>,
        sample: &SampleInput,
    ) -> Result<Vec<ReadCountRecord>, PipelineError> {
        let source = TsvReadDepthSource::open(&sample.read_depths, &ctx.codec)?;
        let depths = collect_read_depths(&source, &ctx.chromosomes, ctx.pool)?;
        let counts = build_read_counts(&ctx.profile, &depths);
        info!("{}: {} windows", sample.name, counts.len());
        Ok(counts)
    }

    fn gc_ratios<F>(
        &self,
        ctx: &mut RunContext<'_>,
        sample: &str,
        counts: &[ReadCountRecord],
        include: F,
    ) -> Result<Vec<ReadRatio>, PipelineError>
    where
        F: Fn(&ReadCountRecord) -> bool,
    {
        let targets = ctx.targets.as_ref();
        let normalizer = GcBiasNormalizer::build_with_filter(
            counts,
            self.config.gc_bucket_range(),
            |record| include(record) && targets.is_none_or(|t| t.is_target(record)),
        );
        if normalizer.model().is_empty() {
            warn!("{}: no windows passed the GC filters, all ratios are unknown", sample);
        }

        let gc_median_file = gc_median_path(&self.inputs.output_dir, sample);
        write_gc_medians(&gc_median_file, normalizer.model())?;
        ctx.side_files.push(gc_median_file);

        let ratios = normalizer.normalize(counts);
        Ok(match targets {
            Some(targets) => targets.apply(&ratios),
            None => ratios,
        })
    }

    /// Reference GC ratios, gender, germline aberrations and diploid ratios.
    fn reference_ratios(
        &self,
        ctx: &mut RunContext<'_>,
        sample: &SampleInput,
        counts: &[ReadCountRecord],
    ) -> Result<(Vec<ReadRatio>, Vec<ReadRatio>, Gender, Vec<GermlineAberration>), PipelineError> {
        let gc = self.gc_ratios(ctx, &sample.name, counts, |_| true)?;

        let medians = median_ratios(&gc);
        let median_file = median_ratio_path(&self.inputs.output_dir, &sample.name);
        write_median_ratios(&median_file, &medians)?;
        ctx.side_files.push(median_file);

        let gender = Gender::from_median_ratios(&medians, self.config.male_x_ratio_cutoff);
        let aberrations =
            detect_germline_aberrations(&medians, gender, self.config.aberration_bounds());
        let diploid = diploid_ratios(&gc, gender, self.config.diploid_window())?;

        Ok((gc, diploid, gender, aberrations))
    }

    fn required(sample: &Option<SampleInput>, role: &str) -> Result<SampleInput, PipelineError> {
        sample
            .clone()
            .ok_or_else(|| PipelineError::MissingInput(format!("{} sample", role)))
    }

    fn tumor_normal_pair(
        &self,
        ctx: &mut RunContext<'_>,
    ) -> Result<ModeOutput, PipelineError> {
        let reference = Self::required(&self.inputs.reference, "reference")?;
        let tumor = Self::required(&self.inputs.tumor, "tumor")?;

        let reference_counts = self.load_counts(ctx, &reference)?;
        let tumor_counts = self.load_counts(ctx, &tumor)?;

        let (reference_gc, reference_diploid, gender, aberrations) =
            self.reference_ratios(ctx, &reference, &reference_counts)?;
        let tumor_gc = self.gc_ratios(ctx, &tumor.name, &tumor_counts, |_| true)?;

        let ratios = merge_ratios(&RatioInputs {
            reference_counts: Some(&reference_counts),
            tumor_counts: Some(&tumor_counts),
            reference_gc_ratios: Some(&reference_gc),
            tumor_gc_ratios: Some(&tumor_gc),
            reference_diploid_ratios: Some(&reference_diploid),
        })?;
        Ok((ratios, gender, aberrations))
    }

    fn germline_only(
        &self,
        ctx: &mut RunContext<'_>,
    ) -> Result<ModeOutput, PipelineError> {
        let reference = Self::required(&self.inputs.reference, "reference")?;
        let reference_counts = self.load_counts(ctx, &reference)?;

        let (reference_gc, reference_diploid, gender, aberrations) =
            self.reference_ratios(ctx, &reference, &reference_counts)?;

        let ratios = merge_ratios(&RatioInputs {
            reference_counts: Some(&reference_counts),
            reference_gc_ratios: Some(&reference_gc),
            reference_diploid_ratios: Some(&reference_diploid),
            ..Default::default()
        })?;
        Ok((ratios, gender, aberrations))
    }

    fn tumor_only(
        &self,
        ctx: &mut RunContext<'_>,
    ) -> Result<ModeOutput, PipelineError> {
        let tumor = Self::required(&self.inputs.tumor, "tumor")?;
        let bed = self.inputs.diploid_regions.as_ref().ok_or_else(|| {
            PipelineError::MissingInput("diploid region file".to_string())
        })?;

        let regions = DiploidRegions::from_regions(&read_bed_regions(bed)?);
        if regions.is_empty() {
            warn!("No diploid regions on known chromosomes in {:?}", bed);
        }

        let tumor_counts = self.load_counts(ctx, &tumor)?;
        let tumor_gc = self.gc_ratios(ctx, &tumor.name, &tumor_counts, |record| {
            regions.contains(&record.chromosome, record.position)
        })?;

        let gender = Gender::from_median_ratios(
            &median_ratios(&tumor_gc),
            self.config.male_x_ratio_cutoff,
        );
        let baseline = diploid_region_baseline(&tumor_counts, &regions, gender);

        let ratios = merge_ratios(&RatioInputs {
            tumor_counts: Some(&tumor_counts),
            tumor_gc_ratios: Some(&tumor_gc),
            reference_gc_ratios: Some(&baseline.gc_ratios),
            reference_diploid_ratios: Some(&baseline.diploid_ratios),
            ..Default::default()
        })?;
        Ok((ratios, gender, vec![]))
    }
}
