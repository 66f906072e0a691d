use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::{info, warn};

use cobalt_pipeline::{CobaltConfig, RatioPipeline, RunInputs, SampleInput, SegmentationConfig};

/// Config file values, then any tuning flag given on the command line.
pub fn resolve_config(matches: &ArgMatches) -> Result<CobaltConfig> {
    let mut config = match matches.get_one::<String>("config") {
        Some(path) => CobaltConfig::from_toml_file(Path::new(path))
            .with_context(|| format!("Failed to load config {}", path))?,
        None => CobaltConfig::default(),
    };

    if let Some(threads) = matches.get_one::<usize>("threads") {
        config.threads = *threads;
    }
    if let Some(min) = matches.get_one::<u8>("gc-bucket-min") {
        config.gc_bucket_min = *min;
    }
    if let Some(max) = matches.get_one::<u8>("gc-bucket-max") {
        config.gc_bucket_max = *max;
    }
    if let Some(distance) = matches.get_one::<usize>("max-window-distance") {
        config.max_window_distance = *distance;
    }
    if let Some(coverage) = matches.get_one::<usize>("min-window-coverage") {
        config.min_window_coverage = *coverage;
    }
    if matches.get_flag("no-compress") {
        config.compress_output = false;
    }

    config.validate()?;
    Ok(config)
}

fn sample(matches: &ArgMatches, name: &str, depth: &str) -> Option<SampleInput> {
    let name = matches.get_one::<String>(name)?;
    let depth = matches.get_one::<String>(depth)?;
    Some(SampleInput {
        name: name.clone(),
        read_depths: PathBuf::from(depth),
    })
}

pub fn resolve_inputs(matches: &ArgMatches) -> Result<RunInputs> {
    let gc_profile = matches
        .get_one::<String>("gc-profile")
        .context("--gc-profile is required")?;
    let output_dir = matches
        .get_one::<String>("output-dir")
        .context("--output-dir is required")?;

    let mut inputs = RunInputs::new(PathBuf::from(gc_profile), PathBuf::from(output_dir));
    inputs.reference = sample(matches, "reference", "reference-depth");
    inputs.tumor = sample(matches, "tumor", "tumor-depth");
    inputs.diploid_regions = matches.get_one::<String>("diploid-bed").map(PathBuf::from);
    inputs.target_regions = matches.get_one::<String>("target-regions").map(PathBuf::from);
    inputs.segmentation = matches
        .get_one::<String>("segmenter")
        .map(|program| SegmentationConfig {
            program: program.clone(),
            args: matches
                .get_many::<String>("segmenter-arg")
                .map(|args| args.cloned().collect())
                .unwrap_or_default(),
        });

    Ok(inputs)
}

pub fn run_ratios(matches: &ArgMatches) -> Result<()> {
    let config = resolve_config(matches)?;
    let inputs = resolve_inputs(matches)?;

    let summary = RatioPipeline::new(&config, &inputs)?
        .run()
        .context("Ratio computation failed")?;

    info!(
        "{} run complete: {} windows written to {:?}, gender {}",
        summary.mode,
        summary.window_count,
        summary.ratio_file,
        summary.gender
    );
    for aberration in &summary.aberrations {
        warn!(
            "Germline {} on {} (observed {:.3}, expected {:.2})",
            aberration.kind, aberration.chromosome, aberration.observed, aberration.expected
        );
    }
    for output in &summary.segmentation_outputs {
        info!("Segments written to {:?}", output);
    }

    Ok(())
}
