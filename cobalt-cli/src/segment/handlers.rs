use std::path::Path;

use anyhow::{Context, Result};
use clap::ArgMatches;
use log::info;

use cobalt_core::PositionCodec;
use cobalt_core::io::read_ratios;
use cobalt_pipeline::{
    ProcessSegmenter, RunMode, SegmentationConfig, SegmentationJob, build_pool, run_segmentation,
};

pub fn run_segment(matches: &ArgMatches) -> Result<()> {
    let ratio_file = matches
        .get_one::<String>("ratio-file")
        .context("--ratio-file is required")?;
    let output_dir = matches
        .get_one::<String>("output-dir")
        .context("--output-dir is required")?;
    let program = matches
        .get_one::<String>("segmenter")
        .context("--segmenter is required")?;
    let threads = *matches.get_one::<usize>("threads").unwrap_or(&2);

    let ratios = read_ratios(Path::new(ratio_file), &PositionCodec::new())
        .with_context(|| format!("Failed to read ratio table {}", ratio_file))?;
    let mode = RunMode::from_ratios(&ratios)?;
    info!("{} holds {} windows from a {} run", ratio_file, ratios.len(), mode);

    let jobs = SegmentationJob::for_mode(
        mode,
        Path::new(ratio_file),
        Path::new(output_dir),
        matches.get_one::<String>("reference").map(String::as_str),
        matches.get_one::<String>("tumor").map(String::as_str),
    )?;

    let segmenter = ProcessSegmenter::new(&SegmentationConfig {
        program: program.clone(),
        args: matches
            .get_many::<String>("segmenter-arg")
            .map(|args| args.cloned().collect())
            .unwrap_or_default(),
    });

    let pool = build_pool(threads)?;
    for output in run_segmentation(&segmenter, &jobs, &pool)? {
        info!("Segments written to {:?}", output);
    }

    Ok(())
}
