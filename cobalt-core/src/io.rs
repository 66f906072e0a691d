//! Readers and writers for the tab-separated tables a run consumes and produces.
//!
//! Every reader encodes window positions through the run's [`PositionCodec`],
//! so a contig named inconsistently between two inputs fails here, before any
//! ratio is computed.

use std::io::BufRead;
use std::path::Path;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::chromosome::chromosome_ordinal;
use crate::codec::PositionCodec;
use crate::errors::CoreError;
use crate::models::{
    CobaltRatio, GcMedianReadDepth, GcProfileWindow, MedianRatio, ReadDepth, Region,
    TargetEnrichment,
};
use crate::utils::{finish_tsv, get_dynamic_reader, parse_bedlike_line, tsv_reader, tsv_writer};

/// Numeric mappability at or above this is treated as mappable.
pub const MIN_MAPPABILITY: f64 = 0.85;

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct ReadDepthRow {
    chromosome: String,
    position: i64,
    read_depth: f64,
    read_gc_content: f64,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct GcProfileRow {
    chromosome: String,
    position: i64,
    gc_content: f64,
    mappable: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct TargetRow {
    chromosome: String,
    position: i64,
    relative_enrichment: f64,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GcMedianRow {
    gc_bucket: u8,
    median_read_depth: f64,
    window_count: u64,
    sample_mean: f64,
    sample_median: f64,
}

fn file_label(path: &Path) -> String {
    path.display().to_string()
}

fn parse_mappable(value: &str) -> Option<bool> {
    match value.trim() {
        "true" | "TRUE" | "True" => Some(true),
        "false" | "FALSE" | "False" => Some(false),
        other => other.parse::<f64>().ok().map(|m| m >= MIN_MAPPABILITY),
    }
}

///
/// Read the depth table written by the counting collaborator.
///
/// Windows on contigs outside the canonical chromosome set are skipped.
///
pub fn read_depths(path: &Path, codec: &PositionCodec) -> Result<Vec<ReadDepth>, CoreError> {
    let mut reader = tsv_reader(path)?;
    let mut depths = Vec::new();
    let mut skipped = 0usize;

    for row in reader.deserialize::<ReadDepthRow>() {
        let row = row?;
        if chromosome_ordinal(&row.chromosome).is_none() {
            skipped += 1;
            continue;
        }
        let key = codec.encode(&row.chromosome, row.position)?;
        depths.push(ReadDepth {
            chromosome: row.chromosome,
            position: row.position,
            key,
            read_depth: row.read_depth,
            read_gc_content: row.read_gc_content,
        });
    }

    if skipped > 0 {
        debug!("Skipped {} depth windows on non-canonical contigs in {:?}", skipped, path);
    }
    depths.sort_by_key(|d| d.key);
    Ok(depths)
}

///
/// Read the static GC profile.
///
pub fn read_gc_profile(
    path: &Path,
    codec: &PositionCodec,
) -> Result<Vec<GcProfileWindow>, CoreError> {
    let mut reader = tsv_reader(path)?;
    let mut windows = Vec::new();

    for row in reader.deserialize::<GcProfileRow>() {
        let row = row?;
        if chromosome_ordinal(&row.chromosome).is_none() {
            debug!("Skipping GC profile window on {}", row.chromosome);
            continue;
        }
        let mappable = parse_mappable(&row.mappable).ok_or_else(|| CoreError::RecordParseError {
            file: file_label(path),
            message: format!("invalid mappable value '{}'", row.mappable),
        })?;
        let key = codec.encode(&row.chromosome, row.position)?;
        windows.push(GcProfileWindow {
            chromosome: row.chromosome,
            position: row.position,
            key,
            gc_content: row.gc_content,
            mappable,
        });
    }

    windows.sort_by_key(|w| w.key);
    info!("Loaded {} GC profile windows from {:?}", windows.len(), path);
    Ok(windows)
}

///
/// Read a BED file of diploid regions. Header, track and comment lines are ignored.
///
pub fn read_bed_regions(path: &Path) -> Result<Vec<Region>, CoreError> {
    let reader = get_dynamic_reader(path)?;
    let mut regions = Vec::new();

    for (line_num, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty()
            || line.starts_with('#')
            || line.starts_with("track")
            || line.starts_with("browser")
        {
            continue;
        }

        let (chr, start, end) =
            parse_bedlike_line(&line).ok_or_else(|| CoreError::RecordParseError {
                file: file_label(path),
                message: format!("line {} is not a BED record", line_num + 1),
            })?;

        regions.push(Region { chr, start, end });
    }

    info!("Loaded {} regions from {:?}", regions.len(), path);
    Ok(regions)
}

///
/// Read the per-window relative enrichment of a targeted panel.
///
/// Windows on contigs outside the canonical chromosome set are skipped.
///
pub fn read_target_enrichment(
    path: &Path,
    codec: &PositionCodec,
) -> Result<Vec<TargetEnrichment>, CoreError> {
    let mut reader = tsv_reader(path)?;
    let mut targets = Vec::new();

    for row in reader.deserialize::<TargetRow>() {
        let row = row?;
        if chromosome_ordinal(&row.chromosome).is_none() {
            debug!("Skipping target window on {}", row.chromosome);
            continue;
        }
        let key = codec.encode(&row.chromosome, row.position)?;
        targets.push(TargetEnrichment {
            chromosome: row.chromosome,
            position: row.position,
            key,
            relative_enrichment: row.relative_enrichment,
        });
    }

    targets.sort_by_key(|t| t.key);
    Ok(targets)
}

pub fn write_ratios(path: &Path, ratios: &[CobaltRatio]) -> Result<(), CoreError> {
    let mut writer = tsv_writer(path)?;
    for ratio in ratios {
        writer.serialize(ratio)?;
    }
    finish_tsv(writer)?;

    info!("Wrote {} ratio windows to {:?}", ratios.len(), path);
    Ok(())
}

///
/// Read back a ratio table, re-encoding every window key.
///
pub fn read_ratios(path: &Path, codec: &PositionCodec) -> Result<Vec<CobaltRatio>, CoreError> {
    let mut reader = tsv_reader(path)?;
    let mut ratios = Vec::new();

    for row in reader.deserialize::<CobaltRatio>() {
        let mut ratio = row?;
        ratio.key = codec.encode(&ratio.chromosome, ratio.position)?;
        ratios.push(ratio);
    }

    Ok(ratios)
}

pub fn write_median_ratios(path: &Path, medians: &[MedianRatio]) -> Result<(), CoreError> {
    let mut writer = tsv_writer(path)?;
    for median in medians {
        writer.serialize(median)?;
    }
    finish_tsv(writer)?;

    info!("Wrote median ratios for {} chromosomes to {:?}", medians.len(), path);
    Ok(())
}

pub fn read_median_ratios(path: &Path) -> Result<Vec<MedianRatio>, CoreError> {
    let mut reader = tsv_reader(path)?;
    let medians = reader
        .deserialize::<MedianRatio>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(medians)
}

pub fn write_gc_medians(path: &Path, model: &GcMedianReadDepth) -> Result<(), CoreError> {
    let mut writer = tsv_writer(path)?;
    for (bucket, stats) in &model.buckets {
        writer.serialize(GcMedianRow {
            gc_bucket: *bucket,
            median_read_depth: stats.median_read_depth,
            window_count: stats.window_count,
            sample_mean: model.sample_mean,
            sample_median: model.sample_median,
        })?;
    }
    finish_tsv(writer)?;

    info!("Wrote GC medians for {} buckets to {:?}", model.buckets.len(), path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::collections::BTreeMap;
    use std::fs;
    use tempfile::tempdir;

    use crate::models::{GcBucketStats, UNKNOWN};

    #[rstest]
    #[case("true", Some(true))]
    #[case("false", Some(false))]
    #[case("1", Some(true))]
    #[case("0", Some(false))]
    #[case("0.9", Some(true))]
    #[case("0.5", Some(false))]
    #[case("maybe", None)]
    fn test_parse_mappable(#[case] value: &str, #[case] expected: Option<bool>) {
        assert_eq!(parse_mappable(value), expected);
    }

    #[rstest]
    fn test_read_depths_sorts_and_skips_unknown_contigs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sample.depth.tsv");
        fs::write(
            &path,
            "chromosome\tposition\treadDepth\treadGcContent\n\
             chr2\t1001\t12.5\t0.41\n\
             chr1\t2001\t10\t0.5\n\
             chrUn_gl000220\t1\t3\t0.4\n\
             chr1\t1001\t0\t-1\n",
        )
        .unwrap();

        let codec = PositionCodec::new();
        let depths = read_depths(&path, &codec).unwrap();

        assert_eq!(depths.len(), 3);
        assert_eq!(depths[0].position, 1001);
        assert_eq!(depths[0].chromosome, "chr1");
        assert_eq!(depths[0].read_gc_content, UNKNOWN);
        assert_eq!(depths[2].chromosome, "chr2");
        assert_eq!(depths[2].read_depth, 12.5);
    }

    #[rstest]
    fn test_read_gc_profile_rejects_mixed_naming() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("gc_profile.tsv");
        fs::write(
            &path,
            "chromosome\tposition\tgcContent\tmappable\n\
             chr1\t1\t0.40\ttrue\n\
             1\t1001\t0.42\ttrue\n",
        )
        .unwrap();

        let result = read_gc_profile(&path, &PositionCodec::new());
        assert!(matches!(result, Err(CoreError::ChromosomeNameMismatch { .. })));
    }

    #[rstest]
    fn test_read_bed_regions() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("diploid.bed");
        fs::write(
            &path,
            "track name=diploid\n# comment\nchr1\t0\t50000\nchr2\t1000\t2000\textra\n",
        )
        .unwrap();

        let regions = read_bed_regions(&path).unwrap();
        assert_eq!(regions.len(), 2);
        assert_eq!(regions[1].chr, "chr2");
        assert_eq!(regions[1].end, 2000);
    }

    #[rstest]
    fn test_read_target_enrichment_skips_unknown_contigs() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("targets.tsv");
        fs::write(
            &path,
            "chromosome\tposition\trelativeEnrichment\n\
             chr2\t1001\t1.5\n\
             chrUn_gl000220\t1\t2.0\n\
             chr1\t5001\t0.8\n",
        )
        .unwrap();

        let codec = PositionCodec::new();
        let targets = read_target_enrichment(&path, &codec).unwrap();

        assert_eq!(targets.len(), 2);
        assert_eq!(targets[0].chromosome, "chr1");
        assert_eq!(targets[0].key, codec.encode("chr1", 5001).unwrap());
        assert_eq!(targets[0].relative_enrichment, 0.8);
        assert_eq!(targets[1].relative_enrichment, 1.5);
    }

    #[rstest]
    #[case("tumor.cobalt.ratio.tsv")]
    #[case("tumor.cobalt.ratio.tsv.gz")]
    fn test_ratio_table_round_trip(#[case] file_name: &str) {
        let dir = tempdir().unwrap();
        let path = dir.path().join(file_name);
        let codec = PositionCodec::new();

        let mut first = CobaltRatio::unknown("chr1", 1001, codec.encode("chr1", 1001).unwrap());
        first.reference_read_depth = 100.0;
        first.reference_gc_ratio = 1.0;
        first.reference_gc_diploid_ratio = 1.0;
        first.reference_gc_content = 0.5;
        let second = CobaltRatio::unknown("chrX", 1, codec.encode("chrX", 1).unwrap());

        write_ratios(&path, &[first.clone(), second.clone()]).unwrap();
        let ratios = read_ratios(&path, &codec).unwrap();

        assert_eq!(ratios, vec![first, second]);
    }

    #[rstest]
    fn test_ratio_table_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ratio.tsv");
        write_ratios(&path, &[CobaltRatio::unknown("1", 1, 1)]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let header = content.lines().next().unwrap();
        assert_eq!(
            header,
            "chromosome\tposition\treferenceReadDepth\ttumorReadDepth\treferenceGCRatio\t\
             tumorGCRatio\treferenceGCDiploidRatio\treferenceGCContent\ttumorGCContent"
        );
    }

    #[rstest]
    fn test_median_ratio_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ref.cobalt.ratio.median.tsv");
        let medians = vec![
            MedianRatio {
                chromosome: "chr1".to_string(),
                median_ratio: 1.01,
                count: 220_000,
            },
            MedianRatio {
                chromosome: "chrX".to_string(),
                median_ratio: 0.49,
                count: 150_000,
            },
        ];

        write_median_ratios(&path, &medians).unwrap();
        assert_eq!(read_median_ratios(&path).unwrap(), medians);
    }

    #[rstest]
    fn test_write_gc_medians() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ref.cobalt.gc.median.tsv");
        let mut buckets = BTreeMap::new();
        buckets.insert(
            40,
            GcBucketStats {
                median_read_depth: 80.0,
                window_count: 12,
            },
        );
        let model = GcMedianReadDepth {
            sample_mean: 90.0,
            sample_median: 85.0,
            buckets,
        };

        write_gc_medians(&path, &model).unwrap();
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(
            lines[0],
            "gcBucket\tmedianReadDepth\twindowCount\tsampleMean\tsampleMedian"
        );
        assert_eq!(lines[1], "40\t80.0\t12\t90.0\t85.0");
    }
}
