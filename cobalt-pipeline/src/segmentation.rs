//! External piecewise-constant segmentation of ratio columns.
//!
//! The segmenter is a separate program called as
//! `<program> [args...] <ratio file> <column> <output>`; any exit status
//! other than zero fails the run.

use std::path::{Path, PathBuf};
use std::process::Command;

use log::info;
use rayon::ThreadPool;
use rayon::prelude::*;

use crate::config::SegmentationConfig;
use crate::errors::PipelineError;
use crate::mode::RunMode;

pub const REFERENCE_COLUMN: &str = "referenceGCDiploidRatio";
pub const TUMOR_COLUMN: &str = "tumorGCRatio";

#[derive(Debug, Clone, PartialEq)]
pub struct SegmentationJob {
    pub ratio_file: PathBuf,
    pub column: String,
    pub output: PathBuf,
}

impl SegmentationJob {
    ///
    /// Jobs a run of `mode` segments: the reference diploid column and/or
    /// the tumor GC column, each to `<sample>.cobalt.ratio.pcf`.
    ///
    pub fn for_mode(
        mode: RunMode,
        ratio_file: &Path,
        output_dir: &Path,
        reference: Option<&str>,
        tumor: Option<&str>,
    ) -> Result<Vec<SegmentationJob>, PipelineError> {
        let mut jobs = Vec::with_capacity(2);

        if mode.has_reference() {
            let name = reference.ok_or_else(|| {
                PipelineError::MissingInput("reference sample name for segmentation".to_string())
            })?;
            jobs.push(SegmentationJob {
                ratio_file: ratio_file.to_path_buf(),
                column: REFERENCE_COLUMN.to_string(),
                output: pcf_path(output_dir, name),
            });
        }

        if mode.has_tumor() {
            let name = tumor.ok_or_else(|| {
                PipelineError::MissingInput("tumor sample name for segmentation".to_string())
            })?;
            jobs.push(SegmentationJob {
                ratio_file: ratio_file.to_path_buf(),
                column: TUMOR_COLUMN.to_string(),
                output: pcf_path(output_dir, name),
            });
        }

        Ok(jobs)
    }
}

pub fn pcf_path(output_dir: &Path, sample: &str) -> PathBuf {
    output_dir.join(format!("{}.cobalt.ratio.pcf", sample))
}

pub trait Segmenter: Sync {
    fn segment(&self, job: &SegmentationJob) -> Result<(), PipelineError>;
}

/// Runs the segmentation program as a child process.
#[derive(Debug, Clone)]
pub struct ProcessSegmenter {
    program: String,
    args: Vec<String>,
}

impl ProcessSegmenter {
    pub fn new(config: &SegmentationConfig) -> Self {
        Self {
            program: config.program.clone(),
            args: config.args.clone(),
        }
    }
}

impl Segmenter for ProcessSegmenter {
    fn segment(&self, job: &SegmentationJob) -> Result<(), PipelineError> {
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(&job.ratio_file)
            .arg(&job.column)
            .arg(&job.output)
            .output()
            .map_err(|source| PipelineError::SegmentationLaunch {
                program: self.program.clone(),
                source,
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let status = if stderr.is_empty() {
                format!("exit status {}", output.status)
            } else {
                format!("exit status {}: {}", output.status, stderr)
            };
            return Err(PipelineError::SegmentationFailed {
                column: job.column.clone(),
                output: job.output.display().to_string(),
                status,
            });
        }

        Ok(())
    }
}

///
/// Run every job concurrently on the pool and wait for all of them. The run
/// succeeds only when every job exits cleanly.
///
pub fn run_segmentation<S: Segmenter + ?Sized>(
    segmenter: &S,
    jobs: &[SegmentationJob],
    pool: &ThreadPool,
) -> Result<Vec<PathBuf>, PipelineError> {
    let results: Vec<Result<PathBuf, PipelineError>> = pool.install(|| {
        jobs.par_iter()
            .map(|job| {
                info!("Segmenting {} into {:?}", job.column, job.output);
                segmenter.segment(job)?;
                info!("Finished segmentation of {}", job.column);
                Ok(job.output.clone())
            })
            .collect()
    });

    results.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::*;
    use std::sync::Mutex;

    struct RecordingSegmenter {
        seen: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl Segmenter for RecordingSegmenter {
        fn segment(&self, job: &SegmentationJob) -> Result<(), PipelineError> {
            if let Ok(mut seen) = self.seen.lock() {
                seen.push(job.column.clone());
            }
            if self.fail_on == Some(job.column.as_str()) {
                return Err(PipelineError::SegmentationFailed {
                    column: job.column.clone(),
                    output: job.output.display().to_string(),
                    status: "exit status 1".to_string(),
                });
            }
            Ok(())
        }
    }

    #[fixture]
    fn pool() -> ThreadPool {
        rayon::ThreadPoolBuilder::new().num_threads(2).build().unwrap()
    }

    fn jobs(mode: RunMode) -> Vec<SegmentationJob> {
        SegmentationJob::for_mode(
            mode,
            Path::new("out/TUMOR.cobalt.ratio.tsv.gz"),
            Path::new("out"),
            Some("NORMAL"),
            Some("TUMOR"),
        )
        .unwrap()
    }

    #[rstest]
    #[case(RunMode::TumorNormalPair, vec![REFERENCE_COLUMN, TUMOR_COLUMN])]
    #[case(RunMode::GermlineOnly, vec![REFERENCE_COLUMN])]
    #[case(RunMode::TumorOnly, vec![TUMOR_COLUMN])]
    fn test_jobs_per_mode(#[case] mode: RunMode, #[case] columns: Vec<&str>) {
        let jobs = jobs(mode);
        assert_eq!(jobs.iter().map(|j| j.column.as_str()).collect::<Vec<_>>(), columns);
    }

    #[rstest]
    fn test_pair_outputs_are_named_by_sample() {
        let jobs = jobs(RunMode::TumorNormalPair);
        assert_eq!(jobs[0].output, PathBuf::from("out/NORMAL.cobalt.ratio.pcf"));
        assert_eq!(jobs[1].output, PathBuf::from("out/TUMOR.cobalt.ratio.pcf"));
    }

    #[rstest]
    fn test_both_jobs_run(pool: ThreadPool) {
        let segmenter = RecordingSegmenter {
            seen: Mutex::new(vec![]),
            fail_on: None,
        };
        let outputs = run_segmentation(&segmenter, &jobs(RunMode::TumorNormalPair), &pool).unwrap();
        assert_eq!(outputs.len(), 2);

        let mut seen = segmenter.seen.into_inner().unwrap();
        seen.sort();
        assert_eq!(seen, vec![REFERENCE_COLUMN.to_string(), TUMOR_COLUMN.to_string()]);
    }

    #[rstest]
    fn test_one_failure_fails_the_run(pool: ThreadPool) {
        let segmenter = RecordingSegmenter {
            seen: Mutex::new(vec![]),
            fail_on: Some(TUMOR_COLUMN),
        };
        let result = run_segmentation(&segmenter, &jobs(RunMode::TumorNormalPair), &pool);

        assert!(matches!(result, Err(PipelineError::SegmentationFailed { .. })));
        assert_eq!(segmenter.seen.into_inner().unwrap().len(), 2);
    }

    #[rstest]
    fn test_missing_program_is_a_launch_error() {
        let segmenter = ProcessSegmenter::new(&SegmentationConfig {
            program: "cobalt-no-such-segmenter".to_string(),
            args: vec![],
        });
        let job = &jobs(RunMode::TumorOnly)[0];
        assert!(matches!(
            segmenter.segment(job),
            Err(PipelineError::SegmentationLaunch { .. })
        ));
    }
}
