use crate::compress::write_artifact;
use crate::config::{Algorithm, PipelineConfig};
use crate::eligibility::classify;
use crate::error::{Result, SqueezeError};
use crate::formats::{AssetKind, Stage};
use crate::minify::Minifier;
use crate::optimize::ImageOptimizer;
use crate::utils::write_atomically;
use std::any::Any;
use std::fs;
use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// An in-place, best-effort rewrite of a file's bytes.
///
/// Implementations are pure byte transforms; reading the file, writing the
/// result back and isolating failures is the pipeline's job.
pub trait Transform: Send + Sync {
    /// Which stage this transform reports as.
    fn stage(&self) -> Stage;

    /// Whether the transform should run for a file of `kind`.
    fn applies_to(&self, kind: AssetKind) -> bool {
        kind.transforms().contains(&self.stage())
    }

    /// Returns the new content for `path`. Returning `input` unchanged is a no-op.
    fn apply(&self, path: &Path, kind: AssetKind, input: &[u8]) -> Result<Vec<u8>>;
}

/// What happened to one stage of one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StageOutcome {
    /// The stage produced output of `after` bytes from `before` bytes.
    Applied { before: u64, after: u64 },
    /// The stage ran but left the content as it was.
    Unchanged,
    /// The stage failed; the file keeps its previous bytes.
    Failed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageReport {
    pub stage: Stage,
    pub outcome: StageOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileStatus {
    /// Eligible and run through every enabled stage.
    Processed,
    /// Not a candidate; nothing was touched.
    Ineligible,
    /// The file could not be inspected or read.
    Unreadable(String),
}

/// Per-file outcome, produced once by [`Pipeline::process`].
///
/// `brotli_size`/`gzip_size` are zero when the artifact was not requested or
/// could not be written; [`FileResult::failed`] tells the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileResult {
    pub path: PathBuf,
    pub status: FileStatus,
    /// Size after all transforms, i.e. the bytes that were compressed.
    pub original_size: u64,
    pub brotli_size: u64,
    pub gzip_size: u64,
    pub stages: Vec<StageReport>,
}

impl FileResult {
    pub fn ineligible(path: &Path) -> Self {
        Self::empty(path, FileStatus::Ineligible)
    }

    pub fn unreadable(path: &Path, reason: String) -> Self {
        Self::empty(path, FileStatus::Unreadable(reason))
    }

    fn empty(path: &Path, status: FileStatus) -> Self {
        Self {
            path: path.to_path_buf(),
            status,
            original_size: 0,
            brotli_size: 0,
            gzip_size: 0,
            stages: Vec::new(),
        }
    }

    pub fn is_processed(&self) -> bool {
        self.status == FileStatus::Processed
    }

    pub fn outcome(&self, stage: Stage) -> Option<&StageOutcome> {
        self.stages
            .iter()
            .find(|report| report.stage == stage)
            .map(|report| &report.outcome)
    }

    pub fn failed(&self, stage: Stage) -> bool {
        matches!(self.outcome(stage), Some(StageOutcome::Failed(_)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (Stage, &str)> {
        self.stages.iter().filter_map(|report| match &report.outcome {
            StageOutcome::Failed(reason) => Some((report.stage, reason.as_str())),
            _ => None,
        })
    }

    pub fn has_errors(&self) -> bool {
        matches!(self.status, FileStatus::Unreadable(_)) || self.failures().next().is_some()
    }

    fn record(&mut self, stage: Stage, outcome: StageOutcome) {
        self.stages.push(StageReport { stage, outcome });
    }

    fn set_artifact_size(&mut self, algorithm: Algorithm, size: u64) {
        match algorithm {
            Algorithm::Brotli => self.brotli_size = size,
            Algorithm::Gzip => self.gzip_size = size,
        }
    }
}

fn compression_stage(algorithm: Algorithm) -> Stage {
    match algorithm {
        Algorithm::Brotli => Stage::Brotli,
        Algorithm::Gzip => Stage::Gzip,
    }
}

/// Runs `f`, turning a panic into a stage error.
fn guarded<T>(f: impl FnOnce() -> Result<T>) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f))
        .unwrap_or_else(|payload| Err(SqueezeError::StagePanicked(panic_reason(payload.as_ref()))))
}

fn panic_reason(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| s.to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

/// The per-file unit of work: classify, transform in order, compress.
///
/// Holds only immutable state, so one pipeline is shared by every worker.
pub struct Pipeline {
    config: PipelineConfig,
    transforms: Vec<Box<dyn Transform>>,
}

impl Pipeline {
    /// A pipeline with the minifier and image optimizer, each gated by its flag.
    pub fn new(config: PipelineConfig) -> Self {
        let mut transforms: Vec<Box<dyn Transform>> = Vec::new();
        if config.minify {
            transforms.push(Box::new(Minifier));
        }
        if config.optimize_images {
            transforms.push(Box::new(ImageOptimizer::default()));
        }
        Self::with_transforms(config, transforms)
    }

    /// A pipeline with an explicit, ordered transform list.
    pub fn with_transforms(config: PipelineConfig, transforms: Vec<Box<dyn Transform>>) -> Self {
        Self { config, transforms }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Processes one file. Never fails: every error is recorded on the result.
    ///
    /// A panic outside the guarded stages is reported as an unreadable file.
    pub fn process(&self, path: &Path) -> FileResult {
        panic::catch_unwind(AssertUnwindSafe(|| self.process_file(path))).unwrap_or_else(|payload| {
            let reason = panic_reason(payload.as_ref());
            warn!(path = %path.display(), error = %reason, "file processing panicked");
            FileResult::unreadable(path, format!("panicked: {}", reason))
        })
    }

    fn process_file(&self, path: &Path) -> FileResult {
        let kind = match classify(path, &self.config) {
            Ok(Some(kind)) => kind,
            Ok(None) => return FileResult::ineligible(path),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot inspect file");
                return FileResult::unreadable(path, e.to_string());
            }
        };

        let mut content = match fs::read(path) {
            Ok(content) => content,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "cannot read file");
                return FileResult::unreadable(path, e.to_string());
            }
        };

        let mut result = FileResult::empty(path, FileStatus::Processed);

        for transform in self.transforms.iter().filter(|t| t.applies_to(kind)) {
            let stage = transform.stage();
            let outcome = match self.run_transform(transform.as_ref(), path, kind, &content) {
                Ok(Some(output)) => {
                    let outcome = StageOutcome::Applied {
                        before: content.len() as u64,
                        after: output.len() as u64,
                    };
                    content = output;
                    outcome
                }
                Ok(None) => StageOutcome::Unchanged,
                Err(e) => StageOutcome::Failed(e.to_string()),
            };
            log_outcome(path, stage, &outcome);
            result.record(stage, outcome);
        }

        result.original_size = content.len() as u64;

        for algorithm in self.config.algorithms.iter() {
            let stage = compression_stage(algorithm);
            let level = self.config.level_for(algorithm);
            let outcome = match guarded(|| write_artifact(path, &content, algorithm, level)) {
                Ok(size) => {
                    result.set_artifact_size(algorithm, size);
                    StageOutcome::Applied {
                        before: result.original_size,
                        after: size,
                    }
                }
                Err(e) => StageOutcome::Failed(e.to_string()),
            };
            log_outcome(path, stage, &outcome);
            result.record(stage, outcome);
        }

        result
    }

    /// Applies one transform and writes its output back in place.
    ///
    /// Returns `Ok(None)` when the content did not change. On error the file
    /// on disk is left as it was.
    fn run_transform(
        &self,
        transform: &dyn Transform,
        path: &Path,
        kind: AssetKind,
        content: &[u8],
    ) -> Result<Option<Vec<u8>>> {
        let output = guarded(|| transform.apply(path, kind, content))?;
        if output == content {
            return Ok(None);
        }
        write_atomically(path, &output, path)?;
        Ok(Some(output))
    }
}

fn log_outcome(path: &Path, stage: Stage, outcome: &StageOutcome) {
    match outcome {
        StageOutcome::Applied { before, after } => {
            debug!(path = %path.display(), %stage, before, after, "stage applied")
        }
        StageOutcome::Unchanged => debug!(path = %path.display(), %stage, "stage left file unchanged"),
        StageOutcome::Failed(reason) => {
            warn!(path = %path.display(), %stage, error = %reason, "stage failed")
        }
    }
}
