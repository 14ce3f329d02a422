use crate::config::{validate_target_directory, PipelineConfig};
use crate::constants::PROGRESS_TEMPLATE;
use crate::eligibility::is_eligible;
use crate::error::{Result, SqueezeError};
use crate::pipeline::{FileResult, Pipeline};
use crate::summary::{reduce, Summary};
use indicatif::{ProgressBar, ProgressStyle};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{info, warn};
use walkdir::WalkDir;

/// Recursively collects every eligible file under `root`.
///
/// Symlinks are not followed. Entries within a directory are visited in file
/// name order, so a given snapshot always yields the same list. Unreadable
/// entries below the root are logged and skipped.
///
/// # Returns
/// * `Ok(paths)` - Candidate files, each listed once
/// * `Err(SqueezeError)` - If `root` itself is missing or not a directory
pub fn collect_asset_files(root: &Path, config: &PipelineConfig) -> Result<Vec<PathBuf>> {
    validate_target_directory(root)?;

    let mut files = Vec::new();
    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                warn!(error = %e, "skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && is_eligible(entry.path(), config) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

/// Processes every path on a pool of `config.worker_count()` threads.
///
/// Blocks until all files are done and returns exactly one result per input
/// path, in input order. A failing file never affects the others.
pub fn process_all(paths: &[PathBuf], pipeline: &Pipeline) -> Result<Vec<FileResult>> {
    let config = pipeline.config();
    let workers = config.worker_count().min(paths.len().max(1));

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(workers)
        .thread_name(|i| format!("squeeze-worker-{}", i))
        .build()
        .map_err(|e| SqueezeError::ThreadPool(e.to_string()))?;

    let progress = if config.show_progress {
        let bar = ProgressBar::new(paths.len() as u64);
        if let Ok(style) = ProgressStyle::default_bar().template(PROGRESS_TEMPLATE) {
            bar.set_style(style.progress_chars("#>-"));
        }
        bar
    } else {
        ProgressBar::hidden()
    };

    let results: Vec<FileResult> = pool.install(|| {
        paths
            .par_iter()
            .map(|path| {
                let result = pipeline.process(path);
                progress.inc(1);
                result
            })
            .collect()
    });

    progress.finish_and_clear();
    Ok(results)
}

/// Runs the whole batch for `config`: scan, process in parallel, aggregate.
///
/// Only configuration problems are returned as errors; per-file failures are
/// logged and reflected in [`Summary::files_with_errors`].
pub fn run(config: &PipelineConfig) -> Result<Summary> {
    info!(
        root = %config.root.display(),
        algorithms = %config.algorithms,
        brotli_level = config.brotli_level,
        gzip_level = config.gzip_level,
        minify = config.minify,
        optimize_images = config.optimize_images,
        workers = config.worker_count(),
        "starting asset optimization"
    );

    let start_time = Instant::now();

    let files = collect_asset_files(&config.root, config)?;
    if files.is_empty() {
        info!("no eligible files found");
        return Ok(Summary::default());
    }
    info!(files = files.len(), "found eligible files");

    let pipeline = Pipeline::new(config.clone());
    let results = process_all(&files, &pipeline)?;

    for result in results.iter().filter(|r| r.has_errors()) {
        let stages: Vec<String> = result.failures().map(|(stage, _)| stage.to_string()).collect();
        warn!(path = %result.path.display(), failed = ?stages, "file finished with errors");
    }

    let summary = reduce(&results);
    info!(
        files = summary.files_processed,
        original = summary.total_original,
        brotli = summary.total_brotli,
        gzip = summary.total_gzip,
        errors = summary.files_with_errors,
        elapsed = ?start_time.elapsed(),
        "asset optimization complete"
    );

    Ok(summary)
}
