use crate::constants::{SUCCESS_PREFIX, SUMMARY_PREFIX, WARNING_PREFIX};
use crate::pipeline::{FileResult, FileStatus};
use crate::utils::{calculate_compression_ratio, format_file_size};
use std::fmt;

/// Aggregate totals for one run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Results with status `Processed`, including files minified to zero bytes.
    pub files_processed: u64,
    pub total_original: u64,
    pub total_brotli: u64,
    pub total_gzip: u64,
    /// Files with at least one failed stage, or that could not be read.
    pub files_with_errors: u64,
    /// Ineligible or unreadable files that contributed nothing.
    pub files_skipped: u64,
}

impl Summary {
    /// Folds one result into the totals.
    pub fn add(&mut self, result: &FileResult) {
        match result.status {
            FileStatus::Processed => {
                self.files_processed += 1;
                self.total_original += result.original_size;
                self.total_brotli += result.brotli_size;
                self.total_gzip += result.gzip_size;
            }
            FileStatus::Ineligible | FileStatus::Unreadable(_) => self.files_skipped += 1,
        }
        if result.has_errors() {
            self.files_with_errors += 1;
        }
    }

    /// Combines two partial summaries.
    pub fn merge(self, other: Summary) -> Summary {
        Summary {
            files_processed: self.files_processed + other.files_processed,
            total_original: self.total_original + other.total_original,
            total_brotli: self.total_brotli + other.total_brotli,
            total_gzip: self.total_gzip + other.total_gzip,
            files_with_errors: self.files_with_errors + other.files_with_errors,
            files_skipped: self.files_skipped + other.files_skipped,
        }
    }

    pub fn brotli_ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_original, self.total_brotli)
    }

    pub fn gzip_ratio(&self) -> f64 {
        calculate_compression_ratio(self.total_original, self.total_gzip)
    }
}

/// Reduces per-file results into a [`Summary`]. Order does not matter.
pub fn reduce<'a, I>(results: I) -> Summary
where
    I: IntoIterator<Item = &'a FileResult>,
{
    results.into_iter().fold(Summary::default(), |mut summary, result| {
        summary.add(result);
        summary
    })
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} Asset Optimization Summary:", SUMMARY_PREFIX)?;
        writeln!(f, "  📁 Files processed: {}", self.files_processed)?;
        writeln!(
            f,
            "  📊 Total original size: {} bytes ({})",
            self.total_original,
            format_file_size(self.total_original)
        )?;
        if self.total_brotli > 0 {
            writeln!(
                f,
                "  🗜️  Total Brotli size: {} bytes ({}, {:.1}% smaller)",
                self.total_brotli,
                format_file_size(self.total_brotli),
                self.brotli_ratio()
            )?;
        } else {
            writeln!(f, "  🗜️  Total Brotli size: 0 bytes")?;
        }
        if self.total_gzip > 0 {
            writeln!(
                f,
                "  🗜️  Total gzip size: {} bytes ({}, {:.1}% smaller)",
                self.total_gzip,
                format_file_size(self.total_gzip),
                self.gzip_ratio()
            )?;
        } else {
            writeln!(f, "  🗜️  Total gzip size: 0 bytes")?;
        }
        if self.files_with_errors > 0 {
            write!(
                f,
                "  {}  Files with errors: {} (see log for details)",
                WARNING_PREFIX, self.files_with_errors
            )
        } else {
            write!(f, "  {} No errors", SUCCESS_PREFIX)
        }
    }
}
