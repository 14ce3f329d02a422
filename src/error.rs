use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqueezeError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("WebP encoding error: {0}")]
    WebPEncoding(String),

    #[error("Minification failed: {0}")]
    Minify(String),

    #[error("File is not valid UTF-8 text: {0}")]
    InvalidUtf8(PathBuf),

    #[error("{algorithm} compression failed: {reason}")]
    Compression {
        algorithm: &'static str,
        reason: String,
    },

    #[error("Invalid image dimensions: {0}x{1}. Maximum allowed: {2}x{2}")]
    InvalidDimensions(u32, u32, u32),

    #[error("File too large: {0} bytes. Maximum allowed: {1} bytes")]
    FileTooLarge(u64, u64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("Stage panicked: {0}")]
    StagePanicked(String),

    #[error("Target directory is required (pass DIRECTORY or set INPUT_DIRECTORY)")]
    MissingDirectory,

    #[error("Directory not found: {0}")]
    DirectoryNotFound(PathBuf),

    #[error("Not a directory: {0}")]
    NotADirectory(PathBuf),

    #[error("Unknown compression algorithm: {0:?}. Expected br or gz")]
    InvalidAlgorithm(String),

    #[error("Invalid {algorithm} level: {level}. Must be between 0 and {max}")]
    InvalidLevel {
        algorithm: &'static str,
        level: u32,
        max: u32,
    },

    #[error("Invalid thread count: {0}. Must be at least 1")]
    InvalidThreads(usize),

    #[error("Failed to build worker pool: {0}")]
    ThreadPool(String),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

impl SqueezeError {
    /// Errors raised before any file is touched; these abort the run.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            SqueezeError::MissingDirectory
                | SqueezeError::DirectoryNotFound(_)
                | SqueezeError::NotADirectory(_)
                | SqueezeError::InvalidAlgorithm(_)
                | SqueezeError::InvalidLevel { .. }
                | SqueezeError::InvalidThreads(_)
                | SqueezeError::ThreadPool(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, SqueezeError>;
