use crate::constants::{
    BROTLI_EXTENSION, DEFAULT_BROTLI_LEVEL, DEFAULT_GZIP_LEVEL, GZIP_EXTENSION, MAX_BROTLI_LEVEL,
    MAX_GZIP_LEVEL,
};
use crate::error::{Result, SqueezeError};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// Compression algorithms that produce sibling artifacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Algorithm {
    Brotli,
    Gzip,
}

impl Algorithm {
    /// Suffix appended to the source path for this algorithm's artifact.
    pub fn extension(self) -> &'static str {
        match self {
            Algorithm::Brotli => BROTLI_EXTENSION,
            Algorithm::Gzip => GZIP_EXTENSION,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Algorithm::Brotli => "brotli",
            Algorithm::Gzip => "gzip",
        }
    }

    pub fn max_level(self) -> u32 {
        match self {
            Algorithm::Brotli => MAX_BROTLI_LEVEL,
            Algorithm::Gzip => MAX_GZIP_LEVEL,
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Algorithm {
    type Err = SqueezeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "br" | "brotli" => Ok(Algorithm::Brotli),
            "gz" | "gzip" => Ok(Algorithm::Gzip),
            _ => Err(SqueezeError::InvalidAlgorithm(s.trim().to_string())),
        }
    }
}

/// The set of artifacts to produce. Iteration order is fixed: Brotli, then gzip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AlgorithmSet {
    brotli: bool,
    gzip: bool,
}

impl AlgorithmSet {
    pub fn all() -> Self {
        Self {
            brotli: true,
            gzip: true,
        }
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn only(algorithm: Algorithm) -> Self {
        Self::none().with(algorithm)
    }

    pub fn with(mut self, algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Brotli => self.brotli = true,
            Algorithm::Gzip => self.gzip = true,
        }
        self
    }

    pub fn contains(&self, algorithm: Algorithm) -> bool {
        match algorithm {
            Algorithm::Brotli => self.brotli,
            Algorithm::Gzip => self.gzip,
        }
    }

    pub fn is_empty(&self) -> bool {
        !self.brotli && !self.gzip
    }

    pub fn iter(&self) -> impl Iterator<Item = Algorithm> + '_ {
        [Algorithm::Brotli, Algorithm::Gzip]
            .into_iter()
            .filter(move |algorithm| self.contains(*algorithm))
    }
}

impl FromStr for AlgorithmSet {
    type Err = SqueezeError;

    /// Parses a comma-separated list such as `br,gz`. Blank entries are ignored.
    fn from_str(s: &str) -> Result<Self> {
        s.split(',')
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .try_fold(AlgorithmSet::none(), |set, token| {
                Ok(set.with(token.parse::<Algorithm>()?))
            })
    }
}

impl fmt::Display for AlgorithmSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.iter().map(Algorithm::extension).collect();
        if names.is_empty() {
            write!(f, "none")
        } else {
            write!(f, "{}", names.join(","))
        }
    }
}

/// Immutable run configuration, validated once and shared read-only by all workers.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    pub root: PathBuf,
    pub algorithms: AlgorithmSet,
    pub brotli_level: u32,
    pub gzip_level: u32,
    pub minify: bool,
    pub optimize_images: bool,
    /// Worker count; `None` means one worker per CPU.
    pub threads: Option<usize>,
    pub show_progress: bool,
}

impl PipelineConfig {
    /// Builds a configuration with the default options for `root`.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        Self::builder(root).build()
    }

    pub fn builder(root: impl Into<PathBuf>) -> PipelineConfigBuilder {
        PipelineConfigBuilder::new(root.into())
    }

    pub fn level_for(&self, algorithm: Algorithm) -> u32 {
        match algorithm {
            Algorithm::Brotli => self.brotli_level,
            Algorithm::Gzip => self.gzip_level,
        }
    }

    pub fn worker_count(&self) -> usize {
        self.threads.unwrap_or_else(num_cpus::get).max(1)
    }
}

#[derive(Debug, Clone)]
pub struct PipelineConfigBuilder {
    root: PathBuf,
    algorithms: AlgorithmSet,
    brotli_level: u32,
    gzip_level: u32,
    minify: bool,
    optimize_images: bool,
    threads: Option<usize>,
    show_progress: bool,
}

impl PipelineConfigBuilder {
    fn new(root: PathBuf) -> Self {
        Self {
            root,
            algorithms: AlgorithmSet::all(),
            brotli_level: DEFAULT_BROTLI_LEVEL,
            gzip_level: DEFAULT_GZIP_LEVEL,
            minify: true,
            optimize_images: true,
            threads: None,
            show_progress: false,
        }
    }

    pub fn algorithms(mut self, algorithms: AlgorithmSet) -> Self {
        self.algorithms = algorithms;
        self
    }

    pub fn brotli_level(mut self, level: u32) -> Self {
        self.brotli_level = level;
        self
    }

    pub fn gzip_level(mut self, level: u32) -> Self {
        self.gzip_level = level;
        self
    }

    pub fn minify(mut self, enabled: bool) -> Self {
        self.minify = enabled;
        self
    }

    pub fn optimize_images(mut self, enabled: bool) -> Self {
        self.optimize_images = enabled;
        self
    }

    pub fn threads(mut self, threads: Option<usize>) -> Self {
        self.threads = threads;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Validates every option. Nothing on disk is modified here.
    pub fn build(self) -> Result<PipelineConfig> {
        validate_target_directory(&self.root)?;
        validate_level(Algorithm::Brotli, self.brotli_level)?;
        validate_level(Algorithm::Gzip, self.gzip_level)?;
        if let Some(threads) = self.threads.filter(|&t| t == 0) {
            return Err(SqueezeError::InvalidThreads(threads));
        }

        Ok(PipelineConfig {
            root: self.root,
            algorithms: self.algorithms,
            brotli_level: self.brotli_level,
            gzip_level: self.gzip_level,
            minify: self.minify,
            optimize_images: self.optimize_images,
            threads: self.threads,
            show_progress: self.show_progress,
        })
    }
}

/// Checks that the scan root exists and is a directory.
pub fn validate_target_directory(path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(SqueezeError::MissingDirectory);
    }
    if !path.exists() {
        return Err(SqueezeError::DirectoryNotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(SqueezeError::NotADirectory(path.to_path_buf()));
    }
    Ok(())
}

fn validate_level(algorithm: Algorithm, level: u32) -> Result<()> {
    if level > algorithm.max_level() {
        return Err(SqueezeError::InvalidLevel {
            algorithm: algorithm.name(),
            level,
            max: algorithm.max_level(),
        });
    }
    Ok(())
}
