use crate::config::{AlgorithmSet, PipelineConfig};
use crate::constants::{DEFAULT_ALGORITHMS, DEFAULT_BROTLI_LEVEL, DEFAULT_GZIP_LEVEL};
use crate::error::{Result, SqueezeError};
use crate::logger::Verbosity;
use clap::builder::BoolishValueParser;
use clap::{ArgAction, Parser};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "asset-squeeze",
    about = "Minify, re-encode and pre-compress static assets in place",
    long_about = "asset-squeeze walks a directory of static assets, minifies HTML/CSS/JS, \
                  re-encodes PNG/JPEG/WebP images and writes Brotli (.br) and gzip (.gz) \
                  siblings next to every compressible file, processing files in parallel. \
                  Every option can also be supplied through its INPUT_* environment variable.",
    version,
    after_help = "EXAMPLES:\n  \
    asset-squeeze ./dist\n  \
    asset-squeeze ./public -a gz --gzip-level 6\n  \
    asset-squeeze ./site --minify false --optimize-images false -j 4\n  \
    INPUT_DIRECTORY=./dist INPUT_ALGORITHMS=br asset-squeeze"
)]
pub struct Args {
    #[arg(
        env = "INPUT_DIRECTORY",
        help = "Directory to optimize",
        long_help = "Root directory to scan recursively. Eligible files are rewritten in place \
                     and get .br/.gz siblings."
    )]
    pub directory: Option<PathBuf>,

    #[arg(
        short = 'a',
        long,
        env = "INPUT_ALGORITHMS",
        default_value = DEFAULT_ALGORITHMS,
        help = "Comma-separated artifacts to produce (br, gz)",
        long_help = "Comma-separated list of compressed artifacts to write next to each file. \
                     Accepts br/brotli and gz/gzip. An empty list only runs the transforms."
    )]
    pub algorithms: String,

    #[arg(
        long,
        env = "INPUT_BROTLI_LEVEL",
        default_value_t = DEFAULT_BROTLI_LEVEL,
        help = "Brotli quality (0-11, default: 11)"
    )]
    pub brotli_level: u32,

    #[arg(
        long,
        env = "INPUT_GZIP_LEVEL",
        default_value_t = DEFAULT_GZIP_LEVEL,
        help = "Gzip compression level (0-9, default: 9)"
    )]
    pub gzip_level: u32,

    #[arg(
        long,
        env = "INPUT_MINIFY",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Minify HTML, CSS and JavaScript in place (true/false)"
    )]
    pub minify: bool,

    #[arg(
        long,
        env = "INPUT_OPTIMIZE_IMAGES",
        default_value_t = true,
        action = ArgAction::Set,
        value_parser = BoolishValueParser::new(),
        help = "Re-encode PNG, JPEG and WebP images in place (true/false)"
    )]
    pub optimize_images: bool,

    #[arg(
        short = 'j',
        long,
        env = "INPUT_THREADS",
        help = "Number of parallel workers (default: auto)",
        long_help = "Number of worker threads. If not specified, uses number of CPU cores."
    )]
    pub threads: Option<usize>,

    #[arg(short = 'q', long, help = "Only print warnings, errors and the summary")]
    pub quiet: bool,

    #[arg(short = 'v', long, conflicts_with = "quiet", help = "Log every stage of every file")]
    pub verbose: bool,
}

impl Args {
    pub fn verbosity(&self) -> Verbosity {
        Verbosity::from_flags(self.quiet, self.verbose)
    }

    /// Validates the arguments into an immutable run configuration.
    pub fn to_config(&self) -> Result<PipelineConfig> {
        let root = self
            .directory
            .clone()
            .ok_or(SqueezeError::MissingDirectory)?;
        let algorithms: AlgorithmSet = self.algorithms.parse()?;

        PipelineConfig::builder(root)
            .algorithms(algorithms)
            .brotli_level(self.brotli_level)
            .gzip_level(self.gzip_level)
            .minify(self.minify)
            .optimize_images(self.optimize_images)
            .threads(self.threads)
            .show_progress(!self.quiet)
            .build()
    }
}
