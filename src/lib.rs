pub mod batch;
pub mod cli;
pub mod compress;
pub mod config;
pub mod constants;
pub mod eligibility;
pub mod error;
pub mod formats;
pub mod logger;
pub mod minify;
pub mod optimize;
pub mod pipeline;
pub mod summary;
pub mod utils;

pub use batch::{collect_asset_files, process_all, run};
pub use config::{Algorithm, AlgorithmSet, PipelineConfig};
pub use eligibility::{classify, is_eligible};
pub use error::{Result, SqueezeError};
pub use formats::{AssetKind, ImageKind, Stage};
pub use minify::Minifier;
pub use optimize::{ImageOptimizer, ImageQuality};
pub use pipeline::{FileResult, FileStatus, Pipeline, StageOutcome, StageReport, Transform};
pub use summary::{reduce, Summary};
