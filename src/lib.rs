pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::{cli::LocalStorage, CliConfig, JobConfig, OutputFormat};
pub use core::{etl::EtlEngine, pipeline::ListingPipeline};
pub use utils::error::{EtlError, Result};
