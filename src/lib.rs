pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use app::{run, RunOptions};
pub use config::{EnvSecrets, ReportConfig};
pub use crate::core::{engine::ReportEngine, pipeline::MarketReportPipeline};
pub use domain::model::{RunOutcome, RunSummary};
pub use utils::error::{DigestError, Result};
