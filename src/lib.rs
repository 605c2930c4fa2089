pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{cli::LocalStorage, toml_config::TomlConfig, OutputConfig};
pub use core::{etl::IngestEngine, pipeline::TsvPipeline};
pub use domain::model::{IngestOutcome, Rejection, Transaction, TransactionBatch, Validation};
pub use domain::upload::{InMemoryUpload, LocalUpload};
pub use utils::error::{IngestError, Result};
