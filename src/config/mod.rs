pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_file_name, validate_path, Validate};
use serde::{Deserialize, Serialize};

pub const DEFAULT_OUTPUT_PATH: &str = "./out";
pub const DEFAULT_OUTPUT_FILE: &str = "transactions.json";

fn validate_output(output_path: &str, output_file: &str) -> Result<()> {
    validate_path("output_path", output_path)?;
    validate_file_name("output_file", output_file, "json")?;
    Ok(())
}

/// Where the document goes, for embedders that do not use the CLI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub output_path: String,
    pub output_file: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            output_path: DEFAULT_OUTPUT_PATH.to_string(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        }
    }
}

impl ConfigProvider for OutputConfig {
    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_file(&self) -> &str {
        &self.output_file
    }
}

impl Validate for OutputConfig {
    fn validate(&self) -> Result<()> {
        validate_output(&self.output_path, &self.output_file)
    }
}

#[cfg(feature = "cli")]
pub use self::cli_config::CliConfig;

#[cfg(feature = "cli")]
mod cli_config {
    use super::*;
    use crate::config::toml_config::TomlConfig;
    use clap::Parser;
    use std::path::PathBuf;

    #[derive(Debug, Clone, Serialize, Deserialize, Parser)]
    #[command(name = "expenses-etl")]
    #[command(about = "Validate a bank transaction TSV file and save it as JSON")]
    pub struct CliConfig {
        /// TSV file to ingest
        pub input: PathBuf,

        /// Declared file name of the upload (defaults to the input's file name)
        #[arg(long)]
        pub file_name: Option<String>,

        /// Declared content type (defaults to one inferred from the file name)
        #[arg(long)]
        pub content_type: Option<String>,

        /// Output directory [default: ./out]
        #[arg(long)]
        pub output_path: Option<String>,

        /// Output file name [default: transactions.json]
        #[arg(long)]
        pub output_file: Option<String>,

        /// TOML configuration file; flags take precedence over its values
        #[arg(long)]
        pub config: Option<PathBuf>,

        #[arg(long, help = "Enable verbose output")]
        pub verbose: bool,

        #[arg(long, help = "Emit logs as JSON lines")]
        pub json_logs: bool,
    }

    impl CliConfig {
        /// Fill every setting not given on the command line from `toml`.
        pub fn apply_toml(&mut self, toml: &TomlConfig) {
            if self.output_path.is_none() {
                self.output_path = toml.output.path.clone();
            }
            if self.output_file.is_none() {
                self.output_file = toml.output.file.clone();
            }
            self.verbose |= toml.logging.verbose;
            self.json_logs |= toml.logging.json;
        }
    }

    impl ConfigProvider for CliConfig {
        fn output_path(&self) -> &str {
            self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
        }

        fn output_file(&self) -> &str {
            self.output_file.as_deref().unwrap_or(DEFAULT_OUTPUT_FILE)
        }
    }

    impl Validate for CliConfig {
        fn validate(&self) -> Result<()> {
            validate_output(self.output_path(), self.output_file())
        }
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_output_config_defaults() {
        let config = OutputConfig::default();
        assert_eq!(config.output_path(), "./out");
        assert_eq!(config.output_file(), "transactions.json");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_output_config_rejects_empty_path() {
        let config = OutputConfig {
            output_path: String::new(),
            output_file: DEFAULT_OUTPUT_FILE.to_string(),
        };
        assert!(config.validate().is_err());
    }
}
