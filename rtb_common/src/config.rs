//! Configuration shared by the sample programs.
//!
//! The service account key file is passed around explicitly instead of living
//! in a process-wide constant. Samples usually expose it on the command line
//! through `SampleConfig::key_file_option` and build the config from the parsed
//! arguments.
use std::path::PathBuf;

use crate::error::SampleError;
use crate::option::CliOption;
use crate::parser::ParsedArgs;
use crate::result::Result;

/// Placeholder path for the JSON key file of the service account.
pub const DEFAULT_KEY_FILE: &str = "path_to_key";
/// Name of the option carrying the key file path.
pub const KEY_FILE_OPTION: &str = "key_file";
/// Version reported alongside the application name.
pub const APPLICATION_VERSION: &str = "1.0.0";

/// Settings needed to construct authenticated API clients.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SampleConfig {
    /// JSON file containing the service account's private key.
    pub key_file: PathBuf,
    /// Application name sent with every request.
    pub application_name: String,
    /// Application version sent with every request.
    pub application_version: String,
}

impl SampleConfig {
    /// Config for `key_file`, named after the running program.
    pub fn new(key_file: impl Into<PathBuf>) -> Self {
        Self {
            key_file: key_file.into(),
            application_name: format!("Rust Real-Time Bidding API samples: {}", program()),
            application_version: APPLICATION_VERSION.to_string(),
        }
    }

    /// `--key_file` / `-k` option with `DEFAULT_KEY_FILE` as default.
    pub fn key_file_option() -> Result<CliOption> {
        CliOption::builder(
            KEY_FILE_OPTION,
            "Path to the JSON file containing the private key of your service account.",
        )
        .short('k')
        .required(true)
        .default_value(DEFAULT_KEY_FILE)
        .build()
    }

    /// Builds the config from arguments parsed with `key_file_option` declared.
    pub fn from_args(args: &ParsedArgs) -> Result<Self> {
        let key_file = args.require_str(KEY_FILE_OPTION)?;
        if key_file.trim().is_empty() {
            return Err(SampleError::InvalidArgument(
                "The key file path must not be empty.".to_string(),
            ));
        }
        Ok(Self::new(key_file.trim()))
    }
}

fn program() -> String {
    std::env::args().next().unwrap_or_default()
}
