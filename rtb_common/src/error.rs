//! Error types shared by the sample utilities and sample programs.
//!
//! The `SampleError` enum unifies option declaration, argument parsing,
//! authentication and I/O failures, so every helper can propagate a single
//! error type up to the sample's `main`.
use std::io;

use thiserror::Error;

/// Unified error type for the sample utilities.
#[derive(Error, Debug)]
pub enum SampleError {
    /// Malformed option declaration, duplicate declarations, or an unsupported
    /// API version.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A supplied value is not part of the option's allowed set.
    #[error("Invalid value '{value}'. Valid values are: '{}'", render_list(.valid_values))]
    Validation {
        /// The offending value, as typed by the user.
        value: String,
        /// The upper-cased allowed values.
        valid_values: Vec<String>,
    },

    /// A required option resolved to no value after defaulting.
    #[error(
        "You need to set '{name}', it is a required field. Set it by passing \
         '--{name} {}' as a command line argument or giving the corresponding \
         option a default value.",
        .name.to_uppercase()
    )]
    MissingRequiredOption {
        /// Long name of the option.
        name: String,
    },

    /// A raw argument could not be coerced to the option's declared type.
    #[error("Invalid value '{value}' for '--{option}': expected {expected}")]
    InvalidValue {
        /// Long name of the option.
        option: String,
        /// The raw argument.
        value: String,
        /// Name of the expected type.
        expected: String,
    },

    /// Usage error or help/version display requested through clap.
    #[error("{0}")]
    Cli(#[from] clap::Error),

    /// I/O error, e.g. while opening the service account key file.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Failure while decoding JSON via serde_json.
    #[error("JSON serialization/deserialization error: {0}")]
    SerdeJson(#[from] serde_json::Error),

    /// The credential provider failed to build credentials or fetch a token.
    #[error("Credentials error: {0}")]
    Credentials(String),
}

/// Renders values the way they are shown in help text: `["A", "B"]`.
pub(crate) fn render_list(values: &[String]) -> String {
    format!("{:?}", values)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_required_names_the_flag() {
        let err = SampleError::MissingRequiredOption {
            name: "account_id".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'account_id'"));
        assert!(msg.contains("'--account_id ACCOUNT_ID'"));
        assert!(msg.contains("default value"));
    }

    #[test]
    fn validation_lists_allowed_values() {
        let err = SampleError::Validation {
            value: "C".to_string(),
            valid_values: vec!["A".to_string(), "B".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'C'. Valid values are: '[\"A\", \"B\"]'"
        );
    }
}
