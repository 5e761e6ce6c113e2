//!
//! Common utilities used by the Real-time Bidding API samples.
//!
//! This crate aggregates:
//! - `error` — unified error type `SampleError`.
//! - `result` — handy `Result<T, SampleError>` alias.
//! - `value` — option types and coercion of raw arguments.
//! - `option` — declaration of a single command-line option.
//! - `parser` — resolves declared options from the command line.
//! - `config` — explicit configuration (service account key file, app name).
//! - `auth` — authenticated Real-time Bidding and Cloud Pub/Sub clients.
//! - `creative` — creative payloads and their console printer.
#![warn(missing_docs)]
pub mod auth;
pub mod config;
pub mod creative;
pub mod error;
pub mod option;
pub mod parser;
pub mod result;
pub mod value;

pub use config::SampleConfig;
pub use error::SampleError;
pub use option::CliOption;
pub use parser::{OptionParser, ParsedArgs};
pub use result::Result;
pub use value::{OptionType, OptionValue};
