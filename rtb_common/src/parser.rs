//! Argument parsing for a set of declared `CliOption`s.
//!
//! `OptionParser` turns the declarations into one parse rule each (flag spec,
//! validation, storage of the value under the option's symbolic key) and runs
//! them through a clap `Command`. Once the arguments are consumed, options that
//! were not given fall back to their default, and required options that still
//! have no value fail the parse.
//!
//! Usage:
//! ```no_run
//! use rtb_common::{CliOption, OptionParser};
//!
//! # fn main() -> rtb_common::Result<()> {
//! let options = vec![
//!     CliOption::builder("account_id", "The resource ID of the bidder.")
//!         .short('a')
//!         .required(true)
//!         .build()?,
//!     CliOption::builder("region", "Region of the bidder.")
//!         .default_value("us-central1")
//!         .build()?,
//! ];
//! let mut argv: Vec<String> = std::env::args().skip(1).collect();
//! let parsed = OptionParser::new(options)?.parse(&mut argv)?;
//! println!("{:?}", parsed.get_str("account_id"));
//! # Ok(())
//! # }
//! ```
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use clap::{Arg, ArgAction, ArgMatches, Command};
use log::debug;

use crate::error::SampleError;
use crate::option::{CliOption, FlagSpec};
use crate::result::Result;
use crate::value::OptionValue;

/// Id of the hidden positional that collects unrecognized positional
/// arguments. Option names never contain whitespace, so it cannot collide.
const REMAINING_ID: &str = "remaining args";

/// Name used in usage output when the program name cannot be determined.
const FALLBACK_PROGRAM_NAME: &str = "sample";

/// One entry of the parse table.
#[derive(Debug)]
struct ParseRule {
    spec: FlagSpec,
    option: CliOption,
}

impl ParseRule {
    fn new(option: CliOption) -> Self {
        Self {
            spec: option.flag_spec(),
            option,
        }
    }

    /// Stores the last resolved occurrence under the option's symbolic key.
    /// Every occurrence has already been coerced and validated by clap.
    fn apply(&self, matches: &ArgMatches, parsed: &mut BTreeMap<String, Option<OptionValue>>) {
        let Some(values) = matches.get_many::<OptionValue>(self.option.name()) else {
            return;
        };
        if let Some(value) = values.last() {
            debug!("{} = {}", self.spec.long, value);
            parsed.insert(self.option.symbolic_key().to_string(), Some(value.clone()));
        }
    }
}

/// Parses arguments for the given options.
#[derive(Debug)]
pub struct OptionParser {
    rules: Vec<ParseRule>,
    command: Command,
    parsed_args: BTreeMap<String, Option<OptionValue>>,
}

impl OptionParser {
    /// Builds a parser for `options`, in declaration order.
    ///
    /// Fails with `InvalidArgument` if two options share a name or a short
    /// alias.
    pub fn new(options: Vec<CliOption>) -> Result<Self> {
        let mut names = HashSet::new();
        let mut shorts = HashSet::new();
        for option in &options {
            if !names.insert(option.name().to_string()) {
                return Err(SampleError::InvalidArgument(format!(
                    "The option '--{}' is declared more than once.",
                    option.name()
                )));
            }
            if let Some(short) = option.short() {
                if !shorts.insert(short) {
                    return Err(SampleError::InvalidArgument(format!(
                        "The short alias '-{}' is declared more than once.",
                        short
                    )));
                }
            }
        }

        let mut command = Command::new(program_name())
            .no_binary_name(true)
            .arg(
                Arg::new(REMAINING_ID)
                    .num_args(0..)
                    .action(ArgAction::Append)
                    .hide(true),
            );
        let mut rules = Vec::with_capacity(options.len());
        for option in options {
            command = command.arg(option.to_arg());
            rules.push(ParseRule::new(option));
        }

        Ok(Self {
            rules,
            command,
            parsed_args: BTreeMap::new(),
        })
    }

    /// Overrides the program name shown in usage output.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.command = self.command.name(name.into());
        self
    }

    /// Sets the description shown at the top of `--help`.
    pub fn with_about(mut self, about: impl Into<String>) -> Self {
        self.command = self.command.about(about.into());
        self
    }

    /// Renders the usage/help text.
    pub fn render_help(&mut self) -> String {
        self.command.render_help().to_string()
    }

    /// Consumes `args` (without the program name) and resolves every declared
    /// option.
    ///
    /// Recognized flags and their values are removed from `args`; positional
    /// arguments are left in it.
    pub fn parse(mut self, args: &mut Vec<String>) -> Result<ParsedArgs> {
        let matches = self
            .command
            .try_get_matches_from_mut(args.iter())
            .map_err(unwrap_clap_error)?;

        for rule in &self.rules {
            rule.apply(&matches, &mut self.parsed_args);
        }

        for rule in &self.rules {
            let option = &rule.option;
            let key = option.symbolic_key();
            if !self.parsed_args.contains_key(key) {
                debug!("{} not given, using default {:?}", rule.spec.long, option.default_value());
                self.parsed_args
                    .insert(key.to_string(), option.default_value().cloned());
            }

            if option.is_required() && matches!(self.parsed_args.get(key), Some(None) | None) {
                return Err(SampleError::MissingRequiredOption {
                    name: option.name().to_string(),
                });
            }
        }

        *args = matches
            .get_many::<String>(REMAINING_ID)
            .map(|rest| rest.cloned().collect())
            .unwrap_or_default();

        Ok(ParsedArgs {
            values: self.parsed_args,
        })
    }
}

/// Resolved values keyed by each option's symbolic key. Every declared option
/// appears exactly once; options without a value map to `None`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedArgs {
    values: BTreeMap<String, Option<OptionValue>>,
}

impl ParsedArgs {
    /// Value for `key`, if the option resolved to one.
    pub fn get(&self, key: &str) -> Option<&OptionValue> {
        self.values.get(key).and_then(Option::as_ref)
    }

    /// Whether `key` was declared.
    pub fn contains_key(&self, key: &str) -> bool {
        self.values.contains_key(key)
    }

    /// String value for `key`.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(OptionValue::as_str)
    }

    /// Integer value for `key`.
    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(OptionValue::as_i64)
    }

    /// Float value for `key`.
    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(OptionValue::as_f64)
    }

    /// Boolean value for `key`.
    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.get(key).and_then(OptionValue::as_bool)
    }

    /// List value for `key`.
    pub fn get_list(&self, key: &str) -> Option<&[String]> {
        self.get(key).and_then(OptionValue::as_list)
    }

    /// String value for `key`, or `MissingRequiredOption` if it has none.
    pub fn require_str(&self, key: &str) -> Result<&str> {
        self.get_str(key)
            .ok_or_else(|| SampleError::MissingRequiredOption {
                name: key.to_string(),
            })
    }

    /// Number of declared options.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether no options were declared.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over `(key, value)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<&OptionValue>)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_ref()))
    }
}

/// Recovers the coercion or validation error raised by an option's value
/// parser; anything else stays a clap error.
fn unwrap_clap_error(err: clap::Error) -> SampleError {
    match std::error::Error::source(&err).and_then(|source| source.downcast_ref::<SampleError>()) {
        Some(SampleError::Validation { value, valid_values }) => SampleError::Validation {
            value: value.clone(),
            valid_values: valid_values.clone(),
        },
        Some(SampleError::InvalidValue {
            option,
            value,
            expected,
        }) => SampleError::InvalidValue {
            option: option.clone(),
            value: value.clone(),
            expected: expected.clone(),
        },
        _ => SampleError::Cli(err),
    }
}

fn program_name() -> String {
    std::env::args_os()
        .next()
        .as_deref()
        .map(Path::new)
        .and_then(Path::file_stem)
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| FALLBACK_PROGRAM_NAME.to_string())
}
