//! Declaration of a single command-line option.
//!
//! A `CliOption` carries everything needed to expose one parameter of a sample
//! program: its long name (which is also the key of the parsed value), an
//! optional short alias, the type used for coercion, an optional set of
//! allowed values, a default and whether the option must resolve to a value.
//!
//! Options are built with `CliOption::builder`, which validates the
//! declaration. `--help` and `-h` are reserved for usage display.
use clap::{Arg, ArgAction};

use crate::error::{SampleError, render_list};
use crate::result::Result;
use crate::value::{OptionType, OptionValue};

/// Long name reserved for usage display.
const RESERVED_LONG: &str = "help";
/// Short alias reserved for usage display.
const RESERVED_SHORT: char = 'h';

/// An option passed into a sample via a command-line argument.
#[derive(Debug, Clone, PartialEq)]
pub struct CliOption {
    name: String,
    value_type: OptionType,
    help_text: String,
    short: Option<char>,
    valid_values: Option<Vec<String>>,
    default_value: Option<OptionValue>,
    required: bool,
}

impl CliOption {
    /// Starts declaring an option named `name` (e.g. `account_id`, exposed as
    /// `--account_id`).
    pub fn builder(name: impl Into<String>, help_template: impl Into<String>) -> CliOptionBuilder {
        CliOptionBuilder {
            name: name.into(),
            help_template: help_template.into(),
            value_type: OptionType::default(),
            short: None,
            valid_values: None,
            default_value: None,
            required: false,
        }
    }

    /// Long name of the option.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Key under which the parsed value is stored; same as `name`.
    pub fn symbolic_key(&self) -> &str {
        &self.name
    }

    /// Type used for coercion.
    pub fn value_type(&self) -> OptionType {
        self.value_type
    }

    /// Help text, including the allowed values when those are set.
    pub fn help_text(&self) -> &str {
        &self.help_text
    }

    /// Short alias, if any.
    pub fn short(&self) -> Option<char> {
        self.short
    }

    /// Upper-cased allowed values, if any.
    pub fn valid_values(&self) -> Option<&[String]> {
        self.valid_values.as_deref()
    }

    /// Value used when the option is absent from the arguments.
    pub fn default_value(&self) -> Option<&OptionValue> {
        self.default_value.as_ref()
    }

    /// Whether the option must resolve to a value.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Placeholder shown after the flag in usage, e.g. `ACCOUNT_ID`.
    pub fn value_name(&self) -> String {
        self.name.to_uppercase()
    }

    /// Renders the flag specification handed to the argument parser.
    pub fn flag_spec(&self) -> FlagSpec {
        FlagSpec {
            short: self.short.map(|c| format!("-{} {}", c, self.value_name())),
            long: format!("--{} {}", self.name, self.value_name()),
            value_type: self.value_type,
            help: self.help_text.clone(),
        }
    }

    /// Checks one user-supplied value against the allowed set, ignoring case.
    /// Options without an allowed set accept anything.
    pub fn check_valid_value(&self, value: &str) -> Result<()> {
        let Some(valid_values) = &self.valid_values else {
            return Ok(());
        };
        if valid_values.contains(&value.to_uppercase()) {
            Ok(())
        } else {
            Err(SampleError::Validation {
                value: value.to_string(),
                valid_values: valid_values.clone(),
            })
        }
    }

    /// Coerces a raw argument to the option's type and checks every element
    /// against the allowed set.
    pub fn resolve(&self, raw: &str) -> Result<OptionValue> {
        let value = OptionValue::coerce(self.value_type, &self.name, raw)?;
        for element in value.elements() {
            self.check_valid_value(&element)?;
        }
        Ok(value)
    }

    /// Builds the clap argument for this option.
    ///
    /// Every occurrence is resolved by the value parser as clap reaches it, so
    /// errors are reported in argument order. The next token is always taken
    /// as the value, even when it starts with `-`.
    pub(crate) fn to_arg(&self) -> Arg {
        let option = self.clone();
        let mut arg = Arg::new(self.name.clone())
            .long(self.name.clone())
            .value_name(self.value_name())
            .help(self.help_text.clone())
            .num_args(1)
            .allow_hyphen_values(true)
            .action(ArgAction::Append)
            .value_parser(move |raw: &str| option.resolve(raw));
        if let Some(short) = self.short {
            arg = arg.short(short);
        }
        arg
    }
}

/// Builder returned by `CliOption::builder`.
#[derive(Debug, Clone)]
pub struct CliOptionBuilder {
    name: String,
    help_template: String,
    value_type: OptionType,
    short: Option<char>,
    valid_values: Option<OptionValue>,
    default_value: Option<OptionValue>,
    required: bool,
}

impl CliOptionBuilder {
    /// Type used for coercion; `String` when not set.
    pub fn value_type(mut self, value_type: OptionType) -> Self {
        self.value_type = value_type;
        self
    }

    /// Single-character alias, used as `-<short>`.
    pub fn short(mut self, short: char) -> Self {
        self.short = Some(short);
        self
    }

    /// Restricts accepted values. Must be a list; anything else is rejected by
    /// `build`.
    pub fn valid_values(mut self, valid_values: impl Into<OptionValue>) -> Self {
        self.valid_values = Some(valid_values.into());
        self
    }

    /// Marks the option as required.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Value used when the option is absent.
    pub fn default_value(mut self, default_value: impl Into<OptionValue>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// Validates the declaration and produces the option.
    pub fn build(self) -> Result<CliOption> {
        if self.name.is_empty() {
            return Err(SampleError::InvalidArgument(
                "The option name must not be empty.".to_string(),
            ));
        }
        if self.name.starts_with('-') || self.name.chars().any(char::is_whitespace) {
            return Err(SampleError::InvalidArgument(format!(
                "The option name '{}' must not start with '-' or contain whitespace.",
                self.name
            )));
        }
        if self.name == RESERVED_LONG {
            return Err(SampleError::InvalidArgument(format!(
                "'--{}' is reserved for displaying help information.",
                RESERVED_LONG
            )));
        }
        if let Some(short) = self.short {
            if short == RESERVED_SHORT {
                return Err(SampleError::InvalidArgument(format!(
                    "'-{}' is reserved for displaying help information.",
                    RESERVED_SHORT
                )));
            }
            if !short.is_ascii_alphanumeric() {
                return Err(SampleError::InvalidArgument(format!(
                    "The short alias '{}' for '{}' must be a single letter or digit.",
                    short, self.name
                )));
            }
        }

        let (valid_values, help_text) = match self.valid_values {
            None => (None, self.help_template),
            Some(OptionValue::StringList(values)) => {
                let values: Vec<String> = values.iter().map(|v| v.to_uppercase()).collect();
                let help_text = format!(
                    "{} This can be set to: {}.",
                    self.help_template,
                    render_list(&values)
                );
                (Some(values), help_text)
            }
            Some(_) => {
                return Err(SampleError::InvalidArgument(
                    "The valid_values argument must be a list.".to_string(),
                ));
            }
        };

        if let Some(default_value) = &self.default_value {
            if default_value.value_type() != self.value_type {
                return Err(SampleError::InvalidArgument(format!(
                    "The default value '{}' of '--{}' is a {}, expected {}.",
                    default_value,
                    self.name,
                    default_value.value_type(),
                    self.value_type
                )));
            }
        }

        Ok(CliOption {
            name: self.name,
            value_type: self.value_type,
            help_text,
            short: self.short,
            valid_values,
            default_value: self.default_value,
            required: self.required,
        })
    }
}

/// Flag specification of an option, in the order the argument parser
/// expects it: short flag, long flag, type, help.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagSpec {
    /// `-<short> <NAME>`, if the option has a short alias.
    pub short: Option<String>,
    /// `--<name> <NAME>`.
    pub long: String,
    /// Type used for coercion.
    pub value_type: OptionType,
    /// Help text.
    pub help: String,
}

impl FlagSpec {
    /// Flattens the spec into its string parts.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(4);
        if let Some(short) = &self.short {
            args.push(short.clone());
        }
        args.push(self.long.clone());
        args.push(self.value_type.to_string());
        args.push(self.help.clone());
        args
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_values_are_upper_cased_and_listed_in_help() {
        let option = CliOption::builder("creative_format", "Format of the creative.")
            .valid_values(["html", "Native", "VIDEO"])
            .build()
            .unwrap();
        assert_eq!(option.valid_values().unwrap(), ["HTML", "NATIVE", "VIDEO"]);
        assert_eq!(
            option.help_text(),
            "Format of the creative. This can be set to: [\"HTML\", \"NATIVE\", \"VIDEO\"]."
        );
    }

    #[test]
    fn scalar_valid_values_are_rejected() {
        let err = CliOption::builder("status", "Status filter.")
            .valid_values("not-a-list")
            .build()
            .unwrap_err();
        assert!(matches!(err, SampleError::InvalidArgument(_)));
    }

    #[test]
    fn reserved_help_flags_are_rejected() {
        assert!(CliOption::builder("help", "Nope.").build().is_err());
        assert!(CliOption::builder("host", "Host.").short('h').build().is_err());
        assert!(CliOption::builder("", "Empty.").build().is_err());
    }

    #[test]
    fn flag_spec_order() {
        let option = CliOption::builder("account_id", "The resource ID of the bidder.")
            .short('a')
            .value_type(OptionType::Integer)
            .build()
            .unwrap();
        assert_eq!(
            option.flag_spec().to_args(),
            [
                "-a ACCOUNT_ID",
                "--account_id ACCOUNT_ID",
                "Integer",
                "The resource ID of the bidder."
            ]
        );

        let no_short = CliOption::builder("page_size", "Page size.").build().unwrap();
        assert_eq!(
            no_short.flag_spec().to_args(),
            ["--page_size PAGE_SIZE", "String", "Page size."]
        );
    }

    #[test]
    fn default_must_match_value_type() {
        let err = CliOption::builder("page_size", "Page size.")
            .value_type(OptionType::Integer)
            .default_value("abc")
            .build()
            .unwrap_err();
        assert!(matches!(err, SampleError::InvalidArgument(ref msg) if msg.contains("--page_size")));

        let option = CliOption::builder("page_size", "Page size.")
            .value_type(OptionType::Integer)
            .default_value(50i64)
            .build()
            .unwrap();
        assert_eq!(option.default_value(), Some(&OptionValue::Integer(50)));
    }

    #[test]
    fn resolve_checks_each_list_element() {
        let option = CliOption::builder("formats", "Formats.")
            .value_type(OptionType::StringList)
            .valid_values(vec!["HTML", "VIDEO"])
            .build()
            .unwrap();
        assert_eq!(
            option.resolve("html,Video").unwrap(),
            OptionValue::from(vec!["html", "Video"])
        );
        assert!(matches!(
            option.resolve("html,audio"),
            Err(SampleError::Validation { ref value, .. }) if value == "audio"
        ));
    }

    #[test]
    fn check_valid_value_is_case_insensitive() {
        let option = CliOption::builder("mode", "Mode.")
            .valid_values(vec!["A", "B"])
            .build()
            .unwrap();
        assert!(option.check_valid_value("a").is_ok());
        assert!(option.check_valid_value("B").is_ok());
        assert!(option.check_valid_value("C").is_err());
    }
}
