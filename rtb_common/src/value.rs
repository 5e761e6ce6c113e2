//! Option value types and coercion from raw command-line strings.
use std::fmt;

use strum_macros::{Display, EnumString};

use crate::error::SampleError;
use crate::result::Result;

/// Closed set of types an option value can be coerced to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum OptionType {
    /// Raw string, no coercion.
    #[default]
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// `true/false`, `yes/no` or `1/0`.
    Boolean,
    /// Comma-separated list of strings.
    StringList,
}

/// A resolved option value.
#[allow(missing_docs)]
#[derive(Debug, Clone, PartialEq)]
pub enum OptionValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    StringList(Vec<String>),
}

impl OptionValue {
    /// Type of this value.
    pub fn value_type(&self) -> OptionType {
        match self {
            OptionValue::String(_) => OptionType::String,
            OptionValue::Integer(_) => OptionType::Integer,
            OptionValue::Float(_) => OptionType::Float,
            OptionValue::Boolean(_) => OptionType::Boolean,
            OptionValue::StringList(_) => OptionType::StringList,
        }
    }

    /// String payload, if this is a `String` value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            OptionValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload, if this is an `Integer` value.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            OptionValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Numeric payload; integers are widened.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            OptionValue::Float(f) => Some(*f),
            OptionValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Boolean payload, if this is a `Boolean` value.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            OptionValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// List payload, if this is a `StringList` value.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            OptionValue::StringList(list) => Some(list),
            _ => None,
        }
    }

    /// The user-facing string values held by this value: one for scalars,
    /// every element for lists.
    pub fn elements(&self) -> Vec<String> {
        match self {
            OptionValue::StringList(list) => list.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Coerces a raw argument into `ty`. `option` is only used for error
    /// reporting.
    pub fn coerce(ty: OptionType, option: &str, raw: &str) -> Result<Self> {
        let invalid = || SampleError::InvalidValue {
            option: option.to_string(),
            value: raw.to_string(),
            expected: ty.to_string(),
        };

        let value = match ty {
            OptionType::String => OptionValue::String(raw.to_string()),
            OptionType::Integer => {
                OptionValue::Integer(raw.trim().parse().map_err(|_| invalid())?)
            }
            OptionType::Float => OptionValue::Float(raw.trim().parse().map_err(|_| invalid())?),
            OptionType::Boolean => match raw.trim().to_ascii_lowercase().as_str() {
                "true" | "yes" | "1" => OptionValue::Boolean(true),
                "false" | "no" | "0" => OptionValue::Boolean(false),
                _ => return Err(invalid()),
            },
            OptionType::StringList => OptionValue::StringList(
                raw.split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect(),
            ),
        };
        Ok(value)
    }
}

impl fmt::Display for OptionValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OptionValue::String(s) => write!(f, "{}", s),
            OptionValue::Integer(i) => write!(f, "{}", i),
            OptionValue::Float(v) => write!(f, "{}", v),
            OptionValue::Boolean(b) => write!(f, "{}", b),
            OptionValue::StringList(list) => write!(f, "{}", list.join(",")),
        }
    }
}

impl From<&str> for OptionValue {
    fn from(value: &str) -> Self {
        OptionValue::String(value.to_string())
    }
}

impl From<String> for OptionValue {
    fn from(value: String) -> Self {
        OptionValue::String(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Integer(value)
    }
}

impl From<f64> for OptionValue {
    fn from(value: f64) -> Self {
        OptionValue::Float(value)
    }
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Boolean(value)
    }
}

impl<T: Into<String>> From<Vec<T>> for OptionValue {
    fn from(values: Vec<T>) -> Self {
        OptionValue::StringList(values.into_iter().map(Into::into).collect())
    }
}

impl<const N: usize> From<[&str; N]> for OptionValue {
    fn from(values: [&str; N]) -> Self {
        OptionValue::StringList(values.iter().map(|s| s.to_string()).collect())
    }
}
