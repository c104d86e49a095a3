use std::fmt;

use serde::{Deserialize, Serialize};

/// Why a collector could not produce a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FieldError {
    /// A network service did not answer
    Unreachable,
    /// Output was produced but could not be parsed
    Malformed,
    /// Turned off by configuration (test mode)
    Disabled,
    /// The tool or source needed for this field does not exist here
    Unavailable,
    /// Command failed or I/O error
    Failed,
}

/// A single telemetry value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldValue {
    Text(String),
    Int(i64),
    Float(f64),
    Error(FieldError),
}

impl FieldValue {
    pub fn text<S: Into<String>>(s: S) -> Self {
        FieldValue::Text(s.into())
    }

    pub fn is_error(&self) -> bool {
        matches!(self, FieldValue::Error(_))
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl From<Result<FieldValue, FieldError>> for FieldValue {
    fn from(result: Result<FieldValue, FieldError>) -> Self {
        result.unwrap_or_else(FieldValue::Error)
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::Int(v) => write!(f, "{}", v),
            FieldValue::Float(v) => write!(f, "{:.1}", v),
            FieldValue::Error(FieldError::Disabled) => f.write_str("DISABLED"),
            FieldValue::Error(_) => f.write_str("ERR"),
        }
    }
}
