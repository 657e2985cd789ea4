use std::fmt;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

/// One item of a batch. Only `Text` is treated as an address candidate;
/// anything else is reported as an invalid type without touching the network.
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "with-serde", serde(untagged))]
#[derive(Debug, Clone, PartialEq)]
pub enum InputValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
}

impl InputValue {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }
}

impl fmt::Display for InputValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Integer(value) => write!(f, "{value}"),
            Self::Float(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
        }
    }
}

impl From<&str> for InputValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for InputValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<i64> for InputValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for InputValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for InputValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

/// Outcome of [`Verifier::verify_email`](super::Verifier::verify_email).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub is_valid: bool,
    pub message: String,
}

impl Verdict {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            message: "Email address is valid".to_string(),
        }
    }

    pub fn invalid(message: impl Into<String>) -> Self {
        Self {
            is_valid: false,
            message: message.into(),
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub input: InputValue,
    pub is_valid: bool,
    pub message: String,
}

impl VerificationResult {
    pub fn new(input: InputValue, verdict: Verdict) -> Self {
        Self {
            input,
            is_valid: verdict.is_valid,
            message: verdict.message,
        }
    }
}

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub valid: usize,
    pub total: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[VerificationResult]) -> Self {
        Self {
            valid: results.iter().filter(|r| r.is_valid).count(),
            total: results.len(),
        }
    }

    pub fn percentage(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.valid as f64 / self.total as f64 * 100.0
        }
    }
}

impl fmt::Display for BatchSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}/{} emails are valid ({:.1}%)",
            self.valid,
            self.total,
            self.percentage()
        )
    }
}
