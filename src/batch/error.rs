use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum BatchError {
    #[error("invalid delay range [{min}, {max}]: {reason}")]
    InvalidDelay { min: f64, max: f64, reason: String },
}
