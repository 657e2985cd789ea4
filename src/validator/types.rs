use thiserror::Error;

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationMode {
    #[default]
    Strict,
    Relaxed,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub reasons: Vec<String>,
}

#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedEmail {
    pub original: String,
    pub local: String,
    /// Lower-cased domain as typed (may contain Unicode).
    pub domain: String,
    /// IDNA (punycode) form of `domain`, empty when the conversion failed.
    pub ascii_domain: String,
    pub mode: ValidationMode,
    pub valid: bool,
    pub reasons: Vec<String>,
}

impl NormalizedEmail {
    /// Address sent on the wire: local part unchanged, ASCII domain.
    pub fn address(&self) -> String {
        format!("{}@{}", self.local, self.ascii_domain)
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EmailError {
    #[error("{0}")]
    InvalidFormat(String),
}

impl EmailError {
    pub(crate) fn from_reasons(reasons: &[String]) -> Self {
        if reasons.is_empty() {
            Self::InvalidFormat("unknown format error".to_string())
        } else {
            Self::InvalidFormat(reasons.join("; "))
        }
    }
}
