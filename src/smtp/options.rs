use std::borrow::Cow;
use std::time::Duration;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

pub const DEFAULT_MAIL_FROM: &str = "verification@example.com";

/// Configuration knobs for [`SmtpProber`](super::SmtpProber).
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeOptions {
    pub helo_domain: String,
    pub mail_from: String,
    pub port: u16,
    pub timeout_ms: u64,
    /// Log every command and reply line (`smtp_trace` target).
    pub debug: bool,
}

impl Default for ProbeOptions {
    fn default() -> Self {
        Self {
            helo_domain: "localhost".to_string(),
            mail_from: DEFAULT_MAIL_FROM.to_string(),
            port: 25,
            timeout_ms: 10_000,
            debug: false,
        }
    }
}

impl ProbeOptions {
    /// Return the timeout as a [`Duration`]. A zero timeout disables the
    /// connection/read deadline.
    pub fn timeout(&self) -> Option<Duration> {
        if self.timeout_ms == 0 {
            None
        } else {
            Some(Duration::from_millis(self.timeout_ms))
        }
    }

    pub fn helo_name(&self) -> Cow<'_, str> {
        let trimmed = self.helo_domain.trim();
        if trimmed.is_empty() {
            Cow::Borrowed("localhost")
        } else {
            Cow::Borrowed(trimmed)
        }
    }
}
