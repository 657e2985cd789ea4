//! Verification pipeline and the rate-limited batch loop.
//!
//! [`Verifier::verify_email`] chains the format check, the MX lookup and the
//! SMTP probe, stopping at the first failing stage.
//! [`Verifier::process_email_list`] runs it over a list, strictly one address
//! after the other, pausing between probes through a [`Pacer`].

mod error;
mod pacing;
mod progress;
mod types;
mod verifier;

pub use error::BatchError;
pub use pacing::{DelayRange, MAX_DELAY_SECS, Pacer, ThreadPacer};
pub use progress::{ConsoleProgress, Progress, SilentProgress, progress_line};
pub use types::{BatchSummary, InputValue, Verdict, VerificationResult};
pub use verifier::{INVALID_TYPE_MESSAGE, Verifier, VerifierOptions};

#[cfg(test)]
mod tests;
