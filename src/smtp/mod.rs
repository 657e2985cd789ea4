//! SMTP existence probe.
//!
//! [`SmtpProber`] opens one connection per call, walks through
//! `HELO` / `MAIL FROM` / `RCPT TO`, hands back the `RCPT TO` reply and
//! closes the connection. No message body is ever sent and nothing is
//! retried.

mod error;
mod options;
mod probe;
mod session;

pub use error::ProbeError;
pub use options::{DEFAULT_MAIL_FROM, ProbeOptions};
pub use probe::{Probe, SmtpProber};
pub use session::SmtpReply;
