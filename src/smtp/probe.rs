use tracing::debug;

use crate::smtp::error::ProbeError;
use crate::smtp::options::ProbeOptions;
use crate::smtp::session::{SmtpReply, SmtpSession};

/// Asks a mail host whether it would accept mail for `address`.
///
/// Implementations return the server's answer to `RCPT TO`; deciding what
/// that answer means is left to the caller.
pub trait Probe {
    fn probe(&self, host: &str, address: &str) -> Result<SmtpReply, ProbeError>;
}

impl<T: Probe + ?Sized> Probe for &T {
    fn probe(&self, host: &str, address: &str) -> Result<SmtpReply, ProbeError> {
        (**self).probe(host, address)
    }
}

/// Plain-TCP `HELO` / `MAIL FROM` / `RCPT TO` probe. Never sends `DATA`.
#[derive(Debug, Clone, Default)]
pub struct SmtpProber {
    options: ProbeOptions,
}

impl SmtpProber {
    pub fn new(options: ProbeOptions) -> Self {
        Self { options }
    }
}

impl Probe for SmtpProber {
    fn probe(&self, host: &str, address: &str) -> Result<SmtpReply, ProbeError> {
        let mut session = SmtpSession::connect(
            host,
            self.options.port,
            self.options.timeout(),
            self.options.debug,
        )?;
        let outcome = rcpt_exchange(&mut session, &self.options, address);
        session.quit();
        outcome
    }
}

fn rcpt_exchange(
    session: &mut SmtpSession,
    options: &ProbeOptions,
    address: &str,
) -> Result<SmtpReply, ProbeError> {
    let banner = session.read_banner()?;
    if banner.code != 220 {
        return Err(ProbeError::connect(
            session.host(),
            format!("({}) {}", banner.code, banner.text()),
        ));
    }

    // HELO and MAIL FROM outcomes are not decisive: a refusal there shows up
    // again as a non-250 answer to RCPT TO.
    let helo = session.send_command(&format!("HELO {}", options.helo_name()))?;
    note_refusal(session.host(), "HELO", &helo);
    let mail = session.send_command(&format!("MAIL FROM:<{}>", options.mail_from))?;
    note_refusal(session.host(), "MAIL FROM", &mail);

    session.send_command(&format!("RCPT TO:<{address}>"))
}

fn note_refusal(host: &str, command: &str, reply: &SmtpReply) {
    if let Some(class) = reply_class(reply) {
        debug!("{host} answered {command} with {} ({class})", reply.code);
    }
}

/// Label of a non-2xx reply, `None` for a positive completion.
fn reply_class(reply: &SmtpReply) -> Option<&'static str> {
    if reply.is_positive_completion() {
        None
    } else if reply.is_transient_failure() {
        Some("transient failure")
    } else if reply.is_permanent_failure() {
        Some("permanent failure")
    } else {
        Some("unexpected reply")
    }
}
