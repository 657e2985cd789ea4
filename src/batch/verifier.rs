use tracing::{info, warn};
use trust_dns_resolver::Resolver;

#[cfg(feature = "with-serde")]
use serde::{Deserialize, Serialize};

use crate::mx::{self, LookupMx, MxSelection};
use crate::smtp::{Probe, ProbeError, ProbeOptions, SmtpProber};
use crate::validator::{EmailError, ValidationMode, check_format};

use super::progress::progress_line;
use super::{DelayRange, InputValue, Pacer, Progress, Verdict, VerificationResult};

pub const INVALID_TYPE_MESSAGE: &str = "Invalid email type";

#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VerifierOptions {
    pub validation_mode: ValidationMode,
    pub mx_selection: MxSelection,
}

/// Format check → MX lookup → SMTP probe, for one address or a whole list.
pub struct Verifier<R, P> {
    resolver: R,
    prober: P,
    options: VerifierOptions,
}

impl Verifier<Resolver, SmtpProber> {
    /// System DNS configuration and a real SMTP prober.
    pub fn system(options: VerifierOptions, probe: ProbeOptions) -> Result<Self, mx::Error> {
        Ok(Self::new(mx::system_resolver()?, SmtpProber::new(probe), options))
    }
}

impl<R, P> Verifier<R, P>
where
    R: LookupMx,
    P: Probe,
{
    pub fn new(resolver: R, prober: P, options: VerifierOptions) -> Self {
        Self {
            resolver,
            prober,
            options,
        }
    }

    pub fn options(&self) -> &VerifierOptions {
        &self.options
    }

    /// Runs the pipeline for one address. Every failure is folded into an
    /// invalid [`Verdict`]; nothing is raised to the caller.
    pub fn verify_email(&self, email: &str) -> Verdict {
        let normalized = match check_format(email, self.options.validation_mode) {
            Ok(normalized) => normalized,
            Err(EmailError::InvalidFormat(reason)) => {
                return Verdict::invalid(format!("Invalid email format: {reason}"));
            }
        };

        let Some(host) =
            mx::first_exchange(&self.resolver, &normalized.ascii_domain, self.options.mx_selection)
        else {
            return Verdict::invalid("Domain MX record not found");
        };

        match self.prober.probe(&host, &normalized.address()) {
            Ok(reply) if reply.code == 250 => Verdict::valid(),
            Ok(reply) => Verdict::invalid(format!("Server response: {} {}", reply.code, reply.text())),
            Err(err) => {
                warn!("SMTP probe of {email} via {host} failed: {err}");
                Verdict::invalid(probe_failure_message(&err))
            }
        }
    }

    /// Verifies `inputs` in order, one result per input.
    ///
    /// Non-text inputs are answered immediately. After each verified address
    /// except the last item of the list, `pacer` is asked to wait for a
    /// duration drawn from `delay`.
    pub fn process_email_list<Pa, Pr>(
        &self,
        inputs: &[InputValue],
        delay: &DelayRange,
        pacer: &mut Pa,
        progress: &mut Pr,
    ) -> Vec<VerificationResult>
    where
        Pa: Pacer + ?Sized,
        Pr: Progress + ?Sized,
    {
        let total = inputs.len();
        let mut results = Vec::with_capacity(total);

        for (index, input) in inputs.iter().enumerate() {
            let position = index + 1;
            let Some(email) = input.as_text() else {
                warn!("Email: {input}, Valid: false, Message: {INVALID_TYPE_MESSAGE}");
                results.push(VerificationResult::new(
                    input.clone(),
                    Verdict::invalid(INVALID_TYPE_MESSAGE),
                ));
                continue;
            };

            let result = VerificationResult::new(input.clone(), self.verify_email(email));
            info!("{}", progress_line(position, total, &result));
            progress.on_result(position, total, &result);
            results.push(result);

            if position < total {
                pacer.pause(delay);
            }
        }

        results
    }
}

fn probe_failure_message(err: &ProbeError) -> String {
    match err {
        ProbeError::Connect { .. } | ProbeError::NoAddress { .. } => {
            format!("SMTP connection error: {err}")
        }
        ProbeError::Disconnected { .. } => format!("SMTP server disconnected: {err}"),
        ProbeError::Io { .. } | ProbeError::Protocol(_) => {
            format!("Error during verification: {err}")
        }
    }
}
