#![forbid(unsafe_code)]
//! mailprobe_lib — vérification d'adresses e-mail: format, MX, sonde SMTP (RCPT TO)
//! et traitement par lot depuis/vers un fichier CSV.

pub mod batch;
pub mod mx;
pub mod sheet;
pub mod smtp;
pub mod validator;

pub use validator::{
    EmailError, NormalizedEmail, ValidationMode, ValidationReport, check_format, normalize_email,
    validate_email,
};

pub use mx::{
    Error as MxError, LookupMx, MxRecord, MxSelection, MxStatus, check_mx, first_exchange,
};

pub use smtp::{Probe, ProbeError, ProbeOptions, SmtpProber, SmtpReply};

pub use batch::{
    BatchError, BatchSummary, ConsoleProgress, DelayRange, InputValue, Pacer, Progress,
    SilentProgress, ThreadPacer, Verdict, VerificationResult, Verifier, VerifierOptions,
};

pub use sheet::{Sheet, SheetError, read_sheet, write_sheet};
