//! DNS MX resolution.
//!
//! [`first_exchange`] is what the verification pipeline uses: one lookup, one
//! host name, failures logged and turned into `None`. [`check_mx`] returns the
//! full sorted answer for diagnosis.

mod error;
mod resolver;
mod types;

pub use error::MxError as Error;
pub use resolver::{LookupMx, check_mx, first_exchange, select_exchange, system_resolver};
pub use types::{MxRecord, MxSelection, MxStatus};
