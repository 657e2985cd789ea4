use tracing::{error, info};
use trust_dns_resolver::Resolver;
use trust_dns_resolver::error::ResolveErrorKind;

use super::{Error, MxRecord, MxSelection, MxStatus};

/// Source of MX answers. Implemented for the system resolver; tests plug in
/// stubs.
pub trait LookupMx {
    /// Records in the order the resolver returned them. An empty vector means
    /// the domain exists but publishes no MX.
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error>;
}

impl<T: LookupMx + ?Sized> LookupMx for &T {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        (**self).lookup_mx(domain)
    }
}

impl LookupMx for Resolver {
    fn lookup_mx(&self, domain: &str) -> Result<Vec<MxRecord>, Error> {
        let lookup = match Resolver::mx_lookup(self, domain) {
            Ok(lookup) => lookup,
            Err(err) => match err.kind() {
                ResolveErrorKind::NoRecordsFound { .. } => return Ok(Vec::new()),
                _ => return Err(Error::lookup(err)),
            },
        };
        Ok(lookup
            .iter()
            .map(|mx| MxRecord::new(mx.preference(), normalize_exchange(mx.exchange().to_utf8())))
            .collect())
    }
}

/// Resolver built from `/etc/resolv.conf` (or the platform equivalent).
pub fn system_resolver() -> Result<Resolver, Error> {
    Resolver::from_system_conf().map_err(Error::resolver_init)
}

/// Lookup MX records for `domain` using the system resolver.
///
/// The domain is normalized via IDNA before querying DNS. The resulting
/// [`MxStatus`] contains the sorted list of records (ascending preference).
pub fn check_mx(domain: &str) -> Result<MxStatus, Error> {
    let ascii = normalize_domain(domain)?;
    let resolver = system_resolver()?;
    resolve_with(&resolver, &ascii)
}

pub(crate) fn resolve_with<R>(resolver: &R, ascii_domain: &str) -> Result<MxStatus, Error>
where
    R: LookupMx + ?Sized,
{
    let mut records = resolver.lookup_mx(ascii_domain)?;

    records.sort();
    records.dedup();

    if records.is_empty() {
        Ok(MxStatus::NoRecords)
    } else {
        Ok(MxStatus::Records(records))
    }
}

/// Host to probe for `domain`, or the reason there is none.
pub fn select_exchange<R>(
    resolver: &R,
    domain: &str,
    selection: MxSelection,
) -> Result<String, Error>
where
    R: LookupMx + ?Sized,
{
    let ascii = normalize_domain(domain)?;
    let records = resolver.lookup_mx(&ascii)?;
    let chosen = match selection {
        MxSelection::FirstReturned => records.first(),
        MxSelection::LowestPreference => records.iter().min_by_key(|r| r.preference),
    };
    let record = chosen.ok_or_else(|| Error::NoRecords {
        domain: ascii.clone(),
    })?;
    // RFC 7505: a single "." exchange means "no mail here".
    if record.exchange.is_empty() {
        return Err(Error::NullMx { domain: ascii });
    }
    Ok(record.exchange.clone())
}

/// Like [`select_exchange`] but never fails: the outcome is logged and a
/// missing host is reported as `None`. One query per call, no retry.
pub fn first_exchange<R>(resolver: &R, domain: &str, selection: MxSelection) -> Option<String>
where
    R: LookupMx + ?Sized,
{
    match select_exchange(resolver, domain, selection) {
        Ok(host) => {
            info!("MX record found for {domain}: {host}");
            Some(host)
        }
        Err(err) => {
            error!("Error retrieving MX records for {domain}: {err}");
            None
        }
    }
}

pub(crate) fn normalize_domain(domain: &str) -> Result<String, Error> {
    let trimmed = domain.trim().trim_end_matches('.');
    if trimmed.is_empty() {
        return Err(Error::EmptyDomain);
    }
    idna::domain_to_ascii(trimmed).map_err(Error::idna)
}

pub(crate) fn normalize_exchange(exchange: String) -> String {
    let trimmed = exchange.trim_end_matches('.');
    trimmed.to_ascii_lowercase()
}
