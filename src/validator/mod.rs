//! Syntactic validation and normalisation of e-mail addresses.
//!
//! No network access happens here: the checks cover the address grammar
//! (dot-atom / quoted local part, IDNA domain labels) and length limits.

mod domain;
mod local;
mod types;

pub use types::{EmailError, NormalizedEmail, ValidationMode, ValidationReport};

use domain::check_domain;
use local::{is_local_relaxed, is_local_strict};

pub fn validate_email(email: &str, mode: ValidationMode) -> Result<ValidationReport, EmailError> {
    let normalized = normalize_email(email, mode)?;
    Ok(ValidationReport {
        ok: normalized.valid,
        reasons: normalized.reasons,
    })
}

/// Valide et renvoie une *sortie normalisée*
/// (local, domaine minuscule, domaine ASCII) même quand l'adresse est invalide.
pub fn normalize_email(email: &str, mode: ValidationMode) -> Result<NormalizedEmail, EmailError> {
    let input = email.trim();
    let mut reasons = Vec::new();

    if input.chars().count() > 254 {
        reasons.push(format!("total length {} > 254", input.chars().count()));
    }

    let (local, domain) = match input.rsplit_once('@') {
        Some((l, d)) if !l.contains('@') || l.starts_with('"') => (l, d),
        Some(_) => {
            reasons.push("must contain exactly one '@'".to_string());
            return Ok(rejected(email, mode, reasons));
        }
        None => {
            reasons.push("must contain an '@' sign".to_string());
            return Ok(rejected(email, mode, reasons));
        }
    };

    if local.is_empty() || local.len() > 64 {
        reasons.push(format!(
            "local part length {} invalid (1..=64)",
            local.len()
        ));
    }

    let local_ok = match mode {
        ValidationMode::Strict => is_local_strict(local),
        ValidationMode::Relaxed => is_local_relaxed(local),
    };
    if !local.is_empty() && !local_ok {
        reasons.push(match mode {
            ValidationMode::Strict => "invalid local part (strict rules)".into(),
            ValidationMode::Relaxed => "invalid local part (relaxed rules)".into(),
        });
    }

    let forms = check_domain(domain, &mut reasons);

    Ok(NormalizedEmail {
        original: email.to_string(),
        local: local.to_string(),
        domain: forms.lower,
        ascii_domain: forms.ascii,
        mode,
        valid: reasons.is_empty(),
        reasons,
    })
}

/// Version "pipeline": `Ok` uniquement pour une adresse valide.
pub fn check_format(email: &str, mode: ValidationMode) -> Result<NormalizedEmail, EmailError> {
    let normalized = normalize_email(email, mode)?;
    if normalized.valid {
        Ok(normalized)
    } else {
        Err(EmailError::from_reasons(&normalized.reasons))
    }
}

fn rejected(email: &str, mode: ValidationMode, reasons: Vec<String>) -> NormalizedEmail {
    NormalizedEmail {
        original: email.to_string(),
        local: String::new(),
        domain: String::new(),
        ascii_domain: String::new(),
        mode,
        valid: false,
        reasons,
    }
}
