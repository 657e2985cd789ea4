/// Domaine normalisé: forme minuscule + forme ASCII (IDNA).
pub(crate) struct DomainForms {
    pub lower: String,
    pub ascii: String,
}

/// Valide le domaine: conversion IDNA + checks de labels.
/// Push des raisons invalidantes dans `reasons`; renvoie toujours les formes
/// calculables pour que l'appelant puisse les rapporter.
pub(crate) fn check_domain(domain: &str, reasons: &mut Vec<String>) -> DomainForms {
    let lower = domain.to_lowercase();
    if lower.is_empty() {
        reasons.push("domain is empty".to_string());
        return DomainForms {
            lower,
            ascii: String::new(),
        };
    }

    let ascii = match idna::domain_to_ascii(&lower) {
        Ok(d) => d,
        Err(_) => {
            reasons.push(format!("domain '{lower}' punycode conversion failed"));
            return DomainForms {
                lower,
                ascii: String::new(),
            };
        }
    };

    if ascii.len() > 253 {
        reasons.push(format!("domain length {} > 253", ascii.len()));
    }
    if !ascii.contains('.') {
        reasons.push("domain must contain at least one dot".to_string());
    }

    for label in ascii.split('.') {
        if label.is_empty() {
            reasons.push("empty domain label".to_string());
            continue;
        }
        if label.len() > 63 {
            reasons.push(format!("domain label '{label}' length {} > 63", label.len()));
        }
        if label.starts_with('-') || label.ends_with('-') {
            reasons.push(format!("domain label '{label}' cannot start/end with '-'"));
        }
        if !label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            reasons.push(format!("domain label '{label}' has invalid chars"));
        }
    }

    if ascii
        .rsplit('.')
        .next()
        .is_some_and(|tld| !tld.is_empty() && tld.chars().all(|c| c.is_ascii_digit()))
    {
        reasons.push("top-level domain cannot be numeric".to_string());
    }

    DomainForms { lower, ascii }
}
