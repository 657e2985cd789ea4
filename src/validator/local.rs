const ATEXT_SPECIALS: &[char] = &[
    '!', '#', '$', '%', '&', '\'', '*', '+', '-', '/', '=', '?', '^', '_', '`', '{', '|', '}', '~',
];

/// dot-atom: atext ASCII séparé par des '.', sans '.' initial/terminal ni "..".
pub(crate) fn is_local_strict(s: &str) -> bool {
    if s.is_empty() {
        return false;
    }
    s.split('.').all(|atom| {
        !atom.is_empty()
            && atom
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || ATEXT_SPECIALS.contains(&c))
    })
}

/// Relaxed: accepte aussi une quoted-string ASCII imprimable,
/// `\` n'échappant qu'un seul caractère.
pub(crate) fn is_local_relaxed(s: &str) -> bool {
    is_quoted_string(s) || is_local_strict(s)
}

fn is_quoted_string(s: &str) -> bool {
    let Some(inner) = s
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    else {
        return false;
    };
    let mut escaped = false;
    for c in inner.chars() {
        if !(c == ' ' || c.is_ascii_graphic()) {
            return false;
        }
        if escaped {
            escaped = false;
        } else if c == '\\' {
            escaped = true;
        } else if c == '"' {
            return false;
        }
    }
    !escaped
}
