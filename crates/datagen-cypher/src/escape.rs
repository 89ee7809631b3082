//! Identifier quoting for generated Cypher.

/// Check if a string is a plain Cypher identifier.
///
/// Plain identifiers start with a letter or underscore and contain only
/// letters, digits and underscores.
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    let Some(first) = chars.next() else {
        return false;
    };

    if !first.is_ascii_alphabetic() && first != '_' {
        return false;
    }

    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

/// Quote a label, relationship type or property key with backticks if it is
/// not a plain identifier.
///
/// Control characters are dropped and embedded backticks are doubled.
pub fn escape_identifier(s: &str) -> String {
    if is_valid_identifier(s) {
        return s.to_string();
    }
    let sanitized: String = s.chars().filter(|c| !c.is_control()).collect();
    format!("`{}`", sanitized.replace('`', "``"))
}

/// Reduce a name to `[A-Za-z0-9_]` for use in a `$parameter` name.
pub fn sanitize_param_name(s: &str) -> String {
    let sanitized: String = s
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if sanitized.is_empty() {
        "_".to_string()
    } else {
        sanitized
    }
}
