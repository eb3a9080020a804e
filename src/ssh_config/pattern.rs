use glob::{MatchOptions, Pattern};

const OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Whether a `Host` pattern selects other hosts rather than naming one.
pub fn is_wildcard(pattern: &str) -> bool {
    let pattern = unquote(pattern);
    pattern.starts_with('!') || pattern.contains(['*', '?'])
}

/// Whether a `Host` line's patterns select `name`.
///
/// A negated pattern (`!bastion`) that matches rejects the name outright.
/// Otherwise any plain pattern must match, and a line made only of
/// negations selects every name it does not reject.
pub fn selects(patterns: &[String], name: &str) -> bool {
    let mut has_positive = false;
    let mut matched = false;
    for pattern in patterns.iter().map(|p| unquote(p)) {
        match pattern.strip_prefix('!') {
            Some(negated) => {
                if glob_match(negated, name) {
                    return false;
                }
            }
            None => {
                has_positive = true;
                matched = matched || glob_match(pattern, name);
            }
        }
    }
    matched || !has_positive
}

/// Drop one pair of surrounding double quotes.
pub fn unquote(pattern: &str) -> &str {
    pattern
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
        .unwrap_or(pattern)
}

fn glob_match(pattern: &str, name: &str) -> bool {
    match Pattern::new(pattern) {
        Ok(glob) => glob.matches_with(name, OPTIONS),
        Err(_) => pattern.eq_ignore_ascii_case(name),
    }
}
