//! Identifier case conversion.

/// Convert a Go identifier to snake_case.
///
/// An underscore goes before every upper-case letter or digit that
/// follows a lower-case letter or starts a new word after an acronym,
/// so `HTTPServer` becomes `http_server` and `DoWork2` becomes
/// `do_work_2`.
pub fn to_snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if i > 0 && (c.is_uppercase() || c.is_numeric()) {
            let prev_lower = chars[i - 1].is_lowercase();
            let next_lower = chars.get(i + 1).is_some_and(|n| n.is_lowercase());
            if prev_lower || next_lower {
                out.push('_');
            }
        }
        out.extend(c.to_lowercase());
    }
    out
}
