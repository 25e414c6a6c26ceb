//! English display text derived from translation keys.

/// Turn the last segment of a dotted, camelCase key into a title-cased phrase.
///
/// `"userProfile.displayName"` → `"Display Name"`,
/// `"errors.not_found"` → `"Not Found"`.
pub fn format_key(key: &str) -> String {
    let last = key.rsplit('.').next().unwrap_or_default();

    let mut spaced = String::with_capacity(last.len() + 8);
    for c in last.chars() {
        if c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
    }

    spaced
        .split(|c: char| c == '.' || c == '_' || c == '-' || c.is_whitespace())
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
