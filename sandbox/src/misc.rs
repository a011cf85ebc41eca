/// Lowercase the first character of `s`, leaving the rest untouched. Used to normalize OS error
/// messages (which are typically capitalized) for consistent presentation alongside our own
/// lowercase error messages.
pub fn lowercase_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
