//! Name normalization shared by every duplicate check.

/// Trim and collapse internal whitespace runs to a single space.
pub fn normalize_name(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Comparison key: normalized and lowercased.
pub fn name_key(value: &str) -> String {
    normalize_name(value).to_lowercase()
}

pub fn same_name(a: &str, b: &str) -> bool {
    name_key(a) == name_key(b)
}

/// Lowercase ASCII alphanumerics joined by single dashes.
pub fn slugify(value: &str) -> String {
    let mut slug = String::new();
    let mut pending_dash = false;
    for ch in name_key(value).chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            slug.push(ch);
            pending_dash = false;
        } else {
            pending_dash = true;
        }
    }
    slug
}
