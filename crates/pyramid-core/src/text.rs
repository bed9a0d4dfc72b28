// crates/pyramid-core/src/text.rs

/// Convert a string into a folded key suitable for indexing and comparison.
///
/// This performs:
/// 1\) Transliterate Unicode → ASCII (e.g. `Côte d'Ivoire` -> `Cote d'Ivoire`)
/// 2\) Normalize to lowercase
///
/// # Examples
///
/// ```rust
/// use pyramid_core::text::fold_key;
///
/// assert_eq!(fold_key("Türkiye"), "turkiye");
/// assert_eq!(fold_key("São Tomé"), "sao tome");
/// ```
pub fn fold_key(s: &str) -> String {
    deunicode::deunicode(s).to_lowercase()
}

/// Compares two strings for equality after Unicode folding and normalization.
pub fn equals_folded(a: &str, b: &str) -> bool {
    fold_key(a) == fold_key(b)
}

/// URL slug for a country or state name.
///
/// Folds to ASCII lowercase, collapses every run of non-alphanumeric
/// characters into a single `-`, and trims leading/trailing dashes.
///
/// ```rust
/// use pyramid_core::text::slugify;
///
/// assert_eq!(slugify("Bosnia and Herzegovina"), "bosnia-and-herzegovina");
/// assert_eq!(slugify("  Côte d'Ivoire "), "cote-d-ivoire");
/// ```
pub fn slugify(name: &str) -> String {
    let folded = fold_key(name);
    let mut out = String::with_capacity(folded.len());
    let mut pending_dash = false;

    for ch in folded.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            out.push(ch);
        } else {
            pending_dash = true;
        }
    }
    out
}
