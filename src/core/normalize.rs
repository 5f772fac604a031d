/// Normalize a destination string for comparison
///
/// Lowercases, trims, and collapses internal whitespace so that
/// "  Paris,  France " and "paris, france" compare equal.
///
/// # Arguments
/// * `raw` - Destination text as entered by an operator or parsed from an email
///
/// # Returns
/// Canonical lowercase form
pub fn normalize_destination(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| word.to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Check whether two destinations refer to the same place
///
/// Exact match or substring containment either way, after normalization.
/// Substring containment covers "Paris" vs "Paris, France" style mismatches
/// between extracted text and catalog entries.
#[inline]
pub fn destinations_match(a: &str, b: &str) -> bool {
    let a = normalize_destination(a);
    let b = normalize_destination(b);

    if a.is_empty() || b.is_empty() {
        return false;
    }

    a == b || a.contains(&b) || b.contains(&a)
}

/// Check whether two ISO currency codes denote the same currency
#[inline]
pub fn currencies_match(a: &str, b: &str) -> bool {
    !a.trim().is_empty() && a.trim().eq_ignore_ascii_case(b.trim())
}
