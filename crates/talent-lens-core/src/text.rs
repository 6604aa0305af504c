//! Allocation-free case-insensitive string helpers.

use std::cmp::Ordering;

fn folded(s: &str) -> impl Iterator<Item = char> + '_ {
    s.chars().flat_map(char::to_lowercase)
}

/// Case-insensitive equality (Unicode lowercase folding).
pub fn casefold_eq(a: &str, b: &str) -> bool {
    folded(a).eq(folded(b))
}

/// Case-insensitive ordering; strings equal under folding fall back to a
/// plain comparison so the result is total and deterministic.
pub fn casefold_cmp(a: &str, b: &str) -> Ordering {
    folded(a).cmp(folded(b)).then_with(|| a.cmp(b))
}

/// Case-insensitive substring test. `needle_lower` must already be lower-cased.
pub fn contains_folded(haystack: &str, needle_lower: &str) -> bool {
    needle_lower.is_empty() || haystack.to_lowercase().contains(needle_lower)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eq_ignores_case() {
        assert!(casefold_eq("Berlin", "BERLIN"));
        assert!(casefold_eq("Zürich", "zürich"));
        assert!(!casefold_eq("Berlin", "Berlin "));
    }

    #[test]
    fn cmp_orders_case_insensitively() {
        assert_eq!(casefold_cmp("alice", "Bob"), Ordering::Less);
        assert_eq!(casefold_cmp("Bob", "alice"), Ordering::Greater);
        assert_eq!(casefold_cmp("Ann", "ann"), Ordering::Less);
        assert_eq!(casefold_cmp("ann", "ann"), Ordering::Equal);
    }

    #[test]
    fn contains() {
        assert!(contains_folded("Senior Rust Engineer", "rust"));
        assert!(contains_folded("anything", ""));
        assert!(!contains_folded("Designer", "rust"));
    }
}
