//! Substring filter applied to stored keys during a scan.

/// Returns true when every term occurs somewhere in `key`.
///
/// Terms are compared as literal byte substrings of the raw key, never as
/// patterns and never against the key's display form. An empty term list
/// matches every key.
pub fn matches<T: AsRef<[u8]>>(key: &[u8], terms: &[T]) -> bool {
    terms.iter().all(|term| contains(key, term.as_ref()))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    needle.is_empty() || haystack.windows(needle.len()).any(|w| w == needle)
}
