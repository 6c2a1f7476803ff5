//! Similarity Matcher
//! Finds candidates sharing the target's leading characters

use crate::models::types::Address;

/// Leading `len` characters of `address` (the whole string when shorter)
pub fn prefix_of(address: &str, len: usize) -> &str {
    match address.char_indices().nth(len) {
        Some((idx, _)) => &address[..idx],
        None => address,
    }
}

/// Candidates whose first `prefix_length` characters equal the target's.
///
/// The target matches itself. Output is sorted and de-duplicated so callers
/// get a reproducible order.
pub fn find_similar<'a, I>(target: &str, candidates: I, prefix_length: usize) -> Vec<Address>
where
    I: IntoIterator<Item = &'a Address>,
{
    let target_prefix = prefix_of(target, prefix_length);

    let mut matches: Vec<Address> = candidates
        .into_iter()
        .filter(|candidate| !candidate.is_empty())
        .filter(|candidate| {
            candidate.as_str() == target || prefix_of(candidate, prefix_length) == target_prefix
        })
        .cloned()
        .collect();

    matches.sort();
    matches.dedup();
    matches
}
