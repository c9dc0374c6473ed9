//! Similarity functions for match scoring
//!
//! Embedding similarity is cosine; when either side has no embedding, interest
//! overlap (Jaccard) stands in.

use ahash::AHashSet;
use asteria_core::Vector;

/// Cosine similarity in [-1, 1]; 0 when either vector is all zeros
#[inline]
pub fn cosine(a: &Vector, b: &Vector) -> f64 {
    a.cosine_similarity(b)
}

/// Case-insensitive Jaccard index of two tag lists
///
/// # Returns
/// `|A ∩ B| / |A ∪ B|` in [0.0, 1.0], or 0.0 when both are empty
pub fn jaccard<S: AsRef<str>>(a: &[S], b: &[S]) -> f64 {
    let set_a: AHashSet<String> = a.iter().map(|s| s.as_ref().to_lowercase()).collect();
    let set_b: AHashSet<String> = b.iter().map(|s| s.as_ref().to_lowercase()).collect();

    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    intersection as f64 / union as f64
}

/// Tags present in both lists, for display.
///
/// Entries are trimmed and blank ones dropped; matching is exact (case-sensitive).
/// Results keep the spelling from `a`, are ordered by their lowercase form and
/// capped at `max_items`.
pub fn top_shared<S: AsRef<str>>(a: &[S], b: &[S], max_items: usize) -> Vec<String> {
    let set_b: AHashSet<&str> = b
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty())
        .collect();

    let mut seen = AHashSet::new();
    let mut shared: Vec<&str> = a
        .iter()
        .map(|s| s.as_ref().trim())
        .filter(|s| !s.is_empty() && set_b.contains(s) && seen.insert(*s))
        .collect();

    // Stable, so entries equal ignoring case keep their order from `a`
    shared.sort_by_cached_key(|s| s.to_lowercase());
    shared.into_iter().take(max_items).map(str::to_string).collect()
}
