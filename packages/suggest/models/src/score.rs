//! Tiered relevance scoring for suggestion candidates.
//!
//! Tiers are evaluated top-down and the first match wins, so the ordering
//! of checks is load-bearing. The fallback tier never admits a candidate
//! on its own; it only ranks candidates some matcher already accepted.

/// Query equals origin or destination.
pub const SCORE_EXACT: u8 = 100;
/// Query is a prefix of origin or destination.
pub const SCORE_PREFIX: u8 = 80;
/// Origin or destination contains the query as a substring.
pub const SCORE_SUBSTRING: u8 = 60;
/// Some query word is a prefix of some origin/destination word.
pub const SCORE_WORD_PREFIX: u8 = 40;
/// Weak match for candidates accepted by another lookup step.
pub const SCORE_FALLBACK: u8 = 20;

/// Scores how well a candidate's endpoints match the literal query text.
///
/// Pure and deterministic: the same `(query, origin, destination)` triple
/// always produces the same score. Comparison is case-insensitive over
/// trimmed values.
#[must_use]
pub fn relevance_score(query: &str, origin: Option<&str>, destination: Option<&str>) -> u8 {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return SCORE_FALLBACK;
    }

    let fields: Vec<String> = [origin, destination]
        .into_iter()
        .flatten()
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty())
        .collect();

    if fields.iter().any(|f| *f == query) {
        return SCORE_EXACT;
    }
    if fields.iter().any(|f| f.starts_with(&query)) {
        return SCORE_PREFIX;
    }
    if fields.iter().any(|f| f.contains(&query)) {
        return SCORE_SUBSTRING;
    }
    if has_word_prefix_overlap(&query, &fields) {
        return SCORE_WORD_PREFIX;
    }

    SCORE_FALLBACK
}

/// Returns `true` if any whitespace-delimited query word is a prefix of
/// any word in any field.
fn has_word_prefix_overlap(query: &str, fields: &[String]) -> bool {
    query.split_whitespace().any(|qw| {
        fields
            .iter()
            .any(|f| f.split_whitespace().any(|fw| fw.starts_with(qw)))
    })
}
