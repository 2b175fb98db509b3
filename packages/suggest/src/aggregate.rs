//! Multi-source candidate merging.
//!
//! A pure function of its input list: deduplicates by normalized route
//! identity, picks one winner per identity, orders the winners, and
//! bounds the result. No I/O and no clock, so the same candidate set
//! always produces the same output regardless of which matcher finished
//! first.

use std::collections::HashMap;
use std::collections::hash_map::Entry;

use wayfare_suggest_models::Suggestion;

/// Merges candidates from all matchers into the final ranked list.
///
/// 1. Candidates are grouped by identity key in first-seen order.
/// 2. Within a group the winner has the highest source priority, then the
///    highest relevance; remaining ties keep the first-seen candidate.
/// 3. Winners sort by relevance descending, with source priority breaking
///    ties the same way; full ties stay in first-seen order.
/// 4. The result is truncated to `limit`.
#[must_use]
pub fn merge(candidates: Vec<Suggestion>, limit: usize) -> Vec<Suggestion> {
    let mut order: Vec<String> = Vec::new();
    let mut winners: HashMap<String, Suggestion> = HashMap::new();

    for candidate in candidates {
        let key = candidate.identity_key();
        match winners.entry(key) {
            Entry::Vacant(slot) => {
                order.push(slot.key().clone());
                slot.insert(candidate);
            }
            Entry::Occupied(mut slot) => {
                if beats(&candidate, slot.get()) {
                    slot.insert(candidate);
                }
            }
        }
    }

    let mut merged: Vec<Suggestion> = order
        .into_iter()
        .filter_map(|key| winners.remove(&key))
        .collect();

    // Stable sort keeps first-seen order for candidates that tie on both
    // relevance and source priority.
    merged.sort_by(|a, b| {
        b.relevance
            .cmp(&a.relevance)
            .then_with(|| b.source.priority().cmp(&a.source.priority()))
    });
    merged.truncate(limit);
    merged
}

/// Whether `challenger` replaces `incumbent` within one identity group.
/// Strictly-greater comparison keeps the first-seen candidate on ties.
fn beats(challenger: &Suggestion, incumbent: &Suggestion) -> bool {
    (challenger.source.priority(), challenger.relevance)
        > (incumbent.source.priority(), incumbent.relevance)
}
