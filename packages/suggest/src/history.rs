//! Trip-history matcher.
//!
//! Surfaces origin/destination pairs the user has searched before. Store
//! failures and slow queries degrade to an empty contribution so the rest
//! of the pipeline still answers.

use std::collections::HashSet;
use std::time::Duration;

use wayfare_suggest_models::{Suggestion, SuggestionSource, relevance_score, route_key};
use wayfare_trips::TripStore;

/// Minimum query length before the store is consulted.
pub const MIN_QUERY_LEN: usize = 2;

/// Raw rows fetched before route-identity dedup.
const RAW_FETCH_CAP: u32 = 20;

/// Distinct pairs returned after dedup.
const RESULT_CAP: usize = 10;

/// Upper bound on the store query.
const STORE_TIMEOUT: Duration = Duration::from_secs(3);

/// Returns suggestions for historical trips matching `query`.
///
/// Queries shorter than [`MIN_QUERY_LEN`] characters return empty without
/// touching the store. Results keep the store's most-recent-first order,
/// deduplicated by normalized route identity.
pub async fn match_history(store: &dyn TripStore, query: &str) -> Vec<Suggestion> {
    let query = query.trim();
    if query.chars().count() < MIN_QUERY_LEN {
        return Vec::new();
    }

    let rows = match tokio::time::timeout(STORE_TIMEOUT, store.find_matching(query, RAW_FETCH_CAP))
        .await
    {
        Ok(Ok(rows)) => rows,
        Ok(Err(e)) => {
            log::error!("Trip history lookup failed: {e}");
            return Vec::new();
        }
        Err(_) => {
            log::error!(
                "Trip history lookup timed out after {}s",
                STORE_TIMEOUT.as_secs()
            );
            return Vec::new();
        }
    };

    let mut seen: HashSet<String> = HashSet::new();
    let mut suggestions = Vec::new();

    for row in rows {
        let key = route_key(Some(&row.origin), Some(&row.destination), "");
        if !seen.insert(key) {
            continue;
        }

        let relevance = relevance_score(query, Some(&row.origin), Some(&row.destination));
        suggestions.push(Suggestion::route(
            SuggestionSource::Database,
            &row.origin,
            &row.destination,
            row.mode.as_deref(),
            relevance,
        ));

        if suggestions.len() >= RESULT_CAP {
            break;
        }
    }

    suggestions
}
