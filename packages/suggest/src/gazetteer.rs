//! Compile-time gazetteer of known place names.
//!
//! The place list is defined in a TOML file embedded at compile time and
//! parsed once on first use. Matching is pure and synchronous: it never
//! fails and never blocks, so it runs eagerly on every request before the
//! concurrent matcher phase.

use std::sync::OnceLock;

use serde::Deserialize;
use wayfare_suggest_models::{Suggestion, SuggestionSource, SuggestionType, relevance_score};

/// Relevance added on top of the generic score for curated entries.
const CURATED_BOOST: u8 = 10;

const PLACES_TOML: &str = include_str!("../gazetteer/places.toml");

/// A place entry from the embedded gazetteer.
#[derive(Debug, Clone, Deserialize)]
pub struct GazetteerPlace {
    /// Display name.
    pub name: String,
    /// State or city.
    pub kind: SuggestionType,
}

#[derive(Deserialize)]
struct GazetteerFile {
    places: Vec<GazetteerPlace>,
}

/// Returns the full gazetteer.
///
/// # Panics
///
/// Panics if the embedded TOML is malformed (this is a compile-time
/// guarantee since the data is embedded).
pub fn places() -> &'static [GazetteerPlace] {
    static PLACES: OnceLock<Vec<GazetteerPlace>> = OnceLock::new();
    PLACES.get_or_init(|| {
        let file: GazetteerFile = toml::de::from_str(PLACES_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded gazetteer: {e}"));
        file.places
    })
}

/// Returns up to `limit` curated places whose name contains `query`
/// (case-insensitive).
///
/// Exact-name matches come first, then prefix matches, then all other
/// substring matches, each tier ordered alphabetically. The empty query
/// yields an empty result rather than the whole gazetteer.
#[must_use]
pub fn match_places(query: &str, limit: usize) -> Vec<Suggestion> {
    let query = query.trim();
    let needle = query.to_lowercase();
    if needle.is_empty() || limit == 0 {
        return Vec::new();
    }

    let mut exact: Vec<&GazetteerPlace> = Vec::new();
    let mut prefixed: Vec<&GazetteerPlace> = Vec::new();
    let mut contained: Vec<&GazetteerPlace> = Vec::new();

    for place in places() {
        let name = place.name.to_lowercase();
        if name == needle {
            exact.push(place);
        } else if name.starts_with(&needle) {
            prefixed.push(place);
        } else if name.contains(&needle) {
            contained.push(place);
        }
    }

    for tier in [&mut exact, &mut prefixed, &mut contained] {
        tier.sort_by(|a, b| a.name.cmp(&b.name));
    }

    exact
        .into_iter()
        .chain(prefixed)
        .chain(contained)
        .take(limit)
        .map(|place| {
            let relevance = relevance_score(query, None, Some(&place.name))
                .saturating_add(CURATED_BOOST)
                .min(100);
            Suggestion::place(SuggestionSource::Static, place.kind, &place.name, relevance)
        })
        .collect()
}
