#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

//! Suggestion entity and travel taxonomy types for the wayfare system.
//!
//! This crate defines the canonical [`Suggestion`] shape produced by every
//! matcher (gazetteer, trip history, generative provider), plus the pure
//! helpers the aggregation pipeline is built on: route identity keys,
//! route-vs-destination classification, and the tiered relevance scorer.
//! Everything here is synchronous and side-effect-free.

pub mod score;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

pub use score::relevance_score;

/// Provenance of a suggestion, ordered by trust.
///
/// The aggregator prefers curated data over persisted history, and history
/// over generative output, when two candidates collapse to the same
/// identity key.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionSource {
    /// Curated gazetteer of known place names.
    Static,
    /// Persisted trip history.
    Database,
    /// Generative text/JSON provider.
    Ai,
}

impl SuggestionSource {
    /// Trust priority used for dedup winner selection and sort tie-breaks.
    /// Higher wins.
    #[must_use]
    pub const fn priority(self) -> u8 {
        match self {
            Self::Static => 3,
            Self::Database => 2,
            Self::Ai => 1,
        }
    }

    /// Short prefix embedded in suggestion IDs for traceability.
    #[must_use]
    pub const fn id_prefix(self) -> &'static str {
        match self {
            Self::Static => "static",
            Self::Database => "db",
            Self::Ai => "ai",
        }
    }
}

/// How a suggestion is presented in the UI.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum SuggestionType {
    /// An administrative region from the gazetteer.
    State,
    /// A major population center from the gazetteer.
    City,
    /// An origin→destination pair.
    Route,
    /// A single place to travel to.
    Destination,
}

impl SuggestionType {
    /// Classifies a suggestion from its endpoint shape.
    ///
    /// Both endpoints present and different (case-insensitive, trimmed)
    /// means a route; everything else is a single destination. A pair like
    /// `("Boston", "boston ")` is a destination, not a degenerate route.
    #[must_use]
    pub fn classify(origin: Option<&str>, destination: Option<&str>) -> Self {
        match (origin, destination) {
            (Some(o), Some(d))
                if !o.trim().is_empty()
                    && !d.trim().is_empty()
                    && !o.trim().eq_ignore_ascii_case(d.trim()) =>
            {
                Self::Route
            }
            _ => Self::Destination,
        }
    }
}

/// Mode of travel for a route option.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum TravelMode {
    /// Rail travel.
    Train,
    /// Road travel by private car.
    Car,
    /// Air travel.
    Flight,
}

impl TravelMode {
    /// Returns all variants of this enum.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Train, Self::Car, Self::Flight]
    }
}

/// A ranked candidate place or route shown to the user for a query.
///
/// Suggestions are constructed fresh on every request and never mutated
/// afterwards; the aggregator only selects which instance to keep per
/// identity key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Opaque unique identifier, source-prefixed (`static-…`, `db-…`,
    /// `ai-…`).
    pub id: String,
    /// Human-readable display string. Always non-empty.
    pub label: String,
    /// Route origin, when known.
    pub origin: Option<String>,
    /// Route destination or target place, when known.
    pub destination: Option<String>,
    /// UI presentation class.
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    /// Provenance, used for trust-priority tie-breaking.
    pub source: SuggestionSource,
    /// Relevance to the current query, 0–100, higher is better.
    pub relevance: u8,
    /// Optional human-readable annotation.
    pub description: Option<String>,
}

impl Suggestion {
    /// Builds a single-place suggestion (gazetteer or generative
    /// destination).
    #[must_use]
    pub fn place(source: SuggestionSource, kind: SuggestionType, name: &str, relevance: u8) -> Self {
        Self {
            id: new_id(source),
            label: name.trim().to_string(),
            origin: None,
            destination: None,
            kind,
            source,
            relevance: relevance.min(score::SCORE_EXACT),
            description: None,
        }
    }

    /// Builds a route suggestion from its endpoints.
    ///
    /// The label is formatted as `"<origin> → <destination>"`, with
    /// ` (<mode>)` appended when a mode is known. The kind is classified
    /// from the endpoints, so a same-place pair degrades to a destination.
    #[must_use]
    pub fn route(
        source: SuggestionSource,
        origin: &str,
        destination: &str,
        mode: Option<&str>,
        relevance: u8,
    ) -> Self {
        let origin = origin.trim();
        let destination = destination.trim();
        Self {
            id: new_id(source),
            label: route_label(origin, destination, mode),
            origin: Some(origin.to_string()),
            destination: Some(destination.to_string()),
            kind: SuggestionType::classify(Some(origin), Some(destination)),
            source,
            relevance: relevance.min(score::SCORE_EXACT),
            description: None,
        }
    }

    /// Attaches a description, dropping blank ones.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = description.filter(|d| !d.trim().is_empty());
        self
    }

    /// The normalized key this suggestion deduplicates under.
    #[must_use]
    pub fn identity_key(&self) -> String {
        route_key(self.origin.as_deref(), self.destination.as_deref(), &self.label)
    }
}

/// Generates a fresh source-prefixed suggestion ID.
fn new_id(source: SuggestionSource) -> String {
    format!("{}-{}", source.id_prefix(), uuid::Uuid::new_v4())
}

/// Formats a route display label.
#[must_use]
pub fn route_label(origin: &str, destination: &str, mode: Option<&str>) -> String {
    let base = format!("{} → {}", origin.trim(), destination.trim());
    match mode.map(str::trim).filter(|m| !m.is_empty()) {
        Some(mode) => format!("{base} ({mode})"),
        None => base,
    }
}

/// Derives the normalized identity key for a candidate.
///
/// Lower-cased and trimmed; `"<origin>→<destination>"` when both endpoints
/// are present, otherwise whichever endpoint exists, otherwise the label.
/// Mode and description are intentionally ignored so the same place or
/// pair never shows twice.
#[must_use]
pub fn route_key(origin: Option<&str>, destination: Option<&str>, label: &str) -> String {
    let norm = |s: &str| s.trim().to_lowercase();
    let origin = origin.map(&norm).filter(|s| !s.is_empty());
    let destination = destination.map(&norm).filter(|s| !s.is_empty());

    match (origin, destination) {
        (Some(o), Some(d)) => format!("{o}→{d}"),
        (Some(only), None) | (None, Some(only)) => only,
        (None, None) => norm(label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_distinct_pair_as_route() {
        assert_eq!(
            SuggestionType::classify(Some("Boston"), Some("New York")),
            SuggestionType::Route
        );
    }

    #[test]
    fn classifies_same_place_as_destination() {
        assert_eq!(
            SuggestionType::classify(Some("Boston"), Some("Boston")),
            SuggestionType::Destination
        );
        assert_eq!(
            SuggestionType::classify(Some("Boston"), Some(" boston ")),
            SuggestionType::Destination
        );
    }

    #[test]
    fn classifies_missing_endpoint_as_destination() {
        assert_eq!(
            SuggestionType::classify(None, Some("Denver")),
            SuggestionType::Destination
        );
        assert_eq!(SuggestionType::classify(None, None), SuggestionType::Destination);
    }

    #[test]
    fn route_key_normalizes_case_and_whitespace() {
        assert_eq!(
            route_key(Some(" Boston "), Some("New York"), "ignored"),
            "boston→new york"
        );
    }

    #[test]
    fn route_key_falls_back_to_single_endpoint_then_label() {
        assert_eq!(route_key(None, Some("Denver"), "x"), "denver");
        assert_eq!(route_key(Some("Denver"), None, "x"), "denver");
        assert_eq!(route_key(None, None, "California"), "california");
    }

    #[test]
    fn route_key_ignores_blank_endpoints() {
        assert_eq!(route_key(Some("  "), None, "Oregon"), "oregon");
    }

    #[test]
    fn route_label_includes_mode_when_present() {
        assert_eq!(route_label("Boston", "New York", Some("train")), "Boston → New York (train)");
        assert_eq!(route_label("Boston", "New York", None), "Boston → New York");
        assert_eq!(route_label("Boston", "New York", Some("  ")), "Boston → New York");
    }

    #[test]
    fn route_constructor_sets_label_and_kind() {
        let s = Suggestion::route(SuggestionSource::Database, "Austin", "Seattle", None, 60);
        assert_eq!(s.label, "Austin → Seattle");
        assert_eq!(s.kind, SuggestionType::Route);
        assert!(s.id.starts_with("db-"));
        assert_eq!(s.identity_key(), "austin→seattle");
    }

    #[test]
    fn place_constructor_keys_on_label() {
        let s = Suggestion::place(SuggestionSource::Static, SuggestionType::State, "Oregon", 90);
        assert_eq!(s.identity_key(), "oregon");
        assert!(s.id.starts_with("static-"));
    }

    #[test]
    fn relevance_is_clamped_to_scale() {
        let s = Suggestion::place(SuggestionSource::Static, SuggestionType::City, "Reno", 255);
        assert_eq!(s.relevance, 100);
    }

    #[test]
    fn with_description_drops_blank() {
        let s = Suggestion::place(SuggestionSource::Ai, SuggestionType::Destination, "Kyoto", 20)
            .with_description(Some("   ".to_string()));
        assert_eq!(s.description, None);
    }

    #[test]
    fn source_priority_ordering() {
        assert!(SuggestionSource::Static.priority() > SuggestionSource::Database.priority());
        assert!(SuggestionSource::Database.priority() > SuggestionSource::Ai.priority());
    }

    #[test]
    fn serializes_with_lowercase_tags() {
        let s = Suggestion::place(SuggestionSource::Static, SuggestionType::State, "Ohio", 80);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["type"], "state");
        assert_eq!(json["source"], "static");
    }
}
