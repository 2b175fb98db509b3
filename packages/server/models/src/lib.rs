#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the wayfare server.
//!
//! These types are serialized to JSON for the REST API. They are separate
//! from the engine's internal types to allow independent evolution of the
//! API contract. In particular, the internal trust and ranking fields of
//! a suggestion never leave the server.

use serde::{Deserialize, Serialize};
use wayfare_suggest_models::{Suggestion, SuggestionType, TravelMode};
use wayfare_trips::TripRecord;

/// A suggestion as returned by the API.
///
/// The conversion from the engine's [`Suggestion`] drops the internal
/// `source` and `relevance` fields; ranking is already expressed by list
/// order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiSuggestion {
    /// Opaque unique identifier.
    pub id: String,
    /// Display string.
    pub label: String,
    /// Route origin, when the suggestion is a route.
    pub origin: Option<String>,
    /// Route destination or target place.
    pub destination: Option<String>,
    /// UI presentation class.
    #[serde(rename = "type")]
    pub kind: SuggestionType,
    /// Optional human-readable annotation.
    pub description: Option<String>,
}

impl From<Suggestion> for ApiSuggestion {
    fn from(s: Suggestion) -> Self {
        Self {
            id: s.id,
            label: s.label,
            origin: s.origin,
            destination: s.destination,
            kind: s.kind,
            description: s.description,
        }
    }
}

/// Query parameters for the suggestions endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct SuggestQueryParams {
    /// Free-text search string.
    pub q: Option<String>,
}

/// Query parameters for the route options endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct RouteQueryParams {
    /// Origin place name.
    pub origin: Option<String>,
    /// Destination place name.
    pub destination: Option<String>,
    /// Maximum spend; options above it are filtered out.
    pub budget: Option<f64>,
}

/// A synthetic route option as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiRouteOption {
    /// Stable identifier within one response.
    pub id: String,
    /// Travel mode.
    pub mode: TravelMode,
    /// Display label, `"<origin> → <destination> (<mode>)"`.
    pub label: String,
    /// One-way distance estimate in kilometers.
    pub distance_km: f64,
    /// Door-to-door duration estimate in hours.
    pub duration_hours: f64,
    /// Fare or fuel estimate in dollars.
    pub cost: f64,
    /// Emissions estimate in kilograms of CO₂.
    pub co2_kg: f64,
    /// Derived 0–100 score; higher is greener.
    pub eco_score: u8,
}

/// Query parameters for the trip history endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct TripQueryParams {
    /// Maximum number of trips to return.
    pub limit: Option<u32>,
}

/// A recorded trip as returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiTrip {
    /// Row ID.
    pub id: i64,
    /// Origin place name.
    pub origin: String,
    /// Destination place name.
    pub destination: String,
    /// Travel mode, when one was chosen.
    pub mode: Option<String>,
    /// When the trip was recorded (RFC 3339).
    pub created_at: String,
}

impl From<TripRecord> for ApiTrip {
    fn from(t: TripRecord) -> Self {
        Self {
            id: t.id,
            origin: t.origin,
            destination: t.destination,
            mode: t.mode,
            created_at: t.created_at,
        }
    }
}

/// Request body for recording a trip.
#[derive(Debug, Clone, Deserialize)]
pub struct NewTripPayload {
    /// Origin place name.
    pub origin: String,
    /// Destination place name.
    pub destination: String,
    /// Travel mode, when one was chosen.
    pub mode: Option<String>,
}

/// Health check response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfare_suggest_models::SuggestionSource;

    #[test]
    fn api_suggestion_drops_internal_fields() {
        let s = Suggestion::place(SuggestionSource::Static, SuggestionType::State, "Ohio", 90);
        let api = ApiSuggestion::from(s);
        let json = serde_json::to_value(&api).unwrap();

        assert_eq!(json["label"], "Ohio");
        assert_eq!(json["type"], "state");
        assert!(json.get("source").is_none());
        assert!(json.get("relevance").is_none());
    }

    #[test]
    fn api_suggestion_keeps_route_shape() {
        let s = Suggestion::route(
            SuggestionSource::Database,
            "Boston",
            "New York",
            Some("train"),
            80,
        );
        let api = ApiSuggestion::from(s);
        assert_eq!(api.label, "Boston → New York (train)");
        assert_eq!(api.origin.as_deref(), Some("Boston"));
        assert_eq!(api.destination.as_deref(), Some("New York"));
        assert_eq!(api.kind, SuggestionType::Route);
    }
}
