//! Generative travel-suggestion adapter.
//!
//! Builds a prompt for the configured completion provider, parses its
//! reply (structured JSON preferred, line-oriented free text tolerated),
//! and converts the result into canonical suggestion values. Without a
//! configured provider the adapter serves a small deterministic fallback
//! list. Provider and parse failures degrade to an empty list; they are
//! never surfaced to the caller.

use regex::Regex;
use wayfare_suggest_models::{
    Suggestion, SuggestionSource, SuggestionType, relevance_score,
};

use crate::providers::{CompletionProvider, create_provider_from_env};

/// Maximum suggestions requested from the provider per query.
pub const DEFAULT_AI_LIMIT: usize = 8;

/// Fallback suggestions served when no provider is configured.
const FALLBACK_PLACES: [(&str, &str); 2] = [
    ("San Francisco", "Iconic coastal city with direct rail and air links"),
    ("Chicago", "Architecture, a lakefront, and a major rail hub"),
];

/// Adapter from a completion provider to travel suggestions.
pub struct AiSuggester {
    provider: Option<Box<dyn CompletionProvider>>,
}

impl AiSuggester {
    /// Creates an adapter around an optional provider. `None` puts the
    /// adapter in static-fallback mode.
    #[must_use]
    pub fn new(provider: Option<Box<dyn CompletionProvider>>) -> Self {
        Self { provider }
    }

    /// Creates an adapter from environment credentials (see
    /// [`create_provider_from_env`]).
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(create_provider_from_env())
    }

    /// Whether a real provider is configured (vs. static fallback).
    #[must_use]
    pub const fn is_live(&self) -> bool {
        self.provider.is_some()
    }

    /// Produces up to `limit` suggestions for `query`.
    ///
    /// Never fails: provider errors, timeouts, and unparseable replies
    /// are logged and collapse to an empty list.
    pub async fn suggest(&self, query: &str, limit: usize) -> Vec<Suggestion> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let Some(provider) = &self.provider else {
            return fallback_suggestions(query);
        };

        let prompt = build_prompt(query, limit);
        match provider.complete(&prompt).await {
            Ok(reply) => {
                let mut suggestions = parse_reply(query, &reply);
                suggestions.truncate(limit);
                suggestions
            }
            Err(e) => {
                log::error!("Generative suggestion call failed: {e}");
                Vec::new()
            }
        }
    }
}

/// Builds the completion prompt for a traveler query.
fn build_prompt(query: &str, limit: usize) -> String {
    format!(
        r#"You are a travel search assistant. A traveler typed the query "{query}".

Suggest up to {limit} places or routes matching that query. Respond with ONLY a JSON object of this exact shape, no prose around it:

{{"suggestions": [{{"type": "route" or "destination", "name": "display name", "origin": "origin city (routes only)", "destination": "destination city", "mode": "train" or "car" or "flight", "description": "one short sentence"}}]}}

If you cannot produce JSON, list one suggestion per line formatted as "City A -> City B (mode)" for routes, or a bare place name for destinations."#
    )
}

/// Deterministic fallback served when no provider is configured.
fn fallback_suggestions(query: &str) -> Vec<Suggestion> {
    FALLBACK_PLACES
        .iter()
        .map(|&(name, description)| {
            let relevance = relevance_score(query, None, Some(name));
            Suggestion::place(SuggestionSource::Ai, SuggestionType::Destination, name, relevance)
                .with_description(Some(description.to_string()))
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Reply parsing
// ---------------------------------------------------------------------------

/// Outcome of interpreting a provider reply body.
enum ParsedReply {
    /// A JSON object carrying recognizable suggestion arrays.
    Structured(Vec<RawSuggestion>),
    /// Line-oriented free text.
    FreeText(Vec<FreeTextItem>),
    /// Looked like JSON but was not; nothing usable.
    Failed,
}

/// One interpreted free-text line.
enum FreeTextItem {
    Route {
        origin: String,
        destination: String,
        mode: Option<String>,
    },
    Destination {
        name: String,
    },
}

/// A loosely-shaped suggestion item from the provider's JSON.
#[derive(Debug, Default, serde::Deserialize)]
struct RawSuggestion {
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    origin: Option<String>,
    #[serde(default)]
    destination: Option<String>,
    #[serde(default)]
    mode: Option<String>,
    #[serde(default)]
    description: Option<String>,
}

/// Top-level JSON reply shapes: current `suggestions`, legacy `routes`
/// and `destinations`.
#[derive(serde::Deserialize)]
struct RawPayload {
    #[serde(default)]
    suggestions: Vec<RawSuggestion>,
    #[serde(default)]
    routes: Vec<RawSuggestion>,
    #[serde(default)]
    destinations: Vec<RawDestination>,
}

/// Legacy `destinations` entries are either bare names or full items.
#[derive(serde::Deserialize)]
#[serde(untagged)]
enum RawDestination {
    Name(String),
    Item(RawSuggestion),
}

/// Parses a provider reply into suggestions. Tolerates fenced JSON,
/// legacy array shapes, and free text; anything unusable becomes an
/// empty list.
fn parse_reply(query: &str, reply: &str) -> Vec<Suggestion> {
    match classify_reply(reply) {
        ParsedReply::Structured(items) => items
            .into_iter()
            .filter_map(|raw| raw_to_suggestion(query, raw))
            .collect(),
        ParsedReply::FreeText(items) => items
            .into_iter()
            .map(|item| line_to_suggestion(query, item))
            .collect(),
        ParsedReply::Failed => {
            log::warn!("Discarding unparseable generative suggestion reply");
            Vec::new()
        }
    }
}

/// Classifies a reply body as structured JSON, free text, or garbage.
fn classify_reply(reply: &str) -> ParsedReply {
    let body = strip_code_fences(reply);

    if body.starts_with('{') {
        return match serde_json::from_str::<RawPayload>(body) {
            Ok(payload) => ParsedReply::Structured(payload.into_items()),
            Err(e) => {
                log::warn!("Generative reply looked like JSON but failed to parse: {e}");
                ParsedReply::Failed
            }
        };
    }

    let items = parse_free_text(body);
    if items.is_empty() {
        ParsedReply::Failed
    } else {
        ParsedReply::FreeText(items)
    }
}

impl RawPayload {
    /// Flattens the accepted array shapes in preference order.
    fn into_items(self) -> Vec<RawSuggestion> {
        if !self.suggestions.is_empty() {
            return self.suggestions;
        }
        if !self.routes.is_empty() {
            return self.routes;
        }
        self.destinations
            .into_iter()
            .map(|entry| match entry {
                RawDestination::Name(name) => RawSuggestion {
                    name: Some(name),
                    ..RawSuggestion::default()
                },
                RawDestination::Item(item) => item,
            })
            .collect()
    }
}

/// Converts one JSON item into a suggestion, if it names anything.
fn raw_to_suggestion(query: &str, raw: RawSuggestion) -> Option<Suggestion> {
    let origin = non_blank(raw.origin.as_deref());
    let destination = non_blank(raw.destination.as_deref());
    let name = non_blank(raw.name.as_deref());

    if let (Some(o), Some(d)) = (origin, destination)
        && SuggestionType::classify(Some(o), Some(d)) == SuggestionType::Route
    {
        let relevance = relevance_score(query, Some(o), Some(d));
        return Some(
            Suggestion::route(SuggestionSource::Ai, o, d, raw.mode.as_deref(), relevance)
                .with_description(raw.description),
        );
    }

    let place = name.or(destination).or(origin)?;
    let kind = raw
        .kind
        .as_deref()
        .and_then(|k| k.trim().to_lowercase().parse::<SuggestionType>().ok())
        .filter(|k| *k != SuggestionType::Route)
        .unwrap_or(SuggestionType::Destination);
    let relevance = relevance_score(query, None, Some(place));
    Some(
        Suggestion::place(SuggestionSource::Ai, kind, place, relevance)
            .with_description(raw.description),
    )
}

/// Converts one interpreted free-text line into a suggestion.
fn line_to_suggestion(query: &str, item: FreeTextItem) -> Suggestion {
    match item {
        FreeTextItem::Route {
            origin,
            destination,
            mode,
        } => {
            let relevance = relevance_score(query, Some(&origin), Some(&destination));
            Suggestion::route(
                SuggestionSource::Ai,
                &origin,
                &destination,
                mode.as_deref(),
                relevance,
            )
        }
        FreeTextItem::Destination { name } => {
            let relevance = relevance_score(query, None, Some(&name));
            Suggestion::place(SuggestionSource::Ai, SuggestionType::Destination, &name, relevance)
        }
    }
}

/// Parses free-text lines into route/destination items.
///
/// Routes match `origin → destination (mode)?` (ASCII `->` accepted);
/// anything else becomes a destination name after stripping leading
/// ordinal markers and trailing parenthetical notes.
fn parse_free_text(body: &str) -> Vec<FreeTextItem> {
    let Ok(route_re) = Regex::new(r"^(.+?)\s*(?:→|->)\s*(.+?)\s*(?:\(([^)]*)\))?$") else {
        return Vec::new();
    };
    let Ok(ordinal_re) = Regex::new(r"^(?:\d+\s*[.)]\s*|[-*•]\s*)") else {
        return Vec::new();
    };
    let Ok(trailing_note_re) = Regex::new(r"\s*\([^)]*\)$") else {
        return Vec::new();
    };

    let mut items = Vec::new();
    for line in body.lines() {
        let line = ordinal_re.replace(line.trim(), "");
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        if let Some(caps) = route_re.captures(line) {
            let origin = caps[1].trim().to_string();
            let destination = caps[2].trim().to_string();
            let mode = caps
                .get(3)
                .map(|m| m.as_str().trim().to_string())
                .filter(|m| !m.is_empty());
            if !origin.is_empty() && !destination.is_empty() {
                items.push(FreeTextItem::Route {
                    origin,
                    destination,
                    mode,
                });
                continue;
            }
        }

        let name = trailing_note_re.replace(line, "");
        let name = name.trim();
        if !name.is_empty() {
            items.push(FreeTextItem::Destination {
                name: name.to_string(),
            });
        }
    }

    items
}

/// Strips a Markdown code fence (with optional language tag) wrapping the
/// reply, returning the inner body.
fn strip_code_fences(reply: &str) -> &str {
    let trimmed = reply.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.trim()
}

/// Trims an optional string, dropping blanks.
fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|s| !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AiError;

    struct CannedProvider(String);

    #[async_trait::async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
            Ok(self.0.clone())
        }
    }

    struct FailingProvider;

    #[async_trait::async_trait]
    impl CompletionProvider for FailingProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
            Err(AiError::Provider {
                message: "rate limited".to_string(),
            })
        }
    }

    #[test]
    fn parses_structured_json() {
        let reply = r#"{"suggestions": [
            {"type": "route", "name": "Boston to New York", "origin": "Boston",
             "destination": "New York", "mode": "train", "description": "Fast corridor"},
            {"type": "destination", "name": "Portland", "description": "Food scene"}
        ]}"#;
        let out = parse_reply("boston", reply);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label, "Boston → New York (train)");
        assert_eq!(out[0].kind, SuggestionType::Route);
        assert_eq!(out[0].relevance, 100);
        assert_eq!(out[1].kind, SuggestionType::Destination);
        assert_eq!(out[1].description.as_deref(), Some("Food scene"));
        assert!(out.iter().all(|s| s.source == SuggestionSource::Ai));
    }

    #[test]
    fn parses_legacy_routes_array() {
        let reply = r#"{"routes": [{"origin": "Denver", "destination": "Austin"}]}"#;
        let out = parse_reply("den", reply);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "Denver → Austin");
    }

    #[test]
    fn parses_legacy_destinations_of_bare_names() {
        let reply = r#"{"destinations": ["Kyoto", "Lisbon"]}"#;
        let out = parse_reply("kyo", reply);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].label, "Kyoto");
        assert_eq!(out[0].kind, SuggestionType::Destination);
    }

    #[test]
    fn strips_code_fences_around_json() {
        let reply = "```json\n{\"suggestions\": [{\"name\": \"Reno\"}]}\n```";
        let out = parse_reply("reno", reply);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "Reno");
    }

    #[test]
    fn malformed_json_yields_empty() {
        assert!(parse_reply("q", "{\"suggestions\": [oops").is_empty());
    }

    #[test]
    fn parses_free_text_routes_with_ordinals_and_modes() {
        let reply = "1. Boston → New York (train)\n2) Seattle -> Portland\n- Denver → Austin (flight)";
        let out = parse_reply("boston", reply);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].label, "Boston → New York (train)");
        assert_eq!(out[1].label, "Seattle → Portland");
        assert_eq!(out[2].label, "Denver → Austin (flight)");
    }

    #[test]
    fn free_text_line_without_route_becomes_destination() {
        let reply = "3. Santa Fe (great in autumn)";
        let out = parse_reply("santa", reply);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "Santa Fe");
        assert_eq!(out[0].kind, SuggestionType::Destination);
    }

    #[test]
    fn same_place_json_route_degrades_to_destination() {
        let reply = r#"{"suggestions": [{"origin": "Boston", "destination": "Boston"}]}"#;
        let out = parse_reply("bos", reply);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].kind, SuggestionType::Destination);
    }

    #[test]
    fn items_without_any_name_are_dropped() {
        let reply = r#"{"suggestions": [{"mode": "train"}, {"name": "Tulsa"}]}"#;
        let out = parse_reply("tul", reply);
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "Tulsa");
    }

    #[tokio::test]
    async fn provider_failure_degrades_to_empty() {
        let suggester = AiSuggester::new(Some(Box::new(FailingProvider)));
        assert!(suggester.suggest("boston", DEFAULT_AI_LIMIT).await.is_empty());
    }

    #[tokio::test]
    async fn unconfigured_adapter_serves_static_fallback() {
        let suggester = AiSuggester::new(None);
        let out = suggester.suggest("chi", DEFAULT_AI_LIMIT).await;
        assert_eq!(out.len(), 2);
        assert!(out.iter().any(|s| s.label == "Chicago"));
        assert!(out.iter().all(|s| s.source == SuggestionSource::Ai));
    }

    #[tokio::test]
    async fn limit_caps_parsed_results() {
        let lines: Vec<String> = (0..10).map(|i| format!("City{i} → Town{i}")).collect();
        let suggester = AiSuggester::new(Some(Box::new(CannedProvider(lines.join("\n")))));
        let out = suggester.suggest("city", 4).await;
        assert_eq!(out.len(), 4);
    }

    #[tokio::test]
    async fn blank_query_short_circuits() {
        let suggester = AiSuggester::new(Some(Box::new(FailingProvider)));
        assert!(suggester.suggest("   ", DEFAULT_AI_LIMIT).await.is_empty());
    }
}
