#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Suggestion aggregation and ranking engine.
//!
//! A query fans out to three matchers: the curated gazetteer runs
//! eagerly on every request, and when the query is long enough and the
//! caller is within its rate-limit window, the trip history store and
//! the generative provider run concurrently. Their candidates merge
//! through a pure dedup/rank pass into one bounded list. Every source
//! degrades independently: a failing store or provider shrinks the
//! result, it never fails the request.

pub mod aggregate;
pub mod gazetteer;
pub mod history;
pub mod rate_limit;

use std::sync::Arc;
use std::time::{Duration, Instant};

use wayfare_ai::suggest::AiSuggester;
use wayfare_suggest_models::Suggestion;
use wayfare_trips::TripStore;

use crate::rate_limit::RateLimiter;

/// Tuning knobs for the suggestion engine.
#[derive(Debug, Clone)]
pub struct SuggestConfig {
    /// Minimum query length (chars) before the concurrent matcher phase
    /// runs.
    pub min_query_len: usize,
    /// Cap on gazetteer candidates per query.
    pub gazetteer_limit: usize,
    /// Cap on generative candidates per query.
    pub ai_limit: usize,
    /// Cap on the final merged response.
    pub response_limit: usize,
    /// Requests admitted per client per window.
    pub rate_quota: u32,
    /// Rate-limit window length.
    pub rate_window: Duration,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            min_query_len: history::MIN_QUERY_LEN,
            gazetteer_limit: 8,
            ai_limit: wayfare_ai::suggest::DEFAULT_AI_LIMIT,
            response_limit: 10,
            rate_quota: 15,
            rate_window: Duration::from_secs(60),
        }
    }
}

/// The suggestion engine: owns its collaborators and the rate-limit
/// state, and is the single entry point for answering a query.
pub struct SuggestionEngine {
    trips: Arc<dyn TripStore>,
    ai: AiSuggester,
    limiter: RateLimiter,
    config: SuggestConfig,
}

impl SuggestionEngine {
    /// Creates an engine over a trip store and generative adapter.
    #[must_use]
    pub fn new(trips: Arc<dyn TripStore>, ai: AiSuggester, config: SuggestConfig) -> Self {
        let limiter = RateLimiter::new(config.rate_quota, config.rate_window);
        Self {
            trips,
            ai,
            limiter,
            config,
        }
    }

    /// Answers `query` for the client identified by `client_key`.
    ///
    /// Never fails; the worst case is an empty list. The gazetteer runs
    /// eagerly; history and the generative adapter run concurrently when
    /// the query is long enough and the client is within quota, and each
    /// degrades to an empty contribution on its own failures.
    pub async fn suggest(&self, query: &str, client_key: &str) -> Vec<Suggestion> {
        let query = query.trim();
        if query.is_empty() {
            return Vec::new();
        }

        let mut candidates = gazetteer::match_places(query, self.config.gazetteer_limit);

        if query.chars().count() >= self.config.min_query_len {
            if self.limiter.admit(client_key, Instant::now()) {
                let (from_history, from_ai) = tokio::join!(
                    history::match_history(self.trips.as_ref(), query),
                    self.ai.suggest(query, self.config.ai_limit),
                );
                candidates.extend(from_history);
                candidates.extend(from_ai);
            } else {
                log::warn!(
                    "Rate limit exceeded for client {client_key}; serving gazetteer-only suggestions"
                );
            }
        }

        aggregate::merge(candidates, self.config.response_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wayfare_ai::AiError;
    use wayfare_ai::providers::CompletionProvider;
    use wayfare_suggest_models::{SuggestionSource, SuggestionType};
    use wayfare_trips::{NewTrip, TripError, TripRecord, TripStore};

    struct EmptyStore;

    #[async_trait::async_trait]
    impl TripStore for EmptyStore {
        async fn record(&self, _trip: &NewTrip) -> Result<i64, TripError> {
            Ok(0)
        }

        async fn find_matching(
            &self,
            _substring: &str,
            _limit: u32,
        ) -> Result<Vec<TripRecord>, TripError> {
            Ok(Vec::new())
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<TripRecord>, TripError> {
            Ok(Vec::new())
        }
    }

    struct FailingStore;

    #[async_trait::async_trait]
    impl TripStore for FailingStore {
        async fn record(&self, _trip: &NewTrip) -> Result<i64, TripError> {
            Err(TripError::Database("down".to_string()))
        }

        async fn find_matching(
            &self,
            _substring: &str,
            _limit: u32,
        ) -> Result<Vec<TripRecord>, TripError> {
            Err(TripError::Database("down".to_string()))
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<TripRecord>, TripError> {
            Err(TripError::Database("down".to_string()))
        }
    }

    struct SeededStore(Vec<TripRecord>);

    #[async_trait::async_trait]
    impl TripStore for SeededStore {
        async fn record(&self, _trip: &NewTrip) -> Result<i64, TripError> {
            Ok(0)
        }

        async fn find_matching(
            &self,
            substring: &str,
            limit: u32,
        ) -> Result<Vec<TripRecord>, TripError> {
            let needle = substring.to_lowercase();
            Ok(self
                .0
                .iter()
                .filter(|t| {
                    t.origin.to_lowercase().contains(&needle)
                        || t.destination.to_lowercase().contains(&needle)
                })
                .take(limit as usize)
                .cloned()
                .collect())
        }

        async fn recent(&self, _limit: u32) -> Result<Vec<TripRecord>, TripError> {
            Ok(self.0.clone())
        }
    }

    struct CannedProvider(&'static str);

    #[async_trait::async_trait]
    impl CompletionProvider for CannedProvider {
        async fn complete(&self, _prompt: &str) -> Result<String, AiError> {
            Ok(self.0.to_string())
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

    fn engine(store: Arc<dyn TripStore>, ai: AiSuggester) -> SuggestionEngine {
        SuggestionEngine::new(store, ai, SuggestConfig::default())
    }

    #[tokio::test]
    async fn empty_query_yields_empty_response() {
        let engine = engine(Arc::new(EmptyStore), AiSuggester::new(None));
        assert!(engine.suggest("", "10.0.0.1").await.is_empty());
        assert!(engine.suggest("   ", "10.0.0.1").await.is_empty());
    }

    #[tokio::test]
    async fn single_char_query_stays_gazetteer_only() {
        let ai = AiSuggester::new(Some(Box::new(CannedProvider(
            r#"{"suggestions": [{"name": "Oaxaca"}]}"#,
        ))));
        let engine = engine(Arc::new(EmptyStore), ai);
        let out = engine.suggest("o", "10.0.0.1").await;
        assert!(!out.is_empty());
        assert!(out.iter().all(|s| s.source == SuggestionSource::Static));
    }

    #[tokio::test]
    async fn degrades_to_gazetteer_when_store_and_provider_fail() {
        let ai = AiSuggester::new(Some(Box::new(FailingProvider)));
        let engine = engine(Arc::new(FailingStore), ai);
        let out = engine.suggest("calif", "10.0.0.1").await;
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].label, "California");
        assert_eq!(out[0].source, SuggestionSource::Static);
    }

    #[tokio::test]
    async fn unknown_query_with_failing_sources_yields_empty() {
        let ai = AiSuggester::new(Some(Box::new(FailingProvider)));
        let engine = engine(Arc::new(EmptyStore), ai);
        let out = engine.suggest("xyz123notreal", "10.0.0.1").await;
        assert!(out.is_empty());
    }

    #[tokio::test]
    async fn curated_entry_beats_generative_duplicate() {
        let ai = AiSuggester::new(Some(Box::new(CannedProvider(
            r#"{"suggestions": [{"type": "destination", "name": "California",
                "description": "Golden State getaways"}]}"#,
        ))));
        let engine = engine(Arc::new(EmptyStore), ai);
        let out = engine.suggest("calif", "10.0.0.1").await;

        let california: Vec<_> = out.iter().filter(|s| s.identity_key() == "california").collect();
        assert_eq!(california.len(), 1);
        assert_eq!(california[0].source, SuggestionSource::Static);
        // Prefix score 80 plus the curated boost.
        assert_eq!(california[0].relevance, 90);
    }

    #[tokio::test]
    async fn blends_history_routes_with_gazetteer() {
        let store = SeededStore(vec![TripRecord {
            id: 1,
            origin: "Boston".to_string(),
            destination: "Portland".to_string(),
            mode: Some("train".to_string()),
            created_at: "2026-08-01T00:00:00+00:00".to_string(),
        }]);
        let engine = engine(Arc::new(store), AiSuggester::new(None));
        let out = engine.suggest("boston", "10.0.0.1").await;

        assert!(out.iter().any(|s| s.label == "Boston"
            && s.source == SuggestionSource::Static
            && s.kind == SuggestionType::City));
        assert!(out.iter().any(|s| s.label == "Boston → Portland (train)"
            && s.source == SuggestionSource::Database
            && s.kind == SuggestionType::Route));
    }

    #[tokio::test]
    async fn rate_limited_client_falls_back_to_gazetteer() {
        let config = SuggestConfig {
            rate_quota: 1,
            ..SuggestConfig::default()
        };
        let ai = AiSuggester::new(None);
        let engine = SuggestionEngine::new(Arc::new(EmptyStore), ai, config);

        let first = engine.suggest("chicago", "10.0.0.9").await;
        assert!(first.iter().any(|s| s.source == SuggestionSource::Ai));

        let second = engine.suggest("chicago", "10.0.0.9").await;
        assert!(!second.is_empty());
        assert!(second.iter().all(|s| s.source == SuggestionSource::Static));
    }

    #[tokio::test]
    async fn rate_limit_is_per_client() {
        let config = SuggestConfig {
            rate_quota: 1,
            ..SuggestConfig::default()
        };
        let engine = SuggestionEngine::new(Arc::new(EmptyStore), AiSuggester::new(None), config);

        let _ = engine.suggest("chicago", "10.0.0.1").await;
        let other = engine.suggest("chicago", "10.0.0.2").await;
        assert!(other.iter().any(|s| s.source == SuggestionSource::Ai));
    }

    #[tokio::test]
    async fn response_is_bounded() {
        // "new" matches many gazetteer entries plus the AI fallback pair.
        let engine = engine(Arc::new(EmptyStore), AiSuggester::new(None));
        let out = engine.suggest("new", "10.0.0.1").await;
        assert!(out.len() <= SuggestConfig::default().response_limit);
    }
}
