//! Advisory Responder - context aggregation and response generation
//!
//! The single-shot `respond()` pipeline behind `POST /api/v1/advise`:
//!
//! 1. Validate the query (fail fast, before any store I/O)
//! 2. Fetch active objectives and recent signals concurrently
//! 3. Assemble the prompt context (pure function of the snapshot + query)
//! 4. Delegate to the generation backend, or fall back to the deterministic
//!    template when the backend is absent or failing
//!
//! Each call is independent: the responder holds no mutable state, so
//! concurrent invocations cannot interfere. Cancellation is by future drop —
//! nothing in the pipeline is spawned, so an aborted request abandons its
//! in-flight fetches and generation call with it.

pub mod context;
pub mod fallback;

use anyhow::anyhow;
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::time::timeout;
use tracing::{debug, error, warn};

use crate::config::AdvisorConfig;
use crate::llm::LlmBackend;
use crate::storage::StrategicStore;
use crate::types::{AdvisoryQuery, AdvisoryResponse, ContextSummary, ResponseSource};

// ============================================================================
// Errors
// ============================================================================

/// Advisory pipeline errors.
///
/// Propagation policy: validation fails before any I/O; fetch errors abort
/// the whole operation (no partial context); generation errors degrade to
/// the template unless fallback is disabled.
#[derive(Debug, Error)]
pub enum AdvisoryError {
    /// Missing or empty query. Surfaced as a 400-class response.
    #[error("query must be a non-empty string")]
    InvalidQuery,

    /// Store read failure, malformed record, or fetch timeout.
    /// Surfaced as a 500-class response with a generic message.
    #[error("failed to fetch strategic context")]
    ContextFetch(#[source] anyhow::Error),

    /// Generation capability failure with fallback disabled.
    #[error("generation capability failed")]
    Generation(#[source] anyhow::Error),
}

// ============================================================================
// Settings
// ============================================================================

/// Operational bounds for the responder, extracted from config once at
/// construction so tests can vary them per instance.
#[derive(Debug, Clone)]
pub struct ResponderSettings {
    pub signal_limit: usize,
    pub objective_cap: usize,
    pub fetch_timeout: Duration,
    pub generate_timeout: Duration,
    pub fallback_enabled: bool,
}

impl ResponderSettings {
    pub fn from_config(config: &AdvisorConfig) -> Self {
        Self {
            signal_limit: config.context.signal_limit,
            objective_cap: config.context.objective_cap,
            fetch_timeout: Duration::from_millis(config.context.fetch_timeout_ms),
            generate_timeout: Duration::from_millis(config.generation.timeout_ms),
            fallback_enabled: config.generation.fallback_enabled,
        }
    }
}

impl Default for ResponderSettings {
    fn default() -> Self {
        Self::from_config(&AdvisorConfig::default())
    }
}

// ============================================================================
// Responder
// ============================================================================

/// Stateless advisory responder.
///
/// Cheap to clone; safe to call from any number of concurrent requests.
#[derive(Clone)]
pub struct AdvisoryResponder {
    store: Arc<dyn StrategicStore>,
    backend: Option<Arc<dyn LlmBackend>>,
    settings: ResponderSettings,
}

impl AdvisoryResponder {
    pub fn new(
        store: Arc<dyn StrategicStore>,
        backend: Option<Arc<dyn LlmBackend>>,
        settings: ResponderSettings,
    ) -> Self {
        Self {
            store,
            backend,
            settings,
        }
    }

    /// Name of the configured generation backend, for /status.
    pub fn backend_name(&self) -> Option<&'static str> {
        self.backend.as_ref().map(|b| b.backend_name())
    }

    /// Produce an advisory response for a free-text query.
    pub async fn respond(&self, query: &str) -> Result<AdvisoryResponse, AdvisoryError> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return Err(AdvisoryError::InvalidQuery);
        }
        let query = AdvisoryQuery::new(trimmed);

        // Fan-out / fan-in: both fetches run concurrently and both must
        // succeed before assembly. try_join! drops the surviving fetch as
        // soon as the other fails.
        let objectives_fut = async {
            timeout(
                self.settings.fetch_timeout,
                self.store.active_objectives(self.settings.objective_cap),
            )
            .await
            .map_err(|_| {
                anyhow!(
                    "objective fetch timed out after {:?}",
                    self.settings.fetch_timeout
                )
            })?
        };
        let signals_fut = async {
            timeout(
                self.settings.fetch_timeout,
                self.store.recent_signals(self.settings.signal_limit),
            )
            .await
            .map_err(|_| {
                anyhow!(
                    "signal fetch timed out after {:?}",
                    self.settings.fetch_timeout
                )
            })?
        };

        let (objectives, signals) =
            tokio::try_join!(objectives_fut, signals_fut).map_err(|e| {
                error!(query = %query.text, error = %e, "Strategic context fetch failed");
                AdvisoryError::ContextFetch(e)
            })?;

        let context_summary = ContextSummary {
            objective_count: objectives.len(),
            signal_count: signals.len(),
        };

        let (text, source) = match &self.backend {
            Some(backend) => {
                let prompt = context::build_prompt(&objectives, &signals, &query.text);
                match timeout(self.settings.generate_timeout, backend.generate(&prompt)).await {
                    Ok(Ok(text)) => (text, ResponseSource::Model),
                    Ok(Err(e)) => self.degrade(&objectives, &signals, &query.text, e)?,
                    Err(_) => self.degrade(
                        &objectives,
                        &signals,
                        &query.text,
                        anyhow!(
                            "generation timed out after {:?}",
                            self.settings.generate_timeout
                        ),
                    )?,
                }
            }
            None => (
                fallback::template_response(&objectives, &signals, &query.text),
                ResponseSource::Template,
            ),
        };

        debug!(
            query = %query.text,
            objectives = context_summary.objective_count,
            signals = context_summary.signal_count,
            source = %source,
            "Advisory response produced"
        );

        Ok(AdvisoryResponse {
            text,
            generated_at: Utc::now(),
            context_summary,
            source,
        })
    }

    /// Recover from a generation failure via the template, or surface the
    /// error when fallback is disabled by configuration.
    fn degrade(
        &self,
        objectives: &[crate::types::Objective],
        signals: &[crate::types::Signal],
        query: &str,
        cause: anyhow::Error,
    ) -> Result<(String, ResponseSource), AdvisoryError> {
        if !self.settings.fallback_enabled {
            error!(query = %query, error = %cause, "Generation failed and fallback is disabled");
            return Err(AdvisoryError::Generation(cause));
        }

        warn!(query = %query, error = %cause, "Generation failed — degrading to template");
        Ok((
            fallback::template_response(objectives, signals, query),
            ResponseSource::Template,
        ))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Objective, ObjectiveStatus, Signal};
    use anyhow::Result as AnyResult;
    use async_trait::async_trait;
    use chrono::Duration as ChronoDuration;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FakeStore {
        objectives: Vec<Objective>,
        signals: Vec<Signal>,
        objective_calls: AtomicUsize,
        signal_calls: AtomicUsize,
        delay: Option<Duration>,
        fail: bool,
    }

    impl FakeStore {
        fn new(objectives: Vec<Objective>, signals: Vec<Signal>) -> Self {
            Self {
                objectives,
                signals,
                objective_calls: AtomicUsize::new(0),
                signal_calls: AtomicUsize::new(0),
                delay: None,
                fail: false,
            }
        }

        fn failing() -> Self {
            let mut store = Self::new(vec![], vec![]);
            store.fail = true;
            store
        }

        fn slow(delay: Duration) -> Self {
            let mut store = Self::new(vec![], vec![]);
            store.delay = Some(delay);
            store
        }

        fn total_calls(&self) -> usize {
            self.objective_calls.load(Ordering::SeqCst) + self.signal_calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl StrategicStore for FakeStore {
        async fn active_objectives(&self, cap: usize) -> AnyResult<Vec<Objective>> {
            self.objective_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                anyhow::bail!("store unreachable");
            }
            Ok(self.objectives.iter().take(cap).cloned().collect())
        }

        async fn recent_signals(&self, limit: usize) -> AnyResult<Vec<Signal>> {
            self.signal_calls.fetch_add(1, Ordering::SeqCst);
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail {
                anyhow::bail!("store unreachable");
            }
            Ok(self.signals.iter().take(limit).cloned().collect())
        }
    }

    struct ScriptedBackend {
        reply: Option<String>,
    }

    #[async_trait]
    impl LlmBackend for ScriptedBackend {
        async fn generate(&self, prompt: &str) -> AnyResult<String> {
            match &self.reply {
                Some(reply) => Ok(format!("{reply} [prompt chars: {}]", prompt.len())),
                None => anyhow::bail!("backend exploded"),
            }
        }

        fn backend_name(&self) -> &'static str {
            "scripted"
        }
    }

    fn make_objective(id: &str) -> Objective {
        Objective {
            id: id.to_string(),
            title: "Market Penetration".to_string(),
            status: ObjectiveStatus::Active,
            owner_id: "ceo".to_string(),
            target_metric: "12% market share".to_string(),
            progress: 0.4,
        }
    }

    fn make_signal(id: &str, age_secs: i64) -> Signal {
        Signal {
            id: id.to_string(),
            text: "stakeholder hesitation noted".to_string(),
            source: "board-deck".to_string(),
            created_at: Utc::now() - ChronoDuration::seconds(age_secs),
            weight: 0.8,
        }
    }

    fn responder(store: Arc<FakeStore>, backend: Option<Arc<dyn LlmBackend>>) -> AdvisoryResponder {
        AdvisoryResponder::new(store, backend, ResponderSettings::default())
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_any_fetch() {
        let store = Arc::new(FakeStore::new(vec![], vec![]));
        let r = responder(Arc::clone(&store), None);

        for bad in ["", "   ", "\n\t"] {
            let err = r.respond(bad).await.unwrap_err();
            assert!(matches!(err, AdvisoryError::InvalidQuery));
        }
        assert_eq!(store.total_calls(), 0, "no store I/O before validation");
    }

    #[tokio::test]
    async fn test_counts_match_snapshot() {
        let store = Arc::new(FakeStore::new(
            vec![make_objective("a"), make_objective("b")],
            vec![make_signal("s1", 10), make_signal("s2", 20), make_signal("s3", 30)],
        ));
        let r = responder(store, None);

        let response = r.respond("status?").await.unwrap();
        assert_eq!(response.context_summary.objective_count, 2);
        assert_eq!(response.context_summary.signal_count, 3);
        assert_eq!(response.source, ResponseSource::Template);
    }

    #[tokio::test]
    async fn test_signal_limit_applied() {
        let signals: Vec<Signal> = (0..9).map(|i| make_signal(&format!("s{i}"), i * 60)).collect();
        let store = Arc::new(FakeStore::new(vec![], signals));
        let r = responder(store, None);

        let response = r.respond("signals?").await.unwrap();
        assert_eq!(response.context_summary.signal_count, 5);
    }

    #[tokio::test]
    async fn test_empty_context_still_succeeds() {
        let store = Arc::new(FakeStore::new(vec![], vec![]));
        let r = responder(store, None);

        let response = r.respond("anything to report?").await.unwrap();
        assert!(response.context_summary.is_empty());
        assert!(response.text.contains("0 active objectives"));
        assert!(response.text.contains("anything to report?"));
    }

    #[tokio::test]
    async fn test_store_failure_aborts_whole_operation() {
        let store = Arc::new(FakeStore::failing());
        let r = responder(store, None);

        let err = r.respond("status?").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::ContextFetch(_)));
    }

    #[tokio::test]
    async fn test_fetch_timeout_is_context_fetch_error() {
        let store = Arc::new(FakeStore::slow(Duration::from_secs(30)));
        let settings = ResponderSettings {
            fetch_timeout: Duration::from_millis(20),
            ..ResponderSettings::default()
        };
        let r = AdvisoryResponder::new(store, None, settings);

        let err = r.respond("status?").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::ContextFetch(_)));
    }

    #[tokio::test]
    async fn test_backend_reply_used_when_available() {
        let store = Arc::new(FakeStore::new(vec![make_objective("a")], vec![]));
        let backend: Arc<dyn LlmBackend> = Arc::new(ScriptedBackend {
            reply: Some("Briefing: on track.".to_string()),
        });
        let r = responder(store, Some(backend));

        let response = r.respond("status?").await.unwrap();
        assert_eq!(response.source, ResponseSource::Model);
        assert!(response.text.starts_with("Briefing: on track."));
    }

    #[tokio::test]
    async fn test_backend_failure_degrades_to_template() {
        let store = Arc::new(FakeStore::new(
            vec![make_objective("a")],
            vec![make_signal("s1", 5)],
        ));
        let backend: Arc<dyn LlmBackend> = Arc::new(ScriptedBackend { reply: None });
        let r = responder(store, Some(backend));

        let response = r.respond("status?").await.unwrap();
        assert_eq!(response.source, ResponseSource::Template);
        assert!(response.text.contains("1 active objective and 1 recent signal"));
        assert!(response.text.contains("\"status?\""));
    }

    #[tokio::test]
    async fn test_backend_failure_surfaces_when_fallback_disabled() {
        let store = Arc::new(FakeStore::new(vec![], vec![]));
        let backend: Arc<dyn LlmBackend> = Arc::new(ScriptedBackend { reply: None });
        let settings = ResponderSettings {
            fallback_enabled: false,
            ..ResponderSettings::default()
        };
        let r = AdvisoryResponder::new(store, Some(backend), settings);

        let err = r.respond("status?").await.unwrap_err();
        assert!(matches!(err, AdvisoryError::Generation(_)));
    }

    #[tokio::test]
    async fn test_template_deterministic_for_identical_inputs() {
        let store = Arc::new(FakeStore::new(
            vec![make_objective("a")],
            vec![make_signal("s1", 5)],
        ));
        let r = responder(store, None);

        let a = r.respond("status?").await.unwrap();
        let b = r.respond("status?").await.unwrap();
        assert_eq!(a.text, b.text);
    }

    #[tokio::test]
    async fn test_concurrent_calls_do_not_interfere() {
        let store = Arc::new(FakeStore::new(vec![make_objective("a")], vec![]));
        let r = responder(store, None);

        let mut handles = Vec::new();
        for i in 0..16 {
            let r = r.clone();
            handles.push(tokio::spawn(async move {
                let query = format!("query number {i}");
                let response = r.respond(&query).await.unwrap();
                (query, response)
            }));
        }

        for handle in handles {
            let (query, response) = handle.await.unwrap();
            assert!(
                response.text.contains(&format!("\"{query}\"")),
                "each response must echo its own query"
            );
        }
    }
}
