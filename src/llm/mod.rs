//! Generation Backend Module
//!
//! Provides a unified interface over the external text-generation capability.
//! The responder treats generation as an opaque `(prompt) -> text` contract:
//! any completion service satisfying [`LlmBackend`] can be plugged in, and
//! the service functions without one at all (the responder degrades to its
//! deterministic template).

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;

mod http_backend;
pub use http_backend::HttpBackend;

use crate::config::GenerationConfig;

/// Unified trait for generation backends
#[async_trait]
pub trait LlmBackend: Send + Sync {
    /// Generate a response from the backend given a prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get the backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Factory for creating generation backends from config
pub struct LlmFactory;

impl LlmFactory {
    /// Create the configured backend, or `None` when generation is disabled.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn create(config: &GenerationConfig) -> Result<Option<Arc<dyn LlmBackend>>> {
        if !config.enabled {
            tracing::info!("Generation capability disabled — responder will run template-only");
            return Ok(None);
        }

        let backend = HttpBackend::new(config)?;

        tracing::info!(
            backend = backend.backend_name(),
            url = %config.url,
            model = %config.model,
            "Generation backend configured"
        );

        Ok(Some(Arc::new(backend)))
    }
}
