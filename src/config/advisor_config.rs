//! Advisor Configuration - deployment-tunable TOML values
//!
//! Every operational bound (signal cap, objective cap, timeouts) is a field
//! here. Each struct implements `Default`, so a missing or partial config
//! file yields a fully working service.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, warn};

// ============================================================================
// Top-Level Config
// ============================================================================

/// Root configuration for an advisory core deployment.
///
/// Load with `AdvisorConfig::load()` which searches:
/// 1. `$QUINTA_CONFIG` env var
/// 2. `./quinta.toml`
/// 3. Built-in defaults
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AdvisorConfig {
    /// Deployment identification
    #[serde(default)]
    pub deployment: DeploymentConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Strategic store location
    #[serde(default)]
    pub store: StoreConfig,

    /// Context assembly bounds and fetch timeouts
    #[serde(default)]
    pub context: ContextConfig,

    /// External generation capability
    #[serde(default)]
    pub generation: GenerationConfig,
}

impl AdvisorConfig {
    /// Load configuration using the standard search order:
    /// 1. `$QUINTA_CONFIG` environment variable
    /// 2. `./quinta.toml` in the current working directory
    /// 3. Built-in defaults
    pub fn load() -> Self {
        if let Ok(path) = std::env::var("QUINTA_CONFIG") {
            let p = PathBuf::from(&path);
            if p.exists() {
                match Self::load_from_file(&p) {
                    Ok(config) => {
                        info!(path = %p.display(), deployment = %config.deployment.name, "Loaded config from QUINTA_CONFIG");
                        return config;
                    }
                    Err(e) => {
                        warn!(path = %p.display(), error = %e, "Failed to load config from QUINTA_CONFIG, falling back");
                    }
                }
            } else {
                warn!(path = %path, "QUINTA_CONFIG points to non-existent file, falling back");
            }
        }

        let local = PathBuf::from("quinta.toml");
        if local.exists() {
            match Self::load_from_file(&local) {
                Ok(config) => {
                    info!(deployment = %config.deployment.name, "Loaded config from ./quinta.toml");
                    return config;
                }
                Err(e) => {
                    warn!(error = %e, "Failed to load ./quinta.toml, using defaults");
                }
            }
        }

        info!("No quinta.toml found — using built-in defaults");
        Self::default()
    }

    /// Load from a specific TOML file path.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::Io(path.to_path_buf(), e))?;

        let config: Self =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(path.to_path_buf(), e))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate bounds for internal consistency.
    ///
    /// Rules:
    /// - Caps and timeouts must be > 0
    /// - A configured generation capability must carry a non-empty URL
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut errors: Vec<String> = Vec::new();

        if self.context.signal_limit == 0 {
            errors.push("context.signal_limit must be > 0".to_string());
        }
        if self.context.objective_cap == 0 {
            errors.push("context.objective_cap must be > 0".to_string());
        }
        if self.context.fetch_timeout_ms == 0 {
            errors.push("context.fetch_timeout_ms must be > 0".to_string());
        }
        if self.generation.timeout_ms == 0 {
            errors.push("generation.timeout_ms must be > 0".to_string());
        }
        if self.generation.enabled && self.generation.url.trim().is_empty() {
            errors.push("generation.url must be set when generation.enabled = true".to_string());
        }
        if self.server.addr.trim().is_empty() {
            errors.push("server.addr must not be empty".to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(ConfigError::Validation(errors))
        }
    }
}

// ============================================================================
// Sections
// ============================================================================

/// Deployment identification, shown in logs and /status.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default = "default_deployment_name")]
    pub name: String,
}

fn default_deployment_name() -> String {
    "quinta".to_string()
}

impl Default for DeploymentConfig {
    fn default() -> Self {
        Self {
            name: default_deployment_name(),
        }
    }
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP server bind address.
    ///
    /// Can be overridden by `QUINTA_SERVER_ADDR` env var or `--addr` CLI flag.
    #[serde(default = "default_server_addr")]
    pub addr: String,

    /// Optional shared bearer token for `/api/v1/*` requests.
    ///
    /// Identity verification proper belongs to the fronting gateway; this
    /// hook only compares an opaque already-issued secret. Unset = open.
    #[serde(default)]
    pub auth_token: Option<String>,
}

fn default_server_addr() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_server_addr(),
            auth_token: None,
        }
    }
}

/// Strategic store location.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Path to the sled database directory.
    #[serde(default = "default_store_path")]
    pub path: String,
}

fn default_store_path() -> String {
    "./data/strategic.db".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: default_store_path(),
        }
    }
}

/// Bounds on the context snapshot fed into prompt assembly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextConfig {
    /// Maximum recent signals embedded in context (newest-first).
    #[serde(default = "default_signal_limit")]
    pub signal_limit: usize,

    /// Maximum active objectives embedded in context. Snapshots larger than
    /// this are truncated in id order and the truncation is logged.
    #[serde(default = "default_objective_cap")]
    pub objective_cap: usize,

    /// Per-fetch timeout for the two store reads.
    #[serde(default = "default_fetch_timeout_ms")]
    pub fetch_timeout_ms: u64,
}

fn default_signal_limit() -> usize {
    5
}

fn default_objective_cap() -> usize {
    100
}

fn default_fetch_timeout_ms() -> u64 {
    5_000
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            signal_limit: default_signal_limit(),
            objective_cap: default_objective_cap(),
            fetch_timeout_ms: default_fetch_timeout_ms(),
        }
    }
}

/// External generation capability configuration.
///
/// When `enabled` is false (the default) the responder runs fallback-only
/// and degrades to the deterministic templated summary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Whether to delegate to the external completion endpoint at all.
    #[serde(default)]
    pub enabled: bool,

    /// Completion endpoint URL (Ollama-style `/api/generate`).
    #[serde(default = "default_generation_url")]
    pub url: String,

    /// Model name passed through to the endpoint.
    #[serde(default = "default_generation_model")]
    pub model: String,

    /// Timeout for a single generation call.
    #[serde(default = "default_generation_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether a failing generation call degrades to the templated summary.
    /// When false, generation failures surface to the caller as errors.
    #[serde(default = "default_fallback_enabled")]
    pub fallback_enabled: bool,
}

fn default_generation_url() -> String {
    "http://localhost:11434/api/generate".to_string()
}

fn default_generation_model() -> String {
    "llama3.2:latest".to_string()
}

fn default_generation_timeout_ms() -> u64 {
    30_000
}

fn default_fallback_enabled() -> bool {
    true
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            url: default_generation_url(),
            model: default_generation_model(),
            timeout_ms: default_generation_timeout_ms(),
            fallback_enabled: default_fallback_enabled(),
        }
    }
}

// ============================================================================
// Errors
// ============================================================================

/// Configuration loading and validation errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error ({0}): {1}")]
    Io(PathBuf, std::io::Error),
    #[error("config parse error ({0}): {1}")]
    Parse(PathBuf, toml::de::Error),
    #[error("config validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_validates() {
        let config = AdvisorConfig::default();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config = AdvisorConfig::default();
        assert_eq!(config.context.signal_limit, 5);
        assert_eq!(config.context.objective_cap, 100);
        assert!(!config.generation.enabled);
        assert!(config.generation.fallback_enabled);
        assert_eq!(config.server.addr, "0.0.0.0:8080");
        assert!(config.server.auth_token.is_none());
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let toml_str = r#"
            [context]
            signal_limit = 8

            [generation]
            enabled = true
            url = "http://gen.internal:11434/api/generate"
        "#;

        let config: AdvisorConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.context.signal_limit, 8);
        assert_eq!(config.context.objective_cap, 100);
        assert!(config.generation.enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_signal_limit_rejected() {
        let toml_str = r#"
            [context]
            signal_limit = 0
        "#;

        let config: AdvisorConfig = toml::from_str(toml_str).unwrap();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("signal_limit"));
    }

    #[test]
    fn test_enabled_generation_requires_url() {
        let toml_str = r#"
            [generation]
            enabled = true
            url = ""
        "#;

        let config: AdvisorConfig = toml::from_str(toml_str).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("quinta.toml");
        std::fs::write(
            &path,
            r#"
                [deployment]
                name = "acme-exec"

                [server]
                addr = "127.0.0.1:9090"
                auth_token = "s3cret"
            "#,
        )
        .unwrap();

        let config = AdvisorConfig::load_from_file(&path).unwrap();
        assert_eq!(config.deployment.name, "acme-exec");
        assert_eq!(config.server.addr, "127.0.0.1:9090");
        assert_eq!(config.server.auth_token.as_deref(), Some("s3cret"));
    }
}
