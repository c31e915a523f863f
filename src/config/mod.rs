//! Service Configuration Module
//!
//! Provides deployment configuration loaded from TOML files, covering the
//! HTTP server, the strategic store, context assembly bounds, and the
//! optional generation capability.
//!
//! ## Loading Order
//!
//! 1. `QUINTA_CONFIG` environment variable (path to TOML file)
//! 2. `quinta.toml` in the current working directory
//! 3. Built-in defaults
//!
//! ## Usage
//!
//! Call `config::init()` once at startup, then `config::get()` anywhere:
//!
//! ```ignore
//! // In main():
//! config::init(AdvisorConfig::load());
//!
//! // Anywhere in the codebase:
//! let limit = config::get().context.signal_limit;
//! ```

mod advisor_config;

pub use advisor_config::*;

use std::sync::OnceLock;

/// Global service configuration, initialized once at startup.
static ADVISOR_CONFIG: OnceLock<AdvisorConfig> = OnceLock::new();

/// Initialize the global service configuration.
///
/// Must be called exactly once before any calls to `get()`.
pub fn init(config: AdvisorConfig) {
    if ADVISOR_CONFIG.set(config).is_err() {
        tracing::warn!("config::init() called more than once — ignoring");
    }
}

/// Get a reference to the global service configuration.
///
/// Panics if `init()` has not been called. A missing config is a fatal
/// startup error, not a recoverable condition.
pub fn get() -> &'static AdvisorConfig {
    ADVISOR_CONFIG
        .get()
        .expect("config::get() called before config::init() — this is a startup bug")
}

/// Check whether the config has been initialized.
///
/// Useful for tests and optional config paths.
pub fn is_initialized() -> bool {
    ADVISOR_CONFIG.get().is_some()
}
