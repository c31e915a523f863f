//! Quinta OS: Executive Strategic Intelligence
//!
//! Advisory core behind the Quinta OS executive dashboard.
//!
//! ## Architecture
//!
//! - **Advisory Responder**: single-shot context aggregation and response
//!   generation (validate → fetch → assemble → generate or fall back)
//! - **Strategic Store**: read-side snapshot access to objectives and weak
//!   signals maintained by external systems
//! - **Generation Module**: opaque external text-generation capability,
//!   optional at runtime
//! - **API**: axum HTTP surface consumed by the dashboard

pub mod advisor;
pub mod api;
pub mod config;
pub mod llm;
pub mod storage;
pub mod types;

// Re-export configuration
pub use config::AdvisorConfig;

// Re-export commonly used types
pub use types::{
    AdvisoryQuery, AdvisoryResponse, ContextSummary, Objective, ObjectiveStatus, ResponseSource,
    Signal,
};

// Re-export the pipeline
pub use advisor::{AdvisoryError, AdvisoryResponder, ResponderSettings};

// Re-export storage
pub use storage::{SledStore, StrategicStore};

// Re-export generation components
pub use llm::{HttpBackend, LlmBackend, LlmFactory};
