//! Shared data structures for the strategic advisory pipeline
//!
//! This module defines the core types flowing through the responder:
//! - Objective / Signal: the strategic state snapshot read from the store
//! - AdvisoryQuery: a transient free-text request
//! - AdvisoryResponse + ContextSummary: the transient output returned to callers
//!
//! Objectives and Signals are owned and mutated by external systems; this
//! service only reads a snapshot per invocation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Strategic State
// ============================================================================

/// Lifecycle status of an objective (OKR)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ObjectiveStatus {
    #[default]
    Active,
    Completed,
    Archived,
}

impl std::fmt::Display for ObjectiveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ObjectiveStatus::Active => write!(f, "active"),
            ObjectiveStatus::Completed => write!(f, "completed"),
            ObjectiveStatus::Archived => write!(f, "archived"),
        }
    }
}

/// A strategic goal with a measurable target and status.
///
/// Only `Active` objectives enter context assembly; completed and archived
/// objectives remain in the store for the dashboard's history views.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Objective {
    pub id: String,
    pub title: String,
    pub status: ObjectiveStatus,
    pub owner_id: String,
    pub target_metric: String,
    /// Completion fraction, 0.0–1.0
    pub progress: f64,
}

impl Objective {
    pub fn is_active(&self) -> bool {
        self.status == ObjectiveStatus::Active
    }
}

/// A recent, time-stamped observation treated as weak evidence of emerging
/// risk or opportunity.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Signal {
    pub id: String,
    pub text: String,
    pub source: String,
    pub created_at: DateTime<Utc>,
    /// Salience weight assigned by the emitting system
    pub weight: f64,
}

// ============================================================================
// Advisory Request / Response
// ============================================================================

/// Transient advisory request. Not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryQuery {
    pub text: String,
    pub requested_at: DateTime<Utc>,
}

impl AdvisoryQuery {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            requested_at: Utc::now(),
        }
    }
}

/// How the response text was produced
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseSource {
    /// Delegated to the external generation capability
    Model,
    /// Deterministic templated summary
    Template,
}

impl std::fmt::Display for ResponseSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseSource::Model => write!(f, "model"),
            ResponseSource::Template => write!(f, "template"),
        }
    }
}

/// Sizes of the context snapshot that backed a response.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ContextSummary {
    /// Active objectives embedded in the prompt context
    pub objective_count: usize,
    /// Recent signals embedded in the prompt context
    pub signal_count: usize,
}

impl ContextSummary {
    pub fn is_empty(&self) -> bool {
        self.objective_count == 0 && self.signal_count == 0
    }
}

/// Advisory text returned to the caller. Transient, not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisoryResponse {
    pub text: String,
    pub generated_at: DateTime<Utc>,
    pub context_summary: ContextSummary,
    pub source: ResponseSource,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_objective_status_serde_lowercase() {
        let json = serde_json::to_string(&ObjectiveStatus::Active).unwrap();
        assert_eq!(json, "\"active\"");

        let parsed: ObjectiveStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(parsed, ObjectiveStatus::Archived);
    }

    #[test]
    fn test_objective_roundtrip() {
        let obj = Objective {
            id: "obj-1".to_string(),
            title: "Market Penetration".to_string(),
            status: ObjectiveStatus::Active,
            owner_id: "ceo".to_string(),
            target_metric: "12% market share".to_string(),
            progress: 0.4,
        };

        let json = serde_json::to_vec(&obj).unwrap();
        let back: Objective = serde_json::from_slice(&json).unwrap();
        assert_eq!(back, obj);
        assert!(back.is_active());
    }

    #[test]
    fn test_context_summary_empty() {
        let summary = ContextSummary {
            objective_count: 0,
            signal_count: 0,
        };
        assert!(summary.is_empty());

        let summary = ContextSummary {
            objective_count: 1,
            signal_count: 0,
        };
        assert!(!summary.is_empty());
    }
}
