//! Sled-backed strategic store
//!
//! Uses separate trees for objectives and signals. Objectives are keyed by
//! id; signals are keyed by big-endian nanosecond timestamp (plus id suffix
//! to keep same-instant signals distinct), so reverse iteration yields
//! newest-first without a sort.

use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::Path;
use std::sync::Arc;

use super::StrategicStore;
use crate::types::{Objective, Signal};

const OBJECTIVES_TREE: &str = "objectives";
const SIGNALS_TREE: &str = "signals";

/// Storage for strategic state (objectives and signals)
#[derive(Clone)]
pub struct SledStore {
    db: Arc<sled::Db>,
}

impl SledStore {
    /// Open or create the strategic store database
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        let db = sled::open(path_ref).context("Failed to open strategic store")?;

        tracing::info!("Strategic store opened at {:?}", path_ref);

        Ok(Self { db: Arc::new(db) })
    }

    /// Insert or replace an objective.
    ///
    /// Note: Does not call flush() on each write for performance.
    /// Sled provides durability via background flushing.
    pub fn put_objective(&self, objective: &Objective) -> Result<()> {
        let tree = self
            .db
            .open_tree(OBJECTIVES_TREE)
            .context("Failed to open objectives tree")?;

        let value = serde_json::to_vec(objective).context("Failed to serialize objective")?;

        tree.insert(objective.id.as_bytes(), value)
            .context("Failed to insert objective")?;

        tracing::debug!(
            id = %objective.id,
            status = %objective.status,
            "Stored objective"
        );

        Ok(())
    }

    /// Insert or replace a signal.
    pub fn put_signal(&self, signal: &Signal) -> Result<()> {
        let tree = self
            .db
            .open_tree(SIGNALS_TREE)
            .context("Failed to open signals tree")?;

        let value = serde_json::to_vec(signal).context("Failed to serialize signal")?;

        tree.insert(signal_key(signal), value)
            .context("Failed to insert signal")?;

        tracing::debug!(id = %signal.id, source = %signal.source, "Stored signal");

        Ok(())
    }

    /// Total number of stored objectives (all statuses).
    pub fn objective_count(&self) -> Result<usize> {
        let tree = self
            .db
            .open_tree(OBJECTIVES_TREE)
            .context("Failed to open objectives tree")?;
        Ok(tree.len())
    }

    /// Total number of stored signals.
    pub fn signal_count(&self) -> Result<usize> {
        let tree = self
            .db
            .open_tree(SIGNALS_TREE)
            .context("Failed to open signals tree")?;
        Ok(tree.len())
    }

    /// Flush pending writes to disk. Used after bulk seeding.
    pub fn flush(&self) -> Result<()> {
        self.db.flush().context("Failed to flush strategic store")?;
        Ok(())
    }
}

/// Signal tree key: created_at nanos (big-endian) then id bytes.
fn signal_key(signal: &Signal) -> Vec<u8> {
    let nanos = signal
        .created_at
        .timestamp_nanos_opt()
        .unwrap_or_else(|| signal.created_at.timestamp() * 1_000_000_000);

    let mut key = nanos.to_be_bytes().to_vec();
    key.extend_from_slice(signal.id.as_bytes());
    key
}

#[async_trait]
impl StrategicStore for SledStore {
    async fn active_objectives(&self, cap: usize) -> Result<Vec<Objective>> {
        let tree = self
            .db
            .open_tree(OBJECTIVES_TREE)
            .context("Failed to open objectives tree")?;

        let mut objectives = Vec::new();
        let mut truncated = false;

        for item in tree.iter() {
            let (_key, value) = item.context("Failed to read from objectives tree")?;

            let objective: Objective = serde_json::from_slice(&value)
                .context("Malformed objective record in strategic store")?;

            if !objective.is_active() {
                continue;
            }

            if objectives.len() >= cap {
                truncated = true;
                break;
            }
            objectives.push(objective);
        }

        if truncated {
            tracing::warn!(
                cap,
                "Active objective snapshot exceeds cap — truncating in id order"
            );
        }
        tracing::debug!(count = objectives.len(), "Retrieved active objectives");

        Ok(objectives)
    }

    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>> {
        let tree = self
            .db
            .open_tree(SIGNALS_TREE)
            .context("Failed to open signals tree")?;

        let mut signals = Vec::new();

        // Keys are timestamp-ordered, so reverse iteration is newest-first.
        for item in tree.iter().rev() {
            if signals.len() >= limit {
                break;
            }

            let (_key, value) = item.context("Failed to read from signals tree")?;

            let signal: Signal = serde_json::from_slice(&value)
                .context("Malformed signal record in strategic store")?;
            signals.push(signal);
        }

        tracing::debug!(count = signals.len(), "Retrieved recent signals");

        Ok(signals)
    }
}

// ============================================================================
// Tests
// ============================================================================
