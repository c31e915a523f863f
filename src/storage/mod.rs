//! Strategic State Storage
//!
//! Read-side access to the objective and signal records that external
//! systems maintain, behind the [`StrategicStore`] trait so the responder
//! can be exercised against fakes. The production implementation
//! ([`SledStore`]) uses Sled with one tree per record kind.
//!
//! Write paths exist for seeding and tests only — this service never
//! mutates strategic state on behalf of a caller.

mod sled_store;

pub use sled_store::SledStore;

use crate::types::{Objective, Signal};
use anyhow::Result;
use async_trait::async_trait;

/// Read access to the strategic state snapshot.
///
/// Any store satisfying filter + order + limit read semantics suffices;
/// implementations must return signals strictly newest-first.
#[async_trait]
pub trait StrategicStore: Send + Sync {
    /// All objectives with `status == active`, truncated to `cap`.
    async fn active_objectives(&self, cap: usize) -> Result<Vec<Objective>>;

    /// The most recent signals ordered by `created_at` descending,
    /// at most `limit` of them.
    async fn recent_signals(&self, limit: usize) -> Result<Vec<Signal>>;
}
