//! # Storage contracts for the reconciliation engine.
//!
//! Backends implement [`ReconciliationStore`] to plug into [`crate::ReconcilerApi`]. The trait is deliberately
//! narrow: every mutation is either an upsert or an idempotent update keyed by the gateway order id, so the engine
//! never needs to reason about "insert vs update" races between the webhook path and the registration path.

mod reconciliation_store;

pub use reconciliation_store::{ReconciliationStore, StorageError};
