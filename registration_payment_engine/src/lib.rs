//! Registration Payment Engine
//!
//! The reconciliation core for the registration payment server. It merges client-reported and gateway-reported
//! payment outcomes into one authoritative record per gateway order, and keeps the owning team's payment status in
//! lock-step with it.
//!
//! The library is divided into two main sections:
//! 1. Database management ([`mod@sqlite`]). SQLite is the supported backend. You should never need to access the
//!    database directly; use the public API instead. The exception is the data types, which live in [`mod@db_types`]
//!    and are public.
//! 2. The reconciliation API ([`mod@reconciler`]). Backends implement the [`traits::ReconciliationStore`] trait to
//!    drive it. Every write is an upsert keyed by `order_id`, so concurrent webhook deliveries and checkout callbacks
//!    converge instead of conflicting.

pub mod db_types;
pub mod reconciler;
pub mod traits;

#[cfg(feature = "sqlite")]
mod sqlite;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteDatabase;

pub use reconciler::{PaymentEvent, PaymentEventKind, ReconcilerApi, ReconcilerError, WebhookOutcome};
