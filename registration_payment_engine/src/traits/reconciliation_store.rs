use thiserror::Error;

use crate::db_types::{
    NewPaymentRecord,
    NewRegistration,
    OrderId,
    PaymentRecord,
    PaymentUpdate,
    TeamRecord,
};

/// This trait defines the storage behaviour backends must provide to support payment reconciliation.
///
/// This behaviour includes:
/// * Upserting payment records keyed by the gateway order id.
/// * Applying gateway-reported outcome updates to existing records.
/// * Persisting a full registration submission with its payment record.
/// * Propagating a completed payment to the owning team.
#[allow(async_fn_in_trait)]
pub trait ReconciliationStore {
    /// The URL of the database
    fn url(&self) -> &str;

    /// Inserts the payment record, or, if a record for the same order id already exists, merges the new values into
    /// it. Fields that are `None` in the new record never overwrite stored values. Returns the record as stored.
    async fn upsert_payment_by_order_id(&self, payment: NewPaymentRecord) -> Result<PaymentRecord, StorageError>;

    /// Applies a gateway-reported outcome to the payment record for the given order id.
    ///
    /// A record that has already settled as completed must not be downgraded by a late failure event; implementations
    /// leave such a row untouched and return it as stored.
    ///
    /// Returns `None` if no record exists for the order id. That is not an error: webhook deliveries for orders this
    /// system never created (or that were purged) are acknowledged and dropped by the caller.
    async fn update_payment_by_order_id(&self, update: PaymentUpdate) -> Result<Option<PaymentRecord>, StorageError>;

    /// Persists a registration submission: the team row, its members, project details and teacher verification, and
    /// a payment record tied to the new team. The submission is all-or-nothing; if any insert after the team row
    /// fails (children or the payment record), the team row is deleted again and the error is returned so the
    /// client can retry.
    ///
    /// `payment` may be `None` for registrations saved before any payment attempt.
    async fn insert_team_with_payment(
        &self,
        registration: NewRegistration,
        payment: Option<NewPaymentRecord>,
    ) -> Result<TeamRecord, StorageError>;

    /// Marks the team's payment status as completed. Idempotent: calling this for an already-completed team is a
    /// no-op. Returns `true` if the row was actually changed by this call.
    async fn mark_team_paid(&self, team_id: i64) -> Result<bool, StorageError>;

    /// Fetches a team by its internal id.
    async fn fetch_team(&self, team_id: i64) -> Result<Option<TeamRecord>, StorageError>;

    /// Fetches the payment record for the given gateway order id, if one exists.
    async fn fetch_payment_by_order_id(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, StorageError>;

    /// Closes the connection pool.
    async fn close(&self) -> Result<(), StorageError>;
}

#[derive(Debug, Clone, Error)]
pub enum StorageError {
    #[error("We have an internal database engine error (configuration/uptime etc.): {0}")]
    DatabaseError(String),
    #[error("A team with the name '{0}' is already registered")]
    DuplicateTeamName(String),
    #[error("The registration submission is invalid: {0}")]
    InvalidRegistration(String),
}

impl From<sqlx::Error> for StorageError {
    fn from(e: sqlx::Error) -> Self {
        StorageError::DatabaseError(e.to_string())
    }
}
