//! The reconciliation API.
//!
//! [`ReconcilerApi`] is the primary API for merging payment outcomes into the database, whether they arrive via the
//! gateway's webhook or via a client-side checkout callback that the server has already verified.
//!
//! The two paths deliberately share one storage primitive each:
//! * the registration path *upserts* by order id, so a webhook that raced ahead of the registration write is merged
//!   rather than clobbered;
//! * the webhook path *updates* by order id and treats a missing record as "not ours", so deliveries for foreign or
//!   purged orders are acknowledged and dropped without side effects.

use std::fmt::Debug;

use log::*;
use rpg_common::{Paise, Rupees};
use thiserror::Error;

use crate::{
    db_types::{
        NewPaymentRecord,
        NewRegistration,
        OrderId,
        PaymentRecord,
        PaymentStatus,
        PaymentUpdate,
        TeamRecord,
        VerifiedPayment,
    },
    traits::{ReconciliationStore, StorageError},
};

//--------------------------------------    PaymentEvent      ---------------------------------------------------------

/// The gateway event names that settle a payment. Everything else is acknowledged without touching the database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaymentEventKind {
    /// `payment.captured`. The payment succeeded.
    Captured,
    /// `order.paid`. The order is fully paid. Treated identically to [`PaymentEventKind::Captured`] so that whichever
    /// of the two deliveries arrives first settles the record.
    OrderPaid,
    /// `payment.failed`. The payment attempt failed.
    Failed,
    /// Any other event name. Recorded verbatim for logging.
    Other(String),
}

impl PaymentEventKind {
    pub fn from_event_name(name: &str) -> Self {
        match name {
            "payment.captured" => Self::Captured,
            "order.paid" => Self::OrderPaid,
            "payment.failed" => Self::Failed,
            other => Self::Other(other.to_string()),
        }
    }

    /// The payment status this event settles the record to, or `None` if the event is not a settlement.
    pub fn final_status(&self) -> Option<PaymentStatus> {
        match self {
            Self::Captured | Self::OrderPaid => Some(PaymentStatus::Completed),
            Self::Failed => Some(PaymentStatus::Failed),
            Self::Other(_) => None,
        }
    }
}

/// A payment outcome reported by the gateway, already authenticated and parsed by the caller.
///
/// `amount` is in minor units as the gateway reports it. The reconciler converts to major units exactly once, here,
/// before anything is stored.
#[derive(Debug, Clone)]
pub struct PaymentEvent {
    pub kind: PaymentEventKind,
    pub order_id: OrderId,
    pub payment_id: Option<String>,
    pub amount: Option<Paise>,
    pub currency: Option<String>,
    pub failure_reason: Option<String>,
}

/// What a webhook delivery amounted to. All variants are acknowledged to the gateway; the distinction is for logging
/// and tests.
#[derive(Debug, Clone)]
pub enum WebhookOutcome {
    /// The payment record was settled (possibly a no-op re-settlement of the same status).
    Updated { payment: PaymentRecord, team_marked_paid: bool },
    /// No payment record exists for the order id. The event was dropped.
    UnknownOrder,
    /// The event kind is not one we reconcile.
    Unhandled,
}

#[derive(Debug, Clone, Error)]
pub enum ReconcilerError {
    #[error("{0}")]
    StorageError(#[from] StorageError),
}

//--------------------------------------    ReconcilerApi     ---------------------------------------------------------

/// `ReconcilerApi` is the primary API for handling registration and payment flows in response to checkout callbacks
/// and gateway webhook events.
pub struct ReconcilerApi<B> {
    db: B,
}

impl<B> Debug for ReconcilerApi<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ReconcilerApi")
    }
}

impl<B> ReconcilerApi<B> {
    pub fn new(db: B) -> Self {
        Self { db }
    }
}

impl<B> ReconcilerApi<B>
where B: ReconciliationStore
{
    /// Records a freshly created gateway order as a pending payment.
    ///
    /// This row is what makes the webhook path recognise the order as ours. Calling it again for the same order id
    /// merges instead of duplicating, so a retried order-creation request is harmless.
    pub async fn record_new_order(
        &self,
        order_id: OrderId,
        amount: Rupees,
        currency: &str,
    ) -> Result<PaymentRecord, ReconcilerError> {
        let record = NewPaymentRecord {
            team_id: None,
            order_id,
            payment_id: None,
            amount,
            currency: currency.to_string(),
            status: PaymentStatus::Pending,
        };
        let record = self.db.upsert_payment_by_order_id(record).await?;
        debug!("🔄️💳️ Order {} recorded as pending for {}", record.order_id, record.amount);
        Ok(record)
    }

    /// Persists a registration whose checkout signature has already been verified.
    ///
    /// The payment record is written as completed with the verified payment id attached. If the webhook settled the
    /// order first, the existing record is merged rather than duplicated.
    pub async fn register_paid_team(
        &self,
        registration: NewRegistration,
        payment: VerifiedPayment,
        fee: Rupees,
        currency: &str,
    ) -> Result<TeamRecord, ReconcilerError> {
        let order_id = payment.order_id.clone();
        let record = NewPaymentRecord {
            team_id: None,
            order_id,
            payment_id: Some(payment.payment_id),
            amount: fee,
            currency: currency.to_string(),
            status: PaymentStatus::Completed,
        };
        let team = self.db.insert_team_with_payment(registration, Some(record)).await?;
        info!("🔄️📦️ Team '{}' registered with a completed payment, id #{}", team.team_name, team.id);
        Ok(team)
    }

    /// Persists a registration that has no payment attached yet. The webhook is expected to settle it later.
    pub async fn register_unpaid_team(&self, registration: NewRegistration) -> Result<TeamRecord, ReconcilerError> {
        let team = self.db.insert_team_with_payment(registration, None).await?;
        info!("🔄️📦️ Team '{}' registered without payment, id #{}", team.team_name, team.id);
        Ok(team)
    }

    /// Applies an authenticated gateway event to the matching payment record and, on completion, propagates the
    /// result to the owning team.
    ///
    /// This call is idempotent: replaying the same delivery any number of times leaves the database in the same
    /// state as a single delivery.
    pub async fn process_webhook_event(&self, event: PaymentEvent) -> Result<WebhookOutcome, ReconcilerError> {
        let Some(status) = event.kind.final_status() else {
            debug!("🔄️💳️ Ignoring webhook event {:?} for order {}", event.kind, event.order_id);
            return Ok(WebhookOutcome::Unhandled);
        };
        let failure_reason = match status {
            PaymentStatus::Failed => event.failure_reason.clone(),
            _ => None,
        };
        let update = PaymentUpdate {
            order_id: event.order_id.clone(),
            payment_id: event.payment_id.clone(),
            amount: event.amount.map(Paise::to_rupees),
            currency: event.currency.clone(),
            status,
            failure_reason,
        };
        let Some(payment) = self.db.update_payment_by_order_id(update).await? else {
            info!("🔄️💳️ Webhook for unknown order {}. Acknowledged and dropped.", event.order_id);
            return Ok(WebhookOutcome::UnknownOrder);
        };
        debug!("🔄️💳️ Order {} settled as {} ({})", payment.order_id, payment.status, payment.amount);
        let mut team_marked_paid = false;
        if payment.status == PaymentStatus::Completed {
            if let Some(team_id) = payment.team_id {
                team_marked_paid = self.db.mark_team_paid(team_id).await?;
                if team_marked_paid {
                    info!("🔄️📦️ Team #{team_id} marked as paid via order {}", payment.order_id);
                }
            }
        }
        Ok(WebhookOutcome::Updated { payment, team_marked_paid })
    }

    /// Fetches the payment record for an order id.
    pub async fn payment_for_order(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, ReconcilerError> {
        Ok(self.db.fetch_payment_by_order_id(order_id).await?)
    }

    /// Fetches a team by id.
    pub async fn team(&self, team_id: i64) -> Result<Option<TeamRecord>, ReconcilerError> {
        Ok(self.db.fetch_team(team_id).await?)
    }

    /// Closes the underlying database connections.
    pub async fn close(&self) -> Result<(), ReconcilerError> {
        Ok(self.db.close().await?)
    }
}
