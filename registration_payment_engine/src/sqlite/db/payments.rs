use log::trace;
use sqlx::SqliteConnection;

use crate::db_types::{NewPaymentRecord, OrderId, PaymentRecord, PaymentUpdate};

/// Inserts the payment record, merging into the existing row if one already exists for the order id.
///
/// The merge never loses information: a `NULL` team id or payment id in the incoming record keeps whatever the row
/// already holds, and an incoming `pending` status never downgrades a row the gateway has already settled. A settled
/// incoming status wins, since the caller has fresher knowledge of the outcome than the stored row does.
pub async fn upsert_payment(
    payment: NewPaymentRecord,
    conn: &mut SqliteConnection,
) -> Result<PaymentRecord, sqlx::Error> {
    let record = sqlx::query_as(
        r#"
            INSERT INTO payments (team_id, order_id, payment_id, amount, currency, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (order_id) DO UPDATE SET
                team_id = COALESCE(excluded.team_id, team_id),
                payment_id = COALESCE(excluded.payment_id, payment_id),
                amount = excluded.amount,
                currency = excluded.currency,
                status = CASE WHEN excluded.status = 'pending' THEN status ELSE excluded.status END,
                updated_at = CURRENT_TIMESTAMP
            RETURNING *;
        "#,
    )
    .bind(payment.team_id)
    .bind(payment.order_id.as_str())
    .bind(payment.payment_id)
    .bind(payment.amount)
    .bind(payment.currency)
    .bind(payment.status)
    .fetch_one(conn)
    .await?;
    trace!("🗃️ Payment record for order {} upserted", payment.order_id);
    Ok(record)
}

/// Applies a partial update to the payment record for the order id. `None` fields keep their stored values, except
/// `failure_reason`, which is cleared whenever the new status is not `failed`.
///
/// `completed` is terminal: a late or replayed failure event leaves a completed row entirely untouched, so
/// out-of-order deliveries cannot unsettle a payment. The reverse transition (`failed` to `completed`) is a
/// legitimate payment recovery and goes through.
///
/// Returns `None` if no row exists for the order id.
pub async fn update_payment(
    update: PaymentUpdate,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let record = sqlx::query_as(
        r#"
            UPDATE payments SET
                payment_id = CASE
                    WHEN status = 'completed' AND $5 = 'failed' THEN payment_id
                    ELSE COALESCE($2, payment_id) END,
                amount = CASE
                    WHEN status = 'completed' AND $5 = 'failed' THEN amount
                    ELSE COALESCE($3, amount) END,
                currency = CASE
                    WHEN status = 'completed' AND $5 = 'failed' THEN currency
                    ELSE COALESCE($4, currency) END,
                failure_reason = CASE
                    WHEN status = 'completed' AND $5 = 'failed' THEN failure_reason
                    WHEN $5 = 'failed' THEN COALESCE($6, failure_reason)
                    ELSE NULL END,
                status = CASE
                    WHEN status = 'completed' AND $5 = 'failed' THEN status
                    ELSE $5 END,
                updated_at = CURRENT_TIMESTAMP
            WHERE order_id = $1
            RETURNING *;
        "#,
    )
    .bind(update.order_id.as_str())
    .bind(update.payment_id)
    .bind(update.amount)
    .bind(update.currency)
    .bind(update.status)
    .bind(update.failure_reason)
    .fetch_optional(conn)
    .await?;
    Ok(record)
}

pub async fn fetch_payment_by_order_id(
    order_id: &OrderId,
    conn: &mut SqliteConnection,
) -> Result<Option<PaymentRecord>, sqlx::Error> {
    let record = sqlx::query_as("SELECT * FROM payments WHERE order_id = $1")
        .bind(order_id.as_str())
        .fetch_optional(conn)
        .await?;
    Ok(record)
}
