//! `SqliteDatabase` is a concrete implementation of a registration payment engine backend.
//!
//! Unsurprisingly, it uses SQLite as the backend and implements the [`crate::traits::ReconciliationStore`] trait.
use std::fmt::Debug;

use log::*;
use sqlx::{SqliteConnection, SqlitePool};

use super::db::{db_url, is_unique_violation, new_pool, payments, teams};
use crate::{
    db_types::{NewPaymentRecord, NewRegistration, OrderId, PaymentRecord, PaymentStatus, PaymentUpdate, TeamRecord},
    traits::{ReconciliationStore, StorageError},
};

#[derive(Clone)]
pub struct SqliteDatabase {
    url: String,
    pool: SqlitePool,
}

impl Debug for SqliteDatabase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "SqliteDatabase ({:?})", self.pool)
    }
}

impl SqliteDatabase {
    /// Creates a new connection pool using the URL from the `RPS_DATABASE_URL` environment variable.
    pub async fn new(max_connections: u32) -> Result<Self, sqlx::Error> {
        let url = db_url();
        Self::new_with_url(&url, max_connections).await
    }

    pub async fn new_with_url(url: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = new_pool(url, max_connections).await?;
        Ok(Self { url: url.to_string(), pool })
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Brings the schema up to date. Safe to call on every startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        super::db::run_migrations(&self.pool).await
    }

    async fn insert_children(
        team_id: i64,
        registration: &NewRegistration,
        conn: &mut SqliteConnection,
    ) -> Result<(), sqlx::Error> {
        for member in &registration.members {
            teams::insert_member(team_id, member, &mut *conn).await?;
        }
        teams::insert_project_details(team_id, &registration.project, &mut *conn).await?;
        teams::insert_teacher_verification(team_id, &registration.teacher, &mut *conn).await?;
        Ok(())
    }
}

fn validate_registration(registration: &NewRegistration) -> Result<(), StorageError> {
    let team = &registration.team;
    if team.team_name.trim().is_empty() {
        return Err(StorageError::InvalidRegistration("team name must not be empty".to_string()));
    }
    if team.school_name.trim().is_empty() || team.school_district.trim().is_empty() {
        return Err(StorageError::InvalidRegistration("school name and district must not be empty".to_string()));
    }
    if registration.members.is_empty() {
        return Err(StorageError::InvalidRegistration("at least one team member is required".to_string()));
    }
    Ok(())
}

impl ReconciliationStore for SqliteDatabase {
    fn url(&self) -> &str {
        self.url.as_str()
    }

    async fn upsert_payment_by_order_id(&self, payment: NewPaymentRecord) -> Result<PaymentRecord, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let record = payments::upsert_payment(payment, &mut conn).await?;
        debug!("🗃️ Payment for order {} stored as {} with id {}", record.order_id, record.status, record.id);
        Ok(record)
    }

    async fn update_payment_by_order_id(&self, update: PaymentUpdate) -> Result<Option<PaymentRecord>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let record = payments::update_payment(update, &mut conn).await?;
        Ok(record)
    }

    /// Persists a full registration submission.
    ///
    /// The team row goes in first, then the team code, then members, project and teacher rows, then the payment
    /// record. If any insert after the team row fails, the team row and everything attached to it is deleted again
    /// before the error is returned, so a failed registration never leaves a half-written team behind and the
    /// client can retry the whole submission.
    async fn insert_team_with_payment(
        &self,
        registration: NewRegistration,
        payment: Option<NewPaymentRecord>,
    ) -> Result<TeamRecord, StorageError> {
        validate_registration(&registration)?;
        let paid = payment.as_ref().map(|p| p.status == PaymentStatus::Completed).unwrap_or(false);
        let mut conn = self.pool.acquire().await?;
        let team = teams::insert_team(&registration.team, paid, &mut conn).await.map_err(|e| {
            if is_unique_violation(&e) {
                StorageError::DuplicateTeamName(registration.team.team_name.clone())
            } else {
                e.into()
            }
        })?;
        debug!("🗃️ Team '{}' inserted with id {}", team.team_name, team.id);
        let code = teams::team_code_for(&registration.team.school_district, team.id);
        if let Err(e) = teams::set_team_code(team.id, &code, &mut conn).await {
            // The code is a convenience for organisers; the registration stands without it.
            warn!("🗃️ Could not assign team code {code} to team #{}: {e}", team.id);
        }
        if let Err(e) = Self::insert_children(team.id, &registration, &mut conn).await {
            warn!("🗃️ Registration for team #{} failed partway: {e}. Rolling the team back.", team.id);
            if let Err(del) = teams::delete_team(team.id, &mut conn).await {
                error!("🗃️ Could not remove partially registered team #{}: {del}", team.id);
            }
            return Err(e.into());
        }
        if let Some(mut record) = payment {
            record.team_id = Some(team.id);
            let order_id = record.order_id.clone();
            if let Err(e) = payments::upsert_payment(record, &mut conn).await {
                warn!(
                    "🗃️ Could not store payment for order {order_id} with team #{}: {e}. Rolling the team back.",
                    team.id
                );
                if let Err(del) = teams::delete_team(team.id, &mut conn).await {
                    error!("🗃️ Could not remove team #{} after a failed payment write: {del}", team.id);
                }
                return Err(e.into());
            }
        }
        let team = teams::fetch_team(team.id, &mut conn)
            .await?
            .ok_or_else(|| StorageError::DatabaseError("team row vanished during registration".to_string()))?;
        Ok(team)
    }

    async fn mark_team_paid(&self, team_id: i64) -> Result<bool, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let changed = teams::mark_team_paid(team_id, &mut conn).await?;
        Ok(changed)
    }

    async fn fetch_team(&self, team_id: i64) -> Result<Option<TeamRecord>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let team = teams::fetch_team(team_id, &mut conn).await?;
        Ok(team)
    }

    async fn fetch_payment_by_order_id(&self, order_id: &OrderId) -> Result<Option<PaymentRecord>, StorageError> {
        let mut conn = self.pool.acquire().await?;
        let record = payments::fetch_payment_by_order_id(order_id, &mut conn).await?;
        Ok(record)
    }

    async fn close(&self) -> Result<(), StorageError> {
        self.pool.close().await;
        Ok(())
    }
}
