use std::{fmt::Display, str::FromStr};

use chrono::{DateTime, Utc};
use log::error;
use rpg_common::Rupees;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use thiserror::Error;

//--------------------------------------       OrderId       ----------------------------------------------------------
/// The gateway-issued order identifier. Unique per payment order and the natural idempotency key for all
/// reconciliation writes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Type, Serialize, Deserialize)]
#[sqlx(transparent)]
#[serde(transparent)]
pub struct OrderId(pub String);

impl FromStr for OrderId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.to_string()))
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl OrderId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

//--------------------------------------    PaymentStatus     ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// A payment attempt exists but no final outcome has been recorded yet.
    Pending,
    /// The payment was captured. Terminal, except that repeated completion events are idempotent no-ops.
    Completed,
    /// The payment attempt failed. A later completion event for the same order may still supersede this
    /// (retried/recovered payment).
    Failed,
    /// The payment was refunded out-of-band.
    Refunded,
}

impl Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Completed => write!(f, "completed"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("Invalid status value: {0}")]
pub struct StatusConversionError(String);

impl FromStr for PaymentStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "completed" => Ok(Self::Completed),
            "failed" => Ok(Self::Failed),
            "refunded" => Ok(Self::Refunded),
            s => Err(StatusConversionError(format!("Invalid payment status: {s}"))),
        }
    }
}

impl From<String> for PaymentStatus {
    fn from(value: String) -> Self {
        value.parse().unwrap_or_else(|_| {
            error!("Invalid payment status: {value}. But this conversion cannot fail. Defaulting to pending");
            PaymentStatus::Pending
        })
    }
}

//--------------------------------------  RegistrationStatus  ---------------------------------------------------------
#[derive(Debug, Clone, Copy, PartialEq, Eq, Type, Serialize, Deserialize)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum RegistrationStatus {
    Pending,
    Approved,
    Rejected,
}

impl Display for RegistrationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistrationStatus::Pending => write!(f, "pending"),
            RegistrationStatus::Approved => write!(f, "approved"),
            RegistrationStatus::Rejected => write!(f, "rejected"),
        }
    }
}

impl FromStr for RegistrationStatus {
    type Err = StatusConversionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "approved" => Ok(Self::Approved),
            "rejected" => Ok(Self::Rejected),
            s => Err(StatusConversionError(format!("Invalid registration status: {s}"))),
        }
    }
}

//--------------------------------------    PaymentRecord     ---------------------------------------------------------
/// One row per payment attempt, keyed by the gateway order id. At most one record exists per `order_id`; every write
/// path upserts rather than blindly inserting.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub id: i64,
    /// The owning team. Nullable: the webhook may legitimately update a record before the registration write has
    /// attached it to a team.
    pub team_id: Option<i64>,
    pub order_id: OrderId,
    /// Gateway-issued payment id. Set once a payment attempt completes or fails.
    pub payment_id: Option<String>,
    /// Stored in major units (rupees). Conversion from the gateway's minor units happens exactly once, upstream.
    pub amount: Rupees,
    pub currency: String,
    pub status: PaymentStatus,
    /// Free text, set only on failed records.
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A brand-new payment record, written when a client-verified registration is persisted.
#[derive(Debug, Clone)]
pub struct NewPaymentRecord {
    pub team_id: Option<i64>,
    pub order_id: OrderId,
    pub payment_id: Option<String>,
    /// Already in major units. Do not pass a minor-unit amount through here.
    pub amount: Rupees,
    pub currency: String,
    pub status: PaymentStatus,
}

/// A partial update applied to an existing payment record by the webhook path. `None` fields keep their stored
/// values.
#[derive(Debug, Clone)]
pub struct PaymentUpdate {
    pub order_id: OrderId,
    pub payment_id: Option<String>,
    /// Already converted to major units.
    pub amount: Option<Rupees>,
    pub currency: Option<String>,
    pub status: PaymentStatus,
    pub failure_reason: Option<String>,
}

//--------------------------------------      TeamRecord      ---------------------------------------------------------
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct TeamRecord {
    pub id: i64,
    pub team_name: String,
    pub school_name: String,
    pub school_district: String,
    pub lead_phone: String,
    pub lead_email: String,
    /// Human-friendly code, generated after insertion. Best effort; may be absent.
    pub team_code: Option<String>,
    pub registration_status: RegistrationStatus,
    /// Denormalised mirror of the best payment state for this team. Mutated only by the reconciler.
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

//--------------------------------------   NewRegistration    ---------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeam {
    pub team_name: String,
    pub school_name: String,
    pub school_district: String,
    pub lead_phone: String,
    pub lead_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewTeamMember {
    pub name: String,
    pub gender: String,
    pub grade: String,
    pub phone: String,
    pub email: String,
    #[serde(default)]
    pub food_preference: Option<String>,
    #[serde(default)]
    pub is_team_lead: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDetails {
    #[serde(default)]
    pub idea_title: Option<String>,
    #[serde(default)]
    pub problem_statement: Option<String>,
    #[serde(default)]
    pub solution_idea: Option<String>,
    #[serde(default)]
    pub implementation_plan: Option<String>,
    #[serde(default)]
    pub beneficiaries: Option<String>,
    #[serde(default)]
    pub teamwork_contribution: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeacherVerification {
    pub salutation: String,
    pub teacher_name: String,
    pub teacher_phone: String,
}

/// The full registration submission: team, members, project and the verifying teacher. Persisted as a unit with a
/// compensating delete of the team row if any child insert fails.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewRegistration {
    pub team: NewTeam,
    pub members: Vec<NewTeamMember>,
    pub project: ProjectDetails,
    pub teacher: TeacherVerification,
}

/// Payment details that accompanied a registration after the checkout signature was verified server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifiedPayment {
    pub order_id: OrderId,
    pub payment_id: String,
}
