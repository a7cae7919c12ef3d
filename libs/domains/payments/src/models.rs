use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::error::{PaymentError, PaymentResult};

/// Payment lifecycle status
///
/// `Pending -> Completed | Failed | Cancelled`, `Failed -> Cancelled`,
/// `Completed -> Refunded`. Completed payments are refunded, never
/// cancelled; Refunded and Cancelled are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    /// Recorded but not settled
    #[default]
    Pending,
    /// Settled; counts toward revenue
    Completed,
    /// Settlement failed
    Failed,
    /// Abandoned before settlement
    Cancelled,
    /// Settled and then reversed
    Refunded,
}

/// How the payment was made
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    CreditCard,
    DebitCard,
    Wallet,
    /// Synchronous online settlement, the booking path's default
    #[default]
    Online,
}

/// Payment entity - a monetary transaction tied to one ticket
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Unique identifier
    pub id: Uuid,
    /// Unique transaction id, e.g. TXN-4F1C09AA
    pub transaction_id: String,
    /// The ticket this payment settles
    pub ticket_id: Uuid,
    /// Who paid
    pub payer_id: Uuid,
    /// Amount snapshot; immutable once recorded
    pub amount: f64,
    /// Payment method
    pub method: PaymentMethod,
    /// Current lifecycle status
    pub status: PaymentStatus,
    /// Free-form note, e.g. which event the ticket was for
    pub notes: Option<String>,
    /// When the payment was recorded
    pub payment_date: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

/// DTO for recording a new payment
///
/// The caller picks the initial status: `Pending` for a staged flow,
/// `Completed` when settlement is synchronous (the booking path).
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RecordPayment {
    pub ticket_id: Uuid,
    pub payer_id: Uuid,
    #[validate(range(min = 0.0))]
    pub amount: f64,
    #[serde(default)]
    pub method: PaymentMethod,
    #[serde(default)]
    pub status: PaymentStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// DTO for updating a payment (status transitions only)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePayment {
    pub status: Option<PaymentStatus>,
}

impl Payment {
    /// Create a new payment from RecordPayment DTO
    pub fn new(input: RecordPayment) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            transaction_id: Self::generate_transaction_id(),
            ticket_id: input.ticket_id,
            payer_id: input.payer_id,
            amount: input.amount,
            method: input.method,
            status: input.status,
            notes: input.notes,
            payment_date: now,
            updated_at: now,
        }
    }

    /// Generate a transaction id of the form TXN-XXXXXXXX
    pub fn generate_transaction_id() -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("TXN-{}", suffix)
    }

    pub fn is_completed(&self) -> bool {
        self.status == PaymentStatus::Completed
    }

    /// Move the payment to a new status, enforcing the lifecycle
    pub fn transition(&mut self, to: PaymentStatus) -> PaymentResult<()> {
        use PaymentStatus::*;

        match (self.status, to) {
            (Pending, Completed)
            | (Pending, Failed)
            | (Pending, Cancelled)
            | (Failed, Cancelled)
            | (Completed, Refunded) => {
                self.status = to;
                self.updated_at = Utc::now();
                Ok(())
            }
            (Completed, Completed) => Err(PaymentError::AlreadyCompleted(self.id)),
            (from, to) => Err(PaymentError::InvalidState { from, to }),
        }
    }

    /// Apply updates from UpdatePayment DTO
    pub fn apply_update(&mut self, update: UpdatePayment) -> PaymentResult<()> {
        if let Some(status) = update.status {
            self.transition(status)?;
        }
        Ok(())
    }
}
