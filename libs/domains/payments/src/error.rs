use thiserror::Error;
use uuid::Uuid;

use crate::models::PaymentStatus;

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("Payment not found: {0}")]
    NotFound(Uuid),

    #[error("Transaction not found: {0}")]
    TransactionNotFound(String),

    #[error("Payment {0} is already completed")]
    AlreadyCompleted(Uuid),

    #[error("Invalid payment transition: {from} -> {to}")]
    InvalidState {
        from: PaymentStatus,
        to: PaymentStatus,
    },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type PaymentResult<T> = Result<T, PaymentError>;
