use thiserror::Error;
use uuid::Uuid;

use crate::models::TicketStatus;

#[derive(Debug, Error)]
pub enum TicketError {
    #[error("Ticket not found: {0}")]
    NotFound(Uuid),

    #[error("Ticket not found by number: {0}")]
    NumberNotFound(String),

    #[error("Ticket {0} is already cancelled")]
    AlreadyCancelled(Uuid),

    #[error("Invalid ticket transition: {from} -> {to}")]
    InvalidState { from: TicketStatus, to: TicketStatus },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type TicketResult<T> = Result<T, TicketError>;
