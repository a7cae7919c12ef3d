use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("Event not found: {0}")]
    NotFound(Uuid),

    #[error("No available seats for event {0}")]
    SoldOut(Uuid),

    #[error("Event {0} is already at full capacity")]
    AtCapacity(Uuid),

    #[error("Capacity {requested} is below the {sold} seats already sold")]
    InvalidCapacity { requested: u32, sold: u32 },

    #[error("Invalid input: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

pub type EventResult<T> = Result<T, EventError>;
