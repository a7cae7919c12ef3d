use thiserror::Error;
use uuid::Uuid;

use domain_events::EventError;
use domain_payments::PaymentError;
use domain_tickets::TicketError;
use domain_users::UserError;

#[derive(Debug, Error)]
pub enum BookingError {
    #[error(transparent)]
    Event(#[from] EventError),

    #[error(transparent)]
    Ticket(#[from] TicketError),

    #[error(transparent)]
    Payment(#[from] PaymentError),

    #[error("Buyer not found: {0}")]
    BuyerNotFound(Uuid),

    #[error("User directory error: {0}")]
    Users(UserError),

    /// A compensating seat release could not be applied: a seat is leaked
    /// or double-counted. This is the one fatal class - an operational
    /// alert, not a business rejection.
    #[error("Seat inventory invariant violated for event {event_id}: {details}")]
    InventoryInvariant { event_id: Uuid, details: String },
}

impl BookingError {
    /// Fatal errors require operator intervention; a transport layer should
    /// map them to a generic "try again later" while alerting internally.
    pub fn is_fatal(&self) -> bool {
        matches!(self, BookingError::InventoryInvariant { .. })
    }
}

impl From<UserError> for BookingError {
    fn from(err: UserError) -> Self {
        match err {
            UserError::NotFound(id) => BookingError::BuyerNotFound(id),
            other => BookingError::Users(other),
        }
    }
}

pub type BookingResult<T> = Result<T, BookingError>;
