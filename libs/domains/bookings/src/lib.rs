//! Bookings Domain
//!
//! The orchestrator that turns three independent domains into one purchase
//! flow: take a seat from the event inventory, issue a ticket against it,
//! record the payment. Failures after the seat was taken are compensated
//! by returning it, with retries, so that for every event
//! `available_seats + sold tickets == capacity` holds at rest.

pub mod error;
pub mod service;

// Re-export commonly used types
pub use error::{BookingError, BookingResult};
pub use service::BookingService;
