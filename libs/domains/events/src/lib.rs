//! Events Domain
//!
//! Owns the Event entity and its seat inventory: the per-event counter of
//! sellable remaining admissions. This crate is the single source of truth
//! for "can another ticket be issued": `reserve_seat`/`release_seat` are
//! atomic with respect to concurrent callers on the same event.
//!
//! Ticket issuance and payment recording live in their own domain crates;
//! the booking orchestrator sequences the three.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{EventError, EventResult};
pub use models::{CreateEvent, Event, EventFilter, UpdateEvent};
pub use repository::{EventRepository, InMemoryEventRepository};
pub use service::EventService;
