//! Tickets Domain
//!
//! The ticket ledger: owns ticket records and their Active/Used/Cancelled
//! lifecycle, plus the read-side sold-count and revenue views derived from
//! it. Seat inventory belongs to the events domain; the booking
//! orchestrator keeps the two consistent.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{TicketError, TicketResult};
pub use models::{IssueTicket, Ticket, TicketStatus, UpdateTicket};
pub use repository::{InMemoryTicketRepository, TicketRepository};
pub use service::TicketService;
