//! Payments Domain
//!
//! The payment recorder: one payment per ticket purchase, with a
//! Pending/Completed/Failed/Cancelled/Refunded lifecycle and read-side
//! revenue aggregations over completed payments. Payments never affect
//! seat counts.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{PaymentError, PaymentResult};
pub use models::{Payment, PaymentMethod, PaymentStatus, RecordPayment, UpdatePayment};
pub use repository::{InMemoryPaymentRepository, PaymentRepository};
pub use service::PaymentService;
