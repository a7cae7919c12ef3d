//! Users Domain
//!
//! Minimal user directory consumed by the booking orchestrator: resolves a
//! buyer id to existence and owns basic registration. Authentication and
//! authorization are deliberately out of scope; callers supply an already
//! authenticated user id.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;

// Re-export commonly used types
pub use error::{UserError, UserResult};
pub use models::{CreateUser, User};
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
