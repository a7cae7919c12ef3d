use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// User entity - a registered platform user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: Uuid,
    /// Login name, unique across the platform
    pub username: String,
    /// Contact email
    pub email: String,
    /// Display name
    pub full_name: String,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

/// DTO for registering a new user
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateUser {
    #[validate(length(min = 3, max = 50))]
    pub username: String,
    #[validate(email)]
    pub email: String,
    #[serde(default)]
    pub full_name: String,
}

impl User {
    /// Create a new user from CreateUser DTO
    pub fn new(input: CreateUser) -> Self {
        Self {
            id: Uuid::now_v7(),
            username: input.username,
            email: input.email,
            full_name: input.full_name,
            created_at: Utc::now(),
        }
    }
}
