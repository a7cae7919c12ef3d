use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::error::{EventError, EventResult};

/// Event entity - a scheduled event with a bounded seat pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Unique identifier
    pub id: Uuid,
    /// Event title
    pub title: String,
    /// Event description
    pub description: String,
    /// Venue or location name
    pub location: String,
    /// When the event starts
    pub start_time: DateTime<Utc>,
    /// When the event ends
    pub end_time: DateTime<Utc>,
    /// Total seat pool, fixed at creation (resizable only via update)
    pub capacity: u32,
    /// Seats still sellable; 0 <= available_seats <= capacity
    pub available_seats: u32,
    /// Current list price; tickets snapshot this at purchase time
    pub price: f64,
    /// Free-form category (concert, conference, ...)
    pub category: String,
    /// Organizer user
    pub organizer_id: Uuid,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
    /// Last update timestamp
    pub updated_at: DateTime<Utc>,
}

/// DTO for creating a new event
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[validate(length(min = 1))]
    pub location: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub capacity: u32,
    #[validate(range(min = 0.0))]
    pub price: f64,
    #[serde(default)]
    pub category: String,
    pub organizer_id: Uuid,
}

/// DTO for updating an existing event
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEvent {
    #[validate(length(min = 1, max = 200))]
    pub title: Option<String>,
    pub description: Option<String>,
    #[validate(length(min = 1))]
    pub location: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub capacity: Option<u32>,
    #[validate(range(min = 0.0))]
    pub price: Option<f64>,
    pub category: Option<String>,
}

/// Query filters for listing events
#[derive(Debug, Clone, Deserialize)]
pub struct EventFilter {
    pub category: Option<String>,
    pub location: Option<String>,
    pub organizer_id: Option<Uuid>,
    #[serde(default = "default_limit")]
    pub limit: usize,
    #[serde(default)]
    pub offset: usize,
}

fn default_limit() -> usize {
    50
}

impl Default for EventFilter {
    fn default() -> Self {
        Self {
            category: None,
            location: None,
            organizer_id: None,
            limit: default_limit(),
            offset: 0,
        }
    }
}

impl Event {
    /// Create a new event from CreateEvent DTO; the pool starts full
    pub fn new(input: CreateEvent) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            title: input.title,
            description: input.description,
            location: input.location,
            start_time: input.start_time,
            end_time: input.end_time,
            capacity: input.capacity,
            available_seats: input.capacity,
            price: input.price,
            category: input.category,
            organizer_id: input.organizer_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Number of seats currently sold
    pub fn sold_seats(&self) -> u32 {
        self.capacity - self.available_seats
    }

    pub fn has_available_seats(&self) -> bool {
        self.available_seats > 0
    }

    /// Take one seat from the pool. Callers must hold the store's write
    /// guard so the check-and-decrement is not interleaved.
    pub fn reserve_seat(&mut self) -> EventResult<()> {
        if self.available_seats == 0 {
            return Err(EventError::SoldOut(self.id));
        }
        self.available_seats -= 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Return one seat to the pool. A release at full capacity means a
    /// double-release upstream and is rejected rather than absorbed.
    pub fn release_seat(&mut self) -> EventResult<()> {
        if self.available_seats >= self.capacity {
            return Err(EventError::AtCapacity(self.id));
        }
        self.available_seats += 1;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Apply updates from UpdateEvent DTO.
    ///
    /// A capacity change keeps the sold count intact: the new available
    /// count is `new_capacity - sold`, and shrinking below the sold count
    /// is rejected.
    pub fn apply_update(&mut self, update: UpdateEvent) -> EventResult<()> {
        if let Some(new_capacity) = update.capacity {
            let sold = self.sold_seats();
            if new_capacity < sold {
                return Err(EventError::InvalidCapacity {
                    requested: new_capacity,
                    sold,
                });
            }
            self.capacity = new_capacity;
            self.available_seats = new_capacity - sold;
        }
        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(location) = update.location {
            self.location = location;
        }
        if let Some(start_time) = update.start_time {
            self.start_time = start_time;
        }
        if let Some(end_time) = update.end_time {
            self.end_time = end_time;
        }
        if let Some(price) = update.price {
            self.price = price;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        self.updated_at = Utc::now();
        Ok(())
    }
}
