use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventFilter, UpdateEvent};

/// Repository trait for Event persistence
///
/// `reserve_seat`/`release_seat` sit on the repository because their
/// atomicity is a storage concern: a SQL implementation would use a
/// conditional UPDATE or row lock, the in-memory one serializes through
/// its write guard.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Create a new event
    async fn create(&self, input: CreateEvent) -> EventResult<Event>;

    /// Get an event by ID
    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>>;

    /// List events with optional filters
    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>>;

    /// Update an existing event (capacity changes preserve the sold count)
    async fn update(&self, id: Uuid, input: UpdateEvent) -> EventResult<Event>;

    /// Delete an event by ID
    async fn delete(&self, id: Uuid) -> EventResult<bool>;

    /// Atomically take one seat; fails with `SoldOut` when none remain
    async fn reserve_seat(&self, id: Uuid) -> EventResult<Event>;

    /// Atomically return one seat; fails with `AtCapacity` when already full
    async fn release_seat(&self, id: Uuid) -> EventResult<Event>;
}

/// In-memory implementation of EventRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryEventRepository {
    events: Arc<RwLock<HashMap<Uuid, Event>>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn create(&self, input: CreateEvent) -> EventResult<Event> {
        let mut events = self.events.write().await;

        let event = Event::new(input);
        events.insert(event.id, event.clone());

        tracing::info!(event_id = %event.id, capacity = event.capacity, "Created event");
        Ok(event)
    }

    async fn get_by_id(&self, id: Uuid) -> EventResult<Option<Event>> {
        let events = self.events.read().await;
        Ok(events.get(&id).cloned())
    }

    async fn list(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        let events = self.events.read().await;

        let mut result: Vec<Event> = events
            .values()
            .filter(|e| {
                if let Some(ref category) = filter.category {
                    if !e.category.eq_ignore_ascii_case(category) {
                        return false;
                    }
                }
                if let Some(ref location) = filter.location {
                    if !e.location.eq_ignore_ascii_case(location) {
                        return false;
                    }
                }
                if let Some(organizer_id) = filter.organizer_id {
                    if e.organizer_id != organizer_id {
                        return false;
                    }
                }
                true
            })
            .cloned()
            .collect();

        // Soonest event first
        result.sort_by(|a, b| a.start_time.cmp(&b.start_time));

        let result: Vec<Event> = result
            .into_iter()
            .skip(filter.offset)
            .take(filter.limit)
            .collect();

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateEvent) -> EventResult<Event> {
        let mut events = self.events.write().await;

        let event = events.get_mut(&id).ok_or(EventError::NotFound(id))?;
        event.apply_update(input)?;
        let updated = event.clone();

        tracing::info!(event_id = %id, "Updated event");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> EventResult<bool> {
        let mut events = self.events.write().await;

        if events.remove(&id).is_some() {
            tracing::info!(event_id = %id, "Deleted event");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn reserve_seat(&self, id: Uuid) -> EventResult<Event> {
        // The write guard spans the check and the decrement: two concurrent
        // reservations of the last seat cannot both pass the check.
        let mut events = self.events.write().await;

        let event = events.get_mut(&id).ok_or(EventError::NotFound(id))?;
        event.reserve_seat()?;
        let updated = event.clone();

        tracing::debug!(
            event_id = %id,
            available_seats = updated.available_seats,
            "Reserved seat"
        );
        Ok(updated)
    }

    async fn release_seat(&self, id: Uuid) -> EventResult<Event> {
        let mut events = self.events.write().await;

        let event = events.get_mut(&id).ok_or(EventError::NotFound(id))?;
        event.release_seat()?;
        let updated = event.clone();

        tracing::debug!(
            event_id = %id,
            available_seats = updated.available_seats,
            "Released seat"
        );
        Ok(updated)
    }
}
