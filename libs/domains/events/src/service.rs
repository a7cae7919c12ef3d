use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{EventError, EventResult};
use crate::models::{CreateEvent, Event, EventFilter, UpdateEvent};
use crate::repository::EventRepository;

/// Service layer for Event business logic, including the seat inventory
#[derive(Clone)]
pub struct EventService<R: EventRepository> {
    repository: Arc<R>,
}

impl<R: EventRepository> EventService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Create a new event with validation
    #[instrument(skip(self, input), fields(event_title = %input.title))]
    pub async fn create_event(&self, input: CreateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        if input.end_time <= input.start_time {
            return Err(EventError::Validation(
                "Event must end after it starts".to_string(),
            ));
        }

        self.repository.create(input).await
    }

    /// Get an event by ID
    pub async fn get_event(&self, id: Uuid) -> EventResult<Event> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(EventError::NotFound(id))
    }

    /// List events with filters
    pub async fn list_events(&self, filter: EventFilter) -> EventResult<Vec<Event>> {
        self.repository.list(filter).await
    }

    /// Update an event; capacity changes resize the pool while keeping
    /// already-sold seats intact
    #[instrument(skip(self, input), fields(event_id = %id))]
    pub async fn update_event(&self, id: Uuid, input: UpdateEvent) -> EventResult<Event> {
        input
            .validate()
            .map_err(|e| EventError::Validation(e.to_string()))?;

        self.repository.update(id, input).await
    }

    /// Delete an event
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn delete_event(&self, id: Uuid) -> EventResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(EventError::NotFound(id));
        }

        Ok(())
    }

    /// Whether the event still has sellable seats
    pub async fn has_available_seats(&self, id: Uuid) -> EventResult<bool> {
        Ok(self.get_event(id).await?.has_available_seats())
    }

    /// Atomically take one seat from the event's pool
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn reserve_seat(&self, id: Uuid) -> EventResult<Event> {
        self.repository.reserve_seat(id).await
    }

    /// Atomically return one seat to the event's pool
    #[instrument(skip(self), fields(event_id = %id))]
    pub async fn release_seat(&self, id: Uuid) -> EventResult<Event> {
        self.repository.release_seat(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::MockEventRepository;
    use chrono::{Duration, Utc};

    fn sample_input(capacity: u32) -> CreateEvent {
        CreateEvent {
            title: "Conference".to_string(),
            description: String::new(),
            location: "Expo Center".to_string(),
            start_time: Utc::now() + Duration::days(30),
            end_time: Utc::now() + Duration::days(31),
            capacity,
            price: 120.0,
            category: "conference".to_string(),
            organizer_id: Uuid::new_v4(),
        }
    }

    #[tokio::test]
    async fn test_create_event_rejects_zero_capacity() {
        let mock_repo = MockEventRepository::new();
        let service = EventService::new(mock_repo);

        let result = service.create_event(sample_input(0)).await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_create_event_rejects_backwards_schedule() {
        let mock_repo = MockEventRepository::new();
        let service = EventService::new(mock_repo);

        let mut input = sample_input(10);
        input.end_time = input.start_time - Duration::hours(1);

        let result = service.create_event(input).await;
        assert!(matches!(result, Err(EventError::Validation(_))));
    }

    #[tokio::test]
    async fn test_get_event_maps_missing_to_not_found() {
        let mut mock_repo = MockEventRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_get_by_id()
            .with(mockall::predicate::eq(id))
            .returning(|_| Ok(None));

        let service = EventService::new(mock_repo);
        let result = service.get_event(id).await;
        assert!(matches!(result, Err(EventError::NotFound(got)) if got == id));
    }

    #[tokio::test]
    async fn test_reserve_seat_propagates_sold_out() {
        let mut mock_repo = MockEventRepository::new();
        let id = Uuid::now_v7();

        mock_repo
            .expect_reserve_seat()
            .with(mockall::predicate::eq(id))
            .returning(|id| Err(EventError::SoldOut(id)));

        let service = EventService::new(mock_repo);
        let result = service.reserve_seat(id).await;
        assert!(matches!(result, Err(EventError::SoldOut(_))));
    }
}
