use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{TicketError, TicketResult};
use crate::models::{IssueTicket, Ticket, TicketStatus, UpdateTicket};

/// Repository trait for Ticket persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Create a new ticket with a unique ticket number
    async fn create(&self, input: IssueTicket) -> TicketResult<Ticket>;

    /// Get a ticket by ID
    async fn get_by_id(&self, id: Uuid) -> TicketResult<Option<Ticket>>;

    /// Find a ticket by its human-readable number
    async fn find_by_number(&self, ticket_number: &str) -> TicketResult<Option<Ticket>>;

    /// All tickets for an event
    async fn list_by_event(&self, event_id: Uuid) -> TicketResult<Vec<Ticket>>;

    /// All tickets bought by a user
    async fn list_by_buyer(&self, buyer_id: Uuid) -> TicketResult<Vec<Ticket>>;

    /// Apply a status transition; the lifecycle check runs inside the
    /// store's write guard so concurrent transitions cannot both pass
    async fn update(&self, id: Uuid, input: UpdateTicket) -> TicketResult<Ticket>;

    /// Delete a ticket by ID
    async fn delete(&self, id: Uuid) -> TicketResult<bool>;

    /// Number of sold (Active or Used) tickets for an event
    async fn count_sold_for_event(&self, event_id: Uuid) -> TicketResult<usize>;
}

/// In-memory implementation of TicketRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryTicketRepository {
    tickets: Arc<RwLock<HashMap<Uuid, Ticket>>>,
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self {
            tickets: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn create(&self, input: IssueTicket) -> TicketResult<Ticket> {
        let mut tickets = self.tickets.write().await;

        let mut ticket = Ticket::new(input);
        // The 8-hex-char suffix can collide; regenerate under the write
        // lock until unique (a SQL backend would rely on a unique index)
        while tickets
            .values()
            .any(|t| t.ticket_number == ticket.ticket_number)
        {
            ticket.ticket_number = Ticket::generate_number();
        }

        tickets.insert(ticket.id, ticket.clone());

        tracing::info!(
            ticket_id = %ticket.id,
            ticket_number = %ticket.ticket_number,
            event_id = %ticket.event_id,
            "Issued ticket"
        );
        Ok(ticket)
    }

    async fn get_by_id(&self, id: Uuid) -> TicketResult<Option<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets.get(&id).cloned())
    }

    async fn find_by_number(&self, ticket_number: &str) -> TicketResult<Option<Ticket>> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .values()
            .find(|t| t.ticket_number == ticket_number)
            .cloned())
    }

    async fn list_by_event(&self, event_id: Uuid) -> TicketResult<Vec<Ticket>> {
        let tickets = self.tickets.read().await;

        let mut result: Vec<Ticket> = tickets
            .values()
            .filter(|t| t.event_id == event_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date));

        Ok(result)
    }

    async fn list_by_buyer(&self, buyer_id: Uuid) -> TicketResult<Vec<Ticket>> {
        let tickets = self.tickets.read().await;

        let mut result: Vec<Ticket> = tickets
            .values()
            .filter(|t| t.buyer_id == buyer_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.purchase_date.cmp(&b.purchase_date));

        Ok(result)
    }

    async fn update(&self, id: Uuid, input: UpdateTicket) -> TicketResult<Ticket> {
        let mut tickets = self.tickets.write().await;

        let ticket = tickets.get_mut(&id).ok_or(TicketError::NotFound(id))?;
        ticket.apply_update(input)?;
        let updated = ticket.clone();

        tracing::info!(ticket_id = %id, status = %updated.status, "Updated ticket");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> TicketResult<bool> {
        let mut tickets = self.tickets.write().await;

        if tickets.remove(&id).is_some() {
            tracing::info!(ticket_id = %id, "Deleted ticket");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn count_sold_for_event(&self, event_id: Uuid) -> TicketResult<usize> {
        let tickets = self.tickets.read().await;
        Ok(tickets
            .values()
            .filter(|t| {
                t.event_id == event_id
                    && matches!(t.status, TicketStatus::Active | TicketStatus::Used)
            })
            .count())
    }
}
