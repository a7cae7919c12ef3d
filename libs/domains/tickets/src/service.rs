use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{TicketError, TicketResult};
use crate::models::{IssueTicket, Ticket, TicketStatus, UpdateTicket};
use crate::repository::TicketRepository;

/// Service layer for the ticket ledger
///
/// Owns ticket records and their lifecycle. Deliberately does NOT touch
/// seat inventory: issuing requires the caller to have reserved a seat,
/// and cancelling leaves the release to the caller, so that ticket status
/// and seat count change together or not at all.
#[derive(Clone)]
pub struct TicketService<R: TicketRepository> {
    repository: Arc<R>,
}

impl<R: TicketRepository> TicketService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Issue a new Active ticket with a generated unique number
    #[instrument(skip(self, input), fields(event_id = %input.event_id, buyer_id = %input.buyer_id))]
    pub async fn issue_ticket(&self, input: IssueTicket) -> TicketResult<Ticket> {
        input
            .validate()
            .map_err(|e| TicketError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a ticket by ID
    pub async fn get_ticket(&self, id: Uuid) -> TicketResult<Ticket> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(TicketError::NotFound(id))
    }

    /// Get a ticket by its human-readable number
    pub async fn get_by_number(&self, ticket_number: &str) -> TicketResult<Ticket> {
        self.repository
            .find_by_number(ticket_number)
            .await?
            .ok_or_else(|| TicketError::NumberNotFound(ticket_number.to_string()))
    }

    /// All tickets for an event
    pub async fn tickets_for_event(&self, event_id: Uuid) -> TicketResult<Vec<Ticket>> {
        self.repository.list_by_event(event_id).await
    }

    /// All tickets bought by a user
    pub async fn tickets_for_buyer(&self, buyer_id: Uuid) -> TicketResult<Vec<Ticket>> {
        self.repository.list_by_buyer(buyer_id).await
    }

    /// Active tickets bought by a user
    pub async fn active_tickets_for_buyer(&self, buyer_id: Uuid) -> TicketResult<Vec<Ticket>> {
        let tickets = self.repository.list_by_buyer(buyer_id).await?;
        Ok(tickets.into_iter().filter(|t| t.is_valid()).collect())
    }

    /// Cancel a ticket (Active -> Cancelled). Seat release is the caller's
    /// responsibility.
    #[instrument(skip(self), fields(ticket_id = %id))]
    pub async fn cancel_ticket(&self, id: Uuid) -> TicketResult<Ticket> {
        self.repository
            .update(
                id,
                UpdateTicket {
                    status: Some(TicketStatus::Cancelled),
                },
            )
            .await
    }

    /// Check a ticket in (Active -> Used); inventory is unaffected
    #[instrument(skip(self), fields(ticket_id = %id))]
    pub async fn use_ticket(&self, id: Uuid) -> TicketResult<Ticket> {
        self.repository
            .update(
                id,
                UpdateTicket {
                    status: Some(TicketStatus::Used),
                },
            )
            .await
    }

    /// True iff the ticket exists and is Active
    pub async fn is_valid(&self, id: Uuid) -> TicketResult<bool> {
        Ok(self
            .repository
            .get_by_id(id)
            .await?
            .is_some_and(|t| t.is_valid()))
    }

    /// Remove a ticket record. Seat bookkeeping for non-cancelled tickets
    /// is the caller's responsibility.
    #[instrument(skip(self), fields(ticket_id = %id))]
    pub async fn delete_ticket(&self, id: Uuid) -> TicketResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(TicketError::NotFound(id));
        }

        Ok(())
    }

    /// Sold tickets (Active or Used) for an event
    pub async fn sold_count(&self, event_id: Uuid) -> TicketResult<usize> {
        self.repository.count_sold_for_event(event_id).await
    }

    /// Revenue for an event: sum of price over Active and Used tickets;
    /// cancelled tickets are excluded
    pub async fn event_revenue(&self, event_id: Uuid) -> TicketResult<f64> {
        let tickets = self.repository.list_by_event(event_id).await?;
        Ok(tickets
            .iter()
            .filter(|t| matches!(t.status, TicketStatus::Active | TicketStatus::Used))
            .map(|t| t.price)
            .sum())
    }
}
