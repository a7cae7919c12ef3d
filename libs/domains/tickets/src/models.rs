use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};
use uuid::Uuid;
use validator::Validate;

use crate::error::{TicketError, TicketResult};

/// Ticket lifecycle status
///
/// `Active -> Used` and `Active -> Cancelled` are the only transitions;
/// both target states are terminal.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString, Default,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketStatus {
    /// Issued and valid for check-in
    #[default]
    Active,
    /// Checked in; no longer valid but still counts as a sold seat
    Used,
    /// Cancelled; the seat went back to the pool
    Cancelled,
}

/// Ticket entity - an issued admission for one event and one buyer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ticket {
    /// Unique identifier
    pub id: Uuid,
    /// Human-readable unique number, e.g. TICKET-5D2A91BC
    pub ticket_number: String,
    /// Owning event
    pub event_id: Uuid,
    /// Buyer
    pub buyer_id: Uuid,
    /// Price snapshot taken at purchase time; later event price edits
    /// never touch issued tickets
    pub price: f64,
    /// Current lifecycle status
    pub status: TicketStatus,
    /// When the ticket was purchased
    pub purchase_date: DateTime<Utc>,
    /// Last status change
    pub updated_at: DateTime<Utc>,
}

/// DTO for issuing a new ticket
///
/// Inventory is not touched here; the caller must already hold a reserved
/// seat for the event.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct IssueTicket {
    pub event_id: Uuid,
    pub buyer_id: Uuid,
    #[validate(range(min = 0.0))]
    pub price: f64,
}

/// DTO for updating a ticket (status transitions only; everything else on
/// a ticket is immutable)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateTicket {
    pub status: Option<TicketStatus>,
}

impl Ticket {
    /// Create a new Active ticket from IssueTicket DTO
    pub fn new(input: IssueTicket) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::now_v7(),
            ticket_number: Self::generate_number(),
            event_id: input.event_id,
            buyer_id: input.buyer_id,
            price: input.price,
            status: TicketStatus::Active,
            purchase_date: now,
            updated_at: now,
        }
    }

    /// Generate a ticket number of the form TICKET-XXXXXXXX
    pub fn generate_number() -> String {
        let suffix = Uuid::new_v4().simple().to_string()[..8].to_uppercase();
        format!("TICKET-{}", suffix)
    }

    pub fn is_valid(&self) -> bool {
        self.status == TicketStatus::Active
    }

    /// Move the ticket to a new status, enforcing the lifecycle:
    /// only Active tickets may transition, and only to Used or Cancelled.
    pub fn transition(&mut self, to: TicketStatus) -> TicketResult<()> {
        use TicketStatus::*;

        match (self.status, to) {
            (Active, Used) | (Active, Cancelled) => {
                self.status = to;
                self.updated_at = Utc::now();
                Ok(())
            }
            (Cancelled, Cancelled) => Err(TicketError::AlreadyCancelled(self.id)),
            (from, to) => Err(TicketError::InvalidState { from, to }),
        }
    }

    /// Apply updates from UpdateTicket DTO
    pub fn apply_update(&mut self, update: UpdateTicket) -> TicketResult<()> {
        if let Some(status) = update.status {
            self.transition(status)?;
        }
        Ok(())
    }
}
