use tracing::instrument;
use uuid::Uuid;

use core_config::booking::BookingConfig;
use domain_events::{EventError, EventService, EventRepository};
use domain_payments::{
    PaymentMethod, PaymentService, PaymentRepository, PaymentStatus, RecordPayment,
};
use domain_tickets::{IssueTicket, Ticket, TicketService, TicketRepository, TicketStatus};
use domain_users::{UserService, UserRepository};

use crate::error::{BookingError, BookingResult};

/// Booking orchestrator: the facade that keeps seat inventory, the ticket
/// ledger and payment records mutually consistent.
///
/// It owns none of the state itself. For a purchase it sequences
/// reserve -> issue -> pay, and compensates backwards when a later step
/// fails after the seat was already taken. Compensating releases are
/// retried per [`BookingConfig`] before escalating to the fatal
/// [`BookingError::InventoryInvariant`].
#[derive(Clone)]
pub struct BookingService<E, T, P, U>
where
    E: EventRepository,
    T: TicketRepository,
    P: PaymentRepository,
    U: UserRepository,
{
    events: EventService<E>,
    tickets: TicketService<T>,
    payments: PaymentService<P>,
    users: UserService<U>,
    config: BookingConfig,
}

impl<E, T, P, U> BookingService<E, T, P, U>
where
    E: EventRepository,
    T: TicketRepository,
    P: PaymentRepository,
    U: UserRepository,
{
    pub fn new(
        events: EventService<E>,
        tickets: TicketService<T>,
        payments: PaymentService<P>,
        users: UserService<U>,
    ) -> Self {
        Self::with_config(events, tickets, payments, users, BookingConfig::default())
    }

    pub fn with_config(
        events: EventService<E>,
        tickets: TicketService<T>,
        payments: PaymentService<P>,
        users: UserService<U>,
        config: BookingConfig,
    ) -> Self {
        Self {
            events,
            tickets,
            payments,
            users,
            config,
        }
    }

    /// Book a ticket for an event.
    ///
    /// Sequence: buyer check, price snapshot, seat reservation, ticket
    /// issuance, payment record (Completed - settlement is synchronous
    /// here). If issuance or payment fails after the seat was reserved,
    /// the reservation is compensated before the error surfaces. The
    /// payment is a side effect; the ticket is the result.
    #[instrument(skip(self), fields(event_id = %event_id, buyer_id = %buyer_id))]
    pub async fn purchase_ticket(&self, event_id: Uuid, buyer_id: Uuid) -> BookingResult<Ticket> {
        if !self.users.user_exists(buyer_id).await? {
            return Err(BookingError::BuyerNotFound(buyer_id));
        }

        // Snapshot the price before touching inventory; issued tickets keep
        // this price even if the event is repriced later
        let event = self.events.get_event(event_id).await?;

        self.events.reserve_seat(event_id).await?;

        let ticket = match self
            .tickets
            .issue_ticket(IssueTicket {
                event_id,
                buyer_id,
                price: event.price,
            })
            .await
        {
            Ok(ticket) => ticket,
            Err(err) => {
                // The seat is held but no ticket exists; give it back
                self.release_seat_with_retry(event_id, "ticket issuance failed")
                    .await?;
                return Err(err.into());
            }
        };

        if let Err(err) = self
            .payments
            .record_payment(RecordPayment {
                ticket_id: ticket.id,
                payer_id: buyer_id,
                amount: ticket.price,
                method: PaymentMethod::Online,
                status: PaymentStatus::Completed,
                notes: Some(format!("Ticket purchase - {}", event.title)),
            })
            .await
        {
            // Roll the issuance back before surfacing the payment error
            if let Err(cancel_err) = self.tickets.cancel_ticket(ticket.id).await {
                // The Active ticket still holds its seat, so the pool stays
                // consistent; do not release
                tracing::error!(
                    ticket_id = %ticket.id,
                    error = %cancel_err,
                    "Failed to cancel ticket while compensating a payment failure"
                );
                return Err(cancel_err.into());
            }
            self.release_seat_with_retry(event_id, "payment recording failed")
                .await?;
            return Err(err.into());
        }

        tracing::info!(
            ticket_id = %ticket.id,
            ticket_number = %ticket.ticket_number,
            "Booked ticket"
        );
        Ok(ticket)
    }

    /// Cancel a booking: cancel the ticket, return its seat, reverse the
    /// money (Completed payments are refunded, Pending ones cancelled).
    ///
    /// If the seat release fails, the ticket cancellation is NOT rolled
    /// back - the escalated error marks bookkeeping divergence that needs
    /// an operator, not a retryable business condition.
    #[instrument(skip(self), fields(ticket_id = %ticket_id))]
    pub async fn cancel_booking(&self, ticket_id: Uuid) -> BookingResult<Ticket> {
        let ticket = self.tickets.cancel_ticket(ticket_id).await?;

        self.release_seat_with_retry(ticket.event_id, "booking cancelled")
            .await?;

        for payment in self.payments.payments_for_ticket(ticket_id).await? {
            match payment.status {
                PaymentStatus::Completed => {
                    self.payments.refund_payment(payment.id).await?;
                }
                PaymentStatus::Pending => {
                    self.payments.cancel_payment(payment.id).await?;
                }
                _ => {}
            }
        }

        tracing::info!(ticket_id = %ticket_id, "Cancelled booking");
        Ok(ticket)
    }

    /// Remove a ticket record entirely. A ticket that was never cancelled
    /// still holds a seat, which must go back to the pool first - deleting
    /// must not silently leak a seat.
    #[instrument(skip(self), fields(ticket_id = %ticket_id))]
    pub async fn delete_ticket(&self, ticket_id: Uuid) -> BookingResult<()> {
        let ticket = self.tickets.get_ticket(ticket_id).await?;

        if ticket.status != TicketStatus::Cancelled {
            self.release_seat_with_retry(ticket.event_id, "ticket deleted")
                .await?;
        }

        self.tickets.delete_ticket(ticket_id).await?;
        Ok(())
    }

    /// Check a ticket in (Active -> Used). Inventory is unaffected: a used
    /// ticket still counts as a sold seat.
    #[instrument(skip(self), fields(ticket_id = %ticket_id))]
    pub async fn check_in(&self, ticket_id: Uuid) -> BookingResult<Ticket> {
        Ok(self.tickets.use_ticket(ticket_id).await?)
    }

    /// True iff the ticket exists and is Active
    pub async fn is_ticket_valid(&self, ticket_id: Uuid) -> BookingResult<bool> {
        Ok(self.tickets.is_valid(ticket_id).await?)
    }

    /// Look up a booked ticket by its human-readable number
    pub async fn find_ticket_by_number(&self, ticket_number: &str) -> BookingResult<Ticket> {
        Ok(self.tickets.get_by_number(ticket_number).await?)
    }

    /// All tickets for an event (the event must exist)
    pub async fn tickets_for_event(&self, event_id: Uuid) -> BookingResult<Vec<Ticket>> {
        self.events.get_event(event_id).await?;
        Ok(self.tickets.tickets_for_event(event_id).await?)
    }

    /// All tickets bought by a user (the user must exist)
    pub async fn tickets_for_buyer(&self, buyer_id: Uuid) -> BookingResult<Vec<Ticket>> {
        if !self.users.user_exists(buyer_id).await? {
            return Err(BookingError::BuyerNotFound(buyer_id));
        }
        Ok(self.tickets.tickets_for_buyer(buyer_id).await?)
    }

    /// Sold seats for an event: tickets in Active or Used state
    pub async fn sold_count(&self, event_id: Uuid) -> BookingResult<usize> {
        self.events.get_event(event_id).await?;
        Ok(self.tickets.sold_count(event_id).await?)
    }

    /// Revenue for an event: ticket prices over Active and Used tickets
    pub async fn revenue_for_event(&self, event_id: Uuid) -> BookingResult<f64> {
        self.events.get_event(event_id).await?;
        Ok(self.tickets.event_revenue(event_id).await?)
    }

    /// Platform-wide revenue: all Completed payments
    pub async fn total_revenue(&self) -> BookingResult<f64> {
        Ok(self.payments.total_revenue().await?)
    }

    /// What a user has spent across Completed payments
    pub async fn user_spending(&self, user_id: Uuid) -> BookingResult<f64> {
        if !self.users.user_exists(user_id).await? {
            return Err(BookingError::BuyerNotFound(user_id));
        }
        Ok(self.payments.user_spending(user_id).await?)
    }

    /// Return a reserved seat to the pool, retrying transient failures
    /// with exponential backoff.
    ///
    /// `NotFound`/`AtCapacity` are deterministic - retrying cannot fix a
    /// vanished event or a double release - so they escalate immediately.
    /// Everything else gets `compensation_attempts` tries before the
    /// failure is promoted to the fatal invariant class.
    async fn release_seat_with_retry(
        &self,
        event_id: Uuid,
        context: &str,
    ) -> BookingResult<()> {
        let attempts = self.config.compensation_attempts.max(1);
        let mut backoff = self.config.compensation_backoff;
        let mut last_error = None;

        for attempt in 1..=attempts {
            match self.events.release_seat(event_id).await {
                Ok(_) => {
                    if attempt > 1 {
                        tracing::warn!(
                            event_id = %event_id,
                            attempt,
                            context,
                            "Compensating seat release succeeded after retry"
                        );
                    }
                    return Ok(());
                }
                Err(err @ (EventError::NotFound(_) | EventError::AtCapacity(_))) => {
                    last_error = Some(err);
                    break;
                }
                Err(err) => {
                    tracing::warn!(
                        event_id = %event_id,
                        attempt,
                        error = %err,
                        context,
                        "Compensating seat release failed, retrying"
                    );
                    last_error = Some(err);
                    if attempt < attempts {
                        tokio::time::sleep(backoff).await;
                        backoff *= 2;
                    }
                }
            }
        }

        let details = match last_error {
            Some(err) => format!("{} ({})", err, context),
            None => context.to_string(),
        };
        tracing::error!(
            event_id = %event_id,
            details = %details,
            "Seat release compensation exhausted; inventory needs operator attention"
        );
        Err(BookingError::InventoryInvariant { event_id, details })
    }
}
