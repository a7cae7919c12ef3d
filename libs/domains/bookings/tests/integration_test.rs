//! Integration tests for the booking orchestrator
//!
//! These tests wire the real in-memory repositories together to ensure:
//! - The purchase sequence keeps inventory, tickets and payments consistent
//! - Concurrent purchases never oversell an event
//! - Cancellation returns seats and reverses payments
//! - `available_seats + sold == capacity` holds after any interleaving

use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use uuid::Uuid;

use core_config::booking::BookingConfig;
use domain_bookings::{BookingError, BookingService};
use domain_events::{CreateEvent, EventError, EventService, InMemoryEventRepository, UpdateEvent};
use domain_payments::{InMemoryPaymentRepository, PaymentService, PaymentStatus};
use domain_tickets::{InMemoryTicketRepository, TicketError, TicketService, TicketStatus};
use domain_users::{CreateUser, InMemoryUserRepository, UserService};

/// All services over shared in-memory stores, so tests can assert on any
/// domain after driving the orchestrator.
struct Harness {
    booking: BookingService<
        InMemoryEventRepository,
        InMemoryTicketRepository,
        InMemoryPaymentRepository,
        InMemoryUserRepository,
    >,
    events: EventService<InMemoryEventRepository>,
    payments: PaymentService<InMemoryPaymentRepository>,
    tickets: TicketService<InMemoryTicketRepository>,
    users: UserService<InMemoryUserRepository>,
}

fn harness() -> Harness {
    let events = EventService::new(InMemoryEventRepository::new());
    let tickets = TicketService::new(InMemoryTicketRepository::new());
    let payments = PaymentService::new(InMemoryPaymentRepository::new());
    let users = UserService::new(InMemoryUserRepository::new());

    let booking = BookingService::with_config(
        events.clone(),
        tickets.clone(),
        payments.clone(),
        users.clone(),
        BookingConfig::new(3, StdDuration::from_millis(1)),
    );

    Harness {
        booking,
        events,
        payments,
        tickets,
        users,
    }
}

impl Harness {
    async fn create_event(&self, capacity: u32, price: f64) -> Uuid {
        self.events
            .create_event(CreateEvent {
                title: "Open Air Festival".to_string(),
                description: "Two stages, one evening".to_string(),
                location: "Riverside Park".to_string(),
                start_time: Utc::now() + Duration::days(7),
                end_time: Utc::now() + Duration::days(7) + Duration::hours(6),
                capacity,
                price,
                category: "festival".to_string(),
                organizer_id: Uuid::new_v4(),
            })
            .await
            .unwrap()
            .id
    }

    async fn register_buyer(&self, username: &str) -> Uuid {
        self.users
            .register_user(CreateUser {
                username: username.to_string(),
                email: format!("{username}@example.com"),
                full_name: String::new(),
            })
            .await
            .unwrap()
            .id
    }

    async fn available_seats(&self, event_id: Uuid) -> u32 {
        self.events.get_event(event_id).await.unwrap().available_seats
    }

    /// The core inventory invariant, checked from two independent sources
    async fn assert_capacity_invariant(&self, event_id: Uuid) {
        let event = self.events.get_event(event_id).await.unwrap();
        let sold = self.booking.sold_count(event_id).await.unwrap();
        assert_eq!(
            event.available_seats + sold as u32,
            event.capacity,
            "available ({}) + sold ({}) must equal capacity ({})",
            event.available_seats,
            sold,
            event.capacity
        );
    }
}

// ============================================================================
// Purchase Flow
// ============================================================================

#[tokio::test]
async fn test_purchase_creates_ticket_payment_and_takes_seat() {
    let h = harness();
    let event_id = h.create_event(100, 75.0).await;
    let buyer_id = h.register_buyer("alice").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();

    assert_eq!(ticket.event_id, event_id);
    assert_eq!(ticket.buyer_id, buyer_id);
    assert_eq!(ticket.price, 75.0);
    assert_eq!(ticket.status, TicketStatus::Active);
    assert!(ticket.ticket_number.starts_with("TICKET-"));

    assert_eq!(h.available_seats(event_id).await, 99);
    h.assert_capacity_invariant(event_id).await;

    // Exactly one payment, already settled, annotated with the event title
    let payments = h.payments.payments_for_ticket(ticket.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Completed);
    assert_eq!(payments[0].amount, 75.0);
    assert!(payments[0].transaction_id.starts_with("TXN-"));
    assert_eq!(
        payments[0].notes.as_deref(),
        Some("Ticket purchase - Open Air Festival")
    );
}

#[tokio::test]
async fn test_purchase_rejects_unknown_event_and_buyer() {
    let h = harness();
    let event_id = h.create_event(10, 20.0).await;
    let buyer_id = h.register_buyer("bob").await;

    let result = h.booking.purchase_ticket(Uuid::new_v4(), buyer_id).await;
    assert!(matches!(
        result,
        Err(BookingError::Event(EventError::NotFound(_)))
    ));

    let result = h.booking.purchase_ticket(event_id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(BookingError::BuyerNotFound(_))));

    assert_eq!(h.available_seats(event_id).await, 10);
}

#[tokio::test]
async fn test_sold_out_event_rejects_further_purchases() {
    let h = harness();
    let event_id = h.create_event(2, 10.0).await;
    let buyer_id = h.register_buyer("carol").await;

    h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();

    let result = h.booking.purchase_ticket(event_id, buyer_id).await;
    assert!(matches!(
        result,
        Err(BookingError::Event(EventError::SoldOut(_)))
    ));

    assert_eq!(h.available_seats(event_id).await, 0);
    h.assert_capacity_invariant(event_id).await;
}

#[tokio::test]
async fn test_ticket_price_is_snapshotted_at_purchase() {
    let h = harness();
    let event_id = h.create_event(50, 100.0).await;
    let buyer_id = h.register_buyer("dave").await;

    let first = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    assert_eq!(first.price, 100.0);

    // Reprice the event; the already-issued ticket keeps its price
    h.events
        .update_event(
            event_id,
            UpdateEvent {
                title: None,
                description: None,
                location: None,
                start_time: None,
                end_time: None,
                capacity: None,
                price: Some(150.0),
                category: None,
            },
        )
        .await
        .unwrap();

    let second = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    assert_eq!(second.price, 150.0);

    let revenue = h.booking.revenue_for_event(event_id).await.unwrap();
    assert_eq!(revenue, 250.0);
}

// ============================================================================
// Concurrency
// ============================================================================

#[tokio::test]
async fn test_concurrent_purchases_of_last_seat_sell_exactly_once() {
    let h = harness();
    let event_id = h.create_event(1, 40.0).await;
    let alice = h.register_buyer("alice").await;
    let bob = h.register_buyer("bob").await;

    let service_a = h.booking.clone();
    let service_b = h.booking.clone();

    let (a, b) = tokio::join!(
        tokio::spawn(async move { service_a.purchase_ticket(event_id, alice).await }),
        tokio::spawn(async move { service_b.purchase_ticket(event_id, bob).await }),
    );

    let results = [a.unwrap(), b.unwrap()];
    let successes = results.iter().filter(|r| r.is_ok()).count();
    let sold_out = results
        .iter()
        .filter(|r| matches!(r, Err(BookingError::Event(EventError::SoldOut(_)))))
        .count();

    assert_eq!(successes, 1);
    assert_eq!(sold_out, 1);
    assert_eq!(h.available_seats(event_id).await, 0);
    h.assert_capacity_invariant(event_id).await;
}

#[tokio::test]
async fn test_concurrent_purchases_never_oversell() {
    let h = harness();
    let event_id = h.create_event(3, 25.0).await;

    let mut handles = Vec::new();
    for i in 0..8 {
        let buyer_id = h.register_buyer(&format!("buyer{i}")).await;
        let service = h.booking.clone();
        handles.push(tokio::spawn(async move {
            service.purchase_ticket(event_id, buyer_id).await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => successes += 1,
            Err(BookingError::Event(EventError::SoldOut(_))) => {}
            Err(other) => panic!("unexpected failure: {other}"),
        }
    }

    assert_eq!(successes, 3);
    assert_eq!(h.available_seats(event_id).await, 0);
    assert_eq!(h.booking.sold_count(event_id).await.unwrap(), 3);
    h.assert_capacity_invariant(event_id).await;
}

// ============================================================================
// Cancellation
// ============================================================================

#[tokio::test]
async fn test_cancel_booking_returns_seat_and_refunds_payment() {
    let h = harness();
    let event_id = h.create_event(10, 60.0).await;
    let buyer_id = h.register_buyer("erin").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    assert_eq!(h.available_seats(event_id).await, 9);
    assert_eq!(h.booking.total_revenue().await.unwrap(), 60.0);

    let cancelled = h.booking.cancel_booking(ticket.id).await.unwrap();
    assert_eq!(cancelled.status, TicketStatus::Cancelled);

    assert_eq!(h.available_seats(event_id).await, 10);
    h.assert_capacity_invariant(event_id).await;

    let payments = h.payments.payments_for_ticket(ticket.id).await.unwrap();
    assert_eq!(payments.len(), 1);
    assert_eq!(payments[0].status, PaymentStatus::Refunded);

    // Refunded payments no longer count as revenue
    assert_eq!(h.booking.total_revenue().await.unwrap(), 0.0);
    assert_eq!(h.booking.revenue_for_event(event_id).await.unwrap(), 0.0);
}

#[tokio::test]
async fn test_cancel_booking_twice_is_rejected() {
    let h = harness();
    let event_id = h.create_event(5, 30.0).await;
    let buyer_id = h.register_buyer("frank").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    h.booking.cancel_booking(ticket.id).await.unwrap();

    let result = h.booking.cancel_booking(ticket.id).await;
    assert!(matches!(
        result,
        Err(BookingError::Ticket(TicketError::AlreadyCancelled(_)))
    ));

    // The seat was returned exactly once
    assert_eq!(h.available_seats(event_id).await, 5);
    h.assert_capacity_invariant(event_id).await;
}

#[tokio::test]
async fn test_seat_freed_by_cancellation_can_be_rebooked() {
    let h = harness();
    let event_id = h.create_event(1, 45.0).await;
    let alice = h.register_buyer("alice").await;
    let bob = h.register_buyer("bob").await;

    let first = h.booking.purchase_ticket(event_id, alice).await.unwrap();
    assert!(matches!(
        h.booking.purchase_ticket(event_id, bob).await,
        Err(BookingError::Event(EventError::SoldOut(_)))
    ));

    h.booking.cancel_booking(first.id).await.unwrap();

    let second = h.booking.purchase_ticket(event_id, bob).await.unwrap();
    assert_eq!(second.buyer_id, bob);
    assert_eq!(h.available_seats(event_id).await, 0);
    h.assert_capacity_invariant(event_id).await;
}

// ============================================================================
// Check-in
// ============================================================================

#[tokio::test]
async fn test_check_in_consumes_ticket_once() {
    let h = harness();
    let event_id = h.create_event(5, 20.0).await;
    let buyer_id = h.register_buyer("grace").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    assert!(h.booking.is_ticket_valid(ticket.id).await.unwrap());

    let used = h.booking.check_in(ticket.id).await.unwrap();
    assert_eq!(used.status, TicketStatus::Used);
    assert!(!h.booking.is_ticket_valid(ticket.id).await.unwrap());

    // A used ticket cannot be checked in again or cancelled
    assert!(matches!(
        h.booking.check_in(ticket.id).await,
        Err(BookingError::Ticket(TicketError::InvalidState { .. }))
    ));
    assert!(matches!(
        h.booking.cancel_booking(ticket.id).await,
        Err(BookingError::Ticket(TicketError::InvalidState { .. }))
    ));

    // Used tickets still occupy their seat and still count as revenue
    assert_eq!(h.available_seats(event_id).await, 4);
    assert_eq!(h.booking.revenue_for_event(event_id).await.unwrap(), 20.0);
    h.assert_capacity_invariant(event_id).await;
}

// ============================================================================
// Ticket Removal
// ============================================================================

#[tokio::test]
async fn test_delete_active_ticket_returns_its_seat() {
    let h = harness();
    let event_id = h.create_event(4, 15.0).await;
    let buyer_id = h.register_buyer("heidi").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    assert_eq!(h.available_seats(event_id).await, 3);

    h.booking.delete_ticket(ticket.id).await.unwrap();

    assert_eq!(h.available_seats(event_id).await, 4);
    assert!(matches!(
        h.tickets.get_ticket(ticket.id).await,
        Err(TicketError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_cancelled_ticket_does_not_release_twice() {
    let h = harness();
    let event_id = h.create_event(4, 15.0).await;
    let buyer_id = h.register_buyer("ivan").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    h.booking.cancel_booking(ticket.id).await.unwrap();
    assert_eq!(h.available_seats(event_id).await, 4);

    h.booking.delete_ticket(ticket.id).await.unwrap();

    // Cancellation already returned the seat; deletion must not add another
    assert_eq!(h.available_seats(event_id).await, 4);
}

// ============================================================================
// Reporting
// ============================================================================

#[tokio::test]
async fn test_event_revenue_counts_active_and_used_only() {
    let h = harness();
    let event_id = h.create_event(10, 50.0).await;
    let buyer_id = h.register_buyer("judy").await;

    let t1 = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    let t2 = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    let t3 = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();
    let t4 = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();

    h.booking.check_in(t1.id).await.unwrap();
    h.booking.cancel_booking(t4.id).await.unwrap();
    let _ = (t2, t3);

    // One used + two active at 50 each; the cancelled one is excluded
    assert_eq!(h.booking.revenue_for_event(event_id).await.unwrap(), 150.0);
    assert_eq!(h.booking.sold_count(event_id).await.unwrap(), 3);
}

#[tokio::test]
async fn test_user_spending_and_total_revenue() {
    let h = harness();
    let cheap = h.create_event(10, 10.0).await;
    let pricey = h.create_event(10, 90.0).await;
    let alice = h.register_buyer("alice").await;
    let bob = h.register_buyer("bob").await;

    h.booking.purchase_ticket(cheap, alice).await.unwrap();
    h.booking.purchase_ticket(pricey, alice).await.unwrap();
    h.booking.purchase_ticket(cheap, bob).await.unwrap();

    assert_eq!(h.booking.user_spending(alice).await.unwrap(), 100.0);
    assert_eq!(h.booking.user_spending(bob).await.unwrap(), 10.0);
    assert_eq!(h.booking.total_revenue().await.unwrap(), 110.0);

    assert!(matches!(
        h.booking.user_spending(Uuid::new_v4()).await,
        Err(BookingError::BuyerNotFound(_))
    ));
}

#[tokio::test]
async fn test_listing_queries_validate_their_subject() {
    let h = harness();
    let event_id = h.create_event(5, 10.0).await;
    let buyer_id = h.register_buyer("mallory").await;

    let ticket = h.booking.purchase_ticket(event_id, buyer_id).await.unwrap();

    let by_event = h.booking.tickets_for_event(event_id).await.unwrap();
    assert_eq!(by_event.len(), 1);

    let by_buyer = h.booking.tickets_for_buyer(buyer_id).await.unwrap();
    assert_eq!(by_buyer.len(), 1);
    assert_eq!(by_buyer[0].id, ticket.id);

    let found = h
        .booking
        .find_ticket_by_number(&ticket.ticket_number)
        .await
        .unwrap();
    assert_eq!(found.id, ticket.id);

    assert!(matches!(
        h.booking.tickets_for_event(Uuid::new_v4()).await,
        Err(BookingError::Event(EventError::NotFound(_)))
    ));
    assert!(matches!(
        h.booking.tickets_for_buyer(Uuid::new_v4()).await,
        Err(BookingError::BuyerNotFound(_))
    ));
}
