use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::{PaymentError, PaymentResult};
use crate::models::{Payment, PaymentStatus, RecordPayment, UpdatePayment};

/// Repository trait for Payment persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentRepository: Send + Sync {
    /// Record a new payment with a unique transaction id
    async fn create(&self, input: RecordPayment) -> PaymentResult<Payment>;

    /// Get a payment by ID
    async fn get_by_id(&self, id: Uuid) -> PaymentResult<Option<Payment>>;

    /// Find a payment by its transaction id
    async fn find_by_transaction(&self, transaction_id: &str) -> PaymentResult<Option<Payment>>;

    /// All payments recorded for a ticket
    async fn list_by_ticket(&self, ticket_id: Uuid) -> PaymentResult<Vec<Payment>>;

    /// All payments made by a user
    async fn list_by_payer(&self, payer_id: Uuid) -> PaymentResult<Vec<Payment>>;

    /// All payments in a given status
    async fn list_by_status(&self, status: PaymentStatus) -> PaymentResult<Vec<Payment>>;

    /// Payments by a user in a given status
    async fn list_by_payer_and_status(
        &self,
        payer_id: Uuid,
        status: PaymentStatus,
    ) -> PaymentResult<Vec<Payment>>;

    /// Apply a status transition under the store's write guard
    async fn update(&self, id: Uuid, input: UpdatePayment) -> PaymentResult<Payment>;

    /// Delete a payment by ID
    async fn delete(&self, id: Uuid) -> PaymentResult<bool>;
}

/// In-memory implementation of PaymentRepository (for development/testing)
#[derive(Debug, Default, Clone)]
pub struct InMemoryPaymentRepository {
    payments: Arc<RwLock<HashMap<Uuid, Payment>>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self {
            payments: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn create(&self, input: RecordPayment) -> PaymentResult<Payment> {
        let mut payments = self.payments.write().await;

        let mut payment = Payment::new(input);
        // Regenerate on the rare suffix collision, same as ticket numbers
        while payments
            .values()
            .any(|p| p.transaction_id == payment.transaction_id)
        {
            payment.transaction_id = Payment::generate_transaction_id();
        }

        payments.insert(payment.id, payment.clone());

        tracing::info!(
            payment_id = %payment.id,
            transaction_id = %payment.transaction_id,
            ticket_id = %payment.ticket_id,
            amount = payment.amount,
            status = %payment.status,
            "Recorded payment"
        );
        Ok(payment)
    }

    async fn get_by_id(&self, id: Uuid) -> PaymentResult<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments.get(&id).cloned())
    }

    async fn find_by_transaction(&self, transaction_id: &str) -> PaymentResult<Option<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .find(|p| p.transaction_id == transaction_id)
            .cloned())
    }

    async fn list_by_ticket(&self, ticket_id: Uuid) -> PaymentResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut result: Vec<Payment> = payments
            .values()
            .filter(|p| p.ticket_id == ticket_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.payment_date.cmp(&b.payment_date));
        Ok(result)
    }

    async fn list_by_payer(&self, payer_id: Uuid) -> PaymentResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        let mut result: Vec<Payment> = payments
            .values()
            .filter(|p| p.payer_id == payer_id)
            .cloned()
            .collect();
        result.sort_by(|a, b| a.payment_date.cmp(&b.payment_date));
        Ok(result)
    }

    async fn list_by_status(&self, status: PaymentStatus) -> PaymentResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.status == status)
            .cloned()
            .collect())
    }

    async fn list_by_payer_and_status(
        &self,
        payer_id: Uuid,
        status: PaymentStatus,
    ) -> PaymentResult<Vec<Payment>> {
        let payments = self.payments.read().await;
        Ok(payments
            .values()
            .filter(|p| p.payer_id == payer_id && p.status == status)
            .cloned()
            .collect())
    }

    async fn update(&self, id: Uuid, input: UpdatePayment) -> PaymentResult<Payment> {
        let mut payments = self.payments.write().await;

        let payment = payments.get_mut(&id).ok_or(PaymentError::NotFound(id))?;
        payment.apply_update(input)?;
        let updated = payment.clone();

        tracing::info!(payment_id = %id, status = %updated.status, "Updated payment");
        Ok(updated)
    }

    async fn delete(&self, id: Uuid) -> PaymentResult<bool> {
        let mut payments = self.payments.write().await;

        if payments.remove(&id).is_some() {
            tracing::info!(payment_id = %id, "Deleted payment");
            Ok(true)
        } else {
            Ok(false)
        }
    }
}
