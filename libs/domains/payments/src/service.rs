use std::sync::Arc;
use tracing::instrument;
use uuid::Uuid;
use validator::Validate;

use crate::error::{PaymentError, PaymentResult};
use crate::models::{Payment, PaymentStatus, RecordPayment, UpdatePayment};
use crate::repository::PaymentRepository;

/// Service layer for the payment recorder
///
/// Payments never touch seat inventory; revenue figures are recomputed on
/// demand from completed payments rather than kept as running totals.
#[derive(Clone)]
pub struct PaymentService<R: PaymentRepository> {
    repository: Arc<R>,
}

impl<R: PaymentRepository> PaymentService<R> {
    pub fn new(repository: R) -> Self {
        Self {
            repository: Arc::new(repository),
        }
    }

    /// Record a new payment with a generated unique transaction id
    #[instrument(skip(self, input), fields(ticket_id = %input.ticket_id, amount = input.amount))]
    pub async fn record_payment(&self, input: RecordPayment) -> PaymentResult<Payment> {
        input
            .validate()
            .map_err(|e| PaymentError::Validation(e.to_string()))?;

        self.repository.create(input).await
    }

    /// Get a payment by ID
    pub async fn get_payment(&self, id: Uuid) -> PaymentResult<Payment> {
        self.repository
            .get_by_id(id)
            .await?
            .ok_or(PaymentError::NotFound(id))
    }

    /// Find a payment by its transaction id
    pub async fn get_by_transaction(&self, transaction_id: &str) -> PaymentResult<Payment> {
        self.repository
            .find_by_transaction(transaction_id)
            .await?
            .ok_or_else(|| PaymentError::TransactionNotFound(transaction_id.to_string()))
    }

    /// All payments recorded for a ticket
    pub async fn payments_for_ticket(&self, ticket_id: Uuid) -> PaymentResult<Vec<Payment>> {
        self.repository.list_by_ticket(ticket_id).await
    }

    /// All payments made by a user
    pub async fn payments_for_payer(&self, payer_id: Uuid) -> PaymentResult<Vec<Payment>> {
        self.repository.list_by_payer(payer_id).await
    }

    /// All payments in a given status
    pub async fn payments_with_status(
        &self,
        status: PaymentStatus,
    ) -> PaymentResult<Vec<Payment>> {
        self.repository.list_by_status(status).await
    }

    /// Settle a pending payment (Pending -> Completed)
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn complete_payment(&self, id: Uuid) -> PaymentResult<Payment> {
        self.update_status(id, PaymentStatus::Completed).await
    }

    /// Abandon a payment (Pending/Failed -> Cancelled); completed payments
    /// must be refunded instead
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn cancel_payment(&self, id: Uuid) -> PaymentResult<Payment> {
        self.update_status(id, PaymentStatus::Cancelled).await
    }

    /// Mark a pending payment as failed
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn fail_payment(&self, id: Uuid) -> PaymentResult<Payment> {
        self.update_status(id, PaymentStatus::Failed).await
    }

    /// Reverse a settled payment (Completed -> Refunded only)
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn refund_payment(&self, id: Uuid) -> PaymentResult<Payment> {
        self.update_status(id, PaymentStatus::Refunded).await
    }

    async fn update_status(&self, id: Uuid, status: PaymentStatus) -> PaymentResult<Payment> {
        self.repository
            .update(
                id,
                UpdatePayment {
                    status: Some(status),
                },
            )
            .await
    }

    /// Total revenue: sum of amount over all Completed payments
    pub async fn total_revenue(&self) -> PaymentResult<f64> {
        let completed = self
            .repository
            .list_by_status(PaymentStatus::Completed)
            .await?;
        Ok(completed.iter().map(|p| p.amount).sum())
    }

    /// What a user has spent: sum of their Completed payments
    pub async fn user_spending(&self, payer_id: Uuid) -> PaymentResult<f64> {
        let completed = self
            .repository
            .list_by_payer_and_status(payer_id, PaymentStatus::Completed)
            .await?;
        Ok(completed.iter().map(|p| p.amount).sum())
    }

    /// Number of Completed payments
    pub async fn count_completed(&self) -> PaymentResult<usize> {
        let completed = self
            .repository
            .list_by_status(PaymentStatus::Completed)
            .await?;
        Ok(completed.len())
    }

    /// Remove a payment record
    #[instrument(skip(self), fields(payment_id = %id))]
    pub async fn delete_payment(&self, id: Uuid) -> PaymentResult<()> {
        let deleted = self.repository.delete(id).await?;

        if !deleted {
            return Err(PaymentError::NotFound(id));
        }

        Ok(())
    }
}
