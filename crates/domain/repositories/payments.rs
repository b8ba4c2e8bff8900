use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use mockall::automock;

use crate::domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    value_objects::payments::PaymentTransition,
};

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn insert(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity>;

    async fn find_by_reference_no(&self, reference_no: &str) -> Result<Option<PaymentEntity>>;

    async fn attach_bill_code(&self, reference_no: &str, bill_code: &str) -> Result<()>;

    /// Applies the transition only while the row is still pending. Returns the
    /// updated row, or `None` when nothing changed.
    async fn apply_transition(
        &self,
        reference_no: &str,
        transition: PaymentTransition,
    ) -> Result<Option<PaymentEntity>>;

    async fn list_success_without_adoption(&self, limit: i64) -> Result<Vec<PaymentEntity>>;

    async fn list_pending_with_bill(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PaymentEntity>>;
}
