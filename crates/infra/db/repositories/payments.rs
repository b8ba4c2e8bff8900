use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::{
    OptionalExtension, RunQueryDsl,
    dsl::not,
    insert_into,
    prelude::*,
    update,
};
use std::sync::Arc;

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{adoptions, payments},
    },
};
use domain::{
    entities::payments::{InsertPaymentEntity, PaymentEntity},
    repositories::payments::PaymentRepository,
    value_objects::{enums::payment_statuses::PaymentStatus, payments::PaymentTransition},
};

pub struct PaymentPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn insert(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = insert_into(payments::table)
            .values(&payment)
            .returning(PaymentEntity::as_returning())
            .get_result::<PaymentEntity>(&mut conn)?;

        Ok(inserted)
    }

    async fn find_by_reference_no(&self, reference_no: &str) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let payment = payments::table
            .filter(payments::reference_no.eq(reference_no))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(payment)
    }

    async fn attach_bill_code(&self, reference_no: &str, bill_code: &str) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(payments::table.filter(payments::reference_no.eq(reference_no)))
            .set((
                payments::bill_code.eq(Some(bill_code)),
                payments::updated_at.eq(Utc::now()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }

    async fn apply_transition(
        &self,
        reference_no: &str,
        transition: PaymentTransition,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // Compare-and-set on the pending status: a duplicate notification updates nothing.
        let updated = update(
            payments::table
                .filter(payments::reference_no.eq(reference_no))
                .filter(payments::status.eq(PaymentStatus::Pending.as_str())),
        )
        .set((
            payments::status.eq(transition.status.as_str()),
            payments::transaction_id.eq(transition.transaction_id),
            payments::paid_at.eq(transition.paid_at),
            payments::updated_at.eq(Utc::now()),
        ))
        .returning(PaymentEntity::as_returning())
        .get_result::<PaymentEntity>(&mut conn)
        .optional()?;

        Ok(updated)
    }

    async fn list_success_without_adoption(&self, limit: i64) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::status.eq(PaymentStatus::Success.as_str()))
            .filter(not(payments::reference_no.nullable().eq_any(
                adoptions::table
                    .filter(adoptions::payment_reference_no.is_not_null())
                    .select(adoptions::payment_reference_no),
            )))
            .order(payments::created_at.asc())
            .limit(limit)
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_pending_with_bill(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = payments::table
            .filter(payments::status.eq(PaymentStatus::Pending.as_str()))
            .filter(payments::bill_code.is_not_null())
            .filter(payments::created_at.le(created_before))
            .order(payments::created_at.asc())
            .limit(limit)
            .select(PaymentEntity::as_select())
            .load::<PaymentEntity>(&mut conn)?;

        Ok(results)
    }
}
