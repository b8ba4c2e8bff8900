use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::{
    domain::value_objects::enums::payment_statuses::PaymentStatus,
    infra::db::postgres::schema::payments,
};

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: i32,
    pub reference_no: String,
    pub bill_code: Option<String>,
    pub transaction_id: Option<String>,
    pub status: String,
    pub amount_minor: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub clerk_id: String,
    /// Package id or period keyword, as written at creation time.
    pub package_type: String,
    /// Location id or location name, as written at creation time.
    pub location_ref: String,
    pub paid_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PaymentEntity {
    /// Unknown strings read as pending so nothing is materialised from them.
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_str(&self.status).unwrap_or(PaymentStatus::Pending)
    }
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = payments)]
pub struct InsertPaymentEntity {
    pub reference_no: String,
    pub status: String,
    pub amount_minor: i32,
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub clerk_id: String,
    pub package_type: String,
    pub location_ref: String,
}
