use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;

/// Settlement state reported by the payment gateway for one bill.
#[derive(Debug, Clone, PartialEq)]
pub struct GatewayBillStatus {
    pub status: PaymentStatus,
    pub paid_amount_minor: Option<i32>,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

impl GatewayBillStatus {
    pub fn pending() -> Self {
        Self {
            status: PaymentStatus::Pending,
            paid_amount_minor: None,
            transaction_id: None,
            paid_at: None,
        }
    }
}

/// A status change applied only while the payment is still pending.
#[derive(Debug, Clone, PartialEq)]
pub struct PaymentTransition {
    pub status: PaymentStatus,
    pub transaction_id: Option<String>,
    pub paid_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PayerInfo {
    pub clerk_id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Deserialize)]
pub struct CreatePaymentRequest {
    /// Package id or period keyword.
    pub package: String,
    /// Location id or location name.
    pub location: String,
    pub phone: String,
    pub name: Option<String>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct CreatePaymentResponse {
    pub reference_no: String,
    pub bill_code: String,
    pub payment_url: String,
    pub amount_minor: i32,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PaymentStatusDto {
    pub reference_no: String,
    pub status: PaymentStatus,
    pub adoption_id: Option<i32>,
}

/// Form body posted by the gateway after a settlement attempt.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayCallbackForm {
    pub refno: Option<String>,
    pub status: String,
    pub reason: Option<String>,
    pub billcode: Option<String>,
    pub order_id: String,
    pub amount: Option<String>,
    pub transaction_time: Option<String>,
}

/// Query string the gateway appends when redirecting the payer back.
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayReturnQuery {
    pub status_id: Option<String>,
    pub billcode: Option<String>,
    pub order_id: String,
    pub msg: Option<String>,
    pub transaction_id: Option<String>,
}

/// Outcome of one pass over pending payments that are waiting on the gateway.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct PendingRefreshReport {
    pub scanned: usize,
    pub settled: usize,
    pub failed: usize,
    pub still_pending: usize,
    pub errors: Vec<String>,
}
