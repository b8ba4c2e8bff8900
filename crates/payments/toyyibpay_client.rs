use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use thiserror::Error;
use tracing::{error, warn};
use url::Url;

use crate::domain::value_objects::{
    enums::payment_statuses::PaymentStatus, payments::GatewayBillStatus,
};

const BILL_NAME_MAX_CHARS: usize = 30;
const BILL_DESCRIPTION_MAX_CHARS: usize = 100;
const BILL_EXPIRY_DAYS: &str = "3";

#[derive(Debug, Error, Clone, PartialEq)]
pub enum GatewayError {
    /// Payer data the gateway would refuse. Fix the input before retrying.
    #[error("invalid payment details: {0}")]
    Validation(String),
    /// The gateway answered but refused the request.
    #[error("payment gateway rejected the request: {0}")]
    Rejected(String),
    /// Network failure, timeout or an unreadable answer. Safe to retry.
    #[error("payment gateway unavailable: {0}")]
    Transient(String),
}

impl From<reqwest::Error> for GatewayError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GatewayError::Transient("request timed out".to_string())
        } else {
            GatewayError::Transient(err.to_string())
        }
    }
}

#[derive(Debug, Clone)]
pub struct ToyyibPayConfig {
    pub base_url: Url,
    pub secret_key: String,
    pub category_code: String,
    pub return_url: String,
    pub callback_url: String,
    pub timeout: Duration,
}

/// What the caller wants billed. Amounts are in sen.
#[derive(Debug, Clone, PartialEq)]
pub struct BillRequest {
    pub reference_no: String,
    pub name: String,
    pub description: String,
    pub amount_minor: i32,
    pub payer_name: String,
    pub payer_email: String,
    pub payer_phone: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CreatedBill {
    pub bill_code: String,
    pub payment_url: String,
}

/// ToyyibPay client built on reqwest.
pub struct ToyyibPayClient {
    http: reqwest::Client,
    config: ToyyibPayConfig,
}

#[derive(Debug, Deserialize)]
struct CreateBillEntry {
    #[serde(rename = "BillCode")]
    bill_code: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    msg: Option<String>,
    message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct BillTransaction {
    #[serde(rename = "billpaymentStatus")]
    status: Option<String>,
    #[serde(rename = "billpaymentAmount")]
    amount: Option<String>,
    #[serde(rename = "billpaymentInvoiceNo")]
    invoice_no: Option<String>,
    #[serde(rename = "billPaymentDate")]
    payment_date: Option<String>,
}

impl ToyyibPayClient {
    pub fn new(config: ToyyibPayConfig) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(config.timeout).build()?;
        Ok(Self { http, config })
    }

    fn endpoint(&self, path: &str) -> Result<Url, GatewayError> {
        self.config
            .base_url
            .join(path)
            .map_err(|err| GatewayError::Transient(format!("invalid gateway url: {err}")))
    }

    async fn ensure_success(
        resp: reqwest::Response,
        context: &str,
    ) -> Result<String, GatewayError> {
        let status = resp.status();
        let body = match resp.text().await {
            Ok(text) => text,
            Err(err) => format!("<failed to read response body: {err}>"),
        };

        if status.is_success() {
            return Ok(body);
        }

        error!(
            status = %status,
            response_body = %body,
            context = %context,
            "toyyibpay api request failed"
        );

        if status.is_server_error() {
            Err(GatewayError::Transient(format!("{context}: status {status}")))
        } else {
            Err(GatewayError::Rejected(gateway_message(&body)))
        }
    }

    /// Creates a bill and returns its code and the hosted payment page.
    pub async fn create_bill(&self, request: &BillRequest) -> Result<CreatedBill, GatewayError> {
        let phone = normalize_phone(&request.payer_phone)?;
        validate_email(&request.payer_email)?;
        if request.amount_minor <= 0 {
            return Err(GatewayError::Validation(
                "amount must be greater than zero".to_string(),
            ));
        }

        let body = [
            ("userSecretKey", self.config.secret_key.clone()),
            ("categoryCode", self.config.category_code.clone()),
            ("billName", bill_name(&request.name)),
            (
                "billDescription",
                truncate_chars(&request.description, BILL_DESCRIPTION_MAX_CHARS),
            ),
            ("billPriceSetting", "1".to_string()),
            ("billPayorInfo", "1".to_string()),
            ("billAmount", request.amount_minor.to_string()),
            ("billReturnUrl", self.config.return_url.clone()),
            ("billCallbackUrl", self.config.callback_url.clone()),
            ("billExternalReferenceNo", request.reference_no.clone()),
            ("billTo", request.payer_name.clone()),
            ("billEmail", request.payer_email.trim().to_string()),
            ("billPhone", phone),
            ("billSplitPayment", "0".to_string()),
            ("billSplitPaymentArgs", String::new()),
            ("billPaymentChannel", "0".to_string()),
            (
                "billContentEmail",
                "Thank you for adopting a bamboo plant!".to_string(),
            ),
            ("billChargeToCustomer", "1".to_string()),
            ("billExpiryDays", BILL_EXPIRY_DAYS.to_string()),
        ];

        let resp = self
            .http
            .post(self.endpoint("index.php/api/createBill")?)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let text = Self::ensure_success(resp, "create bill").await?;

        let bill_code = parse_create_bill_response(&text)?;
        let payment_url = self.endpoint(&bill_code)?.to_string();

        Ok(CreatedBill {
            bill_code,
            payment_url,
        })
    }

    /// Current settlement state of a bill. An empty transaction list reads as pending;
    /// a body that is not a transaction list is a transient error.
    pub async fn get_status(&self, bill_code: &str) -> Result<GatewayBillStatus, GatewayError> {
        let body = [("billCode", bill_code.to_string())];

        let resp = self
            .http
            .post(self.endpoint("index.php/api/getBillTransactions")?)
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&body)
            .send()
            .await?;
        let text = Self::ensure_success(resp, "get bill transactions").await?;

        parse_bill_transactions(bill_code, &text)
    }
}

/// Strips separators, folds the `60` country prefix and checks the Malaysian
/// mobile format `01xxxxxxxx(x)`.
pub fn normalize_phone(raw: &str) -> Result<String, GatewayError> {
    let mut digits: String = raw
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '+'))
        .collect();
    if let Some(rest) = digits.strip_prefix("60") {
        digits = format!("0{rest}");
    }

    let valid = digits.chars().all(|c| c.is_ascii_digit())
        && digits.starts_with("01")
        && (10..=11).contains(&digits.len());
    if !valid {
        return Err(GatewayError::Validation(format!(
            "phone number {raw:?} must be a Malaysian mobile number such as 0123456789"
        )));
    }

    Ok(digits)
}

pub fn validate_email(raw: &str) -> Result<(), GatewayError> {
    let email = raw.trim();
    let valid = match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    };

    if valid {
        Ok(())
    } else {
        Err(GatewayError::Validation(format!(
            "email address {email:?} is not valid"
        )))
    }
}

/// The gateway accepts letters, digits, spaces and underscores, up to 30 characters.
fn bill_name(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    truncate_chars(cleaned.trim(), BILL_NAME_MAX_CHARS)
}

fn truncate_chars(raw: &str, max: usize) -> String {
    raw.chars().take(max).collect::<String>().trim_end().to_string()
}

fn gateway_message(body: &str) -> String {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(body) {
        if let Some(msg) = envelope.msg.or(envelope.message) {
            return msg;
        }
    }
    if let Ok(entries) = serde_json::from_str::<Vec<ErrorEnvelope>>(body) {
        if let Some(msg) = entries
            .into_iter()
            .find_map(|entry| entry.msg.or(entry.message))
        {
            return msg;
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response from gateway".to_string()
    } else {
        trimmed.to_string()
    }
}

fn parse_create_bill_response(body: &str) -> Result<String, GatewayError> {
    match serde_json::from_str::<Vec<CreateBillEntry>>(body) {
        Ok(entries) => entries
            .into_iter()
            .map(|entry| entry.bill_code)
            .find(|code| !code.trim().is_empty())
            .ok_or_else(|| GatewayError::Transient("bill code missing from response".to_string())),
        Err(_) => {
            let message = gateway_message(body);
            warn!(%message, "toyyibpay: create bill returned no bill code");
            Err(GatewayError::Rejected(message))
        }
    }
}

fn parse_bill_transactions(bill_code: &str, body: &str) -> Result<GatewayBillStatus, GatewayError> {
    let transactions = serde_json::from_str::<Vec<BillTransaction>>(body).map_err(|err| {
        warn!(%bill_code, error = %err, "toyyibpay: unreadable transaction list");
        GatewayError::Transient(format!("unreadable transaction list: {err}"))
    })?;

    let chosen = transactions
        .iter()
        .find(|tx| tx.status.as_deref() == Some("1"))
        .or_else(|| transactions.last());

    let Some(tx) = chosen else {
        return Ok(GatewayBillStatus::pending());
    };

    let status = match tx.status.as_deref().map(str::trim) {
        Some("1") => PaymentStatus::Success,
        Some("3") => PaymentStatus::Failed,
        _ => PaymentStatus::Pending,
    };

    Ok(GatewayBillStatus {
        status,
        paid_amount_minor: tx.amount.as_deref().and_then(parse_amount_minor),
        transaction_id: tx
            .invoice_no
            .as_ref()
            .map(|no| no.trim().to_string())
            .filter(|no| !no.is_empty()),
        paid_at: tx.payment_date.as_deref().and_then(parse_payment_date),
    })
}

/// "12.50" -> 1250
fn parse_amount_minor(raw: &str) -> Option<i32> {
    let value: f64 = raw.trim().replace(',', "").parse().ok()?;
    let minor = (value * 100.0).round();
    if minor.is_finite() && minor >= 0.0 && minor <= i32::MAX as f64 {
        Some(minor as i32)
    } else {
        None
    }
}

fn parse_payment_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    ["%d-%m-%Y %H:%M:%S", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(raw, format).ok())
        .map(|naive| naive.and_utc())
}
