use adoption_core::{
    domain::{
        entities::payments::{InsertPaymentEntity, PaymentEntity},
        repositories::payments::PaymentRepository,
        value_objects::{
            enums::payment_statuses::PaymentStatus,
            payments::{
                CreatePaymentResponse, GatewayBillStatus, GatewayCallbackForm,
                GatewayReturnQuery, PayerInfo, PaymentStatusDto, PaymentTransition,
                PendingRefreshReport,
            },
        },
    },
    payments::toyyibpay_client::{BillRequest, CreatedBill, GatewayError, ToyyibPayClient},
};
use async_trait::async_trait;
use chrono::{Duration, Utc};
use rand::Rng;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::usecases::{reconciliation::ReconciliationUseCase, reference_resolver::ReferenceResolver};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_bill(&self, request: &BillRequest) -> Result<CreatedBill, GatewayError>;

    async fn get_status(&self, bill_code: &str) -> Result<GatewayBillStatus, GatewayError>;
}

#[async_trait]
impl PaymentGateway for ToyyibPayClient {
    async fn create_bill(&self, request: &BillRequest) -> Result<CreatedBill, GatewayError> {
        self.create_bill(request).await
    }

    async fn get_status(&self, bill_code: &str) -> Result<GatewayBillStatus, GatewayError> {
        self.get_status(bill_code).await
    }
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("package {0:?} not found")]
    PackageNotFound(String),
    #[error("location {0:?} not found")]
    LocationNotFound(String),
    #[error("location {0} has no free planting spots")]
    LocationFull(String),
    #[error("payment {0} not found")]
    PaymentNotFound(String),
    #[error("payment cannot move from {from} to {to}")]
    InvalidTransition {
        from: PaymentStatus,
        to: PaymentStatus,
    },
    #[error("an email address is required to pay")]
    MissingEmail,
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::PackageNotFound(_)
            | PaymentError::LocationNotFound(_)
            | PaymentError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            PaymentError::LocationFull(_) | PaymentError::InvalidTransition { .. } => {
                StatusCode::CONFLICT
            }
            PaymentError::MissingEmail => StatusCode::BAD_REQUEST,
            PaymentError::Gateway(GatewayError::Validation(_)) => StatusCode::BAD_REQUEST,
            PaymentError::Gateway(GatewayError::Rejected(_)) => StatusCode::BAD_GATEWAY,
            PaymentError::Gateway(GatewayError::Transient(_)) => StatusCode::SERVICE_UNAVAILABLE,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, PaymentError>;

/// `BMB` + UTC timestamp + four random digits.
pub fn generate_reference_no() -> String {
    let suffix: u16 = rand::thread_rng().gen_range(0..10_000);
    format!("BMB{}{:04}", Utc::now().format("%Y%m%d%H%M%S"), suffix)
}

pub struct PaymentUseCase {
    payment_repo: Arc<dyn PaymentRepository + Send + Sync>,
    resolver: Arc<ReferenceResolver>,
    gateway: Arc<dyn PaymentGateway>,
    reconciliation: Arc<ReconciliationUseCase>,
}

impl PaymentUseCase {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository + Send + Sync>,
        resolver: Arc<ReferenceResolver>,
        gateway: Arc<dyn PaymentGateway>,
        reconciliation: Arc<ReconciliationUseCase>,
    ) -> Self {
        Self {
            payment_repo,
            resolver,
            gateway,
            reconciliation,
        }
    }

    pub async fn create_payment(
        &self,
        payer: PayerInfo,
        package_ref: &str,
        location_ref: &str,
    ) -> UseCaseResult<CreatePaymentResponse> {
        if payer.email.trim().is_empty() {
            return Err(PaymentError::MissingEmail);
        }

        let package = self
            .resolver
            .resolve_package(package_ref)
            .await?
            .filter(|package| package.is_active)
            .ok_or_else(|| PaymentError::PackageNotFound(package_ref.to_string()))?;

        let location = self
            .resolver
            .resolve_location(location_ref)
            .await?
            .filter(|location| location.is_active)
            .ok_or_else(|| PaymentError::LocationNotFound(location_ref.to_string()))?;

        if location.is_full() {
            warn!(
                location_id = location.id,
                capacity = location.capacity,
                current_count = location.current_count,
                "payments: location is full"
            );
            return Err(PaymentError::LocationFull(location.name));
        }

        let reference_no = generate_reference_no();
        let payment = self
            .payment_repo
            .insert(InsertPaymentEntity {
                reference_no: reference_no.clone(),
                status: PaymentStatus::Pending.to_string(),
                amount_minor: package.price_minor,
                customer_name: payer.name.clone(),
                customer_email: payer.email.clone(),
                customer_phone: payer.phone.clone(),
                clerk_id: payer.clerk_id.clone(),
                package_type: package_ref.trim().to_string(),
                location_ref: location_ref.trim().to_string(),
            })
            .await
            .map_err(|err| {
                error!(%reference_no, db_error = ?err, "payments: failed to insert payment");
                PaymentError::Internal(err)
            })?;

        info!(
            %reference_no,
            clerk_id = %payer.clerk_id,
            package_id = package.id,
            location_id = location.id,
            amount_minor = payment.amount_minor,
            "payments: pending payment recorded"
        );

        let request = BillRequest {
            reference_no: reference_no.clone(),
            name: format!("{} Bamboo Adoption", package.name),
            description: format!("{} bamboo adoption at {}", package.name, location.name),
            amount_minor: payment.amount_minor,
            payer_name: payer.name,
            payer_email: payer.email,
            payer_phone: payer.phone,
        };

        let bill = match self.gateway.create_bill(&request).await {
            Ok(bill) => bill,
            Err(err) => {
                warn!(%reference_no, error = %err, "payments: bill creation failed");
                // The payer never receives a payment url for this reference, even when the
                // gateway timed out after creating the bill. A new attempt gets a new reference.
                let failed = PaymentTransition {
                    status: PaymentStatus::Failed,
                    transaction_id: None,
                    paid_at: None,
                };
                if let Err(db_err) = self.payment_repo.apply_transition(&reference_no, failed).await {
                    error!(%reference_no, db_error = ?db_err, "payments: failed to mark payment failed");
                }
                return Err(PaymentError::Gateway(err));
            }
        };

        self.payment_repo
            .attach_bill_code(&reference_no, &bill.bill_code)
            .await
            .map_err(|err| {
                error!(%reference_no, bill_code = %bill.bill_code, db_error = ?err, "payments: failed to store bill code");
                PaymentError::Internal(err)
            })?;

        info!(%reference_no, bill_code = %bill.bill_code, "payments: bill created");
        Ok(CreatePaymentResponse {
            reference_no,
            bill_code: bill.bill_code,
            payment_url: bill.payment_url,
            amount_minor: payment.amount_minor,
        })
    }

    /// Asks the gateway about a pending payment and applies whatever it settled to.
    pub async fn refresh_from_gateway(&self, payment: PaymentEntity) -> UseCaseResult<PaymentEntity> {
        if payment.payment_status() != PaymentStatus::Pending {
            return Ok(payment);
        }
        let Some(bill_code) = payment.bill_code.clone() else {
            return Ok(payment);
        };

        let remote = self.gateway.get_status(&bill_code).await?;
        if remote.status == PaymentStatus::Pending {
            return Ok(payment);
        }

        if remote.status == PaymentStatus::Success {
            if let Some(paid) = remote.paid_amount_minor {
                if paid < payment.amount_minor {
                    warn!(
                        reference_no = %payment.reference_no,
                        expected = payment.amount_minor,
                        paid,
                        "payments: gateway reports a smaller amount than billed"
                    );
                }
            }
        }

        let transition = PaymentTransition {
            status: remote.status,
            transaction_id: remote.transaction_id,
            paid_at: match remote.status {
                PaymentStatus::Success => remote.paid_at.or_else(|| Some(Utc::now())),
                _ => None,
            },
        };

        match self
            .payment_repo
            .apply_transition(&payment.reference_no, transition)
            .await?
        {
            Some(updated) => {
                info!(
                    reference_no = %updated.reference_no,
                    status = %updated.status,
                    "payments: status updated from gateway"
                );
                Ok(updated)
            }
            // Another trigger moved it first; report what it settled to.
            None => self
                .payment_repo
                .find_by_reference_no(&payment.reference_no)
                .await?
                .ok_or_else(|| PaymentError::PaymentNotFound(payment.reference_no.clone())),
        }
    }

    /// Refresh, then reconcile. Never fails: trouble on either step reads as pending.
    async fn sync_payment(&self, payment: PaymentEntity) -> PaymentStatusDto {
        let reference_no = payment.reference_no.clone();

        let payment = match self.refresh_from_gateway(payment.clone()).await {
            Ok(refreshed) => refreshed,
            Err(err) => {
                warn!(%reference_no, error = %err, "payments: gateway refresh failed, keeping stored status");
                payment
            }
        };

        let status = payment.payment_status();
        if status != PaymentStatus::Success {
            return PaymentStatusDto {
                reference_no,
                status,
                adoption_id: None,
            };
        }

        match self
            .reconciliation
            .ensure_adoption_for_payment(&reference_no)
            .await
        {
            Ok(outcome) => PaymentStatusDto {
                adoption_id: outcome.adoption().map(|adoption| adoption.id),
                reference_no,
                status,
            },
            Err(err) => {
                warn!(%reference_no, error = %err, "payments: reconciliation deferred");
                PaymentStatusDto {
                    reference_no,
                    status: PaymentStatus::Pending,
                    adoption_id: None,
                }
            }
        }
    }

    /// Gateway callback. Its claims are only a hint; the gateway is asked directly.
    pub async fn handle_callback(&self, form: GatewayCallbackForm) -> UseCaseResult<PaymentStatusDto> {
        info!(
            reference_no = %form.order_id,
            callback_status = %form.status,
            billcode = ?form.billcode,
            refno = ?form.refno,
            reason = ?form.reason,
            "payments: gateway callback received"
        );

        let payment = self
            .payment_repo
            .find_by_reference_no(&form.order_id)
            .await?
            .ok_or_else(|| PaymentError::PaymentNotFound(form.order_id.clone()))?;

        if let (Some(claimed), Some(stored)) = (form.billcode.as_deref(), payment.bill_code.as_deref()) {
            if claimed != stored {
                warn!(
                    reference_no = %payment.reference_no,
                    claimed,
                    stored,
                    "payments: callback bill code does not match, confirming stored bill"
                );
            }
        }

        Ok(self.sync_payment(payment).await)
    }

    /// Client poll for the payer's own payment.
    pub async fn poll_status(&self, clerk_id: &str, reference_no: &str) -> UseCaseResult<PaymentStatusDto> {
        let payment = match self.payment_repo.find_by_reference_no(reference_no).await {
            Ok(Some(payment)) if payment.clerk_id == clerk_id => payment,
            Ok(_) => return Err(PaymentError::PaymentNotFound(reference_no.to_string())),
            Err(err) => {
                warn!(%reference_no, db_error = ?err, "payments: poll could not load payment");
                return Ok(PaymentStatusDto {
                    reference_no: reference_no.to_string(),
                    status: PaymentStatus::Pending,
                    adoption_id: None,
                });
            }
        };

        Ok(self.sync_payment(payment).await)
    }

    /// Payer redirected back from the hosted payment page.
    pub async fn confirm_return(&self, query: GatewayReturnQuery) -> UseCaseResult<PaymentStatusDto> {
        info!(
            reference_no = %query.order_id,
            status_id = ?query.status_id,
            msg = ?query.msg,
            transaction_id = ?query.transaction_id,
            "payments: payer returned from gateway"
        );

        let payment = match self.payment_repo.find_by_reference_no(&query.order_id).await {
            Ok(Some(payment)) => payment,
            Ok(None) => return Err(PaymentError::PaymentNotFound(query.order_id)),
            Err(err) => {
                warn!(reference_no = %query.order_id, db_error = ?err, "payments: return page could not load payment");
                return Ok(PaymentStatusDto {
                    reference_no: query.order_id,
                    status: PaymentStatus::Pending,
                    adoption_id: None,
                });
            }
        };

        if let (Some(claimed), Some(stored)) = (query.billcode.as_deref(), payment.bill_code.as_deref()) {
            if claimed != stored {
                return Err(PaymentError::PaymentNotFound(query.order_id));
            }
        }

        Ok(self.sync_payment(payment).await)
    }

    pub async fn cancel_payment(&self, clerk_id: &str, reference_no: &str) -> UseCaseResult<PaymentStatusDto> {
        let payment = self
            .payment_repo
            .find_by_reference_no(reference_no)
            .await?
            .filter(|payment| payment.clerk_id == clerk_id)
            .ok_or_else(|| PaymentError::PaymentNotFound(reference_no.to_string()))?;

        let current = payment.payment_status();
        if !current.can_transition_to(PaymentStatus::Cancelled) {
            return Err(PaymentError::InvalidTransition {
                from: current,
                to: PaymentStatus::Cancelled,
            });
        }

        let cancelled = PaymentTransition {
            status: PaymentStatus::Cancelled,
            transaction_id: None,
            paid_at: None,
        };
        match self.payment_repo.apply_transition(reference_no, cancelled).await? {
            Some(updated) => {
                info!(%reference_no, %clerk_id, "payments: payment cancelled");
                Ok(PaymentStatusDto {
                    reference_no: updated.reference_no.clone(),
                    status: updated.payment_status(),
                    adoption_id: None,
                })
            }
            None => {
                let latest = self
                    .payment_repo
                    .find_by_reference_no(reference_no)
                    .await?
                    .map(|payment| payment.payment_status())
                    .unwrap_or(current);
                Err(PaymentError::InvalidTransition {
                    from: latest,
                    to: PaymentStatus::Cancelled,
                })
            }
        }
    }

    /// Polls the gateway for pending payments older than `min_age` and reconciles
    /// the ones that settled.
    pub async fn refresh_stale_pending(
        &self,
        min_age: Duration,
        limit: i64,
    ) -> UseCaseResult<PendingRefreshReport> {
        let payments = self
            .payment_repo
            .list_pending_with_bill(Utc::now() - min_age, limit)
            .await?;

        let mut report = PendingRefreshReport {
            scanned: payments.len(),
            ..PendingRefreshReport::default()
        };

        for payment in payments {
            let reference_no = payment.reference_no.clone();
            match self.refresh_from_gateway(payment).await {
                Ok(refreshed) => match refreshed.payment_status() {
                    PaymentStatus::Success => {
                        report.settled += 1;
                        if let Err(err) = self
                            .reconciliation
                            .ensure_adoption_for_payment(&reference_no)
                            .await
                        {
                            warn!(%reference_no, error = %err, "payments: settled payment left for the sweep");
                        }
                    }
                    PaymentStatus::Failed | PaymentStatus::Cancelled => report.failed += 1,
                    PaymentStatus::Pending => report.still_pending += 1,
                },
                Err(err) => {
                    warn!(%reference_no, error = %err, "payments: pending refresh failed");
                    report.errors.push(reference_no);
                }
            }
        }

        info!(
            scanned = report.scanned,
            settled = report.settled,
            failed = report.failed,
            still_pending = report.still_pending,
            errors = report.errors.len(),
            "payments: pending refresh finished"
        );
        Ok(report)
    }
}
