use adoption_core::domain::{
    entities::{
        adoptions::InsertAdoptionEntity, bamboo_plants::InsertBambooPlantEntity,
        locations::LocationEntity, packages::PackageEntity, payments::PaymentEntity,
        users::InsertUserEntity,
    },
    repositories::{
        adoptions::AdoptionRepository, payments::PaymentRepository, users::UserRepository,
    },
    value_objects::{
        adoptions::{
            AdoptionCreation, AdoptionDraft, DEFAULT_SPECIES, EnvironmentSeed, GrowthSeed,
            ReconciliationOutcome, SyncReport,
        },
        enums::{payment_statuses::PaymentStatus, plant_statuses::PlantStatus},
        growth::growth_at,
    },
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::usecases::reference_resolver::ReferenceResolver;

#[derive(Debug, Error)]
pub enum ReconciliationError {
    #[error("payment {0} not found")]
    PaymentNotFound(String),
    /// Retryable. The next trigger or sweep picks the payment up again.
    #[error("storage unavailable: {0}")]
    Storage(#[from] anyhow::Error),
}

impl ReconciliationError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            ReconciliationError::PaymentNotFound(_) => StatusCode::NOT_FOUND,
            ReconciliationError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, ReconciliationError>;

/// Turns a settled payment into exactly one adoption, no matter how many
/// triggers ask for it or in what order.
pub struct ReconciliationUseCase {
    payment_repo: Arc<dyn PaymentRepository + Send + Sync>,
    adoption_repo: Arc<dyn AdoptionRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    resolver: Arc<ReferenceResolver>,
}

impl ReconciliationUseCase {
    pub fn new(
        payment_repo: Arc<dyn PaymentRepository + Send + Sync>,
        adoption_repo: Arc<dyn AdoptionRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        resolver: Arc<ReferenceResolver>,
    ) -> Self {
        Self {
            payment_repo,
            adoption_repo,
            user_repo,
            resolver,
        }
    }

    pub async fn ensure_adoption_for_payment(
        &self,
        reference_no: &str,
    ) -> UseCaseResult<ReconciliationOutcome> {
        let payment = self
            .payment_repo
            .find_by_reference_no(reference_no)
            .await
            .map_err(|err| {
                error!(%reference_no, db_error = ?err, "reconciliation: failed to load payment");
                ReconciliationError::Storage(err)
            })?
            .ok_or_else(|| {
                warn!(%reference_no, "reconciliation: payment not found");
                ReconciliationError::PaymentNotFound(reference_no.to_string())
            })?;

        let status = payment.payment_status();
        if status != PaymentStatus::Success {
            info!(%reference_no, %status, "reconciliation: payment not settled yet");
            return Ok(ReconciliationOutcome::NotPayable { status });
        }

        if let Some(existing) = self
            .adoption_repo
            .find_by_payment_reference_no(reference_no)
            .await
            .map_err(|err| {
                error!(%reference_no, db_error = ?err, "reconciliation: failed to check for existing adoption");
                ReconciliationError::Storage(err)
            })?
        {
            info!(
                %reference_no,
                adoption_id = existing.id,
                "reconciliation: adoption already exists"
            );
            return Ok(ReconciliationOutcome::Materialized {
                adoption: existing,
                newly_created: false,
            });
        }

        let user = self
            .user_repo
            .find_or_create(InsertUserEntity {
                clerk_id: payment.clerk_id.clone(),
                email: payment.customer_email.clone(),
                name: Some(payment.customer_name.clone()).filter(|name| !name.trim().is_empty()),
            })
            .await
            .map_err(|err| {
                error!(%reference_no, clerk_id = %payment.clerk_id, db_error = ?err, "reconciliation: failed to resolve user");
                ReconciliationError::Storage(err)
            })?;

        let package = self
            .resolver
            .resolve_package(&payment.package_type)
            .await
            .map_err(ReconciliationError::Storage)?;
        if package.is_none() {
            warn!(
                %reference_no,
                package_type = %payment.package_type,
                "reconciliation: package reference unresolved, adopting without package"
            );
        }

        let location = self
            .resolver
            .resolve_location(&payment.location_ref)
            .await
            .map_err(ReconciliationError::Storage)?;
        if location.is_none() {
            warn!(
                %reference_no,
                location_ref = %payment.location_ref,
                "reconciliation: location reference unresolved, adopting without location"
            );
        }

        let draft = build_draft(&payment, user.id, package.as_ref(), location.as_ref());

        let creation = self
            .adoption_repo
            .create_from_draft(draft)
            .await
            .map_err(|err| {
                error!(%reference_no, db_error = ?err, "reconciliation: failed to create adoption");
                ReconciliationError::Storage(err)
            })?;

        match creation {
            AdoptionCreation::Created(adoption) => {
                info!(
                    %reference_no,
                    adoption_id = adoption.id,
                    user_id = user.id,
                    package_id = ?adoption.package_id,
                    location_id = ?adoption.location_id,
                    "reconciliation: adoption created"
                );
                Ok(ReconciliationOutcome::Materialized {
                    adoption,
                    newly_created: true,
                })
            }
            AdoptionCreation::AlreadyExists(adoption) => {
                info!(
                    %reference_no,
                    adoption_id = adoption.id,
                    "reconciliation: concurrent trigger created the adoption first"
                );
                Ok(ReconciliationOutcome::Materialized {
                    adoption,
                    newly_created: false,
                })
            }
        }
    }

    /// Reconciles every settled payment that still has no adoption, one at a time.
    /// A failure on one payment is recorded and the sweep moves on.
    pub async fn sync_missing_adoptions(&self, limit: i64) -> UseCaseResult<SyncReport> {
        let payments = self
            .payment_repo
            .list_success_without_adoption(limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "reconciliation: failed to list payments missing adoptions");
                ReconciliationError::Storage(err)
            })?;

        let mut report = SyncReport {
            scanned: payments.len(),
            ..SyncReport::default()
        };

        for payment in payments {
            match self.ensure_adoption_for_payment(&payment.reference_no).await {
                Ok(ReconciliationOutcome::Materialized {
                    newly_created: true,
                    ..
                }) => report.created += 1,
                Ok(ReconciliationOutcome::Materialized { .. }) => report.already_present += 1,
                Ok(ReconciliationOutcome::NotPayable { .. }) => report.not_payable += 1,
                Err(err) => {
                    warn!(
                        reference_no = %payment.reference_no,
                        error = %err,
                        "reconciliation: sweep could not reconcile payment"
                    );
                    report.failed.push(payment.reference_no);
                }
            }
        }

        info!(
            scanned = report.scanned,
            created = report.created,
            already_present = report.already_present,
            failed = report.failed.len(),
            "reconciliation: sweep finished"
        );
        Ok(report)
    }
}

fn build_draft(
    payment: &PaymentEntity,
    user_id: i32,
    package: Option<&PackageEntity>,
    location: Option<&LocationEntity>,
) -> AdoptionDraft {
    let now = Utc::now();
    let seedling = growth_at(0);

    AdoptionDraft {
        adoption: InsertAdoptionEntity {
            user_id,
            package_id: package.map(|p| p.id),
            location_id: location.map(|l| l.id),
            bamboo_plant_id: None,
            package_name: package.map(|p| p.name.clone()),
            package_price_minor: Some(package.map_or(payment.amount_minor, |p| p.price_minor)),
            package_period: Some(package.map_or_else(
                || payment.package_type.trim().to_string(),
                |p| p.period.clone(),
            )),
            package_features: package.map(|p| p.features_json()),
            location_name: Some(location.map_or_else(
                || payment.location_ref.trim().to_string(),
                |l| l.name.clone(),
            )),
            payment_reference_no: Some(payment.reference_no.clone()),
            is_active: true,
        },
        plant: InsertBambooPlantEntity {
            code: format!("BMB-PLANT-{}", payment.reference_no),
            species: DEFAULT_SPECIES.to_string(),
            location_id: location.map(|l| l.id),
            planted_at: now.date_naive(),
            current_height: seedling.height,
            co2_absorbed: seedling.co2_absorbed,
            status: PlantStatus::Growing.to_string(),
        },
        initial_growth: GrowthSeed {
            recorded_at: now,
            height: seedling.height,
            diameter: seedling.diameter,
            notes: Some("Planted and registered for adoption".to_string()),
        },
        environment: EnvironmentSeed::default(),
    }
}
