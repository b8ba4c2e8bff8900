use crate::{
    auth::{AuthUser, admin::AdminAuthorizer},
    axum_http::error_responses::AppError,
    usecases::{
        adoptions::AdoptionUseCase, catalog::CatalogUseCase, growth::GrowthUseCase,
        reconciliation::ReconciliationUseCase,
    },
};
use adoption_core::domain::value_objects::{
    adoptions::{AdoptionDto, ReconciliationDto, ReconciliationOutcome},
    catalog::{
        CreateLocationRequest, CreatePackageRequest, UpdateLocationRequest, UpdatePackageRequest,
    },
    enums::payment_statuses::PaymentStatus,
};
use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

const DEFAULT_SYNC_LIMIT: i64 = 100;
const MAX_SYNC_LIMIT: i64 = 1000;

#[derive(Clone)]
pub struct AdminState {
    pub authorizer: Arc<dyn AdminAuthorizer>,
    pub adoptions: Arc<AdoptionUseCase>,
    pub catalog: Arc<CatalogUseCase>,
    pub growth: Arc<GrowthUseCase>,
    pub reconciliation: Arc<ReconciliationUseCase>,
}

#[derive(Debug, Deserialize)]
pub struct SyncQuery {
    limit: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct SetActiveRequest {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct TimelineResponse {
    pub plant_id: i32,
    pub records: usize,
}

pub fn routes(state: AdminState) -> Router {
    Router::new()
        .route("/adoptions", get(list_adoptions))
        .route("/adoptions/:id", patch(set_adoption_active))
        .route("/payments/sync", post(sync_missing_adoptions))
        .route("/payments/:reference_no/reconcile", post(reconcile_payment))
        .route("/packages", post(create_package))
        .route("/packages/:id", patch(update_package))
        .route("/locations", post(create_location))
        .route("/locations/:id", patch(update_location))
        .route("/plants/:id/timeline", post(regenerate_timeline))
        .with_state(state)
}

fn require_admin(state: &AdminState, auth: &AuthUser) -> Result<(), AppError> {
    if state.authorizer.is_admin(auth) {
        Ok(())
    } else {
        warn!(clerk_id = %auth.clerk_id, "admin router: non-admin caller rejected");
        Err(AppError::Forbidden)
    }
}

pub fn reconciliation_dto(reference_no: &str, outcome: ReconciliationOutcome) -> ReconciliationDto {
    match outcome {
        ReconciliationOutcome::NotPayable { status } => ReconciliationDto {
            reference_no: reference_no.to_string(),
            status,
            adoption: None,
            newly_created: false,
        },
        ReconciliationOutcome::Materialized {
            adoption,
            newly_created,
        } => ReconciliationDto {
            reference_no: reference_no.to_string(),
            status: PaymentStatus::Success,
            adoption: Some(AdoptionDto::from(adoption)),
            newly_created,
        },
    }
}

pub async fn list_adoptions(State(state): State<AdminState>, auth: AuthUser) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state.adoptions.list_all().await {
        Ok(adoptions) => Json(adoptions).into_response(),
        Err(err) => {
            error!(error = ?err, "admin router: failed to list adoptions");
            AppError::from(err).into_response()
        }
    }
}

pub async fn set_adoption_active(
    State(state): State<AdminState>,
    auth: AuthUser,
    Path(adoption_id): Path<i32>,
    Json(request): Json<SetActiveRequest>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state
        .adoptions
        .set_active(adoption_id, request.is_active)
        .await
    {
        Ok(adoption) => Json(adoption).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn sync_missing_adoptions(
    State(state): State<AdminState>,
    auth: AuthUser,
    Query(query): Query<SyncQuery>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    let limit = query.limit.unwrap_or(DEFAULT_SYNC_LIMIT);
    if limit <= 0 || limit > MAX_SYNC_LIMIT {
        return AppError::BadRequest(format!("limit must be between 1 and {}", MAX_SYNC_LIMIT))
            .into_response();
    }

    info!(clerk_id = %auth.clerk_id, limit, "admin router: adoption sync requested");
    match state.reconciliation.sync_missing_adoptions(limit).await {
        Ok(report) => Json(report).into_response(),
        Err(err) => {
            error!(error = ?err, "admin router: adoption sync failed");
            AppError::from(err).into_response()
        }
    }
}

pub async fn reconcile_payment(
    State(state): State<AdminState>,
    auth: AuthUser,
    Path(reference_no): Path<String>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state
        .reconciliation
        .ensure_adoption_for_payment(&reference_no)
        .await
    {
        Ok(outcome) => Json(reconciliation_dto(&reference_no, outcome)).into_response(),
        Err(err) => {
            error!(%reference_no, error = ?err, "admin router: reconcile failed");
            AppError::from(err).into_response()
        }
    }
}

pub async fn create_package(
    State(state): State<AdminState>,
    auth: AuthUser,
    Json(request): Json<CreatePackageRequest>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state.catalog.create_package(request).await {
        Ok(package) => (StatusCode::CREATED, Json(package)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_package(
    State(state): State<AdminState>,
    auth: AuthUser,
    Path(package_id): Path<i32>,
    Json(request): Json<UpdatePackageRequest>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state.catalog.update_package(package_id, request).await {
        Ok(package) => Json(package).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn create_location(
    State(state): State<AdminState>,
    auth: AuthUser,
    Json(request): Json<CreateLocationRequest>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state.catalog.create_location(request).await {
        Ok(location) => (StatusCode::CREATED, Json(location)).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn update_location(
    State(state): State<AdminState>,
    auth: AuthUser,
    Path(location_id): Path<i32>,
    Json(request): Json<UpdateLocationRequest>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state.catalog.update_location(location_id, request).await {
        Ok(location) => Json(location).into_response(),
        Err(err) => AppError::from(err).into_response(),
    }
}

pub async fn regenerate_timeline(
    State(state): State<AdminState>,
    auth: AuthUser,
    Path(plant_id): Path<i32>,
) -> impl IntoResponse {
    if let Err(err) = require_admin(&state, &auth) {
        return err.into_response();
    }

    match state.growth.regenerate_timeline(plant_id).await {
        Ok(records) => Json(TimelineResponse { plant_id, records }).into_response(),
        Err(err) => {
            error!(plant_id, error = ?err, "admin router: timeline regeneration failed");
            AppError::from(err).into_response()
        }
    }
}
