use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::{adoptions::AdoptionUseCase, growth::GrowthUseCase},
};
use axum::{
    Json, Router,
    extract::{Path, State},
    response::IntoResponse,
    routing::get,
};
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AdoptionsState {
    pub adoptions: Arc<AdoptionUseCase>,
    pub growth: Arc<GrowthUseCase>,
}

pub fn routes(state: AdoptionsState) -> Router {
    Router::new()
        .route("/", get(list_my_adoptions))
        .route("/:id/growth", get(adoption_growth))
        .with_state(state)
}

pub async fn list_my_adoptions(
    State(state): State<AdoptionsState>,
    AuthUser { clerk_id, .. }: AuthUser,
) -> impl IntoResponse {
    match state.adoptions.list_for_user(&clerk_id).await {
        Ok(adoptions) => Json(adoptions).into_response(),
        Err(err) => {
            error!(%clerk_id, error = ?err, "adoptions router: failed to list adoptions");
            AppError::from(err).into_response()
        }
    }
}

pub async fn adoption_growth(
    State(state): State<AdoptionsState>,
    AuthUser { clerk_id, .. }: AuthUser,
    Path(adoption_id): Path<i32>,
) -> impl IntoResponse {
    info!(%clerk_id, adoption_id, "adoptions router: growth request received");
    match state.growth.growth_for_adoption(&clerk_id, adoption_id).await {
        Ok(overview) => Json(overview).into_response(),
        Err(err) => {
            error!(%clerk_id, adoption_id, error = ?err, "adoptions router: failed to load growth");
            AppError::from(err).into_response()
        }
    }
}
