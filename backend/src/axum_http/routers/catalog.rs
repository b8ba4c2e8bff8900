use crate::{axum_http::error_responses::AppError, usecases::catalog::CatalogUseCase};
use axum::{Json, Router, extract::State, response::IntoResponse, routing::get};
use std::sync::Arc;
use tracing::error;

pub fn routes(catalog_usecase: Arc<CatalogUseCase>) -> Router {
    Router::new()
        .route("/packages", get(list_packages))
        .route("/locations", get(list_locations))
        .with_state(catalog_usecase)
}

pub async fn list_packages(State(usecase): State<Arc<CatalogUseCase>>) -> impl IntoResponse {
    match usecase.list_packages().await {
        Ok(packages) => Json(packages).into_response(),
        Err(err) => {
            error!(error = ?err, "catalog router: failed to list packages");
            AppError::from(err).into_response()
        }
    }
}

pub async fn list_locations(State(usecase): State<Arc<CatalogUseCase>>) -> impl IntoResponse {
    match usecase.list_locations().await {
        Ok(locations) => Json(locations).into_response(),
        Err(err) => {
            error!(error = ?err, "catalog router: failed to list locations");
            AppError::from(err).into_response()
        }
    }
}
