use std::sync::Arc;

use axum::{
    Json, Router,
    extract::State,
    http::{HeaderMap, StatusCode, header::AUTHORIZATION},
    response::{IntoResponse, Response},
    routing::post,
};
use tracing::info;

use crate::services::reconcile_loop::ReconcileLoop;

// Run example
//   curl -X POST "http://localhost:$SERVER_PORT_WORKER/internal/v1/reconcile/run" \
//     -H "Authorization: Bearer $INTERNAL_RECONCILE_TOKEN"

#[derive(Clone)]
pub struct ReconcileRouteState {
    internal_token: Option<String>,
    reconcile_loop: Arc<ReconcileLoop>,
}

pub fn routes(internal_token: Option<String>, reconcile_loop: Arc<ReconcileLoop>) -> Router {
    Router::new()
        .route("/run", post(run_reconcile_pass))
        .with_state(ReconcileRouteState {
            internal_token,
            reconcile_loop,
        })
}

pub async fn run_reconcile_pass(
    State(state): State<ReconcileRouteState>,
    headers: HeaderMap,
) -> Response {
    let expected_token = match state.internal_token.as_deref() {
        Some(token) => token,
        None => {
            return (
                StatusCode::SERVICE_UNAVAILABLE,
                "reconcile token is not configured",
            )
                .into_response();
        }
    };

    if let Err(status) = authorize_bearer(&headers, expected_token) {
        return (status, "unauthorized").into_response();
    }

    info!("reconcile: manual pass requested");
    Json(state.reconcile_loop.run_once().await).into_response()
}

fn authorize_bearer(headers: &HeaderMap, expected_token: &str) -> Result<(), StatusCode> {
    let auth = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let token = auth
        .strip_prefix("Bearer ")
        .ok_or(StatusCode::UNAUTHORIZED)?;

    if token == expected_token {
        Ok(())
    } else {
        Err(StatusCode::UNAUTHORIZED)
    }
}
