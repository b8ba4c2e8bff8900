use crate::{
    auth::AuthUser,
    axum_http::error_responses::AppError,
    usecases::payments::{PaymentError, PaymentUseCase},
};
use adoption_core::domain::value_objects::payments::{
    CreatePaymentRequest, GatewayCallbackForm, GatewayReturnQuery, PayerInfo,
};
use axum::{
    Form, Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use std::sync::Arc;
use tracing::{error, info, warn};

pub fn routes(payment_usecase: Arc<PaymentUseCase>) -> Router {
    Router::new()
        .route("/", post(create_payment))
        .route("/callback", post(gateway_callback))
        .route("/return", get(gateway_return))
        .route("/:reference_no/status", get(payment_status))
        .route("/:reference_no/cancel", post(cancel_payment))
        .with_state(payment_usecase)
}

/// Payer details come from the session; the request body may override the name.
pub fn payer_from(auth: &AuthUser, request: &CreatePaymentRequest) -> Result<PayerInfo, PaymentError> {
    let email = auth
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or(PaymentError::MissingEmail)?
        .to_string();

    let name = request
        .name
        .as_deref()
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| auth.name.clone())
        .unwrap_or_else(|| email.clone());

    Ok(PayerInfo {
        clerk_id: auth.clerk_id.clone(),
        name,
        email,
        phone: request.phone.clone(),
    })
}

pub async fn create_payment(
    State(usecase): State<Arc<PaymentUseCase>>,
    auth: AuthUser,
    Json(request): Json<CreatePaymentRequest>,
) -> impl IntoResponse {
    info!(
        clerk_id = %auth.clerk_id,
        package = %request.package,
        location = %request.location,
        "payments router: create payment request received"
    );

    let payer = match payer_from(&auth, &request) {
        Ok(payer) => payer,
        Err(err) => return AppError::from(err).into_response(),
    };

    match usecase
        .create_payment(payer, &request.package, &request.location)
        .await
    {
        Ok(created) => (StatusCode::CREATED, Json(created)).into_response(),
        Err(err) => {
            error!(clerk_id = %auth.clerk_id, error = ?err, "payments router: failed to create payment");
            AppError::from(err).into_response()
        }
    }
}

pub async fn payment_status(
    State(usecase): State<Arc<PaymentUseCase>>,
    AuthUser { clerk_id, .. }: AuthUser,
    Path(reference_no): Path<String>,
) -> impl IntoResponse {
    match usecase.poll_status(&clerk_id, &reference_no).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => {
            warn!(%clerk_id, %reference_no, error = %err, "payments router: status poll rejected");
            AppError::from(err).into_response()
        }
    }
}

pub async fn cancel_payment(
    State(usecase): State<Arc<PaymentUseCase>>,
    AuthUser { clerk_id, .. }: AuthUser,
    Path(reference_no): Path<String>,
) -> impl IntoResponse {
    match usecase.cancel_payment(&clerk_id, &reference_no).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => {
            warn!(%clerk_id, %reference_no, error = %err, "payments router: cancel rejected");
            AppError::from(err).into_response()
        }
    }
}

/// Server-to-server notification from the gateway. Unauthenticated.
pub async fn gateway_callback(
    State(usecase): State<Arc<PaymentUseCase>>,
    Form(form): Form<GatewayCallbackForm>,
) -> impl IntoResponse {
    let reference_no = form.order_id.clone();
    match usecase.handle_callback(form).await {
        Ok(status) => {
            info!(%reference_no, status = %status.status, "payments router: callback processed");
            (StatusCode::OK, "OK").into_response()
        }
        Err(err) => {
            warn!(%reference_no, error = %err, "payments router: callback not processed");
            AppError::from(err).into_response()
        }
    }
}

pub async fn gateway_return(
    State(usecase): State<Arc<PaymentUseCase>>,
    Query(query): Query<GatewayReturnQuery>,
) -> impl IntoResponse {
    let reference_no = query.order_id.clone();
    match usecase.confirm_return(query).await {
        Ok(status) => Json(status).into_response(),
        Err(err) => {
            warn!(%reference_no, error = %err, "payments router: return confirmation failed");
            AppError::from(err).into_response()
        }
    }
}
