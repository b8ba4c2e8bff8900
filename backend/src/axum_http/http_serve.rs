use crate::{
    auth::admin::EmailAllowList,
    axum_http::{
        default_routers,
        routers::{self, admin::AdminState, adoptions::AdoptionsState},
    },
    config::{config_loader, config_model::DotEnvyConfig},
    usecases::registry::UseCases,
};
use adoption_core::infra::db::postgres::postgres_connection::PgPoolSquad;
use anyhow::Result;
use axum::{
    Router,
    http::{
        Method, StatusCode,
        header::{AUTHORIZATION, CONTENT_TYPE},
    },
    routing::get,
};
use std::{net::SocketAddr, sync::Arc, time::Duration};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    limit::RequestBodyLimitLayer,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

pub fn app(config: &DotEnvyConfig, usecases: UseCases) -> Router {
    if config.admin.emails.is_empty() {
        warn!("ADMIN_EMAILS is empty, admin routes will reject every caller");
    }

    let admin_state = AdminState {
        authorizer: Arc::new(EmailAllowList::new(&config.admin.emails)),
        adoptions: Arc::clone(&usecases.adoptions),
        catalog: Arc::clone(&usecases.catalog),
        growth: Arc::clone(&usecases.growth),
        reconciliation: Arc::clone(&usecases.reconciliation),
    };
    let adoptions_state = AdoptionsState {
        adoptions: Arc::clone(&usecases.adoptions),
        growth: Arc::clone(&usecases.growth),
    };

    Router::new()
        .fallback(default_routers::not_found)
        .nest(
            "/api/v1/catalog",
            routers::catalog::routes(Arc::clone(&usecases.catalog)),
        )
        .nest(
            "/api/v1/payments",
            routers::payments::routes(Arc::clone(&usecases.payments)),
        )
        .nest("/api/v1/adoptions", routers::adoptions::routes(adoptions_state))
        .nest("/api/v1/admin", routers::admin::routes(admin_state))
        .route("/api/v1/health-check", get(default_routers::health_check))
}

/// Slow requests are answered with 408 rather than a bare 500.
pub fn request_timeout(seconds: u64) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, Duration::from_secs(seconds))
}

pub async fn start(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPoolSquad>) -> Result<()> {
    let usecases = UseCases::build(Arc::clone(&db_pool), &config.toyyibpay)?;

    let app = app(&config, usecases)
        .layer(request_timeout(config.backend_server.timeout))
        .layer(RequestBodyLimitLayer::new(
            (config.backend_server.body_limit * 1024 * 1024).try_into()?,
        ))
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PATCH])
                .allow_headers([AUTHORIZATION, CONTENT_TYPE])
                .allow_origin(Any), // TODO restrict to the frontend origin once it is configurable
        )
        .layer(TraceLayer::new_for_http());

    let addr = SocketAddr::from(([0, 0, 0, 0], config.backend_server.port));
    let listener = TcpListener::bind(addr).await?;

    info!(
        stage = %config_loader::get_stage(),
        "Server is running on port {}", config.backend_server.port
    );
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "Failed to install CTRL+C signal handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "Failed to install terminate signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received ctrl+C signal"),
        _ = terminate => info!("Received terminate signal"),
    }
}
