use adoption_core::infra::db::postgres::postgres_connection;
use anyhow::Result;
use backend::usecases::registry::UseCases;
use std::sync::Arc;
use tracing::{error, info};
use worker::{axum_http, config, services::reconcile_loop::ReconcileLoop};

#[tokio::main]
async fn main() -> Result<()> {
    if let Err(error) = run().await {
        error!("Worker exited with error: {}", error);
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<()> {
    dotenvy::dotenv().ok();
    adoption_core::observability::init_observability("worker")?;

    let dotenvy_env = Arc::new(config::config_loader::load()?);
    info!(stage = %config::config_loader::get_stage(), "ENV has been loaded");

    let postgres_pool = postgres_connection::establish_connection(&dotenvy_env.database.url)?;
    info!("Postgres connection has been established");

    let usecases = UseCases::build(Arc::new(postgres_pool), &dotenvy_env.toyyibpay)?;

    let reconcile_loop = Arc::new(ReconcileLoop::new(
        usecases.payments,
        usecases.reconciliation,
        dotenvy_env.reconcile.clone(),
    ));

    let background_loop = tokio::spawn(Arc::clone(&reconcile_loop).run());

    let server_config = Arc::clone(&dotenvy_env);
    let http_server =
        tokio::spawn(async move { axum_http::http_serve::start(server_config, reconcile_loop).await });

    tokio::select! {
        result = background_loop => result??,
        result = http_server => result??,
    };
    Ok(())
}
