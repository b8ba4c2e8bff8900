use std::time::Duration;

use super::config_model::{DotEnvyConfig, Reconcile, WorkerServer};
use anyhow::{Context, Result};
use backend::config::{config_loader as backend_config, stage::Stage};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let worker_server = WorkerServer {
        port: std::env::var("SERVER_PORT_WORKER")
            .expect("SERVER_PORT_WORKER is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = backend_config::load_database()?;
    let toyyibpay = backend_config::load_toyyibpay()?;
    let reconcile = load_reconcile()?;

    Ok(DotEnvyConfig {
        worker_server,
        database,
        toyyibpay,
        reconcile,
    })
}

pub fn load_reconcile() -> Result<Reconcile> {
    let interval_secs: u64 = std::env::var("RECONCILE_INTERVAL_SECS")
        .unwrap_or_else(|_| "60".to_string())
        .parse()
        .context("RECONCILE_INTERVAL_SECS is invalid")?;
    let pending_min_age_secs: u64 = std::env::var("RECONCILE_PENDING_MIN_AGE_SECS")
        .unwrap_or_else(|_| "120".to_string())
        .parse()
        .context("RECONCILE_PENDING_MIN_AGE_SECS is invalid")?;
    let batch_size: i64 = std::env::var("RECONCILE_BATCH_SIZE")
        .unwrap_or_else(|_| "50".to_string())
        .parse()
        .context("RECONCILE_BATCH_SIZE is invalid")?;
    if batch_size <= 0 {
        anyhow::bail!("RECONCILE_BATCH_SIZE must be positive");
    }

    Ok(Reconcile {
        interval: Duration::from_secs(interval_secs.max(1)),
        pending_min_age: Duration::from_secs(pending_min_age_secs),
        batch_size,
        internal_token: std::env::var("INTERNAL_RECONCILE_TOKEN").ok().and_then(|v| {
            let trimmed = v.trim().to_string();
            (!trimmed.is_empty()).then_some(trimmed)
        }),
    })
}

pub fn get_stage() -> Stage {
    backend_config::get_stage()
}
