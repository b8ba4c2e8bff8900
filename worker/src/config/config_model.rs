use backend::config::config_model::{Database, ToyyibPay};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub worker_server: WorkerServer,
    pub database: Database,
    pub toyyibpay: ToyyibPay,
    pub reconcile: Reconcile,
}

#[derive(Debug, Clone)]
pub struct WorkerServer {
    pub port: u16,
    pub timeout: u64,
    pub body_limit: u64,
}

#[derive(Debug, Clone)]
pub struct Reconcile {
    /// Pause between two reconciliation passes.
    pub interval: Duration,
    /// Pending payments younger than this are left to the callback.
    pub pending_min_age: Duration,
    pub batch_size: i64,
    pub internal_token: Option<String>,
}
