use std::time::Duration;

use adoption_core::payments::toyyibpay_client::ToyyibPayConfig;
use url::Url;

#[derive(Debug, Clone)]
pub struct DotEnvyConfig {
    pub backend_server: BackendServer,
    pub database: Database,
    pub auth: Auth,
    pub admin: Admin,
    pub toyyibpay: ToyyibPay,
}

#[derive(Debug, Clone)]
pub struct BackendServer {
    pub port: u16,
    /// MiB.
    pub body_limit: u64,
    /// Seconds.
    pub timeout: u64,
}

#[derive(Debug, Clone)]
pub struct Database {
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct Auth {
    pub jwt_secret: String,
}

#[derive(Debug, Clone)]
pub struct Admin {
    pub emails: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ToyyibPay {
    pub base_url: String,
    pub secret_key: String,
    pub category_code: String,
    pub return_url: String,
    pub callback_url: String,
    pub timeout: Duration,
}

impl ToyyibPay {
    pub fn client_config(&self) -> anyhow::Result<ToyyibPayConfig> {
        Ok(ToyyibPayConfig {
            base_url: Url::parse(&self.base_url)
                .map_err(|err| anyhow::anyhow!("TOYYIBPAY_BASE_URL is invalid: {}", err))?,
            secret_key: self.secret_key.clone(),
            category_code: self.category_code.clone(),
            return_url: self.return_url.clone(),
            callback_url: self.callback_url.clone(),
            timeout: self.timeout,
        })
    }
}
