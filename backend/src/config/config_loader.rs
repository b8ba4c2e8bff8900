use std::time::Duration;

use anyhow::{Context, Result};

use crate::config::{
    config_model::{Admin, Auth, BackendServer, Database, DotEnvyConfig, ToyyibPay},
    stage::Stage,
};

pub fn load() -> Result<DotEnvyConfig> {
    dotenvy::dotenv().ok();

    let backend_server = BackendServer {
        port: std::env::var("SERVER_PORT_BACKEND")
            .expect("SERVER_PORT_BACKEND is invalid")
            .parse()?,
        body_limit: std::env::var("SERVER_BODY_LIMIT")
            .expect("SERVER_BODY_LIMIT is invalid")
            .parse()?,
        timeout: std::env::var("SERVER_TIMEOUT")
            .expect("SERVER_TIMEOUT is invalid")
            .parse()?,
    };

    let database = load_database()?;

    let auth = get_auth_secret()?;

    let admin = Admin {
        emails: parse_email_list(&std::env::var("ADMIN_EMAILS").unwrap_or_default()),
    };

    let toyyibpay = load_toyyibpay()?;

    Ok(DotEnvyConfig {
        backend_server,
        database,
        auth,
        admin,
        toyyibpay,
    })
}

pub fn load_database() -> Result<Database> {
    dotenvy::dotenv().ok();

    Ok(Database {
        url: std::env::var("DATABASE_URL").expect("DATABASE_URL is invalid"),
    })
}

pub fn load_toyyibpay() -> Result<ToyyibPay> {
    dotenvy::dotenv().ok();

    let timeout_secs: u64 = std::env::var("TOYYIBPAY_TIMEOUT_SECS")
        .unwrap_or_else(|_| "15".to_string())
        .parse()
        .context("TOYYIBPAY_TIMEOUT_SECS is invalid")?;

    Ok(ToyyibPay {
        base_url: std::env::var("TOYYIBPAY_BASE_URL")
            .unwrap_or_else(|_| "https://toyyibpay.com".to_string()),
        secret_key: std::env::var("TOYYIBPAY_SECRET_KEY")
            .expect("TOYYIBPAY_SECRET_KEY is invalid"),
        category_code: std::env::var("TOYYIBPAY_CATEGORY_CODE")
            .expect("TOYYIBPAY_CATEGORY_CODE is invalid"),
        return_url: std::env::var("TOYYIBPAY_RETURN_URL")
            .expect("TOYYIBPAY_RETURN_URL is invalid"),
        callback_url: std::env::var("TOYYIBPAY_CALLBACK_URL")
            .expect("TOYYIBPAY_CALLBACK_URL is invalid"),
        timeout: Duration::from_secs(timeout_secs),
    })
}

pub fn get_stage() -> Stage {
    dotenvy::dotenv().ok();

    let stage_str = std::env::var("STAGE").unwrap_or("".to_string());
    Stage::try_from(&stage_str).unwrap_or_default()
}

/// Read on every token check, so a missing secret is an error rather than a panic.
pub fn get_auth_secret() -> Result<Auth> {
    dotenvy::dotenv().ok();

    Ok(Auth {
        jwt_secret: std::env::var("AUTH_JWT_SECRET").context("AUTH_JWT_SECRET is invalid")?,
    })
}

fn parse_email_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|email| email.trim().to_ascii_lowercase())
        .filter(|email| !email.is_empty())
        .collect()
}
