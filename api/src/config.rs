use std::env;
use std::str::FromStr;

use anyhow::Context;

use crate::app::AccountSettings;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    /// Key for the HMAC binding sessions to password hashes
    pub secret_key: String,
    pub session_ttl_seconds: i64,
    pub password_min_length: usize,
    /// Seconds for one signup/login request to replenish per IP; 0 disables the limiter
    pub auth_rate_limit_replenish_seconds: u64,
    pub auth_rate_limit_burst: u32,
    /// Run the bundled `CREATE TABLE IF NOT EXISTS` schema at startup
    pub apply_schema: bool,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        Ok(Self {
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            port: parse_var("PORT", 8080)?,
            secret_key: env::var("SECRET_KEY")
                .unwrap_or_else(|_| "dev-secret-key-not-for-production".to_string()),
            session_ttl_seconds: parse_var("SESSION_TTL_SECONDS", 60 * 60 * 24 * 14)?,
            password_min_length: parse_var("PASSWORD_MIN_LENGTH", 8)?,
            auth_rate_limit_replenish_seconds: parse_var("AUTH_RATE_LIMIT_REPLENISH_SECONDS", 2)?,
            auth_rate_limit_burst: parse_var("AUTH_RATE_LIMIT_BURST", 5)?,
            apply_schema: parse_var("APPLY_SCHEMA", true)?,
        })
    }

    pub fn account_settings(&self) -> AccountSettings {
        AccountSettings {
            secret_key: self.secret_key.clone(),
            session_ttl: chrono::Duration::seconds(self.session_ttl_seconds),
            password_min_length: self.password_min_length,
        }
    }

    /// Whether signup and login go through the per-IP rate limiter
    pub fn auth_rate_limit_enabled(&self) -> bool {
        self.auth_rate_limit_replenish_seconds > 0
    }
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {:?}", name, raw)),
        Err(_) => Ok(default),
    }
}
