use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, bail};

const PLACEHOLDER_SECRETS: &[&str] = &[
    "change-me-to-a-random-string",
    "dev-secret-change-me",
];

const DEFAULT_DB_PATH: &str = "agora.db";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;

/// Process configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub jwt_secret: String,
    pub db_path: PathBuf,
    pub host: String,
    pub port: u16,
    pub token_ttl_hours: i64,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let jwt_secret = lookup("AGORA_JWT_SECRET").unwrap_or_default();
        if jwt_secret.is_empty() || PLACEHOLDER_SECRETS.contains(&jwt_secret.as_str()) {
            bail!("AGORA_JWT_SECRET is unset or still a placeholder; set it in your .env file");
        }

        let db_path = lookup("AGORA_DB_PATH")
            .unwrap_or_else(|| DEFAULT_DB_PATH.into())
            .into();
        let host = lookup("AGORA_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let port = match lookup("AGORA_PORT") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("AGORA_PORT is not a port number: {raw:?}"))?,
            None => DEFAULT_PORT,
        };
        let token_ttl_hours = match lookup("AGORA_TOKEN_TTL_HOURS") {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("AGORA_TOKEN_TTL_HOURS is not a number: {raw:?}"))?,
            None => agora_api::token::DEFAULT_TTL_HOURS,
        };
        if token_ttl_hours <= 0 {
            bail!("AGORA_TOKEN_TTL_HOURS must be positive, got {token_ttl_hours}");
        }

        Ok(Self {
            jwt_secret,
            db_path,
            host,
            port,
            token_ttl_hours,
        })
    }

    pub fn addr(&self) -> anyhow::Result<SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .with_context(|| format!("invalid listen address {}:{}", self.host, self.port))
    }
}
