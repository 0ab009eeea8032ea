// src/config.rs
use std::env;
use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{key}='{value}': {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: String,
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    /// Base URL of another instance whose pipeline the board should drive.
    /// `None` means the board works on the local database.
    pub lead_api_url: Option<String>,
}

impl AppConfig {
    /// Read settings from the environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Some(e) = dotenv_problem(dotenvy::dotenv()) {
            log::warn!("Ignoring unreadable .env file: {e}");
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let db_path = lookup("MIMI_DB_PATH").unwrap_or_else(|| "mimi_crm.sqlite3".to_string());

        let bind_raw = lookup("MIMI_BIND_ADDR").unwrap_or_else(|| "127.0.0.1:3000".to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "MIMI_BIND_ADDR",
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let max_workers = match lookup("MIMI_MAX_WORKERS") {
            Some(raw) => raw
                .parse::<usize>()
                .ok()
                .filter(|n| *n > 0)
                .ok_or_else(|| ConfigError::Invalid {
                    key: "MIMI_MAX_WORKERS",
                    value: raw.clone(),
                    reason: "not a positive number".into(),
                })?,
            None => 8,
        };

        let lead_api_url = match lookup("MIMI_LEAD_API_URL").filter(|s| !s.trim().is_empty()) {
            Some(raw) => {
                let url = Url::parse(raw.trim()).map_err(|e| ConfigError::Invalid {
                    key: "MIMI_LEAD_API_URL",
                    value: raw.clone(),
                    reason: e.to_string(),
                })?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(ConfigError::Invalid {
                        key: "MIMI_LEAD_API_URL",
                        value: raw,
                        reason: "expected an http(s) URL".into(),
                    });
                }
                Some(url.as_str().trim_end_matches('/').to_string())
            }
            None => None,
        };

        Ok(Self {
            db_path,
            bind_addr,
            max_workers,
            lead_api_url,
        })
    }
}

/// A missing `.env` is normal; anything else is worth a warning.
fn dotenv_problem<T>(result: dotenvy::Result<T>) -> Option<dotenvy::Error> {
    match result {
        Ok(_) => None,
        Err(e) if e.not_found() => None,
        Err(e) => Some(e),
    }
}
