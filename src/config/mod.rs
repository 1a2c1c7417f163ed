//! Configuration module for the employee directory backend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file backing the key-value store
    pub db_path: PathBuf,
    /// Key under which the employee list is stored
    pub storage_key: String,
    /// JSON file served as the static seed resource
    pub seed_file: PathBuf,
    /// URL the remote seed is fetched from
    pub seed_url: String,
    /// Whether to fetch the remote seed once at startup
    pub fetch_on_start: bool,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let db_path = env::var("EMPLOYEES_DB_PATH")
            .unwrap_or_else(|_| "./data/employees.sqlite".to_string())
            .into();

        let storage_key =
            env::var("EMPLOYEES_STORAGE_KEY").unwrap_or_else(|_| "employees".to_string());

        let seed_file = env::var("EMPLOYEES_SEED_FILE")
            .unwrap_or_else(|_| "./public/assets/employees.json".to_string())
            .into();

        let bind_addr: SocketAddr = env::var("EMPLOYEES_BIND_ADDR")
            .unwrap_or_else(|_| "127.0.0.1:8080".to_string())
            .parse()
            .map_err(|e| AppError::Config(format!("Invalid EMPLOYEES_BIND_ADDR: {}", e)))?;

        let seed_url = env::var("EMPLOYEES_SEED_URL")
            .unwrap_or_else(|_| format!("http://{}/assets/employees.json", bind_addr));

        let fetch_on_start = match env::var("EMPLOYEES_FETCH_ON_START") {
            Ok(value) => parse_flag(&value).ok_or_else(|| {
                AppError::Config(format!("Invalid EMPLOYEES_FETCH_ON_START: {}", value))
            })?,
            Err(_) => true,
        };

        let log_level = env::var("EMPLOYEES_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        Ok(Self {
            db_path,
            storage_key,
            seed_file,
            seed_url,
            fetch_on_start,
            bind_addr,
            log_level,
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
