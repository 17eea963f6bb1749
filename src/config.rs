use anyhow::{Context, Result};
use dotenvy::dotenv;
use std::env;
use std::str::FromStr;

#[derive(Clone)]
pub struct Config {
    pub server_addr: String,

    // Backing files
    pub employee_data_path: String,
    pub requests_path: String,
    pub audit_log_path: String,

    pub log_dir: String,
    pub api_prefix: String,
    pub budget_currency: String,

    // Rate limiting
    pub rate_submit_per_min: u32,
    pub rate_admin_per_min: u32,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: var_or("SERVER_ADDR", "127.0.0.1:8080"),

            employee_data_path: var_or("EMPLOYEE_DATA_PATH", "employee_data.csv"),
            requests_path: var_or("REQUESTS_PATH", "requests.csv"),
            audit_log_path: var_or("AUDIT_LOG_PATH", "request_audit.csv"),

            log_dir: var_or("LOG_DIR", "logs"),
            api_prefix: var_or("API_PREFIX", "/api"),
            budget_currency: var_or("BUDGET_CURRENCY", "MYR"),

            rate_submit_per_min: parse_or("RATE_SUBMIT_PER_MIN", 30)?,
            rate_admin_per_min: parse_or("RATE_ADMIN_PER_MIN", 600)?,
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_or<T>(key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{key} must be a number, got {raw:?}")),
        Err(_) => Ok(default),
    }
}

#[cfg(test)]
impl Config {
    /// Defaults with the three data files placed under `dir`.
    pub fn for_dir(dir: &std::path::Path) -> Self {
        let path = |name: &str| dir.join(name).display().to_string();
        Self {
            server_addr: "127.0.0.1:0".to_string(),
            employee_data_path: path("employee_data.csv"),
            requests_path: path("requests.csv"),
            audit_log_path: path("request_audit.csv"),
            log_dir: path("logs"),
            api_prefix: "/api".to_string(),
            budget_currency: "MYR".to_string(),
            rate_submit_per_min: 1000,
            rate_admin_per_min: 1000,
        }
    }
}
