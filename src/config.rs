/*!
 * Score keeper config file
 */

use std::path::Path;

use serde_derive::{Deserialize, Serialize};

/// Overrides `db-config.database-url` when set
pub const DATABASE_URL_ENV: &str = "SCORE_KEEPER_DATABASE_URL";

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct Config {
    pub db_config: DbConfig,
    pub tracing_config: Option<TracingConfig>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct DbConfig {
    /// Path of the SQLite database file
    pub database_url: String,

    /// Maximum number of pooled connections
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,

    /// How long, in milliseconds, a writer waits for the database lock
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,

    /// Rows per page on listings
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

impl DbConfig {
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            pool_size: default_pool_size(),
            busy_timeout_ms: default_busy_timeout_ms(),
            page_size: default_page_size(),
        }
    }
}

fn default_pool_size() -> u32 {
    4
}

fn default_busy_timeout_ms() -> u64 {
    5000
}

fn default_page_size() -> i64 {
    20
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "kebab-case")]
pub struct TracingConfig {
    /// Jaeger agent endpoint, `host:port`
    pub jaeger: Option<String>,
}

pub fn parse_config(content: &str) -> Result<Config, toml::de::Error> {
    toml::from_str(content)
}

pub fn load_config(path: impl AsRef<Path>) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = parse_config(&std::fs::read_to_string(path)?)?;
    if let Ok(url) = std::env::var(DATABASE_URL_ENV) {
        config.db_config.database_url = url;
    }
    Ok(config)
}
