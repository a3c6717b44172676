use std::env;
use std::path::PathBuf;

const DEFAULT_BACKLOG_PATH: &str = "Query2_OPV20.csv";

/// Settings read from the environment (and an optional `.env` file).
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub backlog_path: PathBuf,
    pub log_level: String,
    pub top_limit: usize,
}

impl AppConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let backlog_path = env::var("BACKLOG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_BACKLOG_PATH));
        let log_level = env::var("BACKLOG_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
        let top_limit = match env::var("BACKLOG_TOP_LIMIT") {
            Ok(raw) => parse_limit(&raw)?,
            Err(_) => 10,
        };

        Ok(Self {
            backlog_path,
            log_level,
            top_limit,
        })
    }
}

fn parse_limit(raw: &str) -> Result<usize, ConfigError> {
    match raw.trim().parse::<usize>() {
        Ok(limit) if limit > 0 => Ok(limit),
        _ => Err(ConfigError::InvalidLimit(raw.to_string())),
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("BACKLOG_TOP_LIMIT must be a positive integer, got '{0}'")]
    InvalidLimit(String),
}
