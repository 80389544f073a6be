use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Interface the HTTP server binds to
    pub host: String,

    /// Port the HTTP server binds to
    pub port: u16,

    /// File holding the ids of every posting already reported as new
    pub seen_store_path: PathBuf,

    /// Optional TOML file with the company registry.
    /// When unset the built-in registry is used.
    pub companies_file: Option<PathBuf>,

    /// Upper bound on a single upstream board call
    pub fetch_timeout: Duration,

    /// Maximum number of board calls in flight during one check
    pub max_concurrent_fetches: usize,

    pub boards: BoardEndpoints,

    /// Directory for the rolling log files
    pub log_dir: String,
}

/// Base URLs of the upstream board APIs
#[derive(Clone, Debug)]
pub struct BoardEndpoints {
    /// Greenhouse listing API, `{base}/{board_id}/jobs`
    pub greenhouse_api: String,
    /// Public Greenhouse board host, used to absolutize relative apply links
    pub greenhouse_board: String,
    /// Lever postings API, `{base}/{company_id}`
    pub lever_api: String,
}

impl Default for BoardEndpoints {
    fn default() -> Self {
        Self {
            greenhouse_api: "https://boards-api.greenhouse.io/v1/boards".to_string(),
            greenhouse_board: "https://boards.greenhouse.io".to_string(),
            lever_api: "https://api.lever.co/v0/postings".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Optional environment variables:
    /// - HOST: bind address (default: 127.0.0.1)
    /// - PORT: bind port (default: 8000)
    /// - SEEN_STORE_PATH: seen-set file (default: seen.json)
    /// - COMPANIES_FILE: TOML company registry (default: built-in registry)
    /// - FETCH_TIMEOUT_SECS: per-company upstream timeout (default: 10)
    /// - MAX_CONCURRENT_FETCHES: in-flight board calls per check (default: 4)
    /// - GREENHOUSE_API_BASE, GREENHOUSE_BOARD_BASE, LEVER_API_BASE: upstream endpoints
    /// - LOG_DIR: log directory (default: logs)
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if it exists
        dotenv::dotenv().ok();

        let defaults = BoardEndpoints::default();
        let boards = BoardEndpoints {
            greenhouse_api: var_or("GREENHOUSE_API_BASE", defaults.greenhouse_api),
            greenhouse_board: var_or("GREENHOUSE_BOARD_BASE", defaults.greenhouse_board),
            lever_api: var_or("LEVER_API_BASE", defaults.lever_api),
        };

        let max_concurrent_fetches = parse_or("MAX_CONCURRENT_FETCHES", 4usize)?;
        if max_concurrent_fetches == 0 {
            return Err(ConfigError::Invalid {
                name: "MAX_CONCURRENT_FETCHES",
                value: "0".to_string(),
            });
        }

        Ok(Config {
            host: var_or("HOST", "127.0.0.1".to_string()),
            port: parse_or("PORT", 8000u16)?,
            seen_store_path: PathBuf::from(var_or("SEEN_STORE_PATH", "seen.json".to_string())),
            companies_file: env::var("COMPANIES_FILE").ok().map(PathBuf::from),
            fetch_timeout: Duration::from_secs(parse_or("FETCH_TIMEOUT_SECS", 10u64)?),
            max_concurrent_fetches,
            boards,
            log_dir: var_or("LOG_DIR", "logs".to_string()),
        })
    }
}

fn var_or(name: &str, default: String) -> String {
    env::var(name).unwrap_or(default)
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::Invalid { name, value }),
        Err(_) => Ok(default),
    }
}
