//! Configuration loading
//!
//! Resolution priority for every setting:
//! 1. Command-line argument (clap, with env fallback)
//! 2. TOML config file (`<config dir>/brewlog/config.toml`)
//! 3. Compiled default

use std::path::PathBuf;

use clap::Parser;

const DEFAULT_BIND: &str = "127.0.0.1:5800";
const DEFAULT_SESSION_TTL_DAYS: i64 = 30;

/// Command-line arguments
#[derive(Debug, Default, Parser)]
#[command(name = "brewlog-api", about = "Coffee tasting logbook REST backend", version)]
pub struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, env = "BREWLOG_BIND")]
    pub bind: Option<String>,

    /// Path to the SQLite database file
    #[arg(long, env = "BREWLOG_DATABASE")]
    pub database: Option<PathBuf>,

    /// Session lifetime in days
    #[arg(long, env = "BREWLOG_SESSION_TTL_DAYS")]
    pub session_ttl_days: Option<i64>,
}

/// Resolved runtime configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub database_path: PathBuf,
    pub session_ttl_days: i64,
}

impl Config {
    /// Resolve the configuration from CLI args, config file and defaults
    pub fn resolve(cli: &Cli) -> Config {
        let file = load_config_file();

        let bind_addr = cli
            .bind
            .clone()
            .or_else(|| file_str(&file, "bind"))
            .unwrap_or_else(|| DEFAULT_BIND.to_string());

        let database_path = cli
            .database
            .clone()
            .or_else(|| file_str(&file, "database").map(PathBuf::from))
            .unwrap_or_else(default_database_path);

        let session_ttl_days = cli
            .session_ttl_days
            .or_else(|| file_int(&file, "session_ttl_days"))
            .unwrap_or(DEFAULT_SESSION_TTL_DAYS);

        Config {
            bind_addr,
            database_path,
            session_ttl_days,
        }
    }
}

fn load_config_file() -> Option<toml::Value> {
    let path = dirs::config_dir()?.join("brewlog").join("config.toml");
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

fn file_str(file: &Option<toml::Value>, key: &str) -> Option<String> {
    file.as_ref()?.get(key)?.as_str().map(|s| s.to_string())
}

fn file_int(file: &Option<toml::Value>, key: &str) -> Option<i64> {
    file.as_ref()?.get(key)?.as_integer()
}

fn default_database_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("brewlog")
        .join("brewlog.db")
}
