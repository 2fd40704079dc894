use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};
use std::net::SocketAddr;

pub const LISTEN_ADDR_ENV: &str = "TINYPASTE_LISTEN_ADDR";
pub const STORAGE_BACKEND_ENV: &str = "TINYPASTE_STORAGE_BACKEND";
pub const MYSQL_DSN_ENV: &str = "TINYPASTE_MYSQL_DSN";
pub const RATE_LIMIT_ENV: &str = "GLOBAL_RATELIMIT";
pub const RATE_WINDOW_ENV: &str = "TINYPASTE_RATE_WINDOW_SECS";
pub const SWEEP_INTERVAL_ENV: &str = "TINYPASTE_SWEEP_INTERVAL_SECS";
pub const SECRET_MAX_ATTEMPTS_ENV: &str = "TINYPASTE_SECRET_MAX_ATTEMPTS";
pub const LOG_FORMAT_ENV: &str = "TINYPASTE_LOG_FORMAT";

pub const DEFAULT_LISTEN_ADDR: &str = "127.0.0.1:8080";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StorageBackendArg {
    #[value(name = "in-memory")]
    InMemory,
    #[value(name = "mysql")]
    Mysql,
}

impl Display for StorageBackendArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            StorageBackendArg::InMemory => write!(f, "in-memory"),
            StorageBackendArg::Mysql => write!(f, "mysql"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    Text,
    Json,
}

#[derive(Debug, Parser)]
#[command(name = "tinypaste")]
pub struct CLI {
    #[arg(long, env = LISTEN_ADDR_ENV, default_value = DEFAULT_LISTEN_ADDR)]
    pub listen_addr: SocketAddr,

    #[arg(
        long,
        env = STORAGE_BACKEND_ENV,
        value_enum,
        default_value_t = StorageBackendArg::InMemory
    )]
    pub storage: StorageBackendArg,

    #[arg(long, env = MYSQL_DSN_ENV, required_if_eq("storage", "mysql"))]
    pub mysql_dsn: Option<String>,

    /// Requests admitted per client within one window.
    #[arg(long, env = RATE_LIMIT_ENV, default_value_t = 20)]
    pub rate_limit: u32,

    #[arg(long, env = RATE_WINDOW_ENV, default_value_t = 3600)]
    pub rate_window_secs: u64,

    /// Seconds between sweeps of idle rate-limit windows. 0 disables sweeping.
    #[arg(long, env = SWEEP_INTERVAL_ENV, default_value_t = 0)]
    pub sweep_interval_secs: u64,

    #[arg(long, env = SECRET_MAX_ATTEMPTS_ENV, default_value_t = 1000)]
    pub secret_max_attempts: u32,

    #[arg(long, env = LOG_FORMAT_ENV, value_enum, default_value_t = LogFormatArg::Text)]
    pub log_format: LogFormatArg,
}
