//! Server configuration
//!
//! Built once in `main` from environment variables and passed by reference
//! into the storage adapter and the HTTP layer. Nothing else reads the
//! environment.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

/// Startup connection attempts before giving up
pub const CONNECT_ATTEMPTS: u32 = 10;

/// Pause between startup connection attempts
pub const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Listen address when `BIND_ADDRESS` is not set
pub const DEFAULT_BIND_ADDRESS: SocketAddr =
    SocketAddr::new(IpAddr::V4(Ipv4Addr::UNSPECIFIED), 5000);

/// Raw settings as read from the environment
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Connection string for PostgreSQL; selects the client/server store when set
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default = "default_database_path")]
    pub database_path: String,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_max_in_flight")]
    pub max_in_flight: usize,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_database_path() -> String {
    "todos.db".to_string()
}

fn default_bind_address() -> String {
    DEFAULT_BIND_ADDRESS.to_string()
}

fn default_max_connections() -> u32 {
    5
}

fn default_max_in_flight() -> usize {
    64
}

fn default_request_timeout_secs() -> u64 {
    30
}

impl Settings {
    /// Read settings from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_source(None)
    }

    /// Read settings from an explicit variable map instead of the process environment
    pub fn from_map(vars: HashMap<String, String>) -> Result<Self> {
        Self::from_source(Some(vars))
    }

    fn from_source(vars: Option<HashMap<String, String>>) -> Result<Self> {
        config::Config::builder()
            .add_source(
                config::Environment::default()
                    .try_parsing(true)
                    .source(vars),
            )
            .build()
            .context("Failed to read environment")?
            .try_deserialize()
            .context("Invalid configuration")
    }
}

/// Which backing store to talk to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreTarget {
    /// Embedded file-backed store
    Sqlite(PathBuf),
    /// Client/server store reached through a connection string
    Postgres(String),
}

impl fmt::Display for StoreTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // The URL may carry credentials
            StoreTarget::Postgres(_) => write!(f, "postgres (DATABASE_URL)"),
            StoreTarget::Sqlite(path) => write!(f, "sqlite ({})", path.display()),
        }
    }
}

/// Fixed-interval retry applied while opening the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: CONNECT_ATTEMPTS,
            delay: CONNECT_RETRY_DELAY,
        }
    }
}

#[derive(Debug, Clone)]
pub struct StoreConfig {
    pub target: StoreTarget,
    pub max_connections: u32,
    pub retry: RetryPolicy,
}

#[derive(Debug, Clone)]
pub struct HttpConfig {
    pub bind_address: SocketAddr,
    pub max_in_flight: usize,
    pub request_timeout: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: DEFAULT_BIND_ADDRESS,
            max_in_flight: default_max_in_flight(),
            request_timeout: Duration::from_secs(default_request_timeout_secs()),
        }
    }
}

/// Immutable process configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub http: HttpConfig,
    pub store: StoreConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn load() -> Result<Self> {
        Self::from_settings(Settings::from_env()?)
    }

    pub fn from_settings(settings: Settings) -> Result<Self> {
        let target = match settings.database_url {
            Some(url) if !url.trim().is_empty() => StoreTarget::Postgres(url.trim().to_string()),
            _ => StoreTarget::Sqlite(PathBuf::from(settings.database_path)),
        };

        let bind_address: SocketAddr = settings
            .bind_address
            .parse()
            .with_context(|| format!("Failed to parse bind address: {}", settings.bind_address))?;

        if settings.max_connections == 0 {
            anyhow::bail!("MAX_CONNECTIONS must be at least 1");
        }
        if settings.max_in_flight == 0 {
            anyhow::bail!("MAX_IN_FLIGHT must be at least 1");
        }

        Ok(Self {
            http: HttpConfig {
                bind_address,
                max_in_flight: settings.max_in_flight,
                request_timeout: Duration::from_secs(settings.request_timeout_secs),
            },
            store: StoreConfig {
                target,
                max_connections: settings.max_connections,
                retry: RetryPolicy::default(),
            },
        })
    }
}
