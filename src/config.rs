// Environment-driven settings and the postgres pool.
use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod, Runtime};
use tokio_postgres::NoTls;

const DEFAULT_BASE_URL: &str = "http://localhost:4444";
const DEFAULT_PORT: u16 = 4444;
const DEFAULT_ALLOWED_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_POOL_MAX_SIZE: usize = 16;
pub const DEFAULT_MAX_BODY_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub base_url: String,
    pub http_port: u16,
    pub allowed_origins: Vec<String>,
    /// `None` disables the per-request deadline.
    pub request_timeout: Option<Duration>,
    /// Largest request body accepted by POST and PUT routes.
    pub max_body_bytes: usize,
    pub database: DatabaseSettings,
}

/// Connection settings. `url` wins over the discrete fields when present.
#[derive(Debug, Clone, Default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dbname: Option<String>,
    pub schema: Option<String>,
    pub pool_max_size: usize,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from an arbitrary key lookup so tests don't have to
    /// touch the process environment.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let http_port = match get("PORT") {
            Some(raw) => raw
                .parse::<u16>()
                .with_context(|| format!("PORT must be a port number, got `{raw}`"))?,
            None => DEFAULT_PORT,
        };

        let timeout_secs = match get("REQUEST_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().with_context(|| {
                format!("REQUEST_TIMEOUT_SECS must be a number of seconds, got `{raw}`")
            })?,
            None => DEFAULT_REQUEST_TIMEOUT_SECS,
        };
        let request_timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));

        let max_body_bytes = match get("MAX_BODY_BYTES") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("MAX_BODY_BYTES must be a number of bytes, got `{raw}`"))?,
            None => DEFAULT_MAX_BODY_BYTES,
        };

        let allowed_origins = get("ALLOWED_ORIGINS")
            .unwrap_or_else(|| DEFAULT_ALLOWED_ORIGINS.to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let port = match get("POSTGRES_DB_PORT") {
            Some(raw) => Some(
                raw.parse::<u16>()
                    .with_context(|| format!("POSTGRES_DB_PORT must be a port number, got `{raw}`"))?,
            ),
            None => None,
        };

        let pool_max_size = match get("PG_POOL_MAX_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .with_context(|| format!("PG_POOL_MAX_SIZE must be a positive integer, got `{raw}`"))?,
            None => DEFAULT_POOL_MAX_SIZE,
        };
        if pool_max_size == 0 {
            anyhow::bail!("PG_POOL_MAX_SIZE must be greater than zero");
        }

        Ok(Self {
            base_url: get("BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            http_port,
            allowed_origins,
            request_timeout,
            max_body_bytes,
            database: DatabaseSettings {
                url: get("DATABASE_URL"),
                host: get("POSTGRES_DB_HOST"),
                port,
                user: get("POSTGRES_USER"),
                password: lookup("POSTGRES_PASSWORD"),
                dbname: get("POSTGRES_DB_NAME"),
                schema: get("POSTGRES_SCHEMA"),
                pool_max_size,
            },
        })
    }
}

/// Translates settings into a driver config. A connection string (as set by
/// most hosting platforms) takes precedence over the discrete fields.
pub fn pg_config(settings: &DatabaseSettings) -> Result<tokio_postgres::Config> {
    let mut cfg = match &settings.url {
        Some(url) => url
            .parse::<tokio_postgres::Config>()
            .context("DATABASE_URL is not a valid postgres connection string")?,
        None => {
            let mut cfg = tokio_postgres::Config::new();
            cfg.host(settings.host.as_deref().context("POSTGRES_DB_HOST not set")?);
            cfg.user(settings.user.as_deref().context("POSTGRES_USER not set")?);
            cfg.dbname(settings.dbname.as_deref().context("POSTGRES_DB_NAME not set")?);
            if let Some(password) = &settings.password {
                cfg.password(password);
            }
            if let Some(port) = settings.port {
                cfg.port(port);
            }
            cfg
        }
    };

    if let Some(schema) = &settings.schema {
        cfg.options(&format!("-c search_path={schema}"));
    }
    Ok(cfg)
}

/// Creates the pool. No connection is opened until the first checkout.
pub fn get_pg_pool(settings: &DatabaseSettings) -> Result<Pool> {
    let manager = Manager::from_config(
        pg_config(settings)?,
        NoTls,
        ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        },
    );

    Pool::builder(manager)
        .max_size(settings.pool_max_size)
        .runtime(Runtime::Tokio1)
        .build()
        .context("failed to create postgres pool")
}
