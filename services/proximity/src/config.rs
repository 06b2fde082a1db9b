//! Service configuration.
//!
//! # Purpose
//! Reads listener addresses, storage backend selection, Postgres pool
//! settings, and static asset options from `PROXIMITY_*` environment
//! variables, then applies an optional YAML file named by `PROXIMITY_CONFIG`
//! on top.
//!
//! # Key invariants
//! - Database URLs are only logged through [`mask_database_url`].
//! - An explicitly named backend is never overridden by the presence of a URL.
use anyhow::{Context, Result, bail};
use serde::Deserialize;
use std::fs;
use std::net::SocketAddr;
use std::path::PathBuf;

pub const DEFAULT_BIND: &str = "0.0.0.0:8000";
pub const DEFAULT_METRICS_BIND: &str = "0.0.0.0:9090";
pub const DEFAULT_STATIC_DIR: &str = "static";
// 5 pooled connections plus 10 overflow.
pub const DEFAULT_PG_MAX_CONNECTIONS: u32 = 15;
pub const DEFAULT_PG_ACQUIRE_TIMEOUT_MS: u64 = 30_000;
pub const DEFAULT_PG_MAX_LIFETIME_SECS: u64 = 1_800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    Memory,
    Postgres,
}

impl StorageBackend {
    fn parse(value: &str) -> Result<Self> {
        match value.to_ascii_lowercase().as_str() {
            "memory" => Ok(StorageBackend::Memory),
            "postgres" | "postgresql" => Ok(StorageBackend::Postgres),
            other => bail!("unknown storage backend: {other}"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub url: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub max_lifetime_secs: u64,
    // Require TLS instead of preferring it.
    pub require_tls: bool,
}

// Service configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub bind_addr: SocketAddr,
    pub metrics_bind: SocketAddr,
    pub storage: StorageBackend,
    pub postgres: Option<PostgresConfig>,
    pub static_dir: PathBuf,
    pub cors_allow_any: bool,
}

#[derive(Debug, Deserialize)]
struct ServiceConfigOverride {
    bind_addr: Option<String>,
    metrics_bind: Option<String>,
    storage_backend: Option<String>,
    database_url: Option<String>,
    production: Option<bool>,
    pg_max_connections: Option<u32>,
    pg_acquire_timeout_ms: Option<u64>,
    pg_max_lifetime_secs: Option<u64>,
    static_dir: Option<String>,
    cors_allow_any: Option<bool>,
}

fn env_flag(key: &str) -> Option<bool> {
    std::env::var(key)
        .ok()
        .map(|value| matches!(value.to_ascii_lowercase().as_str(), "1" | "true" | "yes"))
}

fn env_number<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key)
        .ok()
        .and_then(|value| value.parse::<T>().ok())
}

fn env_storage_backend() -> Result<Option<StorageBackend>> {
    std::env::var("PROXIMITY_STORAGE_BACKEND")
        .ok()
        .map(|value| {
            StorageBackend::parse(&value).with_context(|| "parse PROXIMITY_STORAGE_BACKEND")
        })
        .transpose()
}

// Pool and TLS settings come from the environment wherever the URL came from.
fn postgres_from_env(url: String) -> PostgresConfig {
    PostgresConfig {
        url,
        max_connections: env_number::<u32>("PROXIMITY_PG_MAX_CONNECTIONS")
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_PG_MAX_CONNECTIONS),
        acquire_timeout_ms: env_number::<u64>("PROXIMITY_PG_ACQUIRE_TIMEOUT_MS")
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_PG_ACQUIRE_TIMEOUT_MS),
        max_lifetime_secs: env_number::<u64>("PROXIMITY_PG_MAX_LIFETIME_SECS")
            .filter(|value| *value > 0)
            .unwrap_or(DEFAULT_PG_MAX_LIFETIME_SECS),
        require_tls: env_flag("PROXIMITY_PRODUCTION").unwrap_or(false),
    }
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self> {
        let bind_addr = std::env::var("PROXIMITY_BIND")
            .unwrap_or_else(|_| DEFAULT_BIND.to_string())
            .parse()
            .with_context(|| "parse PROXIMITY_BIND")?;
        let metrics_bind = std::env::var("PROXIMITY_METRICS_BIND")
            .unwrap_or_else(|_| DEFAULT_METRICS_BIND.to_string())
            .parse()
            .with_context(|| "parse PROXIMITY_METRICS_BIND")?;

        let database_url = std::env::var("PROXIMITY_DATABASE_URL")
            .or_else(|_| std::env::var("DATABASE_URL"))
            .ok()
            .filter(|url| !url.is_empty());
        let storage = match env_storage_backend()? {
            Some(backend) => backend,
            None if database_url.is_some() => StorageBackend::Postgres,
            None => StorageBackend::Memory,
        };
        let postgres = database_url.map(postgres_from_env);

        let static_dir = std::env::var("PROXIMITY_STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATIC_DIR));
        let cors_allow_any = env_flag("PROXIMITY_CORS_ALLOW_ANY").unwrap_or(true);

        Ok(Self {
            bind_addr,
            metrics_bind,
            storage,
            postgres,
            static_dir,
            cors_allow_any,
        })
    }

    pub fn from_env_or_yaml() -> Result<Self> {
        let mut config = Self::from_env()?;
        if let Ok(path) = std::env::var("PROXIMITY_CONFIG") {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("read PROXIMITY_CONFIG: {path}"))?;
            let override_cfg: ServiceConfigOverride =
                serde_yaml::from_str(&contents).with_context(|| "parse service config yaml")?;
            config.apply(override_cfg)?;
        }
        Ok(config)
    }

    fn apply(&mut self, override_cfg: ServiceConfigOverride) -> Result<()> {
        if let Some(value) = override_cfg.bind_addr {
            self.bind_addr = value.parse().with_context(|| "parse bind_addr")?;
        }
        if let Some(value) = override_cfg.metrics_bind {
            self.metrics_bind = value.parse().with_context(|| "parse metrics_bind")?;
        }
        if let Some(url) = override_cfg.database_url {
            match &mut self.postgres {
                Some(pg) => pg.url = url,
                None => {
                    self.postgres = Some(postgres_from_env(url));
                    // A URL in the file implies Postgres unless a backend was named.
                    if override_cfg.storage_backend.is_none() && env_storage_backend()?.is_none() {
                        self.storage = StorageBackend::Postgres;
                    }
                }
            }
        }
        if let Some(value) = override_cfg.storage_backend {
            self.storage = StorageBackend::parse(&value).with_context(|| "parse storage_backend")?;
        }
        if let Some(pg) = &mut self.postgres {
            if let Some(value) = override_cfg.production {
                pg.require_tls = value;
            }
            if let Some(value) = override_cfg.pg_max_connections.filter(|value| *value > 0) {
                pg.max_connections = value;
            }
            if let Some(value) = override_cfg.pg_acquire_timeout_ms.filter(|value| *value > 0) {
                pg.acquire_timeout_ms = value;
            }
            if let Some(value) = override_cfg.pg_max_lifetime_secs.filter(|value| *value > 0) {
                pg.max_lifetime_secs = value;
            }
        }
        if let Some(value) = override_cfg.static_dir {
            self.static_dir = PathBuf::from(value);
        }
        if let Some(value) = override_cfg.cors_allow_any {
            self.cors_allow_any = value;
        }
        Ok(())
    }
}

/// Replace the credentials of a database URL with `****:****` for logging.
///
/// URLs without userinfo are returned unchanged.
pub fn mask_database_url(url: &str) -> String {
    let Some(scheme_end) = url.find("://") else {
        return url.to_string();
    };
    let rest = &url[scheme_end + 3..];
    let authority_end = rest.find(['/', '?', '#']).unwrap_or(rest.len());
    match rest[..authority_end].rfind('@') {
        Some(at) => format!(
            "{}://****:****@{}",
            &url[..scheme_end],
            &rest[at + 1..]
        ),
        None => url.to_string(),
    }
}
