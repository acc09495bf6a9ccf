use crate::common::env::FromEnv;
use anyhow::anyhow;
use std::env;
use std::net::{IpAddr, Ipv4Addr};
use std::ops::Deref;
use std::str::FromStr;
use std::sync::LazyLock;
use std::time::Duration;
use tracing::Level;

const LOCAL_FRONTEND_URL: &str = "http://localhost:5173";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    MySql,
    Memory,
}

impl FromStr for StorageBackend {
    type Err = std::io::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use std::io::{Error, ErrorKind};

        match s.trim().to_ascii_lowercase().as_str() {
            "mysql" => Ok(StorageBackend::MySql),
            "memory" => Ok(StorageBackend::Memory),
            _ => Err(Error::new(ErrorKind::InvalidInput, "invalid storage backend")),
        }
    }
}

pub struct AppSettings {
    pub app_component: String,
    pub level: Level,
    pub app_host: IpAddr,
    pub app_port: u16,
    pub frontend_urls: Vec<String>,

    pub storage_backend: StorageBackend,

    pub database_url: Option<String>,
    pub db_max_connections: usize,
    pub db_wait_timeout: Duration,

    pub redis_url: Option<String>,
    pub redis_max_connections: usize,
    pub redis_connection_timeout: Duration,
    pub redis_response_timeout: Duration,
    pub redis_wait_timeout: Duration,

    pub session_ttl: Duration,
    pub require_operator_auth: bool,
    pub expose_error_details: bool,
}

impl AppSettings {
    pub fn load_from_env() -> anyhow::Result<Self> {
        let _ = dotenv::dotenv();

        let app_component = env::var("APP_COMPONENT").unwrap_or_else(|_| "api".to_string());
        let level = Level::from_env_or("LOG_LEVEL", Level::INFO)?;
        let app_host = IpAddr::from_env_or("APP_HOST", IpAddr::V4(Ipv4Addr::UNSPECIFIED))?;
        let app_port = u16::from_env_or("APP_PORT", 5000)?;
        let frontend_urls = parse_frontend_urls(env::var("FRONTEND_URL").ok().as_deref());

        let storage_backend = StorageBackend::from_env_or("STORAGE_BACKEND", StorageBackend::MySql)?;

        let database_url = env::var("DATABASE_URL").ok();
        let db_max_connections = usize::from_env_or("DB_MAX_CONNECTIONS", 10)?;
        let db_wait_timeout_secs = u64::from_env_or("DB_WAIT_TIMEOUT_SECS", 5)?;
        let db_wait_timeout = Duration::from_secs(db_wait_timeout_secs);

        let redis_url = env::var("REDIS_URL").ok();
        let redis_max_connections = usize::from_env_or("REDIS_MAX_CONNECTIONS", 10)?;
        let redis_connection_timeout_secs = u64::from_env_or("REDIS_CONNECTION_TIMEOUT_SECS", 5)?;
        let redis_connection_timeout = Duration::from_secs(redis_connection_timeout_secs);
        let redis_response_timeout_secs = u64::from_env_or("REDIS_RESPONSE_TIMEOUT_SECS", 5)?;
        let redis_response_timeout = Duration::from_secs(redis_response_timeout_secs);
        let redis_wait_timeout_secs = u64::from_env_or("REDIS_WAIT_TIMEOUT_SECS", 5)?;
        let redis_wait_timeout = Duration::from_secs(redis_wait_timeout_secs);

        let session_ttl_secs = u64::from_env_or("SESSION_TTL_SECS", 24 * 60 * 60)?;
        let session_ttl = Duration::from_secs(session_ttl_secs);
        let require_operator_auth = bool::from_env_or("REQUIRE_OPERATOR_AUTH", false)?;
        let expose_error_details = bool::from_env_or("EXPOSE_ERROR_DETAILS", false)?;

        if storage_backend == StorageBackend::MySql {
            if database_url.is_none() {
                return Err(anyhow!("DATABASE_URL is required for the mysql storage backend"));
            }
            if redis_url.is_none() {
                return Err(anyhow!("REDIS_URL is required for the mysql storage backend"));
            }
        }

        Ok(AppSettings {
            app_component,
            level,
            app_host,
            app_port,
            frontend_urls,

            storage_backend,

            database_url,
            db_max_connections,
            db_wait_timeout,

            redis_url,
            redis_max_connections,
            redis_connection_timeout,
            redis_response_timeout,
            redis_wait_timeout,

            session_ttl,
            require_operator_auth,
            expose_error_details,
        })
    }

    pub fn get() -> &'static AppSettings {
        settings()
    }
}

pub fn settings() -> &'static AppSettings {
    static SETTINGS: LazyLock<AppSettings> =
        LazyLock::new(|| AppSettings::load_from_env().expect("Failed to load settings"));
    SETTINGS.deref()
}

/// `FRONTEND_URL` may list several origins separated by commas.
/// The local vite dev server is always allowed.
pub fn parse_frontend_urls(raw: Option<&str>) -> Vec<String> {
    let mut urls: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|url| url.trim().trim_end_matches('/'))
        .filter(|url| !url.is_empty())
        .map(str::to_string)
        .collect();
    if !urls.iter().any(|url| url == LOCAL_FRONTEND_URL) {
        urls.push(LOCAL_FRONTEND_URL.to_string());
    }
    urls
}
