use crate::common::redis_pool::{RedisPool, RedisPoolManager};
use crate::common::state::AppState;
use crate::repositories::contacts::MySqlContacts;
use crate::repositories::sessions::RedisSessions;
use crate::repositories::users::MySqlUsers;
use crate::settings::{AppSettings, StorageBackend};
use anyhow::Context;
use deadpool::Runtime;
use redis::{AsyncConnectionConfig, Commands};
use sqlx::mysql::MySqlPoolOptions;
use sqlx::{MySql, Pool};
use std::sync::Arc;
use tracing::info;

pub fn initialize_logging(settings: &AppSettings) {
    tracing_subscriber::fmt()
        .with_max_level(settings.level)
        .with_timer(tracing_subscriber::fmt::time())
        .with_level(true)
        .compact()
        .init();
}

pub async fn initialize_state(settings: &AppSettings) -> anyhow::Result<AppState> {
    match settings.storage_backend {
        StorageBackend::Memory => {
            info!("Using in-memory storage, nothing will be persisted");
            Ok(AppState {
                expose_error_details: settings.expose_error_details,
                ..AppState::in_memory(settings.session_ttl, settings.require_operator_auth)
            })
        }
        StorageBackend::MySql => {
            let db = initialize_db(settings).await?;
            let redis = initialize_redis(settings)?;
            info!("Connected to mysql and redis");
            Ok(AppState {
                contacts: Arc::new(MySqlContacts::new(db.clone())),
                users: Arc::new(MySqlUsers::new(db)),
                sessions: Arc::new(RedisSessions::new(redis, settings.session_ttl)),
                require_operator_auth: settings.require_operator_auth,
                expose_error_details: settings.expose_error_details,
            })
        }
    }
}

pub async fn initialize_db(settings: &AppSettings) -> anyhow::Result<Pool<MySql>> {
    let database_url = settings
        .database_url
        .as_deref()
        .context("DATABASE_URL is not set")?;
    let db = MySqlPoolOptions::new()
        .acquire_timeout(settings.db_wait_timeout)
        .max_connections(settings.db_max_connections as _)
        .connect(database_url)
        .await?;
    Ok(db)
}

pub fn initialize_redis(settings: &AppSettings) -> anyhow::Result<RedisPool> {
    let redis_url = settings
        .redis_url
        .as_deref()
        .context("REDIS_URL is not set")?;
    let redis_client = redis::Client::open(redis_url)?;
    let mut conn = redis_client.get_connection_with_timeout(settings.redis_wait_timeout)?;
    let _: () = conn.ping()?;
    let redis_cfg = AsyncConnectionConfig::new()
        .set_connection_timeout(settings.redis_connection_timeout)
        .set_response_timeout(settings.redis_response_timeout);

    let redis_manager = RedisPoolManager::new(redis_client, redis_cfg);
    let redis = RedisPool::builder(redis_manager)
        .max_size(settings.redis_max_connections)
        .wait_timeout(Some(settings.redis_wait_timeout))
        .runtime(Runtime::Tokio1)
        .build()?;
    Ok(redis)
}
