use crate::common::redis_json::Json;
use crate::common::redis_pool::RedisPool;
use crate::entities::sessions::{CreateSessionArgs, Session};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use hashbrown::HashMap;
use redis::AsyncCommands;
use std::time::Duration;
use tokio::sync::RwLock;
use uuid::Uuid;

const KEY_PREFIX: &str = "website:sessions";

#[async_trait]
pub trait SessionsRepository: Send + Sync {
    async fn create(&self, args: CreateSessionArgs) -> anyhow::Result<Session>;

    /// Expired sessions are reported as missing.
    async fn fetch_one(&self, session_id: Uuid) -> anyhow::Result<Option<Session>>;

    async fn delete(&self, session_id: Uuid) -> anyhow::Result<()>;
}

fn make_key(session_id: Uuid) -> String {
    format!("{KEY_PREFIX}:{session_id}")
}

fn new_session(args: CreateSessionArgs, ttl: Duration) -> anyhow::Result<Session> {
    let created_at = Utc::now();
    let expires_at = created_at + TimeDelta::from_std(ttl)?;
    Ok(Session {
        session_id: Uuid::new_v4(),
        user_id: args.user_id,
        name: args.name,
        email: args.email,
        created_at,
        expires_at,
    })
}

pub struct RedisSessions {
    redis: RedisPool,
    ttl: Duration,
}

impl RedisSessions {
    pub fn new(redis: RedisPool, ttl: Duration) -> Self {
        Self { redis, ttl }
    }
}

#[async_trait]
impl SessionsRepository for RedisSessions {
    async fn create(&self, args: CreateSessionArgs) -> anyhow::Result<Session> {
        let session = new_session(args, self.ttl)?;
        let mut redis = self.redis.get().await?;
        let key = make_key(session.session_id);
        let _: () = redis
            .set_ex(key, Json(&session), self.ttl.as_secs().max(1))
            .await?;
        Ok(session)
    }

    async fn fetch_one(&self, session_id: Uuid) -> anyhow::Result<Option<Session>> {
        let mut redis = self.redis.get().await?;
        let session: Option<Json<Session>> = redis.get(make_key(session_id)).await?;
        Ok(session
            .map(Json::into_inner)
            .filter(|session| !session.is_expired()))
    }

    async fn delete(&self, session_id: Uuid) -> anyhow::Result<()> {
        let mut redis = self.redis.get().await?;
        let _: () = redis.del(make_key(session_id)).await?;
        Ok(())
    }
}

pub struct MemorySessions {
    sessions: RwLock<HashMap<Uuid, Session>>,
    ttl: Duration,
}

impl MemorySessions {
    pub fn new(ttl: Duration) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            ttl,
        }
    }
}

#[async_trait]
impl SessionsRepository for MemorySessions {
    async fn create(&self, args: CreateSessionArgs) -> anyhow::Result<Session> {
        let session = new_session(args, self.ttl)?;
        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, session| !session.is_expired());
        sessions.insert(session.session_id, session.clone());
        Ok(session)
    }

    async fn fetch_one(&self, session_id: Uuid) -> anyhow::Result<Option<Session>> {
        let sessions = self.sessions.read().await;
        Ok(sessions
            .get(&session_id)
            .filter(|session| !session.is_expired())
            .cloned())
    }

    async fn delete(&self, session_id: Uuid) -> anyhow::Result<()> {
        self.sessions.write().await.remove(&session_id);
        Ok(())
    }
}
