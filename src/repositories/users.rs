use crate::entities::users::User;
use anyhow::anyhow;
use async_trait::async_trait;
use chrono::Utc;
use hashbrown::HashMap;
use sqlx::{MySql, Pool};
use tokio::sync::RwLock;

const TABLE_NAME: &str = "users";
const READ_FIELDS: &str = "id, name, email, password_hash, created_at";

#[async_trait]
pub trait UsersRepository: Send + Sync {
    async fn fetch_one_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;

    /// Fails when the email is already taken.
    async fn create(&self, name: &str, email: &str, password_hash: &str) -> anyhow::Result<User>;
}

pub struct MySqlUsers {
    db: Pool<MySql>,
}

impl MySqlUsers {
    pub fn new(db: Pool<MySql>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl UsersRepository for MySqlUsers {
    async fn fetch_one_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        const QUERY: &str = const_str::concat!(
            "SELECT ",
            READ_FIELDS,
            " FROM ",
            TABLE_NAME,
            " WHERE email = ?"
        );
        let user = sqlx::query_as(QUERY)
            .bind(email)
            .fetch_optional(&self.db)
            .await?;
        Ok(user)
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> anyhow::Result<User> {
        const QUERY: &str = const_str::concat!(
            "INSERT INTO ",
            TABLE_NAME,
            " (name, email, password_hash, created_at) VALUES (?, ?, ?, ?)"
        );
        let created_at = Utc::now();
        let res = sqlx::query(QUERY)
            .bind(name)
            .bind(email)
            .bind(password_hash)
            .bind(created_at)
            .execute(&self.db)
            .await?;
        Ok(User {
            id: res.last_insert_id() as _,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at,
        })
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: RwLock<HashMap<String, User>>,
}

impl MemoryUsers {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UsersRepository for MemoryUsers {
    async fn fetch_one_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(email).cloned())
    }

    async fn create(&self, name: &str, email: &str, password_hash: &str) -> anyhow::Result<User> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(anyhow!("a user with email {email} already exists"));
        }
        let user = User {
            id: users.len() as i64 + 1,
            name: name.to_string(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            created_at: Utc::now(),
        };
        users.insert(email.to_string(), user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn created_users_are_found_by_email() {
        let repo = MemoryUsers::new();
        let created = repo.create("Operator", "ops@x.com", "hash").await.unwrap();

        let found = repo.fetch_one_by_email("ops@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.name, "Operator");
        assert!(repo.fetch_one_by_email("other@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryUsers::new();
        repo.create("One", "ops@x.com", "hash").await.unwrap();
        assert!(repo.create("Two", "ops@x.com", "hash").await.is_err());
    }
}
