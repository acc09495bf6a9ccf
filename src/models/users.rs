use crate::entities::users::User as UserEntity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginArgs {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// The user object the website keeps in local storage after logging in.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    #[serde(rename = "_id")]
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub token: Uuid,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub user_id: i64,
    pub name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

impl From<UserEntity> for User {
    fn from(user: UserEntity) -> Self {
        Self {
            user_id: user.id,
            name: user.name,
            email: user.email,
            created_at: user.created_at,
        }
    }
}
