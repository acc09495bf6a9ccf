use chrono::{DateTime, Utc};

#[derive(Debug, Clone, sqlx::FromRow)]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_purpose: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a submission that passed validation.
#[derive(Debug, Clone)]
pub struct CreateContactArgs {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_purpose: String,
    pub message: String,
}
