use crate::entities::contacts::{Contact, CreateContactArgs};
use async_trait::async_trait;
use chrono::Utc;
use sqlx::{MySql, Pool};
use tokio::sync::RwLock;
use uuid::Uuid;

const TABLE_NAME: &str = "contacts";
const READ_FIELDS: &str =
    "id, name, email, phone, contact_purpose, message, is_read, created_at, updated_at";

#[async_trait]
pub trait ContactsRepository: Send + Sync {
    async fn create(&self, args: CreateContactArgs) -> anyhow::Result<Contact>;

    /// All contacts, newest first.
    async fn fetch_all(&self) -> anyhow::Result<Vec<Contact>>;

    /// Returns `None` when no contact has this id.
    async fn mark_read(&self, contact_id: Uuid) -> anyhow::Result<Option<Contact>>;

    /// Deleting a missing contact is a no-op.
    async fn delete(&self, contact_id: Uuid) -> anyhow::Result<()>;
}

fn new_contact(args: CreateContactArgs) -> Contact {
    let now = Utc::now();
    Contact {
        id: Uuid::new_v4().to_string(),
        name: args.name,
        email: args.email,
        phone: args.phone,
        contact_purpose: args.contact_purpose,
        message: args.message,
        is_read: false,
        created_at: now,
        updated_at: now,
    }
}

pub struct MySqlContacts {
    db: Pool<MySql>,
}

impl MySqlContacts {
    pub fn new(db: Pool<MySql>) -> Self {
        Self { db }
    }

    async fn fetch_one(&self, contact_id: Uuid) -> sqlx::Result<Option<Contact>> {
        const QUERY: &str = const_str::concat!(
            "SELECT ",
            READ_FIELDS,
            " FROM ",
            TABLE_NAME,
            " WHERE id = ?"
        );
        sqlx::query_as(QUERY)
            .bind(contact_id.to_string())
            .fetch_optional(&self.db)
            .await
    }
}

#[async_trait]
impl ContactsRepository for MySqlContacts {
    async fn create(&self, args: CreateContactArgs) -> anyhow::Result<Contact> {
        const QUERY: &str = const_str::concat!(
            "INSERT INTO ",
            TABLE_NAME,
            " (id, name, email, phone, contact_purpose, message, is_read, created_at, updated_at) ",
            "VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)"
        );
        let contact = new_contact(args);
        sqlx::query(QUERY)
            .bind(&contact.id)
            .bind(&contact.name)
            .bind(&contact.email)
            .bind(&contact.phone)
            .bind(&contact.contact_purpose)
            .bind(&contact.message)
            .bind(contact.is_read)
            .bind(contact.created_at)
            .bind(contact.updated_at)
            .execute(&self.db)
            .await?;
        Ok(contact)
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Contact>> {
        // seq is the auto-increment key, so equal timestamps keep insertion order
        const QUERY: &str = const_str::concat!(
            "SELECT ",
            READ_FIELDS,
            " FROM ",
            TABLE_NAME,
            " ORDER BY created_at DESC, seq DESC"
        );
        let contacts = sqlx::query_as(QUERY).fetch_all(&self.db).await?;
        Ok(contacts)
    }

    async fn mark_read(&self, contact_id: Uuid) -> anyhow::Result<Option<Contact>> {
        const QUERY: &str = const_str::concat!(
            "UPDATE ",
            TABLE_NAME,
            " SET is_read = TRUE, updated_at = ? WHERE id = ?"
        );
        sqlx::query(QUERY)
            .bind(Utc::now())
            .bind(contact_id.to_string())
            .execute(&self.db)
            .await?;
        Ok(self.fetch_one(contact_id).await?)
    }

    async fn delete(&self, contact_id: Uuid) -> anyhow::Result<()> {
        const QUERY: &str = const_str::concat!("DELETE FROM ", TABLE_NAME, " WHERE id = ?");
        sqlx::query(QUERY)
            .bind(contact_id.to_string())
            .execute(&self.db)
            .await?;
        Ok(())
    }
}

/// Keeps contacts in insertion order inside the process.
#[derive(Default)]
pub struct MemoryContacts {
    contacts: RwLock<Vec<Contact>>,
}

impl MemoryContacts {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContactsRepository for MemoryContacts {
    async fn create(&self, args: CreateContactArgs) -> anyhow::Result<Contact> {
        let contact = new_contact(args);
        self.contacts.write().await.push(contact.clone());
        Ok(contact)
    }

    async fn fetch_all(&self) -> anyhow::Result<Vec<Contact>> {
        let contacts = self.contacts.read().await;
        // the sort is stable, so ties stay newest-inserted first
        let mut newest_first: Vec<Contact> = contacts.iter().rev().cloned().collect();
        newest_first.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(newest_first)
    }

    async fn mark_read(&self, contact_id: Uuid) -> anyhow::Result<Option<Contact>> {
        let id = contact_id.to_string();
        let mut contacts = self.contacts.write().await;
        let Some(contact) = contacts.iter_mut().find(|contact| contact.id == id) else {
            return Ok(None);
        };
        contact.is_read = true;
        contact.updated_at = Utc::now();
        Ok(Some(contact.clone()))
    }

    async fn delete(&self, contact_id: Uuid) -> anyhow::Result<()> {
        let id = contact_id.to_string();
        self.contacts.write().await.retain(|contact| contact.id != id);
        Ok(())
    }
}
