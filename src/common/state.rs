use crate::repositories::contacts::{ContactsRepository, MemoryContacts};
use crate::repositories::sessions::{MemorySessions, SessionsRepository};
use crate::repositories::users::{MemoryUsers, UsersRepository};
use std::sync::Arc;
use std::time::Duration;

#[derive(Clone)]
pub struct AppState {
    pub contacts: Arc<dyn ContactsRepository>,
    pub users: Arc<dyn UsersRepository>,
    pub sessions: Arc<dyn SessionsRepository>,
    /// Gates listing and moderating contacts behind a login session.
    pub require_operator_auth: bool,
    /// Unexpected errors carry their underlying text to clients.
    /// Meant for development only.
    pub expose_error_details: bool,
}

impl AppState {
    pub fn in_memory(session_ttl: Duration, require_operator_auth: bool) -> Self {
        Self {
            contacts: Arc::new(MemoryContacts::new()),
            users: Arc::new(MemoryUsers::new()),
            sessions: Arc::new(MemorySessions::new(session_ttl)),
            require_operator_auth,
            expose_error_details: false,
        }
    }
}
