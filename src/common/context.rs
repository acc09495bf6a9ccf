use crate::common::state::AppState;
use crate::repositories::contacts::ContactsRepository;
use crate::repositories::sessions::SessionsRepository;
use crate::repositories::users::UsersRepository;

pub trait Context: Sync + Send {
    fn contacts(&self) -> &dyn ContactsRepository;
    fn users(&self) -> &dyn UsersRepository;
    fn sessions(&self) -> &dyn SessionsRepository;
}

impl Context for AppState {
    fn contacts(&self) -> &dyn ContactsRepository {
        self.contacts.as_ref()
    }

    fn users(&self) -> &dyn UsersRepository {
        self.users.as_ref()
    }

    fn sessions(&self) -> &dyn SessionsRepository {
        self.sessions.as_ref()
    }
}
