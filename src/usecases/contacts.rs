use crate::common::context::Context;
use crate::common::error::{AppError, ServiceResult, unexpected};
use crate::entities::contacts::CreateContactArgs;
use crate::models::contacts::{Contact, SubmitContactArgs};
use tracing::{debug, info};
use uuid::Uuid;

fn parse_contact_id(contact_id: &str) -> ServiceResult<Uuid> {
    Uuid::parse_str(contact_id.trim()).map_err(|_| AppError::ContactsInvalidId)
}

pub async fn submit<C: Context>(ctx: &C, args: SubmitContactArgs) -> ServiceResult<Contact> {
    let args = CreateContactArgs::try_from(args)?;
    match ctx.contacts().create(args).await {
        Ok(contact) => {
            let contact = Contact::try_from(contact)?;
            info!(
                contact_id = %contact.contact_id,
                purpose = %contact.contact_purpose,
                "Contact message received"
            );
            Ok(contact)
        }
        Err(e) => unexpected(e),
    }
}

pub async fn fetch_all<C: Context>(ctx: &C) -> ServiceResult<Vec<Contact>> {
    match ctx.contacts().fetch_all().await {
        Ok(contacts) => contacts.into_iter().map(Contact::try_from).collect(),
        Err(e) => unexpected(e),
    }
}

/// An unknown id is not an error: the result is simply `None`.
pub async fn mark_read<C: Context>(ctx: &C, contact_id: &str) -> ServiceResult<Option<Contact>> {
    let contact_id = parse_contact_id(contact_id)?;
    match ctx.contacts().mark_read(contact_id).await {
        Ok(Some(contact)) => {
            info!(%contact_id, "Contact message marked as read");
            Ok(Some(Contact::try_from(contact)?))
        }
        Ok(None) => {
            debug!(%contact_id, "Contact message to mark as read does not exist");
            Ok(None)
        }
        Err(e) => unexpected(e),
    }
}

pub async fn delete<C: Context>(ctx: &C, contact_id: &str) -> ServiceResult<()> {
    let contact_id = parse_contact_id(contact_id)?;
    match ctx.contacts().delete(contact_id).await {
        Ok(()) => {
            info!(%contact_id, "Contact message deleted");
            Ok(())
        }
        Err(e) => unexpected(e),
    }
}
