use crate::common::error::{AppError, ServiceResult};
use crate::entities::contacts::{Contact as ContactEntity, CreateContactArgs};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const SUBMIT_CONFIRMATION: &str =
    "Your message has been received. We will contact you shortly!";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(rename = "_id", alias = "id")]
    pub contact_id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub contact_purpose: String,
    pub message: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<ContactEntity> for Contact {
    type Error = AppError;

    fn try_from(contact: ContactEntity) -> ServiceResult<Self> {
        let contact_id = Uuid::parse_str(&contact.id)?;
        Ok(Self {
            contact_id,
            name: contact.name,
            email: contact.email,
            phone: contact.phone,
            contact_purpose: contact.contact_purpose,
            message: contact.message,
            read: contact.is_read,
            created_at: contact.created_at,
            updated_at: contact.updated_at,
        })
    }
}

/// A contact form submission as sent by the website.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SubmitContactArgs {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub contact_purpose: Option<String>,
    pub message: Option<String>,
}

fn required(field: Option<String>) -> ServiceResult<String> {
    match field {
        Some(value) if !value.is_empty() => Ok(value),
        _ => Err(AppError::ContactsMissingFields),
    }
}

impl TryFrom<SubmitContactArgs> for CreateContactArgs {
    type Error = AppError;

    fn try_from(args: SubmitContactArgs) -> ServiceResult<Self> {
        Ok(Self {
            name: required(args.name)?,
            email: required(args.email)?,
            phone: required(args.phone)?,
            contact_purpose: required(args.contact_purpose)?,
            message: required(args.message)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct ContactIdArgs {
    pub id: String,
}

#[derive(Debug, Serialize)]
pub struct SubmitContactResponse {
    pub success: bool,
    pub message: &'static str,
    pub contact: Contact,
}

#[derive(Debug, Serialize)]
pub struct ContactListResponse {
    pub success: bool,
    pub messages: Vec<Contact>,
}

#[derive(Debug, Serialize)]
pub struct MarkReadResponse {
    pub success: bool,
    pub message: Option<Contact>,
    pub messages: Vec<Contact>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn full_submission() -> serde_json::Value {
        json!({
            "name": "A",
            "email": "a@x.com",
            "phone": "1234567890",
            "contactPurpose": "Support",
            "message": "hi",
        })
    }

    #[test]
    fn complete_submission_validates() {
        let args: SubmitContactArgs = serde_json::from_value(full_submission()).unwrap();
        let args = CreateContactArgs::try_from(args).unwrap();
        assert_eq!(args.contact_purpose, "Support");
        assert_eq!(args.message, "hi");
    }

    #[test]
    fn each_missing_or_empty_field_is_rejected() {
        for field in ["name", "email", "phone", "contactPurpose", "message"] {
            for replacement in [None, Some(json!("")), Some(json!(null))] {
                let mut body = full_submission();
                let object = body.as_object_mut().unwrap();
                match &replacement {
                    None => {
                        object.remove(field);
                    }
                    Some(value) => {
                        object.insert(field.to_string(), value.clone());
                    }
                }
                let args: SubmitContactArgs = serde_json::from_value(body).unwrap();
                let result = CreateContactArgs::try_from(args);
                assert!(
                    matches!(result, Err(AppError::ContactsMissingFields)),
                    "{field} with {replacement:?}"
                );
            }
        }
    }

    #[test]
    fn contact_serializes_with_website_field_names() {
        let now = Utc::now();
        let contact = Contact {
            contact_id: Uuid::new_v4(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            phone: "1234567890".to_string(),
            contact_purpose: "Support".to_string(),
            message: "hi".to_string(),
            read: false,
            created_at: now,
            updated_at: now,
        };
        let value = serde_json::to_value(&contact).unwrap();
        assert_eq!(value["_id"], contact.contact_id.to_string());
        assert_eq!(value["contactPurpose"], "Support");
        assert_eq!(value["read"], false);
        assert!(value.get("createdAt").is_some());
    }

    #[test]
    fn entity_with_corrupt_id_is_unexpected() {
        let now = Utc::now();
        let entity = ContactEntity {
            id: "not-a-uuid".to_string(),
            name: "A".to_string(),
            email: "a@x.com".to_string(),
            phone: "1".to_string(),
            contact_purpose: "Support".to_string(),
            message: "hi".to_string(),
            is_read: false,
            created_at: now,
            updated_at: now,
        };
        assert!(matches!(
            Contact::try_from(entity),
            Err(AppError::Unexpected(_))
        ));
    }
}
