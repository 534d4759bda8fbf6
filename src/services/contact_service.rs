use std::time::SystemTime;

use tracing::info;
use uuid::Uuid;

use crate::{
    dao::models::{ContactEntity, ContactStatus},
    dto::contact::{ContactRequest, ContactResponse},
    error::ServiceError,
    state::SharedState,
};

/// Store a public contact-form submission with status `new`.
pub async fn submit(
    state: &SharedState,
    request: ContactRequest,
) -> Result<ContactResponse, ServiceError> {
    let store = state.require_store().await?;
    let contact = ContactEntity {
        id: Uuid::new_v4(),
        name: request.name.trim().to_owned(),
        email: request.email.trim().to_lowercase(),
        subject: request.subject.trim().to_owned(),
        message: request.message,
        status: ContactStatus::New,
        created_at: SystemTime::now(),
    };
    store.insert_contact(contact.clone()).await?;

    info!(contact_id = %contact.id, "contact message received");
    Ok(contact.into())
}

pub async fn list(state: &SharedState) -> Result<Vec<ContactResponse>, ServiceError> {
    let store = state.require_store().await?;
    let contacts = store.list_contacts().await?;
    Ok(contacts.into_iter().map(Into::into).collect())
}

pub async fn set_status(
    state: &SharedState,
    id: Uuid,
    status: ContactStatus,
) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.update_contact_status(id, status).await? {
        return Err(ServiceError::NotFound(format!("contact {id} not found")));
    }
    Ok(())
}

pub async fn delete(state: &SharedState, id: Uuid) -> Result<(), ServiceError> {
    let store = state.require_store().await?;
    if !store.delete_contact(id).await? {
        return Err(ServiceError::NotFound(format!("contact {id} not found")));
    }
    Ok(())
}
