//! Contact API endpoints.

use axum::extract::State;

use super::{
    confirmed, created, error, limit_param, list, success, text_param, ApiJson, ApiPath,
    ApiQuery, ApiResult,
};
use crate::db::FindOptions;
use crate::errors::AppError;
use crate::models::{
    Contact, ContactListParams, ContactStatus, CreateContactRequest, UpdateContactRequest,
};
use crate::AppState;

const SUBMISSION_ACK: &str = "Thank you for reaching out! We will get back to you soon.";

/// GET /api/contact - List submissions.
pub async fn list_contacts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ContactListParams>,
) -> ApiResult<Vec<Contact>> {
    let mut options = FindOptions::new();
    if let Some(status) = text_param(params.status.as_deref()) {
        options = options.eq_text("status", status);
    }
    let options = options.limit(limit_param(params.limit.as_deref())?);

    match state.repo.find_contacts(&options).await {
        Ok(contacts) => list(contacts),
        Err(e) => error(e),
    }
}

/// GET /api/contact/:id - Get a submission, marking it read if it was new.
pub async fn get_contact(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Contact> {
    let contact = match state.repo.get_contact(&id).await {
        Ok(Some(contact)) => contact,
        Ok(None) => return error(AppError::NotFound("Contact not found".to_string())),
        Err(e) => return error(e),
    };

    if contact.status != ContactStatus::New {
        return success(contact);
    }

    // Re-read so the response carries the stored status and timestamp
    match state.repo.mark_contact_read(&contact.id).await {
        Ok(_) => match state.repo.get_contact(&contact.id).await {
            Ok(Some(contact)) => success(contact),
            Ok(None) => error(AppError::NotFound("Contact not found".to_string())),
            Err(e) => error(e),
        },
        Err(e) => error(e),
    }
}

/// POST /api/contact - Public contact-form submission.
pub async fn create_contact(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateContactRequest>,
) -> ApiResult<Contact> {
    let contact = request.validate()?;

    match state.repo.create_contact(&contact).await {
        Ok(contact) => created(contact).map(|r| r.with_message(SUBMISSION_ACK)),
        Err(e) => error(e),
    }
}

/// PUT /api/contact/:id - Update a submission (status, notes).
pub async fn update_contact(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<UpdateContactRequest>,
) -> ApiResult<Contact> {
    let changes = request.validate()?;

    match state.repo.update_contact(&id, &changes).await {
        Ok(contact) => success(contact),
        Err(e) => error(e),
    }
}

/// DELETE /api/contact/:id - Delete a submission.
pub async fn delete_contact(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<()> {
    match state.repo.delete_contact(&id).await {
        Ok(_) => confirmed("Contact deleted successfully"),
        Err(e) => error(e),
    }
}
