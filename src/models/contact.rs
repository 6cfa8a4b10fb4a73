//! Contact-form submission model.

use serde::{Deserialize, Serialize};

use crate::validation::{
    choice, email, max_chars, required_text, supplied_text, Choice, ValidationErrors,
};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ContactType {
    #[default]
    #[serde(rename = "General Inquiry")]
    GeneralInquiry,
    Partnership,
    Collaboration,
    Technical,
    Other,
}

impl Choice for ContactType {
    const ALL: &'static [Self] = &[
        ContactType::GeneralInquiry,
        ContactType::Partnership,
        ContactType::Collaboration,
        ContactType::Technical,
        ContactType::Other,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ContactType::GeneralInquiry => "General Inquiry",
            ContactType::Partnership => "Partnership",
            ContactType::Collaboration => "Collaboration",
            ContactType::Technical => "Technical",
            ContactType::Other => "Other",
        }
    }
}

/// Triage state of a submission.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum ContactStatus {
    #[default]
    New,
    Read,
    Replied,
    Archived,
}

impl Choice for ContactStatus {
    const ALL: &'static [Self] = &[
        ContactStatus::New,
        ContactStatus::Read,
        ContactStatus::Replied,
        ContactStatus::Archived,
    ];

    fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "New",
            ContactStatus::Read => "Read",
            ContactStatus::Replied => "Replied",
            ContactStatus::Archived => "Archived",
        }
    }
}

/// A message sent through the contact form.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: String,
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: ContactType,
    pub status: ContactStatus,
    pub replied: bool,
    pub notes: String,
    pub created_at: String,
    pub updated_at: String,
}

/// Request body for a contact-form submission.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub replied: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// A validated submission ready to be inserted.
#[derive(Debug, Clone)]
pub struct NewContact {
    pub name: String,
    pub email: String,
    pub subject: String,
    pub message: String,
    pub kind: ContactType,
    pub status: ContactStatus,
    pub replied: bool,
    pub notes: String,
}

struct ContactFields {
    name: Option<String>,
    email: Option<String>,
    subject: Option<String>,
    message: Option<String>,
    kind: Option<ContactType>,
    status: Option<ContactStatus>,
}

/// Shared checks for create and update. `required` decides whether an absent
/// text field is a violation.
#[allow(clippy::too_many_arguments)]
fn check_fields(
    errors: &mut ValidationErrors,
    required: bool,
    name: Option<&str>,
    email_address: Option<&str>,
    subject: Option<&str>,
    message: Option<&str>,
    kind: Option<&str>,
    status: Option<&str>,
) -> ContactFields {
    let text = if required {
        required_text
    } else {
        supplied_text
    };

    let name = text(errors, "name", name, true, "Name is required");
    max_chars(
        errors,
        "name",
        name.as_deref(),
        100,
        "Name cannot exceed 100 characters",
    );

    let email_address = match email_address {
        Some(raw) if !raw.trim().is_empty() => email(errors, "email", Some(raw)),
        Some(_) => {
            errors.push("email", "Email is required");
            None
        }
        None if required => {
            errors.push("email", "Email is required");
            None
        }
        None => None,
    };

    let subject = text(errors, "subject", subject, true, "Subject is required");
    max_chars(
        errors,
        "subject",
        subject.as_deref(),
        200,
        "Subject cannot exceed 200 characters",
    );

    let message = text(errors, "message", message, false, "Message is required");
    max_chars(
        errors,
        "message",
        message.as_deref(),
        2000,
        "Message cannot exceed 2000 characters",
    );

    ContactFields {
        name,
        email: email_address,
        subject,
        message,
        kind: choice::<ContactType>(errors, "type", kind),
        status: choice::<ContactStatus>(errors, "status", status),
    }
}

impl CreateContactRequest {
    pub fn validate(&self) -> Result<NewContact, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = check_fields(
            &mut errors,
            true,
            self.name.as_deref(),
            self.email.as_deref(),
            self.subject.as_deref(),
            self.message.as_deref(),
            self.kind.as_deref(),
            self.status.as_deref(),
        );

        let (Some(name), Some(email), Some(subject), Some(message)) =
            (fields.name, fields.email, fields.subject, fields.message)
        else {
            return Err(errors);
        };

        errors.finish(NewContact {
            name,
            email,
            subject,
            message,
            kind: fields.kind.unwrap_or_default(),
            status: fields.status.unwrap_or_default(),
            replied: self.replied.unwrap_or(false),
            notes: self.notes.clone().unwrap_or_default(),
        })
    }
}

/// Request body for a partial contact update (typically status and notes).
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateContactRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub subject: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub replied: Option<bool>,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ContactChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub subject: Option<String>,
    pub message: Option<String>,
    pub kind: Option<ContactType>,
    pub status: Option<ContactStatus>,
    pub replied: Option<bool>,
    pub notes: Option<String>,
}

impl UpdateContactRequest {
    pub fn validate(&self) -> Result<ContactChanges, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let fields = check_fields(
            &mut errors,
            false,
            self.name.as_deref(),
            self.email.as_deref(),
            self.subject.as_deref(),
            self.message.as_deref(),
            self.kind.as_deref(),
            self.status.as_deref(),
        );

        errors.finish(ContactChanges {
            name: fields.name,
            email: fields.email,
            subject: fields.subject,
            message: fields.message,
            kind: fields.kind,
            status: fields.status,
            replied: self.replied,
            notes: self.notes.clone(),
        })
    }
}

/// Query parameters for the contact listing.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContactListParams {
    pub status: Option<String>,
    pub limit: Option<String>,
}
