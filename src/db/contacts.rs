//! Contact submission storage operations.

use sqlx::{sqlite::SqliteRow, QueryBuilder, Row};

use super::repository::{new_id, parse_id, stored_choice, timestamp};
use super::{FindOptions, Repository};
use crate::errors::AppError;
use crate::models::{Contact, ContactChanges, ContactStatus, NewContact};
use crate::validation::Choice;

const CONTACT_COLUMNS: &str =
    "id, name, email, subject, message, type, status, replied, notes, created_at, updated_at";

impl Repository {
    // ==================== CONTACT OPERATIONS ====================

    /// Submissions matching `options`, newest first.
    pub async fn find_contacts(&self, options: &FindOptions) -> Result<Vec<Contact>, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM contacts", CONTACT_COLUMNS));
        options.push_where(&mut qb);
        qb.push(" ORDER BY created_at DESC, rowid DESC");
        options.push_limit(&mut qb);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(contact_from_row).collect()
    }

    /// Get a submission by ID.
    pub async fn get_contact(&self, id: &str) -> Result<Option<Contact>, AppError> {
        let id = parse_id(id)?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM contacts WHERE id = ?",
            CONTACT_COLUMNS
        ))
        .bind(&id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(contact_from_row).transpose()
    }

    /// Store a new submission.
    pub async fn create_contact(&self, contact: &NewContact) -> Result<Contact, AppError> {
        let id = new_id();
        let now = timestamp();

        sqlx::query(
            r#"INSERT INTO contacts (
                id, name, email, subject, message, type, status, replied, notes,
                created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&contact.name)
        .bind(&contact.email)
        .bind(&contact.subject)
        .bind(&contact.message)
        .bind(contact.kind.as_str())
        .bind(contact.status.as_str())
        .bind(contact.replied)
        .bind(&contact.notes)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!(
            contact_id = %id,
            kind = contact.kind.as_str(),
            "Received contact submission"
        );

        Ok(Contact {
            id,
            name: contact.name.clone(),
            email: contact.email.clone(),
            subject: contact.subject.clone(),
            message: contact.message.clone(),
            kind: contact.kind,
            status: contact.status,
            replied: contact.replied,
            notes: contact.notes.clone(),
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update.
    pub async fn update_contact(
        &self,
        id: &str,
        changes: &ContactChanges,
    ) -> Result<Contact, AppError> {
        let existing = self
            .get_contact(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

        let updated = Contact {
            name: changes.name.clone().unwrap_or(existing.name),
            email: changes.email.clone().unwrap_or(existing.email),
            subject: changes.subject.clone().unwrap_or(existing.subject),
            message: changes.message.clone().unwrap_or(existing.message),
            kind: changes.kind.unwrap_or(existing.kind),
            status: changes.status.unwrap_or(existing.status),
            replied: changes.replied.unwrap_or(existing.replied),
            notes: changes.notes.clone().unwrap_or(existing.notes),
            updated_at: timestamp(),
            ..existing
        };

        let result = sqlx::query(
            r#"UPDATE contacts SET
                name = ?, email = ?, subject = ?, message = ?, type = ?, status = ?,
                replied = ?, notes = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&updated.name)
        .bind(&updated.email)
        .bind(&updated.subject)
        .bind(&updated.message)
        .bind(updated.kind.as_str())
        .bind(updated.status.as_str())
        .bind(updated.replied)
        .bind(&updated.notes)
        .bind(&updated.updated_at)
        .bind(&updated.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact not found".to_string()));
        }

        Ok(updated)
    }

    /// Move a submission from `New` to `Read`.
    ///
    /// Returns `false` when the submission was not `New`; its status is then
    /// left alone.
    pub async fn mark_contact_read(&self, id: &str) -> Result<bool, AppError> {
        let id = parse_id(id)?;
        let result = sqlx::query(
            "UPDATE contacts SET status = ?, updated_at = ? WHERE id = ? AND status = ?",
        )
        .bind(ContactStatus::Read.as_str())
        .bind(timestamp())
        .bind(&id)
        .bind(ContactStatus::New.as_str())
        .execute(&self.pool)
        .await?;

        let transitioned = result.rows_affected() > 0;
        if transitioned {
            tracing::debug!(contact_id = %id, "Marked contact as read");
        }
        Ok(transitioned)
    }

    /// Delete a submission, returning what was removed.
    pub async fn delete_contact(&self, id: &str) -> Result<Contact, AppError> {
        let existing = self
            .get_contact(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Contact not found".to_string()))?;

        let result = sqlx::query("DELETE FROM contacts WHERE id = ?")
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Contact not found".to_string()));
        }

        tracing::info!(contact_id = %existing.id, "Deleted contact");
        Ok(existing)
    }
}

fn contact_from_row(row: &SqliteRow) -> Result<Contact, AppError> {
    Ok(Contact {
        id: row.get("id"),
        name: row.get("name"),
        email: row.get("email"),
        subject: row.get("subject"),
        message: row.get("message"),
        kind: stored_choice(row, "type")?,
        status: stored_choice(row, "status")?,
        replied: row.get("replied"),
        notes: row.get("notes"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
