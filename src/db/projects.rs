//! Project storage operations.

use sqlx::{sqlite::SqliteRow, QueryBuilder, Row};

use super::repository::{
    new_id, parse_id, parse_json_list, stored_choice, timestamp, to_json_list,
};
use super::{FindOptions, Repository};
use crate::errors::AppError;
use crate::models::{NewProject, Project, ProjectChanges};
use crate::validation::Choice;

const PROJECT_COLUMNS: &str = "id, title, description, long_description, category, \
     technologies, status, featured, image, github_url, live_url, start_date, \
     completion_date, sort_order, latitude, longitude, created_at, updated_at";

impl Repository {
    // ==================== PROJECT OPERATIONS ====================

    /// Projects matching `options`, by `order` ascending then newest first.
    pub async fn find_projects(&self, options: &FindOptions) -> Result<Vec<Project>, AppError> {
        let mut qb = QueryBuilder::new(format!("SELECT {} FROM projects", PROJECT_COLUMNS));
        options.push_where(&mut qb);
        qb.push(" ORDER BY sort_order ASC, created_at DESC, rowid DESC");
        options.push_limit(&mut qb);

        let rows = qb.build().fetch_all(&self.pool).await?;
        rows.iter().map(project_from_row).collect()
    }

    /// Get a project by ID.
    pub async fn get_project(&self, id: &str) -> Result<Option<Project>, AppError> {
        let id = parse_id(id)?;
        let row = sqlx::query(&format!(
            "SELECT {} FROM projects WHERE id = ?",
            PROJECT_COLUMNS
        ))
        .bind(&id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(project_from_row).transpose()
    }

    /// Create a new project.
    pub async fn create_project(&self, project: &NewProject) -> Result<Project, AppError> {
        let id = new_id();
        let now = timestamp();
        let start_date = project.start_date.clone().unwrap_or_else(|| now.clone());
        let technologies_json = to_json_list(&project.technologies)?;

        sqlx::query(
            r#"INSERT INTO projects (
                id, title, description, long_description, category, technologies,
                status, featured, image, github_url, live_url, start_date,
                completion_date, sort_order, latitude, longitude, created_at, updated_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&project.title)
        .bind(&project.description)
        .bind(&project.long_description)
        .bind(project.category.as_str())
        .bind(&technologies_json)
        .bind(project.status.as_str())
        .bind(project.featured)
        .bind(&project.image)
        .bind(&project.github_url)
        .bind(&project.live_url)
        .bind(&start_date)
        .bind(&project.completion_date)
        .bind(project.order)
        .bind(project.coordinates.latitude)
        .bind(project.coordinates.longitude)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        tracing::info!(project_id = %id, "Created project");

        Ok(Project {
            id,
            title: project.title.clone(),
            description: project.description.clone(),
            long_description: project.long_description.clone(),
            category: project.category,
            technologies: project.technologies.clone(),
            status: project.status,
            featured: project.featured,
            image: project.image.clone(),
            github_url: project.github_url.clone(),
            live_url: project.live_url.clone(),
            start_date,
            completion_date: project.completion_date.clone(),
            order: project.order,
            latitude: project.coordinates.latitude,
            longitude: project.coordinates.longitude,
            created_at: now.clone(),
            updated_at: now,
        })
    }

    /// Apply a partial update; coordinates change only as a pair.
    pub async fn update_project(
        &self,
        id: &str,
        changes: &ProjectChanges,
    ) -> Result<Project, AppError> {
        let existing = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        let (latitude, longitude) = match changes.coordinates {
            Some(c) => (c.latitude, c.longitude),
            None => (existing.latitude, existing.longitude),
        };

        let updated = Project {
            title: changes.title.clone().unwrap_or(existing.title),
            description: changes.description.clone().unwrap_or(existing.description),
            long_description: changes
                .long_description
                .clone()
                .unwrap_or(existing.long_description),
            category: changes.category.unwrap_or(existing.category),
            technologies: changes.technologies.clone().unwrap_or(existing.technologies),
            status: changes.status.unwrap_or(existing.status),
            featured: changes.featured.unwrap_or(existing.featured),
            image: changes.image.clone().unwrap_or(existing.image),
            github_url: changes.github_url.clone().unwrap_or(existing.github_url),
            live_url: changes.live_url.clone().unwrap_or(existing.live_url),
            start_date: changes.start_date.clone().unwrap_or(existing.start_date),
            completion_date: changes
                .completion_date
                .clone()
                .unwrap_or(existing.completion_date),
            order: changes.order.unwrap_or(existing.order),
            latitude,
            longitude,
            updated_at: timestamp(),
            ..existing
        };
        let technologies_json = to_json_list(&updated.technologies)?;

        let result = sqlx::query(
            r#"UPDATE projects SET
                title = ?, description = ?, long_description = ?, category = ?,
                technologies = ?, status = ?, featured = ?, image = ?, github_url = ?,
                live_url = ?, start_date = ?, completion_date = ?, sort_order = ?,
                latitude = ?, longitude = ?, updated_at = ?
            WHERE id = ?"#,
        )
        .bind(&updated.title)
        .bind(&updated.description)
        .bind(&updated.long_description)
        .bind(updated.category.as_str())
        .bind(&technologies_json)
        .bind(updated.status.as_str())
        .bind(updated.featured)
        .bind(&updated.image)
        .bind(&updated.github_url)
        .bind(&updated.live_url)
        .bind(&updated.start_date)
        .bind(&updated.completion_date)
        .bind(updated.order)
        .bind(updated.latitude)
        .bind(updated.longitude)
        .bind(&updated.updated_at)
        .bind(&updated.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        Ok(updated)
    }

    /// Delete a project, returning what was removed.
    pub async fn delete_project(&self, id: &str) -> Result<Project, AppError> {
        let existing = self
            .get_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".to_string()))?;

        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(&existing.id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Project not found".to_string()));
        }

        tracing::info!(project_id = %existing.id, "Deleted project");
        Ok(existing)
    }

    /// Remove every project. Used by the seed command.
    pub async fn delete_all_projects(&self) -> Result<u64, AppError> {
        let result = sqlx::query("DELETE FROM projects")
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

fn project_from_row(row: &SqliteRow) -> Result<Project, AppError> {
    let technologies: String = row.get("technologies");
    Ok(Project {
        id: row.get("id"),
        title: row.get("title"),
        description: row.get("description"),
        long_description: row.get("long_description"),
        category: stored_choice(row, "category")?,
        technologies: parse_json_list(&technologies),
        status: stored_choice(row, "status")?,
        featured: row.get("featured"),
        image: row.get("image"),
        github_url: row.get("github_url"),
        live_url: row.get("live_url"),
        start_date: row.get("start_date"),
        completion_date: row.get("completion_date"),
        order: row.get("sort_order"),
        latitude: row.get("latitude"),
        longitude: row.get("longitude"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    })
}
