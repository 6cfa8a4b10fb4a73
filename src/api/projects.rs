//! Project API endpoints.

use axum::extract::State;

use super::{
    confirmed, created, error, featured_param, limit_param, list, success, text_param, ApiJson,
    ApiPath, ApiQuery, ApiResult,
};
use crate::db::FindOptions;
use crate::errors::AppError;
use crate::models::{CreateProjectRequest, Project, ProjectListParams, UpdateProjectRequest};
use crate::AppState;

/// GET /api/projects - List projects.
pub async fn list_projects(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<ProjectListParams>,
) -> ApiResult<Vec<Project>> {
    let mut options = FindOptions::new();
    if let Some(category) = text_param(params.category.as_deref()) {
        options = options.eq_text("category", category);
    }
    if let Some(featured) = featured_param(params.featured.as_deref()) {
        options = options.eq_bool("featured", featured);
    }
    if let Some(status) = text_param(params.status.as_deref()) {
        options = options.eq_text("status", status);
    }
    let options = options.limit(limit_param(params.limit.as_deref())?);

    match state.repo.find_projects(&options).await {
        Ok(projects) => list(projects),
        Err(e) => error(e),
    }
}

/// GET /api/projects/:id - Get a single project.
pub async fn get_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<Project> {
    match state.repo.get_project(&id).await {
        Ok(Some(project)) => success(project),
        Ok(None) => error(AppError::NotFound("Project not found".to_string())),
        Err(e) => error(e),
    }
}

/// POST /api/projects - Create a new project. Coordinates are required.
pub async fn create_project(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProjectRequest>,
) -> ApiResult<Project> {
    let project = request
        .validate()
        .inspect_err(|e| tracing::debug!("Rejected project: {}", e.summary()))?;

    match state.repo.create_project(&project).await {
        Ok(project) => created(project),
        Err(e) => error(e),
    }
}

/// PUT /api/projects/:id - Update a project.
///
/// Coordinates are optional here but must arrive as a pair.
pub async fn update_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<UpdateProjectRequest>,
) -> ApiResult<Project> {
    let changes = request.validate().inspect_err(|e| {
        tracing::debug!(project_id = %id, "Rejected project update: {}", e.summary())
    })?;

    match state.repo.update_project(&id, &changes).await {
        Ok(project) => success(project),
        Err(e) => error(e),
    }
}

/// DELETE /api/projects/:id - Delete a project.
pub async fn delete_project(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<()> {
    match state.repo.delete_project(&id).await {
        Ok(_) => confirmed("Project deleted successfully"),
        Err(e) => error(e),
    }
}
