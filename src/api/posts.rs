//! Post API endpoints.

use axum::extract::State;

use super::{
    confirmed, created, error, featured_param, limit_param, list, success, text_param, ApiJson,
    ApiPath, ApiQuery, ApiResult,
};
use crate::db::FindOptions;
use crate::errors::AppError;
use crate::models::{CreatePostRequest, Post, PostListParams, UpdatePostRequest};
use crate::AppState;

/// GET /api/posts - List published posts.
pub async fn list_posts(
    State(state): State<AppState>,
    ApiQuery(params): ApiQuery<PostListParams>,
) -> ApiResult<Vec<Post>> {
    let mut options = FindOptions::new().eq_bool("published", true);
    if let Some(category) = text_param(params.category.as_deref()) {
        options = options.eq_text("category", category);
    }
    if let Some(featured) = featured_param(params.featured.as_deref()) {
        options = options.eq_bool("featured", featured);
    }
    let options = options.limit(limit_param(params.limit.as_deref())?);

    match state.repo.find_posts(&options).await {
        Ok(posts) => list(posts),
        Err(e) => error(e),
    }
}

/// GET /api/posts/:slug - Get a published post and count the view.
pub async fn get_post_by_slug(
    State(state): State<AppState>,
    ApiPath(slug): ApiPath<String>,
) -> ApiResult<Post> {
    let post = match state.repo.find_published_post(&slug).await {
        Ok(Some(post)) => post,
        Ok(None) => return error(AppError::NotFound("Post not found".to_string())),
        Err(e) => return error(e),
    };

    match state.repo.increment_post_views(&post.id).await {
        Ok(post) => success(post),
        Err(e) => error(e),
    }
}

/// POST /api/posts - Create a new post.
pub async fn create_post(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreatePostRequest>,
) -> ApiResult<Post> {
    let post = request.validate()?;

    match state.repo.create_post(&post).await {
        Ok(post) => created(post),
        Err(e) => error(e),
    }
}

/// PUT /api/posts/id/:id - Update a post.
pub async fn update_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
    ApiJson(request): ApiJson<UpdatePostRequest>,
) -> ApiResult<Post> {
    let changes = request.validate()?;

    match state.repo.update_post(&id, &changes).await {
        Ok(post) => success(post),
        Err(e) => error(e),
    }
}

/// DELETE /api/posts/id/:id - Delete a post.
pub async fn delete_post(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<String>,
) -> ApiResult<()> {
    match state.repo.delete_post(&id).await {
        Ok(_) => confirmed("Post deleted successfully"),
        Err(e) => error(e),
    }
}
