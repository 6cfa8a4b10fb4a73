//! REST API module.
//!
//! Handlers for posts, projects and contact submissions, plus the success
//! envelope and extractors they share.

mod contacts;
mod posts;
mod projects;

pub use contacts::*;
pub use posts::*;
pub use projects::*;

use axum::{
    extract::{FromRequest, FromRequestParts, OriginalUri},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip)]
    pub code: StatusCode,
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            code: StatusCode::OK,
            status: "success",
            count: None,
            message: None,
            data: Some(data),
        }
    }

    pub fn with_status(mut self, code: StatusCode) -> Self {
        self.code = code;
        self
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.code, Json(self)).into_response()
    }
}

/// Response type that can be either success or error.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// 200 with `data`.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}

/// 200 with `data` and its `count`.
pub fn list<T: Serialize>(items: Vec<T>) -> ApiResult<Vec<T>> {
    let count = items.len();
    let mut response = ApiResponse::new(items);
    response.count = Some(count);
    Ok(response)
}

/// 201 with the created entity.
pub fn created<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data).with_status(StatusCode::CREATED))
}

/// 200 with only a confirmation message.
pub fn confirmed(message: &str) -> ApiResult<()> {
    Ok(ApiResponse {
        code: StatusCode::OK,
        status: "success",
        count: None,
        message: Some(message.to_string()),
        data: None,
    })
}

/// Create an error API response.
pub fn error<T: Serialize>(err: AppError) -> ApiResult<T> {
    Err(err)
}

/// JSON body extractor whose rejections use the error envelope.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

/// Query-string extractor whose rejections use the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// Path-parameter extractor whose rejections use the error envelope.
#[derive(Debug, FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `featured` query flag: `"true"` is true, any other non-empty value false.
pub(crate) fn featured_param(raw: Option<&str>) -> Option<bool> {
    raw.filter(|s| !s.is_empty()).map(|s| s == "true")
}

/// Non-empty text filter parameter.
pub(crate) fn text_param(raw: Option<&str>) -> Option<&str> {
    raw.filter(|s| !s.is_empty())
}

/// `limit` query parameter. Absent, empty or `0` means unbounded.
pub(crate) fn limit_param(raw: Option<&str>) -> Result<Option<u32>, AppError> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s.parse::<u32>().map(Some).map_err(|_| {
            AppError::BadRequest(format!("limit must be a non-negative integer, got `{}`", s))
        }),
    }
}

/// Fallback for unmatched routes and methods. Reports the full path, nest prefix included.
pub async fn not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::NotFound(format!("Not Found - {}", uri))
}
