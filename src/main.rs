//! Site Backend
//!
//! REST API for the marketing site's blog posts, portfolio projects and
//! contact-form submissions, backed by SQLite.

mod api;
mod config;
mod db;
mod errors;
mod models;
mod seed;
mod slug;
mod validation;

use std::sync::Arc;

use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Json, Router,
};
use chrono::{SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use db::Repository;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Arc<Config>,
}

#[derive(Debug, Parser)]
#[command(name = "site-backend", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Replace all posts and projects with sample content
    Seed,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("Database path: {:?}", config.db_path);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let repo = Arc::new(Repository::new(pool));

    match cli.command.unwrap_or(Command::Serve) {
        Command::Seed => {
            let summary = seed::run(&repo).await?;
            println!(
                "Seeded {} posts and {} projects",
                summary.posts, summary.projects
            );
        }
        Command::Serve => {
            let state = AppState {
                repo,
                config: Arc::new(config.clone()),
            };
            let app = create_router(state);

            let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
            tracing::info!("Server listening on {}", config.bind_addr);

            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}

fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.frontend_url);

    // API routes
    let api_routes = Router::new()
        // Posts
        .route("/posts", get(api::list_posts).post(api::create_post))
        .route("/posts/{slug}", get(api::get_post_by_slug))
        .route(
            "/posts/id/{id}",
            axum::routing::put(api::update_post).delete(api::delete_post),
        )
        // Projects
        .route(
            "/projects",
            get(api::list_projects).post(api::create_project),
        )
        .route(
            "/projects/{id}",
            get(api::get_project)
                .put(api::update_project)
                .delete(api::delete_project),
        )
        // Contact submissions
        .route(
            "/contact",
            get(api::list_contacts).post(api::create_contact),
        )
        .route(
            "/contact/{id}",
            get(api::get_contact)
                .put(api::update_contact)
                .delete(api::delete_contact),
        )
        .route("/health", get(health_check))
        .method_not_allowed_fallback(api::not_found);

    Router::new()
        .nest("/api", api_routes)
        .route("/health", get(health_check))
        .method_not_allowed_fallback(api::not_found)
        .fallback(api::not_found)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured front-end origin.
fn cors_layer(frontend_url: &str) -> CorsLayer {
    let methods = [Method::GET, Method::POST, Method::PUT, Method::DELETE];

    match HeaderValue::from_str(frontend_url) {
        Ok(origin) => CorsLayer::new()
            .allow_origin(origin)
            .allow_methods(methods)
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
            .allow_credentials(true),
        Err(_) => {
            tracing::warn!(
                "SITE_FRONTEND_URL {:?} is not a valid origin; allowing any origin",
                frontend_url
            );
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(methods)
                .allow_headers(Any)
        }
    }
}

/// Health check endpoint.
async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "success",
        "message": "API is running",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    }))
}

#[cfg(test)]
mod tests;
