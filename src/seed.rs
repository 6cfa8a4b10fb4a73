//! Sample content for a fresh database.
//!
//! Seeding replaces every post and project; contact submissions are kept.

use serde_json::json;

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{CreatePostRequest, CreateProjectRequest};

/// Counts of inserted documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedSummary {
    pub posts: usize,
    pub projects: usize,
}

fn sample_posts() -> Vec<CreatePostRequest> {
    vec![
        CreatePostRequest {
            title: Some("Welcome to the Field Notes".into()),
            excerpt: Some("Why we are writing things down as we build.".into()),
            content: Some(
                "This blog follows our work on the land and at the keyboard: soil, \
                 water, mapping and the software that ties them together."
                    .into(),
            ),
            category: Some("Journey".into()),
            tags: Some(vec!["welcome".into(), "introduction".into()]),
            featured: Some(true),
            ..Default::default()
        },
        CreatePostRequest {
            title: Some("Reading Soil: A Beginner's Field Test".into()),
            excerpt: Some("Three cheap tests that tell you more than a lab report.".into()),
            content: Some(
                "Before buying amendments, dig a hole. Texture, smell and the number of \
                 earthworms in a spadeful say a lot about structure and biology."
                    .into(),
            ),
            category: Some("Land Lab".into()),
            tags: Some(vec!["soil".into(), "testing".into()]),
            featured: Some(true),
            ..Default::default()
        },
        CreatePostRequest {
            title: Some("Mapping Water Flow with Open Elevation Data".into()),
            excerpt: Some("Turning free elevation models into a swale plan.".into()),
            content: Some(
                "Contour lines from public elevation data are enough to sketch where \
                 water will move across a slope and where to slow it down."
                    .into(),
            ),
            category: Some("Research".into()),
            tags: Some(vec!["gis".into(), "water".into()]),
            ..Default::default()
        },
        CreatePostRequest {
            title: Some("Shipping Small Tools".into()),
            excerpt: Some("Notes on building software that solves one problem well.".into()),
            content: Some(
                "Most of our tools start as a script for a single chore. The ones that \
                 survive get tests, a README and a place on this site."
                    .into(),
            ),
            category: Some("Digital Forge".into()),
            tags: Some(vec!["software".into()]),
            ..Default::default()
        },
    ]
}

fn sample_projects() -> Vec<CreateProjectRequest> {
    vec![
        CreateProjectRequest {
            title: Some("Keyline Water Plan".into()),
            description: Some("Swales and ponds laid out along the farm's keylines.".into()),
            category: Some("Land Lab".into()),
            technologies: Some(vec!["QGIS".into(), "Laser level".into()]),
            status: Some("In Progress".into()),
            featured: Some(true),
            order: Some(1),
            latitude: Some(json!(44.2601)),
            longitude: Some(json!(-72.5754)),
            ..Default::default()
        },
        CreateProjectRequest {
            title: Some("Parcel Mapper".into()),
            description: Some("Web map of soil surveys and field boundaries.".into()),
            category: Some("GIS".into()),
            technologies: Some(vec!["Leaflet".into(), "PostGIS".into()]),
            status: Some("Completed".into()),
            order: Some(2),
            latitude: Some(json!(44.4759)),
            longitude: Some(json!(-73.2121)),
            ..Default::default()
        },
        CreateProjectRequest {
            title: Some("Site Backend".into()),
            description: Some("The API serving this website's posts and projects.".into()),
            category: Some("Digital Forge".into()),
            technologies: Some(vec!["Rust".into(), "SQLite".into()]),
            status: Some("Ongoing".into()),
            order: Some(3),
            latitude: Some(json!("43.6591")),
            longitude: Some(json!("-70.2568")),
            ..Default::default()
        },
    ]
}

/// Replace all posts and projects with the sample set.
pub async fn run(repo: &Repository) -> Result<SeedSummary, AppError> {
    let removed_posts = repo.delete_all_posts().await?;
    let removed_projects = repo.delete_all_projects().await?;
    tracing::info!(
        posts = removed_posts,
        projects = removed_projects,
        "Cleared existing content"
    );

    let mut summary = SeedSummary {
        posts: 0,
        projects: 0,
    };

    for request in sample_posts() {
        let post = request.validate()?;
        repo.create_post(&post).await?;
        summary.posts += 1;
    }

    for request in sample_projects() {
        let project = request.validate()?;
        repo.create_project(&project).await?;
        summary.projects += 1;
    }

    tracing::info!(
        posts = summary.posts,
        projects = summary.projects,
        "Seeded sample content"
    );
    Ok(summary)
}
