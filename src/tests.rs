//! Integration tests for the site backend.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use reqwest::Client;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use crate::config::{Config, LogFormat};
use crate::db::{init_database, Repository};
use crate::{create_router, seed, AppState};

/// Test fixture for integration tests.
struct TestFixture {
    client: Client,
    base_url: String,
    repo: Arc<Repository>,
    _temp_dir: TempDir,
}

fn test_config(db_path: std::path::PathBuf) -> Config {
    Config {
        db_path,
        bind_addr: "127.0.0.1:0".parse().unwrap(),
        log_level: "warn".to_string(),
        log_format: LogFormat::Pretty,
        frontend_url: "http://localhost:5173".to_string(),
    }
}

impl TestFixture {
    async fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.sqlite");

        // Initialize database
        let pool = init_database(&db_path).await.expect("Failed to init DB");
        let repo = Arc::new(Repository::new(pool));

        let state = AppState {
            repo: repo.clone(),
            config: Arc::new(test_config(db_path)),
        };

        let app = create_router(state);

        // Bind to random port
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind");
        let addr = listener.local_addr().expect("Failed to get addr");
        let base_url = format!("http://{}", addr);

        // Spawn server
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        // Wait for server to start
        tokio::time::sleep(tokio::time::Duration::from_millis(100)).await;

        TestFixture {
            client: Client::new(),
            base_url,
            repo,
            _temp_dir: temp_dir,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get(&self, path: &str) -> (u16, Value) {
        let resp = self.client.get(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn post(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .post(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn put(&self, path: &str, body: Value) -> (u16, Value) {
        let resp = self
            .client
            .put(self.url(path))
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }

    async fn delete(&self, path: &str) -> (u16, Value) {
        let resp = self.client.delete(self.url(path)).send().await.unwrap();
        let status = resp.status().as_u16();
        (status, resp.json().await.unwrap())
    }
}

fn post_body(title: &str) -> Value {
    json!({
        "title": title,
        "excerpt": "A short excerpt",
        "content": "Body text",
        "category": "Land Lab"
    })
}

fn project_body(title: &str, order: i64) -> Value {
    json!({
        "title": title,
        "description": "A project",
        "category": "GIS",
        "order": order,
        "latitude": 44.5,
        "longitude": -71.25
    })
}

const MISSING_ID: &str = "6f1c2a9e-0b7d-4c1e-9a53-2d8f0e4b7c61";

// ============================================================================
// Health & routing
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let fixture = TestFixture::new().await;

    for path in ["/health", "/api/health"] {
        let (status, body) = fixture.get(path).await;
        assert_eq!(status, 200);
        assert_eq!(body["status"], "success");
        assert_eq!(body["message"], "API is running");
        assert!(body["timestamp"].as_str().unwrap().ends_with('Z'));
    }
}

#[tokio::test]
async fn test_health_check_without_network() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.sqlite");
    let pool = init_database(&db_path).await.unwrap();

    let app = create_router(AppState {
        repo: Arc::new(Repository::new(pool)),
        config: Arc::new(test_config(db_path)),
    });

    let resp = app
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["status"], "success");
}

#[tokio::test]
async fn test_unknown_route_returns_not_found_envelope() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get("/api/nope").await;
    assert_eq!(status, 404);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Not Found - /api/nope");
}

#[tokio::test]
async fn test_wrong_method_returns_not_found_envelope() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.delete("/api/posts").await;
    assert_eq!(status, 404);
    assert_eq!(body["status"], "error");
    assert_eq!(body["message"], "Not Found - /api/posts");

    let (status, body) = fixture.get(&format!("/api/posts/id/{}", MISSING_ID)).await;
    assert_eq!(status, 404);
    assert_eq!(
        body["message"],
        format!("Not Found - /api/posts/id/{}", MISSING_ID)
    );
}

#[tokio::test]
async fn test_undecodable_path_uses_error_envelope() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .get(fixture.url("/api/posts/%FF"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert_eq!(
        resp.headers()["content-type"].to_str().unwrap(),
        "application/json"
    );
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
    assert!(body["message"].as_str().unwrap().contains("slug"));
}

#[tokio::test]
async fn test_malformed_json_body() {
    let fixture = TestFixture::new().await;

    let resp = fixture
        .client
        .post(fixture.url("/api/posts"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "error");
}

// ============================================================================
// Posts
// ============================================================================

#[tokio::test]
async fn test_post_crud() {
    let fixture = TestFixture::new().await;

    // Create
    let (status, body) = fixture.post("/api/posts", post_body("Hello, World!")).await;
    assert_eq!(status, 201);
    assert_eq!(body["status"], "success");
    let post = &body["data"];
    assert_eq!(post["slug"], "hello-world");
    assert_eq!(post["author"], "Team");
    assert_eq!(post["published"], true);
    assert_eq!(post["views"], 0);
    let id = post["id"].as_str().unwrap().to_string();

    // Update the title; slug follows
    let (status, body) = fixture
        .put(
            &format!("/api/posts/id/{}", id),
            json!({"title": "Second Draft"}),
        )
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Second Draft");
    assert_eq!(body["data"]["slug"], "second-draft");
    assert_eq!(body["data"]["excerpt"], "A short excerpt");

    // Old slug is gone
    let (status, _) = fixture.get("/api/posts/hello-world").await;
    assert_eq!(status, 404);

    // Delete
    let (status, body) = fixture.delete(&format!("/api/posts/id/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Post deleted successfully");
    assert!(body.get("data").is_none());

    let (status, body) = fixture.delete(&format!("/api/posts/id/{}", id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Post not found");
}

#[tokio::test]
async fn test_post_views_increment_per_fetch() {
    let fixture = TestFixture::new().await;
    fixture.post("/api/posts", post_body("Counting Views")).await;

    let (status, body) = fixture.get("/api/posts/counting-views").await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["views"], 1);

    let (_, body) = fixture.get("/api/posts/counting-views").await;
    assert_eq!(body["data"]["views"], 2);
}

#[tokio::test]
async fn test_unpublished_posts_are_hidden() {
    let fixture = TestFixture::new().await;

    let mut draft = post_body("Draft Only");
    draft["published"] = json!(false);
    let (status, _) = fixture.post("/api/posts", draft).await;
    assert_eq!(status, 201);
    fixture.post("/api/posts", post_body("Out In Public")).await;

    let (status, body) = fixture.get("/api/posts").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["slug"], "out-in-public");

    let (status, _) = fixture.get("/api/posts/draft-only").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn test_post_listing_filters() {
    let fixture = TestFixture::new().await;

    let mut featured = post_body("Featured Story");
    featured["featured"] = json!(true);
    featured["category"] = json!("Research");
    fixture.post("/api/posts", featured).await;
    fixture.post("/api/posts", post_body("Plain Story")).await;
    fixture.post("/api/posts", post_body("Newest Story")).await;

    // Newest first
    let (_, body) = fixture.get("/api/posts").await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"][0]["slug"], "newest-story");

    let (_, body) = fixture.get("/api/posts?featured=true").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["slug"], "featured-story");

    let (_, body) = fixture.get("/api/posts?featured=false").await;
    assert_eq!(body["count"], 2);

    let (_, body) = fixture.get("/api/posts?category=Research").await;
    assert_eq!(body["count"], 1);

    let (_, body) = fixture.get("/api/posts?limit=2").await;
    assert_eq!(body["count"], 2);

    let (status, _) = fixture.get("/api/posts?limit=-1").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_post_slug_collision_is_rejected() {
    let fixture = TestFixture::new().await;

    let (status, _) = fixture.post("/api/posts", post_body("Same Title")).await;
    assert_eq!(status, 201);

    let (status, body) = fixture.post("/api/posts", post_body("Same  Title!")).await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "error");
    assert_eq!(body["errors"][0]["field"], "slug");
}

#[tokio::test]
async fn test_post_slug_keeps_only_ascii_alphanumerics() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.post("/api/posts", post_body("Café Notes")).await;
    assert_eq!(status, 201);
    assert_eq!(body["data"]["slug"], "caf-notes");

    let (status, body) = fixture.post("/api/posts", post_body("🌱")).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["field"], "slug");
}

#[tokio::test]
async fn test_post_validation_lists_every_field() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post("/api/posts", json!({"category": "Gardening"}))
        .await;
    assert_eq!(status, 400);
    assert!(body["message"]
        .as_str()
        .unwrap()
        .starts_with("Validation failed"));

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "excerpt", "content", "category"]);
}

#[tokio::test]
async fn test_post_malformed_id() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .put("/api/posts/id/not-an-id", json!({"title": "x"}))
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["status"], "error");

    let (status, _) = fixture.delete("/api/posts/id/not-an-id").await;
    assert_eq!(status, 400);
}

// ============================================================================
// Projects
// ============================================================================

#[tokio::test]
async fn test_project_create_and_get() {
    let fixture = TestFixture::new().await;

    let mut body = project_body("Parcel Mapper", 1);
    body["latitude"] = json!("44.5");
    let (status, body) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 201);
    let project = &body["data"];
    assert_eq!(project["latitude"], 44.5);
    assert_eq!(project["longitude"], -71.25);
    assert_eq!(project["status"], "In Progress");
    assert!(project["startDate"].as_str().is_some());
    assert!(project.get("completionDate").is_none());

    let id = project["id"].as_str().unwrap();
    let (status, body) = fixture.get(&format!("/api/projects/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["title"], "Parcel Mapper");
    assert_eq!(body["data"]["category"], "GIS");
}

#[tokio::test]
async fn test_project_create_requires_coordinate_pair() {
    let fixture = TestFixture::new().await;

    let mut body = project_body("No Longitude", 1);
    body.as_object_mut().unwrap().remove("longitude");
    let (status, body) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["message"], "Latitude and longitude are both required");

    let mut body = project_body("Nowhere", 1);
    body.as_object_mut().unwrap().remove("latitude");
    body.as_object_mut().unwrap().remove("longitude");
    let (status, _) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 400);

    let mut body = project_body("Off The Map", 1);
    body["latitude"] = json!(91);
    let (status, body) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["message"], "Latitude must be between -90 and 90");

    let mut body = project_body("Gibberish", 1);
    body["longitude"] = json!("east");
    let (status, body) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["message"], "Latitude and longitude must be valid numbers");

    // Bounds are inclusive
    let mut body = project_body("Date Line", 1);
    body["latitude"] = json!(-90);
    body["longitude"] = json!(180);
    let (status, _) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 201);
}

#[tokio::test]
async fn test_project_update_coordinates() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture
        .post("/api/projects", project_body("Moving Target", 1))
        .await;
    let path = format!("/api/projects/{}", body["data"]["id"].as_str().unwrap());

    // Only one coordinate
    let (status, body) = fixture.put(&path, json!({"latitude": 10})).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["message"], "Latitude and longitude are both required");

    // Neither coordinate leaves them untouched
    let (status, body) = fixture.put(&path, json!({"status": "Completed"})).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Completed");
    assert_eq!(body["data"]["latitude"], 44.5);
    assert_eq!(body["data"]["longitude"], -71.25);

    // Both replace the pair
    let (status, body) = fixture
        .put(&path, json!({"latitude": -33.9, "longitude": "151.2"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["latitude"], -33.9);
    assert_eq!(body["data"]["longitude"], 151.2);

    let (status, _) = fixture
        .put(&path, json!({"latitude": 0, "longitude": 181}))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_project_create_lists_coordinate_and_field_errors() {
    let fixture = TestFixture::new().await;

    let mut body = project_body("Untitled", 1);
    body.as_object_mut().unwrap().remove("title");
    body["latitude"] = json!(-95);
    let (status, body) = fixture.post("/api/projects", body).await;
    assert_eq!(status, 400);

    let fields: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, vec!["title", "latitude"]);
}

#[tokio::test]
async fn test_project_completion_date_can_be_cleared() {
    let fixture = TestFixture::new().await;

    let mut body = project_body("Finished Pond", 1);
    body["completionDate"] = json!("2024-05-01");
    let (_, body) = fixture.post("/api/projects", body).await;
    assert_eq!(body["data"]["completionDate"], "2024-05-01T00:00:00.000Z");
    let path = format!("/api/projects/{}", body["data"]["id"].as_str().unwrap());

    // Absent leaves it alone
    let (_, body) = fixture.put(&path, json!({"featured": true})).await;
    assert_eq!(body["data"]["completionDate"], "2024-05-01T00:00:00.000Z");

    let (status, body) = fixture.put(&path, json!({"completionDate": null})).await;
    assert_eq!(status, 200);
    assert!(body["data"].get("completionDate").is_none());

    let (_, body) = fixture.get(&path).await;
    assert!(body["data"].get("completionDate").is_none());
}

#[tokio::test]
async fn test_project_ordering() {
    let fixture = TestFixture::new().await;

    fixture.post("/api/projects", project_body("Third", 2)).await;
    fixture.post("/api/projects", project_body("Second", 1)).await;
    fixture.post("/api/projects", project_body("First", 1)).await;

    let (status, body) = fixture.get("/api/projects").await;
    assert_eq!(status, 200);
    assert_eq!(body["count"], 3);
    let titles: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["title"].as_str().unwrap())
        .collect();
    assert_eq!(titles, vec!["First", "Second", "Third"]);

    let (_, body) = fixture.get("/api/projects?limit=1").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "First");
}

#[tokio::test]
async fn test_project_filters() {
    let fixture = TestFixture::new().await;

    let mut featured = project_body("Showcase", 1);
    featured["featured"] = json!(true);
    featured["status"] = json!("Completed");
    fixture.post("/api/projects", featured).await;
    fixture.post("/api/projects", project_body("Side Quest", 2)).await;

    let (_, body) = fixture.get("/api/projects?featured=true").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "Showcase");

    let (_, body) = fixture.get("/api/projects?status=In%20Progress").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["title"], "Side Quest");

    let (_, body) = fixture.get("/api/projects?category=Homestead").await;
    assert_eq!(body["count"], 0);
}

#[tokio::test]
async fn test_project_not_found_and_malformed_id() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture.get(&format!("/api/projects/{}", MISSING_ID)).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Project not found");

    let (status, _) = fixture.delete(&format!("/api/projects/{}", MISSING_ID)).await;
    assert_eq!(status, 404);

    let (status, _) = fixture.get("/api/projects/12345").await;
    assert_eq!(status, 400);
}

// ============================================================================
// Contacts
// ============================================================================

#[tokio::test]
async fn test_contact_submission() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/contact",
            json!({
                "name": "  Sam Rivera ",
                "email": " Sam@Example.COM ",
                "subject": "Visiting the farm",
                "message": "Can we come by in May?"
            }),
        )
        .await;
    assert_eq!(status, 201);
    assert_eq!(
        body["message"],
        "Thank you for reaching out! We will get back to you soon."
    );
    let contact = &body["data"];
    assert_eq!(contact["name"], "Sam Rivera");
    assert_eq!(contact["email"], "sam@example.com");
    assert_eq!(contact["type"], "General Inquiry");
    assert_eq!(contact["status"], "New");
    assert_eq!(contact["replied"], false);
}

#[tokio::test]
async fn test_contact_marked_read_once() {
    let fixture = TestFixture::new().await;

    let (_, body) = fixture
        .post(
            "/api/contact",
            json!({
                "name": "Sam",
                "email": "sam@example.com",
                "subject": "Hello",
                "message": "Hi there",
                "type": "Partnership"
            }),
        )
        .await;
    let path = format!("/api/contact/{}", body["data"]["id"].as_str().unwrap());

    let (status, body) = fixture.get(&path).await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Read");
    assert_eq!(body["data"]["type"], "Partnership");

    let (status, body) = fixture
        .put(&path, json!({"status": "Replied", "replied": true, "notes": "Called back"}))
        .await;
    assert_eq!(status, 200);
    assert_eq!(body["data"]["status"], "Replied");

    // Later reads leave a handled submission alone
    let (_, body) = fixture.get(&path).await;
    assert_eq!(body["data"]["status"], "Replied");
    assert_eq!(body["data"]["notes"], "Called back");
}

#[tokio::test]
async fn test_contact_validation() {
    let fixture = TestFixture::new().await;

    let (status, body) = fixture
        .post(
            "/api/contact",
            json!({"name": "Sam", "email": "not-an-email", "subject": "Hi", "message": "Yo"}),
        )
        .await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"][0]["field"], "email");
    assert_eq!(
        body["errors"][0]["message"],
        "Please provide a valid email address"
    );

    let (status, body) = fixture.post("/api/contact", json!({})).await;
    assert_eq!(status, 400);
    assert_eq!(body["errors"].as_array().unwrap().len(), 4);

    let (status, _) = fixture
        .put(&format!("/api/contact/{}", MISSING_ID), json!({"status": "Lost"}))
        .await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn test_contact_listing_and_delete() {
    let fixture = TestFixture::new().await;

    for subject in ["One", "Two"] {
        fixture
            .post(
                "/api/contact",
                json!({
                    "name": "Sam",
                    "email": "sam@example.com",
                    "subject": subject,
                    "message": "Hi"
                }),
            )
            .await;
    }

    let (_, body) = fixture.get("/api/contact").await;
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["subject"], "Two");
    let id = body["data"][0]["id"].as_str().unwrap().to_string();

    fixture.get(&format!("/api/contact/{}", id)).await;
    let (_, body) = fixture.get("/api/contact?status=New").await;
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["subject"], "One");

    let (status, body) = fixture.delete(&format!("/api/contact/{}", id)).await;
    assert_eq!(status, 200);
    assert_eq!(body["message"], "Contact deleted successfully");

    let (status, body) = fixture.delete(&format!("/api/contact/{}", id)).await;
    assert_eq!(status, 404);
    assert_eq!(body["message"], "Contact not found");
}

// ============================================================================
// Seeding
// ============================================================================

#[tokio::test]
async fn test_seed_replaces_content() {
    let fixture = TestFixture::new().await;
    fixture.post("/api/posts", post_body("Old News")).await;

    let summary = seed::run(&fixture.repo).await.unwrap();
    assert_eq!(summary.posts, 4);
    assert_eq!(summary.projects, 3);

    let (_, body) = fixture.get("/api/posts").await;
    assert_eq!(body["count"], 4);
    let (status, _) = fixture.get("/api/posts/old-news").await;
    assert_eq!(status, 404);

    let (_, body) = fixture.get("/api/projects").await;
    assert_eq!(body["count"], 3);
    assert_eq!(body["data"][0]["order"], 1);

    // Running again is idempotent
    let summary = seed::run(&fixture.repo).await.unwrap();
    assert_eq!(summary.posts, 4);
    let (_, body) = fixture.get("/api/posts").await;
    assert_eq!(body["count"], 4);
}
