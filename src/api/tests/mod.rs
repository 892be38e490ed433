use super::*;
use crate::MediaGallery;
use crate::config::Config;
use crate::types::{MediaKind, NewMediaRecord};
use axum::body::Body;
use axum::http::Request;
use axum::http::StatusCode;
use std::time::Duration;
use tempfile::TempDir;
use tower::ServiceExt;

mod media;

/// Helper to create a test MediaGallery with a scratch database
pub(crate) async fn create_test_gallery() -> (Arc<MediaGallery>, TempDir) {
    create_test_gallery_with(|_| {}).await
}

/// Helper to create a test gallery with config adjustments
pub(crate) async fn create_test_gallery_with(
    adjust: impl FnOnce(&mut Config),
) -> (Arc<MediaGallery>, TempDir) {
    let dir = TempDir::new().unwrap();
    let mut config = Config {
        persistence: crate::config::PersistenceConfig {
            database_path: dir.path().join("test.db"),
        },
        ..Default::default()
    };
    adjust(&mut config);

    let gallery = MediaGallery::new(config).await.unwrap();
    (Arc::new(gallery), dir)
}

/// Helper to build the router for a gallery
pub(crate) fn test_router(gallery: &Arc<MediaGallery>) -> Router {
    create_router(gallery.clone(), gallery.config.clone())
}

/// Helper to register one media record directly in the database
pub(crate) async fn seed_media(
    gallery: &MediaGallery,
    url: &str,
    storage_key: &str,
    kind: MediaKind,
) -> crate::types::MediaId {
    gallery
        .db
        .insert_media(&NewMediaRecord {
            url: url.to_string(),
            storage_key: storage_key.to_string(),
            kind,
            caption: String::new(),
        })
        .await
        .unwrap()
}

/// Helper to drain a response body into JSON
pub(crate) async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_endpoint() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn test_cors_enabled() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let request = Request::builder()
        .uri("/health")
        .header("Origin", "http://localhost:3000")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin"),
        "CORS header should be present when CORS is enabled"
    );
}

#[tokio::test]
async fn test_openapi_json_endpoint() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert!(json["openapi"].as_str().unwrap().starts_with("3."));
    assert_eq!(json["info"]["title"], "media-gallery REST API");
    assert!(json["paths"]["/media/download/zip"]["get"].is_object());
}

#[tokio::test]
async fn test_swagger_ui_disabled() {
    let (gallery, _dir) = create_test_gallery_with(|config| {
        config.api.swagger_ui = false;
    })
    .await;
    let app = test_router(&gallery);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/swagger-ui/")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        response.status(),
        StatusCode::NOT_FOUND,
        "Swagger UI should not be accessible when disabled"
    );
}

#[tokio::test]
async fn test_server_starts_and_responds_to_health() {
    let (gallery, _dir) = create_test_gallery().await;

    // Bind to a random available port (port 0)
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server_gallery = gallery.clone();
    let server_config = gallery.config.clone();
    let server_handle = tokio::spawn(async move {
        let app = create_router(server_gallery, server_config);
        axum::serve(listener, app).await.unwrap();
    });

    // Give the server a moment to start
    tokio::time::sleep(Duration::from_millis(100)).await;

    let client = reqwest::Client::new();
    let response = client
        .get(format!("http://{}/health", addr))
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), reqwest::StatusCode::OK);

    let body = response.json::<serde_json::Value>().await.unwrap();
    assert_eq!(body["status"], "ok");

    server_handle.abort();
}
