use super::*;

#[tokio::test]
async fn list_media_on_empty_gallery() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let response = app
        .oneshot(Request::builder().uri("/media").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["total"], 0);
    assert_eq!(body["count"], 0);
    assert_eq!(body["media"], serde_json::json!([]));
}

#[tokio::test]
async fn list_media_paginates_with_bookkeeping() {
    let (gallery, _dir) = create_test_gallery().await;

    for i in 0..3 {
        seed_media(
            &gallery,
            &format!("https://cdn.example.com/m{}.jpg", i),
            &format!("g/m{}", i),
            MediaKind::Image,
        )
        .await;
    }

    let app = test_router(&gallery);
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media?page=1&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;

    assert_eq!(body["count"], 2);
    assert_eq!(body["total"], 3);
    assert_eq!(body["page"], 1);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["hasNextPage"], true);
    assert_eq!(body["hasPrevPage"], false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/media?page=2&limit=2")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;

    assert_eq!(body["count"], 1);
    assert_eq!(body["hasNextPage"], false);
    assert_eq!(body["hasPrevPage"], true);
}

#[tokio::test]
async fn list_media_filters_by_kind_and_rejects_bogus_filter() {
    let (gallery, _dir) = create_test_gallery().await;
    seed_media(&gallery, "https://cdn.example.com/a.jpg", "g/a", MediaKind::Image).await;
    seed_media(&gallery, "https://cdn.example.com/b.mp4", "g/b", MediaKind::Video).await;

    let app = test_router(&gallery);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/media?type=video")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = body_json(response).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["media"][0]["kind"], "video");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/media?type=audio")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn get_media_by_id_and_missing() {
    let (gallery, _dir) = create_test_gallery().await;
    let id = seed_media(&gallery, "https://cdn.example.com/a.jpg", "g/a", MediaKind::Image).await;

    let app = test_router(&gallery);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri(format!("/media/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["media"]["storage_key"], "g/a");

    let response = app
        .oneshot(
            Request::builder()
                .uri("/media/9999")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Media not found");
}

#[tokio::test]
async fn upload_registers_items_and_reports_per_item_failures() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let request_body = serde_json::json!({
        "items": [
            {"url": "https://cdn.example.com/ok.jpg", "storage_key": "g/ok", "kind": "image"},
            {"url": "not a url", "storage_key": "g/bad", "kind": "image"},
            {"url": "https://cdn.example.com/blank.jpg", "storage_key": "  ", "kind": "image"}
        ]
    });

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/media/upload")
                .header("content-type", "application/json")
                .body(Body::from(request_body.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["registered"], 1);
    assert_eq!(body["failed"], 2);
    assert_eq!(body["media"][0]["storage_key"], "g/ok");
    assert_eq!(body["errors"].as_array().unwrap().len(), 2);

    // Only the valid item landed in the database
    assert_eq!(gallery.db.count_media(None, None).await.unwrap(), 1);
}

#[tokio::test]
async fn upload_with_no_items_is_rejected() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/media/upload")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"items": []}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn caption_update_and_delete_lifecycle() {
    let (gallery, _dir) = create_test_gallery().await;
    let id = seed_media(&gallery, "https://cdn.example.com/a.jpg", "g/a", MediaKind::Image).await;

    let app = test_router(&gallery);

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri(format!("/media/{}/caption", id))
                .header("content-type", "application/json")
                .body(Body::from(r#"{"caption": "  holiday photo  "}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Caption updated successfully");
    assert_eq!(body["media"]["caption"], "holiday photo");

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("DELETE")
                .uri(format!("/media/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["message"], "Media deleted successfully");

    // Gone now
    let response = app
        .oneshot(
            Request::builder()
                .uri(format!("/media/{}", id))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn caption_update_of_missing_record_is_404() {
    let (gallery, _dir) = create_test_gallery().await;
    let app = test_router(&gallery);

    let response = app
        .oneshot(
            Request::builder()
                .method("PATCH")
                .uri("/media/424242/caption")
                .header("content-type", "application/json")
                .body(Body::from(r#"{"caption": "x"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
