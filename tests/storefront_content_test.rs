mod common;

use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use sea_orm::{ActiveModelTrait, Set};
use serde_json::json;

use common::{read_json, TestApp};
use pastery_api::entities::offer;

#[tokio::test]
async fn gallery_items_can_be_added_listed_and_removed() {
    let app = TestApp::new().await;

    let created = app
        .post(
            "/api/gallery",
            json!({
                "url": "/images/media/media.jpg",
                "title": "Traditional Preparation",
                "description": "Expertly crafting Makroudh using traditional methods.",
            }),
        )
        .await;
    assert_eq!(created.status(), StatusCode::CREATED);
    let body = read_json(created).await;
    let id = body["id"].as_str().unwrap().to_string();
    // Media type defaults to image when omitted.
    assert_eq!(body["media_type"], "image");

    let video = app
        .post(
            "/api/gallery",
            json!({
                "url": "https://www.youtube.com/embed/dQw4w9WgXcQ",
                "mediaType": "video",
                "title": "The Art of Makroudh",
                "thumbnailUrl": "/images/media/media6.jpg",
            }),
        )
        .await;
    assert_eq!(video.status(), StatusCode::CREATED);

    let listed = app.get("/api/gallery").await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body = read_json(listed).await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let deleted = app
        .request(Method::DELETE, &format!("/api/gallery/{id}"), None, None)
        .await;
    assert_eq!(deleted.status(), StatusCode::OK);

    let missing = app
        .request(Method::DELETE, &format!("/api/gallery/{id}"), None, None)
        .await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn gallery_items_without_a_url_are_rejected() {
    let app = TestApp::new().await;
    let response = app
        .post("/api/gallery", json!({ "url": "", "title": "Untitled" }))
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn settings_upsert_and_read_back_as_a_flat_object() {
    let app = TestApp::new().await;

    let empty = read_json(app.get("/api/settings").await).await;
    assert_eq!(empty, json!({}));

    let first = app
        .post(
            "/api/settings",
            json!({ "storeName": "Omrani's Pastery", "phone": "+216 77 123 456" }),
        )
        .await;
    assert_eq!(first.status(), StatusCode::OK);

    // Updating an existing key overwrites it and leaves the rest alone.
    let second = app
        .post("/api/settings", json!({ "storeName": "Pastery Omrani" }))
        .await;
    assert_eq!(second.status(), StatusCode::OK);

    let settings = read_json(app.get("/api/settings").await).await;
    assert_eq!(settings["storeName"], "Pastery Omrani");
    assert_eq!(settings["phone"], "+216 77 123 456");
}

#[tokio::test]
async fn empty_settings_payload_is_rejected() {
    let app = TestApp::new().await;
    let response = app.post("/api/settings", json!({})).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn only_live_offers_are_listed() {
    let app = TestApp::new().await;
    let db = app.state.db.as_ref();
    let now = Utc::now();

    for (title, is_active, ends_at) in [
        ("Winter Collection", true, None),
        ("Eid Special", true, Some(now + Duration::days(7))),
        ("Expired Promo", true, Some(now - Duration::days(1))),
        ("Disabled Promo", false, None),
    ] {
        offer::ActiveModel {
            id: Set(uuid::Uuid::new_v4()),
            title: Set(title.to_string()),
            description: Set(None),
            discount_percent: Set(None),
            is_active: Set(is_active),
            starts_at: Set(None),
            ends_at: Set(ends_at),
            created_at: Set(now),
        }
        .insert(db)
        .await
        .unwrap();
    }

    let response = app.get("/api/offers").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    let titles: Vec<&str> = body
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["title"].as_str().unwrap())
        .collect();

    assert_eq!(titles.len(), 2);
    assert!(titles.contains(&"Winter Collection"));
    assert!(titles.contains(&"Eid Special"));
}

#[tokio::test]
async fn health_reports_ok_with_a_live_database() {
    let app = TestApp::new().await;
    let response = app.get("/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "up");
}
