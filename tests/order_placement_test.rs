mod common;

use std::str::FromStr;

use axum::http::{Method, StatusCode};
use rust_decimal::Decimal;
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};
use serde_json::json;

use common::{read_json, TestApp};
use pastery_api::entities::{customer, notification, order, order_item, user};

fn amal_order(product_id: uuid::Uuid, quantity: i64) -> serde_json::Value {
    json!({
        "customerName": "Amal Ben Salah",
        "customerEmail": "amal@example.com",
        "customerPhone": "+216 20 123 456",
        "customerAddress": "12 Rue de Kairouan",
        "items": [{ "productId": product_id, "quantity": quantity }],
    })
}

#[tokio::test]
async fn placing_an_order_creates_order_items_and_account_atomically() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Baklava Royale", "12.00").await;

    let response = app.post("/api/orders", amal_order(product_id, 2)).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;

    let placed = &body["order"];
    assert_eq!(placed["status"], "pending");
    assert!(placed["order_number"]
        .as_str()
        .unwrap()
        .starts_with("ORD-"));
    assert_eq!(
        Decimal::from_str(placed["total_amount"].as_str().unwrap()).unwrap(),
        Decimal::from_str("24.00").unwrap()
    );

    let db = app.state.db.as_ref();
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(order_item::Entity::find().count(db).await.unwrap(), 1);

    // The first order provisions exactly one customer, one login and one
    // welcome notification.
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(user::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(notification::Entity::find().count(db).await.unwrap(), 1);

    let account = user::Entity::find().one(db).await.unwrap().unwrap();
    assert_eq!(account.username, "amal@example.com");
    assert_eq!(account.role, user::UserRole::Customer);
}

#[tokio::test]
async fn repeat_orders_reuse_the_customer_and_refresh_contact_details() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Golden Croissant", "6.50").await;

    let first = app.post("/api/orders", amal_order(product_id, 1)).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal B. Salah",
                "customerEmail": "amal@example.com",
                "customerPhone": "+216 99 999 999",
                "items": [{ "productId": product_id, "quantity": 3 }],
            }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CREATED);

    let db = app.state.db.as_ref();
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(user::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(notification::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 2);

    let refreshed = customer::Entity::find().one(db).await.unwrap().unwrap();
    assert_eq!(refreshed.name, "Amal B. Salah");
    assert_eq!(refreshed.phone.as_deref(), Some("+216 99 999 999"));
}

#[tokio::test]
async fn unknown_product_rolls_back_the_entire_order() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Saffron Ring", "7.50").await;

    let response = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": "amal@example.com",
                "items": [
                    { "productId": product_id, "quantity": 1 },
                    { "productId": uuid::Uuid::new_v4(), "quantity": 1 },
                ],
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    // Nothing survives: no order, no lines, and no provisioned account.
    let db = app.state.db.as_ref();
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(order_item::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(user::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn client_supplied_total_is_ignored_in_favor_of_catalog_prices() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Heritage Torte", "45.00").await;

    let response = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": "amal@example.com",
                "total": "1.00",
                "items": [{ "productId": product_id, "quantity": 1, "unitPrice": "1.00" }],
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let body = read_json(response).await;
    assert_eq!(
        Decimal::from_str(body["order"]["total_amount"].as_str().unwrap()).unwrap(),
        Decimal::from_str("45.00").unwrap()
    );
}

#[tokio::test]
async fn order_item_prices_are_snapshots_of_the_catalog() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Rose Petal Muffin", "8.00").await;

    let response = app.post("/api/orders", amal_order(product_id, 1)).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    // Reprice the product after the order.
    let update = app
        .request(
            Method::PUT,
            &format!("/api/products/{product_id}"),
            Some(json!({
                "name": "Rose Petal Muffin",
                "price": "10.00",
                "stock": 50,
            })),
            None,
        )
        .await;
    assert_eq!(update.status(), StatusCode::OK);

    let db = app.state.db.as_ref();
    let line = order_item::Entity::find().one(db).await.unwrap().unwrap();
    assert_eq!(line.price_at_purchase, Decimal::from_str("8.00").unwrap());
}

#[tokio::test]
async fn validation_failures_are_rejected_before_any_write() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Ma'amoul Legacy", "9.00").await;

    let no_items = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": "amal@example.com",
                "items": [],
            }),
        )
        .await;
    assert_eq!(no_items.status(), StatusCode::BAD_REQUEST);

    let bad_email = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": "not-an-email",
                "items": [{ "productId": product_id, "quantity": 1 }],
            }),
        )
        .await;
    assert_eq!(bad_email.status(), StatusCode::BAD_REQUEST);

    let zero_quantity = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": "amal@example.com",
                "items": [{ "productId": product_id, "quantity": 0 }],
            }),
        )
        .await;
    assert_eq!(zero_quantity.status(), StatusCode::BAD_REQUEST);

    let db = app.state.db.as_ref();
    assert_eq!(order::Entity::find().count(db).await.unwrap(), 0);
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 0);
}

#[tokio::test]
async fn concurrent_first_orders_for_one_email_never_duplicate_the_account() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Baklava Royale", "12.00").await;

    let (first, second) = tokio::join!(
        app.post("/api/orders", amal_order(product_id, 1)),
        app.post("/api/orders", amal_order(product_id, 2)),
    );

    // Both may win on SQLite's serialized writes, or the loser surfaces the
    // unique-email conflict. Either way at least one order lands and exactly
    // one account exists.
    let statuses = [first.status(), second.status()];
    assert!(statuses.contains(&StatusCode::CREATED));
    for status in statuses {
        assert!(
            status == StatusCode::CREATED || status == StatusCode::CONFLICT,
            "unexpected status {status}"
        );
    }

    let db = app.state.db.as_ref();
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 1);
    assert_eq!(
        user::Entity::find()
            .filter(user::Column::Username.eq("amal@example.com"))
            .count(db)
            .await
            .unwrap(),
        1
    );
    assert_eq!(notification::Entity::find().count(db).await.unwrap(), 1);
}

#[tokio::test]
async fn emails_are_matched_case_insensitively() {
    let app = TestApp::new().await;
    let product_id = app.create_product("Sesame Makroudh", "16.50").await;

    let first = app.post("/api/orders", amal_order(product_id, 1)).await;
    assert_eq!(first.status(), StatusCode::CREATED);

    let second = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": "AMAL@Example.com",
                "items": [{ "productId": product_id, "quantity": 1 }],
            }),
        )
        .await;
    assert_eq!(second.status(), StatusCode::CREATED);

    let db = app.state.db.as_ref();
    assert_eq!(customer::Entity::find().count(db).await.unwrap(), 1);
}
