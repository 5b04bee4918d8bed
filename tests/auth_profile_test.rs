mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{read_json, TestApp, DEFAULT_CUSTOMER_PASSWORD};

/// Places a first order so the customer account for `email` exists.
async fn register_via_order(app: &TestApp, email: &str) {
    let product_id = app.create_product("Baklava Royale", "12.00").await;
    let response = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Amal Ben Salah",
                "customerEmail": email,
                "items": [{ "productId": product_id, "quantity": 1 }],
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::CREATED);
}

#[tokio::test]
async fn provisioned_customers_can_log_in_with_the_default_password() {
    let app = TestApp::new().await;
    register_via_order(&app, "amal@example.com").await;

    let response = app
        .post(
            "/api/auth/login",
            json!({ "email": "amal@example.com", "password": DEFAULT_CUSTOMER_PASSWORD }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;
    assert!(body["token"].as_str().unwrap().len() > 20);
    assert_eq!(body["user"]["username"], "amal@example.com");
    assert_eq!(body["user"]["role"], "customer");
    assert!(body["user"]["customerId"].is_string());
}

#[tokio::test]
async fn wrong_password_and_unknown_user_fail_identically() {
    let app = TestApp::new().await;
    register_via_order(&app, "amal@example.com").await;

    let wrong_password = app
        .post(
            "/api/auth/login",
            json!({ "email": "amal@example.com", "password": "nope" }),
        )
        .await;
    assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
    let wrong_body = read_json(wrong_password).await;

    let unknown_user = app
        .post(
            "/api/auth/login",
            json!({ "email": "ghost@example.com", "password": "nope" }),
        )
        .await;
    assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);
    let unknown_body = read_json(unknown_user).await;

    // Same message both ways, so responses never reveal which accounts exist.
    assert_eq!(wrong_body["error"], unknown_body["error"]);
}

#[tokio::test]
async fn profile_routes_require_a_valid_token() {
    let app = TestApp::new().await;

    let missing = app.get("/api/profile").await;
    assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

    let garbage = app
        .request(Method::GET, "/api/profile", None, Some("not-a-token"))
        .await;
    assert_eq!(garbage.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn profile_returns_the_customer_their_orders_and_notifications() {
    let app = TestApp::new().await;
    register_via_order(&app, "amal@example.com").await;
    let token = app
        .login("amal@example.com", DEFAULT_CUSTOMER_PASSWORD)
        .await;

    let response = app
        .request(Method::GET, "/api/profile", None, Some(&token))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = read_json(response).await;

    assert_eq!(body["customer"]["email"], "amal@example.com");
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let notifications = body["notifications"].as_array().unwrap();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0]["title"], "Welcome to Omrani's Pastery!");
    assert_eq!(notifications[0]["is_read"], false);
}

#[tokio::test]
async fn notifications_can_only_be_marked_read_by_their_owner() {
    let app = TestApp::new().await;
    register_via_order(&app, "amal@example.com").await;

    let other_product = app.create_product("Saffron Ring", "7.50").await;
    let other = app
        .post(
            "/api/orders",
            json!({
                "customerName": "Youssef",
                "customerEmail": "youssef@example.com",
                "items": [{ "productId": other_product, "quantity": 1 }],
            }),
        )
        .await;
    assert_eq!(other.status(), StatusCode::CREATED);

    let amal_token = app
        .login("amal@example.com", DEFAULT_CUSTOMER_PASSWORD)
        .await;
    let youssef_token = app
        .login("youssef@example.com", DEFAULT_CUSTOMER_PASSWORD)
        .await;

    let profile = read_json(
        app.request(Method::GET, "/api/profile", None, Some(&amal_token))
            .await,
    )
    .await;
    let notification_id = profile["notifications"][0]["id"].as_str().unwrap().to_string();

    // Another customer cannot touch it.
    let forbidden = app
        .request(
            Method::PATCH,
            &format!("/api/notifications/{notification_id}/read"),
            None,
            Some(&youssef_token),
        )
        .await;
    assert_eq!(forbidden.status(), StatusCode::NOT_FOUND);

    // The owner can.
    let marked = app
        .request(
            Method::PATCH,
            &format!("/api/notifications/{notification_id}/read"),
            None,
            Some(&amal_token),
        )
        .await;
    assert_eq!(marked.status(), StatusCode::OK);

    let profile = read_json(
        app.request(Method::GET, "/api/profile", None, Some(&amal_token))
            .await,
    )
    .await;
    assert_eq!(profile["notifications"][0]["is_read"], true);
}

#[tokio::test]
async fn password_change_requires_the_current_password() {
    let app = TestApp::new().await;
    register_via_order(&app, "amal@example.com").await;
    let token = app
        .login("amal@example.com", DEFAULT_CUSTOMER_PASSWORD)
        .await;

    let wrong_current = app
        .request(
            Method::POST,
            "/api/profile/credentials",
            Some(json!({ "currentPassword": "wrong", "newPassword": "makroudh42" })),
            Some(&token),
        )
        .await;
    assert_eq!(wrong_current.status(), StatusCode::UNAUTHORIZED);

    let too_short = app
        .request(
            Method::POST,
            "/api/profile/credentials",
            Some(json!({
                "currentPassword": DEFAULT_CUSTOMER_PASSWORD,
                "newPassword": "abc",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(too_short.status(), StatusCode::BAD_REQUEST);

    let changed = app
        .request(
            Method::POST,
            "/api/profile/credentials",
            Some(json!({
                "currentPassword": DEFAULT_CUSTOMER_PASSWORD,
                "newPassword": "makroudh42",
            })),
            Some(&token),
        )
        .await;
    assert_eq!(changed.status(), StatusCode::OK);

    // Old password no longer works, new one does.
    let stale = app
        .post(
            "/api/auth/login",
            json!({ "email": "amal@example.com", "password": DEFAULT_CUSTOMER_PASSWORD }),
        )
        .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    app.login("amal@example.com", "makroudh42").await;
}
