use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use pastery_api::config::AppConfig;
use pastery_api::db::{establish_connection_from_app_config, run_migrations};
use pastery_api::events::{event_channel, process_events};
use pastery_api::{build_router, AppState};

pub const TEST_JWT_SECRET: &str = "test_secret_key_for_testing_purposes_only_32chars";
pub const DEFAULT_CUSTOMER_PASSWORD: &str = "pastery123";

/// Spins up the full application over a throwaway SQLite file. Each instance
/// gets its own database so tests can run in parallel.
pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    db_file: PathBuf,
    _event_task: tokio::task::JoinHandle<()>,
}

impl TestApp {
    pub async fn new() -> Self {
        let db_file =
            std::env::temp_dir().join(format!("pastery_test_{}.db", Uuid::new_v4().simple()));

        let cfg = Arc::new(AppConfig {
            database_url: None,
            sqlite_path: db_file.to_string_lossy().into_owned(),
            jwt_secret: TEST_JWT_SECRET.to_string(),
            jwt_expiration_secs: 3600,
            default_customer_password: DEFAULT_CUSTOMER_PASSWORD.to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            environment: "test".to_string(),
            log_level: "warn".to_string(),
            log_json: false,
            cors_allowed_origins: None,
            seed_on_start: false,
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 5,
            db_acquire_timeout_secs: 5,
            db_idle_timeout_secs: 60,
        });

        let db = Arc::new(
            establish_connection_from_app_config(&cfg)
                .await
                .expect("failed to open test database"),
        );
        run_migrations(&db).await.expect("migrations failed");

        let (event_sender, event_rx) = event_channel(256);
        let event_task = tokio::spawn(process_events(event_rx));

        let state = AppState::new(db, cfg, Arc::new(event_sender));
        let router = build_router(state.clone());

        Self {
            router,
            state,
            db_file,
            _event_task: event_task,
        }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(tok) = token {
            builder = builder.header("authorization", format!("Bearer {}", tok));
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("serialize request body"))
        } else {
            Body::empty()
        };

        self.router
            .clone()
            .oneshot(builder.body(body).expect("build request"))
            .await
            .expect("router error during test request")
    }

    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post(&self, uri: &str, body: Value) -> axum::response::Response {
        self.request(Method::POST, uri, Some(body), None).await
    }

    /// Creates a catalog product through the API and returns its id.
    pub async fn create_product(&self, name: &str, price: &str) -> Uuid {
        let response = self
            .post(
                "/api/products",
                json!({
                    "name": name,
                    "price": price,
                    "stock": 50,
                    "category": "Traditional",
                }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let body = read_json(response).await;
        body["id"]
            .as_str()
            .and_then(|raw| Uuid::parse_str(raw).ok())
            .expect("created product has an id")
    }

    /// Logs in through the API and returns the bearer token.
    pub async fn login(&self, username: &str, password: &str) -> String {
        let response = self
            .post(
                "/api/auth/login",
                json!({ "email": username, "password": password }),
            )
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = read_json(response).await;
        body["token"].as_str().expect("login returns token").to_string()
    }
}

impl Drop for TestApp {
    fn drop(&mut self) {
        let _ = std::fs::remove_file(&self.db_file);
    }
}

pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("read response body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("response body is JSON")
}
