pub mod auth;
pub mod config;
pub mod db;
pub mod entities;
pub mod errors;
pub mod events;
pub mod handlers;
pub mod migrator;
pub mod seed;
pub mod services;

use std::sync::Arc;

use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, AuthConfig, AuthService};
use crate::config::AppConfig;
use crate::db::DbPool;
use crate::events::EventSender;
use crate::handlers::AppServices;

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub db: Arc<DbPool>,
    pub config: Arc<AppConfig>,
    pub services: AppServices,
    pub auth: Arc<AuthService>,
    pub event_sender: Arc<EventSender>,
}

impl AppState {
    pub fn new(db: Arc<DbPool>, config: Arc<AppConfig>, event_sender: Arc<EventSender>) -> Self {
        let auth = Arc::new(AuthService::new(
            AuthConfig {
                jwt_secret: config.jwt_secret.clone(),
                token_expiration_secs: config.jwt_expiration_secs,
            },
            db.clone(),
        ));
        let services = AppServices::new(
            db.clone(),
            event_sender.clone(),
            config.default_customer_password.clone(),
        );
        Self {
            db,
            config,
            services,
            auth,
            event_sender,
        }
    }
}

/// Builds the full application router. Routes under the profile group require
/// a bearer token; everything else is open, matching a storefront where
/// browsing and checkout work without an account.
pub fn build_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/profile", get(handlers::profile::get_profile))
        .route(
            "/api/profile/credentials",
            post(handlers::profile::change_password),
        )
        .route(
            "/api/notifications/:id/read",
            patch(handlers::profile::mark_notification_read),
        )
        .layer(middleware::from_fn_with_state(
            state.auth.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .route(
            "/api/products",
            get(handlers::products::list_products).post(handlers::products::create_product),
        )
        .route(
            "/api/products/:id",
            get(handlers::products::get_product)
                .put(handlers::products::update_product)
                .delete(handlers::products::delete_product),
        )
        .route(
            "/api/orders",
            get(handlers::orders::list_orders).post(handlers::orders::place_order),
        )
        .route("/api/orders/:id", get(handlers::orders::get_order))
        .route(
            "/api/orders/:id/status",
            patch(handlers::orders::update_order_status),
        )
        .route(
            "/api/gallery",
            get(handlers::gallery::list_gallery).post(handlers::gallery::create_gallery_item),
        )
        .route(
            "/api/gallery/:id",
            delete(handlers::gallery::delete_gallery_item),
        )
        .route(
            "/api/settings",
            get(handlers::settings::get_settings).post(handlers::settings::update_settings),
        )
        .route("/api/offers", get(handlers::offers::list_offers))
        .route("/api/auth/login", post(handlers::auth::login))
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
