use std::net::SocketAddr;
use std::sync::Arc;

use axum::http::HeaderValue;
use tokio::signal;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use pastery_api::config::{init_tracing, load_config};
use pastery_api::db::{establish_connection_from_app_config, run_migrations};
use pastery_api::events::{event_channel, process_events};
use pastery_api::seed::seed_if_empty;
use pastery_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = Arc::new(load_config()?);
    init_tracing(&cfg.log_level, cfg.log_json);
    info!(environment = %cfg.environment, "starting pastery-api");

    let db = Arc::new(establish_connection_from_app_config(&cfg).await?);
    run_migrations(&db).await?;

    if cfg.seed_on_start {
        seed_if_empty(&db, &cfg.default_customer_password).await?;
    }

    let (event_sender, event_rx) = event_channel(1024);
    tokio::spawn(process_events(event_rx));

    let state = AppState::new(db, cfg.clone(), Arc::new(event_sender));
    let app = build_router(state).layer(build_cors_layer(&cfg));

    let addr = SocketAddr::new(cfg.host.parse()?, cfg.port);
    info!("pastery-api listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down cleanly");
    Ok(())
}

/// Explicit origins from config when present, permissive otherwise. The
/// storefront is served from a separate origin in every deployment.
fn build_cors_layer(cfg: &pastery_api::config::AppConfig) -> CorsLayer {
    let configured: Option<Vec<HeaderValue>> = cfg
        .cors_allowed_origins
        .as_ref()
        .map(|raw| {
            raw.split(',')
                .filter_map(|origin| {
                    let trimmed = origin.trim();
                    if trimmed.is_empty() {
                        None
                    } else {
                        HeaderValue::from_str(trimmed).ok()
                    }
                })
                .collect::<Vec<_>>()
        })
        .filter(|origins| !origins.is_empty());

    match configured {
        Some(origins) => CorsLayer::new()
            .allow_origin(origins)
            .allow_methods(Any)
            .allow_headers(Any),
        None => {
            info!("no CORS origins configured, allowing any origin");
            CorsLayer::permissive()
        }
    }
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        let mut sigterm =
            signal(SignalKind::terminate()).expect("failed to install signal handler");
        sigterm.recv().await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
