use std::{net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::{extract::State, http::StatusCode, routing::get, Router};
use server_api::ApiContext;
use storage::{Storage, DEMO_ADMIN_EMAIL};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod context;
mod layout;
mod pages;
mod pipeline;
mod session;
mod views;

use app_state::AppState;
use crate::config::{load_settings, prepare_database_url};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let settings = load_settings()?;
    if settings.uses_dev_secret() {
        warn!("using the development session secret; set APP__SESSION_SECRET in production");
    }

    let database_url = prepare_database_url(&settings.database_url)?;
    let storage = Storage::new(&database_url).await.map_err(|err| {
        error!(
            database_url = %database_url,
            error = %format!("{err:#}"),
            "failed to initialize storage"
        );
        err
    })?;

    if settings.seed_demo_data && storage.seed_demo_data(&settings.demo_admin_password).await? {
        info!(email = DEMO_ADMIN_EMAIL, "seeded demo data");
    }

    let state = AppState::new(Arc::new(ApiContext { storage }), &settings);
    let app = build_router(Arc::new(state));

    let addr: SocketAddr = settings
        .bind_addr
        .parse()
        .with_context(|| format!("invalid bind address '{}'", settings.bind_addr))?;
    info!(%addr, "hotel server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    let body_limit = state.max_body_bytes;
    Router::new()
        .route("/healthz", get(healthz))
        .merge(pages::routes())
        .merge(api::routes())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .with_state(state)
}

async fn healthz(State(state): State<Arc<AppState>>) -> (StatusCode, &'static str) {
    if state.actions.health_check().await.is_ok() {
        (StatusCode::OK, "ok")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "unavailable")
    }
}

#[cfg(test)]
#[path = "tests/support.rs"]
mod test_support;

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
