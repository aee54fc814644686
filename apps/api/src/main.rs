//! Marquee API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod api_services;
mod error;
mod graphql;
mod handlers;
mod middleware;
mod state;

#[cfg(test)]
mod test_support;

use std::sync::Arc;

use marquee_core::AppError;
use marquee_infrastructure::Argon2PasswordHasher;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;
    let Some(store) = api_services::open_item_store(&config).await? else {
        return Ok(());
    };

    let services = api_services::build_app_services(
        store,
        Arc::new(Argon2PasswordHasher::new()),
        &config.app_version,
    );
    api_services::install_root(&services, &config).await?;

    let app_state = AppState {
        schema: graphql::build_schema(services.clone()),
        services,
        debug: config.debug,
    };
    let app = api_router::build_router(app_state, &config.frontend_url)?;

    let address = config.socket_address()?;
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind {address}: {error}")))?;

    info!(%address, debug = config.debug, "marquee api listening");
    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("server error: {error}")))
}
