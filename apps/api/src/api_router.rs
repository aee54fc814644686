mod cors;


use axum::Router;
use axum::middleware::from_fn_with_state;
use axum::routing::{get, post};
use marquee_core::AppError;
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::middleware::resolve_request_context;
use crate::state::AppState;

use self::cors::build_cors_layer;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let graphql_route = if app_state.debug {
        get(handlers::graphql::graphiql_handler).post(handlers::graphql::graphql_handler)
    } else {
        post(handlers::graphql::graphql_handler)
    };

    let graphql_routes = Router::new()
        .route("/graphql", graphql_route)
        .route_layer(from_fn_with_state(app_state.clone(), resolve_request_context));

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(graphql_routes)
        .layer(TraceLayer::new_for_http())
        .layer(build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
