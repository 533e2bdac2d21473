pub mod auth;
pub mod handlers;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use self::auth::api_key_middleware;
use self::handlers::*;
use crate::http::AppState;

/// Routes for reading and changing configuration at runtime.
///
/// Reads are open; updates and reloads pass through the API key check.
pub fn setup_config_router(state: AppState) -> Router {
    let mutating = Router::new()
        .route("/config/reload", post(reload_config))
        .route("/config/{section}/{key}", post(update_config))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api_key_middleware,
        ));

    Router::new()
        .route("/", get(get_root))
        .route("/config", get(get_config))
        .route("/config/", get(get_config))
        .merge(mutating)
        .with_state(state)
}
