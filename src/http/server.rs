//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Build the Axum router from the config admin routes
//! - Wire up middleware (request ID, tracing, timeout, CORS)
//! - Serve on a listener until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_config_router;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer};
use crate::settings::{Settings, SettingsFacade};
use crate::store::ConfigManager;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<ConfigManager>,
    pub settings: Arc<SettingsFacade>,
}

impl AppState {
    pub fn new(settings: Arc<SettingsFacade>) -> Self {
        Self {
            store: Arc::clone(settings.store()),
            settings,
        }
    }
}

/// HTTP server for the configuration API.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    /// Create a new HTTP server. CORS is fixed from the settings current at
    /// construction.
    pub fn new(state: AppState) -> Self {
        let settings = state.settings.current();
        let router = Self::build_router(&settings, state);
        Self { router }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(settings: &Settings, state: AppState) -> Router {
        let mut router = setup_config_router(state)
            .layer(TimeoutLayer::new(REQUEST_TIMEOUT))
            .layer(propagate_request_id_layer())
            .layer(TraceLayer::new_for_http())
            .layer(set_request_id_layer());

        if let Some(cors) = cors_layer(settings) {
            router = router.layer(cors);
        }
        router
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn cors_layer(settings: &Settings) -> Option<CorsLayer> {
    if !settings.cors_enabled {
        return None;
    }

    let allow_origin = if settings.allowed_origins.iter().any(|o| o == "*") {
        AllowOrigin::any()
    } else {
        let origins: Vec<HeaderValue> = settings
            .allowed_origins
            .iter()
            .filter_map(|origin| match origin.parse() {
                Ok(value) => Some(value),
                Err(_) => {
                    tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                    None
                }
            })
            .collect();
        AllowOrigin::list(origins)
    };

    Some(
        CorsLayer::new()
            .allow_origin(allow_origin)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
