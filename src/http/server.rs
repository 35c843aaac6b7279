//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Mount the dispatcher as the fallback of an axum router
//! - Wire up middleware (tracing, request timeout)
//! - Buffer request bodies up to the configured limit
//! - Run each request's handler chain on a blocking worker
//! - Serve until the shutdown signal fires

use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use http_body_util::LengthLimitError;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::ServerConfig;
use crate::http::context::Context;
use crate::http::dispatcher::Dispatcher;
use crate::http::engine::Engine;

/// Application state injected into the fallback handler.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub max_body_bytes: usize,
}

/// HTTP server serving one engine's routes.
pub struct HttpServer {
    router: Router,
    config: ServerConfig,
}

impl HttpServer {
    /// Create a new HTTP server; `engine` is frozen here.
    pub fn new(config: ServerConfig, engine: Engine) -> Self {
        let dispatcher = Arc::new(engine.into_dispatcher());
        tracing::info!(
            routes = dispatcher.routes().len(),
            "Route table frozen"
        );

        let state = AppState {
            dispatcher,
            max_body_bytes: config.listener.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &ServerConfig, state: AppState) -> Router {
        Router::new()
            .fallback(dispatch_handler)
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    /// The axum router, for serving it some other way or driving it in tests.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server until `shutdown` fires.
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
                tracing::info!("Shutdown signal received");
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }
}

/// Every request lands here; routing happens in the dispatcher.
async fn dispatch_handler(State(state): State<AppState>, request: Request<Body>) -> Response {
    let (head, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(e) if exceeds_limit(&e) => {
            tracing::warn!(path = %head.uri.path(), limit = state.max_body_bytes, "Request body too large");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
        Err(e) => {
            tracing::warn!(path = %head.uri.path(), error = %e, "Failed to read request body");
            return (StatusCode::BAD_REQUEST, "Failed to read request body").into_response();
        }
    };

    let ctx = Context::new(head, body);
    let request_id = ctx.request_id().to_string();
    let dispatcher = state.dispatcher.clone();

    match tokio::task::spawn_blocking(move || dispatcher.dispatch(ctx)).await {
        Ok(ctx) => ctx.into_response(),
        Err(e) => {
            // Only reachable when no Recovery middleware wraps the chain.
            tracing::error!(request_id = %request_id, error = %e, "Handler chain panicked");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// True when reading the body stopped at the size limit.
fn exceeds_limit(error: &axum::Error) -> bool {
    let mut source: Option<&(dyn std::error::Error + 'static)> = Some(error);
    while let Some(e) = source {
        if e.is::<LengthLimitError>() {
            return true;
        }
        source = e.source();
    }
    false
}
