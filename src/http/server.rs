//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create the Axum router with the signing, health and admin handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve on a bound listener until shutdown is signalled

use axum::{
    body::Body,
    extract::State,
    http::{Method, Request, StatusCode, Uri},
    middleware::map_response,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin::setup_admin_router;
use crate::config::SignerConfig;
use crate::http::request::{request_id_of, MakeRequestUuid, X_REQUEST_ID};
use crate::http::response::ApiError;
use crate::http::sign::sign_handler;
use crate::lifecycle::Readiness;
use crate::relay::RelayService;

/// Application state injected into handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    pub relay: RelayService,
    pub readiness: Readiness,
    pub config: Arc<SignerConfig>,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(relay: RelayService, readiness: Readiness, config: Arc<SignerConfig>) -> Self {
        Self {
            relay,
            readiness,
            config,
            started_at: Utc::now(),
        }
    }
}

/// HTTP server for the signing service.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(state: AppState) -> Self {
        Self {
            router: Self::build_router(state),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(state: AppState) -> Router {
        let config = state.config.clone();

        let mut router = Router::new()
            .route("/health", get(health_handler))
            .route("/", post(sign_handler))
            .route("/{*path}", post(sign_handler))
            .with_state(state.clone());

        if config.admin.enabled {
            router = router.merge(setup_admin_router(state));
        }

        router.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
                .layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
                    tracing::info_span!(
                        "request",
                        method = %request.method(),
                        path = %request.uri().path(),
                        request_id = %request_id_of(request),
                    )
                }))
                .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
                .layer(map_response(render_timeout))
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.listener.request_timeout_secs,
                ))),
        )
    }

    /// The configured router, for in-process use.
    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Serve on `listener` until `shutdown` fires.
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

/// Give the timeout layer's bare 408 the standard error body.
async fn render_timeout(method: Method, uri: Uri, response: Response) -> Response {
    if response.status() == StatusCode::REQUEST_TIMEOUT {
        ApiError::new(StatusCode::REQUEST_TIMEOUT, "request timed out", &method, &uri)
            .into_response()
    } else {
        response
    }
}

/// `GET /health`: 200 once ready, 503 before that and during shutdown.
async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    if state.readiness.is_ready() {
        (StatusCode::OK, Json(json!({ "status": "ready" })))
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({ "status": "starting" })),
        )
    }
}
