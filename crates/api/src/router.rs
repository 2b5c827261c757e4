//! The application router and its middleware stack.
//!
//! `main.rs` and the integration tests both go through [`build_app_router`],
//! so tests exercise the same layers as production.

use std::any::Any;
use std::time::Duration;

use axum::error_handling::HandleErrorLayer;
use axum::extract::DefaultBodyLimit;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{HeaderName, Method, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{BoxError, Router};
use tower::timeout::error::Elapsed;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use vidhub_core::error::CoreError;

use crate::config::ServerConfig;
use crate::error::AppError;
use crate::handlers;
use crate::routes;
use crate::state::AppState;

/// Build the full application [`Router`].
///
/// Requests pass the layers in this order: CORS, request id assignment,
/// tracing, request id propagation, timeout, panic recovery, body limit.
/// Timeouts, panics and unknown routes all answer with the error envelope.
pub fn build_app_router(state: AppState, config: &ServerConfig) -> Router {
    let request_id_header = HeaderName::from_static("x-request-id");
    let middleware = ServiceBuilder::new()
        .layer(build_cors_layer(config))
        // Re-box the traced body as `axum::body::Body`, which CORS needs to be `Default`.
        .map_response(IntoResponse::into_response)
        .layer(SetRequestIdLayer::new(request_id_header.clone(), MakeRequestUuid))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(PropagateRequestIdLayer::new(request_id_header))
        .layer(HandleErrorLayer::new(middleware_error))
        .timeout(Duration::from_secs(config.request_timeout_secs))
        .layer(CatchPanicLayer::custom(panic_response));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/v1", routes::api_routes())
        .fallback(unknown_route)
        // Uploads are read fully into memory before staging.
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(middleware)
        .with_state(state)
}

/// Build the CORS layer. Credentials are allowed so the browser sends the
/// session cookies.
///
/// # Panics
///
/// Panics at startup if any configured origin is invalid.
pub fn build_cors_layer(config: &ServerConfig) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .map(|o| {
            o.parse()
                .unwrap_or_else(|e| panic!("Invalid CORS origin '{o}': {e}"))
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION, COOKIE])
        .allow_credentials(true)
        .max_age(Duration::from_secs(3600))
}

async fn unknown_route(uri: Uri) -> AppError {
    AppError::Core(CoreError::NotFoundByName {
        entity: "Route",
        name: uri.path().to_string(),
    })
}

/// Errors raised by the service stack itself rather than a handler.
async fn middleware_error(err: BoxError) -> AppError {
    if err.is::<Elapsed>() {
        AppError::Timeout
    } else {
        AppError::InternalError(format!("Unhandled middleware error: {err}"))
    }
}

fn panic_response(payload: Box<dyn Any + Send + 'static>) -> Response {
    let detail = payload
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| payload.downcast_ref::<&str>().copied())
        .unwrap_or("non-string panic payload");
    AppError::InternalError(format!("Handler panicked: {detail}")).into_response()
}
