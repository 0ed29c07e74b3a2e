use std::any::Any;

use axum::{
    Router,
    http::StatusCode,
    response::Response,
    routing::{get, post},
};
use tower_http::catch_panic::CatchPanicLayer;

use crate::EcpContext;
use crate::error::error_envelope;
use crate::handlers::{
    input, keydown, keypress, keyup, landing, launch, not_found, query_active_app, query_apps,
    query_device_info, query_icon, search,
};

/// Crée le router de l'API ECP
///
/// Une route existante appelée avec une autre méthode répond comme une
/// route inconnue (404). Une panique dans un handler devient une
/// enveloppe 500.
pub fn ecp_router(ctx: EcpContext) -> Router {
    Router::new()
        .route("/", get(landing).fallback(not_found))
        .route("/query/apps", get(query_apps).fallback(not_found))
        .route("/query/active-app", get(query_active_app).fallback(not_found))
        .route("/query/device-info", get(query_device_info).fallback(not_found))
        .route("/query/icon/{id}", get(query_icon).fallback(not_found))
        .route("/keypress/{cmd}", post(keypress).fallback(not_found))
        .route("/keydown/{cmd}", post(keydown).fallback(not_found))
        .route("/keyup/{cmd}", post(keyup).fallback(not_found))
        .route("/launch/{id}", post(launch).fallback(not_found))
        .route("/input", post(input).fallback(not_found))
        .route("/search", post(search).fallback(not_found))
        .route("/search/browse", post(search).fallback(not_found))
        .fallback(not_found)
        .with_state(ctx)
        .layer(CatchPanicLayer::custom(panic_response))
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic".to_string()
    };

    tracing::error!("❌ Handler panicked: {}", detail);
    error_envelope(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
}
