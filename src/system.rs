//! # Endpoints de Sistema
//! src/system.rs
//!
//! - `/status`: estado del servidor
//! - `/metrics`: métricas de requests

use crate::http::{Method, Request, Response, StatusCode};
use crate::router::{PathParams, Router};
use crate::state::AppState;
use serde_json::json;

/// Handler para `GET /status`
///
/// # Ejemplo de response
/// ```json
/// {"status": "running", "version": "0.1.0", "students": 3}
/// ```
pub fn status_handler(_req: &Request, _params: &PathParams, state: &AppState) -> Response {
    Response::json(
        StatusCode::Ok,
        &json!({
            "status": "running",
            "version": env!("CARGO_PKG_VERSION"),
            "students": state.store.len(),
        }),
    )
}

/// Handler para `GET /metrics`
pub fn metrics_handler(_req: &Request, _params: &PathParams, state: &AppState) -> Response {
    Response::json(StatusCode::Ok, &state.metrics.to_json())
}

pub fn register_routes(router: &mut Router) {
    router.register(Method::GET, "/status", status_handler);
    router.register(Method::GET, "/metrics", metrics_handler);
}
