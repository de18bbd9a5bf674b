use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use uuid::Uuid;

use crate::utils::sanitize::mask_query;

/// Logs one line per request with a correlation id. Query strings are
/// masked before logging: callback URLs carry the gateway signature and
/// must never land in logs verbatim.
pub async fn request_logger_middleware(mut req: Request, next: Next) -> Response {
    let request_id = Uuid::new_v4().to_string();
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let query = req.uri().query().map(mask_query);
    let start = Instant::now();

    // Insert request ID into headers for downstream handlers
    if let Ok(header_value) = request_id.parse() {
        req.headers_mut().insert("x-request-id", header_value);
    }

    let response = next.run(req).await;

    tracing::info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        query = query.as_deref().unwrap_or(""),
        status = response.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "handled request"
    );

    response
}
