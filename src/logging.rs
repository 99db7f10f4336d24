use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use std::time::Instant;
use tracing::{error, info, warn};

/// Log every request with its matched route, status and latency.
pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    let uri = req.uri().clone();
    let matched_path = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_string())
        .unwrap_or_else(|| uri.path().to_string());

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status().as_u16();

    match status {
        400..=499 => {
            warn!(
                method = %method,
                path = %matched_path,
                status = %status,
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                method = %method,
                path = %matched_path,
                status = %status,
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        _ => {
            info!(
                method = %method,
                path = %matched_path,
                status = %status,
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    response
}
