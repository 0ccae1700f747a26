//! Request logging middleware

use axum::body::Body;
use axum::http::{header, Request};
use axum::middleware::Next;
use axum::response::Response;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Request logging middleware
pub struct RequestLogging;

impl RequestLogging {
    /// Log method, path, client and outcome of each request
    ///
    /// The query string is left out since it may carry access tokens.
    pub async fn log_request(req: Request<Body>, next: Next) -> Response {
        let method = req.method().clone();
        let path = req.uri().path().to_string();
        let user_agent = req
            .headers()
            .get(header::USER_AGENT)
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .unwrap_or_else(|| "-".to_string());
        let start = Instant::now();

        debug!(user_agent = %user_agent, "{} {} - started", method, path);

        let response = next.run(req).await;

        let duration = start.elapsed();
        let status = response.status();

        if status.is_server_error() {
            warn!(
                user_agent = %user_agent,
                "{} {} - {} in {:?}",
                method, path, status, duration
            );
        } else {
            info!(
                user_agent = %user_agent,
                "{} {} - {} in {:?}",
                method, path, status, duration
            );
        }

        response
    }
}
