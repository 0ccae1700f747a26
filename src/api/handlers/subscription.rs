//! Subscription endpoint

use std::borrow::Cow;

use axum::body::Body;
use axum::extract::State;
use axum::http::header::{self, HeaderMap};
use axum::http::{StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tracing::debug;

use crate::api::server::AppState;
use crate::error::Result;
use crate::subscription::{QueryFlags, SubscriptionOutput};

const PLAIN_TEXT: &str = "text/plain; charset=utf-8";

/// Headers that describe the upstream connection rather than the payload
const HOP_BY_HOP: &[&str] = &[
    "connection",
    "keep-alive",
    "proxy-authenticate",
    "proxy-authorization",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

/// Serve the aggregated subscription for any path
///
/// Browsers get a short JSON descriptor instead of node data.
pub async fn serve_subscription(
    State(state): State<AppState>,
    headers: HeaderMap,
    uri: Uri,
) -> Result<Response> {
    let user_agent: Cow<'_, str> = headers
        .get(header::USER_AGENT)
        .map(|v| String::from_utf8_lossy(v.as_bytes()))
        .unwrap_or_default();

    if is_browser(&user_agent) {
        debug!("Browser request, returning service descriptor");
        return Ok(service_descriptor(&state).into_response());
    }

    let flags = QueryFlags::parse(uri.query());
    let output = state.service.serve(&user_agent, &flags).await?;

    Ok(output.into_response())
}

fn is_browser(user_agent: &str) -> bool {
    user_agent.to_lowercase().contains("mozilla")
}

fn service_descriptor(state: &AppState) -> impl IntoResponse {
    Json(json!({
        "service": "subhub",
        "name": state.config.subscription.name,
        "uptime_secs": state.started_at.elapsed().as_secs(),
        "formats": ["clash", "surge", "quanx", "loon", "singbox", "base64"],
    }))
}

impl IntoResponse for SubscriptionOutput {
    fn into_response(self) -> Response {
        match self {
            SubscriptionOutput::Encoded(body) => {
                (StatusCode::OK, [(header::CONTENT_TYPE, PLAIN_TEXT)], body).into_response()
            }
            SubscriptionOutput::Empty => {
                (StatusCode::OK, [(header::CONTENT_TYPE, PLAIN_TEXT)], String::new()).into_response()
            }
            SubscriptionOutput::Converted(upstream) => passthrough(upstream),
        }
    }
}

/// Relay a conversion service response: status, payload headers and
/// streamed body
fn passthrough(upstream: reqwest::Response) -> Response {
    let status = upstream.status();
    let mut headers = upstream.headers().clone();
    for name in HOP_BY_HOP {
        headers.remove(*name);
    }

    let mut response = Response::new(Body::from_stream(upstream.bytes_stream()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
