//! HTTP server using Axum

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Instant;

use axum::body::Body;
use axum::http::Request;
use axum::Router;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing::{info, instrument, Span};

use crate::config::Config;
use crate::error::{Result, SubhubError};
use crate::subscription::SubscriptionService;

use super::middleware::RequestLogging;
use super::routes;

/// Shared state for request handlers
#[derive(Clone)]
pub struct AppState {
    pub service: Arc<SubscriptionService>,
    pub config: Config,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(service: SubscriptionService, config: Config) -> Self {
        Self {
            service: Arc::new(service),
            config,
            started_at: Instant::now(),
        }
    }
}

/// Span for one HTTP request; the query string is left out since it may
/// carry access tokens
fn request_span(req: &Request<Body>) -> Span {
    tracing::debug_span!(
        target: "tower_http::trace::make_span",
        "request",
        method = %req.method(),
        path = %req.uri().path(),
        version = ?req.version(),
    )
}

/// Subscription HTTP server
pub struct ApiServer {
    state: AppState,
}

impl ApiServer {
    pub fn new(service: SubscriptionService, config: Config) -> Self {
        Self {
            state: AppState::new(service, config),
        }
    }

    /// Build the router with request logging and tracing layers
    pub fn build_router(&self) -> Router {
        routes::create_router(self.state.clone())
            .layer(axum::middleware::from_fn(RequestLogging::log_request))
            .layer(TraceLayer::new_for_http().make_span_with(request_span))
    }

    /// Serve until the shutdown channel flips
    #[instrument(skip(self, shutdown))]
    pub async fn run(&self, mut shutdown: watch::Receiver<bool>) -> Result<()> {
        let addr: SocketAddr = self.state.config.server_addr().parse().map_err(|_| {
            SubhubError::InvalidConfig(format!(
                "Invalid server address: {}",
                self.state.config.server_addr()
            ))
        })?;

        let router = self.build_router();

        let listener = tokio::net::TcpListener::bind(addr).await?;
        info!("Subscription server listening on {}", addr);

        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.changed().await;
            })
            .await
            .map_err(|e| SubhubError::Internal(e.to_string()))?;

        info!("Subscription server shut down");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fmt::{self, Write};
    use std::sync::Mutex;
    use tracing::field::{Field, Visit};
    use tracing::span::{Attributes, Id};
    use tracing::Subscriber;
    use tracing_subscriber::layer::{Context, SubscriberExt};
    use tracing_subscriber::Layer;

    /// Records the fields of every new span as `name=value` text
    struct SpanFields(Arc<Mutex<Vec<String>>>);

    struct FieldText(String);

    impl Visit for FieldText {
        fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
            let _ = write!(self.0, "{}={:?} ", field.name(), value);
        }
    }

    impl<S: Subscriber> Layer<S> for SpanFields {
        fn on_new_span(&self, attrs: &Attributes<'_>, _id: &Id, _ctx: Context<'_, S>) {
            let mut text = FieldText(String::new());
            attrs.record(&mut text);
            self.0.lock().unwrap().push(text.0);
        }
    }

    #[test]
    fn test_request_span_omits_query() {
        let captured = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(SpanFields(captured.clone()));

        let req = Request::builder()
            .uri("/sub?token=secret&clash")
            .body(Body::empty())
            .unwrap();
        tracing::subscriber::with_default(subscriber, || {
            let _span = request_span(&req);
        });

        let spans = captured.lock().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0].contains("method=GET"));
        assert!(spans[0].contains("path=/sub"));
        assert!(!spans[0].contains("secret"));
    }
}
