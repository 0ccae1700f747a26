use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Unified error type for the Subhub application
#[derive(Error, Debug)]
pub enum SubhubError {
    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Database connection failed: {0}")]
    DatabaseConnection(String),

    // Link store errors
    #[error("Link store error: {0}")]
    LinkStore(String),

    // Conversion service errors
    #[error("Conversion service failed: {message}")]
    Converter {
        upstream_url: String,
        message: String,
    },

    // Configuration errors
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // HTTP errors
    #[error("HTTP error: {0}")]
    Http(String),

    // Internal errors
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for Subhub operations
pub type Result<T> = std::result::Result<T, SubhubError>;

impl SubhubError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            SubhubError::InvalidConfig(_) => StatusCode::BAD_REQUEST,

            // 502 Bad Gateway
            SubhubError::Converter { .. } => StatusCode::BAD_GATEWAY,

            // 503 Service Unavailable
            SubhubError::DatabaseConnection(_) => StatusCode::SERVICE_UNAVAILABLE,

            // 500 Internal Server Error
            SubhubError::Database(_)
            | SubhubError::LinkStore(_)
            | SubhubError::Io(_)
            | SubhubError::Http(_)
            | SubhubError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }
}

impl IntoResponse for SubhubError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // Subscription clients show the body to the user verbatim, so the
        // converter failure is reported as plain text.
        if let SubhubError::Converter {
            upstream_url,
            message,
        } = &self
        {
            let body = format!(
                "[subhub] Failed to fetch subscription from the conversion service.\n\nError: {}\n\nUpstream URL: {}",
                message, upstream_url
            );
            return (
                status,
                [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                body,
            )
                .into_response();
        }

        let body = json!({
            "error": self.to_string(),
        });

        (status, Json(body)).into_response()
    }
}

// Convert from reqwest errors
impl From<reqwest::Error> for SubhubError {
    fn from(err: reqwest::Error) -> Self {
        SubhubError::Http(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_code_mapping() {
        assert_eq!(
            SubhubError::InvalidConfig("bad".to_string()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            SubhubError::Converter {
                upstream_url: "https://api.example/sub".to_string(),
                message: "timed out".to_string(),
            }
            .status_code(),
            StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            SubhubError::DatabaseConnection("refused".to_string()).status_code(),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            SubhubError::LinkStore("corrupt".to_string()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_error_client_server_helpers() {
        assert!(SubhubError::InvalidConfig("bad".to_string()).is_client_error());
        assert!(!SubhubError::InvalidConfig("bad".to_string()).is_server_error());

        assert!(SubhubError::Internal("boom".to_string()).is_server_error());
        assert!(!SubhubError::Internal("boom".to_string()).is_client_error());
    }

    #[tokio::test]
    async fn test_converter_error_renders_plain_text_diagnostic() {
        let response = SubhubError::Converter {
            upstream_url: "https://api.example/sub?target=clash".to_string(),
            message: "status 500: boom".to_string(),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            response.headers().get(header::CONTENT_TYPE).unwrap(),
            "text/plain; charset=utf-8"
        );

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let text = String::from_utf8(body.to_vec()).unwrap();
        assert!(text.contains("Error: status 500: boom"));
        assert!(text.contains("Upstream URL: https://api.example/sub?target=clash"));
    }

    #[tokio::test]
    async fn test_other_errors_render_json() {
        let response = SubhubError::LinkStore("corrupt".to_string()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Link store error: corrupt");
    }
}
