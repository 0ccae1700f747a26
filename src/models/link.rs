use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::subscription::naming::extract_node_name;

/// A subscription entry owned by the link store
///
/// `url` is either an HTTP(S) subscription source or a literal node URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Link {
    pub id: String,
    pub name: String,
    pub url: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

impl Link {
    /// Create an enabled link with a generated id and a name derived from the URL
    pub fn from_url(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            id: Uuid::new_v4().to_string(),
            name: extract_node_name(&url),
            url,
            enabled: true,
        }
    }

    /// Whether the link points at a remote subscription rather than a node
    pub fn is_subscription(&self) -> bool {
        is_subscription_url(&self.url)
    }
}

/// HTTP(S) prefixed URLs are fetched; everything else is a manual node
pub fn is_subscription_url(url: &str) -> bool {
    url.get(..4)
        .map(|prefix| prefix.eq_ignore_ascii_case("http"))
        .unwrap_or(false)
}
