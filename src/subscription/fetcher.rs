//! Concurrent retrieval of subscription sources
//!
//! Every source is fetched at once and the fetcher waits for all of them to
//! settle. A failing source never aborts the batch: it is replaced by a
//! placeholder node naming the URL, so the failure shows up in the client.

use std::time::Duration;

use futures::future::join_all;
use percent_encoding::utf8_percent_encode;
use reqwest::header::USER_AGENT;
use reqwest::{Client, StatusCode};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use super::classifier::{classify, Classification};
use super::URI_COMPONENT;

/// Why a single source could not be retrieved
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("timed out: {0}")]
    Timeout(reqwest::Error),

    #[error("{0}")]
    Transport(reqwest::Error),

    #[error("Request to {url} failed with status {status}")]
    Status { url: String, status: StatusCode },
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout(err)
        } else {
            FetchError::Transport(err)
        }
    }
}

/// Result of retrieving one subscription URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    Fetched { url: String, body: String },
    Failed { url: String, reason: String },
}

/// Fan-in of all outcomes, in source order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregationResult {
    /// Node blobs: decoded lists, plaintext lists and placeholder nodes
    pub processed_nodes: Vec<String>,
    /// Sources that returned a complete client configuration
    pub full_config_urls: Vec<String>,
}

impl AggregationResult {
    /// Classify each outcome and collect the results in order
    pub fn from_outcomes(outcomes: Vec<FetchOutcome>) -> Self {
        let mut result = Self::default();

        for outcome in outcomes {
            match outcome {
                FetchOutcome::Fetched { url, body } => match classify(&body) {
                    Classification::FullConfig => {
                        debug!(url = %url, "Source is a full client configuration");
                        result.full_config_urls.push(url);
                    }
                    Classification::NodeList(nodes) => result.processed_nodes.push(nodes),
                },
                FetchOutcome::Failed { url, .. } => {
                    result.processed_nodes.push(placeholder_node(&url));
                }
            }
        }

        result
    }
}

/// Node that surfaces a failed source in the client's node list
pub fn placeholder_node(url: &str) -> String {
    let label = format!("Subscription fetch failed: {}", url);
    format!(
        "trojan://ERROR@127.0.0.1:1?sn=SUBSCRIPTION_ERROR#{}",
        utf8_percent_encode(&label, URI_COMPONENT)
    )
}

/// Fetches subscription sources with a bounded per-request timeout
#[derive(Clone)]
pub struct SourceFetcher {
    client: Client,
    timeout: Duration,
}

impl SourceFetcher {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Fetch all URLs concurrently, forwarding the caller's User-Agent
    ///
    /// Outcomes are returned in the order of `urls`, independent of which
    /// request finished first.
    #[instrument(skip(self, urls), fields(sources = urls.len()))]
    pub async fn fetch_all(&self, urls: &[String], user_agent: &str) -> Vec<FetchOutcome> {
        let outcomes = join_all(urls.iter().map(|url| self.fetch_one(url, user_agent))).await;

        let failed = outcomes
            .iter()
            .filter(|o| matches!(o, FetchOutcome::Failed { .. }))
            .count();
        info!(
            "Fetched {} subscription sources ({} failed)",
            outcomes.len(),
            failed
        );

        outcomes
    }

    /// Fetch and classify all URLs
    pub async fn aggregate(&self, urls: &[String], user_agent: &str) -> AggregationResult {
        AggregationResult::from_outcomes(self.fetch_all(urls, user_agent).await)
    }

    async fn fetch_one(&self, url: &str, user_agent: &str) -> FetchOutcome {
        match self.try_fetch(url, user_agent).await {
            Ok(body) => FetchOutcome::Fetched {
                url: url.to_string(),
                body,
            },
            Err(e) => {
                warn!(url = %url, "Failed to process subscription: {}", e);
                FetchOutcome::Failed {
                    url: url.to_string(),
                    reason: e.to_string(),
                }
            }
        }
    }

    async fn try_fetch(&self, url: &str, user_agent: &str) -> Result<String, FetchError> {
        let response = self
            .client
            .get(url)
            .header(USER_AGENT, user_agent)
            .timeout(self.timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                url: url.to_string(),
                status,
            });
        }

        Ok(response.text().await?)
    }
}
