//! Upstream request assembly and the conversion service call

use std::time::Duration;

use percent_encoding::utf8_percent_encode;
use reqwest::Client;
use tracing::{debug, error, info, instrument};

use crate::config::ConverterConfig;
use crate::error::{Result, SubhubError};
use crate::models::ConverterOverrides;

use super::URI_COMPONENT;
use super::normalizer::NodeSet;
use super::target::Target;

/// Prefix of the inline part carrying the encoded node set
pub const INLINE_DATA_PREFIX: &str = "data:text/plain;base64,";

/// Ordered sources handed to the conversion service as one `|`-joined value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpstreamSourceDescriptor {
    parts: Vec<String>,
    has_inline: bool,
}

impl UpstreamSourceDescriptor {
    /// Inline node set first (when non-empty), then full configs, then WARP
    pub fn build(node_set: &NodeSet, full_config_urls: &[String], warp: &[String]) -> Self {
        let mut parts = Vec::with_capacity(1 + full_config_urls.len() + warp.len());

        let has_inline = !node_set.is_empty();
        if has_inline {
            parts.push(format!("{}{}", INLINE_DATA_PREFIX, node_set.encode()));
        }
        parts.extend(full_config_urls.iter().cloned());
        parts.extend(warp.iter().cloned());

        Self { parts, has_inline }
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// True when the only source is the inline node set
    pub fn is_inline_only(&self) -> bool {
        self.has_inline && self.parts.len() == 1
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn joined(&self) -> String {
        self.parts.join("|")
    }
}

/// URL scheme used to reach the conversion service
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scheme {
    Http,
    Https,
}

impl Scheme {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scheme::Http => "http",
            Scheme::Https => "https",
        }
    }
}

/// Where and how to call the conversion service for one request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterEndpoint {
    pub scheme: Scheme,
    pub host: String,
    pub config_url: String,
}

impl ConverterEndpoint {
    /// Resolve with precedence: store override, then environment, then default
    ///
    /// The environment layer already carries the compiled-in defaults (see
    /// [`ConverterConfig::default`]).
    pub fn resolve(overrides: &ConverterOverrides, config: &ConverterConfig) -> Self {
        let api = overrides.sub_api().unwrap_or(config.api.as_str());
        let config_url = overrides
            .sub_config()
            .unwrap_or(config.config_url.as_str())
            .to_string();

        let scheme = if api.starts_with("http://") {
            Scheme::Http
        } else {
            Scheme::Https
        };
        let host = api
            .strip_prefix("http://")
            .or_else(|| api.strip_prefix("https://"))
            .unwrap_or(api)
            .to_string();

        Self {
            scheme,
            host,
            config_url,
        }
    }

    /// Full conversion request URL
    pub fn request_url(
        &self,
        target: Target,
        descriptor: &UpstreamSourceDescriptor,
        user_agent: &str,
    ) -> String {
        format!(
            "{}://{}/sub?target={}&url={}&insert=false&config={}&new_name=true&ua={}",
            self.scheme.as_str(),
            self.host,
            target.as_str(),
            utf8_percent_encode(&descriptor.joined(), URI_COMPONENT),
            utf8_percent_encode(&self.config_url, URI_COMPONENT),
            utf8_percent_encode(user_agent, URI_COMPONENT),
        )
    }
}

/// Client for the third-party conversion service
///
/// The call is attempted exactly once; there is no retry.
#[derive(Clone)]
pub struct ConverterClient {
    client: Client,
    timeout: Duration,
}

impl ConverterClient {
    pub fn new(client: Client, timeout: Duration) -> Self {
        Self { client, timeout }
    }

    /// Call the conversion service and return its successful response
    ///
    /// Non-2xx statuses and transport failures become
    /// [`SubhubError::Converter`] carrying the upstream URL.
    #[instrument(skip_all, fields(format = %target, sources = descriptor.parts().len()))]
    pub async fn convert(
        &self,
        endpoint: &ConverterEndpoint,
        target: Target,
        descriptor: &UpstreamSourceDescriptor,
        user_agent: &str,
    ) -> Result<reqwest::Response> {
        let upstream_url = endpoint.request_url(target, descriptor, user_agent);
        debug!(host = %endpoint.host, "Calling conversion service");

        let response = match self
            .client
            .get(&upstream_url)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!(host = %endpoint.host, "Conversion service request failed: {}", e);
                return Err(SubhubError::Converter {
                    upstream_url,
                    message: e.to_string(),
                });
            }
        };

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(host = %endpoint.host, status = %status, "Conversion service returned an error status");
            return Err(SubhubError::Converter {
                upstream_url,
                message: format!(
                    "Conversion service returned status {}: {}",
                    status.as_u16(),
                    body
                ),
            });
        }

        info!(host = %endpoint.host, status = %status, "Conversion service responded");
        Ok(response)
    }
}
