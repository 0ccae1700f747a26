//! Per-request aggregation pipeline
//!
//! link store -> fetch -> classify -> normalize -> resolve target ->
//! build descriptor -> fast path or conversion service

use std::sync::Arc;

use reqwest::Client;
use tracing::{debug, info, instrument};

use crate::config::{Config, ConverterConfig};
use crate::error::Result;
use crate::models::Link;
use crate::repository::LinkStore;

use super::fetcher::SourceFetcher;
use super::normalizer::NodeSet;
use super::target::{self, QueryFlags, Target};
use super::upstream::{ConverterClient, ConverterEndpoint, UpstreamSourceDescriptor};

/// What the pipeline hands back to the HTTP layer
#[derive(Debug)]
pub enum SubscriptionOutput {
    /// Base64 node list produced locally, without the conversion service
    Encoded(String),
    /// No sources at all
    Empty,
    /// Successful conversion service response, to be passed through as is
    Converted(reqwest::Response),
}

/// Runs the subscription pipeline; cheap to clone and shared across requests
#[derive(Clone)]
pub struct SubscriptionService {
    store: Arc<dyn LinkStore>,
    fetcher: SourceFetcher,
    converter: ConverterClient,
    converter_config: ConverterConfig,
    warp: Arc<[String]>,
}

impl SubscriptionService {
    /// Create the service from application configuration
    pub fn new(store: Arc<dyn LinkStore>, client: Client, config: &Config) -> Self {
        Self {
            store,
            fetcher: SourceFetcher::new(client.clone(), config.fetch.timeout()),
            converter: ConverterClient::new(client, config.converter.timeout()),
            converter_config: config.converter.clone(),
            warp: config.subscription.warp.clone().into(),
        }
    }

    /// Create the service from already-built parts
    pub fn from_parts(
        store: Arc<dyn LinkStore>,
        fetcher: SourceFetcher,
        converter: ConverterClient,
        converter_config: ConverterConfig,
        warp: Vec<String>,
    ) -> Self {
        Self {
            store,
            fetcher,
            converter,
            converter_config,
            warp: warp.into(),
        }
    }

    /// Serve one subscription request
    ///
    /// Only a link store failure or a conversion service failure produce an
    /// error; failing sources end up as placeholder nodes.
    #[instrument(skip(self, flags))]
    pub async fn serve(&self, user_agent: &str, flags: &QueryFlags) -> Result<SubscriptionOutput> {
        let links = self.store.list_links().await?;
        let (sources, manual): (Vec<Link>, Vec<Link>) = links
            .into_iter()
            .filter(|link| link.enabled)
            .partition(Link::is_subscription);
        let sources: Vec<String> = sources.into_iter().map(|link| link.url).collect();

        debug!(
            manual = manual.len(),
            sources = sources.len(),
            "Partitioned enabled links"
        );

        let aggregation = self.fetcher.aggregate(&sources, user_agent).await;

        let node_set = NodeSet::from_sources(
            manual.iter().map(|link| link.url.as_str()),
            aggregation.processed_nodes.iter().map(String::as_str),
        );
        let target = target::resolve(user_agent, flags);
        let descriptor =
            UpstreamSourceDescriptor::build(&node_set, &aggregation.full_config_urls, &self.warp);

        info!(
            nodes = node_set.len(),
            full_configs = aggregation.full_config_urls.len(),
            warp = self.warp.len(),
            target = %target,
            "Aggregated subscription"
        );

        if target == Target::Base64 && descriptor.is_inline_only() {
            return Ok(SubscriptionOutput::Encoded(node_set.encode()));
        }

        if descriptor.is_empty() {
            return Ok(SubscriptionOutput::Empty);
        }

        let overrides = self.store.converter_overrides().await?;
        let endpoint = ConverterEndpoint::resolve(&overrides, &self.converter_config);

        let response = self
            .converter
            .convert(&endpoint, target, &descriptor, user_agent)
            .await?;

        Ok(SubscriptionOutput::Converted(response))
    }
}
