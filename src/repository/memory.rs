use std::path::Path;

use async_trait::async_trait;
use tracing::info;

use crate::config::LinkSourceConfig;
use crate::error::{Result, SubhubError};
use crate::models::{ConverterOverrides, Link};

use super::LinkStore;

/// Link store held in memory, loaded once at startup
#[derive(Debug, Clone, Default)]
pub struct StaticLinkStore {
    links: Vec<Link>,
    overrides: ConverterOverrides,
}

impl StaticLinkStore {
    pub fn new(links: Vec<Link>) -> Self {
        Self {
            links,
            overrides: ConverterOverrides::default(),
        }
    }

    pub fn with_overrides(mut self, overrides: ConverterOverrides) -> Self {
        self.overrides = overrides;
        self
    }

    /// Build from newline-delimited URLs; each becomes an enabled, auto-named link
    pub fn from_url_list(text: &str) -> Self {
        let links = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(Link::from_url)
            .collect();
        Self::new(links)
    }

    /// Load links from the configured JSON file, then the inline URL list
    pub async fn load(config: &LinkSourceConfig) -> Result<Self> {
        let mut links = Vec::new();

        if let Some(path) = &config.file {
            links.extend(read_links_file(path).await?);
        }
        if let Some(inline) = &config.inline {
            links.extend(Self::from_url_list(inline).links);
        }

        info!("Loaded {} links into the static link store", links.len());
        Ok(Self::new(links))
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }
}

async fn read_links_file(path: &Path) -> Result<Vec<Link>> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw).map_err(|e| {
        SubhubError::LinkStore(format!("Invalid links file {}: {}", path.display(), e))
    })
}

#[async_trait]
impl LinkStore for StaticLinkStore {
    async fn list_links(&self) -> Result<Vec<Link>> {
        Ok(self.links.clone())
    }

    async fn converter_overrides(&self) -> Result<ConverterOverrides> {
        Ok(self.overrides.clone())
    }

    fn store_name(&self) -> &'static str {
        "static"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_file(name: &str, contents: &str) -> PathBuf {
        let path = std::env::temp_dir().join(format!(
            "subhub-{}-{}.json",
            name,
            uuid::Uuid::new_v4()
        ));
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_from_url_list_skips_blank_lines() {
        let store = StaticLinkStore::from_url_list(
            "https://sub.example/a\n\n  vless://id@node.example:443#Node  \n",
        );

        assert_eq!(store.len(), 2);
        assert_eq!(store.links[0].name, "sub.example");
        assert_eq!(store.links[1].url, "vless://id@node.example:443#Node");
        assert_eq!(store.links[1].name, "Node");
        assert!(store.links.iter().all(|l| l.enabled));
    }

    #[tokio::test]
    async fn test_load_file_then_inline() {
        let path = temp_file(
            "links",
            r#"[
                {"id": "a", "name": "first", "url": "vmess://a", "enabled": true},
                {"id": "b", "name": "off", "url": "vmess://b", "enabled": false}
            ]"#,
        );

        let store = StaticLinkStore::load(&LinkSourceConfig {
            file: Some(path.clone()),
            inline: Some("vmess://c".to_string()),
        })
        .await
        .unwrap();
        std::fs::remove_file(&path).unwrap();

        let links = store.list_links().await.unwrap();
        let urls: Vec<_> = links.iter().map(|l| l.url.as_str()).collect();
        assert_eq!(urls, vec!["vmess://a", "vmess://b", "vmess://c"]);
        assert!(!links[1].enabled);
    }

    #[tokio::test]
    async fn test_load_invalid_file_is_link_store_error() {
        let path = temp_file("broken", "{not json");

        let err = StaticLinkStore::load(&LinkSourceConfig {
            file: Some(path.clone()),
            inline: None,
        })
        .await
        .unwrap_err();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(err, SubhubError::LinkStore(_)));
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let err = StaticLinkStore::load(&LinkSourceConfig {
            file: Some(PathBuf::from("/nonexistent/subhub/links.json")),
            inline: None,
        })
        .await
        .unwrap_err();

        assert!(matches!(err, SubhubError::Io(_)));
    }

    #[tokio::test]
    async fn test_overrides_are_returned() {
        let store = StaticLinkStore::default().with_overrides(ConverterOverrides {
            sub_api: Some("sub.example".to_string()),
            sub_config: None,
        });

        assert!(store.is_empty());
        assert_eq!(
            store.converter_overrides().await.unwrap().sub_api(),
            Some("sub.example")
        );
        assert_eq!(store.store_name(), "static");
    }
}
