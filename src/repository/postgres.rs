use async_trait::async_trait;
use tracing::debug;

use crate::database::Database;
use crate::error::Result;
use crate::models::{ConverterOverrides, Link};

use super::{LinkRepository, LinkStore, SettingsRepository};

/// Link store backed by the `links` and `settings` tables
#[derive(Clone)]
pub struct PostgresLinkStore {
    links: LinkRepository,
    settings: SettingsRepository,
}

impl PostgresLinkStore {
    pub fn new(db: &Database) -> Self {
        Self {
            links: LinkRepository::new(db.pool().clone()),
            settings: SettingsRepository::new(db.pool().clone()),
        }
    }
}

#[async_trait]
impl LinkStore for PostgresLinkStore {
    async fn list_links(&self) -> Result<Vec<Link>> {
        let links = self.links.get_all().await?;
        debug!("Read {} links from the database", links.len());
        Ok(links)
    }

    async fn converter_overrides(&self) -> Result<ConverterOverrides> {
        self.settings.get_converter().await
    }

    fn store_name(&self) -> &'static str {
        "postgres"
    }
}
