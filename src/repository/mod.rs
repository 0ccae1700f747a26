//! Link storage
//!
//! The subscription pipeline only reads from the store: the enabled links
//! and any conversion service overrides. Editing links happens elsewhere.

mod link;
mod memory;
mod postgres;
mod settings;

pub use link::LinkRepository;
pub use memory::StaticLinkStore;
pub use postgres::PostgresLinkStore;
pub use settings::SettingsRepository;

use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ConverterOverrides, Link};

/// Read-only view of the link store
#[async_trait]
pub trait LinkStore: Send + Sync {
    /// All links, in the order the store keeps them
    async fn list_links(&self) -> Result<Vec<Link>>;

    /// Conversion service overrides kept alongside the links
    async fn converter_overrides(&self) -> Result<ConverterOverrides>;

    /// Get the store name
    fn store_name(&self) -> &'static str;
}
