use crate::error::Result;
use crate::models::Link;
use sqlx::PgPool;

/// Repository for link database operations
#[derive(Clone)]
pub struct LinkRepository {
    pool: PgPool,
}

impl LinkRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Get all links in insertion order
    pub async fn get_all(&self) -> Result<Vec<Link>> {
        let links = sqlx::query_as::<_, Link>(
            r#"
            SELECT id, name, url, enabled
            FROM links
            ORDER BY seq
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(links)
    }
}
