//! Application state for the atlas API.

use std::sync::Arc;

use anyhow::Result;
use incentive_engine::IncentiveEngine;
use sqlx::sqlite::SqlitePoolOptions;

use crate::store::SqliteStore;

pub struct AppState {
    pub engine: IncentiveEngine,
}

impl AppState {
    pub async fn new() -> Result<Self> {
        let db_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite:atlas.db?mode=rwc".to_string());

        tracing::info!("Connecting to reference database: {}", db_url);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(&db_url)
            .await?;

        SqliteStore::migrate(&pool).await?;
        let overrides = SqliteStore::load_overrides(&pool).await?;
        tracing::info!("Loaded {} service-area override(s)", overrides.len());

        let store = SqliteStore::new(pool);
        Ok(Self {
            engine: IncentiveEngine::new(Arc::new(store), overrides),
        })
    }
}
