use std::sync::Arc;

use assetdesk_core::allocation::AssetIdAllocator;
use assetdesk_db::PgAssetStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: assetdesk_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Asset identifier allocator over the PostgreSQL store.
    pub allocator: Arc<AssetIdAllocator<PgAssetStore>>,
}

impl AppState {
    /// Assemble state from a pool and configuration.
    pub fn new(pool: assetdesk_db::DbPool, config: ServerConfig) -> Self {
        let store = PgAssetStore::with_batch_size(pool.clone(), config.fetch_batch_size);
        let allocator = AssetIdAllocator::new(store, config.allocation.clone());
        Self {
            pool,
            config: Arc::new(config),
            allocator: Arc::new(allocator),
        }
    }
}
