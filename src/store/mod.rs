pub mod document;

pub use document::{DocumentStore, InMemoryDocumentStore, SurrealDocumentStore};

use std::sync::Arc;

use crate::config::{StorageBackend, StorageConfig};
use crate::db::DatabaseConfig;
use crate::error::{BuilderError, BuilderResult};

/// Open the document store selected by the storage configuration.
pub async fn open_store(config: &StorageConfig) -> BuilderResult<Arc<dyn DocumentStore>> {
    match config.backend {
        StorageBackend::Memory => {
            tracing::info!("using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        StorageBackend::Surreal => {
            let mut db_config = match &config.url {
                Some(url) => DatabaseConfig::remote(
                    url.clone(),
                    config.username.clone().unwrap_or_default(),
                    config.password.clone().unwrap_or_default(),
                ),
                None => DatabaseConfig::memory(),
            };
            db_config.namespace = config.namespace.clone();
            db_config.database = config.database.clone();

            let db = db_config
                .connect()
                .await
                .map_err(|e| BuilderError::Persistence(format!("Failed to connect: {}", e)))?;
            tracing::info!(
                url = config.url.as_deref().unwrap_or("memory"),
                namespace = %config.namespace,
                "using SurrealDB document store"
            );
            Ok(Arc::new(SurrealDocumentStore::new(Arc::new(db))))
        }
    }
}
