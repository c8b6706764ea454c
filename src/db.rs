use anyhow::Result;
use std::sync::Arc;
use surrealdb::engine::any::{connect, Any};
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

/// Table holding one design document per seller.
pub const DESIGN_TABLE: &str = "store_design";

/// A wrapper around a SurrealDB connection scoped to the storefront
/// namespace and database.
#[derive(Clone)]
pub struct DesignDatabase {
    db: Arc<Surreal<Any>>,
}

impl DesignDatabase {
    /// Create a new in-memory database instance.
    pub async fn new_memory() -> Result<Self> {
        Self::new_memory_in("storefront", "storefront").await
    }

    async fn new_memory_in(namespace: &str, database: &str) -> Result<Self> {
        let db = connect("memory").await?;
        db.use_ns(namespace).use_db(database).await?;

        let db = Arc::new(db);
        Self::init_schema(&db).await?;

        Ok(Self { db })
    }

    /// Connect to a SurrealDB server and sign in as root.
    pub async fn new_remote(
        url: &str,
        username: &str,
        password: &str,
        namespace: &str,
        database: &str,
    ) -> Result<Self> {
        let db = connect(url).await?;

        db.signin(Root {
            username: username,
            password: password,
        })
        .await?;

        db.use_ns(namespace).use_db(database).await?;

        let db = Arc::new(db);
        Self::init_schema(&db).await?;

        Ok(Self { db })
    }

    /// Define the design table and its indexes.
    async fn init_schema(db: &Surreal<Any>) -> Result<()> {
        db.query(format!("DEFINE TABLE IF NOT EXISTS {DESIGN_TABLE} SCHEMALESS"))
            .await?
            .check()?;
        db.query(format!(
            "DEFINE INDEX IF NOT EXISTS design_seller ON {DESIGN_TABLE} FIELDS seller_id UNIQUE"
        ))
        .await?
        .check()?;
        db.query(format!(
            "DEFINE INDEX IF NOT EXISTS design_active ON {DESIGN_TABLE} FIELDS is_active"
        ))
        .await?
        .check()?;
        Ok(())
    }

    /// Get a reference to the underlying SurrealDB instance.
    pub fn inner(&self) -> &Surreal<Any> {
        &self.db
    }

    /// Check if the database is connected.
    pub async fn health(&self) -> Result<bool> {
        let _ = self.db.version().await?;
        Ok(true)
    }
}

/// Database configuration options.
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub endpoint: DatabaseEndpoint,
    pub namespace: String,
    pub database: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            endpoint: DatabaseEndpoint::Memory,
            namespace: "storefront".to_string(),
            database: "storefront".to_string(),
        }
    }
}

/// Database endpoint types.
#[derive(Debug, Clone)]
pub enum DatabaseEndpoint {
    /// In-memory database (for testing).
    Memory,
    /// Remote SurrealDB server.
    Remote {
        url: String,
        username: String,
        password: String,
    },
}

impl DatabaseConfig {
    /// Create a new configuration for an in-memory database.
    pub fn memory() -> Self {
        Self::default()
    }

    /// Create a new configuration for a remote SurrealDB server.
    pub fn remote(
        url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: DatabaseEndpoint::Remote {
                url: url.into(),
                username: username.into(),
                password: password.into(),
            },
            ..Default::default()
        }
    }

    /// Connect to the database with this configuration.
    pub async fn connect(&self) -> Result<DesignDatabase> {
        match &self.endpoint {
            DatabaseEndpoint::Memory => {
                DesignDatabase::new_memory_in(&self.namespace, &self.database).await
            }
            DatabaseEndpoint::Remote {
                url,
                username,
                password,
            } => {
                DesignDatabase::new_remote(url, username, password, &self.namespace, &self.database)
                    .await
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_database() {
        let db = DesignDatabase::new_memory().await.unwrap();
        assert!(db.health().await.unwrap());
    }

    #[tokio::test]
    async fn test_config_connects_to_memory() {
        let db = DatabaseConfig::memory().connect().await.unwrap();
        assert!(db.health().await.unwrap());
    }
}
