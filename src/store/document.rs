use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::db::{DesignDatabase, DESIGN_TABLE};
use crate::error::{BuilderError, BuilderResult};
use crate::model::{Document, DocumentId};

// ---------------------------------------------------------------------------
// DocumentStore trait: the persistence gateway
// ---------------------------------------------------------------------------

/// Storage for seller design documents. One document per seller; saves are
/// upserts and the last write wins.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Fetch the design document owned by a seller.
    async fn load(&self, seller_id: &str) -> BuilderResult<Option<Document>>;

    /// Insert or update the full document. Returns the document id, assigned
    /// on first insert.
    async fn save(&self, document: &Document) -> BuilderResult<DocumentId>;

    /// Remove the seller's document. Returns whether one existed.
    async fn delete(&self, seller_id: &str) -> BuilderResult<bool>;

    /// All published documents.
    async fn list_active(&self) -> BuilderResult<Vec<Document>>;

    /// Fetch a document, failing when the seller has none.
    async fn require(&self, seller_id: &str) -> BuilderResult<Document> {
        self.load(seller_id)
            .await?
            .ok_or_else(|| BuilderError::DocumentNotFound(seller_id.to_string()))
    }
}

fn prepare_for_save(document: &Document, id: DocumentId) -> Document {
    let mut stored = document.clone();
    stored.id = Some(id);
    stored.updated_at = Some(Utc::now());
    stored.normalize();
    stored
}

// ---------------------------------------------------------------------------
// SurrealDB Document Store
// ---------------------------------------------------------------------------

/// SurrealDB-backed document store. The document JSON is kept verbatim in a
/// `payload` field so that its shape is independent of SurrealDB's types.
#[derive(Clone)]
pub struct SurrealDocumentStore {
    db: Arc<DesignDatabase>,
}

/// Row structure for storing designs in SurrealDB
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DesignRecord {
    seller_id: String,
    document_id: String,
    is_active: bool,
    payload: String,
}

impl DesignRecord {
    fn into_document(self) -> BuilderResult<Document> {
        let mut document: Document = serde_json::from_str(&self.payload)?;
        document.normalize();
        Ok(document)
    }
}

impl SurrealDocumentStore {
    /// Create a new SurrealDB document store.
    pub fn new(db: Arc<DesignDatabase>) -> Self {
        Self { db }
    }

    async fn fetch_record(&self, seller_id: &str) -> BuilderResult<Option<DesignRecord>> {
        let query = format!(
            "SELECT seller_id, document_id, is_active, payload FROM {DESIGN_TABLE} \
             WHERE seller_id = $seller LIMIT 1"
        );
        let mut response = self
            .db
            .inner()
            .query(query)
            .bind(("seller", seller_id.to_string()))
            .await
            .map_err(|e| BuilderError::Persistence(format!("Failed to load design: {}", e)))?;

        let records: Vec<DesignRecord> = response
            .take(0)
            .map_err(|e| BuilderError::Persistence(format!("Failed to parse design: {}", e)))?;

        Ok(records.into_iter().next())
    }
}

#[async_trait]
impl DocumentStore for SurrealDocumentStore {
    async fn load(&self, seller_id: &str) -> BuilderResult<Option<Document>> {
        self.fetch_record(seller_id)
            .await?
            .map(DesignRecord::into_document)
            .transpose()
    }

    async fn save(&self, document: &Document) -> BuilderResult<DocumentId> {
        document.validate()?;

        let existing = match document.id {
            Some(id) => Some(id),
            None => self
                .fetch_record(&document.seller_id)
                .await?
                .and_then(|r| Uuid::parse_str(&r.document_id).ok()),
        };
        let id = existing.unwrap_or_else(Uuid::new_v4);
        let stored = prepare_for_save(document, id);

        let query = format!(
            "UPSERT type::thing('{DESIGN_TABLE}', $seller) CONTENT {{ \
             seller_id: $seller, document_id: $document_id, \
             is_active: $is_active, payload: $payload }}"
        );
        self.db
            .inner()
            .query(query)
            .bind(("seller", stored.seller_id.clone()))
            .bind(("document_id", id.to_string()))
            .bind(("is_active", stored.is_active))
            .bind(("payload", serde_json::to_string(&stored)?))
            .await
            .and_then(|response| response.check())
            .map_err(|e| BuilderError::Persistence(format!("Failed to save design: {}", e)))?;

        tracing::info!(
            seller_id = %stored.seller_id,
            document_id = %id,
            inserted = existing.is_none(),
            "design saved"
        );
        Ok(id)
    }

    async fn delete(&self, seller_id: &str) -> BuilderResult<bool> {
        let existed = self.fetch_record(seller_id).await?.is_some();
        if existed {
            let query = format!("DELETE type::thing('{DESIGN_TABLE}', $seller)");
            self.db
                .inner()
                .query(query)
                .bind(("seller", seller_id.to_string()))
                .await
                .and_then(|response| response.check())
                .map_err(|e| {
                    BuilderError::Persistence(format!("Failed to delete design: {}", e))
                })?;
        }
        Ok(existed)
    }

    async fn list_active(&self) -> BuilderResult<Vec<Document>> {
        let query = format!(
            "SELECT seller_id, document_id, is_active, payload FROM {DESIGN_TABLE} \
             WHERE is_active = true"
        );
        let mut response = self
            .db
            .inner()
            .query(query)
            .await
            .map_err(|e| BuilderError::Persistence(format!("Failed to list designs: {}", e)))?;

        let records: Vec<DesignRecord> = response
            .take(0)
            .map_err(|e| BuilderError::Persistence(format!("Failed to parse designs: {}", e)))?;

        let mut documents = records
            .into_iter()
            .map(DesignRecord::into_document)
            .collect::<BuilderResult<Vec<_>>>()?;
        documents.sort_by(|a, b| a.seller_id.cmp(&b.seller_id));
        Ok(documents)
    }
}

// ---------------------------------------------------------------------------
// In-Memory Document Store (for testing)
// ---------------------------------------------------------------------------

/// In-memory document store for testing and prototyping.
pub struct InMemoryDocumentStore {
    documents: RwLock<HashMap<String, Document>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self {
            documents: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

impl Default for InMemoryDocumentStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn load(&self, seller_id: &str) -> BuilderResult<Option<Document>> {
        let documents = self.documents.read().await;
        Ok(documents.get(seller_id).cloned())
    }

    async fn save(&self, document: &Document) -> BuilderResult<DocumentId> {
        document.validate()?;

        let mut documents = self.documents.write().await;
        let id = document
            .id
            .or_else(|| documents.get(&document.seller_id).and_then(|d| d.id))
            .unwrap_or_else(Uuid::new_v4);

        documents.insert(document.seller_id.clone(), prepare_for_save(document, id));
        Ok(id)
    }

    async fn delete(&self, seller_id: &str) -> BuilderResult<bool> {
        let mut documents = self.documents.write().await;
        Ok(documents.remove(seller_id).is_some())
    }

    async fn list_active(&self) -> BuilderResult<Vec<Document>> {
        let documents = self.documents.read().await;
        let mut active: Vec<Document> = documents.values().filter(|d| d.is_active).cloned().collect();
        active.sort_by(|a, b| a.seller_id.cmp(&b.seller_id));
        Ok(active)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{SectionType, StoreSection};

    fn design(seller: &str) -> Document {
        let mut doc = Document::new(seller);
        doc.sections = vec![
            StoreSection::new(SectionType::Hero, 0),
            StoreSection::new(SectionType::Faq, 1),
        ];
        doc
    }

    async fn exercise_store(store: &dyn DocumentStore) {
        assert!(store.load("seller-a").await.unwrap().is_none());

        let doc = design("seller-a");
        let id = store.save(&doc).await.unwrap();

        let loaded = store.load("seller-a").await.unwrap().unwrap();
        assert_eq!(loaded.id, Some(id));
        assert_eq!(loaded.sections, doc.sections);
        assert!(loaded.updated_at.is_some());

        // A save without a known id updates the existing row.
        let mut second = design("seller-a");
        second.is_active = true;
        assert_eq!(store.save(&second).await.unwrap(), id);

        let active = store.list_active().await.unwrap();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].sections, second.sections);

        assert!(store.delete("seller-a").await.unwrap());
        assert!(!store.delete("seller-a").await.unwrap());
        assert!(matches!(
            store.require("seller-a").await,
            Err(BuilderError::DocumentNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_in_memory_store_contract() {
        let store = InMemoryDocumentStore::new();
        exercise_store(&store).await;
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_surreal_store_contract() {
        let db = Arc::new(DesignDatabase::new_memory().await.unwrap());
        let store = SurrealDocumentStore::new(db);
        exercise_store(&store).await;
    }

    #[tokio::test]
    async fn test_save_rejects_broken_order() {
        let store = InMemoryDocumentStore::new();
        let mut doc = design("seller-b");
        doc.sections[1].order = 4;
        assert!(matches!(
            store.save(&doc).await,
            Err(BuilderError::InvalidDocument(_))
        ));
        assert_eq!(store.len().await, 0);
    }
}
