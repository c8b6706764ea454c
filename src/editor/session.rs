use std::sync::Arc;

use crate::config::EditorConfig;
use crate::editor::autosave::{Autosaver, SaveStatus};
use crate::editor::builder::{BuilderAction, StoreBuilder};
use crate::editor::notice::Notice;
use crate::error::BuilderError;
use crate::model::{find_preset, Document};
use crate::store::DocumentStore;

/// An editing session of one seller's storefront.
///
/// Binds a [`StoreBuilder`] to an [`Autosaver`], which owns every write to
/// the document store. This is the operation boundary: every error is logged
/// and turned into a [`Notice`], never returned to the caller.
pub struct EditorSession {
    builder: StoreBuilder,
    autosaver: Autosaver,
}

impl EditorSession {
    /// Load the seller's design. A seller without one starts from
    /// `starter_preset` when given, otherwise blank.
    ///
    /// A failed load is returned as the notice to show and no session is
    /// started.
    pub async fn open(
        store: Arc<dyn DocumentStore>,
        seller_id: &str,
        starter_preset: Option<&str>,
        config: &EditorConfig,
    ) -> Result<Self, Notice> {
        let loaded = match store.load(seller_id).await {
            Ok(loaded) => loaded,
            Err(e) => {
                tracing::warn!(seller_id, error = %e, "failed to load design");
                return Err(Notice::error("Failed to load store design"));
            }
        };

        let document = match (loaded, starter_preset) {
            (Some(document), _) => {
                tracing::info!(seller_id, sections = document.sections.len(), "design loaded");
                document
            }
            (None, Some(preset_id)) => {
                let preset = find_preset(preset_id).ok_or_else(|| {
                    Notice::from(&BuilderError::ThemePresetNotFound(preset_id.to_string()))
                })?;
                tracing::info!(seller_id, preset = preset_id, "no design yet; starting from preset");
                Document::from_preset(seller_id, &preset)
            }
            (None, None) => {
                tracing::info!(seller_id, "no design yet; starting blank");
                Document::new(seller_id)
            }
        };
        Ok(Self::with_document(store, document, config))
    }

    pub fn with_document(
        store: Arc<dyn DocumentStore>,
        document: Document,
        config: &EditorConfig,
    ) -> Self {
        Self {
            builder: StoreBuilder::with_max_versions(document, config.max_versions),
            autosaver: Autosaver::spawn(store, config.autosave_debounce()),
        }
    }

    pub fn builder(&self) -> &StoreBuilder {
        &self.builder
    }

    pub fn document(&self) -> &Document {
        self.builder.document()
    }

    pub fn save_status(&self) -> SaveStatus {
        self.autosaver.status()
    }

    /// Pick up the id assigned by an earlier auto-save insert.
    fn adopt_saved_id(&mut self) {
        if self.builder.document().id.is_none() {
            if let SaveStatus::Saved { id, .. } = self.autosaver.status() {
                self.builder.set_document_id(id);
            }
        }
    }

    fn report(&self, err: &BuilderError) -> Notice {
        if err.is_validation() {
            tracing::debug!(seller_id = %self.document().seller_id, error = %err, "action rejected");
        } else {
            tracing::warn!(seller_id = %self.document().seller_id, error = %err, "action failed");
        }
        Notice::from(err)
    }

    /// Apply an editor action and schedule an auto-save when it changed the
    /// document. Returns the notification to show, if any.
    pub fn dispatch(&mut self, action: BuilderAction) -> Option<Notice> {
        self.adopt_saved_id();
        match self.builder.apply(&action) {
            Ok(changed) => {
                if changed {
                    self.autosaver.schedule(self.builder.document().clone());
                }
                action.success_message().map(Notice::success)
            }
            Err(e) => Some(self.report(&e)),
        }
    }

    /// Save immediately, superseding any pending auto-save. The write is
    /// queued behind an auto-save already in flight, so it always lands last.
    /// On failure the in-memory design is kept as is.
    pub async fn save(&mut self) -> Notice {
        self.adopt_saved_id();
        let document = self.builder.document().clone();
        match self.autosaver.save_now(document).await {
            Ok(id) => {
                self.builder.set_document_id(id);
                self.builder.mark_saved();
                tracing::info!(seller_id = %self.document().seller_id, document_id = %id, "design saved");
                Notice::success("Store design saved")
            }
            Err(e) => self.report(&e),
        }
    }

    /// Checkpoint the design as a "Pre-publish" version, mark it active and
    /// save it.
    pub async fn publish(&mut self) -> Notice {
        let version_id = self.builder.prepare_publish();
        tracing::info!(seller_id = %self.document().seller_id, %version_id, "publishing design");
        let notice = self.save().await;
        if notice.is_error() {
            notice
        } else {
            Notice::success("Store published")
        }
    }

    pub async fn unpublish(&mut self) -> Notice {
        self.builder.unpublish();
        let notice = self.save().await;
        if notice.is_error() {
            notice
        } else {
            Notice::success("Store unpublished")
        }
    }

    /// End the session. A pending auto-save is discarded, not flushed.
    pub async fn close(self) -> Document {
        let EditorSession { builder, autosaver } = self;
        autosaver.close().await;
        builder.into_document()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::editor::autosave::tests::CountingStore;
    use crate::editor::notice::NoticeLevel;
    use crate::error::BuilderResult;
    use crate::model::{DocumentId, SectionType};
    use crate::store::InMemoryDocumentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::Duration;

    fn config() -> EditorConfig {
        EditorConfig {
            autosave_debounce_ms: 2000,
            max_versions: 10,
        }
    }

    async fn settle() {
        tokio::time::sleep(Duration::from_secs(5)).await;
    }

    /// Store whose first save takes a second to complete.
    struct SlowFirstSave {
        inner: InMemoryDocumentStore,
        slow: AtomicBool,
    }

    impl SlowFirstSave {
        fn new() -> Self {
            Self {
                inner: InMemoryDocumentStore::new(),
                slow: AtomicBool::new(true),
            }
        }
    }

    #[async_trait]
    impl DocumentStore for SlowFirstSave {
        async fn load(&self, seller_id: &str) -> BuilderResult<Option<Document>> {
            self.inner.load(seller_id).await
        }

        async fn save(&self, document: &Document) -> BuilderResult<DocumentId> {
            if self.slow.swap(false, Ordering::SeqCst) {
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
            self.inner.save(document).await
        }

        async fn delete(&self, seller_id: &str) -> BuilderResult<bool> {
            self.inner.delete(seller_id).await
        }

        async fn list_active(&self) -> BuilderResult<Vec<Document>> {
            self.inner.list_active().await
        }
    }

    /// Store that cannot be reached.
    struct OfflineStore;

    #[async_trait]
    impl DocumentStore for OfflineStore {
        async fn load(&self, _seller_id: &str) -> BuilderResult<Option<Document>> {
            Err(BuilderError::Persistence("connection refused".into()))
        }

        async fn save(&self, _document: &Document) -> BuilderResult<DocumentId> {
            Err(BuilderError::Persistence("connection refused".into()))
        }

        async fn delete(&self, _seller_id: &str) -> BuilderResult<bool> {
            Err(BuilderError::Persistence("connection refused".into()))
        }

        async fn list_active(&self) -> BuilderResult<Vec<Document>> {
            Err(BuilderError::Persistence("connection refused".into()))
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_open_blank_and_autosave_after_edit() {
        let store = Arc::new(CountingStore::default());
        let mut session = EditorSession::open(store.clone(), "seller-1", None, &config())
            .await
            .unwrap();
        assert!(session.document().sections.is_empty());

        assert_eq!(
            session.dispatch(BuilderAction::AddSection {
                section_type: SectionType::Hero
            }),
            None
        );
        settle().await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        let saved = store.inner.load("seller-1").await.unwrap().unwrap();
        assert_eq!(saved.sections.len(), 1);

        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::Faq,
        });
        assert!(session.document().id.is_some());
        session.close().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_validation_error_becomes_notice_without_save() {
        let store = Arc::new(CountingStore::default());
        let mut session = EditorSession::with_document(store.clone(), Document::new("s"), &config());

        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::Hero,
        });
        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::Video,
        });
        settle().await;
        let saves = store.saves.load(Ordering::SeqCst);

        let hero = session.document().sections[0].id.clone();
        let video = session.document().sections[1].id.clone();
        let copied = session.dispatch(BuilderAction::CopySettings { id: hero });
        assert_eq!(copied, Some(Notice::success("Settings copied")));

        let before = session.document().clone();
        let notice = session
            .dispatch(BuilderAction::PasteSettings { id: video })
            .unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert_eq!(session.document(), &before);

        settle().await;
        assert_eq!(store.saves.load(Ordering::SeqCst), saves);
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_checkpoints_and_saves() {
        let store = Arc::new(CountingStore::default());
        let mut session = EditorSession::with_document(store.clone(), Document::new("s"), &config());
        session.dispatch(BuilderAction::ApplyThemePreset {
            preset: "bold".to_string(),
        });

        let notice = session.publish().await;
        assert_eq!(notice, Notice::success("Store published"));

        let saved = store.inner.require("s").await.unwrap();
        assert!(saved.is_active);
        assert!(saved.version_history[0].name.starts_with("Pre-publish"));
        assert_eq!(saved.theme_preset, "bold");
        assert!(!session.builder().is_dirty());

        // The manual save superseded the pending auto-save.
        settle().await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        assert_eq!(store.inner.list_active().await.unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_failure_keeps_local_state() {
        let store = Arc::new(CountingStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let mut session = EditorSession::with_document(store.clone(), Document::new("s"), &config());
        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::Cta,
        });

        settle().await;
        assert!(matches!(session.save_status(), SaveStatus::Failed(_)));

        let notice = session.save().await;
        assert!(notice.is_error());
        assert_eq!(session.document().sections.len(), 1);
        assert!(session.builder().is_dirty());

        store.fail.store(false, Ordering::SeqCst);
        assert_eq!(session.save().await, Notice::success("Store design saved"));
        assert_eq!(store.inner.require("s").await.unwrap().sections.len(), 1);
    }

    #[tokio::test]
    async fn test_open_existing_design() {
        let store = Arc::new(CountingStore::default());
        let mut doc = Document::new("seller-9");
        doc.sections
            .push(crate::model::StoreSection::new(SectionType::Stats, 0));
        store.inner.save(&doc).await.unwrap();

        let session = EditorSession::open(store, "seller-9", None, &config()).await.unwrap();
        assert_eq!(session.document().sections.len(), 1);
        assert!(session.document().id.is_some());
        assert!(!session.builder().history().can_undo());
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_save_lands_after_inflight_autosave() {
        let store = Arc::new(SlowFirstSave::new());
        let mut session = EditorSession::with_document(store.clone(), Document::new("s"), &config());

        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::Hero,
        });
        // The auto-save has started and is stuck in the slow write.
        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(session.save_status(), SaveStatus::Saving);

        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::Faq,
        });
        assert_eq!(session.save().await, Notice::success("Store design saved"));
        assert_eq!(store.inner.require("s").await.unwrap().sections.len(), 2);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(store.inner.require("s").await.unwrap().sections.len(), 2);
        assert!(matches!(session.save_status(), SaveStatus::Saved { .. }));
        assert!(!session.builder().is_dirty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_publish_is_not_undone_by_inflight_autosave() {
        let store = Arc::new(SlowFirstSave::new());
        let mut session = EditorSession::with_document(store.clone(), Document::new("s"), &config());

        session.dispatch(BuilderAction::AddSection {
            section_type: SectionType::About,
        });
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(session.publish().await, Notice::success("Store published"));
        settle().await;

        let stored = store.inner.require("s").await.unwrap();
        assert!(stored.is_active);
        assert_eq!(stored.version_history.len(), 1);
    }

    #[tokio::test]
    async fn test_open_new_seller_from_preset() {
        let store = Arc::new(CountingStore::default());
        let session = EditorSession::open(store, "seller-new", Some("elegant"), &config())
            .await
            .unwrap();
        assert_eq!(session.document().theme_preset, "elegant");
        assert_eq!(session.document().sections.len(), 5);
        assert!(!session.builder().history().can_undo());
        session.close().await;
    }

    #[tokio::test]
    async fn test_open_failures_become_notices() {
        let store = Arc::new(CountingStore::default());
        let notice = EditorSession::open(store, "seller-new", Some("glitter"), &config())
            .await
            .err()
            .unwrap();
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("glitter"));

        let notice = EditorSession::open(Arc::new(OfflineStore), "s", None, &config())
            .await
            .err()
            .unwrap();
        assert_eq!(notice, Notice::error("Failed to load store design"));
    }
}
