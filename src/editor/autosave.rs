//! Debounced background saving.
//!
//! Each scheduled document restarts the quiet-period timer; only the last
//! document scheduled before the timer fires is written. Cancelling, or
//! dropping the [`Autosaver`], discards a pending save without flushing it.
//! Manual saves go through the same task, so at most one write to the store
//! is in flight at any time and a manual save always lands after any
//! autosave that started before it.

use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::error::{BuilderError, BuilderResult};
use crate::model::{Document, DocumentId};
use crate::store::DocumentStore;

/// SHA-256 of the document content, ignoring store-assigned fields.
pub type Fingerprint = [u8; 32];

pub fn fingerprint(document: &Document) -> Fingerprint {
    let mut content = document.clone();
    content.id = None;
    content.updated_at = None;
    let bytes = serde_json::to_vec(&content).unwrap_or_default();
    Sha256::digest(&bytes).into()
}

#[derive(Debug, Clone, PartialEq)]
pub enum SaveStatus {
    Idle,
    /// A save is scheduled and waiting for the quiet period.
    Pending,
    Saving,
    Saved { id: DocumentId, at: DateTime<Utc> },
    /// The pending document matched the last saved content.
    UpToDate,
    Failed(String),
}

enum Command {
    Schedule(Box<Document>),
    Cancel,
    SaveNow(Box<Document>, oneshot::Sender<BuilderResult<DocumentId>>),
}

/// Handle to the debounced saver task.
pub struct Autosaver {
    tx: mpsc::UnboundedSender<Command>,
    status: watch::Receiver<SaveStatus>,
    task: JoinHandle<()>,
}

impl Autosaver {
    /// Spawn the saver on the current tokio runtime.
    pub fn spawn(store: Arc<dyn DocumentStore>, debounce: Duration) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let (status_tx, status) = watch::channel(SaveStatus::Idle);
        let task = tokio::spawn(run(store, debounce, rx, status_tx));
        Self { tx, status, task }
    }

    /// Queue `document` for saving after the quiet period, replacing any
    /// document already pending.
    pub fn schedule(&self, document: Document) {
        if self.tx.send(Command::Schedule(Box::new(document))).is_err() {
            tracing::warn!("autosave task is gone; edit not scheduled");
        }
    }

    /// Drop the pending save, if any.
    pub fn cancel(&self) {
        let _ = self.tx.send(Command::Cancel);
    }

    /// Write `document` now, replacing any pending save. Waits for an
    /// autosave already in flight to finish first.
    pub async fn save_now(&self, document: Document) -> BuilderResult<DocumentId> {
        let (reply, rx) = oneshot::channel();
        self.tx
            .send(Command::SaveNow(Box::new(document), reply))
            .map_err(|_| BuilderError::Internal("autosave task is gone".to_string()))?;
        rx.await
            .map_err(|_| BuilderError::Internal("autosave task dropped the save".to_string()))?
    }

    pub fn status(&self) -> SaveStatus {
        self.status.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status.clone()
    }

    /// Cancel any pending save and wait for the task to finish.
    pub async fn close(self) {
        let Autosaver { tx, task, .. } = self;
        let _ = tx.send(Command::Cancel);
        drop(tx);
        if let Err(e) = task.await {
            tracing::warn!(error = %e, "autosave task ended abnormally");
        }
    }
}

async fn run(
    store: Arc<dyn DocumentStore>,
    debounce: Duration,
    mut rx: mpsc::UnboundedReceiver<Command>,
    status: watch::Sender<SaveStatus>,
) {
    let mut pending: Option<Document> = None;
    let mut deadline = Instant::now();
    let mut last_saved: Option<Fingerprint> = None;

    loop {
        tokio::select! {
            command = rx.recv() => match command {
                Some(Command::Schedule(document)) => {
                    pending = Some(*document);
                    deadline = Instant::now() + debounce;
                    status.send_replace(SaveStatus::Pending);
                }
                Some(Command::Cancel) => {
                    if pending.take().is_some() {
                        tracing::debug!("pending autosave cancelled");
                        status.send_replace(SaveStatus::Idle);
                    }
                }
                Some(Command::SaveNow(document, reply)) => {
                    if pending.take().is_some() {
                        tracing::debug!("pending autosave superseded by manual save");
                    }
                    let result = write(store.as_ref(), &document, &mut last_saved, &status).await;
                    let _ = reply.send(result);
                }
                None => {
                    if pending.is_some() {
                        tracing::debug!("autosaver closed with a pending save; discarding");
                    }
                    break;
                }
            },
            _ = tokio::time::sleep_until(deadline), if pending.is_some() => {
                if let Some(document) = pending.take() {
                    save_once(store.as_ref(), &document, &mut last_saved, &status).await;
                }
            }
        }
    }
}

async fn save_once(
    store: &dyn DocumentStore,
    document: &Document,
    last_saved: &mut Option<Fingerprint>,
    status: &watch::Sender<SaveStatus>,
) {
    let print = fingerprint(document);
    if *last_saved == Some(print) {
        tracing::debug!(seller_id = %document.seller_id, "document unchanged; autosave skipped");
        status.send_replace(SaveStatus::UpToDate);
        return;
    }

    if write(store, document, last_saved, status).await.is_ok() {
        tracing::info!(seller_id = %document.seller_id, "autosaved design");
    }
}

async fn write(
    store: &dyn DocumentStore,
    document: &Document,
    last_saved: &mut Option<Fingerprint>,
    status: &watch::Sender<SaveStatus>,
) -> BuilderResult<DocumentId> {
    status.send_replace(SaveStatus::Saving);
    match store.save(document).await {
        Ok(id) => {
            *last_saved = Some(fingerprint(document));
            status.send_replace(SaveStatus::Saved { id, at: Utc::now() });
            Ok(id)
        }
        Err(e) => {
            tracing::warn!(seller_id = %document.seller_id, error = %e, "design save failed");
            status.send_replace(SaveStatus::Failed(e.to_string()));
            Err(e)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{SectionType, StoreSection};
    use crate::store::InMemoryDocumentStore;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Store that counts saves and can be switched to fail.
    #[derive(Default)]
    pub(crate) struct CountingStore {
        pub inner: InMemoryDocumentStore,
        pub saves: AtomicUsize,
        pub fail: std::sync::atomic::AtomicBool,
    }

    #[async_trait]
    impl DocumentStore for CountingStore {
        async fn load(&self, seller_id: &str) -> BuilderResult<Option<Document>> {
            self.inner.load(seller_id).await
        }

        async fn save(&self, document: &Document) -> BuilderResult<DocumentId> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(BuilderError::Persistence("connection refused".into()));
            }
            self.saves.fetch_add(1, Ordering::SeqCst);
            self.inner.save(document).await
        }

        async fn delete(&self, seller_id: &str) -> BuilderResult<bool> {
            self.inner.delete(seller_id).await
        }

        async fn list_active(&self) -> BuilderResult<Vec<Document>> {
            self.inner.list_active().await
        }
    }

    fn document_with(n: usize) -> Document {
        let mut doc = Document::new("seller-1");
        doc.sections = (0..n)
            .map(|i| StoreSection::new(SectionType::Divider, i))
            .collect();
        doc
    }

    async fn wait_until(
        rx: &mut watch::Receiver<SaveStatus>,
        f: impl FnMut(&SaveStatus) -> bool,
    ) -> SaveStatus {
        rx.wait_for(f).await.unwrap().clone()
    }

    const DEBOUNCE: Duration = Duration::from_secs(2);

    #[tokio::test(start_paused = true)]
    async fn test_rapid_edits_coalesce_into_one_save() {
        let store = Arc::new(CountingStore::default());
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);
        let mut status = saver.subscribe();

        for n in 1..=5 {
            saver.schedule(document_with(n));
            tokio::time::advance(Duration::from_millis(500)).await;
        }

        wait_until(&mut status, |s| matches!(s, SaveStatus::Saved { .. })).await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        let saved = store.inner.load("seller-1").await.unwrap().unwrap();
        assert_eq!(saved.sections.len(), 5);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_discards_pending_save() {
        let store = Arc::new(CountingStore::default());
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);

        saver.schedule(document_with(1));
        saver.cancel();
        tokio::time::sleep(DEBOUNCE * 3).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
        assert_eq!(saver.status(), SaveStatus::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drop_discards_pending_save() {
        let store = Arc::new(CountingStore::default());
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);

        saver.schedule(document_with(1));
        drop(saver);
        tokio::time::sleep(DEBOUNCE * 3).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_document_is_not_saved_twice() {
        let store = Arc::new(CountingStore::default());
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);
        let mut status = saver.subscribe();

        let doc = document_with(2);
        saver.schedule(doc.clone());
        wait_until(&mut status, |s| matches!(s, SaveStatus::Saved { .. })).await;

        saver.schedule(doc);
        wait_until(&mut status, |s| *s == SaveStatus::UpToDate).await;
        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failed_save_reports_status() {
        let store = Arc::new(CountingStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);
        let mut status = saver.subscribe();

        saver.schedule(document_with(1));
        let last = wait_until(&mut status, |s| matches!(s, SaveStatus::Failed(_))).await;
        assert!(matches!(last, SaveStatus::Failed(msg) if msg.contains("connection refused")));
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_now_supersedes_pending_save() {
        let store = Arc::new(CountingStore::default());
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);

        saver.schedule(document_with(1));
        let id = saver.save_now(document_with(3)).await.unwrap();
        tokio::time::sleep(DEBOUNCE * 3).await;

        assert_eq!(store.saves.load(Ordering::SeqCst), 1);
        let saved = store.inner.load("seller-1").await.unwrap().unwrap();
        assert_eq!(saved.id, Some(id));
        assert_eq!(saved.sections.len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_save_now_reports_store_error() {
        let store = Arc::new(CountingStore::default());
        store.fail.store(true, Ordering::SeqCst);
        let saver = Autosaver::spawn(store.clone(), DEBOUNCE);

        let result = saver.save_now(document_with(1)).await;
        assert!(matches!(result, Err(BuilderError::Persistence(_))));
        assert!(matches!(saver.status(), SaveStatus::Failed(_)));
    }

    #[test]
    fn test_fingerprint_ignores_store_fields() {
        let doc = document_with(1);
        let mut saved = doc.clone();
        saved.id = Some(uuid::Uuid::new_v4());
        saved.updated_at = Some(Utc::now());
        assert_eq!(fingerprint(&doc), fingerprint(&saved));
    }
}
