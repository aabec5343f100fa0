use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::watch;

use crate::{
    error::{AppError, AppResult},
    models::{MediaDraft, MediaId, MediaItem},
    services::{generation::Generation, providers::MediaBackend},
};

/// Fetches tried by a first load that keeps racing writes
pub const MAX_FETCH_ATTEMPTS: usize = 3;

/// Notice shown when an edit targets an item the store does not hold
pub const EDIT_NOT_FOUND_NOTICE: &str = "Please select a movie from the list to edit.";

/// Point-in-time view of the collection published to subscribers
#[derive(Debug, Clone, Default)]
pub struct CollectionSnapshot {
    pub items: Arc<Vec<MediaItem>>,
    /// False until the first successful fetch
    pub loaded: bool,
    /// Bumped on every change
    pub revision: u64,
    pub refreshed_at: Option<DateTime<Utc>>,
}

/// Proof that the user confirmed a delete
///
/// Only obtainable through [`DeleteConfirmation::confirmed`], so a delete can't be
/// issued by accident.
#[derive(Debug, Clone, Copy)]
pub struct DeleteConfirmation(());

impl DeleteConfirmation {
    pub fn confirmed() -> Self {
        Self(())
    }

    /// Converts the user's answer to the confirmation prompt
    pub fn from_answer(confirmed: bool) -> AppResult<Self> {
        if confirmed {
            Ok(Self::confirmed())
        } else {
            Err(AppError::ConfirmationRequired(
                "Deleting an item must be confirmed".to_string(),
            ))
        }
    }
}

/// Single in-memory source of truth for the collection
///
/// Writes go to the backend first; the local copy is patched only with the
/// backend's answer, so a failed write leaves the store untouched.
pub struct CollectionStore {
    backend: Arc<dyn MediaBackend>,
    state: watch::Sender<CollectionSnapshot>,
    generation: Generation,
}

impl CollectionStore {
    pub fn new(backend: Arc<dyn MediaBackend>) -> Self {
        let (state, _) = watch::channel(CollectionSnapshot::default());
        Self {
            backend,
            state,
            generation: Generation::new(),
        }
    }

    /// Receiver notified after every change
    pub fn subscribe(&self) -> watch::Receiver<CollectionSnapshot> {
        self.state.subscribe()
    }

    pub fn snapshot(&self) -> CollectionSnapshot {
        self.state.borrow().clone()
    }

    pub fn get(&self, id: MediaId) -> Option<MediaItem> {
        self.state.borrow().items.iter().find(|i| i.id == id).cloned()
    }

    /// Cached items, fetched from the backend on first use
    pub async fn list(&self) -> AppResult<Arc<Vec<MediaItem>>> {
        let snapshot = self.snapshot();
        if snapshot.loaded {
            return Ok(snapshot.items);
        }
        Ok(self.refresh().await?.items)
    }

    /// Refetches the whole collection
    ///
    /// If a write lands while the fetch is in flight, the fetched list is
    /// discarded. A loaded store keeps its current snapshot; a store that never
    /// loaded fetches again, up to [`MAX_FETCH_ATTEMPTS`] times, after which the
    /// last list fetched is applied.
    pub async fn refresh(&self) -> AppResult<CollectionSnapshot> {
        let mut attempt = 1;
        let items = loop {
            let token = self.generation.begin();
            let items = self.backend.list().await?;

            if self.generation.is_current(token) || attempt == MAX_FETCH_ATTEMPTS {
                break items;
            }
            if self.snapshot().loaded {
                tracing::debug!("Discarding stale collection fetch");
                return Ok(self.snapshot());
            }

            tracing::debug!(attempt = attempt, "Initial collection fetch raced a write, refetching");
            attempt += 1;
        };

        self.state.send_modify(|state| {
            state.items = Arc::new(items);
            state.loaded = true;
            state.revision += 1;
            state.refreshed_at = Some(Utc::now());
        });

        let snapshot = self.snapshot();
        tracing::info!(
            items = snapshot.items.len(),
            revision = snapshot.revision,
            "Collection refreshed"
        );
        Ok(snapshot)
    }

    pub async fn create(&self, draft: MediaDraft) -> AppResult<MediaItem> {
        draft.validate()?;
        let created = self.backend.create(&draft).await?;

        self.apply(|items| items.push(created.clone()));
        Ok(created)
    }

    /// Replaces an item the store already holds
    pub async fn update(&self, id: MediaId, draft: MediaDraft) -> AppResult<MediaItem> {
        if !self.list().await?.iter().any(|i| i.id == id) {
            return Err(AppError::NotFound(EDIT_NOT_FOUND_NOTICE.to_string()));
        }
        draft.validate()?;

        let updated = self.backend.update(id, &draft).await?;

        self.apply(|items| {
            if let Some(slot) = items.iter_mut().find(|i| i.id == id) {
                *slot = updated.clone();
            }
        });
        Ok(updated)
    }

    /// Deletes on the backend, then drops the item locally
    pub async fn delete(&self, id: MediaId, _confirmation: DeleteConfirmation) -> AppResult<()> {
        self.backend.delete(id).await?;
        self.apply(|items| items.retain(|i| i.id != id));
        Ok(())
    }

    /// Patches the local copy and invalidates in-flight fetches
    fn apply(&self, patch: impl FnOnce(&mut Vec<MediaItem>)) {
        self.generation.begin();
        self.state.send_modify(|state| {
            let mut items = state.items.as_ref().clone();
            patch(&mut items);
            state.items = Arc::new(items);
            state.revision += 1;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{MediaType, Status};
    use crate::services::providers::MockMediaBackend;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Notify;
    use tokio_test::{assert_err, assert_ok};

    fn item(id: i64, title: &str) -> MediaItem {
        MediaItem::new(MediaId(id), MediaDraft::new(title, MediaType::Movie))
    }

    fn backend_with(items: Vec<MediaItem>) -> MockMediaBackend {
        let mut backend = MockMediaBackend::new();
        backend.expect_name().return_const("mock");
        backend.expect_list().times(1).return_once(move || Ok(items));
        backend
    }

    async fn loaded_store(backend: MockMediaBackend) -> CollectionStore {
        let store = CollectionStore::new(Arc::new(backend));
        assert_ok!(store.refresh().await);
        store
    }

    #[tokio::test]
    async fn test_list_fetches_once_then_serves_cache() {
        let store = CollectionStore::new(Arc::new(backend_with(vec![item(1, "Heat")])));

        let first = store.list().await.unwrap();
        let second = store.list().await.unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first, second);
        assert!(store.snapshot().loaded);
    }

    #[tokio::test]
    async fn test_create_patches_local_copy() {
        let mut backend = backend_with(vec![]);
        backend
            .expect_create()
            .withf(|draft| draft.title == "Alien")
            .return_once(|draft| Ok(MediaItem::new(MediaId(9), draft.clone())));
        let store = loaded_store(backend).await;

        let created = store.create(MediaDraft::new("Alien", MediaType::Movie)).await.unwrap();
        assert_eq!(created.id, MediaId(9));
        assert_eq!(store.get(MediaId(9)), Some(created));
    }

    #[tokio::test]
    async fn test_create_rejects_blank_title_without_backend_call() {
        let store = loaded_store(backend_with(vec![])).await;
        let result = store.create(MediaDraft::new("  ", MediaType::Movie)).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }

    #[tokio::test]
    async fn test_update_unknown_item_is_not_found() {
        let store = loaded_store(backend_with(vec![item(1, "Heat")])).await;

        let error = store
            .update(MediaId(2), MediaDraft::new("Heat", MediaType::Movie))
            .await
            .unwrap_err();
        assert!(matches!(error, AppError::NotFound(msg) if msg == EDIT_NOT_FOUND_NOTICE));
    }

    #[tokio::test]
    async fn test_update_replaces_item() {
        let mut backend = backend_with(vec![item(1, "Heat")]);
        backend
            .expect_update()
            .withf(|id, _| *id == MediaId(1))
            .return_once(|id, draft| Ok(MediaItem::new(id, draft.clone())));
        let store = loaded_store(backend).await;

        let draft = MediaDraft {
            status: Status::Completed,
            rating: 4.5,
            ..MediaDraft::new("Heat", MediaType::Movie)
        };
        assert_ok!(store.update(MediaId(1), draft).await);

        let stored = store.get(MediaId(1)).unwrap();
        assert_eq!(stored.status(), Status::Completed);
        assert_eq!(stored.details.rating, 4.5);
    }

    #[tokio::test]
    async fn test_failed_write_leaves_state_unchanged() {
        let mut backend = backend_with(vec![item(1, "Heat")]);
        backend
            .expect_delete()
            .return_once(|_| Err(AppError::NetworkFailure("backend down".to_string())));
        let store = loaded_store(backend).await;
        let before = store.snapshot();

        assert_err!(store.delete(MediaId(1), DeleteConfirmation::confirmed()).await);

        let after = store.snapshot();
        assert_eq!(after.revision, before.revision);
        assert_eq!(after.items, before.items);
    }

    #[tokio::test]
    async fn test_delete_removes_after_backend_success() {
        let mut backend = backend_with(vec![item(1, "Heat"), item(2, "Ronin")]);
        backend
            .expect_delete()
            .withf(|id| *id == MediaId(1))
            .times(1)
            .return_once(|_| Ok(()));
        let store = loaded_store(backend).await;

        assert_ok!(store.delete(MediaId(1), DeleteConfirmation::confirmed()).await);
        assert!(store.get(MediaId(1)).is_none());
        assert!(store.get(MediaId(2)).is_some());
    }

    #[tokio::test]
    async fn test_subscribers_see_changes() {
        let mut backend = backend_with(vec![]);
        backend
            .expect_create()
            .return_once(|draft| Ok(MediaItem::new(MediaId(3), draft.clone())));
        let store = loaded_store(backend).await;
        let mut receiver = store.subscribe();
        receiver.borrow_and_update();

        store.create(MediaDraft::new("Ronin", MediaType::Movie)).await.unwrap();

        assert!(receiver.has_changed().unwrap());
        assert_eq!(receiver.borrow_and_update().items.len(), 1);
    }

    /// Backend whose first `list` call holds until released, returning the
    /// rows as they stood when the call started
    struct GatedBackend {
        rows: std::sync::Mutex<Vec<MediaItem>>,
        lists: AtomicUsize,
        entered: Notify,
        release: Notify,
    }

    impl GatedBackend {
        fn new(rows: Vec<MediaItem>) -> Self {
            Self {
                rows: std::sync::Mutex::new(rows),
                lists: AtomicUsize::new(0),
                entered: Notify::new(),
                release: Notify::new(),
            }
        }
    }

    #[async_trait::async_trait]
    impl MediaBackend for GatedBackend {
        async fn list(&self) -> AppResult<Vec<MediaItem>> {
            let rows = self.rows.lock().unwrap().clone();
            if self.lists.fetch_add(1, Ordering::SeqCst) == 0 {
                self.entered.notify_one();
                self.release.notified().await;
            }
            Ok(rows)
        }

        async fn create(&self, draft: &MediaDraft) -> AppResult<MediaItem> {
            let mut rows = self.rows.lock().unwrap();
            let created = MediaItem::new(MediaId(rows.len() as i64 + 1), draft.clone());
            rows.push(created.clone());
            Ok(created)
        }

        async fn update(&self, _id: MediaId, _draft: &MediaDraft) -> AppResult<MediaItem> {
            unimplemented!()
        }

        async fn delete(&self, _id: MediaId) -> AppResult<()> {
            unimplemented!()
        }

        fn name(&self) -> &'static str {
            "gated"
        }
    }

    #[tokio::test]
    async fn test_first_load_raced_by_write_refetches() {
        let backend = Arc::new(GatedBackend::new(vec![
            item(1, "Heat"),
            item(2, "Ronin"),
            item(3, "Thief"),
        ]));
        let store = Arc::new(CollectionStore::new(backend.clone()));

        let loading = tokio::spawn({
            let store = store.clone();
            async move { store.list().await }
        });
        backend.entered.notified().await;

        assert_ok!(store.create(MediaDraft::new("New", MediaType::Movie)).await);
        backend.release.notify_one();

        let items = loading.await.unwrap().unwrap();
        assert_eq!(items.len(), 4);
        assert!(store.snapshot().loaded);
        assert_eq!(backend.lists.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stale_refresh_keeps_loaded_snapshot() {
        let backend = Arc::new(GatedBackend::new(vec![item(1, "Heat")]));
        let store = Arc::new(CollectionStore::new(backend.clone()));

        let refreshing = tokio::spawn({
            let store = store.clone();
            async move { store.refresh().await }
        });
        backend.entered.notified().await;

        // Second fetch is not gated and completes first
        assert_ok!(store.refresh().await);
        assert_ok!(store.create(MediaDraft::new("New", MediaType::Movie)).await);
        backend.release.notify_one();

        let snapshot = refreshing.await.unwrap().unwrap();
        assert_eq!(snapshot.items.len(), 2);
        assert_eq!(backend.lists.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        assert!(matches!(
            DeleteConfirmation::from_answer(false),
            Err(AppError::ConfirmationRequired(_))
        ));
        assert!(DeleteConfirmation::from_answer(true).is_ok());
    }
}
