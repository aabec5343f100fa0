/// External collaborators
///
/// Two seams sit here: the collection backend that persists media items, and the
/// metadata catalog used for auto-fill and discovery. Services only see the traits,
/// so tests swap in mocks and the gateway can be pointed at any compatible API.
use crate::{
    error::AppResult,
    models::{
        Availability, DiscoveredTitle, LookupCandidate, LookupKind, MediaDraft, MediaId,
        MediaItem, TitleDetails,
    },
};

pub mod backend;
pub mod tmdb;

pub use backend::HttpMediaBackend;
pub use tmdb::TmdbProvider;

/// Persistence backend for the collection
///
/// Every call is a direct pass-through to the backend's `/media/` resource.
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MediaBackend: Send + Sync {
    /// Fetch every stored item
    async fn list(&self) -> AppResult<Vec<MediaItem>>;

    /// Store a new item; the backend assigns its id
    async fn create(&self, draft: &MediaDraft) -> AppResult<MediaItem>;

    /// Replace every field of an existing item
    async fn update(&self, id: MediaId, draft: &MediaDraft) -> AppResult<MediaItem>;

    async fn delete(&self, id: MediaId) -> AppResult<()>;

    /// Backend name for logging
    fn name(&self) -> &'static str;
}

/// Movie/TV metadata catalog
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait MetadataProvider: Send + Sync {
    /// Free-text search across movies and series
    ///
    /// Returns ranked hits; anything that is neither a movie nor a series is
    /// already dropped.
    async fn search(&self, query: &str) -> AppResult<Vec<LookupCandidate>>;

    /// Details, credits included
    async fn details(&self, kind: LookupKind, id: u64) -> AppResult<TitleDetails>;

    /// Subscription platforms per region
    async fn availability(&self, kind: LookupKind, id: u64) -> AppResult<Availability>;

    /// Popular movies for a catalog genre id, first page only
    async fn discover(&self, genre_id: u32) -> AppResult<Vec<DiscoveredTitle>>;

    /// Provider name for logging and debugging
    fn name(&self) -> &'static str;
}
