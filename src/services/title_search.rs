use std::sync::Arc;

use crate::{
    error::{AppError, AppResult},
    models::{rescale_vote, Genres, LookupCandidate, LookupKind, MediaDraft, Status},
    services::{generation::Generation, providers::MetadataProvider},
};

/// Number of search hits offered for auto-fill
pub const MAX_CANDIDATES: usize = 5;

/// Auto-fill for the add-item form
///
/// Delegates to the configured MetadataProvider. Searches are tagged with a
/// generation token: once a newer search has started, an older one that resolves
/// late is answered with [`AppError::Superseded`] instead of its results.
pub struct TitleLookup {
    provider: Arc<dyn MetadataProvider>,
    primary_region: String,
    fallback_region: String,
    searches: Generation,
}

impl TitleLookup {
    pub fn new(
        provider: Arc<dyn MetadataProvider>,
        primary_region: impl Into<String>,
        fallback_region: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            primary_region: primary_region.into(),
            fallback_region: fallback_region.into(),
            searches: Generation::new(),
        }
    }

    pub async fn search(&self, query: &str) -> AppResult<Vec<LookupCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(AppError::InvalidInput(
                "Search query cannot be empty".to_string(),
            ));
        }

        let token = self.searches.begin();
        let mut candidates = self.provider.search(query).await?;

        if !self.searches.is_current(token) {
            tracing::debug!(query = %query, "Discarding superseded search");
            return Err(AppError::Superseded);
        }

        candidates.truncate(MAX_CANDIDATES);
        Ok(candidates)
    }

    /// Builds a draft pre-filled from the catalog
    ///
    /// Details and platform availability are fetched concurrently. Availability
    /// is best effort: when it fails the draft simply has no platform.
    pub async fn prefill(&self, kind: LookupKind, id: u64) -> AppResult<MediaDraft> {
        let (details, availability) = tokio::join!(
            self.provider.details(kind, id),
            self.provider.availability(kind, id)
        );
        let details = details?;

        let platform = match availability {
            Ok(availability) => availability.platform_for(&self.primary_region, &self.fallback_region),
            Err(e) => {
                tracing::warn!(error = %e, kind = %kind, id = id, "Availability lookup failed");
                None
            }
        };

        tracing::info!(
            kind = %kind,
            id = id,
            title = %details.title,
            platform = ?platform,
            provider = self.provider.name(),
            "Draft pre-filled"
        );

        Ok(MediaDraft {
            title: details.title,
            media_type: kind.into(),
            poster_url: details.poster_url,
            director: details.director,
            genre: details.genres.iter().collect::<Genres>(),
            platform,
            status: Status::Wishlist,
            rating: details.vote_average.map(rescale_vote).unwrap_or_default(),
            review: None,
            total_episodes: details.total_episodes,
            current_episode: 0,
        })
    }
}
