use serde::Deserialize;
use std::collections::HashMap;

pub mod genres;
pub mod lookup;
pub mod media;

pub use genres::{Genres, GENRE_SEPARATOR};
pub use lookup::{
    rescale_vote, Availability, DiscoveredTitle, LookupCandidate, LookupKind,
    RecommendationCandidate, TitleDetails,
};
pub use media::{MediaDraft, MediaId, MediaItem, MediaType, Status};

// ============================================================================
// TMDB API Types
// ============================================================================

/// Paged result envelope shared by search and discover endpoints
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPage<T> {
    #[serde(default = "Vec::new")]
    pub results: Vec<T>,
}

/// Hit from GET /search/multi
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbSearchHit {
    pub id: u64,
    #[serde(default)]
    pub media_type: Option<String>,
    /// Movie title
    #[serde(default)]
    pub title: Option<String>,
    /// Series name
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub release_date: Option<String>,
    #[serde(default)]
    pub first_air_date: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
}

/// Response from GET /movie/{id}?append_to_response=credits and GET /tv/{id}
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbDetails {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
    #[serde(default)]
    pub genres: Vec<TmdbGenre>,
    #[serde(default)]
    pub credits: Option<TmdbCredits>,
    #[serde(default)]
    pub created_by: Vec<TmdbPerson>,
    #[serde(default)]
    pub number_of_episodes: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbGenre {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbCredits {
    #[serde(default)]
    pub crew: Vec<TmdbCrewMember>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbCrewMember {
    pub name: String,
    #[serde(default)]
    pub job: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbPerson {
    pub name: String,
}

/// Response from GET /{movie|tv}/{id}/watch/providers
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbWatchProviders {
    #[serde(default)]
    pub results: HashMap<String, TmdbRegionProviders>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TmdbRegionProviders {
    /// Subscription offers; rent/buy offers are ignored
    #[serde(default)]
    pub flatrate: Vec<TmdbWatchProvider>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TmdbWatchProvider {
    pub provider_name: String,
}

/// Hit from GET /discover/movie
#[derive(Debug, Clone, Deserialize)]
pub struct TmdbDiscoverHit {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub poster_path: Option<String>,
    #[serde(default)]
    pub vote_average: Option<f64>,
}
