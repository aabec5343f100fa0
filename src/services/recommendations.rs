use rand::{seq::SliceRandom, Rng};
use std::collections::HashSet;

use crate::{
    error::AppResult,
    models::{rescale_vote, MediaItem, MediaType, RecommendationCandidate, Status},
    services::{aggregate::tally_genres, providers::MetadataProvider},
};

/// Genre used when the rating history says nothing
pub const DEFAULT_GENRE: &str = "Action";
/// Catalog id of [`DEFAULT_GENRE`]
pub const DEFAULT_GENRE_ID: u32 = 28;
/// Completed items rated at least this much count as liked
pub const LIKED_RATING: f64 = 3.0;

/// Catalog genre ids by genre name
const GENRE_IDS: &[(&str, u32)] = &[
    ("Action", 28),
    ("Adventure", 12),
    ("Animation", 16),
    ("Comedy", 35),
    ("Crime", 80),
    ("Documentary", 99),
    ("Drama", 18),
    ("Family", 10751),
    ("Fantasy", 14),
    ("History", 36),
    ("Horror", 27),
    ("Music", 10402),
    ("Mystery", 9648),
    ("Romance", 10749),
    ("Science Fiction", 878),
    ("Sci-Fi", 878),
    ("TV Movie", 10770),
    ("Thriller", 53),
    ("War", 10752),
    ("Western", 37),
];

/// Most common genre among completed items rated [`LIKED_RATING`] or higher
///
/// Ties go to the genre seen first. Falls back to [`DEFAULT_GENRE`] when no
/// liked item carries a genre.
pub fn preferred_genre(items: &[MediaItem]) -> String {
    let liked = items
        .iter()
        .filter(|item| item.status() == Status::Completed && item.details.rating >= LIKED_RATING);

    tally_genres(liked)
        .into_iter()
        .fold(None, |best: Option<(String, usize)>, genre| match best {
            Some((_, count)) if count >= genre.count => best,
            _ => Some((genre.name, genre.count)),
        })
        .map(|(name, _)| name)
        .unwrap_or_else(|| DEFAULT_GENRE.to_string())
}

/// Catalog id for a genre name, ignoring case; unknown names map to the default id
pub fn genre_id(name: &str) -> u32 {
    GENRE_IDS
        .iter()
        .find(|(known, _)| known.eq_ignore_ascii_case(name.trim()))
        .map(|(_, id)| *id)
        .unwrap_or(DEFAULT_GENRE_ID)
}

/// Suggests one title the collection does not already contain
///
/// Returns `Ok(None)` when discovery worked but every title is already owned;
/// a failed discovery call is returned as the error so callers can tell the two
/// apart.
pub async fn recommend<R>(
    items: &[MediaItem],
    provider: &dyn MetadataProvider,
    rng: &mut R,
) -> AppResult<Option<RecommendationCandidate>>
where
    R: Rng + ?Sized,
{
    let genre = preferred_genre(items);
    let genre_id = genre_id(&genre);

    tracing::info!(
        genre = %genre,
        genre_id = genre_id,
        provider = provider.name(),
        "Fetching recommendations"
    );

    let discovered = provider.discover(genre_id).await.map_err(|e| {
        tracing::error!(error = %e, genre = %genre, "Discovery failed");
        e
    })?;

    let owned: HashSet<String> = items.iter().map(|i| i.title().to_lowercase()).collect();
    let fresh: Vec<_> = discovered
        .into_iter()
        .filter(|title| !owned.contains(&title.title.to_lowercase()))
        .collect();

    let Some(pick) = fresh.choose(rng) else {
        tracing::info!(genre = %genre, "No new recommendation available");
        return Ok(None);
    };

    tracing::info!(
        genre = %genre,
        pool = fresh.len(),
        title = %pick.title,
        "Recommendation selected"
    );

    Ok(Some(RecommendationCandidate {
        title: pick.title.clone(),
        poster_url: pick.poster_url.clone(),
        genre: genre.clone(),
        rating: pick.vote_average.map(rescale_vote).unwrap_or_default(),
        media_type: MediaType::Movie,
        reason: format!("Because you enjoy {} titles", genre),
    }))
}
