/// TMDB metadata provider
///
/// Uses the v3 API with a bearer read-access token supplied by configuration.
///
/// API Flow:
/// 1. Search: /search/multi → movie and tv hits (people are dropped)
/// 2. Details: /movie/{id}?append_to_response=credits or /tv/{id}
/// 3. Availability: /{kind}/{id}/watch/providers → subscription platforms per region
/// 4. Discovery: /discover/movie?with_genres={id} sorted by popularity, page 1
use crate::{
    error::{AppError, AppResult},
    models::{
        Availability, DiscoveredTitle, LookupCandidate, LookupKind, TitleDetails, TmdbDetails,
        TmdbDiscoverHit, TmdbPage, TmdbSearchHit, TmdbWatchProviders,
    },
    services::providers::MetadataProvider,
};
use reqwest::Client as HttpClient;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::instrument;

const SEARCH_LIMIT: usize = 5;
const MAX_GENRES: usize = 2;

#[derive(Clone)]
pub struct TmdbProvider {
    http_client: HttpClient,
    access_token: String,
    api_url: String,
    image_url: String,
}

impl TmdbProvider {
    pub fn new(
        access_token: String,
        api_url: String,
        image_url: String,
        timeout: Duration,
    ) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            access_token,
            api_url: api_url.trim_end_matches('/').to_string(),
            image_url: image_url.trim_end_matches('/').to_string(),
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str, params: &[(&str, &str)]) -> AppResult<T> {
        let url = format!("{}{}", self.api_url, path);
        tracing::debug!(url = %url, "TMDB request");

        let response = self
            .http_client
            .get(&url)
            .bearer_auth(&self.access_token)
            .query(params)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::NetworkFailure(format!(
                "TMDB returned status {}: {}",
                status, body
            )));
        }

        Ok(response.json().await?)
    }

    fn poster_url(&self, poster_path: Option<String>) -> Option<String> {
        poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{}{}", self.image_url, p))
    }

    fn convert_search_hit(&self, hit: TmdbSearchHit) -> Option<LookupCandidate> {
        let kind = match hit.media_type.as_deref() {
            Some("movie") => LookupKind::Movie,
            Some("tv") => LookupKind::Tv,
            _ => return None,
        };

        let title = hit.title.or(hit.name)?;
        let year = hit
            .release_date
            .or(hit.first_air_date)
            .and_then(|d| d.get(..4).and_then(|y| y.parse().ok()));

        Some(LookupCandidate {
            id: hit.id,
            kind,
            title,
            year,
            poster_url: self.poster_url(hit.poster_path),
        })
    }

    fn convert_details(&self, kind: LookupKind, details: TmdbDetails) -> TitleDetails {
        let director = match kind {
            LookupKind::Movie => details.credits.and_then(|credits| {
                credits
                    .crew
                    .into_iter()
                    .find(|member| member.job.as_deref() == Some("Director"))
                    .map(|member| member.name)
            }),
            LookupKind::Tv => details.created_by.into_iter().next().map(|p| p.name),
        };

        TitleDetails {
            title: details.title.or(details.name).unwrap_or_default(),
            poster_url: self.poster_url(details.poster_path),
            director,
            genres: details
                .genres
                .into_iter()
                .take(MAX_GENRES)
                .map(|g| g.name)
                .collect(),
            vote_average: details.vote_average,
            total_episodes: match kind {
                LookupKind::Movie => None,
                LookupKind::Tv => details.number_of_episodes,
            },
        }
    }

    fn convert_providers(providers: TmdbWatchProviders) -> Availability {
        Availability {
            regions: providers
                .results
                .into_iter()
                .map(|(region, offers)| {
                    let names = offers.flatrate.into_iter().map(|p| p.provider_name).collect();
                    (region, names)
                })
                .collect(),
        }
    }

    fn convert_discover_hit(&self, hit: TmdbDiscoverHit) -> Option<DiscoveredTitle> {
        Some(DiscoveredTitle {
            title: hit.title.or(hit.name)?,
            poster_url: self.poster_url(hit.poster_path),
            vote_average: hit.vote_average,
        })
    }
}

#[async_trait::async_trait]
impl MetadataProvider for TmdbProvider {
    #[instrument(skip(self))]
    async fn search(&self, query: &str) -> AppResult<Vec<LookupCandidate>> {
        let page: TmdbPage<TmdbSearchHit> = self
            .get_json("/search/multi", &[("query", query), ("include_adult", "false")])
            .await?;

        let candidates: Vec<LookupCandidate> = page
            .results
            .into_iter()
            .filter_map(|hit| self.convert_search_hit(hit))
            .take(SEARCH_LIMIT)
            .collect();

        tracing::info!(
            query = %query,
            results = candidates.len(),
            provider = self.name(),
            "Title search completed"
        );

        Ok(candidates)
    }

    #[instrument(skip(self))]
    async fn details(&self, kind: LookupKind, id: u64) -> AppResult<TitleDetails> {
        let path = format!("/{}/{}", kind, id);
        let details: TmdbDetails = match kind {
            LookupKind::Movie => {
                self.get_json(&path, &[("append_to_response", "credits")])
                    .await?
            }
            LookupKind::Tv => self.get_json(&path, &[]).await?,
        };

        Ok(self.convert_details(kind, details))
    }

    #[instrument(skip(self))]
    async fn availability(&self, kind: LookupKind, id: u64) -> AppResult<Availability> {
        let providers: TmdbWatchProviders = self
            .get_json(&format!("/{}/{}/watch/providers", kind, id), &[])
            .await?;

        let availability = Self::convert_providers(providers);

        tracing::debug!(
            kind = %kind,
            id = id,
            regions = availability.regions.len(),
            provider = self.name(),
            "Availability fetched"
        );

        Ok(availability)
    }

    #[instrument(skip(self))]
    async fn discover(&self, genre_id: u32) -> AppResult<Vec<DiscoveredTitle>> {
        let genre = genre_id.to_string();
        let page: TmdbPage<TmdbDiscoverHit> = self
            .get_json(
                "/discover/movie",
                &[
                    ("with_genres", genre.as_str()),
                    ("sort_by", "popularity.desc"),
                    ("page", "1"),
                ],
            )
            .await?;

        let titles: Vec<DiscoveredTitle> = page
            .results
            .into_iter()
            .filter_map(|hit| self.convert_discover_hit(hit))
            .collect();

        tracing::info!(
            genre_id = genre_id,
            results = titles.len(),
            provider = self.name(),
            "Discovery completed"
        );

        Ok(titles)
    }

    fn name(&self) -> &'static str {
        "tmdb"
    }
}
