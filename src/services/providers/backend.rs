/// REST client for the collection backend
///
/// Speaks the backend's `/media/` resource: list, create, full update and delete.
/// There is no pagination, authentication or partial update on this API.
use crate::{
    error::{AppError, AppResult},
    models::{MediaDraft, MediaId, MediaItem},
    services::providers::MediaBackend,
};
use reqwest::{Client as HttpClient, Response};
use std::time::Duration;
use tracing::instrument;

#[derive(Clone)]
pub struct HttpMediaBackend {
    http_client: HttpClient,
    base_url: String,
}

impl HttpMediaBackend {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> AppResult<Self> {
        let http_client = HttpClient::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/media/", self.base_url)
    }

    fn item_url(&self, id: MediaId) -> String {
        format!("{}/media/{}", self.base_url, id)
    }

    /// Turns a non-2xx answer into a network failure carrying the body text
    async fn check(response: Response) -> AppResult<Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(AppError::NetworkFailure(format!(
            "Backend returned status {}: {}",
            status, body
        )))
    }
}

#[async_trait::async_trait]
impl MediaBackend for HttpMediaBackend {
    #[instrument(skip(self))]
    async fn list(&self) -> AppResult<Vec<MediaItem>> {
        let response = self.http_client.get(self.collection_url()).send().await?;
        let items: Vec<MediaItem> = Self::check(response).await?.json().await?;

        tracing::info!(items = items.len(), backend = self.name(), "Collection fetched");
        Ok(items)
    }

    #[instrument(skip(self, draft), fields(title = %draft.title))]
    async fn create(&self, draft: &MediaDraft) -> AppResult<MediaItem> {
        let response = self
            .http_client
            .post(self.collection_url())
            .json(draft)
            .send()
            .await?;
        let item: MediaItem = Self::check(response).await?.json().await?;

        tracing::info!(id = %item.id, title = %item.title(), backend = self.name(), "Item created");
        Ok(item)
    }

    #[instrument(skip(self, draft))]
    async fn update(&self, id: MediaId, draft: &MediaDraft) -> AppResult<MediaItem> {
        let response = self
            .http_client
            .put(self.item_url(id))
            .json(draft)
            .send()
            .await?;
        let item: MediaItem = Self::check(response).await?.json().await?;

        tracing::info!(id = %id, backend = self.name(), "Item updated");
        Ok(item)
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: MediaId) -> AppResult<()> {
        let response = self.http_client.delete(self.item_url(id)).send().await?;
        Self::check(response).await?;

        tracing::info!(id = %id, backend = self.name(), "Item deleted");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "rest_backend"
    }
}
