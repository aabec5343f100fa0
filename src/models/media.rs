use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::Display;

use super::Genres;
use crate::error::{AppError, AppResult};

/// Identifier assigned by the backend; never generated client-side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MediaId(pub i64);

impl Display for MediaId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MediaType {
    #[default]
    Movie,
    Series,
}

/// Lifecycle stage of a tracked item
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Wishlist,
    Watching,
    Completed,
    /// Any status text the backend holds outside the three known values
    #[serde(other)]
    Unknown,
}

impl Status {
    pub const KNOWN: [Status; 3] = [Status::Wishlist, Status::Watching, Status::Completed];

    pub fn is_known(&self) -> bool {
        !matches!(self, Status::Unknown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Wishlist => "Wishlist",
            Status::Watching => "Watching",
            Status::Completed => "Completed",
            Status::Unknown => "Unknown",
        }
    }

    /// Exact, case-sensitive lookup of a known status name
    pub fn from_name(name: &str) -> Status {
        Status::KNOWN
            .into_iter()
            .find(|status| status.as_str() == name)
            .unwrap_or(Status::Unknown)
    }
}

/// Item fields as submitted to the backend on create and update
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MediaDraft {
    pub title: String,
    #[serde(default)]
    pub media_type: MediaType,
    #[serde(default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub director: Option<String>,
    #[serde(default)]
    pub genre: Genres,
    #[serde(default)]
    pub platform: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: Status,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default)]
    pub review: Option<String>,
    #[serde(default)]
    pub total_episodes: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub current_episode: u32,
}

impl MediaDraft {
    pub fn new(title: impl Into<String>, media_type: MediaType) -> Self {
        Self {
            title: title.into(),
            media_type,
            ..Default::default()
        }
    }

    /// Rejects drafts the backend would store without a usable title
    ///
    /// An unrecognised status is rejected too: writing it back would replace
    /// the stored value with the `Unknown` placeholder.
    pub fn validate(&self) -> AppResult<()> {
        if self.title.trim().is_empty() {
            return Err(AppError::InvalidInput("Title cannot be empty".to_string()));
        }
        if !self.status.is_known() {
            return Err(AppError::InvalidInput(
                "Status must be Wishlist, Watching or Completed".to_string(),
            ));
        }
        Ok(())
    }

    /// Watched share of a series in percent; `None` for movies
    ///
    /// A missing or zero episode total counts as 1, and the result is clamped
    /// to `0..=100`.
    pub fn progress_percent(&self) -> Option<f64> {
        if self.media_type != MediaType::Series {
            return None;
        }
        let total = self.total_episodes.filter(|t| *t > 0).unwrap_or(1);
        let ratio = f64::from(self.current_episode) / f64::from(total);
        Some((ratio * 100.0).clamp(0.0, 100.0))
    }
}

/// One tracked movie or series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: MediaId,
    #[serde(flatten)]
    pub details: MediaDraft,
}

impl MediaItem {
    pub fn new(id: MediaId, details: MediaDraft) -> Self {
        Self { id, details }
    }

    pub fn title(&self) -> &str {
        &self.details.title
    }

    pub fn status(&self) -> Status {
        self.details.status
    }

    pub fn genres(&self) -> &Genres {
        &self.details.genre
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
