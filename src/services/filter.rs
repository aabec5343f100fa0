use serde::Deserialize;

use crate::models::{MediaItem, Status};

/// Sentinel the presentation layer sends for "no restriction"
pub const ALL: &str = "All";

/// A categorical filter: either pass everything or keep one value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Selection<T> {
    #[default]
    All,
    Only(T),
}

impl Selection<String> {
    /// Reads a raw query value; missing, blank and "All" mean no restriction
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            None | Some("") | Some(ALL) => Selection::All,
            Some(v) => Selection::Only(v.to_string()),
        }
    }
}

/// How the genre selection is compared with an item's genres
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GenreMatch {
    /// Selected genre occurs anywhere in the comma-joined genre text
    #[default]
    Substring,
    /// Selected genre equals one of the item's tags, ignoring case
    Tag,
}

/// Visible-subset criteria for the collection view
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterQuery {
    pub search_title: String,
    pub status: Selection<Status>,
    pub platform: Selection<String>,
    pub genre: Selection<String>,
    pub genre_match: GenreMatch,
}

impl FilterQuery {
    /// True when every item passes
    pub fn is_unrestricted(&self) -> bool {
        self.search_title.trim().is_empty()
            && self.status == Selection::All
            && self.platform == Selection::All
            && self.genre == Selection::All
    }

    pub fn matches(&self, item: &MediaItem) -> bool {
        self.matches_title(item)
            && self.matches_status(item)
            && self.matches_platform(item)
            && self.matches_genre(item)
    }

    fn matches_title(&self, item: &MediaItem) -> bool {
        let needle = self.search_title.trim().to_lowercase();
        needle.is_empty() || item.title().to_lowercase().contains(&needle)
    }

    /// Exact match on a known status; an unrecognised selection matches nothing
    fn matches_status(&self, item: &MediaItem) -> bool {
        match &self.status {
            Selection::All => true,
            Selection::Only(status) => status.is_known() && *status == item.status(),
        }
    }

    fn matches_platform(&self, item: &MediaItem) -> bool {
        match &self.platform {
            Selection::All => true,
            Selection::Only(platform) => item.details.platform.as_deref() == Some(platform.as_str()),
        }
    }

    fn matches_genre(&self, item: &MediaItem) -> bool {
        match (&self.genre, self.genre_match) {
            (Selection::All, _) => true,
            (Selection::Only(genre), GenreMatch::Tag) => item.genres().contains(genre),
            (Selection::Only(genre), GenreMatch::Substring) => {
                item.genres().joined().contains(genre.as_str())
            }
        }
    }
}

/// Items passing `query`, in their original order
pub fn filter(items: &[MediaItem], query: &FilterQuery) -> Vec<MediaItem> {
    items.iter().filter(|item| query.matches(item)).cloned().collect()
}
