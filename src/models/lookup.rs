use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fmt::Display, str::FromStr};

use super::MediaType;
use crate::error::AppError;

/// Kind of title in the metadata catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LookupKind {
    Movie,
    Tv,
}

impl LookupKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LookupKind::Movie => "movie",
            LookupKind::Tv => "tv",
        }
    }
}

impl Display for LookupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LookupKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(LookupKind::Movie),
            "tv" => Ok(LookupKind::Tv),
            other => Err(AppError::InvalidInput(format!("Unknown title kind: {}", other))),
        }
    }
}

impl From<LookupKind> for MediaType {
    fn from(kind: LookupKind) -> Self {
        match kind {
            LookupKind::Movie => MediaType::Movie,
            LookupKind::Tv => MediaType::Series,
        }
    }
}

/// A search hit offered for auto-fill
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LookupCandidate {
    pub id: u64,
    pub kind: LookupKind,
    pub title: String,
    pub year: Option<i32>,
    pub poster_url: Option<String>,
}

/// Detail record for one catalog title
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TitleDetails {
    pub title: String,
    pub poster_url: Option<String>,
    /// Movie director, or the first creator of a series
    pub director: Option<String>,
    pub genres: Vec<String>,
    /// Catalog score on a 0-10 scale
    pub vote_average: Option<f64>,
    pub total_episodes: Option<u32>,
}

/// Subscription platforms per region code
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Availability {
    pub regions: HashMap<String, Vec<String>>,
}

impl Availability {
    /// First platform in `primary`, else the first one in `fallback`
    pub fn platform_for(&self, primary: &str, fallback: &str) -> Option<String> {
        [primary, fallback]
            .into_iter()
            .filter_map(|region| self.regions.get(region))
            .find_map(|platforms| platforms.first().cloned())
    }
}

/// A popular title returned by genre discovery
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscoveredTitle {
    pub title: String,
    pub poster_url: Option<String>,
    pub vote_average: Option<f64>,
}

/// Transient suggestion shown to the user; never persisted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationCandidate {
    pub title: String,
    pub poster_url: Option<String>,
    pub genre: String,
    pub rating: f64,
    pub media_type: MediaType,
    pub reason: String,
}

/// Rescales a 0-10 catalog score to the 0-5 collection scale, one decimal
pub fn rescale_vote(vote_average: f64) -> f64 {
    ((vote_average / 2.0) * 10.0).round() / 10.0
}
