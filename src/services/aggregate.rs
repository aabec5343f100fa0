use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::models::{MediaItem, Status};

pub const DEFAULT_TOP_GENRES: usize = 5;

/// One slice of the genre chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenreCount {
    pub name: String,
    pub count: usize,
}

/// Number of items per known status
///
/// Statuses nobody holds are absent rather than zero; unknown statuses are skipped.
pub fn status_counts(items: &[MediaItem]) -> BTreeMap<Status, usize> {
    let mut counts = BTreeMap::new();
    for status in items.iter().map(MediaItem::status).filter(Status::is_known) {
        *counts.entry(status).or_insert(0) += 1;
    }
    counts
}

/// Tallies genre tags in first-seen order, one count per item and tag
///
/// Tags differing only in case share a slice named after the first spelling seen.
pub fn tally_genres<'a, I>(items: I) -> Vec<GenreCount>
where
    I: IntoIterator<Item = &'a MediaItem>,
{
    let mut tally: Vec<GenreCount> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for item in items {
        for tag in item.genres().iter() {
            let key = tag.to_lowercase();
            match index.get(&key) {
                Some(&slot) => tally[slot].count += 1,
                None => {
                    index.insert(key, tally.len());
                    tally.push(GenreCount {
                        name: tag.to_string(),
                        count: 1,
                    });
                }
            }
        }
    }

    tally
}

/// The `n` most common genres, most common first
///
/// Ties keep the order in which the genres were first encountered.
pub fn top_genres(items: &[MediaItem], n: usize) -> Vec<GenreCount> {
    let mut tally = tally_genres(items);
    // stable: equal counts stay in first-seen order
    tally.sort_by(|a, b| b.count.cmp(&a.count));
    tally.truncate(n);
    tally
}
