use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;

/// Separator used when genres travel as a single text field
pub const GENRE_SEPARATOR: &str = ", ";

/// Ordered, duplicate-free set of genre tags
///
/// The backend stores genres as one comma-joined text column. Inside the crate
/// they are a set of tags; conversion to and from the joined text happens only
/// in the serde impls below.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Genres(Vec<String>);

impl Genres {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    /// Parses the comma-joined form. Tokens are trimmed; empty tokens dropped.
    pub fn parse(text: &str) -> Self {
        text.split(',').collect()
    }

    /// Adds a tag unless an equal one (ignoring case) is already present
    pub fn insert(&mut self, tag: &str) -> bool {
        let tag = tag.trim();
        if tag.is_empty() || self.contains(tag) {
            return false;
        }
        self.0.push(tag.to_string());
        true
    }

    /// Case-insensitive membership test
    pub fn contains(&self, tag: &str) -> bool {
        let tag = tag.trim();
        self.0.iter().any(|g| g.eq_ignore_ascii_case(tag))
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The comma-joined wire form
    pub fn joined(&self) -> String {
        self.0.join(GENRE_SEPARATOR)
    }
}

impl Display for Genres {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.joined())
    }
}

impl<S: AsRef<str>> FromIterator<S> for Genres {
    fn from_iter<T: IntoIterator<Item = S>>(iter: T) -> Self {
        let mut genres = Genres::new();
        for tag in iter {
            genres.insert(tag.as_ref());
        }
        genres
    }
}

impl Serialize for Genres {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.joined())
    }
}

impl<'de> Deserialize<'de> for Genres {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text: Option<String> = Option::deserialize(deserializer)?;
        Ok(text.map(|t| Genres::parse(&t)).unwrap_or_default())
    }
}
