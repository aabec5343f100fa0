pub mod aggregate;
pub mod collection;
pub mod filter;
pub mod generation;
pub mod providers;
pub mod recommendations;
pub mod title_search;

pub use collection::{CollectionSnapshot, CollectionStore, DeleteConfirmation};
pub use filter::{filter, FilterQuery, GenreMatch, Selection};
pub use title_search::TitleLookup;
