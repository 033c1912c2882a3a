//! Client-side search over loaded collections.
//!
//! Matching is a single case-insensitive substring test per field, OR-ed
//! across the fields an entity designates. There is no tokenizing and no
//! ranking; results keep the order of the source collection.

pub mod highlight;

pub use highlight::{highlight, Segment};

/// Entities that expose a fixed list of text fields to the search box.
pub trait Searchable {
    /// Fields to test, in display order. `None` marks an absent optional
    /// field, which never matches.
    fn search_fields(&self) -> Vec<Option<&str>>;
}

/// A lowercased query, computed once per keystroke rather than per item.
#[derive(Debug, Clone)]
pub struct Query {
    needle: String,
}

impl Query {
    pub fn new(raw: &str) -> Self {
        Self {
            needle: raw.to_lowercase(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.needle.is_empty()
    }

    pub fn matches<T: Searchable + ?Sized>(&self, item: &T) -> bool {
        if self.needle.is_empty() {
            return true;
        }
        item.search_fields()
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&self.needle))
    }
}

/// Items with at least one field containing `query`, in source order.
///
/// An empty query returns every item.
pub fn filter<'a, T: Searchable>(items: &'a [T], query: &str) -> Vec<&'a T> {
    let query = Query::new(query);
    items.iter().filter(|item| query.matches(*item)).collect()
}
