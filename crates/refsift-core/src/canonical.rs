//! Canonical keys for deduplication and ordering.

use crate::Reference;

/// Which components participate in the duplicate key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    /// Title + authors + year. Used when deduplicating file-sourced batches.
    TitleAuthorsYear,
    /// Additionally keys on the lower-cased URL, so two pages with identical
    /// metadata stay distinct. Used for URL add operations.
    WithUrl,
}

/// Equality of two keys means the records are the same reference;
/// the first-seen record in insertion order wins.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DedupKey {
    title: String,
    authors: Vec<String>,
    year: String,
    url: Option<String>,
}

pub fn dedup_key(reference: &Reference, scope: KeyScope) -> DedupKey {
    DedupKey {
        title: reference.title.to_lowercase(),
        authors: reference.authors.clone(),
        year: reference.year.clone(),
        url: match scope {
            KeyScope::WithUrl => Some(reference.url.to_lowercase()),
            KeyScope::TitleAuthorsYear => None,
        },
    }
}

/// Sort key: the first author's family-name token (text before the comma, or
/// the first whitespace-delimited token when there is no comma), trimmed and
/// lower-cased. Falls back to the lower-cased title for authorless records.
pub fn sort_key(reference: &Reference) -> String {
    match reference.authors.first() {
        Some(first) => {
            let family = match first.split_once(',') {
                Some((family, _)) => family,
                None => first.split_whitespace().next().unwrap_or(first),
            };
            family.trim().to_lowercase()
        }
        None => reference.title.to_lowercase(),
    }
}
