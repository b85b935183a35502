//! The reference collection: merge, dedupe, sort, render.
//!
//! The collection holds no persistence of its own; a collaborator stores the
//! slice returned by [`Collection::references`] between calls and hands it
//! back via [`Collection::replace`]. Merges into the same collection must be
//! serialized by the owner.

use std::collections::HashSet;

use crate::canonical::{KeyScope, dedup_key, sort_key};
use crate::format::{CitationStyle, format_citation};
use crate::Reference;

/// Counts reported after a merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeStats {
    /// Records considered (existing plus incoming) before deduplication.
    pub total: usize,
    /// Records remaining after deduplication.
    pub unique: usize,
    pub duplicates_removed: usize,
}

/// An ordered set of references, unique under the canonical duplicate key and
/// sorted by the canonical sort key.
#[derive(Debug, Clone, Default)]
pub struct Collection {
    refs: Vec<Reference>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_references(refs: Vec<Reference>) -> Self {
        Self { refs }
    }

    pub fn len(&self) -> usize {
        self.refs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.refs.is_empty()
    }

    pub fn references(&self) -> &[Reference] {
        &self.refs
    }

    pub fn get(&self, index: usize) -> Option<&Reference> {
        self.refs.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Reference> {
        self.refs.iter()
    }

    /// Swap in a previously persisted set of references.
    pub fn replace(&mut self, refs: Vec<Reference>) {
        self.refs = refs;
    }

    pub fn clear(&mut self) {
        self.refs.clear();
    }

    /// Remove one reference by position. Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Reference> {
        if index < self.refs.len() {
            Some(self.refs.remove(index))
        } else {
            None
        }
    }

    /// Merge incoming records into the collection: existing records first,
    /// duplicates dropped silently (first-seen wins), then a stable sort by
    /// the canonical sort key.
    pub fn merge(&mut self, incoming: Vec<Reference>, scope: KeyScope) -> MergeStats {
        let mut combined = std::mem::take(&mut self.refs);
        combined.extend(incoming);
        let total = combined.len();

        let mut seen = HashSet::new();
        let mut unique: Vec<Reference> = Vec::with_capacity(total);
        for reference in combined {
            if seen.insert(dedup_key(&reference, scope)) {
                unique.push(reference);
            }
        }
        let unique_count = unique.len();

        // Vec::sort_by_key is stable: tied keys keep insertion order.
        unique.sort_by_key(sort_key);
        self.refs = unique;

        MergeStats {
            total,
            unique: unique_count,
            duplicates_removed: total - unique_count,
        }
    }

    /// Render every reference in order.
    pub fn render(&self, style: CitationStyle) -> Vec<String> {
        self.refs
            .iter()
            .map(|reference| format_citation(reference, style))
            .collect()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Reference;
    type IntoIter = std::slice::Iter<'a, Reference>;

    fn into_iter(self) -> Self::IntoIter {
        self.refs.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference(title: &str, authors: &[&str], year: &str) -> Reference {
        Reference {
            title: title.into(),
            authors: authors.iter().map(|s| s.to_string()).collect(),
            year: year.into(),
            ..Default::default()
        }
    }

    #[test]
    fn merge_dedupes_and_counts() {
        let mut collection = Collection::new();
        let stats = collection.merge(
            vec![
                reference("Study X", &["Doe, Jane"], "2024"),
                reference("Study Y", &["Roe, Richard"], "2023"),
            ],
            KeyScope::TitleAuthorsYear,
        );
        assert_eq!(stats, MergeStats { total: 2, unique: 2, duplicates_removed: 0 });

        // Same title/authors/year collides; size unchanged, one duplicate.
        let stats = collection.merge(
            vec![reference("study x", &["Doe, Jane"], "2024")],
            KeyScope::TitleAuthorsYear,
        );
        assert_eq!(collection.len(), 2);
        assert_eq!(stats.duplicates_removed, 1);
    }

    #[test]
    fn first_seen_record_wins() {
        let mut collection = Collection::new();
        let mut first = reference("Study X", &["Doe, Jane"], "2024");
        first.volume = "1".into();
        let mut second = reference("Study X", &["Doe, Jane"], "2024");
        second.volume = "9".into();

        collection.merge(vec![first, second], KeyScope::TitleAuthorsYear);
        assert_eq!(collection.len(), 1);
        assert_eq!(collection.get(0).unwrap().volume, "1");
    }

    #[test]
    fn url_scope_keeps_distinct_pages() {
        let mut collection = Collection::new();
        let mut a = reference("Web page from example.com", &[], "");
        a.url = "https://example.com/one".into();
        let mut b = reference("Web page from example.com", &[], "");
        b.url = "https://example.com/two".into();

        let stats = collection.merge(vec![a, b], KeyScope::WithUrl);
        assert_eq!(stats.unique, 2);
    }

    #[test]
    fn sorted_by_first_author_family_name() {
        let mut collection = Collection::new();
        collection.merge(
            vec![
                reference("B", &["Zimmer, Carl"], "2020"),
                reference("A", &["Adams, Douglas"], "1979"),
                reference("C", &[], "2021"), // sorts by title "c"
            ],
            KeyScope::TitleAuthorsYear,
        );
        let order: Vec<&str> = collection.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(order, vec!["A", "C", "B"]);
    }

    #[test]
    fn tied_sort_keys_preserve_insertion_order() {
        let mut collection = Collection::new();
        collection.merge(
            vec![
                reference("First", &["Smith, J."], "2020"),
                reference("Second", &["Smith, A."], "2021"),
            ],
            KeyScope::TitleAuthorsYear,
        );
        let order: Vec<&str> = collection.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(order, vec!["First", "Second"]);
    }

    #[test]
    fn remove_and_clear() {
        let mut collection = Collection::from_references(vec![
            reference("A", &[], ""),
            reference("B", &[], ""),
        ]);
        assert!(collection.remove(5).is_none());
        let removed = collection.remove(0).unwrap();
        assert_eq!(removed.title, "A");
        assert_eq!(collection.len(), 1);
        collection.clear();
        assert!(collection.is_empty());
    }

    #[test]
    fn render_preserves_order() {
        let mut collection = Collection::new();
        collection.merge(
            vec![
                reference("Beta", &["Bell, B."], "2001"),
                reference("Alpha", &["Ames, A."], "2000"),
            ],
            KeyScope::TitleAuthorsYear,
        );
        let rendered = collection.render(CitationStyle::Apa);
        assert_eq!(rendered.len(), 2);
        assert!(rendered[0].starts_with("Ames, A."));
        assert!(rendered[1].starts_with("Bell, B."));
    }
}
