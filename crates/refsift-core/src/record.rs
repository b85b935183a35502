//! Adapter from loosely-typed field mappings to [`Reference`].
//!
//! The reference-exchange parser (an external collaborator) produces a
//! sequence of key/value records. Nothing in those records can be assumed
//! present or well-typed, so every field is read defensively with an empty
//! default.

use serde_json::Value;

use crate::{Reference, ReferenceKind};

/// Read a string-ish field: strings are trimmed, numbers are stringified,
/// everything else is empty.
fn str_field(record: &Value, key: &str) -> String {
    match &record[key] {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

/// Read a list-of-strings field; a bare string becomes a one-element list.
fn list_field(record: &Value, key: &str) -> Vec<String> {
    match &record[key] {
        Value::Array(items) => items
            .iter()
            .filter_map(|v| v.as_str())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect(),
        Value::String(s) if !s.trim().is_empty() => vec![s.trim().to_string()],
        _ => Vec::new(),
    }
}

/// Build a reference from one parsed exchange-format record.
/// Field names follow the exchange parser's vocabulary (`type_of_reference`,
/// `journal_name`/`secondary_title`, `number` for the issue).
pub fn reference_from_fields(record: &Value) -> Reference {
    let mut container_title = str_field(record, "journal_name");
    if container_title.is_empty() {
        container_title = str_field(record, "secondary_title");
    }

    Reference {
        kind: ReferenceKind::from_ris_tag(&str_field(record, "type_of_reference")),
        authors: list_field(record, "authors"),
        title: str_field(record, "title"),
        container_title,
        year: str_field(record, "year"),
        volume: str_field(record, "volume"),
        issue: str_field(record, "number"),
        start_page: str_field(record, "start_page"),
        end_page: str_field(record, "end_page"),
        doi: str_field(record, "doi"),
        url: str_field(record, "url"),
        publisher: str_field(record, "publisher"),
        abstract_text: str_field(record, "abstract"),
        arxiv_id: str_field(record, "arxiv_id"),
        primary_category: str_field(record, "primary_category"),
    }
}

/// Adapt a whole batch of records.
pub fn references_from_records(records: &[Value]) -> Vec<Reference> {
    records.iter().map(reference_from_fields).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn full_record() {
        let record = json!({
            "type_of_reference": "JOUR",
            "authors": ["Doe, Jane", "Roe, Richard"],
            "title": "Study X",
            "journal_name": "J. Examples",
            "year": "2024",
            "volume": "5",
            "number": "2",
            "start_page": "10",
            "end_page": "20",
            "doi": "10.1/xyz",
            "url": "https://example.com",
            "abstract": "About things."
        });
        let r = reference_from_fields(&record);
        assert_eq!(r.kind, ReferenceKind::JournalArticle);
        assert_eq!(r.authors, vec!["Doe, Jane", "Roe, Richard"]);
        assert_eq!(r.container_title, "J. Examples");
        assert_eq!(r.issue, "2");
        assert_eq!(r.abstract_text, "About things.");
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let r = reference_from_fields(&json!({}));
        assert_eq!(r.kind, ReferenceKind::Other);
        assert!(r.authors.is_empty());
        assert!(r.title.is_empty());
        assert!(r.year.is_empty());
    }

    #[test]
    fn numeric_year_is_stringified() {
        let r = reference_from_fields(&json!({"year": 2024}));
        assert_eq!(r.year, "2024");
    }

    #[test]
    fn single_author_string_becomes_list() {
        let r = reference_from_fields(&json!({"authors": "Doe, Jane"}));
        assert_eq!(r.authors, vec!["Doe, Jane"]);
    }

    #[test]
    fn secondary_title_fallback() {
        let r = reference_from_fields(&json!({"secondary_title": "Fallback Journal"}));
        assert_eq!(r.container_title, "Fallback Journal");

        let r = reference_from_fields(&json!({
            "journal_name": "Primary",
            "secondary_title": "Fallback"
        }));
        assert_eq!(r.container_title, "Primary");
    }

    #[test]
    fn non_object_record_is_tolerated() {
        let r = reference_from_fields(&json!("not an object"));
        assert_eq!(r.kind, ReferenceKind::Other);
        assert!(r.title.is_empty());
    }
}
