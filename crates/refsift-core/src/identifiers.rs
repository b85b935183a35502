//! Identifier derivation from URLs.
//!
//! Each resolver needs a source-native identifier before it can query its
//! upstream API; these helpers pull that identifier out of the URL shapes the
//! sources actually use. Returning `None` means the caller should degrade to
//! generic extraction.

use once_cell::sync::Lazy;
use regex::Regex;

/// Cut a URL fragment at the first query or fragment marker.
fn strip_markers(s: &str) -> &str {
    s.split(['?', '#']).next().unwrap_or("")
}

/// Derive an arXiv identifier from a URL.
///
/// Handles the shapes:
/// - `arxiv.org/abs/2301.12345`
/// - `arxiv.org/pdf/2301.12345.pdf`
/// - `arxiv.org/e-print/2301.12345`
///
/// and otherwise scans path segments for a bare `NNNN.NNNNN[vN]` id.
pub fn arxiv_id_from_url(url: &str) -> Option<String> {
    static ID_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}\.\d{4,5}(v\d+)?$").unwrap());

    let derived = if let Some((_, rest)) = url.split_once("/abs/") {
        strip_markers(rest)
    } else if let Some((_, rest)) = url.split_once("/pdf/") {
        strip_markers(rest.split(".pdf").next().unwrap_or(""))
    } else if let Some((_, rest)) = url.split_once("/e-print/") {
        strip_markers(rest)
    } else {
        ""
    };
    if !derived.is_empty() {
        return Some(derived.to_string());
    }

    // No recognized prefix: look for an id-shaped path segment.
    let path = strip_markers(url);
    path.split('/')
        .find(|seg| ID_RE.is_match(seg))
        .map(String::from)
}

/// Derive a DOI from a `doi.org/<doi>` URL or a `/doi/<doi>` path segment.
pub fn doi_from_url(url: &str) -> Option<String> {
    let doi = if let Some((_, rest)) = url.split_once("doi.org/") {
        strip_markers(rest)
    } else if let Some((_, rest)) = url.split_once("/doi/") {
        strip_markers(rest)
    } else {
        ""
    };
    if doi.is_empty() {
        None
    } else {
        Some(doi.to_string())
    }
}

/// Derive a PubMed identifier from the final URL path segment.
/// The segment must be entirely numeric; a trailing slash leaves an empty
/// final segment and therefore fails.
pub fn pmid_from_url(url: &str) -> Option<String> {
    let last = url.rsplit('/').next().unwrap_or("");
    let pmid = strip_markers(last);
    if !pmid.is_empty() && pmid.bytes().all(|b| b.is_ascii_digit()) {
        Some(pmid.to_string())
    } else {
        None
    }
}
