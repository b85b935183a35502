//! Per-source extraction strategies.
//!
//! Each extractor turns a classified URL into a [`Reference`] or fails with an
//! [`ExtractError`]; the orchestrator owns the fallback ordering between them.

pub mod arxiv;
pub mod crossref;
pub mod generic;
pub mod pubmed;

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use chrono::Datelike;
use thiserror::Error;

use crate::source::{SourceKind, host_of};
use crate::{Reference, ReferenceKind};

/// Why an extraction attempt failed. Every variant is recoverable: the
/// orchestrator degrades to generic extraction and finally to the stub.
#[derive(Error, Debug)]
pub enum ExtractError {
    #[error("no {0} identifier in URL")]
    MissingIdentifier(&'static str),
    #[error("HTTP request error: {0}")]
    Http(String),
    #[error("HTTP {0}")]
    Status(u16),
    #[error("parse error: {0}")]
    Parse(String),
    #[error("no matching entry in response")]
    EmptyResponse,
}

impl From<reqwest::Error> for ExtractError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err.to_string())
    }
}

/// An extraction strategy for one source kind.
pub trait SourceExtractor: Send + Sync {
    /// The canonical name of this source (e.g., "arXiv", "CrossRef").
    fn name(&self) -> &str;

    /// Extract a normalized reference for the given URL. The timeout bounds
    /// the single outbound call; exceeding it is an ordinary failure.
    fn extract<'a>(
        &'a self,
        url: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Reference, ExtractError>> + Send + 'a>>;
}

/// The terminal fallback: a minimal electronic record that always succeeds.
/// The title carries the originally classified source kind, e.g.
/// `"arXiv paper from arxiv.org"`.
pub fn fallback_stub(kind: SourceKind, url: &str) -> Reference {
    Reference {
        kind: ReferenceKind::Electronic,
        title: format!("{} from {}", kind.stub_label(), host_of(url)),
        url: url.to_string(),
        ..Default::default()
    }
}

/// Pull the year out of an ISO-8601 timestamp or date.
pub(crate) fn year_from_iso8601(value: &str) -> Option<String> {
    let value = value.trim();
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(value) {
        return Some(dt.year().to_string());
    }
    let prefix = value.get(..10).unwrap_or(value);
    chrono::NaiveDate::parse_from_str(prefix, "%Y-%m-%d")
        .ok()
        .map(|d| d.year().to_string())
}
