use std::time::Duration;

pub mod canonical;
pub mod collection;
pub mod format;
pub mod identifiers;
pub mod orchestrator;
pub mod record;
pub mod resolve;
pub mod source;

// Re-export for convenience
pub use canonical::{DedupKey, KeyScope, sort_key};
pub use collection::{Collection, MergeStats};
pub use format::{CitationStyle, format_citation};
pub use orchestrator::{Resolution, ResolutionPath, resolve_url};
pub use record::{reference_from_fields, references_from_records};
pub use resolve::ExtractError;
pub use source::{SourceKind, classify, normalize_url};

/// The kind of work a reference describes. Drives type-specific
/// formatting branches; anything unclassifiable maps to [`ReferenceKind::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReferenceKind {
    JournalArticle,
    Book,
    BookChapter,
    ConferencePaper,
    Thesis,
    Report,
    /// Electronic / web source.
    Electronic,
    #[default]
    Other,
}

impl ReferenceKind {
    /// Map a RIS `TY` tag to a reference kind. Unknown tags become `Other`.
    pub fn from_ris_tag(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "JOUR" => Self::JournalArticle,
            "BOOK" => Self::Book,
            "CHAP" => Self::BookChapter,
            "CONF" => Self::ConferencePaper,
            "THES" => Self::Thesis,
            "RPRT" => Self::Report,
            "ELEC" => Self::Electronic,
            _ => Self::Other,
        }
    }
}

impl std::fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::JournalArticle => "journal article",
            Self::Book => "book",
            Self::BookChapter => "book chapter",
            Self::ConferencePaper => "conference paper",
            Self::Thesis => "thesis",
            Self::Report => "report",
            Self::Electronic => "electronic",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

/// A normalized bibliographic reference, independent of its input source.
///
/// Produced once by an extractor or the file-record adapter and read-only
/// from then on: dedup, sort, and formatting never mutate it. Every field
/// except `kind` may be empty; rendering simply omits missing pieces.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reference {
    pub kind: ReferenceKind,
    /// Ordered author names, conventionally `"Family, Given"`. Empty means
    /// unknown author.
    pub authors: Vec<String>,
    pub title: String,
    /// Journal, book, or conference name.
    pub container_title: String,
    /// Publication year as digits, or empty. Kept as a string because source
    /// data may be partial (e.g. "in press").
    pub year: String,
    pub volume: String,
    pub issue: String,
    pub start_page: String,
    pub end_page: String,
    /// When present, preferred over `url` as the online locator in output.
    pub doi: String,
    /// Always populated for URL-sourced records.
    pub url: String,
    pub publisher: String,
    /// Preserved for downstream consumers; no style formatter reads it.
    pub abstract_text: String,
    /// Source hint: arXiv identifier, when the record came from arXiv.
    pub arxiv_id: String,
    /// Source hint: arXiv primary subject category.
    pub primary_category: String,
}

/// Configuration for metadata resolution.
#[derive(Debug, Clone)]
pub struct Config {
    /// Upper bound for each outbound call, in seconds. A timeout degrades
    /// through the fallback chain like any other extraction failure.
    pub fetch_timeout_secs: u64,
    /// User-Agent sent on every request. Some publishers refuse the reqwest
    /// default.
    pub user_agent: String,
    /// Contact address appended to CrossRef requests (polite pool).
    pub crossref_mailto: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fetch_timeout_secs: 10,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36".into(),
            crossref_mailto: None,
        }
    }
}

impl Config {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }
}

/// Build an HTTP client from configuration. Redirects are followed with
/// reqwest's default policy.
pub fn build_client(config: &Config) -> reqwest::Client {
    reqwest::Client::builder()
        .user_agent(config.user_agent.clone())
        .build()
        .unwrap_or_default()
}
