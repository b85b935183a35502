//! URL source classification.
//!
//! Decides which extraction strategy applies to a URL. Classification is
//! total: every string maps to exactly one [`SourceKind`].

/// The closed set of metadata sources a URL can resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Arxiv,
    Doi,
    PubMed,
    Generic,
}

impl SourceKind {
    /// Human-readable label used in fallback stub titles.
    pub fn stub_label(&self) -> &'static str {
        match self {
            Self::Arxiv => "arXiv paper",
            Self::Doi => "DOI document",
            Self::PubMed => "PubMed article",
            Self::Generic => "Web page",
        }
    }
}

impl std::fmt::Display for SourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Arxiv => "arXiv",
            Self::Doi => "DOI",
            Self::PubMed => "PubMed",
            Self::Generic => "Generic",
        };
        f.write_str(s)
    }
}

/// Coerce a bare host/path string into a fetchable URL by prefixing
/// `https://` when no scheme is present. Surrounding whitespace is trimmed.
pub fn normalize_url(raw: &str) -> String {
    let url = raw.trim();
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{url}")
    }
}

/// Classify a (scheme-normalized) URL. First match wins:
/// arXiv, then DOI, then PubMed, then Generic.
pub fn classify(url: &str) -> SourceKind {
    if url.contains("arxiv.org") {
        SourceKind::Arxiv
    } else if url.contains("doi.org") || url.contains("/doi/") {
        SourceKind::Doi
    } else if url.contains("pubmed.ncbi.nlm.nih.gov") {
        SourceKind::PubMed
    } else {
        SourceKind::Generic
    }
}

/// The host component of a URL: what remains after the scheme, up to the
/// first path, query, or fragment marker. Falls back to the full input when
/// there is no scheme.
pub fn host_of(url: &str) -> &str {
    let after_scheme = match url.find("//") {
        Some(idx) => &url[idx + 2..],
        None => url,
    };
    after_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or(after_scheme)
}
