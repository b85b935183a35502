//! Fallback orchestration: classifier → matched extractor → generic → stub.
//!
//! The chain is total. Every URL yields exactly one reference, and no error
//! crosses this module's boundary; upstream outages, malformed identifiers,
//! and network partitions all degrade to a lower-quality record.

use crate::resolve::{self, SourceExtractor, fallback_stub};
use crate::source::{SourceKind, classify, normalize_url};
use crate::{Config, Reference};

/// How a resolution concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolutionPath {
    /// The classified source's extractor succeeded.
    Primary,
    /// The classified extractor failed; generic extraction recovered.
    Degraded,
    /// Every extractor failed; the terminal stub was produced.
    Stub,
}

/// The outcome of resolving one URL.
#[derive(Debug, Clone)]
pub struct Resolution {
    pub reference: Reference,
    /// The source the URL was classified as, regardless of which extractor
    /// ultimately produced the record.
    pub source: SourceKind,
    pub path: ResolutionPath,
}

/// Resolve a URL into a normalized reference. Never fails.
pub async fn resolve_url(raw_url: &str, config: &Config, client: &reqwest::Client) -> Resolution {
    let url = normalize_url(raw_url);
    let source = classify(&url);
    tracing::debug!(%url, %source, "classified URL");

    let primary = extractor_for(source, config);
    resolve_with_extractors(
        source,
        &url,
        primary.as_ref(),
        &resolve::generic::Generic,
        config,
        client,
    )
    .await
}

fn extractor_for(source: SourceKind, config: &Config) -> Box<dyn SourceExtractor> {
    match source {
        SourceKind::Arxiv => Box::new(resolve::arxiv::Arxiv),
        SourceKind::Doi => Box::new(resolve::crossref::CrossRef {
            mailto: config.crossref_mailto.clone(),
        }),
        SourceKind::PubMed => Box::new(resolve::pubmed::PubMed),
        SourceKind::Generic => Box::new(resolve::generic::Generic),
    }
}

/// Run the fallback chain with explicit extractors. Split out from
/// [`resolve_url`] so tests can drive the chain with mock extractors.
async fn resolve_with_extractors(
    source: SourceKind,
    url: &str,
    primary: &dyn SourceExtractor,
    generic: &dyn SourceExtractor,
    config: &Config,
    client: &reqwest::Client,
) -> Resolution {
    let timeout = config.fetch_timeout();

    match primary.extract(url, client, timeout).await {
        Ok(mut reference) => {
            reference.url = url.to_string();
            return Resolution {
                reference,
                source,
                path: ResolutionPath::Primary,
            };
        }
        Err(err) => {
            tracing::warn!(%url, extractor = primary.name(), error = %err, "extraction failed");
        }
    }

    // The generic pass would repeat the identical fetch when the primary
    // extractor already was the generic one.
    if source != SourceKind::Generic {
        match generic.extract(url, client, timeout).await {
            Ok(mut reference) => {
                reference.url = url.to_string();
                return Resolution {
                    reference,
                    source,
                    path: ResolutionPath::Degraded,
                };
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "generic extraction failed");
            }
        }
    }

    Resolution {
        reference: fallback_stub(source, url),
        source,
        path: ResolutionPath::Stub,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::ExtractError;
    use crate::{Reference, ReferenceKind};
    use std::future::Future;
    use std::pin::Pin;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Extractor returning a fixed reference, or failing when none is set.
    struct MockExtractor {
        reference: Option<Reference>,
        calls: AtomicUsize,
    }

    impl MockExtractor {
        fn succeeding(title: &str) -> Self {
            Self {
                reference: Some(Reference {
                    kind: ReferenceKind::JournalArticle,
                    title: title.to_string(),
                    ..Default::default()
                }),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                reference: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl SourceExtractor for MockExtractor {
        fn name(&self) -> &str {
            "mock"
        }

        fn extract<'a>(
            &'a self,
            _url: &'a str,
            _client: &'a reqwest::Client,
            _timeout: Duration,
        ) -> Pin<Box<dyn Future<Output = Result<Reference, ExtractError>> + Send + 'a>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Box::pin(async move {
                self.reference
                    .clone()
                    .ok_or_else(|| ExtractError::Http("mock failure".into()))
            })
        }
    }

    fn config() -> Config {
        Config::default()
    }

    #[tokio::test]
    async fn primary_success_resolves_directly() {
        let primary = MockExtractor::succeeding("Primary Result");
        let generic = MockExtractor::succeeding("Generic Result");
        let client = reqwest::Client::new();

        let resolution = resolve_with_extractors(
            SourceKind::Arxiv,
            "https://arxiv.org/abs/2301.00001",
            &primary,
            &generic,
            &config(),
            &client,
        )
        .await;

        assert_eq!(resolution.path, ResolutionPath::Primary);
        assert_eq!(resolution.source, SourceKind::Arxiv);
        assert_eq!(resolution.reference.title, "Primary Result");
        assert_eq!(resolution.reference.url, "https://arxiv.org/abs/2301.00001");
        assert_eq!(generic.call_count(), 0);
    }

    #[tokio::test]
    async fn primary_failure_degrades_to_generic() {
        let primary = MockExtractor::failing();
        let generic = MockExtractor::succeeding("Generic Result");
        let client = reqwest::Client::new();

        let resolution = resolve_with_extractors(
            SourceKind::Doi,
            "https://doi.org/10.1/xyz",
            &primary,
            &generic,
            &config(),
            &client,
        )
        .await;

        assert_eq!(resolution.path, ResolutionPath::Degraded);
        assert_eq!(resolution.source, SourceKind::Doi);
        assert_eq!(resolution.reference.title, "Generic Result");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(generic.call_count(), 1);
    }

    #[tokio::test]
    async fn double_failure_yields_stub_with_source_label() {
        let primary = MockExtractor::failing();
        let generic = MockExtractor::failing();
        let client = reqwest::Client::new();

        let resolution = resolve_with_extractors(
            SourceKind::Arxiv,
            "https://arxiv.org/abs/2301.00001",
            &primary,
            &generic,
            &config(),
            &client,
        )
        .await;

        assert_eq!(resolution.path, ResolutionPath::Stub);
        assert_eq!(resolution.reference.title, "arXiv paper from arxiv.org");
        assert_eq!(resolution.reference.url, "https://arxiv.org/abs/2301.00001");
        assert_eq!(resolution.reference.kind, ReferenceKind::Electronic);
        assert!(resolution.reference.authors.is_empty());
        assert!(resolution.reference.year.is_empty());
    }

    #[tokio::test]
    async fn generic_source_is_not_fetched_twice() {
        let primary = MockExtractor::failing();
        let generic = MockExtractor::failing();
        let client = reqwest::Client::new();

        let resolution = resolve_with_extractors(
            SourceKind::Generic,
            "https://example.com/page",
            &primary,
            &generic,
            &config(),
            &client,
        )
        .await;

        assert_eq!(resolution.path, ResolutionPath::Stub);
        assert_eq!(resolution.reference.title, "Web page from example.com");
        assert_eq!(primary.call_count(), 1);
        assert_eq!(generic.call_count(), 0);
    }
}
