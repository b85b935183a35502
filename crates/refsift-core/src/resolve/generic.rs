use super::{ExtractError, SourceExtractor, year_from_iso8601};
use crate::source::host_of;
use crate::{Reference, ReferenceKind};
use chrono::Datelike;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub struct Generic;

impl SourceExtractor for Generic {
    fn name(&self) -> &str {
        "Generic"
    }

    fn extract<'a>(
        &'a self,
        url: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Reference, ExtractError>> + Send + 'a>> {
        Box::pin(async move {
            let resp = client.get(url).timeout(timeout).send().await?;
            if !resp.status().is_success() {
                return Err(ExtractError::Status(resp.status().as_u16()));
            }
            let body = resp.text().await?;
            let url_owned = url.to_string();

            // Parse in spawn_blocking to avoid !Send scraper types
            tokio::task::spawn_blocking(move || parse_page_metadata(&body, &url_owned))
                .await
                .map_err(|e| ExtractError::Parse(e.to_string()))
        })
    }
}

/// Extract citation metadata from an HTML document. Infallible: anything
/// undiscoverable is left empty, and the title defaults to the URL host.
fn parse_page_metadata(html: &str, url: &str) -> Reference {
    let document = scraper::Html::parse_document(html);

    let title = page_title(&document).unwrap_or_else(|| host_of(url).to_string());
    let mut authors = meta_authors(&document);
    if authors.is_empty() {
        authors = json_ld_authors(&document);
    }
    let year = page_year(&document).unwrap_or_default();
    let description = meta_content(&document, "meta[property=\"og:description\"]")
        .or_else(|| meta_content(&document, "meta[name=\"description\"]"))
        .unwrap_or_default();

    Reference {
        kind: ReferenceKind::Electronic,
        authors,
        title,
        year,
        url: url.to_string(),
        abstract_text: description,
        ..Default::default()
    }
}

/// Document title, else `og:title`, else a `name="title"` meta tag.
fn page_title(document: &scraper::Html) -> Option<String> {
    let title_sel = scraper::Selector::parse("title").unwrap();
    if let Some(el) = document.select(&title_sel).next() {
        let text = el.text().collect::<String>().trim().to_string();
        if !text.is_empty() {
            return Some(text);
        }
    }
    meta_content(document, "meta[property=\"og:title\"]")
        .or_else(|| meta_content(document, "meta[name=\"title\"]"))
}

fn meta_content(document: &scraper::Html, selector: &str) -> Option<String> {
    let sel = scraper::Selector::parse(selector).ok()?;
    document
        .select(&sel)
        .filter_map(|el| el.value().attr("content"))
        .map(|c| c.trim().to_string())
        .find(|c| !c.is_empty())
}

/// Authors from every meta tag whose `name` contains "author"
/// (case-insensitively); each comma-separated value becomes one author.
fn meta_authors(document: &scraper::Html) -> Vec<String> {
    let sel = scraper::Selector::parse("meta[name]").unwrap();
    let mut authors = Vec::new();
    for el in document.select(&sel) {
        let name = el.value().attr("name").unwrap_or("");
        if !name.to_lowercase().contains("author") {
            continue;
        }
        let content = el.value().attr("content").unwrap_or("");
        for part in content.split(',') {
            let part = part.trim();
            if !part.is_empty() {
                authors.push(part.to_string());
            }
        }
    }
    authors
}

/// Authors from embedded JSON-LD blocks. Supports an `author` property that
/// is a single object, an array of objects, or an array of strings.
fn json_ld_authors(document: &scraper::Html) -> Vec<String> {
    let sel = scraper::Selector::parse("script[type=\"application/ld+json\"]").unwrap();
    let mut authors = Vec::new();
    for script in document.select(&sel) {
        let text = script.text().collect::<String>();
        let Ok(data) = serde_json::from_str::<serde_json::Value>(&text) else {
            continue;
        };
        match &data["author"] {
            serde_json::Value::Array(items) => {
                for item in items {
                    match item {
                        serde_json::Value::Object(_) => {
                            if let Some(name) = item["name"].as_str() {
                                if !name.trim().is_empty() {
                                    authors.push(name.trim().to_string());
                                }
                            }
                        }
                        serde_json::Value::String(s) if !s.trim().is_empty() => {
                            authors.push(s.trim().to_string());
                        }
                        _ => {}
                    }
                }
            }
            serde_json::Value::Object(_) => {
                if let Some(name) = data["author"]["name"].as_str() {
                    if !name.trim().is_empty() {
                        authors.push(name.trim().to_string());
                    }
                }
            }
            _ => {}
        }
    }
    authors
}

/// Publication year: `article:published_time` parsed as ISO-8601, else the
/// first date-ish meta tag matched against a fixed pattern list.
fn page_year(document: &scraper::Html) -> Option<String> {
    if let Some(published) = meta_content(document, "meta[property=\"article:published_time\"]") {
        if let Some(year) = year_from_iso8601(&published) {
            return Some(year);
        }
    }

    let sel = scraper::Selector::parse("meta[name]").unwrap();
    let date_value = document
        .select(&sel)
        .filter(|el| {
            el.value()
                .attr("name")
                .is_some_and(|n| n.to_lowercase().contains("date"))
        })
        .filter_map(|el| el.value().attr("content"))
        .map(str::trim)
        .find(|c| !c.is_empty())?;

    year_from_date_patterns(date_value)
}

/// Fixed date-pattern fallback list; the first pattern that matches wins.
fn year_from_date_patterns(value: &str) -> Option<String> {
    const PATTERNS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d %B %Y", "%B %d, %Y"];

    let value = value.trim();
    let prefix = value.get(..10).unwrap_or(value);
    for pattern in PATTERNS {
        // Numeric patterns also match date-time strings via their prefix
        let candidate = if pattern.starts_with("%Y") { prefix } else { value };
        if let Ok(date) = chrono::NaiveDate::parse_from_str(candidate, pattern) {
            return Some(date.year().to_string());
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_page() {
        let html = r#"<html><head>
            <title> The Example Article </title>
            <meta name="author" content="Jane Doe, Richard Roe">
            <meta property="article:published_time" content="2021-06-01T12:00:00Z">
            <meta property="og:description" content="An article about examples.">
        </head><body></body></html>"#;
        let r = parse_page_metadata(html, "https://example.com/post");
        assert_eq!(r.kind, ReferenceKind::Electronic);
        assert_eq!(r.title, "The Example Article");
        assert_eq!(r.authors, vec!["Jane Doe", "Richard Roe"]);
        assert_eq!(r.year, "2021");
        assert_eq!(r.abstract_text, "An article about examples.");
        assert_eq!(r.url, "https://example.com/post");
    }

    #[test]
    fn title_falls_back_to_og_then_meta_then_host() {
        let og = r#"<html><head><meta property="og:title" content="OG Title"></head></html>"#;
        assert_eq!(parse_page_metadata(og, "https://example.com").title, "OG Title");

        let named = r#"<html><head><meta name="title" content="Named Title"></head></html>"#;
        assert_eq!(
            parse_page_metadata(named, "https://example.com").title,
            "Named Title"
        );

        let bare = "<html><head></head><body></body></html>";
        assert_eq!(
            parse_page_metadata(bare, "https://example.com/deep/path").title,
            "example.com"
        );
    }

    #[test]
    fn json_ld_author_shapes() {
        let array = r#"<html><head><script type="application/ld+json">
            {"@type": "Article", "author": [{"name": "Jane Doe"}, "Richard Roe"]}
        </script></head></html>"#;
        assert_eq!(
            parse_page_metadata(array, "https://e.com").authors,
            vec!["Jane Doe", "Richard Roe"]
        );

        let single = r#"<html><head><script type="application/ld+json">
            {"author": {"name": "Solo Author"}}
        </script></head></html>"#;
        assert_eq!(
            parse_page_metadata(single, "https://e.com").authors,
            vec!["Solo Author"]
        );
    }

    #[test]
    fn json_ld_authors_accumulate_across_blocks() {
        let html = r#"<html><head>
            <script type="application/ld+json">{"author": {"name": "First Author"}}</script>
            <script type="application/ld+json">{"author": [{"name": "Second Author"}]}</script>
        </head></html>"#;
        assert_eq!(
            parse_page_metadata(html, "https://e.com").authors,
            vec!["First Author", "Second Author"]
        );
    }

    #[test]
    fn meta_authors_take_precedence_over_json_ld() {
        let html = r#"<html><head>
            <meta name="article:author" content="Meta Author">
            <script type="application/ld+json">{"author": {"name": "LD Author"}}</script>
        </head></html>"#;
        assert_eq!(
            parse_page_metadata(html, "https://e.com").authors,
            vec!["Meta Author"]
        );
    }

    #[test]
    fn date_meta_fallback_patterns() {
        for (value, year) in [
            ("2020-03-04", "2020"),
            ("2019/07/08", "2019"),
            ("5 May 2018", "2018"),
            ("March 4, 2017", "2017"),
        ] {
            let html = format!(
                r#"<html><head><meta name="publish-date" content="{value}"></head></html>"#
            );
            assert_eq!(parse_page_metadata(&html, "https://e.com").year, year);
        }
    }

    #[test]
    fn unparseable_date_leaves_year_empty() {
        let html = r#"<html><head><meta name="date" content="sometime soon"></head></html>"#;
        assert!(parse_page_metadata(html, "https://e.com").year.is_empty());
    }

    #[test]
    fn bad_json_ld_is_ignored() {
        let html = r#"<html><head><script type="application/ld+json">{not json</script></head></html>"#;
        assert!(parse_page_metadata(html, "https://e.com").authors.is_empty());
    }
}
