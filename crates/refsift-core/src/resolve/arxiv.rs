use super::{ExtractError, SourceExtractor, year_from_iso8601};
use crate::identifiers::arxiv_id_from_url;
use crate::{Reference, ReferenceKind};
use once_cell::sync::Lazy;
use regex::Regex;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub struct Arxiv;

impl SourceExtractor for Arxiv {
    fn name(&self) -> &str {
        "arXiv"
    }

    fn extract<'a>(
        &'a self,
        url: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Reference, ExtractError>> + Send + 'a>> {
        Box::pin(async move {
            let arxiv_id =
                arxiv_id_from_url(url).ok_or(ExtractError::MissingIdentifier("arXiv"))?;

            let api_url = format!(
                "http://export.arxiv.org/api/query?id_list={}",
                urlencoding::encode(&arxiv_id)
            );
            let resp = client.get(&api_url).timeout(timeout).send().await?;
            if !resp.status().is_success() {
                return Err(ExtractError::Status(resp.status().as_u16()));
            }
            let body = resp.text().await?;

            let entry = parse_arxiv_feed(&body)?;
            Ok(Reference {
                kind: ReferenceKind::JournalArticle,
                authors: entry.authors,
                title: entry.title,
                container_title: format!("arXiv preprint arXiv:{arxiv_id}"),
                year: entry.year,
                url: url.to_string(),
                abstract_text: entry.summary,
                arxiv_id,
                primary_category: entry.primary_category,
                ..Default::default()
            })
        })
    }
}

#[derive(Default)]
struct ArxivEntry {
    title: String,
    authors: Vec<String>,
    year: String,
    summary: String,
    primary_category: String,
}

/// Parse the single entry of an arXiv id-list Atom response.
fn parse_arxiv_feed(xml: &str) -> Result<ArxivEntry, ExtractError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    // arXiv prefixes some titles with a bracketed category tag.
    static CATEGORY_PREFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[.*?\]\s*").unwrap());

    let mut reader = Reader::from_str(xml);

    let mut in_entry = false;
    let mut in_title = false;
    let mut in_author = false;
    let mut in_name = false;
    let mut in_published = false;
    let mut in_summary = false;

    let mut title = String::new();
    let mut authors: Vec<String> = Vec::new();
    let mut current_name = String::new();
    let mut published = String::new();
    let mut summary = String::new();
    let mut primary_category = String::new();
    let mut found_entry = false;

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"entry" => {
                    in_entry = true;
                    found_entry = true;
                }
                b"title" if in_entry => in_title = true,
                b"author" if in_entry => {
                    in_author = true;
                    current_name.clear();
                }
                b"name" if in_author => in_name = true,
                b"published" if in_entry => in_published = true,
                b"summary" if in_entry => in_summary = true,
                // Not always self-closing in practice
                b"primary_category" if in_entry => {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"term" {
                            primary_category = String::from_utf8_lossy(&attr.value).to_string();
                        }
                    }
                }
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                if e.local_name().as_ref() == b"primary_category" && in_entry {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"term" {
                            primary_category = String::from_utf8_lossy(&attr.value).to_string();
                        }
                    }
                }
            }
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                if in_title {
                    title.push_str(&text);
                } else if in_name {
                    current_name.push_str(&text);
                } else if in_published {
                    published.push_str(&text);
                } else if in_summary {
                    summary.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"entry" => break,
                b"title" => in_title = false,
                b"author" => {
                    if !current_name.trim().is_empty() {
                        authors.push(current_name.trim().to_string());
                    }
                    in_author = false;
                }
                b"name" => in_name = false,
                b"published" => in_published = false,
                b"summary" => in_summary = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Parse(format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    if !found_entry {
        return Err(ExtractError::EmptyResponse);
    }

    let title = CATEGORY_PREFIX.replace(title.trim(), "").to_string();
    let year = year_from_iso8601(&published).unwrap_or_default();

    Ok(ArxivEntry {
        title,
        authors,
        year,
        summary: summary.trim().to_string(),
        primary_category,
    })
}
