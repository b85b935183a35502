use super::{ExtractError, SourceExtractor};
use crate::identifiers::doi_from_url;
use crate::{Reference, ReferenceKind};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub struct CrossRef {
    pub mailto: Option<String>,
}

impl SourceExtractor for CrossRef {
    fn name(&self) -> &str {
        "CrossRef"
    }

    fn extract<'a>(
        &'a self,
        url: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Reference, ExtractError>> + Send + 'a>> {
        Box::pin(async move {
            let doi = doi_from_url(url).ok_or(ExtractError::MissingIdentifier("DOI"))?;

            let mut api_url = format!("https://api.crossref.org/works/{doi}");
            let user_agent = if let Some(ref email) = self.mailto {
                api_url.push_str(&format!("?mailto={}", urlencoding::encode(email)));
                format!("refsift/0.1 (mailto:{email})")
            } else {
                "refsift/0.1".to_string()
            };

            let resp = client
                .get(&api_url)
                .header("User-Agent", user_agent)
                .timeout(timeout)
                .send()
                .await?;
            if !resp.status().is_success() {
                return Err(ExtractError::Status(resp.status().as_u16()));
            }

            let data: serde_json::Value = resp.json().await?;
            let message = &data["message"];
            if !message.is_object() {
                return Err(ExtractError::Parse("no message object in response".into()));
            }

            Ok(map_work(message, doi, url))
        })
    }
}

/// Map a CrossRef work (the `message` object) into a reference.
fn map_work(message: &serde_json::Value, doi: String, url: &str) -> Reference {
    let title = joined_parts(&message["title"]);
    let container_title = joined_parts(&message["container-title"]);

    // "Family, Given"; entries without a family name are dropped.
    let authors: Vec<String> = message["author"]
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|a| {
                    let family = a["family"].as_str()?.trim();
                    if family.is_empty() {
                        return None;
                    }
                    let given = a["given"].as_str().unwrap_or("").trim();
                    if given.is_empty() {
                        Some(family.to_string())
                    } else {
                        Some(format!("{family}, {given}"))
                    }
                })
                .collect()
        })
        .unwrap_or_default();

    // Prefer the print publication date, fall back to the online one.
    let year = date_year(&message["published-print"])
        .or_else(|| date_year(&message["published-online"]))
        .unwrap_or_default();

    let volume = string_or_number(&message["volume"]);

    // CrossRef carries the page range as one string, e.g. "10-20".
    let page = string_or_number(&message["page"]);
    let (start_page, end_page) = match page.split_once('-') {
        Some((s, e)) => (s.to_string(), e.to_string()),
        None => (page, String::new()),
    };

    Reference {
        kind: ReferenceKind::JournalArticle,
        authors,
        title,
        container_title,
        year,
        volume,
        start_page,
        end_page,
        doi,
        url: url.to_string(),
        ..Default::default()
    }
}

/// Join a multi-part CrossRef title array with spaces.
fn joined_parts(value: &serde_json::Value) -> String {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .filter_map(|v| v.as_str())
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default()
}

/// Year from a CrossRef date field's `date-parts` array.
fn date_year(value: &serde_json::Value) -> Option<String> {
    value["date-parts"][0][0].as_i64().map(|y| y.to_string())
}

fn string_or_number(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}
