use super::{ExtractError, SourceExtractor};
use crate::identifiers::pmid_from_url;
use crate::{Reference, ReferenceKind};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

pub struct PubMed;

impl SourceExtractor for PubMed {
    fn name(&self) -> &str {
        "PubMed"
    }

    fn extract<'a>(
        &'a self,
        url: &'a str,
        client: &'a reqwest::Client,
        timeout: Duration,
    ) -> Pin<Box<dyn Future<Output = Result<Reference, ExtractError>> + Send + 'a>> {
        Box::pin(async move {
            let pmid = pmid_from_url(url).ok_or(ExtractError::MissingIdentifier("PubMed"))?;

            let resp = client
                .get("https://eutils.ncbi.nlm.nih.gov/entrez/eutils/efetch.fcgi")
                .query(&[("db", "pubmed"), ("id", pmid.as_str()), ("retmode", "xml")])
                .timeout(timeout)
                .send()
                .await?;
            if !resp.status().is_success() {
                return Err(ExtractError::Status(resp.status().as_u16()));
            }
            let body = resp.text().await?;

            let article = parse_pubmed_article(&body)?;
            Ok(Reference {
                kind: ReferenceKind::JournalArticle,
                authors: article.authors,
                title: article.title,
                container_title: article.journal,
                year: article.year,
                url: url.to_string(),
                ..Default::default()
            })
        })
    }
}

#[derive(Default)]
struct PubmedArticle {
    title: String,
    authors: Vec<String>,
    year: String,
    journal: String,
}

/// Parse the first `PubmedArticle` of an efetch XML response.
fn parse_pubmed_article(xml: &str) -> Result<PubmedArticle, ExtractError> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);

    let mut in_article = false;
    let mut in_title = false;
    let mut in_author = false;
    let mut in_last_name = false;
    let mut in_fore_name = false;
    let mut in_journal = false;
    let mut in_journal_title = false;
    let mut in_pub_date = false;
    let mut in_year = false;

    let mut article = PubmedArticle::default();
    let mut last_name = String::new();
    let mut fore_name = String::new();

    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"PubmedArticle" => in_article = true,
                b"ArticleTitle" if in_article => in_title = true,
                b"Author" if in_article => {
                    in_author = true;
                    last_name.clear();
                    fore_name.clear();
                }
                b"LastName" if in_author => in_last_name = true,
                b"ForeName" if in_author => in_fore_name = true,
                b"Journal" if in_article => in_journal = true,
                b"Title" if in_journal => in_journal_title = true,
                b"PubDate" if in_article => in_pub_date = true,
                b"Year" if in_pub_date => in_year = true,
                _ => {}
            },
            Ok(Event::Text(ref e)) => {
                let text = e.unescape().unwrap_or_default();
                if in_title {
                    article.title.push_str(&text);
                } else if in_last_name {
                    last_name.push_str(&text);
                } else if in_fore_name {
                    fore_name.push_str(&text);
                } else if in_journal_title {
                    article.journal.push_str(&text);
                } else if in_year && article.year.is_empty() {
                    article.year.push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                // Only the first article is of interest
                b"PubmedArticle" => break,
                b"ArticleTitle" => in_title = false,
                b"Author" => {
                    // Entries without a last name are dropped
                    let last = last_name.trim();
                    if !last.is_empty() {
                        let fore = fore_name.trim();
                        if fore.is_empty() {
                            article.authors.push(last.to_string());
                        } else {
                            article.authors.push(format!("{last}, {fore}"));
                        }
                    }
                    in_author = false;
                }
                b"LastName" => in_last_name = false,
                b"ForeName" => in_fore_name = false,
                b"Journal" => in_journal = false,
                b"Title" => in_journal_title = false,
                b"PubDate" => in_pub_date = false,
                b"Year" => in_year = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => return Err(ExtractError::Parse(format!("XML parse error: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    if !in_article && article.title.is_empty() && article.authors.is_empty() {
        return Err(ExtractError::EmptyResponse);
    }

    article.title = article.title.trim().to_string();
    article.journal = article.journal.trim().to_string();
    article.year = article.year.trim().to_string();
    Ok(article)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESPONSE: &str = r#"<?xml version="1.0" ?>
<PubmedArticleSet>
  <PubmedArticle>
    <MedlineCitation>
      <Article>
        <Journal>
          <Title>Journal of Medical Examples</Title>
          <JournalIssue>
            <PubDate><Year>2022</Year><Month>Jun</Month></PubDate>
          </JournalIssue>
        </Journal>
        <ArticleTitle>A clinical study of reference handling.</ArticleTitle>
        <AuthorList>
          <Author><LastName>Doe</LastName><ForeName>Jane</ForeName></Author>
          <Author><LastName>Roe</LastName><ForeName>Richard</ForeName></Author>
          <Author><CollectiveName>The Refs Consortium</CollectiveName></Author>
        </AuthorList>
      </Article>
    </MedlineCitation>
  </PubmedArticle>
</PubmedArticleSet>"#;

    #[test]
    fn parses_article_fields() {
        let article = parse_pubmed_article(RESPONSE).unwrap();
        assert_eq!(article.title, "A clinical study of reference handling.");
        assert_eq!(article.authors, vec!["Doe, Jane", "Roe, Richard"]);
        assert_eq!(article.year, "2022");
        assert_eq!(article.journal, "Journal of Medical Examples");
    }

    #[test]
    fn empty_set_is_an_error() {
        let xml = "<PubmedArticleSet></PubmedArticleSet>";
        assert!(matches!(
            parse_pubmed_article(xml),
            Err(ExtractError::EmptyResponse)
        ));
    }
}
