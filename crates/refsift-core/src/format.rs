//! Citation rendering.
//!
//! One render routine walks a per-style table of field directives; each
//! directive names the field, its connecting punctuation, and the presence
//! conditions under which it applies. The tables encode the exact punctuation
//! contract of the five supported styles; author-list joining is the only
//! per-style code path.
//!
//! Rendering is total: a missing field is omitted together with its
//! punctuation, and any internal failure degrades to a literal diagnostic
//! string instead of propagating.

use std::fmt::Write as _;

use crate::{Reference, ReferenceKind};

/// The closed set of supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CitationStyle {
    #[default]
    Apa,
    Mla,
    Chicago,
    Harvard,
    Ieee,
}

impl CitationStyle {
    pub const ALL: [CitationStyle; 5] = [
        Self::Apa,
        Self::Mla,
        Self::Chicago,
        Self::Harvard,
        Self::Ieee,
    ];

    /// Parse a style selector. Unrecognized selectors deterministically fall
    /// back to APA.
    pub fn parse(selector: &str) -> Self {
        match selector.trim().to_ascii_lowercase().as_str() {
            "mla" => Self::Mla,
            "chicago" => Self::Chicago,
            "harvard" => Self::Harvard,
            "ieee" => Self::Ieee,
            _ => Self::Apa,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Apa => "apa",
            Self::Mla => "mla",
            Self::Chicago => "chicago",
            Self::Harvard => "harvard",
            Self::Ieee => "ieee",
        }
    }
}

impl std::fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A renderable field of a reference.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    Year,
    Title,
    Container,
    Volume,
    Issue,
    /// `start` or `start-end`.
    Pages,
    /// Gate-only: distinguishes `p.`/`pp.` style page prefixes.
    EndPage,
    Doi,
    /// `https://doi.org/<doi>`, empty when the DOI is absent.
    DoiLink,
    Url,
    Publisher,
}

/// A presence condition gating a directive.
#[derive(Debug, Clone, Copy)]
enum Cond {
    Has(Field),
    Lacks(Field),
}

/// One step of a style plan: emit `prefix + value + suffix` when the field
/// has a value and every gate holds.
struct Directive {
    field: Field,
    prefix: &'static str,
    suffix: &'static str,
    gates: &'static [Cond],
}

impl Directive {
    const fn plain(field: Field, prefix: &'static str) -> Self {
        Self { field, prefix, suffix: "", gates: &[] }
    }

    const fn wrapped(field: Field, prefix: &'static str, suffix: &'static str) -> Self {
        Self { field, prefix, suffix, gates: &[] }
    }

    const fn when(field: Field, prefix: &'static str, gates: &'static [Cond]) -> Self {
        Self { field, prefix, suffix: "", gates }
    }

    const fn wrapped_when(
        field: Field,
        prefix: &'static str,
        suffix: &'static str,
        gates: &'static [Cond],
    ) -> Self {
        Self { field, prefix, suffix, gates }
    }
}

use Cond::{Has, Lacks};
use Field::*;

const APA_JOURNAL: &[Directive] = &[
    Directive::wrapped(Year, " (", ")"),
    Directive::plain(Title, ". "),
    Directive::plain(Container, ". "),
    Directive::when(Volume, ", ", &[Has(Container)]),
    Directive::wrapped_when(Issue, "(", ")", &[Has(Container), Has(Volume)]),
    Directive::when(Pages, ", ", &[Has(Container)]),
    Directive::plain(DoiLink, ". "),
    Directive::when(Url, ". ", &[Lacks(Doi)]),
];

const APA_BOOK: &[Directive] = &[
    Directive::wrapped(Year, " (", ")"),
    Directive::plain(Title, ". "),
    Directive::plain(Publisher, ". "),
];

const APA_MINIMAL: &[Directive] = &[
    Directive::wrapped(Year, " (", ")"),
    Directive::plain(Title, ". "),
    Directive::plain(Container, ". "),
    Directive::plain(DoiLink, ". "),
    Directive::when(Url, ". ", &[Lacks(Doi)]),
];

const MLA: &[Directive] = &[
    Directive::wrapped(Title, ". \"", "\""),
    Directive::plain(Container, ". "),
    Directive::when(Volume, ", vol. ", &[Has(Container)]),
    Directive::when(Issue, ", no. ", &[Has(Container), Has(Volume)]),
    Directive::when(Year, ", ", &[Has(Container)]),
    Directive::when(Pages, ", pp. ", &[Has(Container), Has(EndPage)]),
    Directive::when(Pages, ", p. ", &[Has(Container), Lacks(EndPage)]),
    Directive::when(Year, ". ", &[Lacks(Container)]),
    Directive::plain(DoiLink, ", "),
    Directive::when(Url, ", ", &[Lacks(Doi)]),
];

const CHICAGO: &[Directive] = &[
    Directive::wrapped(Title, ". \"", "\""),
    Directive::plain(Container, ". "),
    Directive::when(Volume, " ", &[Has(Container)]),
    Directive::when(Issue, ", no. ", &[Has(Container), Has(Volume)]),
    Directive::wrapped_when(Year, " (", ")", &[Has(Container)]),
    Directive::when(Pages, ": ", &[Has(Container)]),
    Directive::when(Year, ". ", &[Lacks(Container)]),
    Directive::plain(DoiLink, ". "),
    Directive::when(Url, ". ", &[Lacks(Doi)]),
];

const HARVARD: &[Directive] = &[
    Directive::plain(Year, " "),
    Directive::plain(Title, ", "),
    Directive::plain(Container, ", "),
    Directive::when(Volume, ", ", &[Has(Container)]),
    Directive::wrapped_when(Issue, "(", ")", &[Has(Container), Has(Volume)]),
    Directive::when(Pages, ", pp.", &[Has(Container), Has(EndPage)]),
    Directive::when(Pages, ", p.", &[Has(Container), Lacks(EndPage)]),
    Directive::plain(Doi, ", DOI: "),
    Directive::when(Url, ", Available at: ", &[Lacks(Doi)]),
];

const IEEE: &[Directive] = &[
    Directive::wrapped(Title, ", \"", "\""),
    Directive::plain(Container, ", "),
    Directive::when(Volume, ", vol. ", &[Has(Container)]),
    Directive::when(Issue, ", no. ", &[Has(Container), Has(Volume)]),
    Directive::when(Pages, ", pp. ", &[Has(Container)]),
    Directive::plain(Year, ", "),
    Directive::plain(Doi, ", doi: "),
];

/// The directive table for a style and reference kind. Only APA branches by
/// kind; the other styles render every kind through their journal form.
fn plan(style: CitationStyle, kind: ReferenceKind) -> &'static [Directive] {
    match style {
        CitationStyle::Apa => match kind {
            ReferenceKind::JournalArticle => APA_JOURNAL,
            ReferenceKind::Book => APA_BOOK,
            _ => APA_MINIMAL,
        },
        CitationStyle::Mla => MLA,
        CitationStyle::Chicago => CHICAGO,
        CitationStyle::Harvard => HARVARD,
        CitationStyle::Ieee => IEEE,
    }
}

fn value(reference: &Reference, field: Field) -> String {
    match field {
        Year => reference.year.clone(),
        Title => reference.title.clone(),
        Container => reference.container_title.clone(),
        Volume => reference.volume.clone(),
        Issue => reference.issue.clone(),
        Pages => {
            if reference.start_page.is_empty() {
                String::new()
            } else if reference.end_page.is_empty() {
                reference.start_page.clone()
            } else {
                format!("{}-{}", reference.start_page, reference.end_page)
            }
        }
        EndPage => reference.end_page.clone(),
        Doi => reference.doi.clone(),
        DoiLink => {
            if reference.doi.is_empty() {
                String::new()
            } else {
                format!("https://doi.org/{}", reference.doi)
            }
        }
        Url => reference.url.clone(),
        Publisher => reference.publisher.clone(),
    }
}

fn has(reference: &Reference, field: Field) -> bool {
    !value(reference, field).is_empty()
}

fn gates_hold(reference: &Reference, gates: &[Cond]) -> bool {
    gates.iter().all(|cond| match cond {
        Has(field) => has(reference, *field),
        Lacks(field) => !has(reference, *field),
    })
}

/// Join an author list per the style's convention. An empty list renders as
/// "Unknown Author". Truncation thresholds are normative for this system.
fn join_authors(authors: &[String], style: CitationStyle) -> String {
    if authors.is_empty() {
        return "Unknown Author".to_string();
    }
    if authors.len() == 1 {
        return authors[0].clone();
    }
    let last = &authors[authors.len() - 1];

    match style {
        CitationStyle::Apa => {
            if authors.len() == 2 {
                format!("{}, & {}", authors[0], last)
            } else if authors.len() <= 7 {
                format!("{}, & {}", authors[..authors.len() - 1].join(", "), last)
            } else {
                format!("{}, ... {}", authors[..6].join(", "), last)
            }
        }
        CitationStyle::Mla => {
            if authors.len() == 2 {
                format!("{} and {}", authors[0], last)
            } else {
                format!("{}, and {}", authors[..authors.len() - 1].join(", "), last)
            }
        }
        CitationStyle::Chicago => {
            if authors.len() == 2 {
                format!("{} and {}", authors[0], last)
            } else if authors.len() <= 10 {
                format!("{}, and {}", authors[..authors.len() - 1].join(", "), last)
            } else {
                format!("{}, et al.", authors[..10].join(", "))
            }
        }
        CitationStyle::Harvard => {
            if authors.len() <= 3 {
                format!("{} & {}", authors[..authors.len() - 1].join(", "), last)
            } else {
                format!("{} et al.", authors[0])
            }
        }
        CitationStyle::Ieee => {
            if authors.len() <= 6 {
                authors.join(", ")
            } else {
                format!("{} et al.", authors[..6].join(", "))
            }
        }
    }
}

/// Render a citation. Never fails: internal formatting errors degrade to a
/// diagnostic string.
pub fn format_citation(reference: &Reference, style: CitationStyle) -> String {
    match render(reference, style) {
        Ok(citation) => citation,
        Err(err) => format!("Error formatting reference: {err}"),
    }
}

fn render(reference: &Reference, style: CitationStyle) -> Result<String, std::fmt::Error> {
    let mut out = String::new();
    out.push_str(&join_authors(&reference.authors, style));

    for directive in plan(style, reference.kind) {
        let v = value(reference, directive.field);
        if v.is_empty() || !gates_hold(reference, directive.gates) {
            continue;
        }
        write!(out, "{}{v}{}", directive.prefix, directive.suffix)?;
    }

    out.push('.');
    // Fields ending in a period would otherwise double up with the connector.
    Ok(out.replace("..", ".").trim().to_string())
}
