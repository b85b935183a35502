use std::io::Write;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use refsift_core::canonical::KeyScope;
use refsift_core::{
    CitationStyle, Collection, Config, build_client, references_from_records, resolve_url,
};

mod output;

use output::ColorMode;

/// Reference sorter - resolve URLs and format bibliographic records into
/// deduplicated, sorted citation lists
#[derive(Parser, Debug)]
#[command(name = "refsift", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve one or more URLs into citations
    Resolve {
        /// URLs to resolve (bare hosts get an https:// prefix)
        #[arg(required = true)]
        urls: Vec<String>,

        /// Citation style: apa, mla, chicago, harvard, ieee
        #[arg(short, long, default_value = "apa")]
        style: String,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Per-request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,

        /// Contact address for the CrossRef polite pool
        #[arg(long)]
        crossref_mailto: Option<String>,
    },

    /// Format parsed reference record files (JSON arrays of field maps)
    Format {
        /// Record files to merge
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Citation style: apa, mla, chicago, harvard, ieee
        #[arg(short, long, default_value = "apa")]
        style: String,

        /// Disable colored output
        #[arg(long)]
        no_color: bool,

        /// Path to output file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Resolve {
            urls,
            style,
            no_color,
            output,
            timeout,
            crossref_mailto,
        } => resolve(urls, style, no_color, output, timeout, crossref_mailto).await,
        Command::Format {
            files,
            style,
            no_color,
            output,
        } => format_files(files, style, no_color, output),
    }
}

fn open_writer(output: Option<&PathBuf>) -> anyhow::Result<Box<dyn Write>> {
    Ok(if let Some(path) = output {
        Box::new(std::fs::File::create(path)?)
    } else {
        Box::new(std::io::stdout())
    })
}

async fn resolve(
    urls: Vec<String>,
    style: String,
    no_color: bool,
    output: Option<PathBuf>,
    timeout: Option<u64>,
    crossref_mailto: Option<String>,
) -> anyhow::Result<()> {
    // Resolve configuration: CLI flags > env vars > defaults
    let fetch_timeout_secs = timeout
        .or_else(|| {
            std::env::var("REFSIFT_TIMEOUT")
                .ok()
                .and_then(|v| v.parse().ok())
        })
        .unwrap_or(10);
    let crossref_mailto = crossref_mailto.or_else(|| std::env::var("CROSSREF_MAILTO").ok());

    let config = Config {
        fetch_timeout_secs,
        crossref_mailto,
        ..Default::default()
    };
    let client = build_client(&config);
    let style = CitationStyle::parse(&style);

    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);
    let mut writer = open_writer(output.as_ref())?;

    let total = urls.len();
    let mut collection = Collection::new();
    let mut duplicates = 0;
    for (i, url) in urls.iter().enumerate() {
        tracing::debug!(url, index = i + 1, total, "resolving");
        let resolution = resolve_url(url, &config, &client).await;
        output::print_resolution(&mut *writer, i + 1, total, &resolution, color)?;
        let stats = collection.merge(vec![resolution.reference], KeyScope::WithUrl);
        duplicates += stats.duplicates_removed;
    }

    let stats = refsift_core::MergeStats {
        total,
        unique: collection.len(),
        duplicates_removed: duplicates,
    };
    output::print_stats(&mut *writer, &stats, color)?;
    output::print_citations(&mut *writer, &collection.render(style))?;
    Ok(())
}

fn format_files(
    files: Vec<PathBuf>,
    style: String,
    no_color: bool,
    output: Option<PathBuf>,
) -> anyhow::Result<()> {
    let style = CitationStyle::parse(&style);
    let use_color = !no_color && output.is_none();
    let color = ColorMode(use_color);
    let mut writer = open_writer(output.as_ref())?;

    let mut incoming = Vec::new();
    for path in &files {
        let text = std::fs::read_to_string(path)
            .map_err(|e| anyhow::anyhow!("could not read {}: {e}", path.display()))?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| anyhow::anyhow!("could not parse {}: {e}", path.display()))?;
        incoming.extend(references_from_records(&records));
    }

    let mut collection = Collection::new();
    let stats = collection.merge(incoming, KeyScope::TitleAuthorsYear);

    output::print_stats(&mut *writer, &stats, color)?;
    output::print_citations(&mut *writer, &collection.render(style))?;
    Ok(())
}
