use std::io::Write;

use owo_colors::OwoColorize;
use refsift_core::{MergeStats, Resolution, ResolutionPath};

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

/// Print the outcome of resolving one URL.
pub fn print_resolution(
    w: &mut dyn Write,
    index: usize,
    total: usize,
    resolution: &Resolution,
    color: ColorMode,
) -> std::io::Result<()> {
    let label = match resolution.path {
        ResolutionPath::Primary => "resolved",
        ResolutionPath::Degraded => "degraded",
        ResolutionPath::Stub => "stub",
    };
    let line = format!(
        "[{index}/{total}] {} via {}: {}",
        label, resolution.source, resolution.reference.title
    );
    if color.enabled() {
        match resolution.path {
            ResolutionPath::Primary => writeln!(w, "{}", line.green()),
            ResolutionPath::Degraded => writeln!(w, "{}", line.yellow()),
            ResolutionPath::Stub => writeln!(w, "{}", line.red()),
        }
    } else {
        writeln!(w, "{line}")
    }
}

/// Print merge statistics after processing.
pub fn print_stats(w: &mut dyn Write, stats: &MergeStats, color: ColorMode) -> std::io::Result<()> {
    writeln!(w)?;
    let line = format!(
        "{} references processed, {} unique, {} duplicates removed",
        stats.total, stats.unique, stats.duplicates_removed
    );
    if color.enabled() {
        writeln!(w, "{}", line.dimmed())?;
    } else {
        writeln!(w, "{line}")?;
    }
    writeln!(w)
}

/// Print the sorted, formatted citation list.
pub fn print_citations(w: &mut dyn Write, citations: &[String]) -> std::io::Result<()> {
    for (i, citation) in citations.iter().enumerate() {
        writeln!(w, "{}. {}", i + 1, citation)?;
    }
    Ok(())
}
