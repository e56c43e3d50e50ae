//! Terminal output for scan summaries

use crate::analyze::{Risk, Summary};
use crate::error::{Error, Result};
use comfy_table::{
    Attribute, Cell, CellAlignment, Color, ContentArrangement, Table, presets::UTF8_FULL,
};
use std::io::Write;

/// Output format for results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// Human-readable table output
    #[default]
    Human,
    /// JSON output
    Json,
    /// No output (silent mode)
    None,
}

/// Sort order for output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputSort {
    /// Keep input order (default)
    #[default]
    Input,
    /// CRITICAL first, then by host
    Risk,
    /// Alphabetically by host
    Host,
}

/// Configuration for output formatting
#[derive(Debug, Clone, Default)]
pub struct OutputConfig {
    /// Output format
    pub format: OutputFormat,
    /// Sort order
    pub sort: OutputSort,
}

impl OutputConfig {
    /// Create a new output config
    pub fn new(format: OutputFormat, sort: OutputSort) -> Self {
        Self { format, sort }
    }
}

/// Output the scan summaries
pub fn output_summaries<W: Write>(
    summaries: &[Summary],
    config: &OutputConfig,
    writer: &mut W,
) -> Result<()> {
    let sorted = sort_summaries(summaries, config.sort);
    match config.format {
        OutputFormat::Human => output_human(&sorted, writer),
        OutputFormat::Json => output_json(&sorted, writer),
        OutputFormat::None => Ok(()),
    }
}

fn sort_summaries(summaries: &[Summary], sort: OutputSort) -> Vec<&Summary> {
    let mut sorted: Vec<&Summary> = summaries.iter().collect();
    match sort {
        OutputSort::Input => {}
        OutputSort::Risk => {
            sorted.sort_by(|a, b| b.risk.cmp(&a.risk).then_with(|| a.host.cmp(&b.host)));
        }
        OutputSort::Host => {
            sorted.sort_by(|a, b| a.host.cmp(&b.host));
        }
    }
    sorted
}

/// Output JSON format
fn output_json<W: Write>(summaries: &[&Summary], writer: &mut W) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, summaries)?;
    writeln!(writer).map_err(Error::OutputFailed)?;
    Ok(())
}

/// Output human-readable table format, then findings per site
fn output_human<W: Write>(summaries: &[&Summary], writer: &mut W) -> Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Site").add_attribute(Attribute::Bold),
            Cell::new("WordPress").add_attribute(Attribute::Bold),
            Cell::new("Vulns").add_attribute(Attribute::Bold),
            Cell::new("Headers").add_attribute(Attribute::Bold),
            Cell::new("Malware").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
        ]);

    for summary in summaries {
        add_summary_row(&mut table, summary);
    }

    writeln!(writer, "{}", table).map_err(Error::OutputFailed)?;

    for summary in summaries.iter().filter(|s| !s.vulnerabilities.is_empty()) {
        writeln!(writer).map_err(Error::OutputFailed)?;
        writeln!(
            writer,
            "Vulnerabilities found on {} ({}):",
            summary.host, summary.vulnerability_count
        )
        .map_err(Error::OutputFailed)?;
        for finding in &summary.vulnerabilities {
            writeln!(
                writer,
                "  • {} → Fix: Update to {} or higher",
                finding.title, finding.fixed_in
            )
            .map_err(Error::OutputFailed)?;
        }
    }

    Ok(())
}

/// Add a row for a site to the table
fn add_summary_row(table: &mut Table, summary: &Summary) {
    let risk_cell = match summary.risk {
        Risk::Critical => Cell::new(summary.risk)
            .fg(Color::Red)
            .add_attribute(Attribute::Bold)
            .set_alignment(CellAlignment::Center),
        Risk::Low => Cell::new(summary.risk)
            .fg(Color::Green)
            .set_alignment(CellAlignment::Center),
    };

    let vulns_cell = if summary.vulnerability_count > 0 {
        Cell::new(summary.vulnerability_count).fg(Color::Yellow)
    } else {
        Cell::new(summary.vulnerability_count)
    };

    table.add_row(vec![
        Cell::new(&summary.host),
        Cell::new(&summary.wordpress_version),
        vulns_cell.set_alignment(CellAlignment::Right),
        grade_cell(&summary.headers_grade),
        Cell::new(&summary.blacklist_status),
        risk_cell,
    ]);
}

fn grade_cell(grade: &str) -> Cell {
    let color = match grade {
        "A" | "B" => Color::Green,
        "C" | "D" | "F" => Color::Yellow,
        _ => Color::DarkGrey,
    };
    Cell::new(grade).fg(color).set_alignment(CellAlignment::Center)
}
