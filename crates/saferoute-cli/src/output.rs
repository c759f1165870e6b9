//! Output formatting for CLI results.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::ValueEnum;
use serde::Serialize;

use saferoute_lib::{ComparisonSummary, Graph, RouteRenderMode, RouteSummary, Score};

/// Output format selected with `--format`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain human-readable text.
    #[default]
    Text,
    /// Markdown-flavoured text for chat and notes.
    Rich,
    /// Pretty-printed JSON.
    Json,
}

/// Render a route summary in the requested format.
pub fn render_route(summary: &RouteSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(summary.render(RouteRenderMode::PlainText)),
        OutputFormat::Rich => Ok(summary.render(RouteRenderMode::RichText)),
        OutputFormat::Json => to_json(summary),
    }
}

/// Render a criteria comparison in the requested format.
pub fn render_comparison(summary: &ComparisonSummary, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(summary.render(RouteRenderMode::PlainText)),
        OutputFormat::Rich => Ok(summary.render(RouteRenderMode::RichText)),
        OutputFormat::Json => to_json(summary),
    }
}

#[derive(Debug, Serialize)]
struct NodeListing<'a> {
    id: &'a str,
    name: &'a str,
    degree: usize,
}

/// Render the node list of a graph, sorted by id.
pub fn render_nodes(graph: &Graph, format: OutputFormat) -> Result<String> {
    let mut listing: Vec<NodeListing<'_>> = graph
        .nodes()
        .iter()
        .map(|node| NodeListing {
            id: &node.id,
            name: &node.name,
            degree: graph.neighbours(&node.id).count(),
        })
        .collect();
    listing.sort_by(|a, b| a.id.cmp(b.id));

    match format {
        OutputFormat::Json => to_json(&listing),
        OutputFormat::Text | OutputFormat::Rich => {
            let width = listing.iter().map(|entry| entry.id.len()).max().unwrap_or(0);
            let mut out = format!("{} nodes\n", listing.len());
            for entry in &listing {
                let bullet = if format == OutputFormat::Rich { "* " } else { "" };
                out.push_str(&format!(
                    "{bullet}{:<width$}  {} ({} links)\n",
                    entry.id, entry.name, entry.degree
                ));
            }
            Ok(out)
        }
    }
}

#[derive(Debug, Serialize)]
struct EdgeScoreReport<'a> {
    edge: &'a str,
    mode: String,
    time: String,
    #[serde(flatten)]
    score: &'a Score,
}

/// Render an edge score with its per-feature breakdown.
pub fn render_score(
    edge_id: &str,
    mode: &str,
    time: &str,
    score: &Score,
    format: OutputFormat,
) -> Result<String> {
    if format == OutputFormat::Json {
        return to_json(&EdgeScoreReport {
            edge: edge_id,
            mode: mode.to_string(),
            time: time.to_string(),
            score,
        });
    }

    let mut out = format!("Edge {edge_id} ({mode}, {time}): score {:.3}\n", score.cost);
    for line in &score.breakdown {
        out.push_str(&format!(
            "  {:<20} risk {:.3} x coeff {:.2} x time {:.2} = {:.3}\n",
            line.name, line.risk, line.coefficient, line.time_multiplier, line.contribution
        ));
    }
    Ok(out)
}

/// Write rendered output to stdout.
pub fn emit(rendered: &str) -> Result<()> {
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(rendered.as_bytes())
        .context("failed to write output")?;
    stdout.flush().context("failed to flush output")
}

fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut json = serde_json::to_string_pretty(value).context("failed to serialise output")?;
    json.push('\n');
    Ok(json)
}
