//! Compare command handler: shortest, safest and balanced routes side by side.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use tracing::info;

use saferoute_lib::{compare_routes, ComparisonSummary, CostCriterion, SafetyScorer};

use saferoute_cli::output::{emit, render_comparison, OutputFormat};

use super::load_dataset;
use super::route::RouteQueryArgs;

/// Arguments for the compare command.
#[derive(Args, Debug, Clone)]
pub struct CompareCommandArgs {
    #[command(flatten)]
    pub query: RouteQueryArgs,
}

/// Handle the compare subcommand.
///
/// `--blend` and `--k` shape the balanced section; the other sections always
/// report the single best route.
pub fn handle_compare_command(
    target: Option<&Path>,
    format: OutputFormat,
    args: &CompareCommandArgs,
) -> Result<()> {
    let request = args.query.to_request(CostCriterion::blended())?;
    let graph = load_dataset(target)?;

    let comparison = compare_routes(&graph, &request, &SafetyScorer)?;
    info!(
        from = %request.start,
        to = %request.goal,
        shortest = comparison.shortest.is_found(),
        safest = comparison.safest.is_found(),
        balanced = comparison.balanced.is_found(),
        "comparison complete"
    );

    let summary = ComparisonSummary::from_comparison(&graph, &comparison);
    emit(&render_comparison(&summary, format)?)
}
