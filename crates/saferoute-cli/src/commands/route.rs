//! Route command handler for computing safe routes between nodes.

use std::path::Path;

use anyhow::{bail, Result};
use clap::Args;
use tracing::info;

use saferoute_lib::{
    find_route, CostCriterion, FeatureOverride, RouteRequest, RouteSummary, SafetyScorer,
    ScoringProfile, TimeSlot, TravelMode, DEFAULT_K,
};

use saferoute_cli::output::{emit, render_route, OutputFormat};

use super::load_dataset;

/// Query arguments shared by the route and compare commands.
#[derive(Args, Debug, Clone)]
pub struct RouteQueryArgs {
    /// Starting node id.
    #[arg(long = "from")]
    pub from: String,
    /// Destination node id.
    #[arg(long = "to")]
    pub to: String,
    /// Travel mode used for safety scoring.
    #[arg(long, default_value = "walking")]
    pub mode: TravelMode,
    /// Time of day used for safety scoring.
    #[arg(long = "time", default_value = "day")]
    pub time: TimeSlot,
    /// Node to avoid (repeatable).
    #[arg(long = "avoid")]
    pub avoid: Vec<String>,
    /// Edge to avoid (repeatable).
    #[arg(long = "avoid-edge")]
    pub avoid_edge: Vec<String>,
    /// Node the route must pass, in order (repeatable).
    #[arg(long = "via")]
    pub via: Vec<String>,
    /// Number of alternatives for blended routes.
    #[arg(long, default_value_t = DEFAULT_K)]
    pub k: usize,
    /// Weight of normalised distance in blended routes.
    #[arg(long)]
    pub blend: Option<f64>,
    /// Coefficient override, `feature=value` or `feature=*factor` (repeatable).
    #[arg(long = "weight")]
    pub weight: Vec<FeatureOverride>,
}

impl RouteQueryArgs {
    /// Convert CLI args to a library [`RouteRequest`] under `criterion`.
    pub fn to_request(&self, criterion: CostCriterion) -> Result<RouteRequest> {
        let criterion = match (criterion, self.blend) {
            (CostCriterion::Blended { .. }, Some(coefficient)) => {
                CostCriterion::Blended { coefficient }
            }
            (criterion, None) => criterion,
            (_, Some(_)) => bail!("--blend only applies to --criterion blended"),
        };

        let profile = self
            .weight
            .iter()
            .fold(ScoringProfile::new(self.mode, self.time), |profile, w| {
                profile.with_override(*w)
            });

        let mut request = RouteRequest::new(self.from.as_str(), self.to.as_str())
            .with_criterion(criterion)
            .with_profile(profile)
            .with_k(self.k);
        for node in &self.avoid {
            request = request.avoid_node(node.as_str());
        }
        for edge in &self.avoid_edge {
            request = request.avoid_edge(edge.as_str());
        }
        for node in &self.via {
            request = request.via(node.as_str());
        }
        Ok(request)
    }
}

/// Arguments for the route command.
#[derive(Args, Debug, Clone)]
pub struct RouteCommandArgs {
    #[command(flatten)]
    pub query: RouteQueryArgs,
    /// Cost criterion: distance, risk or blended.
    #[arg(long, default_value = "distance")]
    pub criterion: CostCriterion,
}

impl RouteCommandArgs {
    pub fn to_request(&self) -> Result<RouteRequest> {
        self.query.to_request(self.criterion)
    }
}

/// Handle the route subcommand.
///
/// A missing route is reported on stdout and is not a failure; invalid input is.
pub fn handle_route_command(
    target: Option<&Path>,
    format: OutputFormat,
    args: &RouteCommandArgs,
) -> Result<()> {
    let request = args.to_request()?;
    let graph = load_dataset(target)?;

    let outcome = find_route(&graph, &request, &SafetyScorer)?;
    info!(
        from = %request.start,
        to = %request.goal,
        criterion = %request.criterion,
        found = outcome.is_found(),
        "route query complete"
    );

    let summary = RouteSummary::from_outcome(&graph, &outcome);
    emit(&render_route(&summary, format)?)
}
