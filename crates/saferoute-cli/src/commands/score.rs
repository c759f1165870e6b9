//! Score command handler showing how an edge is rated.

use std::path::Path;

use anyhow::Result;
use clap::Args;

use saferoute_lib::{
    EdgeScorer, Error, FeatureOverride, SafetyScorer, ScoringProfile, TimeSlot, TravelMode,
};

use saferoute_cli::output::{emit, render_score, OutputFormat};

use super::load_dataset;

/// Arguments for the score command.
#[derive(Args, Debug, Clone)]
pub struct ScoreCommandArgs {
    /// Edge id to score.
    #[arg(long)]
    pub edge: String,
    /// Travel mode used for safety scoring.
    #[arg(long, default_value = "walking")]
    pub mode: TravelMode,
    /// Time of day used for safety scoring.
    #[arg(long = "time", default_value = "day")]
    pub time: TimeSlot,
    /// Coefficient override, `feature=value` or `feature=*factor` (repeatable).
    #[arg(long = "weight")]
    pub weight: Vec<FeatureOverride>,
}

/// Handle the score subcommand.
pub fn handle_score_command(
    target: Option<&Path>,
    format: OutputFormat,
    args: &ScoreCommandArgs,
) -> Result<()> {
    let graph = load_dataset(target)?;
    let edge = graph.edge(&args.edge).ok_or_else(|| Error::UnknownEdge {
        id: args.edge.clone(),
    })?;

    let mut profile = ScoringProfile::new(args.mode, args.time);
    for weight in &args.weight {
        profile = profile.with_override(*weight);
    }
    let score = SafetyScorer.score(edge, &profile);

    emit(&render_score(
        &edge.id,
        args.mode.as_str(),
        args.time.as_str(),
        &score,
        format,
    )?)
}
