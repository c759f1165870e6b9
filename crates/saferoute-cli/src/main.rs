use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use saferoute_cli::output::OutputFormat;

mod commands;

use commands::compare::{handle_compare_command, CompareCommandArgs};
use commands::nodes::handle_nodes_command;
use commands::route::{handle_route_command, RouteCommandArgs};
use commands::score::{handle_score_command, ScoreCommandArgs};

#[derive(Parser, Debug)]
#[command(author, version, about = "Safety-aware route finding")]
struct Cli {
    /// Directory holding nodes.json and edges.json.
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    /// Output format.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Compute routes between two nodes.
    Route(RouteCommandArgs),
    /// Show the shortest, safest and balanced routes together.
    Compare(CompareCommandArgs),
    /// List the nodes of the dataset.
    Nodes,
    /// Show the safety score breakdown of a single edge.
    Score(ScoreCommandArgs),
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let data_dir = cli.data_dir.as_deref();

    match cli.command {
        Command::Route(args) => handle_route_command(data_dir, cli.format, &args),
        Command::Compare(args) => handle_compare_command(data_dir, cli.format, &args),
        Command::Nodes => handle_nodes_command(data_dir, cli.format),
        Command::Score(args) => handle_score_command(data_dir, cli.format, &args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .finish();

    let _ = tracing::subscriber::set_global_default(subscriber);
}
