//! Nodes command handler.

use std::path::Path;

use anyhow::Result;

use saferoute_cli::output::{emit, render_nodes, OutputFormat};

use super::load_dataset;

/// List every node of the dataset.
pub fn handle_nodes_command(target: Option<&Path>, format: OutputFormat) -> Result<()> {
    let graph = load_dataset(target)?;
    emit(&render_nodes(&graph, format)?)
}
