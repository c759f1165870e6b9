// One module per subcommand. main.rs parses arguments and dispatches here.

pub mod compare;
pub mod nodes;
pub mod route;
pub mod score;

use std::path::Path;

use anyhow::{Context, Result};

use saferoute_lib::{load_graph, resolve_dataset, Graph};

/// Resolve the dataset location and build the routing graph.
pub fn load_dataset(target: Option<&Path>) -> Result<Graph> {
    let paths = resolve_dataset(target).context("failed to locate the routing dataset")?;
    load_graph(&paths).with_context(|| {
        format!(
            "failed to load dataset from {} and {}",
            paths.nodes.display(),
            paths.edges.display()
        )
    })
}
