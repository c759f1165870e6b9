//! JSON dataset loading.
//!
//! A dataset is a directory with `nodes.json` (array of `{id, name?}`) and
//! `edges.json` (array of `{id?, u, v, distance_m | distance,
//! nearest_police_m?, modes?}`). Node and edge ids may be strings or integers.

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::debug;

use crate::error::{Error, Result};
use crate::features::{EdgeFeatures, ModeReadings};
use crate::graph::{build_graph, Edge, Graph, Node};

/// File holding the node records.
pub const NODES_FILENAME: &str = "nodes.json";

/// File holding the edge records.
pub const EDGES_FILENAME: &str = "edges.json";

/// Environment variable overriding the dataset directory.
pub const DATA_DIR_ENV: &str = "SAFEROUTE_DATA_DIR";

/// Locations of the dataset files.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub nodes: PathBuf,
    pub edges: PathBuf,
}

impl DatasetPaths {
    pub fn for_dir(dir: &Path) -> Self {
        Self {
            nodes: dir.join(NODES_FILENAME),
            edges: dir.join(EDGES_FILENAME),
        }
    }
}

/// Resolve the default dataset location using platform-specific project directories.
pub fn default_dataset_dir() -> Result<PathBuf> {
    let dirs = ProjectDirs::from("com", "saferoute", "saferoute")
        .ok_or(Error::ProjectDirsUnavailable)?;
    Ok(dirs.data_dir().to_path_buf())
}

/// Resolve the dataset directory and verify both files exist.
///
/// Resolution order: `explicit`, then [`DATA_DIR_ENV`], then
/// [`default_dataset_dir`].
pub fn resolve_dataset(explicit: Option<&Path>) -> Result<DatasetPaths> {
    let dir = match explicit {
        Some(path) => path.to_path_buf(),
        None => match env::var_os(DATA_DIR_ENV) {
            Some(value) if !value.is_empty() => PathBuf::from(value),
            _ => default_dataset_dir()?,
        },
    };

    let paths = DatasetPaths::for_dir(&dir);
    for file in [&paths.nodes, &paths.edges] {
        if !file.is_file() {
            return Err(Error::DatasetNotFound { path: file.clone() });
        }
    }
    debug!(dir = %dir.display(), "resolved dataset");
    Ok(paths)
}

/// Load and build the routing graph from dataset files.
pub fn load_graph(paths: &DatasetPaths) -> Result<Graph> {
    let nodes = fs::read_to_string(&paths.nodes)?;
    let edges = fs::read_to_string(&paths.edges)?;
    parse_graph(&nodes, &edges)
}

/// Build a routing graph from the JSON text of both dataset files.
pub fn parse_graph(nodes_json: &str, edges_json: &str) -> Result<Graph> {
    let node_records: Vec<NodeRecord> = serde_json::from_str(nodes_json)?;
    let edge_records: Vec<EdgeRecord> = serde_json::from_str(edges_json)?;

    let nodes = node_records
        .into_iter()
        .map(|record| {
            let name = record.name.unwrap_or_else(|| record.id.clone());
            Node::new(record.id, name)
        })
        .collect();

    build_graph(nodes, assign_edge_ids(edge_records))
}

/// Give every edge a stable id, generating `"{u}-{v}-{n}"` where missing.
///
/// `n` counts occurrences of the `(u, v)` pair in file order, starting at 1.
fn assign_edge_ids(records: Vec<EdgeRecord>) -> Vec<Edge> {
    let mut pair_counts: HashMap<(String, String), usize> = HashMap::new();
    records
        .into_iter()
        .map(|record| {
            let count = pair_counts
                .entry((record.u.clone(), record.v.clone()))
                .or_insert(0);
            *count += 1;
            let id = record
                .id
                .unwrap_or_else(|| format!("{}-{}-{}", record.u, record.v, count));
            Edge::new(id, record.u, record.v, record.distance_m).with_features(EdgeFeatures {
                nearest_police_m: record.nearest_police_m,
                modes: record.modes,
            })
        })
        .collect()
}

#[derive(Debug, Deserialize)]
struct NodeRecord {
    #[serde(deserialize_with = "identifier")]
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct EdgeRecord {
    #[serde(default, deserialize_with = "optional_identifier")]
    id: Option<String>,
    #[serde(deserialize_with = "identifier")]
    u: String,
    #[serde(deserialize_with = "identifier")]
    v: String,
    #[serde(alias = "distance")]
    distance_m: f64,
    #[serde(default, deserialize_with = "crate::features::lenient::number")]
    nearest_police_m: Option<f64>,
    #[serde(default, deserialize_with = "crate::features::lenient::or_default")]
    modes: ModeReadings,
}

fn identifier<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(serde::de::Error::custom(format!(
            "identifier must be a string or integer, got {other}"
        ))),
    }
}

fn optional_identifier<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<Value>::deserialize(deserializer)? {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(other) => Err(serde::de::Error::custom(format!(
            "identifier must be a string or integer, got {other}"
        ))),
    }
}
