use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::features::EdgeFeatures;

/// Opaque node identifier.
pub type NodeId = String;

/// Stable edge identifier.
pub type EdgeId = String;

/// Minimum Jaro-Winkler similarity for a node id to be offered as a suggestion.
const SUGGESTION_THRESHOLD: f64 = 0.8;

/// Location in the routing graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
}

impl Node {
    pub fn new(id: impl Into<NodeId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

/// Undirected connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Edge {
    pub id: EdgeId,
    pub u: NodeId,
    pub v: NodeId,
    pub distance_m: f64,
    pub features: EdgeFeatures,
}

impl Edge {
    pub fn new(
        id: impl Into<EdgeId>,
        u: impl Into<NodeId>,
        v: impl Into<NodeId>,
        distance_m: f64,
    ) -> Self {
        Self {
            id: id.into(),
            u: u.into(),
            v: v.into(),
            distance_m,
            features: EdgeFeatures::default(),
        }
    }

    pub fn with_features(mut self, features: EdgeFeatures) -> Self {
        self.features = features;
        self
    }

    /// Endpoint opposite to `node`, if `node` is one of the endpoints.
    pub fn other_end(&self, node: &str) -> Option<&str> {
        if self.u == node {
            Some(&self.v)
        } else if self.v == node {
            Some(&self.u)
        } else {
            None
        }
    }
}

/// Adjacency entry: neighbour and connecting edge, both as arena indices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Link {
    pub(crate) neighbour: usize,
    pub(crate) edge: usize,
}

/// Undirected routing graph.
///
/// Nodes and edges live in arenas; each adjacency entry refers to the shared
/// edge by index, so both directions see the same edge value. The graph is
/// immutable: pruning helpers return a new graph and leave `self` untouched.
#[derive(Debug, Clone, Default)]
pub struct Graph {
    nodes: Arc<Vec<Node>>,
    edges: Arc<Vec<Edge>>,
    node_index: Arc<HashMap<NodeId, usize>>,
    edge_index: Arc<HashMap<EdgeId, usize>>,
    adjacency: Arc<Vec<Vec<Link>>>,
}

/// Build a graph from node and edge records.
///
/// Edges referencing unknown nodes and self-loops are skipped with a warning.
/// Duplicate edge ids and invalid distances are rejected. When a node id is
/// repeated the first record wins.
pub fn build_graph(nodes: Vec<Node>, edges: Vec<Edge>) -> Result<Graph> {
    let mut node_index = HashMap::with_capacity(nodes.len());
    let mut node_arena = Vec::with_capacity(nodes.len());
    let mut duplicate_nodes = 0usize;
    for node in nodes {
        if node_index.contains_key(&node.id) {
            duplicate_nodes += 1;
            continue;
        }
        node_index.insert(node.id.clone(), node_arena.len());
        node_arena.push(node);
    }

    let mut adjacency: Vec<Vec<Link>> = vec![Vec::new(); node_arena.len()];
    let mut edge_index = HashMap::with_capacity(edges.len());
    let mut edge_arena = Vec::with_capacity(edges.len());
    let mut skipped_edges = 0usize;
    let mut self_loops = 0usize;

    for edge in edges {
        if !edge.distance_m.is_finite() || edge.distance_m < 0.0 {
            return Err(Error::InvalidDistance {
                id: edge.id,
                distance: edge.distance_m,
            });
        }
        if edge_index.contains_key(&edge.id) {
            return Err(Error::DuplicateEdgeId { id: edge.id });
        }
        let (Some(&u), Some(&v)) = (node_index.get(&edge.u), node_index.get(&edge.v)) else {
            skipped_edges += 1;
            continue;
        };
        if u == v {
            self_loops += 1;
            continue;
        }

        let slot = edge_arena.len();
        adjacency[u].push(Link {
            neighbour: v,
            edge: slot,
        });
        adjacency[v].push(Link {
            neighbour: u,
            edge: slot,
        });
        edge_index.insert(edge.id.clone(), slot);
        edge_arena.push(edge);
    }

    if duplicate_nodes > 0 {
        warn!(duplicate_nodes, "ignored repeated node ids");
    }
    if skipped_edges > 0 {
        warn!(skipped_edges, "ignored edges referencing unknown nodes");
    }
    if self_loops > 0 {
        warn!(self_loops, "ignored self-loop edges");
    }
    debug!(
        nodes = node_arena.len(),
        edges = edge_arena.len(),
        "built routing graph"
    );

    Ok(Graph {
        nodes: Arc::new(node_arena),
        edges: Arc::new(edge_arena),
        node_index: Arc::new(node_index),
        edge_index: Arc::new(edge_index),
        adjacency: Arc::new(adjacency),
    })
}

impl Graph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    pub fn contains_edge(&self, id: &str) -> bool {
        self.edge_index.contains_key(id)
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&index| &self.nodes[index])
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edge_index.get(id).map(|&index| &self.edges[index])
    }

    /// Nodes in load order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Edges in load order.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// Neighbours of `id` with the connecting edge, in adjacency order.
    pub fn neighbours<'a>(&'a self, id: &str) -> impl Iterator<Item = (&'a Node, &'a Edge)> + 'a {
        let links: &'a [Link] = self
            .node_index
            .get(id)
            .map(|&index| self.adjacency[index].as_slice())
            .unwrap_or(&[]);
        links
            .iter()
            .map(move |link| (&self.nodes[link.neighbour], &self.edges[link.edge]))
    }

    /// Return the node's arena index or an [`Error::UnknownNode`] with suggestions.
    pub(crate) fn require_node(&self, id: &str) -> Result<usize> {
        self.node_index
            .get(id)
            .copied()
            .ok_or_else(|| Error::UnknownNode {
                id: id.to_string(),
                suggestions: self.fuzzy_node_matches(id, 3),
            })
    }

    pub(crate) fn node_at(&self, index: usize) -> &Node {
        &self.nodes[index]
    }

    pub(crate) fn edge_at(&self, index: usize) -> &Edge {
        &self.edges[index]
    }

    pub(crate) fn links(&self, index: usize) -> &[Link] {
        &self.adjacency[index]
    }

    /// Node ids similar to `query`, best match first.
    pub fn fuzzy_node_matches(&self, query: &str, limit: usize) -> Vec<String> {
        let query = query.to_lowercase();
        let mut scored: Vec<(f64, &str)> = self
            .nodes
            .iter()
            .filter_map(|node| {
                let by_id = strsim::jaro_winkler(&query, &node.id.to_lowercase());
                let by_name = strsim::jaro_winkler(&query, &node.name.to_lowercase());
                let score = by_id.max(by_name);
                (score >= SUGGESTION_THRESHOLD).then_some((score, node.id.as_str()))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.cmp(b.1)));
        scored
            .into_iter()
            .take(limit)
            .map(|(_, id)| id.to_string())
            .collect()
    }

    /// New graph without the given nodes and every edge touching them.
    pub fn without_nodes(&self, avoided: &HashSet<NodeId>) -> Result<Graph> {
        if avoided.is_empty() {
            return Ok(self.clone());
        }
        self.filtered(
            |node| !avoided.contains(&node.id),
            |edge| !avoided.contains(&edge.u) && !avoided.contains(&edge.v),
        )
    }

    /// New graph without the given edges.
    pub fn without_edges(&self, avoided: &HashSet<EdgeId>) -> Result<Graph> {
        if avoided.is_empty() {
            return Ok(self.clone());
        }
        self.filtered(|_| true, |edge| !avoided.contains(&edge.id))
    }

    fn filtered(
        &self,
        keep_node: impl Fn(&Node) -> bool,
        keep_edge: impl Fn(&Edge) -> bool,
    ) -> Result<Graph> {
        let nodes = self.nodes.iter().filter(|n| keep_node(n)).cloned().collect();
        let edges = self.edges.iter().filter(|e| keep_edge(e)).cloned().collect();
        build_graph(nodes, edges)
    }
}
