use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashSet};

use serde::Serialize;

use crate::cost::CostMap;
use crate::error::Result;
use crate::graph::{EdgeId, Graph, NodeId};

/// Simple path through the graph.
///
/// `edges[i]` connects `nodes[i]` and `nodes[i + 1]`; `cost` is the sum of the
/// edge costs under the cost map the path was found with.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Path {
    pub nodes: Vec<NodeId>,
    pub edges: Vec<EdgeId>,
    pub cost: f64,
}

impl Path {
    /// Zero-cost path consisting of a single node.
    pub fn trivial(node: impl Into<NodeId>) -> Self {
        Self {
            nodes: vec![node.into()],
            edges: Vec::new(),
            cost: 0.0,
        }
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.edges.len()
    }

    /// `true` when no node repeats.
    pub fn is_simple(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.nodes.len());
        self.nodes.iter().all(|node| seen.insert(node))
    }

    /// Total distance in metres of the path's edges.
    pub fn distance_m(&self, graph: &Graph) -> f64 {
        self.edges
            .iter()
            .filter_map(|id| graph.edge(id))
            .map(|edge| edge.distance_m)
            .sum()
    }
}

/// Outcome of a single-pair search.
#[derive(Debug, Clone, PartialEq)]
pub enum SearchResult {
    Found(Path),
    /// The goal cannot be reached from the start.
    Unreachable,
}

impl SearchResult {
    pub fn is_found(&self) -> bool {
        matches!(self, SearchResult::Found(_))
    }

    pub fn path(&self) -> Option<&Path> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::Unreachable => None,
        }
    }

    pub fn into_path(self) -> Option<Path> {
        match self {
            SearchResult::Found(path) => Some(path),
            SearchResult::Unreachable => None,
        }
    }

    /// Path cost, or infinity when unreachable.
    pub fn cost(&self) -> f64 {
        self.path().map_or(f64::INFINITY, |path| path.cost)
    }

    /// Path nodes, empty when unreachable.
    pub fn nodes(&self) -> &[NodeId] {
        self.path().map_or(&[], |path| path.nodes.as_slice())
    }

    /// Path edges, empty when unreachable.
    pub fn edges(&self) -> &[EdgeId] {
        self.path().map_or(&[], |path| path.edges.as_slice())
    }
}

/// Per-query set of nodes and edges a search must not use.
///
/// Owned by the caller and consulted in O(1) for every relaxed edge, so a
/// restricted view of the graph never requires copying it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Exclusions {
    pub nodes: HashSet<NodeId>,
    pub edges: HashSet<EdgeId>,
    /// Unordered node pairs; every edge joining the pair is blocked.
    pub links: HashSet<(NodeId, NodeId)>,
}

impl Exclusions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn block_node(&mut self, id: impl Into<NodeId>) {
        self.nodes.insert(id.into());
    }

    pub fn block_edge(&mut self, id: impl Into<EdgeId>) {
        self.edges.insert(id.into());
    }

    /// Block every edge between `a` and `b`, in either direction.
    pub fn block_link(&mut self, a: impl Into<NodeId>, b: impl Into<NodeId>) {
        self.links.insert(link_key(a.into(), b.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty() && self.links.is_empty()
    }

    fn allows(&self, from: &str, to: &str, edge: &str) -> bool {
        if self.nodes.contains(to) || self.edges.contains(edge) {
            return false;
        }
        self.links.is_empty() || !self.links.contains(&link_key(from.to_string(), to.to_string()))
    }
}

fn link_key(a: NodeId, b: NodeId) -> (NodeId, NodeId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Run Dijkstra's algorithm from `start` to `goal`.
///
/// Each node is finalized at most once; its distance and predecessor edge do
/// not change afterwards. Equal tentative costs are popped in discovery order.
/// Edges with an infinite cost are impassable, and edges without a cost-map
/// entry cost [`crate::MISSING_EDGE_COST`]. Blocked nodes and edges in
/// `exclusions` are never traversed; the start node itself is exempt.
///
/// Unknown `start` or `goal` ids are a caller error. An unreachable goal is
/// reported as [`SearchResult::Unreachable`].
pub fn shortest_path(
    graph: &Graph,
    start: &str,
    goal: &str,
    costs: &CostMap,
    exclusions: &Exclusions,
) -> Result<SearchResult> {
    let start_index = graph.require_node(start)?;
    let goal_index = graph.require_node(goal)?;

    if start_index == goal_index {
        return Ok(SearchResult::Found(Path::trivial(start)));
    }

    let node_count = graph.node_count();
    let mut distances = vec![f64::INFINITY; node_count];
    let mut parents: Vec<Option<Parent>> = vec![None; node_count];
    let mut finalized = vec![false; node_count];
    let mut queue = BinaryHeap::new();
    let mut sequence = 0u64;

    distances[start_index] = 0.0;
    queue.push(QueueEntry::new(start_index, 0.0, sequence));

    while let Some(entry) = queue.pop() {
        let current = entry.node;
        if finalized[current] {
            continue;
        }
        finalized[current] = true;

        if current == goal_index {
            return Ok(SearchResult::Found(reconstruct_path(
                graph,
                &parents,
                start_index,
                goal_index,
                distances[goal_index],
            )));
        }

        let current_distance = distances[current];
        for link in graph.links(current) {
            let next = link.neighbour;
            if finalized[next] {
                continue;
            }

            let edge = graph.edge_at(link.edge);
            let (from, to) = (&graph.node_at(current).id, &graph.node_at(next).id);
            if !exclusions.allows(from, to, &edge.id) {
                continue;
            }

            let weight = costs.cost(&edge.id);
            if weight.is_infinite() {
                continue;
            }

            let next_cost = current_distance + weight;
            if next_cost < distances[next] {
                distances[next] = next_cost;
                parents[next] = Some(Parent {
                    node: current,
                    edge: link.edge,
                });
                sequence += 1;
                queue.push(QueueEntry::new(next, next_cost, sequence));
            }
        }
    }

    Ok(SearchResult::Unreachable)
}

#[derive(Debug, Clone, Copy)]
struct Parent {
    node: usize,
    edge: usize,
}

fn reconstruct_path(
    graph: &Graph,
    parents: &[Option<Parent>],
    start: usize,
    goal: usize,
    cost: f64,
) -> Path {
    let mut nodes = vec![graph.node_at(goal).id.clone()];
    let mut edges = Vec::new();
    let mut current = goal;
    while current != start {
        let Some(parent) = parents[current] else {
            break;
        };
        edges.push(graph.edge_at(parent.edge).id.clone());
        nodes.push(graph.node_at(parent.node).id.clone());
        current = parent.node;
    }
    nodes.reverse();
    edges.reverse();
    Path { nodes, edges, cost }
}

#[derive(Copy, Clone, Debug, Default)]
struct FloatOrd(f64);

impl PartialEq for FloatOrd {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FloatOrd {}

impl PartialOrd for FloatOrd {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FloatOrd {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct QueueEntry {
    node: usize,
    cost: FloatOrd,
    sequence: u64,
}

impl QueueEntry {
    fn new(node: usize, cost: f64, sequence: u64) -> Self {
        Self {
            node,
            cost: FloatOrd(cost),
            sequence,
        }
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse ordering so BinaryHeap becomes a min-heap by cost, then by
        // discovery sequence.
        other
            .cost
            .cmp(&self.cost)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
