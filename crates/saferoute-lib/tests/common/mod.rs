#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use saferoute_lib::{build_graph, load_graph, CostMap, DatasetPaths, Edge, Graph, Node};

pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../docs/fixtures")
}

pub fn fixture_graph() -> Graph {
    load_graph(&DatasetPaths::for_dir(&fixtures_dir())).expect("fixture dataset loads")
}

/// Build a graph from `(id, u, v, distance)` tuples; nodes are created on demand.
pub fn graph_from(edges: &[(&str, &str, &str, f64)], extra_nodes: &[&str]) -> Graph {
    let mut seen = HashSet::new();
    let mut nodes = Vec::new();
    let ids = edges
        .iter()
        .flat_map(|(_, u, v, _)| [*u, *v])
        .chain(extra_nodes.iter().copied());
    for id in ids {
        if seen.insert(id) {
            nodes.push(Node::new(id, id));
        }
    }
    let edges = edges
        .iter()
        .map(|(id, u, v, distance)| Edge::new(*id, *u, *v, *distance))
        .collect();
    build_graph(nodes, edges).expect("graph builds")
}

/// A–B (1), B–C (1), A–C (5).
pub fn triangle() -> Graph {
    graph_from(
        &[("ab", "A", "B", 1.0), ("bc", "B", "C", 1.0), ("ac", "A", "C", 5.0)],
        &[],
    )
}

/// Cost map using each edge's distance as its cost.
pub fn distance_costs(graph: &Graph) -> CostMap {
    CostMap::try_from_iter(
        graph
            .edges()
            .iter()
            .map(|edge| (edge.id.clone(), edge.distance_m)),
    )
    .expect("distances are valid costs")
}

/// Small deterministic generator for randomised graph checks.
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed)
    }

    pub fn next(&mut self) -> u64 {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        self.0 >> 33
    }
}

/// Random simple graph on `n` nodes with integer distances in `1..=9`.
pub fn random_graph(rng: &mut Lcg, n: usize) -> Graph {
    random_edges(rng, n, false)
}

/// Like [`random_graph`], but roughly a third of the links get a second,
/// parallel edge stored in the opposite direction.
pub fn random_multigraph(rng: &mut Lcg, n: usize) -> Graph {
    random_edges(rng, n, true)
}

fn random_edges(rng: &mut Lcg, n: usize, parallel: bool) -> Graph {
    let nodes: Vec<Node> = (0..n)
        .map(|i| Node::new(format!("n{i}"), format!("Node {i}")))
        .collect();
    let mut edges = Vec::new();
    for i in 0..n {
        for j in (i + 1)..n {
            if rng.next() % 2 == 0 {
                let distance = (1 + rng.next() % 9) as f64;
                edges.push(Edge::new(
                    format!("n{i}-n{j}"),
                    format!("n{i}"),
                    format!("n{j}"),
                    distance,
                ));
                if parallel && rng.next() % 3 == 0 {
                    let distance = (1 + rng.next() % 9) as f64;
                    edges.push(Edge::new(
                        format!("n{i}-n{j}-alt"),
                        format!("n{j}"),
                        format!("n{i}"),
                        distance,
                    ));
                }
            }
        }
    }
    build_graph(nodes, edges).expect("graph builds")
}

/// Costs of every simple path from `start` to `goal`, ascending. Paths over
/// different parallel edges count separately.
pub fn all_simple_path_costs(graph: &Graph, costs: &CostMap, start: &str, goal: &str) -> Vec<f64> {
    let mut out: Vec<f64> = simple_paths(graph, costs, start, goal)
        .into_iter()
        .map(|(_, cost)| cost)
        .collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

/// Cheapest cost of each distinct simple node sequence from `start` to
/// `goal`, ascending.
pub fn distinct_sequence_costs(graph: &Graph, costs: &CostMap, start: &str, goal: &str) -> Vec<f64> {
    let mut best: HashMap<Vec<String>, f64> = HashMap::new();
    for (nodes, cost) in simple_paths(graph, costs, start, goal) {
        let entry = best.entry(nodes).or_insert(f64::INFINITY);
        *entry = entry.min(cost);
    }
    let mut out: Vec<f64> = best.into_values().collect();
    out.sort_by(|a, b| a.total_cmp(b));
    out
}

fn simple_paths(graph: &Graph, costs: &CostMap, start: &str, goal: &str) -> Vec<(Vec<String>, f64)> {
    fn walk(
        graph: &Graph,
        costs: &CostMap,
        current: &str,
        goal: &str,
        visited: &mut Vec<String>,
        cost: f64,
        out: &mut Vec<(Vec<String>, f64)>,
    ) {
        if current == goal {
            out.push((visited.clone(), cost));
            return;
        }
        let next: Vec<(String, String)> = graph
            .neighbours(current)
            .map(|(node, edge)| (node.id.clone(), edge.id.clone()))
            .collect();
        for (node, edge) in next {
            if visited.contains(&node) {
                continue;
            }
            visited.push(node.clone());
            walk(graph, costs, &node, goal, visited, cost + costs.cost(&edge), out);
            visited.pop();
        }
    }

    let mut out = Vec::new();
    let mut visited = vec![start.to_string()];
    walk(graph, costs, start, goal, &mut visited, 0.0, &mut out);
    out
}
