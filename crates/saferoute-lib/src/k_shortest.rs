//! Loopless K-shortest path enumeration (Yen's algorithm).
//!
//! Each spur search runs on its own [`Exclusions`] value derived from the
//! caller's base exclusions, so blocked links never leak from one spur index
//! to the next and the graph itself is never copied.
//!
//! Paths are distinguished by node sequence. The spur step therefore blocks
//! the whole link to the next node of each accepted path sharing the root,
//! including any parallel edges, not just the edge that path used.
//!
//! Root-path nodes before the spur node are blocked outright, so a spur can
//! never revisit its root and every candidate stays loopless.

use tracing::debug;

use crate::cost::CostMap;
use crate::error::{Error, Result};
use crate::graph::Graph;
use crate::path::{shortest_path, Exclusions, Path};

/// Enumerate up to `k` loopless paths from `start` to `goal` in ascending cost.
///
/// The first entry is the [`shortest_path`] result. Fewer than `k` paths are
/// returned when the candidate pool runs dry; an empty vector means the goal is
/// unreachable. `k == 0` is rejected.
pub fn k_shortest_paths(
    graph: &Graph,
    start: &str,
    goal: &str,
    costs: &CostMap,
    base: &Exclusions,
    k: usize,
) -> Result<Vec<Path>> {
    if k == 0 {
        return Err(Error::InvalidK { k });
    }

    let Some(first) = shortest_path(graph, start, goal, costs, base)?.into_path() else {
        return Ok(Vec::new());
    };

    let mut accepted = vec![first];
    let mut candidates = CandidatePool::default();

    while accepted.len() < k {
        let Some(previous) = accepted.last() else {
            break;
        };

        for spur_index in 0..previous.nodes.len().saturating_sub(1) {
            let root_nodes = &previous.nodes[..=spur_index];
            let spur_node = &previous.nodes[spur_index];

            let mut exclusions = base.clone();
            for path in &accepted {
                if path.nodes.len() > spur_index + 1 && path.nodes[..=spur_index] == *root_nodes {
                    exclusions.block_link(
                        path.nodes[spur_index].clone(),
                        path.nodes[spur_index + 1].clone(),
                    );
                }
            }
            for node in &root_nodes[..spur_index] {
                exclusions.block_node(node.clone());
            }

            let Some(spur) = shortest_path(graph, spur_node, goal, costs, &exclusions)?.into_path()
            else {
                continue;
            };

            let mut nodes = root_nodes[..spur_index].to_vec();
            nodes.extend(spur.nodes);
            let mut edges = previous.edges[..spur_index].to_vec();
            edges.extend(spur.edges);
            let cost = costs.total(&edges);

            let candidate = Path { nodes, edges, cost };
            if !accepted.iter().any(|path| path.nodes == candidate.nodes) {
                candidates.insert(candidate);
            }
        }

        let Some(next) = candidates.pop_cheapest() else {
            break;
        };
        accepted.push(next);
    }

    debug!(
        requested = k,
        found = accepted.len(),
        pending = candidates.len(),
        "k-shortest enumeration finished"
    );

    Ok(accepted)
}

/// Candidate paths awaiting acceptance, deduplicated by node sequence.
#[derive(Debug, Default)]
struct CandidatePool {
    paths: Vec<Path>,
}

impl CandidatePool {
    /// Add a candidate. A repeated node sequence only replaces the stored
    /// candidate when it is cheaper.
    fn insert(&mut self, candidate: Path) -> bool {
        if let Some(existing) = self
            .paths
            .iter_mut()
            .find(|path| path.nodes == candidate.nodes)
        {
            if candidate.cost < existing.cost {
                *existing = candidate;
            }
            return false;
        }
        self.paths.push(candidate);
        true
    }

    /// Remove the cheapest candidate; ties go to the earliest inserted.
    fn pop_cheapest(&mut self) -> Option<Path> {
        let (position, _) = self
            .paths
            .iter()
            .enumerate()
            .min_by(|(ia, a), (ib, b)| a.cost.total_cmp(&b.cost).then(ia.cmp(ib)))?;
        Some(self.paths.remove(position))
    }

    fn len(&self) -> usize {
        self.paths.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn path(nodes: &[&str], cost: f64) -> Path {
        Path {
            nodes: nodes.iter().map(|n| n.to_string()).collect(),
            edges: Vec::new(),
            cost,
        }
    }

    #[test]
    fn pool_rejects_duplicate_node_sequences() {
        let mut pool = CandidatePool::default();
        assert!(pool.insert(path(&["A", "B"], 2.0)));
        assert!(!pool.insert(path(&["A", "B"], 3.0)));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pop_cheapest().map(|p| p.cost), Some(2.0));
    }

    #[test]
    fn pool_keeps_the_cheaper_duplicate() {
        let mut pool = CandidatePool::default();
        assert!(pool.insert(path(&["A", "B"], 2.0)));
        assert!(!pool.insert(path(&["A", "B"], 1.0)));
        assert_eq!(pool.len(), 1);
        assert_eq!(pool.pop_cheapest().map(|p| p.cost), Some(1.0));
    }

    #[test]
    fn pool_pops_cheapest_then_oldest() {
        let mut pool = CandidatePool::default();
        pool.insert(path(&["A", "X", "B"], 3.0));
        pool.insert(path(&["A", "Y", "B"], 1.0));
        pool.insert(path(&["A", "Z", "B"], 1.0));

        assert_eq!(pool.pop_cheapest().unwrap().nodes[1], "Y");
        assert_eq!(pool.pop_cheapest().unwrap().nodes[1], "Z");
        assert_eq!(pool.pop_cheapest().unwrap().nodes[1], "X");
        assert!(pool.pop_cheapest().is_none());
    }
}
