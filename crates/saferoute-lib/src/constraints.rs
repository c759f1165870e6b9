//! Avoidance constraints and must-pass stitching.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::cost::CostMap;
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::path::{shortest_path, Exclusions, Path, SearchResult};

/// Constraint conflict that was corrected before searching.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Adjustment {
    /// The start or goal was listed as avoided; the avoidance was dropped.
    EndpointNotAvoided { node: NodeId },
    /// A waypoint was also avoided; the waypoint was dropped.
    AvoidedWaypointDropped { node: NodeId },
    /// A waypoint repeated the start, goal, or the previous waypoint.
    RedundantWaypointDropped { node: NodeId },
}

/// Caller constraints for one routing query.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConstraintSet {
    pub avoid_nodes: HashSet<NodeId>,
    pub avoid_edges: HashSet<EdgeId>,
    pub must_pass: Vec<NodeId>,
}

impl ConstraintSet {
    /// Check that every referenced node and edge exists in `graph`.
    pub fn validate(&self, graph: &Graph) -> Result<()> {
        for id in self.must_pass.iter().chain(self.avoid_nodes.iter()) {
            graph.require_node(id)?;
        }
        for id in &self.avoid_edges {
            if !graph.contains_edge(id) {
                return Err(Error::UnknownEdge { id: id.clone() });
            }
        }
        Ok(())
    }

    /// Resolve conflicts with the chosen endpoints.
    ///
    /// The start and goal always win over avoidance. Waypoints that are
    /// avoided, or that merely repeat an endpoint or the previous waypoint,
    /// are dropped. Every change is logged and returned.
    pub fn reconcile(&mut self, start: &str, goal: &str) -> Vec<Adjustment> {
        let mut adjustments = Vec::new();

        for endpoint in [start, goal] {
            if self.avoid_nodes.remove(endpoint) {
                warn!(node = endpoint, "ignoring avoidance of route endpoint");
                adjustments.push(Adjustment::EndpointNotAvoided {
                    node: endpoint.to_string(),
                });
            }
        }

        let mut kept: Vec<NodeId> = Vec::with_capacity(self.must_pass.len());
        for waypoint in self.must_pass.drain(..) {
            if self.avoid_nodes.contains(&waypoint) {
                warn!(node = %waypoint, "dropping waypoint that is also avoided");
                adjustments.push(Adjustment::AvoidedWaypointDropped { node: waypoint });
                continue;
            }
            let previous = kept.last().map(String::as_str).unwrap_or(start);
            if waypoint == previous {
                warn!(node = %waypoint, "dropping redundant waypoint");
                adjustments.push(Adjustment::RedundantWaypointDropped { node: waypoint });
                continue;
            }
            kept.push(waypoint);
        }
        // Only a trailing goal is redundant.
        if kept.last().map(String::as_str) == Some(goal) {
            if let Some(waypoint) = kept.pop() {
                warn!(node = %waypoint, "dropping redundant waypoint");
                adjustments.push(Adjustment::RedundantWaypointDropped { node: waypoint });
            }
        }
        self.must_pass = kept;

        adjustments
    }

    /// Graph with avoided nodes and edges removed.
    pub fn prune(&self, graph: &Graph) -> Result<Graph> {
        graph
            .without_nodes(&self.avoid_nodes)?
            .without_edges(&self.avoid_edges)
    }
}

/// Shortest route from `start` to `goal` passing `waypoints` in order.
///
/// Each leg runs [`shortest_path`] with the same cost map and exclusions.
/// Junction nodes appear once and costs add up. If any leg is unreachable the
/// whole route is [`SearchResult::Unreachable`]; partial routes are never
/// returned. Legs are searched independently, so a node may recur across legs.
pub fn stitch_route(
    graph: &Graph,
    start: &str,
    waypoints: &[NodeId],
    goal: &str,
    costs: &CostMap,
    exclusions: &Exclusions,
) -> Result<SearchResult> {
    let stops: Vec<&str> = std::iter::once(start)
        .chain(waypoints.iter().map(String::as_str))
        .chain(std::iter::once(goal))
        .collect();

    let mut route = Path::trivial(start);
    for leg in stops.windows(2) {
        let Some(segment) = shortest_path(graph, leg[0], leg[1], costs, exclusions)?.into_path()
        else {
            return Ok(SearchResult::Unreachable);
        };
        route.nodes.extend(segment.nodes.into_iter().skip(1));
        route.edges.extend(segment.edges);
        route.cost += segment.cost;
    }

    Ok(SearchResult::Found(route))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{build_graph, Edge, Node};

    fn set(avoid: &[&str], via: &[&str]) -> ConstraintSet {
        ConstraintSet {
            avoid_nodes: avoid.iter().map(|s| s.to_string()).collect(),
            avoid_edges: HashSet::new(),
            must_pass: via.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn endpoints_override_avoidance() {
        let mut constraints = set(&["A", "C", "Z"], &[]);
        let adjustments = constraints.reconcile("A", "Z");

        assert_eq!(
            constraints.avoid_nodes,
            HashSet::from(["C".to_string()])
        );
        assert_eq!(adjustments.len(), 2);
        assert!(adjustments.contains(&Adjustment::EndpointNotAvoided {
            node: "A".to_string()
        }));
    }

    #[test]
    fn avoided_and_redundant_waypoints_are_dropped() {
        let mut constraints = set(&["C"], &["A", "B", "B", "C", "D", "Z"]);
        let adjustments = constraints.reconcile("A", "Z");

        assert_eq!(constraints.must_pass, vec!["B".to_string(), "D".to_string()]);
        assert_eq!(
            adjustments,
            vec![
                Adjustment::RedundantWaypointDropped { node: "A".to_string() },
                Adjustment::RedundantWaypointDropped { node: "B".to_string() },
                Adjustment::AvoidedWaypointDropped { node: "C".to_string() },
                Adjustment::RedundantWaypointDropped { node: "Z".to_string() },
            ]
        );
    }

    #[test]
    fn goal_is_kept_as_an_intermediate_waypoint() {
        let mut constraints = set(&[], &["Z", "X"]);
        let adjustments = constraints.reconcile("A", "Z");

        assert_eq!(constraints.must_pass, vec!["Z".to_string(), "X".to_string()]);
        assert!(adjustments.is_empty());
    }

    #[test]
    fn trailing_goal_is_dropped_after_an_intermediate_visit() {
        let mut constraints = set(&[], &["Z", "X", "Z"]);
        let adjustments = constraints.reconcile("A", "Z");

        assert_eq!(constraints.must_pass, vec!["Z".to_string(), "X".to_string()]);
        assert_eq!(
            adjustments,
            vec![Adjustment::RedundantWaypointDropped { node: "Z".to_string() }]
        );
    }

    #[test]
    fn prune_removes_avoided_nodes_and_edges() {
        let graph = build_graph(
            vec![
                Node::new("A", "A"),
                Node::new("B", "B"),
                Node::new("C", "C"),
            ],
            vec![
                Edge::new("ab", "A", "B", 1.0),
                Edge::new("bc", "B", "C", 1.0),
                Edge::new("ac", "A", "C", 5.0),
            ],
        )
        .expect("valid graph");
        let mut constraints = set(&["B"], &[]);
        constraints.avoid_edges.insert("ac".to_string());

        let pruned = constraints.prune(&graph).expect("prune succeeds");
        assert!(!pruned.contains_node("B"));
        assert_eq!(pruned.edge_count(), 0);
        assert_eq!(graph.edge_count(), 3);
    }
}
