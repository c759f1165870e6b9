//! Route planning strategies implementing the Strategy pattern.
//!
//! Distance and risk queries want the single best route; blended queries want
//! a ranked list of alternatives. Each behaviour lives in its own planner so
//! [`super::find_route`] only orchestrates.

use crate::constraints::stitch_route;
use crate::cost::{CostCriterion, CostMap};
use crate::error::Result;
use crate::graph::{Graph, NodeId};
use crate::k_shortest::k_shortest_paths;
use crate::path::{Exclusions, Path};

use super::RouteRequest;

/// Trait for route planning strategies.
pub trait RoutePlanner: Send + Sync {
    /// Short identifier used in logs and summaries.
    fn name(&self) -> &'static str;

    /// Find paths from `start` to `goal` through `waypoints`, best first.
    ///
    /// An empty vector means no route exists under the given costs.
    fn find_paths(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        waypoints: &[NodeId],
        costs: &CostMap,
        exclusions: &Exclusions,
    ) -> Result<Vec<Path>>;
}

/// Single best route, stitched through any waypoints.
#[derive(Debug, Clone, Copy, Default)]
pub struct BestPathPlanner;

impl RoutePlanner for BestPathPlanner {
    fn name(&self) -> &'static str {
        "best"
    }

    fn find_paths(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        waypoints: &[NodeId],
        costs: &CostMap,
        exclusions: &Exclusions,
    ) -> Result<Vec<Path>> {
        let result = stitch_route(graph, start, waypoints, goal, costs, exclusions)?;
        Ok(result.into_path().into_iter().collect())
    }
}

/// Up to `k` loopless alternatives in ascending cost.
///
/// Waypoint routes fall back to the single stitched route: alternatives are
/// enumerated only between the two endpoints.
#[derive(Debug, Clone, Copy)]
pub struct AlternativesPlanner {
    k: usize,
}

impl AlternativesPlanner {
    pub fn new(k: usize) -> Self {
        Self { k }
    }

    pub fn k(&self) -> usize {
        self.k
    }
}

impl RoutePlanner for AlternativesPlanner {
    fn name(&self) -> &'static str {
        "alternatives"
    }

    fn find_paths(
        &self,
        graph: &Graph,
        start: &str,
        goal: &str,
        waypoints: &[NodeId],
        costs: &CostMap,
        exclusions: &Exclusions,
    ) -> Result<Vec<Path>> {
        if !waypoints.is_empty() {
            tracing::debug!("waypoints present; returning the stitched route only");
            return BestPathPlanner.find_paths(graph, start, goal, waypoints, costs, exclusions);
        }
        k_shortest_paths(graph, start, goal, costs, exclusions, self.k)
    }
}

/// Select the appropriate planner for a given request.
pub fn select_planner(request: &RouteRequest) -> Box<dyn RoutePlanner> {
    match request.criterion {
        CostCriterion::Distance | CostCriterion::Risk => Box::new(BestPathPlanner),
        CostCriterion::Blended { .. } => Box::new(AlternativesPlanner::new(request.k)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn distance_and_risk_use_best_path_planner() {
        let request = RouteRequest::new("A", "B");
        assert_eq!(select_planner(&request).name(), "best");

        let request = RouteRequest::new("A", "B").with_criterion(CostCriterion::Risk);
        assert_eq!(select_planner(&request).name(), "best");
    }

    #[test]
    fn blended_uses_alternatives_planner() {
        let request = RouteRequest::new("A", "B")
            .with_criterion(CostCriterion::blended())
            .with_k(5);
        assert_eq!(select_planner(&request).name(), "alternatives");
    }
}
