//! Route planning entry point.
//!
//! This module provides:
//! - [`RouteRequest`] - High-level routing query (endpoints, criterion, constraints, k)
//! - [`RoutePlan`] - Ranked route options with per-leg details
//! - [`RouteOutcome`] - Found plan or structured "no path" result
//! - [`find_route`] - Main entry point for computing routes
//! - [`compare_routes`] - Shortest, safest and balanced routes for one query
//!
//! # Strategy Pattern
//!
//! Single-route and alternative-route behaviour are encapsulated in
//! [`RoutePlanner`] implementations, selected from the request criterion.
//!
//! # Example
//!
//! ```ignore
//! use saferoute_lib::{find_route, load_graph, resolve_dataset, RouteRequest, SafetyScorer};
//!
//! let graph = load_graph(&resolve_dataset(None)?)?;
//! let request = RouteRequest::new("station", "library").avoid_node("park");
//! let outcome = find_route(&graph, &request, &SafetyScorer)?;
//! ```

mod planner;

pub use planner::{select_planner, AlternativesPlanner, BestPathPlanner, RoutePlanner};

use serde::Serialize;
use tracing::debug;

use crate::constraints::{Adjustment, ConstraintSet};
use crate::cost::{CostCriterion, CostModel};
use crate::error::{Error, Result};
use crate::graph::{EdgeId, Graph, NodeId};
use crate::path::{Exclusions, Path};
use crate::scoring::{EdgeScorer, ScoringProfile};

/// Number of alternatives requested when the caller does not choose.
pub const DEFAULT_K: usize = 3;

/// High-level route planning request.
#[derive(Debug, Clone, PartialEq)]
pub struct RouteRequest {
    pub start: NodeId,
    pub goal: NodeId,
    pub criterion: CostCriterion,
    pub profile: ScoringProfile,
    pub constraints: ConstraintSet,
    /// Maximum number of alternatives for blended queries; must be at least 1.
    pub k: usize,
}

impl RouteRequest {
    /// Distance-optimised request without constraints.
    pub fn new(start: impl Into<NodeId>, goal: impl Into<NodeId>) -> Self {
        Self {
            start: start.into(),
            goal: goal.into(),
            criterion: CostCriterion::Distance,
            profile: ScoringProfile::default(),
            constraints: ConstraintSet::default(),
            k: DEFAULT_K,
        }
    }

    pub fn with_criterion(mut self, criterion: CostCriterion) -> Self {
        self.criterion = criterion;
        self
    }

    pub fn with_profile(mut self, profile: ScoringProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_k(mut self, k: usize) -> Self {
        self.k = k;
        self
    }

    pub fn avoid_node(mut self, id: impl Into<NodeId>) -> Self {
        self.constraints.avoid_nodes.insert(id.into());
        self
    }

    pub fn avoid_edge(mut self, id: impl Into<EdgeId>) -> Self {
        self.constraints.avoid_edges.insert(id.into());
        self
    }

    pub fn via(mut self, id: impl Into<NodeId>) -> Self {
        self.constraints.must_pass.push(id.into());
        self
    }
}

/// Traversal of one edge within a route option.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteLeg {
    pub edge: EdgeId,
    pub from: NodeId,
    pub to: NodeId,
    pub distance_m: f64,
    /// Cost under the query criterion.
    pub cost: f64,
    /// Scorer cost, absent for distance queries.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,
}

/// One ranked route with derived totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteOption {
    pub path: Path,
    pub distance_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,
    pub legs: Vec<RouteLeg>,
}

impl RouteOption {
    fn from_path(graph: &Graph, model: &CostModel, path: Path) -> Self {
        let legs: Vec<RouteLeg> = path
            .edges
            .iter()
            .zip(path.nodes.windows(2))
            .map(|(edge_id, pair)| RouteLeg {
                edge: edge_id.clone(),
                from: pair[0].clone(),
                to: pair[1].clone(),
                distance_m: graph.edge(edge_id).map_or(0.0, |edge| edge.distance_m),
                cost: model.costs.cost(edge_id),
                risk: model.risk_total(std::iter::once(edge_id)),
            })
            .collect();

        Self {
            distance_m: path.distance_m(graph),
            risk: model.risk_total(&path.edges),
            legs,
            path,
        }
    }

    /// Number of edges traversed.
    pub fn hop_count(&self) -> usize {
        self.path.hop_count()
    }
}

/// Planned routes returned by the library, best first.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoutePlan {
    pub criterion: CostCriterion,
    pub start: NodeId,
    pub goal: NodeId,
    pub options: Vec<RouteOption>,
    /// Constraint conflicts corrected before searching.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Adjustment>,
}

impl RoutePlan {
    /// Best route of the plan.
    pub fn best(&self) -> Option<&RouteOption> {
        self.options.first()
    }
}

/// Result of a routing query.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RouteOutcome {
    Found(RoutePlan),
    /// No route satisfies the constraints.
    NoPath {
        start: NodeId,
        goal: NodeId,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        adjustments: Vec<Adjustment>,
    },
}

impl RouteOutcome {
    pub fn plan(&self) -> Option<&RoutePlan> {
        match self {
            RouteOutcome::Found(plan) => Some(plan),
            RouteOutcome::NoPath { .. } => None,
        }
    }

    pub fn is_found(&self) -> bool {
        self.plan().is_some()
    }
}

/// Compute routes for a request.
///
/// This is the main entry point for route planning. It:
/// 1. Validates `k`, the endpoints, and every constraint reference
/// 2. Reconciles constraint conflicts (endpoints win over avoidance)
/// 3. Prunes avoided nodes and edges into a new graph
/// 4. Builds the cost map for the request criterion
/// 5. Runs the planner selected for the criterion
///
/// Invalid input is an error; an unreachable goal is [`RouteOutcome::NoPath`].
pub fn find_route(
    graph: &Graph,
    request: &RouteRequest,
    scorer: &dyn EdgeScorer,
) -> Result<RouteOutcome> {
    // Step 1: Validate input
    if request.k == 0 {
        return Err(Error::InvalidK { k: request.k });
    }
    graph.require_node(&request.start)?;
    graph.require_node(&request.goal)?;
    request.constraints.validate(graph)?;

    // Step 2: Reconcile constraint conflicts
    let mut constraints = request.constraints.clone();
    let adjustments = constraints.reconcile(&request.start, &request.goal);

    // Step 3: Prune the graph
    let pruned = constraints.prune(graph)?;

    // Step 4: Build the cost map
    let model = CostModel::build(&pruned, request.criterion, &request.profile, scorer)?;

    // Step 5: Execute the planner
    let planner = select_planner(request);
    let paths = planner.find_paths(
        &pruned,
        &request.start,
        &request.goal,
        &constraints.must_pass,
        &model.costs,
        &Exclusions::new(),
    )?;

    debug!(
        planner = planner.name(),
        criterion = %request.criterion,
        found = paths.len(),
        "route planning finished"
    );

    if paths.is_empty() {
        return Ok(RouteOutcome::NoPath {
            start: request.start.clone(),
            goal: request.goal.clone(),
            adjustments,
        });
    }

    let options = paths
        .into_iter()
        .map(|path| RouteOption::from_path(graph, &model, path))
        .collect();

    Ok(RouteOutcome::Found(RoutePlan {
        criterion: request.criterion,
        start: request.start.clone(),
        goal: request.goal.clone(),
        options,
        adjustments,
    }))
}

/// Routes for one query under each cost criterion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RouteComparison {
    /// Best route by distance.
    pub shortest: RouteOutcome,
    /// Best route by scorer risk.
    pub safest: RouteOutcome,
    /// Top alternatives under the blended criterion.
    pub balanced: RouteOutcome,
}

/// Run `request` once per criterion over the same graph and constraints.
///
/// The request's own criterion is ignored except for a blended coefficient,
/// which the balanced run reuses. `k` only applies to the balanced run.
pub fn compare_routes(
    graph: &Graph,
    request: &RouteRequest,
    scorer: &dyn EdgeScorer,
) -> Result<RouteComparison> {
    let blended = match request.criterion {
        CostCriterion::Blended { .. } => request.criterion,
        _ => CostCriterion::blended(),
    };
    let run = |criterion| find_route(graph, &request.clone().with_criterion(criterion), scorer);

    Ok(RouteComparison {
        shortest: run(CostCriterion::Distance)?,
        safest: run(CostCriterion::Risk)?,
        balanced: run(blended)?,
    })
}
