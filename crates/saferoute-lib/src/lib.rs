//! saferoute library entry points.
//!
//! This crate loads a routing graph, turns edge attributes into per-edge
//! costs (distance, risk, or a blend of both), and runs shortest-path and
//! K-shortest loopless path searches with avoidance and must-pass
//! constraints. Higher-level consumers (the CLI) should only depend on the
//! functions exported here instead of reimplementing behavior.
//!

#![deny(warnings)]

pub mod constraints;
pub mod cost;
pub mod dataset;
pub mod error;
pub mod features;
pub mod graph;
pub mod k_shortest;
pub mod output;
pub mod path;
pub mod routing;
pub mod scoring;

pub use constraints::{stitch_route, Adjustment, ConstraintSet};
pub use cost::{CostCriterion, CostMap, CostModel, DEFAULT_BLEND_COEFFICIENT, MISSING_EDGE_COST};
pub use dataset::{default_dataset_dir, load_graph, parse_graph, resolve_dataset, DatasetPaths};
pub use error::{Error, Result};
pub use features::{EdgeFeatures, FeatureReadings, TimeSlot, TravelMode};
pub use graph::{build_graph, Edge, EdgeId, Graph, Node, NodeId};
pub use k_shortest::k_shortest_paths;
pub use output::{ComparisonSummary, OptionSummary, RouteRenderMode, RouteStop, RouteSummary};
pub use path::{shortest_path, Exclusions, Path, SearchResult};
pub use routing::{
    compare_routes, find_route, RouteComparison, RouteLeg, RouteOption, RouteOutcome, RoutePlan,
    RouteRequest, DEFAULT_K,
};
pub use scoring::{
    EdgeScorer, Feature, FeatureContribution, FeatureOverride, OverrideOp, SafetyScorer, Score,
    ScoringProfile,
};
