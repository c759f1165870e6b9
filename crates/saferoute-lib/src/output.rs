use std::fmt::Write;

use serde::Serialize;

use crate::constraints::Adjustment;
use crate::cost::CostCriterion;
use crate::graph::{Graph, NodeId};
use crate::routing::{RouteComparison, RouteLeg, RouteOption, RouteOutcome};

/// Presentation style for turning a [`RouteSummary`] into text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteRenderMode {
    PlainText,
    RichText,
}

/// Endpoint or stop within a summarised route.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct RouteStop {
    pub id: NodeId,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl RouteStop {
    fn resolve(graph: &Graph, id: &str) -> Self {
        Self {
            id: id.to_string(),
            name: graph.node(id).map(|node| node.name.clone()),
        }
    }

    fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<unknown>")
    }
}

/// One ranked option within a summary.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct OptionSummary {
    pub rank: usize,
    pub cost: f64,
    pub distance_m: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<f64>,
    pub hops: usize,
    pub stops: Vec<RouteStop>,
    pub edges: Vec<String>,
    pub legs: Vec<RouteLeg>,
}

/// Structured representation of a routing outcome that consumers can serialise.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct RouteSummary {
    pub found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub criterion: Option<CostCriterion>,
    pub start: RouteStop,
    pub goal: RouteStop,
    pub options: Vec<OptionSummary>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub adjustments: Vec<Adjustment>,
}

impl RouteSummary {
    /// Convert a [`RouteOutcome`] into a summary with resolved node names.
    pub fn from_outcome(graph: &Graph, outcome: &RouteOutcome) -> Self {
        match outcome {
            RouteOutcome::Found(plan) => Self {
                found: true,
                criterion: Some(plan.criterion),
                start: RouteStop::resolve(graph, &plan.start),
                goal: RouteStop::resolve(graph, &plan.goal),
                options: plan
                    .options
                    .iter()
                    .enumerate()
                    .map(|(index, option)| summarise_option(graph, index + 1, option))
                    .collect(),
                adjustments: plan.adjustments.clone(),
            },
            RouteOutcome::NoPath {
                start,
                goal,
                adjustments,
            } => Self {
                found: false,
                criterion: None,
                start: RouteStop::resolve(graph, start),
                goal: RouteStop::resolve(graph, goal),
                options: Vec::new(),
                adjustments: adjustments.clone(),
            },
        }
    }

    /// Render the summary using the requested textual mode.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        match mode {
            RouteRenderMode::PlainText => self.render_plain(),
            RouteRenderMode::RichText => self.render_rich(),
        }
    }

    fn render_plain(&self) -> String {
        let mut buffer = String::new();
        if !self.found {
            let _ = writeln!(
                buffer,
                "No route found between {} and {}.",
                self.start.display_name(),
                self.goal.display_name()
            );
            self.render_adjustments(&mut buffer);
            return buffer;
        }

        let criterion = self.criterion.map_or("distance", |c| c.name());
        let _ = writeln!(
            buffer,
            "Route: {} -> {} ({} option{}, criterion: {})",
            self.start.display_name(),
            self.goal.display_name(),
            self.options.len(),
            if self.options.len() == 1 { "" } else { "s" },
            criterion
        );
        for option in &self.options {
            let joined = option
                .stops
                .iter()
                .map(|stop| stop.id.as_str())
                .collect::<Vec<_>>()
                .join(" -> ");
            let _ = writeln!(buffer, "{:>3}. {}", option.rank, joined);
            let _ = write!(
                buffer,
                "     distance: {:.0} m | hops: {} | cost: {:.3}",
                option.distance_m, option.hops, option.cost
            );
            if let Some(risk) = option.risk {
                let _ = write!(buffer, " | risk: {:.3}", risk);
            }
            let _ = writeln!(buffer);
            for leg in &option.legs {
                let _ = write!(
                    buffer,
                    "       - {} -> {} via {}: {:.0} m, cost {:.3}",
                    leg.from, leg.to, leg.edge, leg.distance_m, leg.cost
                );
                if let Some(risk) = leg.risk {
                    let _ = write!(buffer, ", risk {:.3}", risk);
                }
                let _ = writeln!(buffer);
            }
        }
        self.render_adjustments(&mut buffer);
        buffer
    }

    fn render_rich(&self) -> String {
        let mut buffer = String::new();
        if !self.found {
            let _ = writeln!(
                buffer,
                "**No route** between _{}_ and _{}_",
                self.start.display_name(),
                self.goal.display_name()
            );
            return buffer;
        }

        let _ = writeln!(
            buffer,
            "**Route** _{} → {}_ (criterion: `{}`)",
            self.start.display_name(),
            self.goal.display_name(),
            self.criterion.map_or("distance", |c| c.name())
        );
        for option in &self.options {
            let names = option
                .stops
                .iter()
                .map(|stop| format!("**{}**", stop.display_name()))
                .collect::<Vec<_>>()
                .join(" → ");
            let _ = writeln!(
                buffer,
                "* {}. {} ({:.0} m, cost `{:.3}`)",
                option.rank, names, option.distance_m, option.cost
            );
            for (leg, pair) in option.legs.iter().zip(option.stops.windows(2)) {
                let _ = writeln!(
                    buffer,
                    "  * {} → {} via `{}` ({:.0} m)",
                    pair[0].display_name(),
                    pair[1].display_name(),
                    leg.edge,
                    leg.distance_m
                );
            }
        }
        buffer
    }

    fn render_adjustments(&self, buffer: &mut String) {
        for adjustment in &self.adjustments {
            let line = match adjustment {
                Adjustment::EndpointNotAvoided { node } => {
                    format!("note: {node} is an endpoint and was not avoided")
                }
                Adjustment::AvoidedWaypointDropped { node } => {
                    format!("note: waypoint {node} is avoided and was dropped")
                }
                Adjustment::RedundantWaypointDropped { node } => {
                    format!("note: redundant waypoint {node} was dropped")
                }
            };
            let _ = writeln!(buffer, "{line}");
        }
    }
}

fn summarise_option(graph: &Graph, rank: usize, option: &RouteOption) -> OptionSummary {
    OptionSummary {
        rank,
        cost: option.path.cost,
        distance_m: option.distance_m,
        risk: option.risk,
        hops: option.hop_count(),
        stops: option
            .path
            .nodes
            .iter()
            .map(|id| RouteStop::resolve(graph, id))
            .collect(),
        edges: option.path.edges.clone(),
        legs: option.legs.clone(),
    }
}

/// Side-by-side summaries of the shortest, safest and balanced routes.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ComparisonSummary {
    pub shortest: RouteSummary,
    pub safest: RouteSummary,
    pub balanced: RouteSummary,
}

impl ComparisonSummary {
    pub fn from_comparison(graph: &Graph, comparison: &RouteComparison) -> Self {
        Self {
            shortest: RouteSummary::from_outcome(graph, &comparison.shortest),
            safest: RouteSummary::from_outcome(graph, &comparison.safest),
            balanced: RouteSummary::from_outcome(graph, &comparison.balanced),
        }
    }

    /// Render each criterion under its own heading.
    pub fn render(&self, mode: RouteRenderMode) -> String {
        let sections = [
            ("Shortest route", &self.shortest),
            ("Safest route", &self.safest),
            ("Balanced routes", &self.balanced),
        ];
        let mut buffer = String::new();
        for (index, (title, summary)) in sections.into_iter().enumerate() {
            if index > 0 {
                let _ = writeln!(buffer);
            }
            let _ = match mode {
                RouteRenderMode::PlainText => writeln!(buffer, "== {title} =="),
                RouteRenderMode::RichText => writeln!(buffer, "### {title}\n"),
            };
            buffer.push_str(&summary.render(mode));
        }
        buffer
    }
}
