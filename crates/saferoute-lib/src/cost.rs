//! Cost function adapter.
//!
//! Turns a graph's edges into a [`CostMap`] for one selection criterion. The
//! cost map is independent of the graph structure and is rebuilt whenever the
//! criterion, travel mode, time slot, or coefficient overrides change.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;

use crate::error::{Error, Result};
use crate::graph::{Edge, EdgeId, Graph};
use crate::scoring::{normalized_distance, EdgeScorer, FeatureContribution, ScoringProfile};

/// Cost applied to an edge that has no entry in the cost map.
pub const MISSING_EDGE_COST: f64 = 1.0;

/// Blend coefficient used when the caller does not supply one.
pub const DEFAULT_BLEND_COEFFICIENT: f64 = 1.0;

/// Selection criterion for a routing query.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Default)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum CostCriterion {
    /// Raw edge distance in metres.
    #[default]
    Distance,
    /// Scorer output only.
    Risk,
    /// Scorer output plus `coefficient` times the normalised distance.
    Blended { coefficient: f64 },
}

impl CostCriterion {
    /// Blended criterion with the default coefficient.
    pub fn blended() -> Self {
        CostCriterion::Blended {
            coefficient: DEFAULT_BLEND_COEFFICIENT,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CostCriterion::Distance => "distance",
            CostCriterion::Risk => "risk",
            CostCriterion::Blended { .. } => "blended",
        }
    }

    fn validate(&self) -> Result<()> {
        if let CostCriterion::Blended { coefficient } = *self {
            if !coefficient.is_finite() || coefficient < 0.0 {
                return Err(Error::InvalidBlendCoefficient { value: coefficient });
            }
        }
        Ok(())
    }
}

impl fmt::Display for CostCriterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CostCriterion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "distance" | "shortest" => Ok(CostCriterion::Distance),
            "risk" | "safest" => Ok(CostCriterion::Risk),
            "blended" | "balanced" => Ok(CostCriterion::blended()),
            _ => Err(Error::UnknownCriterion {
                name: s.to_string(),
            }),
        }
    }
}

/// Mapping from edge id to a non-negative traversal cost.
///
/// Lookups for edges without an entry return [`MISSING_EDGE_COST`]. An entry
/// of `f64::INFINITY`, inserted through [`CostMap::block`], makes the edge
/// impassable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CostMap {
    costs: HashMap<EdgeId, f64>,
}

impl CostMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a cost, rejecting negative values and NaN.
    pub fn insert(&mut self, id: impl Into<EdgeId>, cost: f64) -> Result<()> {
        let id = id.into();
        if cost.is_nan() || cost < 0.0 {
            return Err(Error::InvalidCost { id, cost });
        }
        self.costs.insert(id, cost);
        Ok(())
    }

    /// Mark an edge as impassable.
    pub fn block(&mut self, id: impl Into<EdgeId>) {
        self.costs.insert(id.into(), f64::INFINITY);
    }

    /// Cost of traversing the edge.
    pub fn cost(&self, id: &str) -> f64 {
        self.costs.get(id).copied().unwrap_or(MISSING_EDGE_COST)
    }

    /// Explicit entry for the edge, if any.
    pub fn get(&self, id: &str) -> Option<f64> {
        self.costs.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.costs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.costs.is_empty()
    }

    /// Build a map from `(edge, cost)` pairs, failing on the first entry
    /// that [`CostMap::insert`] rejects.
    pub fn try_from_iter<I>(iter: I) -> Result<Self>
    where
        I: IntoIterator<Item = (EdgeId, f64)>,
    {
        let mut map = CostMap::new();
        for (id, cost) in iter {
            map.insert(id, cost)?;
        }
        Ok(map)
    }

    /// Sum of edge costs along an edge sequence.
    pub fn total<'a>(&self, edges: impl IntoIterator<Item = &'a EdgeId>) -> f64 {
        edges.into_iter().map(|id| self.cost(id)).sum()
    }
}


/// Cost map for a criterion plus the per-edge scoring breakdowns.
#[derive(Debug, Clone, Default)]
pub struct CostModel {
    pub criterion: CostCriterion,
    pub costs: CostMap,
    pub breakdowns: HashMap<EdgeId, Vec<FeatureContribution>>,
}

impl CostModel {
    /// Score every edge of `graph` under `criterion`.
    ///
    /// Edges are read, never modified. The distance criterion skips the scorer
    /// entirely and leaves `breakdowns` empty.
    pub fn build(
        graph: &Graph,
        criterion: CostCriterion,
        profile: &ScoringProfile,
        scorer: &dyn EdgeScorer,
    ) -> Result<Self> {
        criterion.validate()?;

        let mut costs = CostMap::new();
        let mut breakdowns = HashMap::new();
        for edge in graph.edges() {
            let cost = match criterion {
                CostCriterion::Distance => edge.distance_m,
                CostCriterion::Risk => risk_cost(edge, profile, scorer, &mut breakdowns),
                CostCriterion::Blended { coefficient } => {
                    risk_cost(edge, profile, scorer, &mut breakdowns)
                        + coefficient * normalized_distance(edge.distance_m)
                }
            };
            costs.insert(edge.id.clone(), cost)?;
        }

        debug!(
            criterion = %criterion,
            mode = %profile.mode,
            slot = %profile.slot,
            edges = costs.len(),
            "built cost map"
        );

        Ok(Self {
            criterion,
            costs,
            breakdowns,
        })
    }

    /// Sum of the scorer's cost for each edge, or `None` for the distance criterion.
    pub fn risk_total<'a>(&self, edges: impl IntoIterator<Item = &'a EdgeId>) -> Option<f64> {
        if self.breakdowns.is_empty() {
            return None;
        }
        Some(
            edges
                .into_iter()
                .filter_map(|id| self.breakdowns.get(id))
                .map(|breakdown| breakdown.iter().map(|c| c.contribution).sum::<f64>())
                .sum(),
        )
    }
}

fn risk_cost(
    edge: &Edge,
    profile: &ScoringProfile,
    scorer: &dyn EdgeScorer,
    breakdowns: &mut HashMap<EdgeId, Vec<FeatureContribution>>,
) -> f64 {
    let score = scorer.score(edge, profile);
    breakdowns.insert(edge.id.clone(), score.breakdown);
    score.cost
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_entries_use_default_cost() {
        let map = CostMap::new();
        assert_eq!(map.cost("anything"), MISSING_EDGE_COST);
        assert_eq!(map.get("anything"), None);
    }

    #[test]
    fn blocked_entries_are_infinite() {
        let mut map = CostMap::new();
        map.block("e1");
        assert!(map.cost("e1").is_infinite());
    }

    #[test]
    fn rejects_negative_and_nan_costs() {
        let mut map = CostMap::new();
        assert!(map.insert("e1", -0.5).is_err());
        assert!(map.insert("e1", f64::NAN).is_err());
        assert!(map.insert("e1", 0.0).is_ok());
    }

    #[test]
    fn building_from_pairs_rejects_invalid_entries() {
        let err = CostMap::try_from_iter(vec![("a".to_string(), 2.0), ("b".to_string(), -1.0)])
            .unwrap_err();
        assert!(matches!(err, Error::InvalidCost { ref id, .. } if id == "b"));

        let map = CostMap::try_from_iter(vec![("a".to_string(), 2.0)]).unwrap();
        assert_eq!(map.len(), 1);
        assert_eq!(map.cost("a"), 2.0);
    }

    #[test]
    fn parses_criteria() {
        assert_eq!("risk".parse::<CostCriterion>().unwrap(), CostCriterion::Risk);
        assert_eq!(
            "balanced".parse::<CostCriterion>().unwrap(),
            CostCriterion::Blended { coefficient: 1.0 }
        );
        assert!("fastest".parse::<CostCriterion>().is_err());
    }

    #[test]
    fn negative_blend_coefficient_is_rejected() {
        let criterion = CostCriterion::Blended { coefficient: -1.0 };
        assert!(matches!(
            criterion.validate(),
            Err(Error::InvalidBlendCoefficient { .. })
        ));
    }
}
