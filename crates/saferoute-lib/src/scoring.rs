//! Risk scoring for individual edges.
//!
//! The routing core only needs a non-negative scalar per edge. [`EdgeScorer`]
//! is the seam: [`SafetyScorer`] is the stock implementation that combines
//! thirteen risk features with per-mode coefficient presets and day/night
//! multipliers, but callers can plug in any scorer that honours the contract
//! (finite, non-negative cost; pure function of its inputs).

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::features::{FeatureReadings, TimeSlot, TravelMode};
use crate::graph::Edge;

/// Distances at or above this many metres normalise to 1.0.
pub const DISTANCE_CAP_M: f64 = 2000.0;

/// Police stations at or beyond this many metres contribute full risk.
pub const POLICE_CAP_M: f64 = 1500.0;

/// Weight of the normalised distance folded into every risk score.
pub const DISTANCE_PENALTY: f64 = 0.5;

/// Upper bound of the reading scale used by the dataset.
const READING_SCALE: f64 = 10.0;

/// Risk features understood by [`SafetyScorer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    Crime,
    Lighting,
    Cctv,
    CrowdDensity,
    StrayAnimals,
    #[serde(rename = "nearest_police_m")]
    NearestPolice,
    Sidewalk,
    ShopsVisibility,
    RoadCondition,
    TrafficDensity,
    AccidentsReported,
    TrafficBehavior,
    ParkingSafety,
}

impl Feature {
    pub const COUNT: usize = 13;

    pub const ALL: [Feature; Feature::COUNT] = [
        Feature::Crime,
        Feature::Lighting,
        Feature::Cctv,
        Feature::CrowdDensity,
        Feature::StrayAnimals,
        Feature::NearestPolice,
        Feature::Sidewalk,
        Feature::ShopsVisibility,
        Feature::RoadCondition,
        Feature::TrafficDensity,
        Feature::AccidentsReported,
        Feature::TrafficBehavior,
        Feature::ParkingSafety,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Dataset field name of the feature.
    pub fn as_str(self) -> &'static str {
        match self {
            Feature::Crime => "crime",
            Feature::Lighting => "lighting",
            Feature::Cctv => "cctv",
            Feature::CrowdDensity => "crowd_density",
            Feature::StrayAnimals => "stray_animals",
            Feature::NearestPolice => "nearest_police_m",
            Feature::Sidewalk => "sidewalk",
            Feature::ShopsVisibility => "shops_visibility",
            Feature::RoadCondition => "road_condition",
            Feature::TrafficDensity => "traffic_density",
            Feature::AccidentsReported => "accidents_reported",
            Feature::TrafficBehavior => "traffic_behavior",
            Feature::ParkingSafety => "parking_safety",
        }
    }
}

impl fmt::Display for Feature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Feature {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase();
        let normalized = match normalized.as_str() {
            "crowd" => "crowd_density",
            "stray_animice" => "stray_animals",
            "nearest_police" | "police" => "nearest_police_m",
            other => other,
        };
        Feature::ALL
            .into_iter()
            .find(|feature| feature.as_str() == normalized)
            .ok_or_else(|| Error::UnknownFeature {
                name: s.to_string(),
            })
    }
}

/// Coefficient table indexed by [`Feature`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coefficients([f64; Feature::COUNT]);

const WALKING: Coefficients = Coefficients([
    2.5, 2.2, 1.6, 1.6, 1.2, 1.2, 1.8, 1.4, 0.8, 0.6, 0.6, 0.8, 0.3,
]);
const TWO_WHEELER: Coefficients = Coefficients([
    1.5, 1.4, 1.0, 0.9, 1.0, 0.8, 0.2, 0.6, 1.6, 1.7, 1.8, 1.9, 0.2,
]);
const CAR: Coefficients = Coefficients([
    0.8, 0.9, 0.5, 0.5, 0.6, 0.5, 0.1, 0.3, 1.8, 2.0, 2.3, 2.2, 1.2,
]);

impl Coefficients {
    /// Preset coefficients for a travel mode.
    pub const fn preset(mode: TravelMode) -> Self {
        match mode {
            TravelMode::Walking => WALKING,
            TravelMode::TwoWheeler => TWO_WHEELER,
            TravelMode::Car => CAR,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        self.0[feature.index()]
    }

    pub fn set(&mut self, feature: Feature, value: f64) {
        self.0[feature.index()] = value;
    }
}

/// Day/night multiplier applied to a feature's contribution.
pub fn time_multiplier(slot: TimeSlot, feature: Feature) -> f64 {
    match (slot, feature) {
        (TimeSlot::Day, Feature::Crime) => 0.9,
        (TimeSlot::Day, Feature::Lighting) => 0.8,
        (TimeSlot::Day, Feature::TrafficDensity) => 1.1,
        (TimeSlot::Night, Feature::Crime) => 1.8,
        (TimeSlot::Night, Feature::Lighting) => 2.5,
        (TimeSlot::Night, Feature::TrafficDensity) => 0.8,
        _ => 1.0,
    }
}

/// How an override changes a preset coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OverrideOp {
    /// Replace the coefficient.
    Set(f64),
    /// Multiply the coefficient.
    Scale(f64),
}

/// User-supplied adjustment of a single coefficient.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureOverride {
    feature: Feature,
    op: OverrideOp,
}

impl FeatureOverride {
    /// Build an override, rejecting negative or non-finite values.
    pub fn new(feature: Feature, op: OverrideOp) -> Result<Self> {
        let value = match op {
            OverrideOp::Set(value) | OverrideOp::Scale(value) => value,
        };
        if !value.is_finite() || value < 0.0 {
            return Err(Error::InvalidOverride {
                input: format!("{feature}={value}"),
                reason: "value must be finite and non-negative".to_string(),
            });
        }
        Ok(Self { feature, op })
    }

    pub fn feature(&self) -> Feature {
        self.feature
    }

    pub fn op(&self) -> OverrideOp {
        self.op
    }

    fn apply(&self, coefficients: &mut Coefficients) {
        let current = coefficients.get(self.feature);
        let updated = match self.op {
            OverrideOp::Set(value) => value,
            OverrideOp::Scale(factor) => current * factor,
        };
        coefficients.set(self.feature, updated);
    }
}

impl FromStr for FeatureOverride {
    type Err = Error;

    /// Parse `feature=value` (replace) or `feature=*factor` (scale).
    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: &str| Error::InvalidOverride {
            input: s.to_string(),
            reason: reason.to_string(),
        };

        let (name, value) = s
            .split_once('=')
            .ok_or_else(|| invalid("expected feature=value or feature=*factor"))?;
        let feature: Feature = name.parse()?;

        let value = value.trim();
        let (scale, number) = match value.strip_prefix('*') {
            Some(rest) => (true, rest.trim()),
            None => (false, value),
        };
        let number: f64 = number
            .parse()
            .map_err(|_| invalid("value is not a number"))?;

        let op = if scale {
            OverrideOp::Scale(number)
        } else {
            OverrideOp::Set(number)
        };
        FeatureOverride::new(feature, op).map_err(|_| invalid("value must be finite and non-negative"))
    }
}

/// Travel context handed to a scorer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScoringProfile {
    pub mode: TravelMode,
    pub slot: TimeSlot,
    pub overrides: Vec<FeatureOverride>,
}

impl ScoringProfile {
    pub fn new(mode: TravelMode, slot: TimeSlot) -> Self {
        Self {
            mode,
            slot,
            overrides: Vec::new(),
        }
    }

    pub fn with_override(mut self, feature_override: FeatureOverride) -> Self {
        self.overrides.push(feature_override);
        self
    }

    /// Preset coefficients with overrides applied in order.
    pub fn coefficients(&self) -> Coefficients {
        let mut coefficients = Coefficients::preset(self.mode);
        for feature_override in &self.overrides {
            feature_override.apply(&mut coefficients);
        }
        coefficients
    }
}

/// One line of a score breakdown.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureContribution {
    pub name: &'static str,
    pub risk: f64,
    pub coefficient: f64,
    pub time_multiplier: f64,
    pub contribution: f64,
}

/// Scalar edge cost plus the per-feature breakdown used for reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Score {
    pub cost: f64,
    pub breakdown: Vec<FeatureContribution>,
}

/// Scoring collaborator consumed by the cost adapter.
pub trait EdgeScorer: Send + Sync {
    /// Score an edge. Must return a finite, non-negative cost.
    fn score(&self, edge: &Edge, profile: &ScoringProfile) -> Score;
}

/// Default safety scorer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SafetyScorer;

impl EdgeScorer for SafetyScorer {
    fn score(&self, edge: &Edge, profile: &ScoringProfile) -> Score {
        let coefficients = profile.coefficients();
        let readings = edge.features.readings(profile.mode, profile.slot);
        let risks = feature_risks(readings, edge.features.nearest_police_m);

        let mut breakdown = Vec::with_capacity(Feature::COUNT + 1);
        let mut total = 0.0;
        for feature in Feature::ALL {
            let risk = risks[feature.index()];
            let coefficient = coefficients.get(feature);
            let multiplier = time_multiplier(profile.slot, feature);
            let contribution = risk * coefficient * multiplier;
            total += contribution;
            breakdown.push(FeatureContribution {
                name: feature.as_str(),
                risk,
                coefficient,
                time_multiplier: multiplier,
                contribution,
            });
        }

        let distance = normalized_distance(edge.distance_m);
        let penalty = DISTANCE_PENALTY * distance;
        total += penalty;
        breakdown.push(FeatureContribution {
            name: "distance_penalty",
            risk: distance,
            coefficient: DISTANCE_PENALTY,
            time_multiplier: 1.0,
            contribution: penalty,
        });

        Score {
            cost: total,
            breakdown,
        }
    }
}

/// Normalise a distance against [`DISTANCE_CAP_M`], clamped to `[0, 1]`.
pub fn normalized_distance(distance_m: f64) -> f64 {
    clamp01(distance_m / DISTANCE_CAP_M)
}

fn clamp01(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 1.0)
}

fn scaled(reading: Option<f64>) -> f64 {
    clamp01(reading.unwrap_or(0.0) / READING_SCALE)
}

fn present(reading: Option<f64>) -> f64 {
    match reading {
        Some(value) if value != 0.0 => 1.0,
        _ => 0.0,
    }
}

/// Crowds are risky when nearly empty or packed, safest in between.
fn crowd_risk(crowd: f64) -> f64 {
    if crowd < 0.2 {
        1.0
    } else if crowd < 0.5 {
        0.2
    } else if crowd < 0.8 {
        0.5
    } else {
        0.7
    }
}

/// Convert readings to per-feature risk in `[0, 1]`, higher is worse.
fn feature_risks(readings: &FeatureReadings, edge_police_m: Option<f64>) -> [f64; Feature::COUNT] {
    let police_m = readings
        .nearest_police_m
        .or(edge_police_m)
        .unwrap_or(POLICE_CAP_M)
        .clamp(0.0, POLICE_CAP_M);

    let mut risks = [0.0; Feature::COUNT];
    risks[Feature::Crime.index()] = scaled(readings.crime);
    risks[Feature::Lighting.index()] = 1.0 - scaled(readings.lighting);
    risks[Feature::Cctv.index()] = 1.0 - present(readings.cctv);
    risks[Feature::CrowdDensity.index()] = crowd_risk(scaled(readings.crowd_density));
    risks[Feature::StrayAnimals.index()] = scaled(readings.stray_animals);
    risks[Feature::NearestPolice.index()] = 1.0 - police_m / POLICE_CAP_M;
    risks[Feature::Sidewalk.index()] = 1.0 - present(readings.sidewalk);
    risks[Feature::ShopsVisibility.index()] = 1.0 - scaled(readings.shops_visibility);
    risks[Feature::RoadCondition.index()] = 1.0 - scaled(readings.road_condition);
    risks[Feature::TrafficDensity.index()] = scaled(readings.traffic_density);
    risks[Feature::AccidentsReported.index()] = scaled(readings.accidents_reported);
    risks[Feature::TrafficBehavior.index()] = scaled(readings.traffic_behavior);
    risks[Feature::ParkingSafety.index()] = 1.0 - scaled(readings.parking_safety);
    risks
}
