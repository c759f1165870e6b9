//! Typed risk attributes carried by each edge.
//!
//! Raw datasets are inconsistent: readings arrive as numbers, numeric strings,
//! booleans, or garbage, and a few fields appear under misspelled keys. All of
//! that is resolved here, once, when the dataset is deserialized. A reading
//! that cannot be interpreted is stored as `None` and later scored with the
//! neutral default instead of failing the load.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Travel mode used to select coefficient presets and per-mode readings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TravelMode {
    #[default]
    Walking,
    TwoWheeler,
    Car,
}

impl TravelMode {
    pub const ALL: [TravelMode; 3] = [TravelMode::Walking, TravelMode::TwoWheeler, TravelMode::Car];

    pub fn as_str(self) -> &'static str {
        match self {
            TravelMode::Walking => "walking",
            TravelMode::TwoWheeler => "two_wheeler",
            TravelMode::Car => "car",
        }
    }
}

impl fmt::Display for TravelMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TravelMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "walking" | "walk" => Ok(TravelMode::Walking),
            "two_wheeler" | "two-wheeler" | "bike" | "bicycle" => Ok(TravelMode::TwoWheeler),
            "car" | "driving" => Ok(TravelMode::Car),
            _ => Err(Error::UnknownTravelMode {
                name: s.to_string(),
            }),
        }
    }
}

/// Time of day used to select readings and time multipliers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeSlot {
    #[default]
    Day,
    Night,
}

impl TimeSlot {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeSlot::Day => "day",
            TimeSlot::Night => "night",
        }
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeSlot {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "day" => Ok(TimeSlot::Day),
            "night" => Ok(TimeSlot::Night),
            _ => Err(Error::UnknownTimeSlot {
                name: s.to_string(),
            }),
        }
    }
}

/// Raw feature readings for one mode and time slot.
///
/// Scalar readings use a 0–10 scale; `cctv` and `sidewalk` are presence flags;
/// `nearest_police_m` is a distance in metres.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FeatureReadings {
    #[serde(deserialize_with = "lenient::number")]
    pub crime: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub lighting: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub cctv: Option<f64>,
    #[serde(alias = "crowd", deserialize_with = "lenient::number")]
    pub crowd_density: Option<f64>,
    #[serde(alias = "stray_animice", deserialize_with = "lenient::number")]
    pub stray_animals: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub nearest_police_m: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub sidewalk: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub shops_visibility: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub road_condition: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub traffic_density: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub accidents_reported: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub traffic_behavior: Option<f64>,
    #[serde(deserialize_with = "lenient::number")]
    pub parking_safety: Option<f64>,
}

/// Day and night readings for a single travel mode.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SlotReadings {
    #[serde(deserialize_with = "lenient::or_default")]
    pub day: FeatureReadings,
    #[serde(deserialize_with = "lenient::or_default")]
    pub night: FeatureReadings,
}

impl SlotReadings {
    pub fn get(&self, slot: TimeSlot) -> &FeatureReadings {
        match slot {
            TimeSlot::Day => &self.day,
            TimeSlot::Night => &self.night,
        }
    }
}

/// Per-mode reading blocks.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ModeReadings {
    #[serde(deserialize_with = "lenient::or_default")]
    pub walking: SlotReadings,
    #[serde(
        alias = "two-wheeler",
        alias = "bike",
        deserialize_with = "lenient::or_default"
    )]
    pub two_wheeler: SlotReadings,
    #[serde(alias = "driving", deserialize_with = "lenient::or_default")]
    pub car: SlotReadings,
}

impl ModeReadings {
    pub fn get(&self, mode: TravelMode) -> &SlotReadings {
        match mode {
            TravelMode::Walking => &self.walking,
            TravelMode::TwoWheeler => &self.two_wheeler,
            TravelMode::Car => &self.car,
        }
    }
}

/// Attribute bag attached to an edge and consumed only by scoring.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct EdgeFeatures {
    /// Edge-level fallback used when a reading block omits the police distance.
    #[serde(deserialize_with = "lenient::number")]
    pub nearest_police_m: Option<f64>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub modes: ModeReadings,
}

impl EdgeFeatures {
    /// Readings for the given mode and time slot.
    pub fn readings(&self, mode: TravelMode, slot: TimeSlot) -> &FeatureReadings {
        self.modes.get(mode).get(slot)
    }
}

pub(crate) mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Accept numbers, numeric strings and booleans; anything else is `None`.
    pub fn number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(value.as_ref().and_then(reading_from_value))
    }

    /// Deserialize a nested block, falling back to its default when malformed.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(T::deserialize(value).unwrap_or_default())
    }

    pub(crate) fn reading_from_value(value: &Value) -> Option<f64> {
        let reading = match value {
            Value::Number(number) => number.as_f64(),
            Value::Bool(flag) => Some(if *flag { 1.0 } else { 0.0 }),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        reading.filter(|value| value.is_finite())
    }
}
