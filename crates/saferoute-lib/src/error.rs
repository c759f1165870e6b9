use std::path::PathBuf;

use thiserror::Error;

/// Convenient result alias for the saferoute library.
pub type Result<T> = std::result::Result<T, Error>;

/// Top-level library error type.
///
/// An unreachable goal is not an error: searches report it through
/// [`crate::SearchResult::Unreachable`] and [`crate::RouteOutcome::NoPath`].
#[derive(Debug, Error)]
pub enum Error {
    /// Dataset could not be located at the resolved path.
    #[error("dataset not found at {path}")]
    DatasetNotFound { path: PathBuf },

    /// No suitable project directories could be resolved for this platform.
    #[error("failed to resolve project directories for the dataset")]
    ProjectDirsUnavailable,

    /// Raised when a node identifier is not present in the graph.
    #[error("unknown node: {id}{}", format_suggestions(.suggestions))]
    UnknownNode { id: String, suggestions: Vec<String> },

    /// Raised when an edge identifier is not present in the graph.
    #[error("unknown edge: {id}")]
    UnknownEdge { id: String },

    /// Raised when two edges in the dataset share the same identifier.
    #[error("duplicate edge id encountered: {id}")]
    DuplicateEdgeId { id: String },

    /// Raised when an edge carries a negative or non-finite distance.
    #[error("edge {id} has invalid distance {distance}")]
    InvalidDistance { id: String, distance: f64 },

    /// Raised when a cost map entry would be negative or NaN.
    #[error("edge {id} has invalid cost {cost}; costs must be non-negative")]
    InvalidCost { id: String, cost: f64 },

    /// Raised when fewer than one route alternative is requested.
    #[error("k must be at least 1, got {k}")]
    InvalidK { k: usize },

    /// Raised when the blend coefficient is negative or non-finite.
    #[error("blend coefficient must be finite and non-negative, got {value}")]
    InvalidBlendCoefficient { value: f64 },

    /// Raised when a coefficient override cannot be parsed or is out of range.
    #[error("invalid coefficient override '{input}': {reason}")]
    InvalidOverride { input: String, reason: String },

    /// Raised when a risk feature name is not recognised.
    #[error("unknown risk feature: {name}")]
    UnknownFeature { name: String },

    /// Raised when a travel mode name is not recognised.
    #[error("unknown travel mode: {name}")]
    UnknownTravelMode { name: String },

    /// Raised when a time slot name is not recognised.
    #[error("unknown time slot: {name}; expected day or night")]
    UnknownTimeSlot { name: String },

    /// Raised when a cost criterion name is not recognised.
    #[error("unknown criterion: {name}; expected distance, risk or blended")]
    UnknownCriterion { name: String },

    /// Wrapper for IO errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Wrapper for JSON parsing errors.
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else if suggestions.len() == 1 {
        format!(". Did you mean '{}'?", suggestions[0])
    } else {
        format!(
            ". Did you mean one of: {}?",
            suggestions
                .iter()
                .map(|s| format!("'{}'", s))
                .collect::<Vec<_>>()
                .join(", ")
        )
    }
}
