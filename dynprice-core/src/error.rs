//! Error taxonomy for the pricing core.
//!
//! Three closed kinds: validation (caller input), scoring (the model), and
//! configuration (construction time). Callers branch on the variant, never on
//! message text. None of these are retried; the model is deterministic and
//! the engine never substitutes a guessed price.

/// A request field failed validation. Always names the offending field.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("missing required field `{field}`")]
    MissingField { field: String },

    #[error("malformed request: {0}")]
    Malformed(String),

    #[error("field `{field}` must be finite, got {value}")]
    NonFinite { field: &'static str, value: f64 },

    #[error("field `{field}` must be >= 0, got {value}")]
    Negative { field: &'static str, value: f64 },

    #[error("field `{field}` must be > 0, got {value}")]
    NonPositive { field: &'static str, value: f64 },
}

/// The scoring model could not produce a usable estimate.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScoringError {
    #[error("model produced a non-finite estimate: {0}")]
    NonFiniteOutput(f64),

    #[error("model expects {expected} features, got {got}")]
    FeatureShapeMismatch { expected: usize, got: usize },

    #[error("model is not fitted: {0}")]
    NotFitted(String),

    #[error("model prediction failed: {0}")]
    PredictionFailed(String),
}

/// Invalid engine configuration. Raised once, at construction; the
/// surrounding service must fail fast rather than serve with a
/// half-initialized pricer.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("base_price must be positive and finite, got {0}")]
    InvalidBasePrice(f64),

    #[error("calibration points must be finite with low_clv < high_clv, got low={low}, high={high}")]
    InvalidCalibration { low: f64, high: f64 },

    #[error("factor band must satisfy 0 < min <= max, got min={min}, max={max}")]
    InvalidFactorBand { min: f64, max: f64 },

    #[error("min_markup must be >= 1.0 so the floor never prices below cost, got {0}")]
    InvalidMarkup(f64),
}

/// Umbrella error for a single pricing computation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PricingError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Scoring(#[from] ScoringError),
}

/// A batch computation failed. Batches are fail-fast: the first failing
/// element aborts the whole batch, carrying its position.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("batch request failed at position {position}: {source}")]
pub struct BatchError {
    pub position: usize,
    #[source]
    pub source: PricingError,
}
