use crate::error::{PricingError, ScoringError};
use crate::features::{CustomerFeatures, FEATURE_COUNT};
use std::sync::Arc;

/// An externally trained regression model, already loaded and read-only for
/// the lifetime of the process. `Send + Sync` so concurrent request handlers
/// may score simultaneously without coordination.
pub trait ScoringModel: Send + Sync {
    /// Predict a CLV estimate from a feature vector in `FEATURE_ORDER` order.
    /// The raw estimate may be negative or otherwise atypical; callers are
    /// expected to go through `Scorer::estimate_clv`, which hides that.
    fn predict(&self, features: &[f64; FEATURE_COUNT]) -> Result<f64, ScoringError>;
}

/// Wraps the injected model behind the CLV contract: validated input in,
/// finite non-negative estimate out.
pub struct Scorer {
    model: Arc<dyn ScoringModel>,
}

impl Scorer {
    pub fn new(model: Arc<dyn ScoringModel>) -> Self {
        Self { model }
    }

    /// Estimate a customer's lifetime value.
    ///
    /// Validates the record before the model is ever invoked, assembles the
    /// feature vector in the fixed contract order, and clamps the raw
    /// estimate to be non-negative. A validation or scoring failure aborts
    /// the whole pricing computation; there is no fallback estimate.
    pub fn estimate_clv(&self, features: &CustomerFeatures) -> Result<f64, PricingError> {
        features.validate()?;

        let vector = features.to_vector();
        let raw = self.model.predict(&vector)?;
        if !raw.is_finite() {
            return Err(ScoringError::NonFiniteOutput(raw).into());
        }

        let clv = raw.max(0.0);
        tracing::debug!(raw, clv, "estimated customer lifetime value");
        Ok(clv)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::error::ValidationError;

    /// Fixed-output model for exercising the scorer in isolation.
    pub(crate) struct StubModel(pub f64);

    impl ScoringModel for StubModel {
        fn predict(&self, _features: &[f64; FEATURE_COUNT]) -> Result<f64, ScoringError> {
            Ok(self.0)
        }
    }

    struct FailingModel;

    impl ScoringModel for FailingModel {
        fn predict(&self, _features: &[f64; FEATURE_COUNT]) -> Result<f64, ScoringError> {
            Err(ScoringError::NotFitted("no trees".to_string()))
        }
    }

    pub(crate) fn sample_features() -> CustomerFeatures {
        CustomerFeatures {
            recency: 30.0,
            frequency: 5.0,
            monetary_value: 500.0,
            tenure: 365.0,
            avg_days_between_purchases: 30.0,
            age: 35.0,
            unique_products_count: 3.0,
        }
    }

    #[test]
    fn passes_through_positive_estimates() {
        let scorer = Scorer::new(Arc::new(StubModel(420.5)));
        assert_eq!(scorer.estimate_clv(&sample_features()).unwrap(), 420.5);
    }

    #[test]
    fn clamps_negative_estimates_to_zero() {
        let scorer = Scorer::new(Arc::new(StubModel(-37.0)));
        assert_eq!(scorer.estimate_clv(&sample_features()).unwrap(), 0.0);
    }

    #[test]
    fn rejects_non_finite_model_output() {
        let scorer = Scorer::new(Arc::new(StubModel(f64::NAN)));
        let err = scorer.estimate_clv(&sample_features()).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Scoring(ScoringError::NonFiniteOutput(_))
        ));
    }

    #[test]
    fn invalid_features_never_reach_the_model() {
        struct PanickingModel;
        impl ScoringModel for PanickingModel {
            fn predict(&self, _: &[f64; FEATURE_COUNT]) -> Result<f64, ScoringError> {
                panic!("model invoked on invalid input");
            }
        }

        let scorer = Scorer::new(Arc::new(PanickingModel));
        let mut features = sample_features();
        features.recency = -1.0;
        let err = scorer.estimate_clv(&features).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Validation(ValidationError::Negative { field: "Recency", .. })
        ));
    }

    #[test]
    fn scoring_failures_propagate_distinctly() {
        let scorer = Scorer::new(Arc::new(FailingModel));
        let err = scorer.estimate_clv(&sample_features()).unwrap_err();
        assert!(matches!(err, PricingError::Scoring(ScoringError::NotFitted(_))));
    }
}
