use crate::error::{BatchError, ConfigError, PricingError};
use crate::features::{PricingRequest, PricingResult};
use crate::pricer::{Pricer, PricingConfig};
use crate::scorer::{Scorer, ScoringModel};
use std::sync::Arc;

/// The pricing computation engine: one Scorer, one Pricer, no state beyond
/// the injected model and the validated config. Stateless per request, so a
/// single engine behind an `Arc` serves concurrent callers without locks.
pub struct PricingEngine {
    scorer: Scorer,
    pricer: Pricer,
}

impl PricingEngine {
    /// Construct the engine from an already-loaded model and a pricing
    /// config. The model is injected, never loaded from a path here; an
    /// invalid config prevents the engine from existing at all.
    pub fn new(model: Arc<dyn ScoringModel>, config: PricingConfig) -> Result<Self, ConfigError> {
        let pricer = Pricer::new(config)?;
        Ok(Self {
            scorer: Scorer::new(model),
            pricer,
        })
    }

    pub fn config(&self) -> &PricingConfig {
        self.pricer.config()
    }

    /// One pricing computation: validate, estimate CLV, price.
    pub fn price_request(&self, request: &PricingRequest) -> Result<PricingResult, PricingError> {
        request.validate()?;
        let clv = self.scorer.estimate_clv(&request.features)?;
        let result = self.pricer.price(clv, request.product_cost)?;
        tracing::debug!(
            clv = result.clv,
            dynamic_price = result.dynamic_price,
            factor = result.price_adjustment_factor,
            "priced request"
        );
        Ok(result)
    }

    /// Price an ordered batch sequentially, preserving input order.
    ///
    /// Fail-fast: the first failing element aborts the whole batch and the
    /// error names its position. There is no partial-batch success.
    pub fn price_batch(
        &self,
        requests: &[PricingRequest],
    ) -> Result<Vec<PricingResult>, BatchError> {
        let mut results = Vec::with_capacity(requests.len());
        for (position, request) in requests.iter().enumerate() {
            let result = self
                .price_request(request)
                .map_err(|source| BatchError { position, source })?;
            results.push(result);
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::scorer::tests::{sample_features, StubModel};

    fn engine(clv: f64) -> PricingEngine {
        PricingEngine::new(Arc::new(StubModel(clv)), PricingConfig::default()).unwrap()
    }

    #[test]
    fn end_to_end_worked_example() {
        let engine = engine(500.0);
        let request = PricingRequest::new(sample_features(), 50.0);
        let result = engine.price_request(&request).unwrap();

        assert_eq!(result.base_price, 100.0);
        assert_eq!(result.clv, 500.0);
        assert_eq!(result.price_adjustment_factor, 0.98);
        assert_eq!(result.min_price, 55.0);
        assert_eq!(result.dynamic_price, 97.78);
        assert_eq!(result.profit_margin, 48.86);
        assert!(result.dynamic_price >= result.min_price);
    }

    #[test]
    fn identical_inputs_yield_identical_output() {
        let engine = engine(321.0);
        let request = PricingRequest::new(sample_features(), 42.0);
        let first = engine.price_request(&request).unwrap();
        let second = engine.price_request(&request).unwrap();
        assert_eq!(
            serde_json::to_vec(&first).unwrap(),
            serde_json::to_vec(&second).unwrap()
        );
    }

    #[test]
    fn batch_preserves_input_order() {
        let engine = engine(500.0);
        let requests = vec![
            PricingRequest::new(sample_features(), 10.0),
            PricingRequest::new(sample_features(), 50.0),
            PricingRequest::new(sample_features(), 95.0),
        ];
        let results = engine.price_batch(&requests).unwrap();
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].min_price, 11.0);
        assert_eq!(results[1].min_price, 55.0);
        assert_eq!(results[2].min_price, 104.5);
    }

    #[test]
    fn batch_fails_fast_naming_the_position() {
        let engine = engine(500.0);
        let mut bad = sample_features();
        bad.age = -1.0;
        let requests = vec![
            PricingRequest::new(sample_features(), 50.0),
            PricingRequest::new(sample_features(), 50.0),
            PricingRequest::new(bad, 50.0),
            PricingRequest::new(sample_features(), 50.0),
        ];

        let err = engine.price_batch(&requests).unwrap_err();
        assert_eq!(err.position, 2);
        assert!(matches!(
            err.source,
            PricingError::Validation(ValidationError::Negative { field: "Age", .. })
        ));
    }

    #[test]
    fn empty_batch_is_empty_success() {
        let engine = engine(500.0);
        assert!(engine.price_batch(&[]).unwrap().is_empty());
    }

    #[test]
    fn invalid_cost_rejected_before_scoring() {
        let engine = engine(500.0);
        let request = PricingRequest::new(sample_features(), 0.0);
        let err = engine.price_request(&request).unwrap_err();
        assert!(matches!(
            err,
            PricingError::Validation(ValidationError::NonPositive {
                field: "product_cost",
                ..
            })
        ));
    }
}
