use dynprice_core::PricingEngine;
use std::sync::Arc;

/// Shared application state. The engine is immutable after construction, so
/// concurrent handlers share it with no coordination.
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<PricingEngine>,
}
