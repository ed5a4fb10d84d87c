//! Pricing computation core: turns a customer feature record and a product
//! cost into a CLV estimate, a bounded adjustment factor, and a final price
//! that never undercuts cost plus markup.

pub mod engine;
pub mod error;
pub mod features;
pub mod pricer;
pub mod scorer;

pub use engine::PricingEngine;
pub use error::{BatchError, ConfigError, PricingError, ScoringError, ValidationError};
pub use features::{
    CustomerFeatures, PricingRequest, PricingResult, DEFAULT_PRODUCT_COST, FEATURE_CONTRACT_VERSION,
    FEATURE_COUNT, FEATURE_ORDER,
};
pub use pricer::{Pricer, PricingConfig};
pub use scorer::{Scorer, ScoringModel};
