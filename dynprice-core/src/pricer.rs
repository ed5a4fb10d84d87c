use crate::error::{ConfigError, ValidationError};
use crate::features::PricingResult;
use serde::{Deserialize, Serialize};

/// Pricing configuration. The defaults reproduce the calibrated production
/// behavior; every knob here materially changes pricing, so all of them are
/// configuration rather than constants baked into the code.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PricingConfig {
    /// Reference price the CLV factor is applied to.
    pub base_price: f64,

    /// CLV at or below which the factor saturates at `min_factor`.
    pub low_clv: f64,

    /// CLV at or above which the factor saturates at `max_factor`.
    pub high_clv: f64,

    /// Lower bound of the price adjustment factor.
    pub min_factor: f64,

    /// Upper bound of the price adjustment factor.
    pub max_factor: f64,

    /// Minimum markup over product cost; the floor price is
    /// `product_cost * min_markup` and the dynamic price never undercuts it.
    pub min_markup: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            base_price: 100.0,
            low_clv: 100.0,
            high_clv: 1000.0,
            min_factor: 0.8,
            max_factor: 1.2,
            min_markup: 1.1,
        }
    }
}

impl PricingConfig {
    /// Checked once at engine construction; an invalid config must prevent
    /// the pricer from existing at all.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.base_price.is_finite() || self.base_price <= 0.0 {
            return Err(ConfigError::InvalidBasePrice(self.base_price));
        }
        if !self.low_clv.is_finite() || !self.high_clv.is_finite() || self.low_clv >= self.high_clv
        {
            return Err(ConfigError::InvalidCalibration {
                low: self.low_clv,
                high: self.high_clv,
            });
        }
        if !self.min_factor.is_finite()
            || !self.max_factor.is_finite()
            || self.min_factor <= 0.0
            || self.min_factor > self.max_factor
        {
            return Err(ConfigError::InvalidFactorBand {
                min: self.min_factor,
                max: self.max_factor,
            });
        }
        if !self.min_markup.is_finite() || self.min_markup < 1.0 {
            return Err(ConfigError::InvalidMarkup(self.min_markup));
        }
        Ok(())
    }
}

/// Turns a CLV estimate into a bounded, floored final price. Pure; no state
/// beyond the validated config.
pub struct Pricer {
    config: PricingConfig,
}

impl Pricer {
    pub fn new(config: PricingConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Compute the final price for one request.
    ///
    /// The CLV maps to a factor via a piecewise-linear clamp between the two
    /// calibration points; values outside the range saturate rather than
    /// extrapolate, so the factor is bounded for any model output magnitude.
    /// The cost floor takes precedence over the calibrated price, which is
    /// what guarantees the price never drops below cost plus markup.
    pub fn price(&self, clv: f64, product_cost: f64) -> Result<PricingResult, ValidationError> {
        if !clv.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "clv",
                value: clv,
            });
        }
        if !product_cost.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "product_cost",
                value: product_cost,
            });
        }
        if product_cost <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "product_cost",
                value: product_cost,
            });
        }

        let factor = self.normalize_clv(clv);
        let min_price = product_cost * self.config.min_markup;
        let dynamic_price = (self.config.base_price * factor).max(min_price);

        // Currency-style rounding, half away from zero. The margin is derived
        // from the already-rounded price so the reported pair is consistent.
        let dynamic_price = round2(dynamic_price);
        let min_price = round2(min_price);
        let profit_margin = round2((dynamic_price - product_cost) / dynamic_price * 100.0);

        Ok(PricingResult {
            base_price: self.config.base_price,
            dynamic_price,
            clv: round2(clv),
            price_adjustment_factor: round2(factor),
            min_price,
            profit_margin,
        })
    }

    /// Map a CLV into the configured factor band via a piecewise-linear clamp
    /// between the calibration points.
    fn normalize_clv(&self, clv: f64) -> f64 {
        let span = self.config.high_clv - self.config.low_clv;
        let t = ((clv - self.config.low_clv) / span).clamp(0.0, 1.0);
        self.config.min_factor + (self.config.max_factor - self.config.min_factor) * t
    }
}

/// Round to 2 decimal places, half away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
