use crate::error::ValidationError;
use serde::{Deserialize, Serialize};

/// Version of the feature-order contract below. A scoring model artifact
/// records the version it was trained against; loaders must reject a
/// mismatch rather than risk silent column misalignment.
pub const FEATURE_CONTRACT_VERSION: u32 = 1;

/// Number of features every scoring model must accept.
pub const FEATURE_COUNT: usize = 7;

/// The fixed field order scoring models are trained against. This is the
/// explicit contract between feature records and model columns; `to_vector`
/// assembles values in exactly this order.
pub const FEATURE_ORDER: [&str; FEATURE_COUNT] = [
    "Recency",
    "Frequency",
    "MonetaryValue",
    "Tenure",
    "AvgDaysBetweenPurchases",
    "Age",
    "UniqueProductsCount",
];

pub const DEFAULT_PRODUCT_COST: f64 = 50.0;

/// A feature-engineered customer record. Immutable once constructed;
/// identifies nothing beyond the single pricing request it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerFeatures {
    /// Days since last purchase.
    #[serde(rename = "Recency")]
    pub recency: f64,
    /// Count of past transactions.
    #[serde(rename = "Frequency")]
    pub frequency: f64,
    /// Average revenue per transaction.
    #[serde(rename = "MonetaryValue")]
    pub monetary_value: f64,
    /// Days since first purchase.
    #[serde(rename = "Tenure")]
    pub tenure: f64,
    #[serde(rename = "AvgDaysBetweenPurchases")]
    pub avg_days_between_purchases: f64,
    /// Customer age in years.
    #[serde(rename = "Age")]
    pub age: f64,
    /// Distinct products ever purchased.
    #[serde(rename = "UniqueProductsCount")]
    pub unique_products_count: f64,
}

impl CustomerFeatures {
    /// Assemble the record into the fixed column order of `FEATURE_ORDER`.
    pub fn to_vector(&self) -> [f64; FEATURE_COUNT] {
        [
            self.recency,
            self.frequency,
            self.monetary_value,
            self.tenure,
            self.avg_days_between_purchases,
            self.age,
            self.unique_products_count,
        ]
    }

    /// Check every field is finite and in range, naming the first offender.
    /// All fields must be >= 0; `Age` must be strictly positive.
    pub fn validate(&self) -> Result<(), ValidationError> {
        for (field, value) in FEATURE_ORDER.into_iter().zip(self.to_vector()) {
            if !value.is_finite() {
                return Err(ValidationError::NonFinite { field, value });
            }
            if value < 0.0 {
                return Err(ValidationError::Negative { field, value });
            }
        }
        if self.age <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "Age",
                value: self.age,
            });
        }
        Ok(())
    }
}

/// One pricing computation's input: a customer record plus the cost of the
/// product being priced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRequest {
    #[serde(flatten)]
    pub features: CustomerFeatures,
    #[serde(default = "default_product_cost")]
    pub product_cost: f64,
}

fn default_product_cost() -> f64 {
    DEFAULT_PRODUCT_COST
}

impl PricingRequest {
    pub fn new(features: CustomerFeatures, product_cost: f64) -> Self {
        Self {
            features,
            product_cost,
        }
    }

    /// Build a request from raw JSON, field by field, so a missing or
    /// mistyped field surfaces as a `ValidationError` naming it instead of an
    /// opaque deserialization failure. The record is fully validated before
    /// this returns; no model is invoked on a partial vector.
    pub fn from_json(value: &serde_json::Value) -> Result<Self, ValidationError> {
        let obj = value
            .as_object()
            .ok_or_else(|| ValidationError::Malformed("expected a JSON object".to_string()))?;

        let mut columns = [0.0f64; FEATURE_COUNT];
        for (slot, field) in columns.iter_mut().zip(FEATURE_ORDER) {
            let raw = obj.get(field).ok_or_else(|| ValidationError::MissingField {
                field: field.to_string(),
            })?;
            *slot = raw.as_f64().ok_or_else(|| {
                ValidationError::Malformed(format!("field `{field}` must be a number"))
            })?;
        }

        let product_cost = match obj.get("product_cost") {
            Some(raw) => raw.as_f64().ok_or_else(|| {
                ValidationError::Malformed("field `product_cost` must be a number".to_string())
            })?,
            None => DEFAULT_PRODUCT_COST,
        };

        let [recency, frequency, monetary_value, tenure, avg_days_between_purchases, age, unique_products_count] =
            columns;
        let request = Self {
            features: CustomerFeatures {
                recency,
                frequency,
                monetary_value,
                tenure,
                avg_days_between_purchases,
                age,
                unique_products_count,
            },
            product_cost,
        };
        request.validate()?;
        Ok(request)
    }

    /// Validate the feature record and the cost together.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.features.validate()?;
        if !self.product_cost.is_finite() {
            return Err(ValidationError::NonFinite {
                field: "product_cost",
                value: self.product_cost,
            });
        }
        if self.product_cost <= 0.0 {
            return Err(ValidationError::NonPositive {
                field: "product_cost",
                value: self.product_cost,
            });
        }
        Ok(())
    }
}

/// The output of one pricing computation. Created fresh per request, never
/// mutated, not persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingResult {
    pub base_price: f64,
    pub dynamic_price: f64,
    pub clv: f64,
    pub price_adjustment_factor: f64,
    pub min_price: f64,
    pub profit_margin: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CustomerFeatures {
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
    fn vector_follows_declared_order() {
        let vector = sample().to_vector();
        assert_eq!(vector, [30.0, 5.0, 500.0, 365.0, 30.0, 35.0, 3.0]);
        assert_eq!(FEATURE_ORDER.len(), FEATURE_COUNT);
    }

    #[test]
    fn missing_field_is_named() {
        let mut body = serde_json::json!({
            "Recency": 30, "Frequency": 5, "MonetaryValue": 500,
            "Tenure": 365, "AvgDaysBetweenPurchases": 30,
            "Age": 35, "UniqueProductsCount": 3,
        });
        body.as_object_mut().unwrap().remove("Tenure");

        let err = PricingRequest::from_json(&body).unwrap_err();
        assert_eq!(
            err,
            ValidationError::MissingField {
                field: "Tenure".to_string()
            }
        );
    }

    #[test]
    fn product_cost_defaults_when_absent() {
        let body = serde_json::json!({
            "Recency": 30, "Frequency": 5, "MonetaryValue": 500,
            "Tenure": 365, "AvgDaysBetweenPurchases": 30,
            "Age": 35, "UniqueProductsCount": 3,
        });
        let request = PricingRequest::from_json(&body).unwrap();
        assert_eq!(request.product_cost, DEFAULT_PRODUCT_COST);
    }

    #[test]
    fn negative_feature_rejected() {
        let mut features = sample();
        features.frequency = -1.0;
        let err = features.validate().unwrap_err();
        assert_eq!(
            err,
            ValidationError::Negative {
                field: "Frequency",
                value: -1.0
            }
        );
    }

    #[test]
    fn zero_age_rejected() {
        let mut features = sample();
        features.age = 0.0;
        assert!(matches!(
            features.validate().unwrap_err(),
            ValidationError::NonPositive { field: "Age", .. }
        ));
    }

    #[test]
    fn non_positive_cost_rejected() {
        for cost in [0.0, -5.0] {
            let err = PricingRequest::new(sample(), cost).validate().unwrap_err();
            assert!(matches!(
                err,
                ValidationError::NonPositive {
                    field: "product_cost",
                    ..
                }
            ));
        }
    }

    #[test]
    fn nan_feature_rejected() {
        let mut features = sample();
        features.tenure = f64::NAN;
        assert!(matches!(
            features.validate().unwrap_err(),
            ValidationError::NonFinite { field: "Tenure", .. }
        ));
    }

    #[test]
    fn wire_names_are_pascal_case() {
        let json = serde_json::to_value(sample()).unwrap();
        for field in FEATURE_ORDER {
            assert!(json.get(field).is_some(), "missing wire field {field}");
        }
    }
}
