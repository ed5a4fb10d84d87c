use dynprice_core::PricingConfig;
use serde::Deserialize;
use std::env;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    #[serde(default)]
    pub pricing: PricingSettings,
    pub model: ModelConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ModelConfig {
    /// Path to the JSON model artifact.
    pub path: String,
}

/// Pricing knobs. All defaults reproduce the calibrated production values;
/// overriding any of them materially changes pricing behavior, which is why
/// they live in configuration rather than in code.
#[derive(Debug, Deserialize, Clone)]
pub struct PricingSettings {
    #[serde(default = "default_base_price")]
    pub base_price: f64,
    #[serde(default = "default_low_clv")]
    pub low_clv: f64,
    #[serde(default = "default_high_clv")]
    pub high_clv: f64,
    #[serde(default = "default_min_factor")]
    pub min_factor: f64,
    #[serde(default = "default_max_factor")]
    pub max_factor: f64,
    #[serde(default = "default_min_markup")]
    pub min_markup: f64,
}

fn default_base_price() -> f64 {
    100.0
}
fn default_low_clv() -> f64 {
    100.0
}
fn default_high_clv() -> f64 {
    1000.0
}
fn default_min_factor() -> f64 {
    0.8
}
fn default_max_factor() -> f64 {
    1.2
}
fn default_min_markup() -> f64 {
    1.1
}

impl Default for PricingSettings {
    fn default() -> Self {
        Self {
            base_price: default_base_price(),
            low_clv: default_low_clv(),
            high_clv: default_high_clv(),
            min_factor: default_min_factor(),
            max_factor: default_max_factor(),
            min_markup: default_min_markup(),
        }
    }
}

impl From<PricingSettings> for PricingConfig {
    fn from(settings: PricingSettings) -> Self {
        Self {
            base_price: settings.base_price,
            low_clv: settings.low_clv,
            high_clv: settings.high_clv,
            min_factor: settings.min_factor,
            max_factor: settings.max_factor,
            min_markup: settings.min_markup,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            // Start off by merging in the "default" configuration file
            .add_source(config::File::with_name("config/default"))
            // Environment-specific file, optional
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local overrides, not checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg. `DYNPRICE__SERVER__PORT=9000` overrides `server.port`
            .add_source(config::Environment::with_prefix("DYNPRICE").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_calibrated_values() {
        let settings = PricingSettings::default();
        assert_eq!(settings.base_price, 100.0);
        assert_eq!(settings.low_clv, 100.0);
        assert_eq!(settings.high_clv, 1000.0);
        assert_eq!(settings.min_factor, 0.8);
        assert_eq!(settings.max_factor, 1.2);
        assert_eq!(settings.min_markup, 1.1);
    }

    #[test]
    fn settings_convert_to_a_valid_pricing_config() {
        let config: PricingConfig = PricingSettings::default().into();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn pricing_section_is_optional() {
        let raw = r#"
            [server]
            port = 8000

            [model]
            path = "models/clv_model.json"
        "#;
        let parsed: Config = config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert_eq!(parsed.server.port, 8000);
        assert_eq!(parsed.pricing.base_price, 100.0);
    }
}
