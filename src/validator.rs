use crate::model::{ConfigError, DynamicPricingConfig};

/// Largest tolerated base price adjustment, in percent. Anything beyond is
/// clamped with a warning instead of rejected: a fat-fingered adjustment
/// should not hard-fail the whole config write.
pub const MAX_BASE_ADJUSTMENT_PCT: f64 = 90.0;

/// Outcome of a successful validation: the accepted config plus any
/// non-fatal corrections that were applied to it.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidatedConfig {
    pub config: DynamicPricingConfig,
    pub warnings: Vec<String>,
}

pub struct ConfigValidator;

impl ConfigValidator {
    /// Checks the structural and numeric invariants of a dynamic pricing
    /// config. Pure function, no I/O; persistence of the accepted config is
    /// the caller's job.
    pub fn validate(candidate: DynamicPricingConfig) -> Result<ValidatedConfig, ConfigError> {
        if candidate.min_price > candidate.max_price {
            return Err(ConfigError::RangeInvalid {
                min: candidate.min_price,
                max: candidate.max_price,
            });
        }
        if candidate.demand_multiplier <= 0.0 {
            return Err(ConfigError::InvalidMultiplier(candidate.demand_multiplier));
        }
        if candidate.auto_adjust && !candidate.enabled {
            return Err(ConfigError::InconsistentAutoAdjust);
        }

        let mut config = candidate;
        let mut warnings = Vec::new();
        if config.base_price_adjustment_pct.abs() > MAX_BASE_ADJUSTMENT_PCT {
            let clamped = config
                .base_price_adjustment_pct
                .clamp(-MAX_BASE_ADJUSTMENT_PCT, MAX_BASE_ADJUSTMENT_PCT);
            warnings.push(format!(
                "base_price_adjustment_pct {} clamped to {}",
                config.base_price_adjustment_pct, clamped
            ));
            config.base_price_adjustment_pct = clamped;
        }

        Ok(ValidatedConfig { config, warnings })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::UpdateFrequency;
    use std::collections::HashMap;

    fn base_config() -> DynamicPricingConfig {
        DynamicPricingConfig {
            enabled: true,
            base_price_adjustment_pct: 0.0,
            demand_multiplier: 1.0,
            seasonal_adjustments: HashMap::new(),
            competitor_tracking: true,
            auto_adjust: false,
            min_price: 0.0,
            max_price: 1000.0,
            update_frequency: UpdateFrequency::Daily,
        }
    }

    #[test]
    fn rejects_inverted_price_range() {
        let candidate = DynamicPricingConfig {
            min_price: 100.0,
            max_price: 50.0,
            ..base_config()
        };
        assert_eq!(
            ConfigValidator::validate(candidate),
            Err(ConfigError::RangeInvalid {
                min: 100.0,
                max: 50.0
            })
        );
    }

    #[test]
    fn rejects_non_positive_demand_multiplier() {
        let candidate = DynamicPricingConfig {
            demand_multiplier: 0.0,
            ..base_config()
        };
        assert_eq!(
            ConfigValidator::validate(candidate),
            Err(ConfigError::InvalidMultiplier(0.0))
        );
    }

    #[test]
    fn rejects_auto_adjust_without_enabled() {
        let candidate = DynamicPricingConfig {
            enabled: false,
            auto_adjust: true,
            ..base_config()
        };
        assert_eq!(
            ConfigValidator::validate(candidate),
            Err(ConfigError::InconsistentAutoAdjust)
        );
    }

    #[test]
    fn valid_config_passes_through_unchanged() {
        let candidate = DynamicPricingConfig {
            demand_multiplier: 2.5,
            ..base_config()
        };
        let validated = ConfigValidator::validate(candidate.clone()).unwrap();
        assert_eq!(validated.config, candidate);
        assert!(validated.warnings.is_empty());
    }

    #[test]
    fn oversized_adjustment_is_clamped_with_warning() {
        let candidate = DynamicPricingConfig {
            base_price_adjustment_pct: 250.0,
            ..base_config()
        };
        let validated = ConfigValidator::validate(candidate).unwrap();
        assert_eq!(validated.config.base_price_adjustment_pct, 90.0);
        assert_eq!(validated.warnings.len(), 1);

        let negative = DynamicPricingConfig {
            base_price_adjustment_pct: -250.0,
            ..base_config()
        };
        let validated = ConfigValidator::validate(negative).unwrap();
        assert_eq!(validated.config.base_price_adjustment_pct, -90.0);
    }
}
