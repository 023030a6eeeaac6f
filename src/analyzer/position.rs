use crate::model::{AnalysisError, PriceIndicator, PricingStrategy};

/// Relative band around the market average inside which a price counts as
/// "average". Fixed design constant; tests pin it at exactly 10%.
pub const POSITION_BAND: f64 = 0.10;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub indicator: PriceIndicator,
    pub label: &'static str,
}

pub struct PositionClassifier;

impl PositionClassifier {
    /// Classifies a price against the market average. A zero average is bad
    /// upstream data and is reported, never masked as "average price".
    pub fn classify(price: f64, average: f64) -> Result<Classification, AnalysisError> {
        if average == 0.0 {
            return Err(AnalysisError::DivisionByZero);
        }
        let difference = (price - average) / average;
        let classification = if difference > POSITION_BAND {
            Classification {
                indicator: PriceIndicator::Above,
                label: "Higher than average",
            }
        } else if difference < -POSITION_BAND {
            Classification {
                indicator: PriceIndicator::Below,
                label: "Lower than average",
            }
        } else {
            Classification {
                indicator: PriceIndicator::Average,
                label: "Average price",
            }
        };
        Ok(classification)
    }

    /// Maps a position indicator to the qualitative strategy label used for
    /// recommendations and competitive positioning.
    pub fn strategy_for(indicator: PriceIndicator) -> PricingStrategy {
        match indicator {
            PriceIndicator::Above => PricingStrategy::Premium,
            PriceIndicator::Below => PricingStrategy::Budget,
            PriceIndicator::Average => PricingStrategy::Competitive,
        }
    }
}
