use crate::analyzer::position::PositionClassifier;
use crate::model::{
    AnalysisError, CompetitivePositioning, MarketAverage, PriceBand, PriceIndicator, PriceTrend,
    PricingAnalysisResult, PricingStrategy, RevenueOptimization, ServicePricing,
    ServiceRecommendation, TrendDirection,
};

/// Low-bound raise for services priced below market with growing revenue.
pub const RAISE_STEP_PCT: f64 = 0.10;
/// Smaller raise when revenue is already softening.
pub const CAUTIOUS_RAISE_STEP_PCT: f64 = 0.05;
/// How far an out-of-position range is pulled toward the market average.
pub const NARROW_FACTOR: f64 = 0.5;
/// Estimated revenue gain per service moved toward market equilibrium.
pub const PER_SERVICE_GAIN_PCT: f64 = 3.0;
/// Ceiling on the overall revenue increase estimate.
pub const MAX_ESTIMATED_GAIN_PCT: f64 = 25.0;

#[derive(Debug, Clone, Copy, PartialEq)]
enum Adjustment {
    /// Raise the low bound by the given fraction, keep the high bound.
    RaiseLow(f64),
    /// Interpolate both bounds toward the market average by the given factor.
    NarrowTowardAverage(f64),
    Hold,
}

struct Rule {
    adjustment: Adjustment,
    name: &'static str,
    rationale: &'static str,
}

/// The full (position x revenue trend) adjustment policy. Adding a rule means
/// adding a row here; every recommendation names the row that fired.
const RULES: [Rule; 6] = [
    Rule {
        // below / increasing
        adjustment: Adjustment::RaiseLow(RAISE_STEP_PCT),
        name: "below-market-rising-revenue",
        rationale: "priced below market while revenue is rising; there is room to raise the low bound",
    },
    Rule {
        // below / decreasing
        adjustment: Adjustment::RaiseLow(CAUTIOUS_RAISE_STEP_PCT),
        name: "below-market-softening-revenue",
        rationale: "priced below market but revenue is softening; raise the low bound cautiously",
    },
    Rule {
        // above / increasing
        adjustment: Adjustment::Hold,
        name: "above-market-rising-revenue",
        rationale: "premium pricing is holding up while revenue grows; keep the current range",
    },
    Rule {
        // above / decreasing
        adjustment: Adjustment::NarrowTowardAverage(NARROW_FACTOR),
        name: "above-market-falling-revenue",
        rationale: "premium pricing with falling revenue; narrow the range toward the market average",
    },
    Rule {
        // average / increasing
        adjustment: Adjustment::Hold,
        name: "at-market-rising-revenue",
        rationale: "at market rates with healthy revenue; no adjustment needed",
    },
    Rule {
        // average / decreasing
        adjustment: Adjustment::Hold,
        name: "at-market-softening-revenue",
        rationale: "at market rates; revenue softness is unlikely to be price-driven",
    },
];

fn rule_for(indicator: PriceIndicator, revenue: TrendDirection) -> &'static Rule {
    let idx = match (indicator, revenue) {
        (PriceIndicator::Below, TrendDirection::Increasing) => 0,
        (PriceIndicator::Below, TrendDirection::Decreasing) => 1,
        (PriceIndicator::Above, TrendDirection::Increasing) => 2,
        (PriceIndicator::Above, TrendDirection::Decreasing) => 3,
        (PriceIndicator::Average, TrendDirection::Increasing) => 4,
        (PriceIndicator::Average, TrendDirection::Decreasing) => 5,
    };
    &RULES[idx]
}

fn apply_adjustment(current: PriceBand, adjustment: Adjustment, average: f64) -> PriceBand {
    match adjustment {
        Adjustment::Hold => current,
        Adjustment::RaiseLow(pct) => {
            let low = current.low * (1.0 + pct);
            PriceBand::new(low, current.high.max(low))
        }
        Adjustment::NarrowTowardAverage(factor) => PriceBand::new(
            current.low + (average - current.low) * factor,
            current.high + (average - current.high) * factor,
        ),
    }
}

pub struct RecommendationEngine;

impl RecommendationEngine {
    /// Produces per-service recommendations plus the revenue and positioning
    /// summary. Deterministic rule-table lookup, no model in the loop: each
    /// recommendation's reasoning names the rule that fired.
    pub fn recommend(
        category: &str,
        current_pricing: &[ServicePricing],
        market: &MarketAverage,
        history: Option<&PriceTrend>,
    ) -> Result<PricingAnalysisResult, AnalysisError> {
        if current_pricing.is_empty() {
            return Err(AnalysisError::InsufficientData);
        }

        // Without history we assume softening revenue, which picks the
        // cautious row of the table.
        let revenue_trend = history
            .map(|t| t.revenue_trend)
            .unwrap_or(TrendDirection::Decreasing);
        let volatility = history.map(|t| t.price_volatility).unwrap_or(0.0);

        let mut recommendations = Vec::with_capacity(current_pricing.len());
        let mut key_strategies: Vec<String> = Vec::new();
        let mut moved = 0usize;

        for service in current_pricing {
            let current = service.price_range;
            let classification =
                PositionClassifier::classify(current.midpoint(), market.average_price)?;
            let rule = rule_for(classification.indicator, revenue_trend);
            let recommended = apply_adjustment(current, rule.adjustment, market.average_price);
            if recommended != current {
                moved += 1;
            }

            let strategy = PositionClassifier::strategy_for(
                PositionClassifier::classify(recommended.midpoint(), market.average_price)?
                    .indicator,
            );
            let reasoning = format!(
                "{}: {} (current {}, recommended {}, market average ${:.0})",
                rule.name, rule.rationale, current, recommended, market.average_price
            );
            if rule.adjustment != Adjustment::Hold
                && !key_strategies.iter().any(|s| s == rule.rationale)
            {
                key_strategies.push(rule.rationale.to_string());
            }

            recommendations.push(ServiceRecommendation {
                service_name: service.service_name.clone(),
                current_price_range: current,
                recommended_price_range: recommended,
                pricing_strategy: strategy,
                reasoning,
            });
        }

        let revenue_optimization = RevenueOptimization {
            estimated_revenue_increase_pct: estimate_revenue_increase(
                moved,
                volatility,
                market.average_price,
            ),
            implementation_timeline: timeline_for(moved).to_string(),
            key_strategies,
        };

        let overall_midpoint = current_pricing
            .iter()
            .map(|s| s.price_range.midpoint())
            .sum::<f64>()
            / current_pricing.len() as f64;
        let overall = PositionClassifier::classify(overall_midpoint, market.average_price)?;
        let target_position = PositionClassifier::strategy_for(overall.indicator);
        let competitive_positioning = CompetitivePositioning {
            target_position,
            price_advantage: overall.indicator,
            value_proposition: value_proposition(target_position, category),
        };

        Ok(PricingAnalysisResult {
            service_recommendations: recommendations,
            revenue_optimization,
            competitive_positioning,
        })
    }
}

/// Weighted estimate of the revenue upside. Monotonic in the number of
/// services moved toward equilibrium; volatile markets get a bonus because
/// they reprice faster. Tunable policy constants, not observed data.
fn estimate_revenue_increase(moved: usize, volatility: f64, average_price: f64) -> f64 {
    let volatility_ratio = if average_price > 0.0 {
        (volatility / average_price).min(0.5)
    } else {
        0.0
    };
    let estimate =
        (moved as f64 * PER_SERVICE_GAIN_PCT * (1.0 + volatility_ratio)).min(MAX_ESTIMATED_GAIN_PCT);
    (estimate * 10.0).round() / 10.0
}

fn timeline_for(moved: usize) -> &'static str {
    match moved {
        0 => "no changes required",
        1..=2 => "2-4 weeks",
        _ => "4-8 weeks",
    }
}

fn value_proposition(strategy: PricingStrategy, category: &str) -> String {
    match strategy {
        PricingStrategy::Premium => {
            format!("stand out in {category} on quality, not price")
        }
        PricingStrategy::Budget => {
            format!("win {category} customers on price against higher-priced competitors")
        }
        _ => format!("balanced value at the going {category} rate"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::MarketPosition;

    fn market(average: f64) -> MarketAverage {
        MarketAverage {
            average_price: average,
            price_range: PriceBand::new(average * 0.5, average * 1.5),
            market_position: MarketPosition::MarketWide,
        }
    }

    fn service(name: &str, low: f64, high: f64) -> ServicePricing {
        ServicePricing {
            service_name: name.into(),
            price_range: PriceBand::new(low, high),
        }
    }

    fn rising_trend() -> PriceTrend {
        PriceTrend {
            price_trend: TrendDirection::Increasing,
            revenue_trend: TrendDirection::Increasing,
            price_volatility: 0.0,
            optimal_price_range: PriceBand::new(50.0, 60.0),
        }
    }

    #[test]
    fn no_services_is_insufficient_data() {
        assert_eq!(
            RecommendationEngine::recommend("barber", &[], &market(60.0), None),
            Err(AnalysisError::InsufficientData)
        );
    }

    #[test]
    fn underpriced_service_with_rising_revenue_gets_low_bound_raise() {
        let services = [service("haircut", 30.0, 40.0)];
        let trend = rising_trend();
        let result =
            RecommendationEngine::recommend("barber", &services, &market(60.0), Some(&trend))
                .unwrap();

        let rec = &result.service_recommendations[0];
        assert_eq!(rec.recommended_price_range.low, 33.0);
        assert_eq!(rec.recommended_price_range.high, 40.0);
        assert!(rec.reasoning.contains("below-market-rising-revenue"));
        assert!(rec.recommended_price_range.is_well_formed());
    }

    #[test]
    fn overpriced_service_with_falling_revenue_narrows_toward_average() {
        let services = [service("massage", 90.0, 110.0)];
        let trend = PriceTrend {
            revenue_trend: TrendDirection::Decreasing,
            ..rising_trend()
        };
        let result =
            RecommendationEngine::recommend("spa", &services, &market(60.0), Some(&trend))
                .unwrap();

        let rec = &result.service_recommendations[0];
        // both bounds pulled halfway toward the 60 average
        assert_eq!(rec.recommended_price_range, PriceBand::new(75.0, 85.0));
        assert!(rec.reasoning.contains("above-market-falling-revenue"));
    }

    #[test]
    fn at_market_services_hold_their_range() {
        let services = [service("trim", 55.0, 65.0)];
        let trend = rising_trend();
        let result =
            RecommendationEngine::recommend("barber", &services, &market(60.0), Some(&trend))
                .unwrap();

        let rec = &result.service_recommendations[0];
        assert_eq!(rec.recommended_price_range, PriceBand::new(55.0, 65.0));
        assert_eq!(rec.pricing_strategy, PricingStrategy::Competitive);
        assert_eq!(
            result.revenue_optimization.estimated_revenue_increase_pct,
            0.0
        );
        assert_eq!(
            result.revenue_optimization.implementation_timeline,
            "no changes required"
        );
    }

    #[test]
    fn strategy_tracks_recommended_midpoint() {
        let services = [service("deluxe", 80.0, 100.0)];
        let trend = rising_trend();
        let result =
            RecommendationEngine::recommend("spa", &services, &market(60.0), Some(&trend))
                .unwrap();
        // above market, rising revenue: held at a premium position
        assert_eq!(
            result.service_recommendations[0].pricing_strategy,
            PricingStrategy::Premium
        );
        assert_eq!(
            result.competitive_positioning.target_position,
            PricingStrategy::Premium
        );
        assert_eq!(
            result.competitive_positioning.price_advantage,
            PriceIndicator::Above
        );
    }

    #[test]
    fn revenue_estimate_is_monotonic_in_services_moved() {
        let trend = rising_trend();
        let mut last = 0.0;
        for n in 1..=5 {
            let services: Vec<_> = (0..n)
                .map(|i| service(&format!("svc{i}"), 30.0, 40.0))
                .collect();
            let result =
                RecommendationEngine::recommend("barber", &services, &market(60.0), Some(&trend))
                    .unwrap();
            let estimate = result.revenue_optimization.estimated_revenue_increase_pct;
            assert!(estimate >= last, "estimate dropped at {n} services");
            last = estimate;
        }
    }

    #[test]
    fn missing_history_uses_the_cautious_rows() {
        let services = [service("haircut", 30.0, 40.0)];
        let result =
            RecommendationEngine::recommend("barber", &services, &market(60.0), None).unwrap();
        let rec = &result.service_recommendations[0];
        assert!(rec.reasoning.contains("below-market-softening-revenue"));
        assert_eq!(rec.recommended_price_range.low, 31.5);
    }
}
