// Core structs: observations, trends, recommendations, dynamic pricing config
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use thiserror::Error;

/// Inclusive price band, serialized as decimal bounds.
/// Renders as `$40-$80` in reasoning strings and logs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBand {
    pub low: f64,
    pub high: f64,
}

impl PriceBand {
    pub fn new(low: f64, high: f64) -> Self {
        Self { low, high }
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }

    pub fn is_well_formed(&self) -> bool {
        self.low.is_finite() && self.high.is_finite() && self.low <= self.high
    }
}

impl fmt::Display for PriceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.0}-${:.0}", self.low, self.high)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PricingStrategy {
    Premium,
    Competitive,
    Budget,
    Unknown,
}

impl fmt::Display for PricingStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PricingStrategy::Premium => "premium",
            PricingStrategy::Competitive => "competitive",
            PricingStrategy::Budget => "budget",
            PricingStrategy::Unknown => "unknown",
        };
        f.write_str(s)
    }
}

/// Where a single price sits relative to the market average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceIndicator {
    Above,
    Below,
    Average,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Increasing,
    Decreasing,
}

/// Market position of a business, or `market-wide` when no business
/// context was supplied to the aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MarketPosition {
    Above,
    Below,
    Average,
    MarketWide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UpdateFrequency {
    Hourly,
    Daily,
    Weekly,
}

/// One competitor price listing. Immutable snapshot from the market
/// comparison source; the engine never mutates these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceObservation {
    pub business_id: i64,
    pub name: String,
    pub location: String,
    pub base_price: f64,
    pub pricing_strategy: PricingStrategy,
}

/// Summary statistics over a non-empty set of observations.
/// Built by the market aggregator; `price_range.low <= average_price <= price_range.high`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketAverage {
    pub average_price: f64,
    pub price_range: PriceBand,
    pub market_position: MarketPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistoryPoint {
    pub date: NaiveDate,
    pub price: f64,
    pub demand: f64,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceTrend {
    pub price_trend: TrendDirection,
    pub revenue_trend: TrendDirection,
    pub price_volatility: f64,
    pub optimal_price_range: PriceBand,
}

/// A business's current asking range for one service line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServicePricing {
    pub service_name: String,
    pub price_range: PriceBand,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceRecommendation {
    pub service_name: String,
    pub current_price_range: PriceBand,
    pub recommended_price_range: PriceBand,
    pub pricing_strategy: PricingStrategy,
    pub reasoning: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueOptimization {
    pub estimated_revenue_increase_pct: f64,
    pub implementation_timeline: String,
    pub key_strategies: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetitivePositioning {
    pub target_position: PricingStrategy,
    pub price_advantage: PriceIndicator,
    pub value_proposition: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingAnalysisResult {
    pub service_recommendations: Vec<ServiceRecommendation>,
    pub revenue_optimization: RevenueOptimization,
    pub competitive_positioning: CompetitivePositioning,
}

/// Dynamic pricing policy for one business. The only entity with a real
/// save/update lifecycle; validated before every write, disabled rather
/// than deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DynamicPricingConfig {
    pub enabled: bool,
    pub base_price_adjustment_pct: f64,
    pub demand_multiplier: f64,
    pub seasonal_adjustments: HashMap<String, f64>,
    pub competitor_tracking: bool,
    pub auto_adjust: bool,
    pub min_price: f64,
    pub max_price: f64,
    pub update_frequency: UpdateFrequency,
}

/// Which of the three independent data sources a value came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    CurrentAnalysis,
    PriceHistory,
    MarketComparison,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SourceKind::CurrentAnalysis => "current-analysis",
            SourceKind::PriceHistory => "price-history",
            SourceKind::MarketComparison => "market-comparison",
        };
        f.write_str(s)
    }
}

/// Merged best-effort view assembled by the orchestrator. Sections whose
/// source failed are `None` and listed in `failed_sources`, never fabricated.
/// Carries no timestamp so repeated calls with identical inputs serialize
/// identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingOverview {
    pub business_id: i64,
    pub analysis: Option<PricingAnalysisResult>,
    pub price_history: Option<Vec<PriceHistoryPoint>>,
    pub trends: Option<PriceTrend>,
    pub market_average: Option<MarketAverage>,
    pub competitors: Option<Vec<PriceObservation>>,
    pub failed_sources: Vec<SourceKind>,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("min_price {min} exceeds max_price {max}")]
    RangeInvalid { min: f64, max: f64 },
    #[error("demand_multiplier must be positive, got {0}")]
    InvalidMultiplier(f64),
    #[error("auto_adjust requires dynamic pricing to be enabled")]
    InconsistentAutoAdjust,
}

#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    #[error("no market observations to aggregate")]
    EmptyMarket,
    #[error("market average price is zero")]
    DivisionByZero,
    #[error("current pricing contains no service entries")]
    InsufficientData,
}

#[derive(Debug, Error)]
pub enum SourceError {
    #[error("authentication required")]
    AuthRequired,
    #[error("http error: {0}")]
    Http(String),
    #[error("source timed out after {0}s")]
    Timeout(u64),
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl SourceError {
    /// Auth failures must surface immediately; everything else may be retried.
    pub fn is_retryable(&self) -> bool {
        !matches!(self, SourceError::AuthRequired)
    }
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("authentication required for pricing analysis")]
    AuthRequired,
    #[error("all pricing data sources failed: {}", format_failures(.failures))]
    PartialData {
        failures: Vec<(SourceKind, SourceError)>,
    },
}

fn format_failures(failures: &[(SourceKind, SourceError)]) -> String {
    failures
        .iter()
        .map(|(kind, err)| format!("{kind}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),
    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("not found")]
    NotFound,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_band_display_matches_wire_format() {
        let band = PriceBand::new(40.0, 80.0);
        assert_eq!(band.to_string(), "$40-$80");
    }

    #[test]
    fn enums_serialize_as_fixed_lowercase_strings() {
        assert_eq!(
            serde_json::to_string(&PricingStrategy::Premium).unwrap(),
            "\"premium\""
        );
        assert_eq!(
            serde_json::to_string(&MarketPosition::MarketWide).unwrap(),
            "\"market-wide\""
        );
        assert_eq!(
            serde_json::to_string(&TrendDirection::Increasing).unwrap(),
            "\"increasing\""
        );
        assert_eq!(
            serde_json::to_string(&SourceKind::CurrentAnalysis).unwrap(),
            "\"current-analysis\""
        );
    }

    #[test]
    fn auth_errors_are_never_retryable() {
        assert!(!SourceError::AuthRequired.is_retryable());
        assert!(SourceError::Timeout(10).is_retryable());
        assert!(SourceError::Http("502".into()).is_retryable());
    }
}
