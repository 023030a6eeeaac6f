pub mod market_stats;
pub mod position;
pub mod recommendation;
pub mod trend;

pub use market_stats::MarketAggregator;
pub use position::PositionClassifier;
pub use recommendation::RecommendationEngine;
