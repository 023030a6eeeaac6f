pub mod http;

use crate::model::{PriceHistoryPoint, PriceObservation, ServicePricing, SourceError};

pub use http::HttpPricingApi;

/// Authenticated source for a business's own current service pricing.
#[async_trait::async_trait]
pub trait CurrentPricingSource: Send + Sync {
    async fn fetch_current_pricing(
        &self,
        business_id: i64,
        token: &str,
    ) -> Result<Vec<ServicePricing>, SourceError>;
}

/// Unauthenticated source for a business's price/demand/revenue history.
#[async_trait::async_trait]
pub trait PriceHistorySource: Send + Sync {
    async fn fetch_price_history(
        &self,
        business_id: i64,
    ) -> Result<Vec<PriceHistoryPoint>, SourceError>;
}

/// Unauthenticated source for competitor listings in a category + location.
/// The optional business id personalizes the comparison.
#[async_trait::async_trait]
pub trait MarketComparisonSource: Send + Sync {
    async fn fetch_market_comparison(
        &self,
        category: &str,
        location: &str,
        business_id: Option<i64>,
    ) -> Result<Vec<PriceObservation>, SourceError>;
}
