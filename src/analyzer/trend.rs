use crate::model::{AnalysisError, PriceBand, PriceHistoryPoint, PriceTrend, TrendDirection};

/// Share of history points (by revenue) considered when deriving the
/// optimal price range.
const TOP_REVENUE_SHARE: f64 = 1.0 / 3.0;

/// Derives trend metrics from an ordered price history. Needs at least two
/// points; a single sample has no direction.
pub fn derive_trends(history: &[PriceHistoryPoint]) -> Result<PriceTrend, AnalysisError> {
    if history.len() < 2 {
        return Err(AnalysisError::InsufficientData);
    }

    let first = &history[0];
    let last = &history[history.len() - 1];
    let price_trend = direction(first.price, last.price);
    let revenue_trend = direction(first.revenue, last.revenue);

    let prices: Vec<f64> = history.iter().map(|p| p.price).collect();
    let count = prices.len() as f64;
    let mean = prices.iter().sum::<f64>() / count;
    let variance = prices.iter().map(|p| (p - mean).powi(2)).sum::<f64>() / count;
    let price_volatility = variance.sqrt();

    Ok(PriceTrend {
        price_trend,
        revenue_trend,
        price_volatility,
        optimal_price_range: optimal_range(history),
    })
}

fn direction(first: f64, last: f64) -> TrendDirection {
    if last >= first {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    }
}

/// Price band spanned by the best-earning third of the history. The prices
/// that produced the most revenue are where this business should sit.
fn optimal_range(history: &[PriceHistoryPoint]) -> PriceBand {
    let mut by_revenue: Vec<&PriceHistoryPoint> = history.iter().collect();
    by_revenue.sort_by(|a, b| b.revenue.total_cmp(&a.revenue));
    let take = ((history.len() as f64 * TOP_REVENUE_SHARE).ceil() as usize).max(1);

    let top = &by_revenue[..take];
    let low = top.iter().map(|p| p.price).fold(f64::INFINITY, f64::min);
    let high = top.iter().map(|p| p.price).fold(f64::NEG_INFINITY, f64::max);
    PriceBand::new(low, high)
}
