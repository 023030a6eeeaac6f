use crate::analyzer::position::PositionClassifier;
use crate::model::{AnalysisError, MarketAverage, MarketPosition, PriceBand, PriceIndicator, PriceObservation};

pub struct MarketAggregator;

impl MarketAggregator {
    /// Reduces competitor observations to mean and range. When the caller
    /// supplies its own price, `market_position` is personalized with the
    /// classifier thresholds; otherwise it stays `market-wide`.
    pub fn aggregate(
        observations: &[PriceObservation],
        own_price: Option<f64>,
    ) -> Result<MarketAverage, AnalysisError> {
        if observations.is_empty() {
            return Err(AnalysisError::EmptyMarket);
        }

        let prices: Vec<f64> = observations.iter().map(|o| o.base_price).collect();
        let average_price = prices.iter().sum::<f64>() / prices.len() as f64;
        let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
        let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        let market_position = match own_price {
            None => MarketPosition::MarketWide,
            Some(price) => {
                match PositionClassifier::classify(price, average_price)?.indicator {
                    PriceIndicator::Above => MarketPosition::Above,
                    PriceIndicator::Below => MarketPosition::Below,
                    PriceIndicator::Average => MarketPosition::Average,
                }
            }
        };

        Ok(MarketAverage {
            average_price,
            price_range: PriceBand::new(min, max),
            market_position,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::PricingStrategy;

    fn obs(price: f64) -> PriceObservation {
        PriceObservation {
            business_id: 0,
            name: "competitor".into(),
            location: "downtown".into(),
            base_price: price,
            pricing_strategy: PricingStrategy::Unknown,
        }
    }

    #[test]
    fn computes_mean_and_range() {
        let observations = vec![obs(40.0), obs(60.0), obs(80.0)];
        let avg = MarketAggregator::aggregate(&observations, None).unwrap();
        assert_eq!(avg.average_price, 60.0);
        assert_eq!(avg.price_range, PriceBand::new(40.0, 80.0));
        assert_eq!(avg.market_position, MarketPosition::MarketWide);
    }

    #[test]
    fn personalizes_position_when_own_price_supplied() {
        let observations = vec![obs(40.0), obs(60.0), obs(80.0)];
        let avg = MarketAggregator::aggregate(&observations, Some(70.0)).unwrap();
        assert_eq!(avg.market_position, MarketPosition::Above);

        let avg = MarketAggregator::aggregate(&observations, Some(55.0)).unwrap();
        assert_eq!(avg.market_position, MarketPosition::Average);
    }

    #[test]
    fn empty_market_is_an_error() {
        assert_eq!(
            MarketAggregator::aggregate(&[], None),
            Err(AnalysisError::EmptyMarket)
        );
    }

    #[test]
    fn average_stays_inside_range() {
        let sets = [
            vec![12.5],
            vec![10.0, 90.0],
            vec![33.0, 34.0, 35.0, 120.0],
            vec![5.0, 5.0, 5.0],
        ];
        for prices in sets {
            let observations: Vec<_> = prices.iter().copied().map(obs).collect();
            let avg = MarketAggregator::aggregate(&observations, None).unwrap();
            assert!(avg.price_range.low <= avg.average_price);
            assert!(avg.average_price <= avg.price_range.high);
        }
    }
}
