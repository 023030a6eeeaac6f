use crate::analyzer::trend::derive_trends;
use crate::analyzer::{MarketAggregator, RecommendationEngine};
use crate::model::{AnalyzeError, PricingOverview, SourceError, SourceKind};
use crate::sources::{CurrentPricingSource, MarketComparisonSource, PriceHistorySource};
use rand::Rng;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

/// How many competitor listings the merged view carries; the consumer only
/// renders the top entries.
const MAX_COMPETITORS_SHOWN: usize = 5;

const RETRY_BACKOFF_MS: u64 = 250;

/// Fans out the three independent pricing fetches, waits for all of them and
/// merges whatever succeeded. The whole request fails only when every source
/// fails, or on an authentication failure, which is never retried.
pub struct PricingAnalysisOrchestrator {
    current: Arc<dyn CurrentPricingSource>,
    history: Arc<dyn PriceHistorySource>,
    market: Arc<dyn MarketComparisonSource>,
    fetch_timeout: Duration,
    retries: u32,
}

impl PricingAnalysisOrchestrator {
    pub fn new(
        current: Arc<dyn CurrentPricingSource>,
        history: Arc<dyn PriceHistorySource>,
        market: Arc<dyn MarketComparisonSource>,
        fetch_timeout: Duration,
        retries: u32,
    ) -> Self {
        Self {
            current,
            history,
            market,
            fetch_timeout,
            retries,
        }
    }

    /// One analysis request. Side-effect free; identical inputs against
    /// identical source data merge to an identical overview, so callers can
    /// retry and cache freely.
    pub async fn analyze(
        &self,
        business_id: i64,
        category: &str,
        location: &str,
        token: &str,
    ) -> Result<PricingOverview, AnalyzeError> {
        let (current, history, comparison) = tokio::join!(
            self.fetch_with_retry(SourceKind::CurrentAnalysis, || {
                self.current.fetch_current_pricing(business_id, token)
            }),
            self.fetch_with_retry(SourceKind::PriceHistory, || {
                self.history.fetch_price_history(business_id)
            }),
            self.fetch_with_retry(SourceKind::MarketComparison, || {
                self.market
                    .fetch_market_comparison(category, location, Some(business_id))
            }),
        );

        let mut failures: Vec<(SourceKind, SourceError)> = Vec::new();
        let current = note_failure(current, SourceKind::CurrentAnalysis, &mut failures);
        let history = note_failure(history, SourceKind::PriceHistory, &mut failures);
        let competitors = note_failure(comparison, SourceKind::MarketComparison, &mut failures);

        if failures
            .iter()
            .any(|(_, e)| matches!(e, SourceError::AuthRequired))
        {
            return Err(AnalyzeError::AuthRequired);
        }
        if failures.len() == 3 {
            return Err(AnalyzeError::PartialData { failures });
        }
        let failed_sources: Vec<SourceKind> = failures.iter().map(|(kind, _)| *kind).collect();

        // Mean midpoint of the business's own services personalizes the
        // market position.
        let own_price = current.as_ref().and_then(|services| {
            if services.is_empty() {
                None
            } else {
                let sum: f64 = services.iter().map(|s| s.price_range.midpoint()).sum();
                Some(sum / services.len() as f64)
            }
        });

        let market_average = competitors.as_ref().and_then(|observations| {
            match MarketAggregator::aggregate(observations, own_price) {
                Ok(market) => Some(market),
                Err(e) => {
                    warn!("market aggregation failed for business {business_id}: {e}");
                    None
                }
            }
        });

        let trends = history
            .as_ref()
            .and_then(|points| match derive_trends(points) {
                Ok(trend) => Some(trend),
                Err(e) => {
                    warn!("trend derivation failed for business {business_id}: {e}");
                    None
                }
            });

        let analysis = match (&current, &market_average) {
            (Some(services), Some(market)) => {
                match RecommendationEngine::recommend(category, services, market, trends.as_ref())
                {
                    Ok(analysis) => Some(analysis),
                    Err(e) => {
                        warn!("recommendation failed for business {business_id}: {e}");
                        None
                    }
                }
            }
            _ => None,
        };

        let competitors = competitors.map(|mut observations| {
            observations.truncate(MAX_COMPETITORS_SHOWN);
            observations
        });

        Ok(PricingOverview {
            business_id,
            analysis,
            price_history: history,
            trends,
            market_average,
            competitors,
            failed_sources,
        })
    }

    /// Runs one source fetch under the per-source timeout, retrying with
    /// backoff and jitter. Authentication failures are returned on the spot.
    async fn fetch_with_retry<T, F, Fut>(
        &self,
        kind: SourceKind,
        fetch: F,
    ) -> Result<T, SourceError>
    where
        F: Fn() -> Fut,
        Fut: Future<Output = Result<T, SourceError>>,
    {
        let mut attempt: u32 = 0;
        loop {
            let outcome = timeout(self.fetch_timeout, fetch()).await;
            let err = match outcome {
                Ok(Ok(value)) => return Ok(value),
                Ok(Err(e)) => e,
                Err(_) => SourceError::Timeout(self.fetch_timeout.as_secs()),
            };
            if !err.is_retryable() || attempt >= self.retries {
                return Err(err);
            }
            attempt += 1;
            let jitter: u64 = rand::rng().random_range(0..RETRY_BACKOFF_MS);
            debug!("{kind} fetch failed ({err}), retry {attempt}/{}", self.retries);
            sleep(Duration::from_millis(attempt as u64 * RETRY_BACKOFF_MS + jitter)).await;
        }
    }
}

fn note_failure<T>(
    result: Result<T, SourceError>,
    kind: SourceKind,
    failures: &mut Vec<(SourceKind, SourceError)>,
) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{kind} source failed: {e}");
            failures.push((kind, e));
            None
        }
    }
}
