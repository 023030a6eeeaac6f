mod analyzer;
mod config;
mod model;
mod orchestrator;
mod sources;
mod storage;
mod utils;
mod validator;

use config::{AppConfig, BusinessConfig, load_config};
use futures::future::join_all;
use model::{AnalyzeError, DynamicPricingConfig, UpdateFrequency};
use orchestrator::PricingAnalysisOrchestrator;
use sources::HttpPricingApi;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use storage::SqliteStorage;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{error, info, warn};
use validator::ConfigValidator;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("😱 Panic occurred: {:?}", panic_info);
    }));

    let config: Arc<AppConfig> = match load_config("config.json") {
        Ok(cfg) => Arc::new(cfg),
        Err(e) => {
            error!("Config load error: {}", e);
            return;
        }
    };

    let storage = match SqliteStorage::new("data.db") {
        Ok(s) => Arc::new(Mutex::new(s)),
        Err(e) => {
            error!("Failed to initialize storage: {:?}", e);
            return;
        }
    };

    let api = match HttpPricingApi::new(
        &config.api_base_url,
        Duration::from_secs(config.fetch_timeout_seconds),
    ) {
        Ok(api) => Arc::new(api),
        Err(e) => {
            error!("Failed to initialize pricing API client: {:?}", e);
            return;
        }
    };

    let orchestrator = Arc::new(PricingAnalysisOrchestrator::new(
        api.clone(),
        api.clone(),
        api.clone(),
        Duration::from_secs(config.fetch_timeout_seconds),
        config.source_retries,
    ));

    info!("🚀 PricePulse started, {} businesses configured", config.businesses.len());

    loop {
        let tasks: Vec<_> = config
            .businesses
            .iter()
            .map(|business| {
                process_business(business, orchestrator.clone(), storage.clone(), config.clone())
            })
            .collect();
        join_all(tasks).await;

        info!(
            "Waiting {}s until the next analysis pass...",
            config.check_interval_seconds
        );
        tokio::select! {
            _ = sleep(Duration::from_secs(config.check_interval_seconds)) => {}
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }
}

/// Runs one full analysis pass for a business and logs the merged view the
/// same way a consumer would render it.
async fn process_business(
    business: &BusinessConfig,
    orchestrator: Arc<PricingAnalysisOrchestrator>,
    storage: Arc<Mutex<SqliteStorage>>,
    config: Arc<AppConfig>,
) {
    info!("Analyzing business: {} ({})", business.name, business.business_id);

    // First run seeds a disabled default config so the business always has
    // a validated policy on record.
    {
        let storage_guard = storage.lock().await;
        match storage_guard.get_config(business.business_id) {
            Ok(Some(existing)) => {
                info!(
                    "Dynamic pricing for {}: enabled={}, auto_adjust={}",
                    business.name, existing.enabled, existing.auto_adjust
                );
            }
            Ok(None) => {
                if let Err(e) =
                    apply_dynamic_pricing(&storage_guard, business.business_id, default_config())
                {
                    warn!("Failed to seed default config for {}: {}", business.name, e);
                }
            }
            Err(e) => warn!("Config lookup failed for {}: {:?}", business.name, e),
        }
    }

    let overview = match orchestrator
        .analyze(
            business.business_id,
            &business.category,
            &business.location,
            &config.auth_token,
        )
        .await
    {
        Ok(overview) => overview,
        Err(AnalyzeError::AuthRequired) => {
            error!("Authentication required for {}; skipping", business.name);
            return;
        }
        Err(e) => {
            warn!("Analysis failed for {}: {}", business.name, e);
            return;
        }
    };

    for source in &overview.failed_sources {
        warn!("{}: {} source unavailable, section omitted", business.name, source);
    }

    if let Some(market) = &overview.market_average {
        info!(
            "{}: market avg {:.2}, range {}, position {:?}",
            business.name, market.average_price, market.price_range, market.market_position
        );
    }
    if let Some(trends) = &overview.trends {
        info!(
            "{}: price trend {:?}, revenue trend {:?}, volatility {:.2}, optimal range {}",
            business.name,
            trends.price_trend,
            trends.revenue_trend,
            trends.price_volatility,
            trends.optimal_price_range
        );
    }
    if let Some(analysis) = &overview.analysis {
        info!(
            "{}: estimated revenue increase {:.1}% ({})",
            business.name,
            analysis.revenue_optimization.estimated_revenue_increase_pct,
            analysis.revenue_optimization.implementation_timeline
        );
        for rec in &analysis.service_recommendations {
            info!(
                "{} / {}: {} -> {} [{}]",
                business.name,
                rec.service_name,
                rec.current_price_range,
                rec.recommended_price_range,
                rec.pricing_strategy
            );
        }
    }
}

/// Validate-then-persist for a dynamic pricing config write.
fn apply_dynamic_pricing(
    storage: &SqliteStorage,
    business_id: i64,
    candidate: DynamicPricingConfig,
) -> Result<DynamicPricingConfig, String> {
    let validated = ConfigValidator::validate(candidate).map_err(|e| e.to_string())?;
    for warning in &validated.warnings {
        warn!("Config warning for business {}: {}", business_id, warning);
    }
    storage
        .save_config(business_id, &validated.config)
        .map_err(|e| e.to_string())?;
    Ok(validated.config)
}

/// Initial policy for a business that has never configured dynamic pricing:
/// everything off, tracking on.
fn default_config() -> DynamicPricingConfig {
    DynamicPricingConfig {
        enabled: false,
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
