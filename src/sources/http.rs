use crate::model::{PriceHistoryPoint, PriceObservation, ServicePricing, SourceError};
use crate::sources::{CurrentPricingSource, MarketComparisonSource, PriceHistorySource};
use crate::utils::{parse_date, parse_price_band};
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use std::time::Duration;

/// HTTP client for the three pricing endpoints of the host platform.
pub struct HttpPricingApi {
    client: Client,
    base_url: String,
    timeout_secs: u64,
}

/// Wire shape of one service entry; ranges arrive as `$40-$80` strings.
#[derive(Debug, Deserialize)]
struct ServicePricingDto {
    service_name: String,
    price_range: String,
}

#[derive(Debug, Deserialize)]
struct CurrentPricingDto {
    services: Vec<ServicePricingDto>,
}

#[derive(Debug, Deserialize)]
struct HistoryPointDto {
    date: String,
    price: f64,
    demand: f64,
    revenue: f64,
}

#[derive(Debug, Deserialize)]
struct PriceHistoryDto {
    price_history: Vec<HistoryPointDto>,
}

#[derive(Debug, Deserialize)]
struct ComparisonDto {
    comparison_data: Vec<PriceObservation>,
}

impl HttpPricingApi {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, SourceError> {
        let client = Client::builder()
            .user_agent("PricePulse/0.1")
            .timeout(timeout)
            .build()
            .map_err(|e| SourceError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout_secs: timeout.as_secs(),
        })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
        token: Option<&str>,
    ) -> Result<T, SourceError> {
        let mut request = self.client.get(url);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                SourceError::Timeout(self.timeout_secs)
            } else {
                SourceError::Http(e.to_string())
            }
        })?;

        match response.status() {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(SourceError::AuthRequired),
            status if !status.is_success() => {
                Err(SourceError::Http(format!("{url} returned {status}")))
            }
            _ => response
                .json::<T>()
                .await
                .map_err(|e| SourceError::InvalidResponse(e.to_string())),
        }
    }
}

#[async_trait::async_trait]
impl CurrentPricingSource for HttpPricingApi {
    async fn fetch_current_pricing(
        &self,
        business_id: i64,
        token: &str,
    ) -> Result<Vec<ServicePricing>, SourceError> {
        if token.is_empty() {
            return Err(SourceError::AuthRequired);
        }
        let url = format!("{}/businesses/{}/pricing-analysis", self.base_url, business_id);
        let dto: CurrentPricingDto = self.get_json(&url, Some(token)).await?;

        dto.services
            .into_iter()
            .map(|s| {
                let price_range = parse_price_band(&s.price_range).ok_or_else(|| {
                    SourceError::InvalidResponse(format!(
                        "bad price range {:?} for service {}",
                        s.price_range, s.service_name
                    ))
                })?;
                Ok(ServicePricing {
                    service_name: s.service_name,
                    price_range,
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl PriceHistorySource for HttpPricingApi {
    async fn fetch_price_history(
        &self,
        business_id: i64,
    ) -> Result<Vec<PriceHistoryPoint>, SourceError> {
        let url = format!("{}/businesses/{}/price-history", self.base_url, business_id);
        let dto: PriceHistoryDto = self.get_json(&url, None).await?;

        dto.price_history
            .into_iter()
            .map(|p| {
                let date = parse_date(&p.date).ok_or_else(|| {
                    SourceError::InvalidResponse(format!("bad date {:?}", p.date))
                })?;
                Ok(PriceHistoryPoint {
                    date,
                    price: p.price,
                    demand: p.demand,
                    revenue: p.revenue,
                })
            })
            .collect()
    }
}

#[async_trait::async_trait]
impl MarketComparisonSource for HttpPricingApi {
    async fn fetch_market_comparison(
        &self,
        category: &str,
        location: &str,
        business_id: Option<i64>,
    ) -> Result<Vec<PriceObservation>, SourceError> {
        let mut url = format!(
            "{}/market/comparison?category={}&location={}",
            self.base_url, category, location
        );
        if let Some(id) = business_id {
            url.push_str(&format!("&business_id={id}"));
        }
        let dto: ComparisonDto = self.get_json(&url, None).await?;
        if dto.comparison_data.is_empty() {
            return Err(SourceError::InvalidResponse(
                "no comparable businesses in this market".into(),
            ));
        }
        Ok(dto.comparison_data)
    }
}
