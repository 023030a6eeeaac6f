use serde::Deserialize;
use std::fs;

#[derive(Debug, Clone, Deserialize)]
pub struct BusinessConfig {
    pub business_id: i64,
    pub name: String,
    pub category: String,
    pub location: String,
}

#[derive(Debug, Deserialize)]
pub struct AppConfig {
    pub api_base_url: String,
    pub auth_token: String,
    pub businesses: Vec<BusinessConfig>,
    pub check_interval_seconds: u64,
    pub fetch_timeout_seconds: u64,
    #[serde(default = "default_retries")]
    pub source_retries: u32,
}

fn default_retries() -> u32 {
    2
}

pub fn load_config(path: &str) -> Result<AppConfig, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let config: AppConfig = serde_json::from_str(&content)?;
    Ok(config)
}
