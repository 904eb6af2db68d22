use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

use crate::errors::Result;

/// Configuration for the price collector
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// Base URL of the OSRS wiki real-time prices API
    #[serde(default = "default_prices_api_url")]
    pub prices_api_url: String,
    /// Page carrying the live player count
    #[serde(default = "default_homepage_url")]
    pub homepage_url: String,
    /// JSON item mapping; the API's `/mapping` is used when it can't be read
    #[serde(default = "default_item_mapping_path")]
    pub item_mapping_path: PathBuf,
    #[serde(default = "default_collection_interval_secs")]
    pub collection_interval_secs: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// The prices API rejects requests without a descriptive user agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_prices_api_url() -> String {
    "https://prices.runescape.wiki/api/v1/osrs".to_string()
}

fn default_homepage_url() -> String {
    "https://oldschool.runescape.com/".to_string()
}

fn default_item_mapping_path() -> PathBuf {
    PathBuf::from("mapping.json")
}

fn default_collection_interval_secs() -> u64 {
    300
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("runequant-grandexchange/{}", env!("CARGO_PKG_VERSION"))
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Ok(envy::from_env::<Config>()?)
    }

    pub fn collection_interval(&self) -> Duration {
        // a zero period would panic in tokio::time::interval
        Duration::from_secs(self.collection_interval_secs.max(1))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
