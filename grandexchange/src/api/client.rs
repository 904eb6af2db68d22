use reqwest::Client;
use serde_json::Value;
use std::collections::HashMap;
use std::time::Duration;

use super::models::{PriceWindow, Window};
use crate::errors::Result;
use crate::mapping::parse_item_mapping;

/// Client for the OSRS wiki real-time prices API
#[derive(Clone)]
pub struct PricesClient {
    base_url: String,
    client: Client,
}

impl PricesClient {
    pub fn new(base_url: &str, user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn http(&self) -> &Client {
        &self.client
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Fetch the latest averages for `window`
    pub async fn latest_window(&self, window: Window) -> Result<PriceWindow> {
        let prices = self
            .client
            .get(self.url(window.path()))
            .send()
            .await?
            .error_for_status()?
            .json::<PriceWindow>()
            .await?;

        tracing::debug!(
            "Fetched {} prices for timestamp: {:?}",
            window.path(),
            prices.timestamp
        );
        Ok(prices)
    }

    /// Item id to name mapping published by the API
    pub async fn item_mapping(&self) -> Result<HashMap<String, String>> {
        let content = self
            .client
            .get(self.url("mapping"))
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        Ok(parse_item_mapping(&content))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joins_without_double_slash() {
        let client = PricesClient::new(
            "https://prices.runescape.wiki/api/v1/osrs/",
            "runequant-test",
            Duration::from_secs(5),
        )
        .unwrap();

        assert_eq!(
            client.url(Window::OneHour.path()),
            "https://prices.runescape.wiki/api/v1/osrs/1h"
        );
        assert_eq!(
            client.url("mapping"),
            "https://prices.runescape.wiki/api/v1/osrs/mapping"
        );
    }
}
