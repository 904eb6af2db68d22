use serde::Deserialize;
use std::collections::BTreeMap;

/// Averaging period served by the prices API
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    FiveMinutes,
    OneHour,
}

impl Window {
    pub fn path(&self) -> &'static str {
        match self {
            Window::FiveMinutes => "5m",
            Window::OneHour => "1h",
        }
    }
}

/// Average prices for one window, keyed by item id
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PriceWindow {
    #[serde(default)]
    pub data: BTreeMap<String, PricePoint>,
    #[serde(default)]
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PricePoint {
    pub avg_high_price: Option<i64>,
    pub high_price_volume: Option<i64>,
    pub avg_low_price: Option<i64>,
    pub low_price_volume: Option<i64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_window_response() {
        let body = r#"{
            "data": {
                "2": {"avgHighPrice": 190, "highPriceVolume": 512034, "avgLowPrice": 186, "lowPriceVolume": 88213},
                "6": {"avgHighPrice": null, "highPriceVolume": 0, "avgLowPrice": 191542, "lowPriceVolume": 3}
            },
            "timestamp": 1709895600
        }"#;

        let window: PriceWindow = serde_json::from_str(body).unwrap();
        assert_eq!(window.timestamp, Some(1709895600));
        assert_eq!(window.data.len(), 2);
        assert_eq!(window.data["2"].avg_high_price, Some(190));
        assert_eq!(window.data["6"].avg_high_price, None);
        assert_eq!(window.data["6"].low_price_volume, Some(3));
    }

    #[test]
    fn test_parse_sparse_point() {
        let window: PriceWindow = serde_json::from_str(r#"{"data": {"4151": {}}}"#).unwrap();
        assert_eq!(window.timestamp, None);
        assert_eq!(window.data["4151"], PricePoint::default());
    }
}
