use chrono::{DateTime, Utc};
use runequant::db::models::bson_datetime;
use runequant::db::PriceRecord;
use runequant::DbClient;
use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

use crate::api::client::PricesClient;
use crate::api::models::{PriceWindow, Window};
use crate::errors::Result;
use crate::mapping::{item_name, resolve_item_mapping};
use crate::player_count::fetch_player_count;

/// Number of items echoed to the log after each cycle
const SAMPLE_SIZE: usize = 5;

/// Periodically snapshots Grand Exchange prices into MongoDB
pub struct Collector {
    db: DbClient,
    prices: PricesClient,
    homepage_url: String,
    mapping_path: PathBuf,
    names: Option<HashMap<String, String>>,
}

impl Collector {
    pub fn new(
        db: DbClient,
        prices: PricesClient,
        homepage_url: &str,
        mapping_path: PathBuf,
    ) -> Self {
        Self {
            db,
            prices,
            homepage_url: homepage_url.to_string(),
            mapping_path,
            names: None,
        }
    }

    // Cached once non-empty; an empty mapping is retried next cycle
    async fn item_names(&mut self) -> &HashMap<String, String> {
        if self.names.as_ref().map_or(true, HashMap::is_empty) {
            let names = resolve_item_mapping(&self.mapping_path, &self.prices).await;
            self.names = Some(names);
        }
        self.names.get_or_insert_with(HashMap::new)
    }

    /// Run one collection cycle and return the number of records saved
    pub async fn collect_prices(&mut self) -> Result<usize> {
        let prices = self.prices.clone();
        let homepage_url = self.homepage_url.clone();

        let (names, player_count, five_min, one_hour) = tokio::join!(
            async { self.item_names().await.clone() },
            fetch_player_count(prices.http(), &homepage_url),
            fetch_window(&prices, Window::FiveMinutes),
            fetch_window(&prices, Window::OneHour),
        );

        let records = build_records(&five_min, &one_hour, &names, player_count, Utc::now());
        let batch: Vec<PriceRecord> = records.values().cloned().collect();
        let saved = self.db.insert_price_records(&batch).await?;

        log_sample(&records);
        tracing::info!("Total items processed: {}", records.len());

        Ok(saved)
    }
}

// A failed window is logged and treated as empty
async fn fetch_window(prices: &PricesClient, window: Window) -> PriceWindow {
    match prices.latest_window(window).await {
        Ok(prices) => prices,
        Err(e) => {
            tracing::error!("Error fetching {} prices: {}", window.path(), e);
            PriceWindow::default()
        }
    }
}

/// Merge both windows into one record per item.
///
/// Items in the 5 minute window carry its prices; items only in the hourly
/// window get empty 5 minute fields. Hourly prices are then filled in for
/// every item the hourly window knows.
pub fn build_records(
    five_min: &PriceWindow,
    one_hour: &PriceWindow,
    names: &HashMap<String, String>,
    player_count: Option<u64>,
    now: DateTime<Utc>,
) -> BTreeMap<String, PriceRecord> {
    let timestamp_elapsed = five_min
        .timestamp
        .map_or(0, |ts| now.timestamp() - ts);
    let gst = now.format("%Y-%m-%d %H:%M:%S GMT").to_string();
    let collection_time = bson_datetime(now);
    let player_count = player_count.and_then(|count| i64::try_from(count).ok());

    let blank = |item_id: &str| PriceRecord {
        timestamp: five_min.timestamp,
        item_id: item_id.to_string(),
        collection_time,
        item_name: item_name(names, item_id),
        high_price_5m: None,
        high_volume_5m: None,
        low_price_5m: None,
        low_volume_5m: None,
        high_price_1h: None,
        high_volume_1h: None,
        low_price_1h: None,
        low_volume_1h: None,
        player_count,
        timestamp_elapsed,
        gst: gst.clone(),
    };

    let mut records: BTreeMap<String, PriceRecord> = BTreeMap::new();

    for (item_id, point) in &five_min.data {
        let record = records
            .entry(item_id.clone())
            .or_insert_with(|| blank(item_id.as_str()));
        record.high_price_5m = point.avg_high_price;
        record.high_volume_5m = point.high_price_volume;
        record.low_price_5m = point.avg_low_price;
        record.low_volume_5m = point.low_price_volume;
    }

    for (item_id, point) in &one_hour.data {
        let record = records
            .entry(item_id.clone())
            .or_insert_with(|| blank(item_id.as_str()));
        record.high_price_1h = point.avg_high_price;
        record.high_volume_1h = point.high_price_volume;
        record.low_price_1h = point.avg_low_price;
        record.low_volume_1h = point.low_price_volume;
    }

    records
}

fn field(value: Option<i64>) -> String {
    value.map_or_else(|| "N/A".to_string(), |v| v.to_string())
}

fn log_sample(records: &BTreeMap<String, PriceRecord>) {
    for (item_id, record) in records.iter().take(SAMPLE_SIZE) {
        tracing::info!("Item ID: {} - Name: {}", item_id, record.item_name);
        tracing::info!("  high_price_1h: {}", field(record.high_price_1h));
        tracing::info!("  high_price_5m: {}", field(record.high_price_5m));
        tracing::info!("  high_volume_1h: {}", field(record.high_volume_1h));
        tracing::info!("  high_volume_5m: {}", field(record.high_volume_5m));
        tracing::info!("  low_price_1h: {}", field(record.low_price_1h));
        tracing::info!("  low_price_5m: {}", field(record.low_price_5m));
        tracing::info!("  low_volume_1h: {}", field(record.low_volume_1h));
        tracing::info!("  low_volume_5m: {}", field(record.low_volume_5m));
        tracing::info!("  player_count: {}", field(record.player_count));
        tracing::info!("  timestampElapsed: {}", record.timestamp_elapsed);
        tracing::info!("  gst: {}", record.gst);
        tracing::info!("---");
    }
}
