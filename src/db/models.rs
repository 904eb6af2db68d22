use chrono::{DateTime, Utc};
use mongodb::bson;
use serde::{Deserialize, Deserializer, Serialize};

/// One item's prices from a single collection cycle, as stored in `price_data`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceRecord {
    /// API timestamp of the 5 minute window, unix seconds
    pub timestamp: Option<i64>,
    pub item_id: String,
    pub collection_time: bson::DateTime,
    pub item_name: String,

    pub high_price_5m: Option<i64>,
    pub high_volume_5m: Option<i64>,
    pub low_price_5m: Option<i64>,
    pub low_volume_5m: Option<i64>,

    #[serde(default)]
    pub high_price_1h: Option<i64>,
    #[serde(default)]
    pub high_volume_1h: Option<i64>,
    #[serde(default)]
    pub low_price_1h: Option<i64>,
    #[serde(default)]
    pub low_volume_1h: Option<i64>,

    #[serde(default, deserialize_with = "lenient_count")]
    pub player_count: Option<i64>,
    #[serde(rename = "timestampElapsed")]
    pub timestamp_elapsed: i64,
    pub gst: String,
}

impl PriceRecord {
    pub fn collected_at(&self) -> DateTime<Utc> {
        self.collection_time.to_chrono()
    }
}

/// Convert a wall-clock time to the BSON date stored in `collection_time`
pub fn bson_datetime(time: DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_chrono(time)
}

/// Filter for reading back price records
#[derive(Debug, Clone, Default)]
pub struct PriceQuery {
    /// Only records with `collection_time >= since`
    pub since: Option<DateTime<Utc>>,
    pub item_id: Option<String>,
}

impl PriceQuery {
    /// Records from the last `days` days. Zero, or a window reaching past the
    /// earliest representable date, means no date filter.
    pub fn last_days(days: u32, now: DateTime<Utc>) -> Self {
        let since = match days {
            0 => None,
            days => chrono::Duration::try_days(i64::from(days))
                .and_then(|window| now.checked_sub_signed(window)),
        };
        Self {
            since,
            item_id: None,
        }
    }

    pub fn with_item(mut self, item_id: Option<String>) -> Self {
        self.item_id = item_id;
        self
    }

    pub fn to_filter(&self) -> bson::Document {
        let mut filter = bson::Document::new();
        if let Some(since) = self.since {
            filter.insert(
                "collection_time",
                bson::doc! { "$gte": bson_datetime(since) },
            );
        }
        if let Some(item_id) = &self.item_id {
            filter.insert("item_id", item_id.as_str());
        }
        filter
    }
}

// Older collectors stored the player count as a digit string or "N/A"
fn lenient_count<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Count {
        Int(i64),
        Float(f64),
        Text(String),
    }

    Ok(match Option::<Count>::deserialize(deserializer)? {
        Some(Count::Int(n)) => Some(n),
        Some(Count::Float(f)) if f.is_finite() => Some(f as i64),
        Some(Count::Text(s)) => s.trim().parse().ok(),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stored_document() -> bson::Document {
        bson::doc! {
            "_id": bson::oid::ObjectId::new(),
            "timestamp": 1_700_000_000_i64,
            "item_id": "4151",
            "collection_time": bson::DateTime::from_millis(1_700_000_120_000),
            "item_name": "Abyssal whip",
            "high_price_5m": 1_500_000_i32,
            "high_volume_5m": 12_i32,
            "low_price_5m": 1_480_000_i64,
            "low_volume_5m": bson::Bson::Null,
            "player_count": "84321",
            "timestampElapsed": 120_i64,
            "gst": "2023-11-14 22:15:20 GMT",
        }
    }

    #[test]
    fn test_deserialize_stored_document() {
        let record: PriceRecord = bson::from_document(stored_document()).unwrap();

        assert_eq!(record.item_id, "4151");
        assert_eq!(record.high_price_5m, Some(1_500_000));
        assert_eq!(record.low_volume_5m, None);
        // 1h fields absent when the item was only in the 5m window
        assert_eq!(record.high_price_1h, None);
        assert_eq!(record.player_count, Some(84321));
        assert_eq!(record.timestamp_elapsed, 120);
        assert_eq!(
            record.collected_at(),
            Utc.timestamp_opt(1_700_000_120, 0).unwrap()
        );
    }

    #[test]
    fn test_player_count_not_available() {
        let mut doc = stored_document();
        doc.insert("player_count", "N/A");
        let record: PriceRecord = bson::from_document(doc).unwrap();
        assert_eq!(record.player_count, None);

        let mut doc = stored_document();
        doc.remove("player_count");
        let record: PriceRecord = bson::from_document(doc).unwrap();
        assert_eq!(record.player_count, None);
    }

    #[test]
    fn test_serialized_field_names() {
        let record: PriceRecord = bson::from_document(stored_document()).unwrap();
        let doc = bson::to_document(&record).unwrap();

        assert!(doc.contains_key("timestampElapsed"));
        assert!(doc.contains_key("high_volume_1h"));
        assert!(!doc.contains_key("_id"));
        assert!(matches!(
            doc.get("collection_time"),
            Some(bson::Bson::DateTime(_))
        ));
    }

    #[test]
    fn test_query_filter() {
        let now = Utc.with_ymd_and_hms(2024, 3, 8, 12, 0, 0).unwrap();

        let query = PriceQuery::last_days(7, now).with_item(Some("561".to_string()));
        let filter = query.to_filter();
        let range = filter.get_document("collection_time").unwrap();
        assert_eq!(
            range.get_datetime("$gte").unwrap().to_chrono(),
            Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
        );
        assert_eq!(filter.get_str("item_id").unwrap(), "561");

        assert!(PriceQuery::last_days(0, now).to_filter().is_empty());
    }

    #[test]
    fn test_oversized_window_has_no_lower_bound() {
        let query = PriceQuery::last_days(u32::MAX, Utc::now());
        assert_eq!(query.since, None);
        assert!(query.to_filter().is_empty());
    }
}
