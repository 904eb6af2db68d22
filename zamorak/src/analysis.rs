use chrono::{DateTime, Utc};
use runequant::db::PriceRecord;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Summary of an item's hourly price over the analysed records
#[derive(Debug, Clone, PartialEq)]
pub struct PriceStats {
    pub mean: Option<f64>,
    pub min: Option<i64>,
    pub max: Option<i64>,
    /// Sample standard deviation, undefined below two values
    pub std: Option<f64>,
}

impl PriceStats {
    fn from_values(values: &[i64]) -> Self {
        let mean = mean(values);
        let std = match (mean, values.len()) {
            (Some(mean), n) if n >= 2 => {
                let squares: f64 = values
                    .iter()
                    .map(|&v| (v as f64 - mean).powi(2))
                    .sum();
                Some((squares / (n - 1) as f64).sqrt())
            }
            _ => None,
        };

        Self {
            mean,
            min: values.iter().copied().min(),
            max: values.iter().copied().max(),
            std,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeStats {
    /// Zero when no volume was reported
    pub sum: i64,
    pub mean: Option<f64>,
}

impl VolumeStats {
    fn from_values(values: &[i64]) -> Self {
        Self {
            sum: values.iter().sum(),
            mean: mean(values),
        }
    }
}

/// Trend figures for one item
#[derive(Debug, Clone, PartialEq)]
pub struct ItemTrend {
    pub item_id: String,
    pub item_name: String,
    pub high_price_1h: PriceStats,
    pub low_price_1h: PriceStats,
    pub high_volume_1h: VolumeStats,
    pub low_volume_1h: VolumeStats,
    pub first_collected: DateTime<Utc>,
    pub last_collected: DateTime<Utc>,
    pub record_count: usize,
    /// Coefficient of variation of the high price
    pub high_price_volatility: Option<f64>,
    pub low_price_volatility: Option<f64>,
    pub avg_spread: Option<f64>,
    /// Spread as a percentage of the average low price
    pub avg_spread_pct: Option<f64>,
    pub days_covered: f64,
}

impl ItemTrend {
    fn from_records(item_id: &str, item_name: &str, records: &[&PriceRecord]) -> Option<Self> {
        let first_collected = records.iter().map(|r| r.collected_at()).min()?;
        let last_collected = records.iter().map(|r| r.collected_at()).max()?;

        let values = |field: fn(&PriceRecord) -> Option<i64>| -> Vec<i64> {
            records.iter().filter_map(|&r| field(r)).collect()
        };
        let high_price_1h = PriceStats::from_values(&values(|r| r.high_price_1h));
        let low_price_1h = PriceStats::from_values(&values(|r| r.low_price_1h));
        let high_volume_1h = VolumeStats::from_values(&values(|r| r.high_volume_1h));
        let low_volume_1h = VolumeStats::from_values(&values(|r| r.low_volume_1h));

        let avg_spread = match (high_price_1h.mean, low_price_1h.mean) {
            (Some(high), Some(low)) => Some(high - low),
            _ => None,
        };

        Some(Self {
            item_id: item_id.to_string(),
            item_name: item_name.to_string(),
            high_price_volatility: ratio(high_price_1h.std, high_price_1h.mean),
            low_price_volatility: ratio(low_price_1h.std, low_price_1h.mean),
            avg_spread_pct: ratio(avg_spread, low_price_1h.mean).map(|r| r * 100.0),
            avg_spread,
            days_covered: (last_collected - first_collected).num_milliseconds() as f64
                / 86_400_000.0,
            high_price_1h,
            low_price_1h,
            high_volume_1h,
            low_volume_1h,
            first_collected,
            last_collected,
            record_count: records.len(),
        })
    }
}

fn mean(values: &[i64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().map(|&v| v as f64).sum::<f64>() / values.len() as f64)
}

// Undefined when either side is missing or the denominator is zero
fn ratio(numerator: Option<f64>, denominator: Option<f64>) -> Option<f64> {
    match (numerator, denominator) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

/// Descending order with undefined values at the end
pub fn desc_nulls_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Group records per item and compute trend figures, highest spread % first
pub fn analyze_price_trends(records: &[PriceRecord]) -> Vec<ItemTrend> {
    if records.is_empty() {
        tracing::warn!("No data available for analysis");
        return Vec::new();
    }

    let mut groups: BTreeMap<(&str, &str), Vec<&PriceRecord>> = BTreeMap::new();
    for record in records {
        groups
            .entry((record.item_id.as_str(), record.item_name.as_str()))
            .or_default()
            .push(record);
    }

    let mut trends: Vec<ItemTrend> = groups
        .iter()
        .filter_map(|((item_id, item_name), group)| {
            ItemTrend::from_records(item_id, item_name, group)
        })
        .collect();

    sort_by_spread_pct(&mut trends);
    trends
}

pub fn sort_by_spread_pct(trends: &mut [ItemTrend]) {
    trends.sort_by(|a, b| desc_nulls_last(a.avg_spread_pct, b.avg_spread_pct));
}

pub fn sort_by_volume(trends: &mut [ItemTrend]) {
    trends.sort_by(|a, b| b.high_volume_1h.sum.cmp(&a.high_volume_1h.sum));
}

pub fn sort_by_volatility(trends: &mut [ItemTrend]) {
    trends.sort_by(|a, b| desc_nulls_last(a.high_price_volatility, b.high_price_volatility));
}

/// Number of distinct item ids among the records
pub fn unique_items(records: &[PriceRecord]) -> usize {
    records
        .iter()
        .map(|r| r.item_id.as_str())
        .collect::<std::collections::HashSet<_>>()
        .len()
}
