use std::io::{self, Write};

use crate::analysis::{sort_by_volatility, sort_by_volume, ItemTrend};

const NAME_WIDTH: usize = 32;

fn float(value: Option<f64>) -> String {
    value.map_or_else(|| "NaN".to_string(), |v| format!("{:.4}", v))
}

fn name(trend: &ItemTrend) -> String {
    let mut name: String = trend.item_name.chars().take(NAME_WIDTH).collect();
    if trend.item_name.chars().count() > NAME_WIDTH {
        name.pop();
        name.push('~');
    }
    name
}

pub fn write_spread_report<W: Write>(
    out: &mut W,
    trends: &[ItemTrend],
    top_n: usize,
) -> io::Result<()> {
    writeln!(out, "\nTop {} Items by Price Spread %", top_n)?;
    writeln!(
        out,
        "{:<width$} {:>16} {:>16} {:>14} {:>14} {:>18} {:>17}",
        "item_name",
        "high_price_1h_mean",
        "low_price_1h_mean",
        "avg_spread",
        "avg_spread_pct",
        "high_volume_1h_sum",
        "low_volume_1h_sum",
        width = NAME_WIDTH
    )?;
    for trend in trends.iter().take(top_n) {
        writeln!(
            out,
            "{:<width$} {:>16} {:>16} {:>14} {:>14} {:>18} {:>17}",
            name(trend),
            float(trend.high_price_1h.mean),
            float(trend.low_price_1h.mean),
            float(trend.avg_spread),
            float(trend.avg_spread_pct),
            trend.high_volume_1h.sum,
            trend.low_volume_1h.sum,
            width = NAME_WIDTH
        )?;
    }
    Ok(())
}

pub fn write_volume_report<W: Write>(
    out: &mut W,
    trends: &[ItemTrend],
    top_n: usize,
) -> io::Result<()> {
    let mut by_volume = trends.to_vec();
    sort_by_volume(&mut by_volume);

    writeln!(out, "\nTop {} Items by Trading Volume", top_n)?;
    writeln!(
        out,
        "{:<width$} {:>18} {:>18} {:>17} {:>14}",
        "item_name",
        "high_price_1h_mean",
        "high_volume_1h_sum",
        "low_volume_1h_sum",
        "avg_spread_pct",
        width = NAME_WIDTH
    )?;
    for trend in by_volume.iter().take(top_n) {
        writeln!(
            out,
            "{:<width$} {:>18} {:>18} {:>17} {:>14}",
            name(trend),
            float(trend.high_price_1h.mean),
            trend.high_volume_1h.sum,
            trend.low_volume_1h.sum,
            float(trend.avg_spread_pct),
            width = NAME_WIDTH
        )?;
    }
    Ok(())
}

pub fn write_volatility_report<W: Write>(
    out: &mut W,
    trends: &[ItemTrend],
    top_n: usize,
) -> io::Result<()> {
    let mut by_volatility = trends.to_vec();
    sort_by_volatility(&mut by_volatility);

    writeln!(out, "\nTop {} Items by Price Volatility", top_n)?;
    writeln!(
        out,
        "{:<width$} {:>18} {:>21} {:>20} {:>18}",
        "item_name",
        "high_price_1h_mean",
        "high_price_volatility",
        "low_price_volatility",
        "high_volume_1h_sum",
        width = NAME_WIDTH
    )?;
    for trend in by_volatility.iter().take(top_n) {
        writeln!(
            out,
            "{:<width$} {:>18} {:>21} {:>20} {:>18}",
            name(trend),
            float(trend.high_price_1h.mean),
            float(trend.high_price_volatility),
            float(trend.low_price_volatility),
            trend.high_volume_1h.sum,
            width = NAME_WIDTH
        )?;
    }
    Ok(())
}

/// All three rankings, in the order they are printed
pub fn write_reports<W: Write>(
    out: &mut W,
    trends: &[ItemTrend],
    top_n: usize,
) -> io::Result<()> {
    write_spread_report(out, trends, top_n)?;
    write_volume_report(out, trends, top_n)?;
    write_volatility_report(out, trends, top_n)
}
