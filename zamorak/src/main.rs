use chrono::Utc;
use runequant::db::PriceQuery;
use runequant::{logging, CommonConfig, DbClient};
use std::io::Write;

mod analysis;
mod config;
mod report;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let common = CommonConfig::from_env()?;
    let config = config::Config::from_env()?;
    logging::setup_logging(common.log_format())?;

    tracing::info!("ZAMORAK LOADED");

    let db = DbClient::connect(&common).await?;
    let query = PriceQuery::last_days(config.analysis_days, Utc::now())
        .with_item(config.analysis_item_id.clone());
    let records = db.find_price_records(&query).await?;

    if records.is_empty() {
        tracing::error!("No data retrieved from MongoDB. Exiting.");
        return Ok(());
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    writeln!(
        out,
        "Successfully loaded {} records for {} unique items",
        records.len(),
        analysis::unique_items(&records)
    )?;

    let trends = analysis::analyze_price_trends(&records);
    if trends.is_empty() {
        tracing::warn!("No trend analysis available");
        return Ok(());
    }

    report::write_reports(&mut out, &trends, config.top_n)?;
    out.flush()?;

    Ok(())
}
