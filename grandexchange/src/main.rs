use runequant::{logging, CommonConfig, DbClient};
use std::time::Duration;
use tokio::time::{self, MissedTickBehavior};

mod api;
mod collector;
mod config;
mod errors;
mod mapping;
mod player_count;

use api::client::PricesClient;
use collector::Collector;

const MAX_CONSECUTIVE_ERRORS: u32 = 5;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let common = CommonConfig::from_env()?;
    let config = config::Config::from_env()?;
    logging::setup_logging(common.log_format())?;

    tracing::info!("Starting Grand Exchange price tracker");

    let db = match initialize_database(&common).await {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Database initialization failed, exiting...");
            return Err(e.into());
        }
    };

    let prices = PricesClient::new(
        &config.prices_api_url,
        &config.user_agent,
        config.request_timeout(),
    )?;
    let mut collector = Collector::new(
        db,
        prices,
        &config.homepage_url,
        config.item_mapping_path.clone(),
    );

    tokio::select! {
        _ = run_collection(&mut collector, config.collection_interval()) => {}
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Shutdown signal received, stopping price tracker");
        }
    }

    Ok(())
}

// Wait for MongoDB and make sure the collection is indexed
async fn initialize_database(common: &CommonConfig) -> runequant::Result<DbClient> {
    let db = DbClient::connect(common).await?;
    db.ensure_indexes().await?;
    Ok(db)
}

/// Collect prices every `period` until the task is cancelled
async fn run_collection(collector: &mut Collector, period: Duration) {
    let mut interval = time::interval(period);
    // a slow cycle pushes the schedule back instead of bursting
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
    let mut consecutive_errors = 0u32;

    tracing::info!("Collecting prices every {} seconds", period.as_secs());

    loop {
        interval.tick().await;

        let start_time = std::time::Instant::now();
        match collector.collect_prices().await {
            Ok(saved) => {
                tracing::info!(
                    "Collection cycle completed: {} records saved in {:?}",
                    saved,
                    start_time.elapsed()
                );
                consecutive_errors = 0;
            }
            Err(e) => {
                consecutive_errors += 1;
                tracing::error!(
                    "Collection cycle failed (attempt {}/{}): {}",
                    consecutive_errors,
                    MAX_CONSECUTIVE_ERRORS,
                    e
                );

                if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                    tracing::error!(
                        "Too many consecutive failures ({}), backing off for one extra interval",
                        consecutive_errors
                    );
                    time::sleep(period).await;
                    consecutive_errors = 0;
                }
            }
        }
    }
}
