use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Collection, Database};
use tracing::info;

use super::models::PriceRecord;
use crate::config::CommonConfig;
use crate::readiness::wait_until_ready;
use crate::Result;

pub const PRICE_COLLECTION: &str = "price_data";

#[derive(Clone, Debug)]
pub struct DbClient {
    client: Client,
    database: Database,
}

impl DbClient {
    /// Build the client and block until MongoDB answers a ping
    pub async fn connect(config: &CommonConfig) -> Result<Self> {
        let probe = config.probe_settings();

        let mut options = ClientOptions::parse(&config.mongo_uri).await?;
        // a ping against an unreachable server must fail inside the probe timeout
        options.server_selection_timeout = Some(probe.timeout);
        let client = Client::with_options(options)?;

        let db_client = Self {
            database: client.database(&config.mongo_db),
            client,
        };

        let attempts = wait_until_ready("MongoDB", &probe, || db_client.ping()).await?;
        info!(
            "Successfully connected to MongoDB (database: {}, attempts: {})",
            config.mongo_db, attempts
        );

        Ok(db_client)
    }

    pub async fn ping(&self) -> Result<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 }, None)
            .await?;
        Ok(())
    }

    pub(crate) fn price_data(&self) -> Collection<PriceRecord> {
        self.database.collection::<PriceRecord>(PRICE_COLLECTION)
    }
}
