use serde::Deserialize;

/// Configuration for the trend analyser
#[derive(Deserialize, Debug, Clone)]
pub struct Config {
    /// How many days of records to analyse; 0 analyses everything
    #[serde(default = "default_analysis_days")]
    pub analysis_days: u32,
    /// Restrict the analysis to a single item id
    #[serde(default)]
    pub analysis_item_id: Option<String>,
    /// Rows per report
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

fn default_analysis_days() -> u32 {
    7
}

fn default_top_n() -> usize {
    10
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();
        Ok(envy::from_env::<Config>()?)
    }
}
