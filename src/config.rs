use config::{Config, File};
use serde::Deserialize;
use std::collections::BTreeMap;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub general: General,
    pub data_api: DataApi,
    pub portfolio: Portfolio,
}

#[derive(Debug, Deserialize)]
pub struct General {
    pub chart_output: String,
    pub export_csv: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DataApi {
    pub source: String,
    pub api_key: String,
}

#[derive(Debug, Deserialize)]
pub struct Portfolio {
    /// Label of one of the built-in crisis windows.
    pub crisis: String,
    /// Asset display name -> integer percent. Unlisted assets count as 0.
    pub allocations: BTreeMap<String, u32>,
}

impl Settings {
    pub fn new() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let s = Config::builder()
            .add_source(File::with_name("config"))
            // Retrieve the api key from .env
            .add_source(config::Environment::with_prefix("APP").separator("__"))
            .build()?;
        s.try_deserialize()
    }
}
