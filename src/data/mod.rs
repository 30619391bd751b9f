pub mod data_brokers;

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;

/// One monthly observation for a ticker.
#[derive(Debug, Clone, PartialEq)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub adjusted_close: f64,
}

pub type PriceHistory = Vec<PricePoint>;

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("unexpected response shape: {0}")]
    Shape(String),
    #[error("broker reported an error: {0}")]
    Api(String),
    #[error("could not archive raw response: {0}")]
    Archive(#[from] std::io::Error),
    #[error("unsupported data broker: {0}. Please open an issue, specifying your data broker and useful links")]
    UnsupportedBroker(String),
}

/// Source of monthly adjusted-close history. Brokers implement this; tests
/// script it.
#[async_trait]
pub trait PriceProvider {
    /// History for one ticker from `start` through today, oldest first.
    /// An empty vector is a valid answer and means the ticker has no data.
    async fn monthly_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<PriceHistory, ProviderError>;
}
