pub mod alphavantage;
pub mod twelve;

use crate::config::DataApi;

use super::{PriceProvider, ProviderError};

pub fn from_settings(
    data_api: &DataApi,
) -> Result<Box<dyn PriceProvider + Send + Sync>, ProviderError> {
    match data_api.source.to_lowercase().as_str() {
        "alphavantage" => Ok(Box::new(alphavantage::AlphaVantage::new(&data_api.api_key))),
        "twelve" => Ok(Box::new(twelve::TwelveData::new(&data_api.api_key))),
        other => Err(ProviderError::UnsupportedBroker(other.to_string())),
    }
}
