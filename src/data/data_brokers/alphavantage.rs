use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde_json::Value;
use std::fs;

use crate::data::{PriceHistory, PricePoint, PriceProvider, ProviderError};
use crate::utils::parse_date;

/// Alpha Vantage broker, using the monthly adjusted series.
pub struct AlphaVantage {
    client: Client,
    api_key: String,
}

impl AlphaVantage {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for AlphaVantage {
    async fn monthly_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<PriceHistory, ProviderError> {
        let url = format!(
            "https://www.alphavantage.co/query?function=TIME_SERIES_MONTHLY_ADJUSTED&symbol={symbol}&outputsize=full&apikey={apikey}",
            symbol = ticker,
            apikey = self.api_key
        );

        let resp = self.client.get(&url).send().await?;
        let json_val: Value = resp.json().await?;

        // Save raw API result in data/raw/{ticker}/{broker}/{datetimenow}
        save_api_result(&json_val, ticker)?;

        if let Some(msg) = json_val.get("Error Message").and_then(|v| v.as_str()) {
            return Err(ProviderError::Api(msg.to_string()));
        }

        // A ticker unknown to Alpha Vantage comes back as an empty object
        // rather than an error, so a missing series maps to "no data".
        let Some(series_obj) = json_val["Monthly Adjusted Time Series"].as_object() else {
            if json_val.as_object().map_or(false, |o| o.is_empty()) {
                return Ok(Vec::new());
            }
            return Err(ProviderError::Shape(
                "could not parse 'Monthly Adjusted Time Series' from Alpha Vantage".into(),
            ));
        };

        let today = Local::now().date_naive();
        let mut points = Vec::new();
        for (date_str, values) in series_obj {
            let Ok(date) = parse_date(date_str) else {
                continue;
            };
            // Filter by date range
            if date < start || date > today {
                continue;
            }
            // Rows with a missing or malformed close are dropped
            let Some(close_str) = values["5. adjusted close"].as_str() else {
                continue;
            };
            let Ok(adjusted_close) = close_str.parse::<f64>() else {
                continue;
            };
            points.push(PricePoint {
                date,
                adjusted_close,
            });
        }
        points.sort_by_key(|p| p.date);

        Ok(points)
    }
}

/// Saves the raw result in
/// data/raw/{ticker}/alphavantage/{datetimenow}/raw.json
fn save_api_result(json_val: &Value, ticker: &str) -> Result<(), ProviderError> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let dir_path = format!("data/raw/{}/alphavantage/{}", ticker, today);
    fs::create_dir_all(&dir_path)?;
    let file_path = format!("{}/raw.json", dir_path);
    fs::write(&file_path, json_val.to_string())?;
    Ok(())
}
