use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use reqwest::Client;
use serde_json::Value;
use std::fs;

use crate::data::{PriceHistory, PricePoint, PriceProvider, ProviderError};
use crate::utils::parse_date;

/// Twelve Data broker. `adjust=all` makes the close column split- and
/// dividend-adjusted, matching what the Alpha Vantage broker returns.
pub struct TwelveData {
    client: Client,
    api_key: String,
}

impl TwelveData {
    pub fn new(api_key: &str) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.to_string(),
        }
    }
}

#[async_trait]
impl PriceProvider for TwelveData {
    async fn monthly_history(
        &self,
        ticker: &str,
        start: NaiveDate,
    ) -> Result<PriceHistory, ProviderError> {
        let url = format!(
            "https://api.twelvedata.com/time_series?symbol={}&interval=1month&adjust=all&outputsize=5000&apikey={}",
            ticker, self.api_key
        );

        let resp = self.client.get(&url).send().await?;
        let json_val: Value = resp.json().await?;

        save_api_result(&json_val, ticker)?;

        parse_response(&json_val, ticker, start, Local::now().date_naive())
    }
}

/// Turns a Twelve Data `time_series` response into a chronological price
/// history. A 404 ("symbol not found") is a data gap and comes back as an
/// empty history; every other reported error stays an error so broken
/// requests do not slide into the fallback path.
fn parse_response(
    json_val: &Value,
    ticker: &str,
    start: NaiveDate,
    today: NaiveDate,
) -> Result<PriceHistory, ProviderError> {
    if json_val.get("status").map_or(false, |s| s == "error") {
        if json_val.get("code").and_then(|c| c.as_i64()) == Some(404) {
            return Ok(Vec::new());
        }
        let message = json_val
            .get("message")
            .and_then(|m| m.as_str())
            .unwrap_or("unknown error");
        return Err(ProviderError::Api(format!(
            "Twelve Data error for {}: {}",
            ticker, message
        )));
    }

    let values = json_val
        .get("values")
        .and_then(|v| v.as_array())
        .ok_or_else(|| {
            ProviderError::Shape("could not parse 'values' array from Twelve response".into())
        })?;

    let mut points = Vec::new();
    for entry in values {
        // Twelve returns datetime such as "2020-02-26 15:59:00";
        // extract the date part
        let Some(date_str) = entry.get("datetime").and_then(|v| v.as_str()) else {
            continue;
        };
        let date_part = date_str.get(..10).unwrap_or(date_str);
        let Ok(date) = parse_date(date_part) else {
            continue;
        };
        if date < start || date > today {
            continue;
        }
        let Some(close_str) = entry.get("close").and_then(|v| v.as_str()) else {
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

/// Save the raw JSON API result in
/// data/raw/{ticker}/twelve/{datetimenow}/raw.json
fn save_api_result(json_val: &Value, ticker: &str) -> Result<(), ProviderError> {
    let today = Local::now().format("%Y-%m-%d").to_string();
    let dir_path = format!("data/raw/{}/twelve/{}", ticker, today);
    fs::create_dir_all(&dir_path)?;
    let file_path = format!("{}/raw.json", dir_path);
    fs::write(&file_path, json_val.to_string())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    #[test]
    fn symbol_not_found_maps_to_an_empty_history() {
        let body = json!({
            "status": "error",
            "code": 404,
            "message": "symbol not found: ^WORLD"
        });
        let history =
            parse_response(&body, "^WORLD", date(2020, 1, 1), date(2025, 1, 1)).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn bad_request_surfaces_as_an_api_error() {
        let body = json!({
            "status": "error",
            "code": 400,
            "message": "interval parameter is malformed"
        });
        let err =
            parse_response(&body, "SPY", date(2020, 1, 1), date(2025, 1, 1)).unwrap_err();
        match err {
            ProviderError::Api(message) => {
                assert!(message.contains("SPY"));
                assert!(message.contains("interval parameter is malformed"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn parses_filters_and_sorts_the_values_array() {
        let body = json!({
            "values": [
                { "datetime": "2020-03-01", "close": "99.0" },
                { "datetime": "2020-02-01 15:59:00", "close": "110.0" },
                { "datetime": "2019-12-01", "close": "50.0" },
                { "datetime": "2020-01-01", "close": "not-a-number" }
            ]
        });
        let history =
            parse_response(&body, "SPY", date(2020, 1, 1), date(2025, 1, 1)).unwrap();
        // the pre-start row and the malformed close are dropped
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].date, date(2020, 2, 1));
        assert!((history[0].adjusted_close - 110.0).abs() < 1e-12);
        assert_eq!(history[1].date, date(2020, 3, 1));
    }

    #[test]
    fn missing_values_array_is_a_shape_error() {
        let body = json!({ "meta": {} });
        match parse_response(&body, "SPY", date(2020, 1, 1), date(2025, 1, 1)) {
            Err(ProviderError::Shape(_)) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
