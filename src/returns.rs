use chrono::NaiveDate;
use thiserror::Error;
use tracing::warn;

use crate::assets::AssetClass;
use crate::data::{PriceHistory, PriceProvider, ProviderError};

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("no data available for {ticker}")]
    NoData { ticker: String },
    #[error("error fetching data for {ticker}: {source}")]
    Provider {
        ticker: String,
        source: ProviderError,
    },
}

/// Monthly history for one asset, reduced to the numbers the rest of the
/// pipeline needs. `ticker` is the symbol that actually produced the data
/// (ETF or fallback index).
#[derive(Debug, Clone)]
pub struct ReturnSeries {
    pub asset: String,
    pub ticker: String,
    pub prices: PriceHistory,
    pub monthly_changes: Vec<f64>,
    pub annualized_return: f64,
}

/// Outcome of the fetch-with-fallback policy for one asset. An excluded
/// asset keeps both failure reasons and drops out of all downstream math;
/// its weight is not redistributed.
#[derive(Debug)]
pub enum AssetResolution {
    Resolved(ReturnSeries),
    Excluded {
        asset: String,
        primary: FetchError,
        fallback: FetchError,
    },
}

/// Month-over-month percentage changes. The leading undefined change simply
/// does not exist in the output, so `prices.len() - 1` entries come back.
pub fn monthly_changes(prices: &PriceHistory) -> Vec<f64> {
    prices
        .windows(2)
        .map(|w| (w[1].adjusted_close - w[0].adjusted_close) / w[0].adjusted_close)
        .collect()
}

/// Arithmetic mean of the monthly changes, compounded to a yearly rate:
/// (1 + mean)^12 - 1. None when there are no changes to average.
pub fn annualized_from_monthly(changes: &[f64]) -> Option<f64> {
    if changes.is_empty() {
        return None;
    }
    let mean = changes.iter().sum::<f64>() / changes.len() as f64;
    Some((1.0 + mean).powi(12) - 1.0)
}

/// Running sum of monthly changes, the plain (non-compounded) series the
/// cumulative chart draws.
pub fn cumulative_changes(changes: &[f64]) -> Vec<f64> {
    let mut acc = 0.0;
    changes
        .iter()
        .map(|c| {
            acc += c;
            acc
        })
        .collect()
}

async fn try_ticker(
    provider: &dyn PriceProvider,
    ticker: &str,
    start: NaiveDate,
) -> Result<(PriceHistory, Vec<f64>, f64), FetchError> {
    let prices = provider
        .monthly_history(ticker, start)
        .await
        .map_err(|source| FetchError::Provider {
            ticker: ticker.to_string(),
            source,
        })?;
    let changes = monthly_changes(&prices);
    match annualized_from_monthly(&changes) {
        Some(annualized) => Ok((prices, changes, annualized)),
        // fewer than two rows cannot produce a return
        None => Err(FetchError::NoData {
            ticker: ticker.to_string(),
        }),
    }
}

/// Fetch-with-fallback for one asset: the ETF first, then exactly one
/// attempt with the index ticker. Both empty results and provider failures
/// trigger the fallback; a second failure excludes the asset.
pub async fn resolve_asset(
    provider: &dyn PriceProvider,
    asset: &AssetClass,
    start: NaiveDate,
) -> AssetResolution {
    let primary = match try_ticker(provider, asset.etf_ticker, start).await {
        Ok((prices, monthly_changes, annualized_return)) => {
            return AssetResolution::Resolved(ReturnSeries {
                asset: asset.name.to_string(),
                ticker: asset.etf_ticker.to_string(),
                prices,
                monthly_changes,
                annualized_return,
            });
        }
        Err(e) => e,
    };
    warn!(
        asset = asset.name,
        "{primary}; falling back to the index {}", asset.index_ticker
    );

    match try_ticker(provider, asset.index_ticker, start).await {
        Ok((prices, monthly_changes, annualized_return)) => {
            AssetResolution::Resolved(ReturnSeries {
                asset: asset.name.to_string(),
                ticker: asset.index_ticker.to_string(),
                prices,
                monthly_changes,
                annualized_return,
            })
        }
        Err(fallback) => {
            warn!(
                asset = asset.name,
                "{fallback}; excluding the asset from the calculation"
            );
            AssetResolution::Excluded {
                asset: asset.name.to_string(),
                primary,
                fallback,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    enum Script {
        Prices(Vec<f64>),
        Empty,
        Fail(String),
    }

    struct ScriptedProvider {
        scripts: HashMap<String, Script>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedProvider {
        fn new(scripts: Vec<(&str, Script)>) -> Self {
            Self {
                scripts: scripts
                    .into_iter()
                    .map(|(t, s)| (t.to_string(), s))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl PriceProvider for ScriptedProvider {
        async fn monthly_history(
            &self,
            ticker: &str,
            start: NaiveDate,
        ) -> Result<PriceHistory, ProviderError> {
            self.calls.lock().unwrap().push(ticker.to_string());
            match self.scripts.get(ticker) {
                Some(Script::Prices(closes)) => Ok(closes
                    .iter()
                    .enumerate()
                    .map(|(i, close)| PricePoint {
                        date: start + chrono::Months::new(i as u32),
                        adjusted_close: *close,
                    })
                    .collect()),
                Some(Script::Fail(msg)) => Err(ProviderError::Api(msg.clone())),
                Some(Script::Empty) | None => Ok(Vec::new()),
            }
        }
    }

    fn spx() -> AssetClass {
        AssetClass {
            name: "S&P 500 Index",
            etf_ticker: "SPY",
            index_ticker: "^GSPC",
        }
    }

    fn jan_2020() -> NaiveDate {
        NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
    }

    #[test]
    fn changes_are_period_over_period() {
        let prices: PriceHistory = [100.0, 110.0, 99.0]
            .iter()
            .enumerate()
            .map(|(i, close)| PricePoint {
                date: jan_2020() + chrono::Months::new(i as u32),
                adjusted_close: *close,
            })
            .collect();
        let changes = monthly_changes(&prices);
        assert_eq!(changes.len(), 2);
        assert!((changes[0] - 0.1).abs() < 1e-12);
        assert!((changes[1] + 0.1).abs() < 1e-12);
    }

    #[test]
    fn annualization_compounds_the_mean() {
        let changes = vec![0.01; 24];
        let annualized = annualized_from_monthly(&changes).unwrap();
        assert!((annualized - (1.01f64.powi(12) - 1.0)).abs() < 1e-12);
        // same inputs, same output
        assert_eq!(annualized, annualized_from_monthly(&changes).unwrap());
    }

    #[test]
    fn annualization_needs_at_least_one_change() {
        assert!(annualized_from_monthly(&[]).is_none());
    }

    #[test]
    fn cumulative_series_is_a_plain_running_sum() {
        let cum = cumulative_changes(&[0.1, -0.05, 0.02]);
        assert!((cum[0] - 0.1).abs() < 1e-12);
        assert!((cum[1] - 0.05).abs() < 1e-12);
        assert!((cum[2] - 0.07).abs() < 1e-12);
    }

    #[tokio::test]
    async fn primary_success_never_touches_the_fallback() {
        let provider = ScriptedProvider::new(vec![(
            "SPY",
            Script::Prices(vec![100.0, 101.0, 102.0]),
        )]);
        let resolution = resolve_asset(&provider, &spx(), jan_2020()).await;
        match resolution {
            AssetResolution::Resolved(series) => {
                assert_eq!(series.ticker, "SPY");
                assert_eq!(series.monthly_changes.len(), 2);
            }
            other => panic!("expected resolution, got {other:?}"),
        }
        assert_eq!(provider.calls(), vec!["SPY"]);
    }

    #[tokio::test]
    async fn empty_primary_triggers_exactly_one_fallback() {
        let provider = ScriptedProvider::new(vec![
            ("SPY", Script::Empty),
            ("^GSPC", Script::Prices(vec![100.0, 105.0])),
        ]);
        let resolution = resolve_asset(&provider, &spx(), jan_2020()).await;
        match resolution {
            AssetResolution::Resolved(series) => assert_eq!(series.ticker, "^GSPC"),
            other => panic!("expected resolution, got {other:?}"),
        }
        assert_eq!(provider.calls(), vec!["SPY", "^GSPC"]);
    }

    #[tokio::test]
    async fn provider_failure_is_treated_like_missing_data() {
        let provider = ScriptedProvider::new(vec![
            ("SPY", Script::Fail("rate limited".into())),
            ("^GSPC", Script::Prices(vec![100.0, 105.0])),
        ]);
        match resolve_asset(&provider, &spx(), jan_2020()).await {
            AssetResolution::Resolved(series) => assert_eq!(series.ticker, "^GSPC"),
            other => panic!("expected resolution, got {other:?}"),
        }
        assert_eq!(provider.calls(), vec!["SPY", "^GSPC"]);
    }

    #[tokio::test]
    async fn double_failure_excludes_with_both_reasons() {
        let provider = ScriptedProvider::new(vec![
            ("SPY", Script::Fail("boom".into())),
            ("^GSPC", Script::Empty),
        ]);
        match resolve_asset(&provider, &spx(), jan_2020()).await {
            AssetResolution::Excluded {
                asset,
                primary,
                fallback,
            } => {
                assert_eq!(asset, "S&P 500 Index");
                assert!(matches!(primary, FetchError::Provider { .. }));
                assert!(primary.to_string().contains("SPY"));
                assert!(matches!(fallback, FetchError::NoData { .. }));
                assert!(fallback.to_string().contains("^GSPC"));
            }
            other => panic!("expected exclusion, got {other:?}"),
        }
        // exactly one fallback attempt, never more
        assert_eq!(provider.calls(), vec!["SPY", "^GSPC"]);
    }

    #[tokio::test]
    async fn single_price_row_counts_as_no_data() {
        let provider = ScriptedProvider::new(vec![
            ("SPY", Script::Prices(vec![100.0])),
            ("^GSPC", Script::Empty),
        ]);
        match resolve_asset(&provider, &spx(), jan_2020()).await {
            AssetResolution::Excluded { primary, .. } => {
                assert!(matches!(primary, FetchError::NoData { .. }));
            }
            other => panic!("expected exclusion, got {other:?}"),
        }
    }
}
