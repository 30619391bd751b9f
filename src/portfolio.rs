use std::cmp::Ordering;

use chrono::{Datelike, NaiveDate};

use crate::returns::AssetResolution;

#[derive(Debug, Clone)]
pub struct AssetReturn {
    pub asset: String,
    /// Return over the whole elapsed span: (1 + annualized)^years - 1.
    pub compounded_return: f64,
}

#[derive(Debug, Clone)]
pub struct ExcludedAsset {
    pub asset: String,
    pub primary_reason: String,
    pub fallback_reason: String,
}

/// Everything the presenter shows. Excluded assets are carried as data so
/// the dropped-weight path stays observable; the resolved weights may sum
/// to less than 100% and are deliberately not renormalized.
#[derive(Debug)]
pub struct PortfolioSummary {
    pub years: i32,
    pub total_return: f64,
    pub annualized_return: f64,
    pub projected_10k: f64,
    pub projected_100k: f64,
    /// Per-asset compounded returns, strictly descending, ties in table order.
    pub asset_returns: Vec<AssetReturn>,
    pub excluded: Vec<ExcludedAsset>,
}

impl PortfolioSummary {
    pub fn has_participants(&self) -> bool {
        !self.asset_returns.is_empty()
    }
}

/// Whole calendar years between the crisis start and the evaluation date.
pub fn elapsed_years(start: NaiveDate, as_of: NaiveDate) -> i32 {
    as_of.year() - start.year()
}

pub fn compound_over(annualized: f64, years: i32) -> f64 {
    (1.0 + annualized).powi(years) - 1.0
}

/// Combines the per-asset resolutions into the portfolio figures.
///
/// `as_of` is the evaluation date captured once at startup; nothing below
/// reads the clock. A `years` of zero is not guarded and produces a
/// non-finite annualized figure, matching the unguarded source arithmetic.
pub fn aggregate(
    resolutions: &[AssetResolution],
    allocations: &[(String, u32)],
    start: NaiveDate,
    as_of: NaiveDate,
) -> PortfolioSummary {
    let years = elapsed_years(start, as_of);

    let weight_of = |asset: &str| -> f64 {
        allocations
            .iter()
            .find(|(name, _)| name == asset)
            .map(|(_, pct)| *pct)
            .unwrap_or(0) as f64
            / 100.0
    };

    let mut asset_returns = Vec::new();
    let mut excluded = Vec::new();
    let mut total_return = 0.0;
    for resolution in resolutions {
        match resolution {
            AssetResolution::Resolved(series) => {
                let compounded = compound_over(series.annualized_return, years);
                total_return += weight_of(&series.asset) * compounded;
                asset_returns.push(AssetReturn {
                    asset: series.asset.clone(),
                    compounded_return: compounded,
                });
            }
            AssetResolution::Excluded {
                asset,
                primary,
                fallback,
            } => excluded.push(ExcludedAsset {
                asset: asset.clone(),
                primary_reason: primary.to_string(),
                fallback_reason: fallback.to_string(),
            }),
        }
    }

    // stable sort: equal returns keep their encounter order
    asset_returns.sort_by(|a, b| {
        b.compounded_return
            .partial_cmp(&a.compounded_return)
            .unwrap_or(Ordering::Equal)
    });

    let annualized_return = (1.0 + total_return).powf(1.0 / years as f64) - 1.0;

    PortfolioSummary {
        years,
        total_return,
        annualized_return,
        projected_10k: 10_000.0 * (1.0 + total_return),
        projected_100k: 100_000.0 * (1.0 + total_return),
        asset_returns,
        excluded,
    }
}
