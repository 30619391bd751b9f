use anyhow::{anyhow, Context};
use chrono::Local;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod allocation;
mod assets;
mod config;
mod data;
mod portfolio;
mod presenter;
mod returns;
mod utils;
mod visualization;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let settings = config::Settings::new().context("Failed to load configuration")?;

    // Halts before any fetch unless the percentages sum to exactly 100.
    let allocations =
        allocation::collect_allocations(&settings.portfolio.allocations, assets::ASSETS)?;

    let crises = assets::crisis_windows();
    let crisis = crises
        .iter()
        .find(|c| c.label == settings.portfolio.crisis)
        .ok_or_else(|| anyhow!("unknown crisis window: {}", settings.portfolio.crisis))?;

    presenter::print_crisis_briefing(crisis);

    let provider = data::data_brokers::from_settings(&settings.data_api)?;

    // The evaluation date is captured once; all the return math keys off it.
    let as_of = Local::now().date_naive();

    // Sequential fetches, one asset at a time, independent per asset.
    let mut resolutions = Vec::new();
    for (name, pct) in &allocations {
        if *pct == 0 {
            continue;
        }
        let asset = assets::find_asset(name)
            .ok_or_else(|| anyhow!("asset table out of sync for {name}"))?;
        info!(asset = %name, ticker = asset.etf_ticker, "fetching monthly history");
        resolutions.push(returns::resolve_asset(provider.as_ref(), asset, crisis.start).await);
    }

    if let Some(path) = &settings.general.export_csv {
        utils::write_to_csv(&resolutions, path).context("Failed to write CSV")?;
        info!(path = %path, "price history exported");
    }

    let summary = portfolio::aggregate(&resolutions, &allocations, crisis.start, as_of);
    presenter::print_summary(&summary);

    let resolved: Vec<returns::ReturnSeries> = resolutions
        .into_iter()
        .filter_map(|r| match r {
            returns::AssetResolution::Resolved(series) => Some(series),
            returns::AssetResolution::Excluded { .. } => None,
        })
        .collect();

    if resolved.is_empty() {
        warn!("no data available to plot; check your asset selection and start date");
    } else {
        visualization::plot_cumulative_returns(&resolved, &settings.general.chart_output)
            .map_err(|e| anyhow!("failed to render the cumulative returns chart: {e}"))?;
    }

    Ok(())
}
