use chrono::{Datelike, Months, NaiveDate};
use plotters::prelude::*;
use std::error::Error;

use crate::returns::{cumulative_changes, ReturnSeries};

/// Whole months from `base` to `date`; the series are month-granular.
fn month_offset(base: NaiveDate, date: NaiveDate) -> usize {
    let months = (date.year() - base.year()) * 12 + date.month() as i32 - base.month() as i32;
    months.max(0) as usize
}

/// Cumulative curve for one series, positioned on the shared month axis.
/// Change t belongs to prices[t + 1], so a series whose history starts
/// after the crisis (an ETF with a later inception) lands at its real
/// calendar position instead of sliding back to the axis origin.
fn curve_points(series: &ReturnSeries, base: NaiveDate) -> Vec<(usize, f64)> {
    cumulative_changes(&series.monthly_changes)
        .into_iter()
        .zip(series.prices.iter().skip(1))
        .map(|(v, point)| (month_offset(base, point.date), v))
        .collect()
}

/// Plots the cumulative (plain-sum) monthly return of every resolved asset.
/// This is a running sum of percentage changes, deliberately simpler than
/// the compounded figures in the summary.
pub fn plot_cumulative_returns(
    series: &[ReturnSeries],
    output_path: &str,
) -> Result<(), Box<dyn Error>> {
    // Shared date axis anchored at the earliest month-over-month change.
    let base = series
        .iter()
        .filter_map(|s| s.prices.get(1))
        .map(|p| p.date)
        .min()
        .ok_or("No data available to plot. Please check your asset selection and start date.")?;

    let curves: Vec<(&str, Vec<(usize, f64)>)> = series
        .iter()
        .map(|s| (s.asset.as_str(), curve_points(s, base)))
        .collect();

    let max_x = curves
        .iter()
        .flat_map(|(_, curve)| curve.iter().map(|(x, _)| *x))
        .max()
        .unwrap_or(0);

    let mut y_min = f64::INFINITY;
    let mut y_max = f64::NEG_INFINITY;
    for (_, curve) in &curves {
        for (_, v) in curve {
            y_min = y_min.min(*v);
            y_max = y_max.max(*v);
        }
    }
    // Padding
    let pad = (y_max - y_min).abs().max(0.01) * 0.1;

    let root = BitMapBackend::new(output_path, (1000, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let mut chart = ChartBuilder::on(&root)
        .caption("Cumulative Returns Over Time", ("sans-serif", 30))
        .margin(20)
        .x_label_area_size(40)
        .y_label_area_size(40)
        .build_cartesian_2d(0..max_x + 1, (y_min - pad)..(y_max + pad))?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc("Cumulative Returns (%)")
        .x_label_formatter(&|x| {
            (base + Months::new(*x as u32))
                .format("%Y-%m")
                .to_string()
        })
        .draw()?;

    for (i, (name, curve)) in curves.iter().enumerate() {
        let color = Palette99::pick(i).mix(1.0);
        chart
            .draw_series(LineSeries::new(curve.iter().copied(), color))?
            .label(*name)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    chart
        .configure_series_labels()
        .border_style(BLACK)
        .draw()?;

    root.present()?;
    println!("Cumulative returns chart saved to {}", output_path);
    Ok(())
}
