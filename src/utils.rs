use std::{
    collections::{BTreeSet, HashMap},
    path::Path,
};

use chrono::{NaiveDate, ParseError};
use csv::WriterBuilder;

use crate::returns::{AssetResolution, ReturnSeries};

/// Writes the fetched monthly price history to a wide CSV: one date column,
/// one column per resolved asset, blanks where an asset has no row.
pub fn write_to_csv(resolutions: &[AssetResolution], output_path: &str) -> Result<(), csv::Error> {
    if let Some(parent) = Path::new(output_path).parent() {
        std::fs::create_dir_all(parent).expect("Failed to create directories for CSV output");
    }

    let series: Vec<&ReturnSeries> = resolutions
        .iter()
        .filter_map(|r| match r {
            AssetResolution::Resolved(s) => Some(s),
            AssetResolution::Excluded { .. } => None,
        })
        .collect();

    let mut date_set = BTreeSet::new();
    let mut lookup: HashMap<(NaiveDate, &str), f64> = HashMap::new();
    for s in &series {
        for point in &s.prices {
            date_set.insert(point.date);
            lookup.insert((point.date, s.asset.as_str()), point.adjusted_close);
        }
    }

    let mut wtr = WriterBuilder::new()
        .has_headers(true)
        .from_path(output_path)?;

    let mut header = vec!["date".to_string()];
    header.extend(series.iter().map(|s| s.asset.clone()));
    wtr.write_record(&header)?;

    for date in date_set {
        let mut row = vec![date.format("%Y-%m-%d").to_string()];
        for s in &series {
            match lookup.get(&(date, s.asset.as_str())) {
                Some(price) => row.push(price.to_string()),
                // If no price found, leave the cell blank.
                None => row.push(String::new()),
            }
        }
        wtr.write_record(&row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn parse_date(date_str: &str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::PricePoint;
    use crate::returns::FetchError;

    #[test]
    fn parses_iso_dates_only() {
        assert_eq!(
            parse_date("2020-01-01").unwrap(),
            NaiveDate::from_ymd_opt(2020, 1, 1).unwrap()
        );
        assert!(parse_date("01/02/2020").is_err());
    }

    fn resolved(asset: &str, points: &[(&str, f64)]) -> AssetResolution {
        let prices = points
            .iter()
            .map(|(date, close)| PricePoint {
                date: parse_date(date).unwrap(),
                adjusted_close: *close,
            })
            .collect();
        AssetResolution::Resolved(ReturnSeries {
            asset: asset.to_string(),
            ticker: asset.to_string(),
            prices,
            monthly_changes: Vec::new(),
            annualized_return: 0.0,
        })
    }

    #[test]
    fn writes_one_column_per_resolved_asset_with_blank_gaps() {
        let resolutions = vec![
            resolved(
                "S&P 500 Index",
                &[("2020-01-01", 100.0), ("2020-02-01", 110.0)],
            ),
            resolved("Gold", &[("2020-02-01", 50.0), ("2020-03-01", 55.0)]),
            AssetResolution::Excluded {
                asset: "MSCI World".to_string(),
                primary: FetchError::NoData {
                    ticker: "IWDA.L".into(),
                },
                fallback: FetchError::NoData {
                    ticker: "^WORLD".into(),
                },
            },
        ];

        let path = std::env::temp_dir().join("crisisfolio_wide_csv_test.csv");
        write_to_csv(&resolutions, path.to_str().unwrap()).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        // excluded assets get no column
        assert_eq!(lines[0], "date,S&P 500 Index,Gold");
        assert_eq!(lines[1], "2020-01-01,100,");
        assert_eq!(lines[2], "2020-02-01,110,50");
        assert_eq!(lines[3], "2020-03-01,,55");
        assert_eq!(lines.len(), 4);

        std::fs::remove_file(&path).ok();
    }
}
