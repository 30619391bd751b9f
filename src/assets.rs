use chrono::NaiveDate;

/// One investable asset class: display name, the ETF normally used for price
/// history, and the underlying index used when the ETF yields no data.
#[derive(Debug)]
pub struct AssetClass {
    pub name: &'static str,
    pub etf_ticker: &'static str,
    pub index_ticker: &'static str,
}

pub const ASSETS: &[AssetClass] = &[
    AssetClass {
        name: "S&P 500 Index",
        etf_ticker: "SPY",
        index_ticker: "^GSPC",
    },
    AssetClass {
        name: "MSCI World",
        etf_ticker: "IWDA.L",
        index_ticker: "^WORLD",
    },
    AssetClass {
        name: "Stoxx 600 Index",
        etf_ticker: "EXSA.DE",
        index_ticker: "^STOXX50E",
    },
    AssetClass {
        name: "Russell 2000 Index",
        etf_ticker: "IWM",
        index_ticker: "^RUT",
    },
    AssetClass {
        name: "MSCI Emerging Markets Index",
        etf_ticker: "EEM",
        index_ticker: "^MSCIEM",
    },
    AssetClass {
        name: "Nikkei 225 Index",
        etf_ticker: "EWJ",
        index_ticker: "^N225",
    },
    AssetClass {
        name: "Global Government Bonds",
        etf_ticker: "BWX",
        index_ticker: "^IRX",
    },
    AssetClass {
        name: "European Bonds",
        etf_ticker: "IBGL.L",
        index_ticker: "^IRXEU",
    },
    AssetClass {
        name: "Gold",
        etf_ticker: "GLD",
        index_ticker: "^XAUUSD=X",
    },
];

pub fn find_asset(name: &str) -> Option<&'static AssetClass> {
    ASSETS.iter().find(|a| a.name == name)
}

/// A named historical crisis used as the return-calculation start date.
/// The index impact figures are peak-to-trough moves shown as context only;
/// they never enter the return math.
#[derive(Debug)]
pub struct CrisisWindow {
    pub label: &'static str,
    pub start: NaiveDate,
    pub title: &'static str,
    pub description: &'static str,
    pub index_impact: &'static [(&'static str, f64)],
}

fn january(year: i32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, 1, 1).expect("valid calendar date")
}

pub fn crisis_windows() -> Vec<CrisisWindow> {
    vec![
        CrisisWindow {
            label: "Since January 2008 (Financial Crisis)",
            start: january(2008),
            title: "2008 Financial Crisis",
            description: "The 2008 Financial Crisis was a global financial meltdown triggered by the collapse of Lehman Brothers and a sharp decline in housing prices in the U.S. It led to widespread financial losses, stock market crashes, and a global recession.",
            index_impact: &[
                ("S&P 500", -57.69),
                ("Nikkei 225", -60.12),
                ("FTSE 100", -49.50),
                ("MSCI Emerging Markets", -58.10),
                ("Gold", 25.98),
                ("DAX 30", -55.00),
                ("MSCI World", -54.00),
                ("Hang Seng", -53.50),
                ("FTSE MIB", -55.75),
                ("US Treasuries (10Y)", 12.00),
                ("German Bunds (10Y)", 7.50),
            ],
        },
        CrisisWindow {
            label: "Since January 2010 (European Sovereign Debt Crisis)",
            start: january(2010),
            title: "2010 European Sovereign Debt Crisis",
            description: "The European Sovereign Debt Crisis occurred when several European countries, particularly Greece, faced high government debt and were unable to repay or refinance their debts. This caused instability in European financial markets.",
            index_impact: &[
                ("S&P 500", -16.99),
                ("Nikkei 225", -19.95),
                ("FTSE 100", -17.71),
                ("MSCI Emerging Markets", -23.56),
                ("Gold", 11.25),
                ("DAX 30", -17.50),
                ("MSCI World", -15.00),
                ("Hang Seng", -18.00),
                ("FTSE MIB", -20.00),
                ("US Treasuries (10Y)", 5.80),
                ("German Bunds (10Y)", 3.50),
            ],
        },
        CrisisWindow {
            label: "Since January 2016 (Pre-Brexit)",
            start: january(2016),
            title: "2016 Brexit Vote",
            description: "The Brexit vote in June 2016 led to the UK's decision to leave the European Union, causing significant uncertainty and volatility in financial markets, particularly in the UK and Europe.",
            index_impact: &[
                ("S&P 500", -5.34),
                ("Nikkei 225", -20.02),
                ("FTSE 100", -12.00),
                ("MSCI Emerging Markets", -16.76),
                ("Gold", 8.45),
                ("DAX 30", -8.50),
                ("MSCI World", -7.00),
                ("Hang Seng", -10.00),
                ("FTSE MIB", -9.50),
                ("US Treasuries (10Y)", 3.50),
                ("German Bunds (10Y)", 2.00),
                ("BTPs (10Y)", 2.80),
            ],
        },
        CrisisWindow {
            label: "Since January 2020 (Pre-COVID Pandemic)",
            start: january(2020),
            title: "2020 COVID-19 Pandemic",
            description: "The COVID-19 pandemic caused widespread global health crises, followed by massive economic downturns. The pandemic led to lockdowns, business closures, and market turmoil.",
            index_impact: &[
                ("S&P 500", -33.92),
                ("Nikkei 225", -31.86),
                ("FTSE 100", -32.84),
                ("MSCI Emerging Markets", -34.80),
                ("Gold", 42.93),
                ("DAX 30", -39.00),
                ("MSCI World", -38.50),
                ("Hang Seng", -30.00),
                ("FTSE MIB", -35.00),
                ("US Treasuries (10Y)", 5.20),
                ("German Bunds (10Y)", 3.80),
                ("BTPs (10Y)", 4.50),
            ],
        },
        CrisisWindow {
            label: "Since January 2022 (Pre-Russia-Ukraine War)",
            start: january(2022),
            title: "2022 Russia-Ukraine War",
            description: "The Russia-Ukraine war, which began in February 2022, caused severe geopolitical instability, energy price shocks, and a major crisis in global supply chains.",
            index_impact: &[
                ("S&P 500", -23.22),
                ("Nikkei 225", -16.52),
                ("FTSE 100", -17.68),
                ("MSCI Emerging Markets", -21.15),
                ("Gold", 6.94),
                ("DAX 30", -20.00),
                ("MSCI World", -19.50),
                ("Hang Seng", -18.00),
                ("FTSE MIB", -22.00),
                ("US Treasuries (10Y)", 2.50),
                ("German Bunds (10Y)", 1.90),
                ("BTPs (10Y)", 3.00),
            ],
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_asset_has_distinct_tickers() {
        for asset in ASSETS {
            assert_ne!(asset.etf_ticker, asset.index_ticker, "{}", asset.name);
        }
    }

    #[test]
    fn crisis_labels_are_unique_and_start_in_january() {
        let windows = crisis_windows();
        assert_eq!(windows.len(), 5);
        for (i, w) in windows.iter().enumerate() {
            assert_eq!(w.start.format("%m-%d").to_string(), "01-01");
            for other in &windows[i + 1..] {
                assert_ne!(w.label, other.label);
            }
        }
    }

    #[test]
    fn find_asset_matches_display_names() {
        let gold = find_asset("Gold").expect("gold is a known asset");
        assert_eq!(gold.etf_ticker, "GLD");
        assert!(find_asset("Bitcoin").is_none());
    }
}
