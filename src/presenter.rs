use crate::assets::CrisisWindow;
use crate::portfolio::PortfolioSummary;

/// Prints the static briefing for the selected crisis. Depends only on the
/// reference tables, never on the user's allocation.
pub fn print_crisis_briefing(crisis: &CrisisWindow) {
    println!("{}", crisis.title);
    println!("{}", crisis.description);
    println!();
    println!("Performance of some global indices during the crisis:");
    println!("{:<28} {:>24}", "Index", "Peak-to-Trough (%)");
    for (index, impact) in crisis.index_impact {
        println!("{:<28} {:>+24.2}", index, impact);
    }
    println!();
}

pub fn print_summary(summary: &PortfolioSummary) {
    if !summary.has_participants() {
        println!("No asset produced any data; zero assets contribute to the portfolio.");
        print_exclusions(summary);
        return;
    }

    println!("=== Portfolio Return ===");
    println!(
        "Total return over {} year(s): {:.2}%",
        summary.years,
        summary.total_return * 100.0
    );
    println!("Annualized return: {:.2}%", summary.annualized_return * 100.0);
    println!(
        "A $10,000 investment would now be worth: ${:.2}",
        summary.projected_10k
    );
    println!(
        "A $100,000 investment would now be worth: ${:.2}",
        summary.projected_100k
    );
    println!();

    println!("Individual asset returns:");
    println!("{:<28} {:>20}", "Asset", "Compound Return (%)");
    for entry in &summary.asset_returns {
        println!(
            "{:<28} {:>20.2}",
            entry.asset,
            entry.compounded_return * 100.0
        );
    }

    print_exclusions(summary);
}

fn print_exclusions(summary: &PortfolioSummary) {
    if summary.excluded.is_empty() {
        return;
    }
    println!();
    println!("Excluded from the calculation (weight not redistributed):");
    for excluded in &summary.excluded {
        println!(
            "{:<28} primary: {}; fallback: {}",
            excluded.asset, excluded.primary_reason, excluded.fallback_reason
        );
    }
}
