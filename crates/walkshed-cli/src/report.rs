//! End-of-run console summary.
//!
//! The only intentionally `println!`-based output in the workspace; everything
//! else goes through `tracing`.

use walkshed_analyzer::{AmenityProfile, BatchStats, ScoringPolicy};
use walkshed_core::Catalog;

const RULE_WIDTH: usize = 50;

/// Print per-category averages and batch counters for a finished run.
pub fn print_summary(
    catalog: &Catalog,
    policy: ScoringPolicy,
    profiles: &[AmenityProfile],
    stats: &BatchStats,
    interrupted: bool,
) {
    if interrupted {
        println!(
            "\nAnalysis interrupted, saved results for {} listings.",
            stats.listings
        );
    }

    println!("\n{}", "=".repeat(RULE_WIDTH));
    println!("AMENITY ANALYSIS SUMMARY");
    println!("{}", "=".repeat(RULE_WIDTH));
    println!(
        "Listings analyzed: {} ({} geocoded, {} failed)",
        stats.listings, stats.geocoded, stats.geocode_failures
    );
    if stats.query_failures > 0 {
        println!("Category queries failed: {}", stats.query_failures);
    }

    if profiles.is_empty() {
        println!("{}", "=".repeat(RULE_WIDTH));
        return;
    }

    for category in catalog {
        let average_count = mean(profiles, |profile| {
            profile
                .category(&category.key)
                .map_or(0.0, |result| f64::from(result.count))
        });
        println!("{}:", category.key.to_uppercase());
        println!("  Average count: {average_count:.1}");

        if policy == ScoringPolicy::RatedComposite {
            let average_score = mean(profiles, |profile| {
                profile
                    .category(&category.key)
                    .and_then(|result| result.category_score)
                    .unwrap_or(0.0)
            });
            println!("  Average score: {average_score:.2}");
        }
    }

    match policy {
        ScoringPolicy::Detailed => {
            let average_total = mean(profiles, |profile| f64::from(profile.total_count));
            println!("\nAVERAGE AMENITIES PER LISTING: {average_total:.1}");
        }
        ScoringPolicy::RatedComposite => {
            let average_overall = mean(profiles, |profile| profile.overall_score.unwrap_or(0.0));
            println!("\nOVERALL AMENITY SCORE: {average_overall:.2}");
        }
    }
    println!("{}", "=".repeat(RULE_WIDTH));
}

#[allow(clippy::cast_precision_loss)]
fn mean(profiles: &[AmenityProfile], value: impl Fn(&AmenityProfile) -> f64) -> f64 {
    if profiles.is_empty() {
        return 0.0;
    }
    profiles.iter().map(value).sum::<f64>() / profiles.len() as f64
}
