use std::env;
use tempdist::{find_popular_location, validate_iso, TempDistError, TemperatureAnalyzer, DEFAULT_LOCATION};

#[tokio::main]
async fn main() -> Result<(), TempDistError> {
    env_logger::init();

    // First argument picks a preset city, e.g. `cargo run --example analyze_location -- tokyo`
    let location = env::args()
        .nth(1)
        .and_then(|name| find_popular_location(&name))
        .map(|preset| preset.location)
        .unwrap_or(DEFAULT_LOCATION);

    let query = validate_iso(location.0, location.1, "2023-01-01", "2023-12-31")?;
    let analyzer = TemperatureAnalyzer::new().await?;
    let analysis = analyzer.analyze_query(&query, 1.0).await?;

    let summary = &analysis.summary;
    println!("{}", analysis.metadata);
    println!("Days analyzed:  {}", summary.total_days);
    println!(
        "Coldest day:    {} ({:.1} °C)",
        summary.coldest_day.date, summary.coldest_day.min_temp
    );
    println!(
        "Hottest day:    {} ({:.1} °C)",
        summary.hottest_day.date, summary.hottest_day.max_temp
    );
    println!("Average min:    {:.1} °C", summary.avg_min);
    println!("Average max:    {:.1} °C", summary.avg_max);
    println!("Range:          {:.1} °C", summary.temp_range);
    if summary.has_suspect_days() {
        println!("Suspect days:   {:?}", summary.suspect_days);
    }

    println!("\nThreshold  Cold days  Hot days");
    for threshold in [-10.0, -5.0, 0.0, 5.0, 10.0, 20.0, 30.0] {
        println!(
            "{:>8.1}  {:>9}  {:>8}",
            threshold,
            analysis
                .cold_days
                .count(threshold)
                .map_or("-".to_string(), |c| c.to_string()),
            analysis
                .hot_days
                .count(threshold)
                .map_or("-".to_string(), |c| c.to_string()),
        );
    }

    let path = analysis.write_csv(&env::temp_dir()).await?;
    println!("\nRecords written to {}", path.display());

    Ok(())
}
