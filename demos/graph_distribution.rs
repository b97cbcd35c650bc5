//! demos/graph_distribution.rs
//!
//! Fetches a year of daily temperatures for Berlin and plots how many days were
//! colder (minimum below) or hotter (maximum above) than each threshold.
//!
//! To run this example:
//! cargo run --example graph_distribution --features examples

use std::error::Error;

use chrono::NaiveDate;
use plotlars::{LinePlot, Plot, Rgb, Text};
use polars::prelude::DataFrame;
use tempdist::{distribution_to_dataframe, TemperatureAnalyzer, ThresholdDistribution, DEFAULT_LOCATION};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    env_logger::init();

    let analyzer = TemperatureAnalyzer::new().await?;
    let analysis = analyzer
        .analyze()
        .latitude(DEFAULT_LOCATION.0)
        .longitude(DEFAULT_LOCATION.1)
        .start_date(NaiveDate::from_ymd_opt(2024, 1, 1).ok_or("invalid start date")?)
        .end_date(NaiveDate::from_ymd_opt(2024, 12, 31).ok_or("invalid end date")?)
        .call()
        .await?;

    println!("{}", analysis.metadata);
    plot_distribution(&analysis.cold_days, "Cold Days", Rgb(69, 157, 230))?;
    plot_distribution(&analysis.hot_days, "Hot Days", Rgb(235, 117, 0))?;
    println!("Plots shown in browser.");

    Ok(())
}

fn plot_distribution(
    distribution: &ThresholdDistribution,
    title: &str,
    color: Rgb,
) -> Result<(), Box<dyn Error>> {
    let data: DataFrame = distribution_to_dataframe(distribution)?;

    LinePlot::builder()
        .data(&data)
        .x("threshold")
        .y(distribution.field().count_label())
        .color(color)
        .plot_title(Text::from(title).font("Arial").size(18))
        .x_title("Temperature (°C)")
        .y_title("Number of Days")
        .build()
        .plot();

    Ok(())
}
