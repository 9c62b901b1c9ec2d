use chrono::NaiveDate;
use solar_compare::{Comparison, Metric, SolarCompare, SolarCompareError, METRICS};
use std::env;
use std::path::PathBuf;

fn main() -> Result<(), SolarCompareError> {
    configure_polars_display();

    // Usage: compare_regions [DATA_DIR] [METRIC]
    let mut args = env::args().skip(1);
    let data_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));
    let metric: Metric = args
        .next()
        .and_then(|m| m.parse().ok())
        .unwrap_or(Metric::Ghi);

    let client = SolarCompare::configure().data_dir(data_dir).call()?;
    let regions = client.region_labels();
    println!("Regions: {:?}", regions);
    println!(
        "Metrics: {:?}",
        METRICS.iter().map(Metric::column_name).collect::<Vec<_>>()
    );

    let comparison = client
        .compare()
        .regions(&regions)
        .metric(metric.column_name())
        .sample_size(5_000)
        .maybe_date_range(
            NaiveDate::from_ymd_opt(2021, 8, 9).zip(NaiveDate::from_ymd_opt(2022, 8, 9)),
        )
        .call()?;

    let report = match comparison {
        Comparison::Empty { skipped } => {
            println!("No data available. Missing datasets:");
            for region in skipped {
                println!("  {} ({})", region.region, region.path.display());
            }
            return Ok(());
        }
        Comparison::Ready(report) => report,
    };

    println!("\n{} ({}) by region", metric, metric.unit());
    println!(
        "{:<26} {:>10} {:>10} {:>10} {:>10}",
        "region", "mean", "median", "std", "p95"
    );
    for row in &report.formatted {
        println!(
            "{:<26} {:>10} {:>10} {:>10} {:>10}",
            row.region, row.mean, row.median, row.std, row.p95
        );
    }
    if let Some(top) = &report.top_region {
        println!("\nHighest mean: {}", top);
    }
    println!("\n{}", report.preview().head(Some(10)));

    Ok(())
}

fn configure_polars_display() {
    // show every column
    env::set_var("POLARS_FMT_MAX_COLS", "-1");
    // show 20 rows
    env::set_var("POLARS_FMT_MAX_ROWS", "20");
}
