//! Forecast command
//!
//! Prints one row per method by default, or the month-by-month chart view
//! with `--chart`. `--json` emits the same structures the web API returns.

use anyhow::{anyhow, Result};
use saleslens_core::{
    build_chart, compute_monthly_insights, predict, DateRange, Database, Metric, Prediction,
};

pub fn cmd_forecast(
    db: &Database,
    metric: &str,
    periods: usize,
    chart: bool,
    json: bool,
) -> Result<()> {
    let metric: Metric = metric.parse().map_err(|e: String| anyhow!(e))?;
    let insights = compute_monthly_insights(&db.fetch_monthly_totals(&DateRange::all())?);
    let prediction = predict(&insights, metric, periods)?;

    if json {
        let output = if chart {
            serde_json::to_string_pretty(&build_chart(&prediction))?
        } else {
            serde_json::to_string_pretty(&prediction)?
        };
        println!("{}", output);
        return Ok(());
    }

    if chart {
        print_chart(&prediction);
    } else {
        print_methods(&prediction);
    }

    Ok(())
}

fn print_methods(prediction: &Prediction) {
    println!(
        "🔮 Forecast of {} for the next {} month(s) ({} months of history)",
        prediction.metric, prediction.periods, prediction.base_points
    );
    println!();

    for result in &prediction.forecasts {
        if result.values.is_empty() {
            println!("   {:<14} (not enough history)", result.method.as_str());
            continue;
        }
        let values: Vec<String> = result.values.iter().map(|v| format!("{:.2}", v)).collect();
        println!("   {:<14} {}", result.method.as_str(), values.join("  "));
    }
}

fn print_chart(prediction: &Prediction) {
    let chart = build_chart(prediction);

    println!("📈 {} forecast", chart.metric);
    println!();
    println!(
        "{:<8}  {:>6}  {:>14}  {:>14}  {:>14}",
        "Period", "Base", "Linear", "Moving avg", "Holt-Winters"
    );
    println!("{}", "-".repeat(64));

    let cell = |v: Option<f64>| v.map(|x| format!("{:.2}", x)).unwrap_or_else(|| "-".into());

    for point in &chart.data {
        println!(
            "{:<8}  {:>6}  {:>14}  {:>14}  {:>14}",
            point.label,
            point.base.map(|b| b.to_string()).unwrap_or_default(),
            cell(point.linear),
            cell(point.moving_average),
            cell(point.holt_winters),
        );
    }
}
