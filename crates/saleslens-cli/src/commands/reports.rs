//! Monthly metrics and insight tables

use anyhow::Result;
use saleslens_core::{compute_monthly_insights, compute_yearly_insights, DateRange, Database};

use super::{format_pct, parse_range_args};

pub fn cmd_metrics_month(db: &Database, year: i32, month: u32) -> Result<()> {
    let totals = db.get_month_totals(year, month)?;

    println!("📊 Sales for {:04}-{:02}", totals.year, totals.month);
    println!();
    println!("   Sales:  {}", totals.total_sales);
    println!("   Items:  {:.2}", totals.total_items);
    println!("   Value:  {:.2}", totals.total_value);
    println!("   Cost:   {:.2}", totals.total_cost);

    if totals.total_sales == 0 {
        println!();
        println!("   No sales recorded in this month.");
    }

    Ok(())
}

pub fn cmd_metrics(db: &Database, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let range = parse_range_args(from, to)?;
    let months = db.fetch_monthly_totals(&range)?;

    if months.is_empty() {
        println!("No sales found. Run: saleslens import --file sales.csv");
        return Ok(());
    }

    println!("📊 Monthly totals ({} months)", months.len());
    println!();
    println!(
        "{:<8}  {:>7}  {:>10}  {:>14}  {:>14}",
        "Month", "Sales", "Items", "Value", "Cost"
    );
    println!("{}", "-".repeat(61));

    for m in &months {
        println!(
            "{:04}-{:02}   {:>7}  {:>10.2}  {:>14.2}  {:>14.2}",
            m.year, m.month, m.total_sales, m.total_items, m.total_value, m.total_cost
        );
    }

    Ok(())
}

pub fn cmd_insights(db: &Database, from: Option<&str>, to: Option<&str>) -> Result<()> {
    let range = parse_range_args(from, to)?;
    let insights = compute_monthly_insights(&db.fetch_monthly_totals(&range)?);

    if insights.is_empty() {
        println!("No sales found. Run: saleslens import --file sales.csv");
        return Ok(());
    }

    println!("💡 Monthly insights");
    println!();
    println!(
        "{:<8}  {:>14}  {:>10}  {:>14}  {:>8}  {:>9}  {:>9}",
        "Month", "Value", "Avg ticket", "Gross profit", "Margin", "MoM val", "MoM sales"
    );
    println!("{}", "-".repeat(86));

    for i in &insights {
        println!(
            "{:04}-{:02}   {:>14.2}  {:>10.2}  {:>14.2}  {:>7.1}%  {:>9}  {:>9}",
            i.totals.year,
            i.totals.month,
            i.totals.total_value,
            i.avg_ticket,
            i.gross_profit,
            i.gross_margin_pct,
            format_pct(i.mom_growth_value_pct),
            format_pct(i.mom_growth_sales_pct),
        );
    }

    Ok(())
}

pub fn cmd_insights_yearly(db: &Database) -> Result<()> {
    let monthly = compute_monthly_insights(&db.fetch_monthly_totals(&DateRange::all())?);
    let years = compute_yearly_insights(&monthly);

    if years.is_empty() {
        println!("No sales found. Run: saleslens import --file sales.csv");
        return Ok(());
    }

    println!("📅 Yearly insights");
    println!();
    println!(
        "{:<6}  {:>7}  {:>14}  {:>14}  {:>8}  {:>5}  {:>5}  {:>8}",
        "Year", "Sales", "Value", "Gross profit", "Margin", "Best", "Worst", "YoY"
    );
    println!("{}", "-".repeat(80));

    for y in &years {
        println!(
            "{:<6}  {:>7}  {:>14.2}  {:>14.2}  {:>7.1}%  {:>5}  {:>5}  {:>8}",
            y.year,
            y.total_sales,
            y.total_value,
            y.gross_profit,
            y.gross_margin_pct,
            y.best_month,
            y.worst_month,
            format_pct(y.value_growth_pct),
        );
    }

    Ok(())
}
