use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::Context;
use crate::error::Result;
use crate::fmt::{header, in_unit, pct};
use crate::pnl::{PnlSummary, HEADLINE_ITEMS, PL_ITEMS};

fn monthly_table(summary: &PnlSummary, unit: f64) -> Table {
    let months = summary
        .items
        .first()
        .map(|i| i.months.clone())
        .unwrap_or_default();
    let mut table = Table::new();
    let mut head = vec![header("Line Item", unit)];
    head.extend(months);
    table.set_header(head);

    for item in &summary.items {
        let name = if HEADLINE_ITEMS.contains(&item.name) {
            item.name.bold().to_string()
        } else {
            item.name.to_string()
        };
        let mut row = vec![Cell::new(name)];
        // Cost lines are charted as magnitudes.
        let headline = HEADLINE_ITEMS.contains(&item.name);
        row.extend(item.values.iter().map(|v| {
            let shown = if headline { *v } else { v.abs() };
            Cell::new(in_unit(shown, unit))
        }));
        table.add_row(row);
    }
    table
}

pub fn run(ctx: &mut Context) -> Result<()> {
    let Some(summary) = ctx.pnl()? else {
        return Ok(());
    };
    if summary.is_empty() {
        println!("{}", "No processed P&L data to display.".yellow());
        return Ok(());
    }
    let unit = ctx.unit();

    let mut ytd = Table::new();
    ytd.set_header(vec!["Item".to_string(), header("YTD", unit)]);
    for name in PL_ITEMS {
        let value = summary.ytd(name);
        let shown = in_unit(value, unit);
        let shown = if value == 0.0 {
            shown.dimmed()
        } else if HEADLINE_ITEMS.contains(&name) == (value > 0.0) {
            shown.green()
        } else {
            shown.red()
        };
        ytd.add_row(vec![Cell::new(name), Cell::new(shown)]);
    }
    println!("{}\n{ytd}", "YTD Performance".bold());

    println!("\n{}\n{}", "Monthly Trend".bold(), monthly_table(&summary, unit));

    if let Some(ratios) = summary.ratios() {
        let mut table = Table::new();
        table.set_header(vec!["Ratio", "Value"]);
        table.add_row(vec![Cell::new("EBITDA Margin"), Cell::new(pct(ratios.ebitda_margin))]);
        table.add_row(vec![Cell::new("Cost Ratio"), Cell::new(pct(ratios.cost_ratio))]);
        table.add_row(vec![Cell::new("Net Margin"), Cell::new(pct(ratios.net_margin))]);
        println!("\n{}\n{table}", "Key Ratios (YTD)".bold());
    }
    Ok(())
}
