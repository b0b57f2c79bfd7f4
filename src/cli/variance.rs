use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{resolve_range, Context, NO_DATES};
use crate::coercer::LedgerView;
use crate::error::Result;
use crate::fmt::{header, in_unit};
use crate::reports;

fn on(series: &[(NaiveDate, f64)], date: NaiveDate) -> Option<f64> {
    series.iter().find(|(d, _)| *d == date).map(|(_, v)| *v)
}

pub fn run(ctx: &mut Context, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Result<()> {
    let Some(loaded) = ctx.ledger(LedgerView::Flow)? else {
        return Ok(());
    };
    let Some(span) = loaded.ledger.date_span() else {
        println!("{}", NO_DATES.yellow());
        return Ok(());
    };
    let (start, end) = resolve_range(span, from, to);
    let unit = ctx.unit();
    let report = reports::get_variance(&loaded.ledger, &loaded.forecast, start, end);

    if report.is_empty() {
        println!("{}", "No forecast or actual data for the selected date range.".yellow());
        return Ok(());
    }

    if loaded.forecast.is_empty() {
        println!("{}", "No forecast sheet found; showing actual net flow only.".dimmed());
    }

    let cell = |v: Option<f64>| Cell::new(v.map(|v| in_unit(v, unit)).unwrap_or_default());
    let mut table = Table::new();
    table.set_header(vec![
        "Date".to_string(),
        header("Fixed", unit),
        header("Contingency", unit),
        header("Actual Net Flow", unit),
    ]);
    for date in report.dates() {
        table.add_row(vec![
            Cell::new(date),
            cell(on(&report.fixed, date)),
            cell(on(&report.contingency, date)),
            cell(on(&report.actual, date)),
        ]);
    }

    let fixed: f64 = report.fixed.iter().map(|(_, v)| v).sum();
    let contingency: f64 = report.contingency.iter().map(|(_, v)| v).sum();
    let actual: f64 = report.actual.iter().map(|(_, v)| v).sum();
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(in_unit(fixed, unit)),
        Cell::new(in_unit(contingency, unit)),
        Cell::new(in_unit(actual, unit)),
    ]);

    println!("{} {start} to {end}\n{table}", "Forecast Stacking".bold());
    Ok(())
}
