use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{Context, NO_DATES};
use crate::coercer::LedgerView;
use crate::error::Result;
use crate::fmt::{header, in_unit};
use crate::reports;

pub fn run(ctx: &mut Context, end: Option<NaiveDate>, days: u32) -> Result<()> {
    let Some(loaded) = ctx.ledger(LedgerView::Flow)? else {
        return Ok(());
    };
    let Some((_, latest)) = loaded.ledger.date_span() else {
        println!("{}", NO_DATES.yellow());
        return Ok(());
    };
    let unit = ctx.unit();
    let report = reports::get_trend(&loaded.ledger, end.unwrap_or(latest), days);

    if report.days.is_empty() {
        println!("{}", format!("No data for the last {days} days").yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Date".to_string(),
        header("Deposits", unit),
        header("Withdrawals", unit),
        header("Net Flow", unit),
    ]);
    for day in &report.days {
        let net = in_unit(day.net, unit);
        let net = if day.net >= 0.0 {
            net.green()
        } else {
            net.red()
        };
        table.add_row(vec![
            Cell::new(day.date),
            Cell::new(in_unit(day.deposit, unit)),
            Cell::new(in_unit(day.withdrawal, unit)),
            Cell::new(net),
        ]);
    }

    println!(
        "{} {} to {}\n{table}",
        "Daily Trend".bold(),
        report.start,
        report.end
    );
    Ok(())
}
