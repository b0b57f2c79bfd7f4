use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{Context, NO_DATES};
use crate::coercer::LedgerView;
use crate::error::Result;
use crate::fmt::{header, in_unit, pct};
use crate::reports;

pub fn run(ctx: &mut Context, as_of: Option<NaiveDate>) -> Result<()> {
    let Some(loaded) = ctx.ledger(LedgerView::Balance)? else {
        return Ok(());
    };
    let Some((_, latest)) = loaded.ledger.date_span() else {
        println!("{}", NO_DATES.yellow());
        return Ok(());
    };
    let as_of = as_of.unwrap_or(latest);
    let unit = ctx.unit();
    let rows = reports::get_limits(&loaded.ledger, as_of, &ctx.settings.profiles());

    let mut table = Table::new();
    table.set_header(vec![
        "Bank".to_string(),
        header("Limit", unit),
        header("Used", unit),
        header("Available", unit),
        "Utilization (%)".to_string(),
    ]);
    for row in &rows {
        let available = in_unit(row.usage.available, unit);
        let available = if row.usage.available < 0.0 {
            available.red().to_string()
        } else {
            available
        };
        table.add_row(vec![
            Cell::new(row.source.name()),
            Cell::new(in_unit(row.usage.limit, unit)),
            Cell::new(in_unit(row.usage.used, unit)),
            Cell::new(available),
            Cell::new(pct(row.usage.utilization_pct)),
        ]);
    }

    println!("{} (as of {as_of})\n{table}", "Bank-wise Limit Details".bold());
    Ok(())
}
