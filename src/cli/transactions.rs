use std::path::Path;

use chrono::NaiveDate;
use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::cli::{resolve_range, Context, NO_DATES};
use crate::coercer::LedgerView;
use crate::error::Result;
use crate::fmt::{header, in_unit};
use crate::reports::{self, RegisterReport};
use crate::settings::shellexpand_path;

pub fn write_csv(report: &RegisterReport, path: &Path) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    let mut wtr = csv::Writer::from_path(path)?;
    wtr.write_record(["Value_Date", "Bank", "Category", "Net_Flow", "Remarks"])?;
    for row in &report.rows {
        wtr.write_record([
            row.date.format("%Y-%m-%d").to_string(),
            row.source.name().to_string(),
            row.category.clone(),
            row.net_flow.to_string(),
            row.remarks.clone(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn run(
    ctx: &mut Context,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    csv_out: Option<String>,
) -> Result<()> {
    let Some(loaded) = ctx.ledger(LedgerView::Detail)? else {
        return Ok(());
    };
    let Some(span) = loaded.ledger.date_span() else {
        println!("{}", NO_DATES.yellow());
        return Ok(());
    };
    let (start, end) = resolve_range(span, from, to);
    let unit = ctx.unit();
    let report = reports::get_register(&loaded.ledger, start, end);

    if report.rows.is_empty() {
        println!("{}", "No transactions found for the selected date range.".yellow());
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec![
        "Value Date".to_string(),
        "Bank".to_string(),
        "Category".to_string(),
        header("Net Flow", unit),
        "Remarks".to_string(),
    ]);
    for row in &report.rows {
        table.add_row(vec![
            Cell::new(row.date.format("%Y-%m-%d")),
            Cell::new(row.source.name()),
            Cell::new(&row.category),
            Cell::new(in_unit(row.net_flow, unit)),
            Cell::new(&row.remarks),
        ]);
    }
    table.add_row(vec![
        Cell::new("Total".bold()),
        Cell::new(""),
        Cell::new(""),
        Cell::new(in_unit(report.total, unit)),
        Cell::new(format!("{} rows", report.rows.len())),
    ]);
    println!("{} {start} to {end}\n{table}", "Transaction Details".bold());

    if let Some(out) = csv_out {
        let path = std::path::PathBuf::from(shellexpand_path(&out));
        write_csv(&report, &path)?;
        println!("Wrote {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::ymd;
    use crate::models::Source;
    use crate::reports::RegisterRow;

    #[test]
    fn test_write_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out").join("register.csv");
        let report = RegisterReport {
            rows: vec![RegisterRow {
                date: ymd(2024, 1, 5),
                source: Source::Hdfc,
                category: "Vendor, Payments".to_string(),
                net_flow: -1500.5,
                remarks: String::new(),
            }],
            total: -1500.5,
        };
        write_csv(&report, &path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines[0], "Value_Date,Bank,Category,Net_Flow,Remarks");
        assert_eq!(lines[1], "2024-01-05,HDFC,\"Vendor, Payments\",-1500.5,");
    }
}
