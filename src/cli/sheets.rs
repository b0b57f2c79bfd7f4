use colored::Colorize;
use comfy_table::{Cell, Table};

use crate::classifier::SheetClass;
use crate::cli::Context;
use crate::coercer::LedgerView;
use crate::error::Result;
use crate::workbook::load_ledger;

pub fn run(ctx: &mut Context, view: LedgerView) -> Result<()> {
    let path = ctx.settings.workbook_path()?;
    // Bypasses the cache: this page exists to show what a fresh load sees.
    let loaded = match load_ledger(&path, view) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("{} {e}", "Error loading Excel file:".red().bold());
            return Ok(());
        }
    };

    let mut table = Table::new();
    table.set_header(vec!["Sheet", "Bucket", "Rows Kept", "Rows Dropped", "Note"]);
    for stat in &loaded.stats.sheets {
        let bucket = match stat.class {
            SheetClass::Unrecognized => stat.class.label().dimmed().to_string(),
            _ => stat.class.label(),
        };
        let note = if stat.replaced {
            "replaced by a later sheet".yellow().to_string()
        } else if stat.class == SheetClass::Unrecognized {
            "ignored".to_string()
        } else {
            String::new()
        };
        table.add_row(vec![
            Cell::new(&stat.name),
            Cell::new(bucket),
            Cell::new(stat.kept),
            Cell::new(stat.dropped),
            Cell::new(note),
        ]);
    }

    println!("{}\n{table}", path.display().to_string().bold());
    println!(
        "Ledger records: {}   Forecast items: {}   Rows dropped: {}",
        loaded.ledger.len(),
        loaded.forecast.records().len(),
        loaded.stats.dropped_rows()
    );
    if let Some((first, last)) = loaded.ledger.date_span() {
        println!("Date span: {first} to {last}");
    }
    for source in loaded.ledger.sources() {
        let count = loaded
            .ledger
            .records()
            .iter()
            .filter(|r| r.source == source)
            .count();
        println!("  {:<8} {count} records", source.name());
    }
    let ignored = loaded.stats.unrecognized();
    if !ignored.is_empty() {
        println!("Ignored sheets: {}", ignored.join(", ").dimmed());
    }
    Ok(())
}
