use comfy_table::{Cell, Table};

use crate::error::Result;
use crate::fmt::in_unit;
use crate::settings::{load_settings, settings_path};

pub fn run() -> Result<()> {
    let settings = load_settings();
    let or_unset = |s: &str| if s.is_empty() { "(not set)".to_string() } else { s.to_string() };

    println!("Settings:      {}", settings_path().display());
    println!("Workbook:      {}", or_unset(&settings.file_path));
    println!("P&L workbook:  {}", or_unset(&settings.pnl_file_path));
    println!("Cache TTL:     {}s", settings.cache_ttl_secs);
    println!("Display unit:  {}", settings.display_unit);
    println!("YTD fallback:  {}", if settings.ytd_fallback { "on" } else { "off" });

    let mut table = Table::new();
    table.set_header(vec!["Bank", "Limit", "Sign Convention"]);
    for (source, profile) in settings.profiles() {
        table.add_row(vec![
            Cell::new(source.name()),
            Cell::new(in_unit(profile.limit, 1.0)),
            Cell::new(profile.convention.key()),
        ]);
    }
    println!("\n{table}");
    Ok(())
}
