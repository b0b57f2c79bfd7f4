use std::path::Path;

use crate::error::{DashError, Result};
use crate::settings::{load_settings, save_settings, settings_path, shellexpand_path};

pub fn run(file: Option<String>, pnl_file: Option<String>, ttl: Option<u64>) -> Result<()> {
    let mut settings = load_settings();

    if let Some(f) = file {
        settings.file_path = shellexpand_path(&f);
    } else if settings.file_path.is_empty() {
        println!("Cash-flow workbook path: ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input).ok();
        let chosen = input.trim();
        if !chosen.is_empty() {
            settings.file_path = shellexpand_path(chosen);
        }
    }
    if let Some(f) = pnl_file {
        settings.pnl_file_path = shellexpand_path(&f);
    }
    if let Some(secs) = ttl {
        settings.cache_ttl_secs = secs;
    }

    if settings.file_path.is_empty() {
        return Err(DashError::Settings("a cash-flow workbook path is required".to_string()));
    }

    save_settings(&settings)?;

    for path in [&settings.file_path, &settings.pnl_file_path] {
        if !path.is_empty() && !Path::new(path).exists() {
            println!("Warning: {path} does not exist yet");
        }
    }
    println!("Saved settings to {}", settings_path().display());
    Ok(())
}
