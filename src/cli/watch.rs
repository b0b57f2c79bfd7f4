use std::io::Write;
use std::time::Duration;

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{Clear, ClearType};

use crate::cli::{self, Context, Page};
use crate::coercer::LedgerView;
use crate::error::{DashError, Result};

fn render(ctx: &mut Context, page: Page) -> Result<()> {
    match page {
        Page::Banks => cli::banks::run(ctx, None),
        Page::Trend => cli::trend::run(ctx, None, 30),
        Page::Variance => cli::variance::run(ctx, None, None),
        Page::Transactions => cli::transactions::run(ctx, None, None, None),
        Page::Pnl => cli::pnl::run(ctx),
        Page::Sheets => cli::sheets::run(ctx, LedgerView::Detail),
    }
}

/// Re-render `page` every `interval` seconds. Loads go through the context's
/// cache, so the workbook is re-read only once the cache TTL has passed.
pub fn run(ctx: &mut Context, page: Page, interval: u64, count: u32) -> Result<()> {
    if interval == 0 {
        return Err(DashError::Other("--interval must be at least 1 second".to_string()));
    }
    let mut stdout = std::io::stdout();
    let mut renders = 0u32;
    loop {
        execute!(stdout, Clear(ClearType::All), MoveTo(0, 0))?;
        render(ctx, page)?;
        println!(
            "\nRefreshed {} (every {interval}s, Ctrl-C to stop)",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        stdout.flush()?;

        renders += 1;
        if count > 0 && renders >= count {
            return Ok(());
        }
        std::thread::sleep(Duration::from_secs(interval));
    }
}
