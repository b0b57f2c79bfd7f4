pub mod banks;
pub mod config;
pub mod init;
pub mod pnl;
pub mod sheets;
pub mod transactions;
pub mod trend;
pub mod variance;
#[cfg(feature = "watch")]
pub mod watch;

use std::path::PathBuf;
use std::rc::Rc;

use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;

use crate::cache::Cache;
use crate::coercer::LedgerView;
use crate::error::Result;
use crate::pnl::{load_pnl, PnlSummary};
use crate::settings::Settings;
use crate::workbook::{load_ledger, LoadedLedger};

pub(crate) const NO_DATES: &str = "No valid dates found in data.";

#[derive(Parser)]
#[command(name = "cfs", about = "Cash-flow, bank limit and P&L views over spreadsheet workbooks.")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Point cfs at the cash-flow and P&L workbooks.
    Init {
        /// Path to the cash-flow workbook (.xlsx)
        #[arg(long)]
        file: Option<String>,
        /// Path to the P&L workbook (.xlsx)
        #[arg(long = "pnl-file")]
        pnl_file: Option<String>,
        /// Seconds a loaded workbook stays cached
        #[arg(long)]
        ttl: Option<u64>,
    },
    /// Show the effective configuration.
    Config,
    /// Show how each workbook sheet was classified and how many rows survived.
    Sheets {
        /// Column layout to coerce ledger sheets with
        #[arg(long, value_enum, default_value = "detail")]
        view: ViewArg,
    },
    /// Bank-wise limit, usage and availability.
    Banks {
        /// As-of date: YYYY-MM-DD (default: latest date in the workbook)
        #[arg(long = "as-of")]
        as_of: Option<NaiveDate>,
    },
    /// Daily deposits, withdrawals and net flow over a trailing window.
    Trend {
        /// Window end: YYYY-MM-DD (default: latest date in the workbook)
        #[arg(long)]
        end: Option<NaiveDate>,
        /// Window length in days
        #[arg(long, default_value = "30")]
        days: u32,
    },
    /// Fixed and contingency forecast against actual net flow.
    Variance {
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: Option<NaiveDate>,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: Option<NaiveDate>,
    },
    /// Transactions across all banks for a date range.
    Transactions {
        /// Start date: YYYY-MM-DD
        #[arg(long = "from")]
        from_date: Option<NaiveDate>,
        /// End date: YYYY-MM-DD
        #[arg(long = "to")]
        to_date: Option<NaiveDate>,
        /// Also write the rows to this CSV file
        #[arg(long)]
        csv: Option<String>,
    },
    /// P&L line items by month, YTD totals and key ratios.
    Pnl,
    /// Re-render a page on an interval.
    #[cfg(feature = "watch")]
    Watch {
        /// Page to render
        #[arg(value_enum)]
        page: Page,
        /// Seconds between renders
        #[arg(long, default_value = "60")]
        interval: u64,
        /// Stop after this many renders (0 = run until interrupted)
        #[arg(long, default_value = "0")]
        count: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ViewArg {
    Balance,
    Flow,
    Detail,
}

impl From<ViewArg> for LedgerView {
    fn from(v: ViewArg) -> Self {
        match v {
            ViewArg::Balance => LedgerView::Balance,
            ViewArg::Flow => LedgerView::Flow,
            ViewArg::Detail => LedgerView::Detail,
        }
    }
}

#[cfg(feature = "watch")]
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Page {
    Banks,
    Trend,
    Variance,
    Transactions,
    Pnl,
    Sheets,
}

/// Per-process state shared by every page render.
pub struct Context {
    pub settings: Settings,
    ledgers: Cache<(PathBuf, LedgerView), LoadedLedger>,
    statements: Cache<PathBuf, PnlSummary>,
}

impl Context {
    pub fn new(settings: Settings) -> Self {
        let ttl = settings.cache_ttl();
        Self {
            settings,
            ledgers: Cache::new(ttl),
            statements: Cache::new(ttl),
        }
    }

    /// Cached ledger load. A load failure is printed here and comes back as
    /// `None`, as does a workbook with no usable rows.
    pub fn ledger(&mut self, view: LedgerView) -> Result<Option<Rc<LoadedLedger>>> {
        let path = self.settings.workbook_path()?;
        let key = (path.clone(), view);
        let loaded = self.ledgers.get_or_load(&key, || load_ledger(&path, view));
        if let Some(msg) = &loaded.failure {
            eprintln!("{} {msg}", "Error loading Excel file:".red().bold());
            return Ok(None);
        }
        if loaded.data.ledger.is_empty() {
            println!("{}", NO_DATES.yellow());
            return Ok(None);
        }
        Ok(Some(loaded.data))
    }

    pub fn pnl(&mut self) -> Result<Option<Rc<PnlSummary>>> {
        let path = self.settings.pnl_workbook_path()?;
        let fallback = self.settings.ytd_fallback;
        let loaded = self.statements.get_or_load(&path, || load_pnl(&path, fallback));
        if let Some(msg) = &loaded.failure {
            eprintln!(
                "{} {msg}",
                "Could not load P&L data. Please verify the 'P&L' sheet exists in the Excel file:"
                    .red()
                    .bold()
            );
            return Ok(None);
        }
        Ok(Some(loaded.data))
    }

    pub fn unit(&self) -> f64 {
        self.settings.display_unit
    }
}

/// Fill omitted range bounds from the ledger's own span.
pub(crate) fn resolve_range(
    span: (NaiveDate, NaiveDate),
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
) -> (NaiveDate, NaiveDate) {
    (from.unwrap_or(span.0), to.unwrap_or(span.1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::tests::ymd;

    #[test]
    fn test_resolve_range_defaults_to_span() {
        let span = (ymd(2024, 1, 1), ymd(2024, 3, 31));
        assert_eq!(resolve_range(span, None, None), span);
        assert_eq!(
            resolve_range(span, Some(ymd(2024, 2, 1)), None),
            (ymd(2024, 2, 1), ymd(2024, 3, 31))
        );
    }

    #[test]
    fn test_context_without_workbook_is_a_settings_error() {
        let mut ctx = Context::new(Settings::default());
        assert!(ctx.ledger(LedgerView::Flow).is_err());
        assert!(ctx.pnl().is_err());
    }

    #[test]
    fn test_context_reports_load_failure_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let settings = Settings {
            file_path: dir.path().join("missing.xlsx").to_string_lossy().to_string(),
            ..Settings::default()
        };
        let mut ctx = Context::new(settings);
        assert!(ctx.ledger(LedgerView::Balance).unwrap().is_none());
    }

    #[test]
    fn test_cli_parses_dates() {
        let cli = Cli::try_parse_from(["cfs", "banks", "--as-of", "2024-01-10"]).unwrap();
        match cli.command {
            Commands::Banks { as_of } => assert_eq!(as_of, Some(ymd(2024, 1, 10))),
            _ => panic!("expected banks"),
        }
        assert!(Cli::try_parse_from(["cfs", "banks", "--as-of", "10/01/2024"]).is_err());
    }
}
