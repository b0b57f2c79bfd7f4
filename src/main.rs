mod cache;
mod classifier;
mod cli;
mod coercer;
mod error;
mod fmt;
mod forecast;
mod ledger;
mod logging;
mod models;
mod pnl;
mod reports;
mod settings;
mod tracker;
mod workbook;

use clap::Parser;

use cli::{Cli, Commands, Context};
use settings::load_settings;

fn main() {
    logging::init_tracing();
    let cli = Cli::parse();

    let mut ctx = Context::new(load_settings());

    let result = match cli.command {
        Commands::Init {
            file,
            pnl_file,
            ttl,
        } => cli::init::run(file, pnl_file, ttl),
        Commands::Config => cli::config::run(),
        Commands::Sheets { view } => cli::sheets::run(&mut ctx, view.into()),
        Commands::Banks { as_of } => cli::banks::run(&mut ctx, as_of),
        Commands::Trend { end, days } => cli::trend::run(&mut ctx, end, days),
        Commands::Variance { from_date, to_date } => cli::variance::run(&mut ctx, from_date, to_date),
        Commands::Transactions {
            from_date,
            to_date,
            csv,
        } => cli::transactions::run(&mut ctx, from_date, to_date, csv),
        Commands::Pnl => cli::pnl::run(&mut ctx),
        #[cfg(feature = "watch")]
        Commands::Watch {
            page,
            interval,
            count,
        } => cli::watch::run(&mut ctx, page, interval, count),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
