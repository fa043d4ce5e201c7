use anyhow::Result;
use chrono::NaiveDate;
use clap::{Args, CommandFactory, Parser, Subcommand};
use fcrdash::core::Currency;
use fcrdash::core::log::init_logging;
use std::path::PathBuf;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Args, Clone, Default)]
struct ViewArgs {
    /// Price data CSV file
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Currency to show prices in (SEK or EUR)
    #[arg(long)]
    currency: Option<Currency>,

    /// First date to include (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Last date to include (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,
}

impl From<ViewArgs> for fcrdash::ViewOptions {
    fn from(args: ViewArgs) -> fcrdash::ViewOptions {
        fcrdash::ViewOptions {
            data_path: args.data,
            currency: args.currency,
            start: args.start,
            end: args.end,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Display all views and the data summary
    Summary(ViewArgs),
    /// Display daily average prices
    Daily(ViewArgs),
    /// Display monthly average prices per year
    Monthly(ViewArgs),
    /// Display yearly average prices
    Yearly(ViewArgs),
    /// Display hourly average prices per year
    Hourly(ViewArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config_path = cli.config_path.as_deref();
    let result = match cli.command {
        Some(Commands::Setup) => fcrdash::cli::setup::setup(),
        Some(Commands::Summary(args)) => run(fcrdash::AppCommand::Summary, args, config_path),
        Some(Commands::Daily(args)) => run(fcrdash::AppCommand::Daily, args, config_path),
        Some(Commands::Monthly(args)) => run(fcrdash::AppCommand::Monthly, args, config_path),
        Some(Commands::Yearly(args)) => run(fcrdash::AppCommand::Yearly, args, config_path),
        Some(Commands::Hourly(args)) => run(fcrdash::AppCommand::Hourly, args, config_path),
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}

fn run(cmd: fcrdash::AppCommand, args: ViewArgs, config_path: Option<&str>) -> Result<()> {
    fcrdash::run_command(cmd, &args.into(), config_path)
}
