mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::fire::{FireArgs, FireProgressArgs, FireScenariosArgs, RequiredSipArgs};
use commands::portfolio::{RecalculateArgs, TransactionDetailsArgs, XirrArgs};
use commands::provident::{EpfScheduleArgs, EpfSummaryArgs, EpfWageChangeArgs};
use commands::summary::DashboardArgs;

/// Investment analytics for personal-finance ledgers
#[derive(Parser)]
#[command(
    name = "nwa",
    version,
    about = "Investment analytics for personal-finance ledgers",
    long_about = "Decimal-precision investment analytics over transaction ledgers: \
                  money-weighted returns (XIRR), portfolio reconciliation, provident \
                  fund schedules, FIRE projections, and cross-portfolio dashboards."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Money-weighted return (XIRR) of a transaction ledger
    Xirr(XirrArgs),
    /// Rebuild a portfolio's units, cost basis, and value from its ledger
    Recalculate(RecalculateArgs),
    /// Per-transaction returns against a current unit price
    TransactionDetails(TransactionDetailsArgs),
    /// Generate or extend a provident fund contribution schedule
    EpfSchedule(EpfScheduleArgs),
    /// Provident fund account summary with accrued interest
    EpfSummary(EpfSummaryArgs),
    /// Apply a (possibly back-dated) wage change to an EPF schedule
    EpfWageChange(EpfWageChangeArgs),
    /// Full FIRE plan: target, progress, and wealth trajectory
    Fire(FireArgs),
    /// Progress against a saved FIRE goal
    FireProgress(FireProgressArgs),
    /// Required contributions under three return scenarios
    FireScenarios(FireScenariosArgs),
    /// Level monthly contribution needed to reach a target
    RequiredSip(RequiredSipArgs),
    /// Cross-portfolio dashboard with blended IRRs per asset class
    Dashboard(DashboardArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Xirr(args) => commands::portfolio::run_xirr(args),
        Commands::Recalculate(args) => commands::portfolio::run_recalculate(args),
        Commands::TransactionDetails(args) => commands::portfolio::run_transaction_details(args),
        Commands::EpfSchedule(args) => commands::provident::run_epf_schedule(args),
        Commands::EpfSummary(args) => commands::provident::run_epf_summary(args),
        Commands::EpfWageChange(args) => commands::provident::run_epf_wage_change(args),
        Commands::Fire(args) => commands::fire::run_fire(args),
        Commands::FireProgress(args) => commands::fire::run_fire_progress(args),
        Commands::FireScenarios(args) => commands::fire::run_fire_scenarios(args),
        Commands::RequiredSip(args) => commands::fire::run_required_sip(args),
        Commands::Dashboard(args) => commands::summary::run_dashboard(args),
        Commands::Version => {
            println!("nwa {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}
