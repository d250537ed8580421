use chrono::{Local, NaiveDate};
use clap::Args;
use serde_json::Value;

use networth_core::dashboard::{self, DashboardInput};
use networth_core::xirr::SolverConfig;

use crate::input;

/// Arguments for the dashboard aggregation
#[derive(Args)]
pub struct DashboardArgs {
    /// Path to JSON input file ({portfolios, provident_accounts})
    #[arg(long)]
    pub input: Option<String>,

    /// Valuation date for blended IRRs; defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

pub fn run_dashboard(args: DashboardArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let dashboard_input: DashboardInput = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for dashboard",
    )?;
    let as_of = args.as_of.unwrap_or_else(|| Local::now().date_naive());
    let result = dashboard::aggregate(&dashboard_input, as_of, &SolverConfig::default())?;
    Ok(serde_json::to_value(result)?)
}
