use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use networth_core::ledger;
use networth_core::types::{Portfolio, Transaction};
use networth_core::xirr::{self, SolverConfig};

use crate::input;

/// Arguments for XIRR calculation
#[derive(Args)]
pub struct XirrArgs {
    /// Path to JSON input file ({transactions, current_value, as_of?})
    #[arg(long)]
    pub input: Option<String>,

    /// Valuation date; defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

/// Arguments for portfolio recalculation
#[derive(Args)]
pub struct RecalculateArgs {
    /// Path to JSON input file ({portfolio, override_unit_price?})
    #[arg(long)]
    pub input: Option<String>,

    /// Live unit price; takes precedence over transaction history
    #[arg(long)]
    pub price: Option<Decimal>,
}

/// Arguments for per-transaction return details
#[derive(Args)]
pub struct TransactionDetailsArgs {
    /// Path to JSON input file ({portfolio, override_unit_price?})
    #[arg(long)]
    pub input: Option<String>,

    /// Live unit price used to value each lot
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Valuation date; defaults to today
    #[arg(long)]
    pub as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct XirrRequest {
    transactions: Vec<Transaction>,
    current_value: Decimal,
    #[serde(default)]
    as_of: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct PortfolioRequest {
    portfolio: Portfolio,
    #[serde(default)]
    override_unit_price: Option<Decimal>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub fn run_xirr(args: XirrArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: XirrRequest = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for xirr",
    )?;
    let as_of = args.as_of.or(request.as_of).unwrap_or_else(today);
    let result = xirr::calculate_xirr(
        &request.transactions,
        request.current_value,
        as_of,
        &SolverConfig::default(),
    )?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_recalculate(args: RecalculateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PortfolioRequest = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for recalculate",
    )?;
    let price = args.price.or(request.override_unit_price);
    let result = ledger::recalculate(&request.portfolio, price);
    Ok(serde_json::to_value(result)?)
}

pub fn run_transaction_details(
    args: TransactionDetailsArgs,
) -> Result<Value, Box<dyn std::error::Error>> {
    let request: PortfolioRequest = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for transaction-details",
    )?;
    let price = args.price.or(request.override_unit_price);
    let as_of = args.as_of.unwrap_or_else(today);
    let result =
        xirr::transaction_details(&request.portfolio, price, as_of, &SolverConfig::default())?;
    Ok(serde_json::to_value(result)?)
}
