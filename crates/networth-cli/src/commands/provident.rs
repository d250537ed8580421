use chrono::{Local, NaiveDate};
use clap::Args;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::Value;

use networth_core::provident::{self, EpfConfig, ProvidentFundAccount};

use crate::input;

/// Arguments for EPF schedule generation
#[derive(Args)]
pub struct EpfScheduleArgs {
    /// Path to JSON input file ({account, start_month, through_month?})
    #[arg(long)]
    pub input: Option<String>,

    /// Monthly wage (builds a fresh account with the flags below)
    #[arg(long)]
    pub wage: Option<Decimal>,

    /// Opening employee-side balance
    #[arg(long, default_value = "0")]
    pub opening_employee: Decimal,

    /// Opening employer-side balance
    #[arg(long, default_value = "0")]
    pub opening_employer: Decimal,

    /// Member of the pension scheme (enables the capped carve-out)
    #[arg(long)]
    pub pension_member: bool,

    /// Annual interest rate as a percentage (e.g. 8.15)
    #[arg(long, default_value = "8.15")]
    pub interest_rate: Decimal,

    /// First contribution month (any day of that month)
    #[arg(long)]
    pub start_month: Option<NaiveDate>,

    /// Last contribution month; defaults to the current month
    #[arg(long)]
    pub through_month: Option<NaiveDate>,
}

/// Arguments for EPF account summary
#[derive(Args)]
pub struct EpfSummaryArgs {
    /// Path to JSON input file ({account})
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for an EPF wage change
#[derive(Args)]
pub struct EpfWageChangeArgs {
    /// Path to JSON input file ({account, new_wage, effective_from})
    #[arg(long)]
    pub input: Option<String>,

    /// New monthly wage
    #[arg(long)]
    pub new_wage: Option<Decimal>,

    /// First month the new wage applies to
    #[arg(long)]
    pub effective_from: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct ScheduleRequest {
    account: ProvidentFundAccount,
    start_month: NaiveDate,
    #[serde(default)]
    through_month: Option<NaiveDate>,
}

#[derive(Deserialize)]
struct SummaryRequest {
    account: ProvidentFundAccount,
}

#[derive(Deserialize)]
struct WageChangeRequest {
    account: ProvidentFundAccount,
    new_wage: Decimal,
    effective_from: NaiveDate,
}

fn current_month() -> NaiveDate {
    Local::now().date_naive()
}

pub fn run_epf_schedule(args: EpfScheduleArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let (account, start_month, through_month) =
        if args.input.is_some() || args.wage.is_none() {
            let request: ScheduleRequest = input::resolve(
                args.input.as_deref(),
                "--input <file.json>, stdin, or --wage with --start-month required for epf-schedule",
            )?;
            (request.account, request.start_month, request.through_month)
        } else {
            let start_month = args
                .start_month
                .ok_or("--start-month is required with --wage")?;
            let account = ProvidentFundAccount {
                opening_employee_balance: args.opening_employee,
                opening_employer_balance: args.opening_employer,
                wage: args.wage.unwrap_or_default(),
                is_pension_member: args.pension_member,
                annual_interest_rate: args.interest_rate,
                contributions: Vec::new(),
            };
            (account, start_month, args.through_month)
        };

    let through = through_month.unwrap_or_else(current_month);
    let result = provident::generate(&account, start_month, through, &EpfConfig::default())?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_epf_summary(args: EpfSummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: SummaryRequest = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for epf-summary",
    )?;
    let result = provident::summary(&request.account, &EpfConfig::default())?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_epf_wage_change(args: EpfWageChangeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request: WageChangeRequest = match (args.new_wage, args.effective_from) {
        (Some(new_wage), Some(effective_from)) => {
            // Scalars override whatever the file carries for the change itself.
            let base: SummaryRequest = input::resolve(
                args.input.as_deref(),
                "--input <file.json> or stdin required for epf-wage-change",
            )?;
            WageChangeRequest {
                account: base.account,
                new_wage,
                effective_from,
            }
        }
        _ => input::resolve(
            args.input.as_deref(),
            "--input <file.json> or stdin required for epf-wage-change",
        )?,
    };

    let result = provident::apply_wage_change(
        &request.account,
        request.new_wage,
        request.effective_from,
        &EpfConfig::default(),
    )?;
    Ok(serde_json::to_value(result)?)
}
