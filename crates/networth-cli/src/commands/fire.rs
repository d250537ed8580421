use clap::Args;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde_json::Value;

use networth_core::fire::{
    self, FireConfig, FirePlanInput, FireProgressInput, FireScenariosInput,
};

use crate::input;

/// Arguments for a full FIRE plan
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct FireArgs {
    /// Current net worth
    #[arg(long)]
    pub current_net_worth: Option<Decimal>,

    /// Current age in years
    #[arg(long)]
    pub current_age: Option<u32>,

    /// Recurring monthly investment
    #[arg(long)]
    pub monthly_investment: Option<Decimal>,

    /// Expected annual return as a percentage (10 = 10%)
    #[arg(long)]
    pub expected_annual_return: Option<Decimal>,

    /// Current monthly expenses (targets default to 25x the annual figure)
    #[arg(long)]
    pub monthly_expenses: Option<Decimal>,

    /// Safe withdrawal rate as a percentage
    #[arg(long, default_value = "4")]
    pub withdrawal_rate: Decimal,

    /// Explicit target amount (overrides the expense-derived default)
    #[arg(long)]
    pub target_amount: Option<Decimal>,

    /// Age that bounds the projection horizon
    #[arg(long)]
    pub target_age: Option<u32>,

    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for FIRE goal progress
#[derive(Args)]
pub struct FireProgressArgs {
    /// Path to JSON input file with a FireProgressInput
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the three-rate scenario table
#[derive(Args)]
pub struct FireScenariosArgs {
    /// Path to JSON input file with a FireScenariosInput
    #[arg(long)]
    pub input: Option<String>,
}

/// Arguments for the required-contribution solve
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct RequiredSipArgs {
    /// Present value already invested
    #[arg(long)]
    pub present_value: Decimal,

    /// Target value to reach
    #[arg(long)]
    pub target_value: Decimal,

    /// Months until the deadline
    #[arg(long)]
    pub months: u32,

    /// Annual return as a percentage
    #[arg(long)]
    pub annual_return_rate: Decimal,
}

pub fn run_fire(args: FireArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let plan_input: FirePlanInput = if let Some(path) = args.input.as_deref() {
        input::file::read_json(path)?
    } else if let (Some(net_worth), Some(age), Some(monthly), Some(rate)) = (
        args.current_net_worth,
        args.current_age,
        args.monthly_investment,
        args.expected_annual_return,
    ) {
        FirePlanInput {
            current_net_worth: net_worth,
            current_age: age,
            monthly_investment: monthly,
            expected_annual_return: rate,
            monthly_expenses: args.monthly_expenses.unwrap_or(dec!(0)),
            withdrawal_rate: args.withdrawal_rate,
            target_amount: args.target_amount,
            target_age: args.target_age,
        }
    } else if let Some(piped) = input::stdin::read_stdin()? {
        serde_json::from_value(piped)?
    } else {
        return Err("--input <file.json> or --current-net-worth, --current-age, \
                    --monthly-investment and --expected-annual-return required for fire"
            .into());
    };

    let result = fire::plan_fire(&plan_input, &FireConfig::default())?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fire_progress(args: FireProgressArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let progress_input: FireProgressInput = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for fire-progress",
    )?;
    let result = fire::goal_progress(&progress_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_fire_scenarios(args: FireScenariosArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let scenarios_input: FireScenariosInput = input::resolve(
        args.input.as_deref(),
        "--input <file.json> or stdin required for fire-scenarios",
    )?;
    let result = fire::scenarios(&scenarios_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_required_sip(args: RequiredSipArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let payment = fire::required_contribution(
        args.present_value,
        args.target_value,
        args.months,
        args.annual_return_rate,
    )?;
    Ok(serde_json::json!({
        "required_monthly_contribution": payment.round_dp(2),
        "months": args.months,
        "annual_return_rate": args.annual_return_rate,
    }))
}
