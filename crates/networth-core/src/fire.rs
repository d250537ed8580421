use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::NetWorthError;
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::NetWorthResult;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Projection policy knobs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireConfig {
    /// Horizon when no target age bounds the projection.
    pub default_horizon_years: u32,
    /// Target defaults to this multiple of annual expenses (the 25x rule).
    pub expense_multiple: Decimal,
}

impl Default for FireConfig {
    fn default() -> Self {
        Self {
            default_horizon_years: 50,
            expense_multiple: dec!(25),
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Inputs for a raw wealth projection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectionInput {
    pub current_wealth: Money,
    pub current_age: u32,
    pub monthly_contribution: Money,
    /// Annual return as a percentage (12 = 12%).
    pub annual_return_rate: Rate,
    pub target_amount: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age: Option<u32>,
}

/// One simulated year of the wealth trajectory. Monetary fields are
/// rounded to 2dp; the simulation itself carries full precision forward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectionPoint {
    pub year: u32,
    pub age: u32,
    pub projected_wealth: Money,
    pub annual_contribution: Money,
    pub annual_growth: Money,
}

/// Inputs for a full FIRE plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FirePlanInput {
    pub current_net_worth: Money,
    pub current_age: u32,
    pub monthly_investment: Money,
    /// Annual return as a percentage.
    pub expected_annual_return: Rate,
    pub monthly_expenses: Money,
    /// Safe withdrawal rate as a percentage (4 = the 4% rule).
    pub withdrawal_rate: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_age: Option<u32>,
}

/// Full FIRE plan: target, progress, and the year-by-year trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireOutput {
    pub current_net_worth: Money,
    pub target_amount: Money,
    pub progress_percentage: Rate,
    pub years_to_fire: u32,
    pub fire_age: u32,
    pub monthly_passive_income: Money,
    pub annual_expenses: Money,
    pub projections: Vec<ProjectionPoint>,
}

/// Inputs for goal progress against a saved target.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireProgressInput {
    pub current_net_worth: Money,
    pub target_amount: Money,
    pub years_elapsed: u32,
    pub years_remaining: u32,
    pub current_monthly_contribution: Money,
    /// Annual return as a percentage.
    pub expected_annual_return: Rate,
}

/// Progress snapshot toward a goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireProgress {
    pub current_net_worth: Money,
    pub target_amount: Money,
    pub progress_percentage: Rate,
    pub gap_amount: Money,
    pub years_remaining: u32,
    pub required_monthly_contribution: Money,
    pub required_additional_contribution: Money,
    /// Elapsed-time heuristic: progress compared against the share of the
    /// accumulation window already spent. A display hint, not a verified
    /// projection.
    pub on_track: bool,
}

/// Inputs for the three-rate scenario table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireScenariosInput {
    pub current_net_worth: Money,
    pub target_amount: Money,
    pub months_remaining: u32,
    /// Annual returns as percentages.
    pub conservative_return: Rate,
    pub expected_return: Rate,
    pub aggressive_return: Rate,
}

/// Required contribution and projected outcome under one return assumption.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FireScenario {
    pub scenario: String,
    pub return_rate: Rate,
    pub required_monthly_contribution: Money,
    pub projected_amount: Money,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
fn compound(rate: Decimal, n: u32) -> Decimal {
    let mut result = Decimal::ONE;
    let factor = Decimal::ONE + rate;
    for _ in 0..n {
        result *= factor;
    }
    result
}

fn validate_rate_and_contribution(
    monthly_contribution: Money,
    annual_return_rate: Rate,
) -> NetWorthResult<()> {
    if monthly_contribution < Decimal::ZERO {
        return Err(NetWorthError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "contribution must not be negative".into(),
        });
    }
    if annual_return_rate <= dec!(-100) {
        return Err(NetWorthError::InvalidInput {
            field: "annual_return_rate".into(),
            reason: "return rate must be greater than -100%".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Projection
// ---------------------------------------------------------------------------

/// Simulate monthly compounding of a recurring contribution, one recorded
/// point per year.
///
/// The series ends at the horizon or with the first point at or past the
/// target, whichever comes first. The target check runs after recording
/// and skips year 0, so a target already met today still produces the
/// year-1 point before the series stops.
pub fn project(input: &ProjectionInput, config: &FireConfig) -> NetWorthResult<Vec<ProjectionPoint>> {
    validate_rate_and_contribution(input.monthly_contribution, input.annual_return_rate)?;

    let monthly_rate = input.annual_return_rate / dec!(100) / dec!(12);
    let horizon = match input.target_age {
        Some(age) if age > input.current_age => age - input.current_age,
        Some(_) => 0,
        None => config.default_horizon_years,
    };

    let annual_contribution = input.monthly_contribution * dec!(12);
    let mut points = Vec::new();
    let mut wealth = input.current_wealth;

    for year in 0..=horizon {
        let year_start = wealth;
        for _ in 0..12 {
            wealth += input.monthly_contribution;
            wealth *= Decimal::ONE + monthly_rate;
        }

        points.push(ProjectionPoint {
            year,
            age: input.current_age + year,
            projected_wealth: wealth.round_dp(2),
            annual_contribution: annual_contribution.round_dp(2),
            annual_growth: (wealth - year_start - annual_contribution).round_dp(2),
        });

        if wealth >= input.target_amount && year > 0 {
            break;
        }
    }

    Ok(points)
}

/// Year index of the first point meeting the target (past year 0), or the
/// final simulated year when the target is never reached.
pub fn years_to_target(points: &[ProjectionPoint], target: Money) -> u32 {
    points
        .iter()
        .find(|p| p.projected_wealth >= target && p.year > 0)
        .or_else(|| points.last())
        .map(|p| p.year)
        .unwrap_or(0)
}

/// Level monthly payment that, on top of compounding the present value,
/// reaches `target_value` in `months` (ordinary annuity).
///
/// Zero months yields zero; a zero rate degenerates to straight division;
/// and when the compounded present value alone covers the target the
/// payment clamps to zero.
pub fn required_contribution(
    present_value: Money,
    target_value: Money,
    months: u32,
    annual_return_rate: Rate,
) -> NetWorthResult<Money> {
    if annual_return_rate <= dec!(-100) {
        return Err(NetWorthError::InvalidInput {
            field: "annual_return_rate".into(),
            reason: "return rate must be greater than -100%".into(),
        });
    }
    if months == 0 {
        return Ok(Decimal::ZERO);
    }

    let monthly_rate = annual_return_rate / dec!(100) / dec!(12);
    if monthly_rate.is_zero() {
        return Ok((target_value - present_value) / Decimal::from(months));
    }

    let growth = compound(monthly_rate, months);
    let remaining = target_value - present_value * growth;
    if remaining <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }

    let annuity_factor = (growth - Decimal::ONE) / monthly_rate;
    Ok(remaining / annuity_factor)
}

/// Future value of a lump sum plus a level monthly contribution.
pub fn projected_amount(
    present_value: Money,
    monthly_contribution: Money,
    months: u32,
    annual_return_rate: Rate,
) -> Money {
    let monthly_rate = annual_return_rate / dec!(100) / dec!(12);
    let growth = compound(monthly_rate, months);
    let fv_present = present_value * growth;
    let fv_contributions = if monthly_rate.is_zero() {
        monthly_contribution * Decimal::from(months)
    } else {
        monthly_contribution * (growth - Decimal::ONE) / monthly_rate
    };
    (fv_present + fv_contributions).round_dp(2)
}

// ---------------------------------------------------------------------------
// Plans and progress
// ---------------------------------------------------------------------------

/// Full FIRE plan: resolve the target (explicit or 25x annual expenses),
/// project the trajectory, and summarize progress and passive income.
pub fn plan_fire(
    input: &FirePlanInput,
    config: &FireConfig,
) -> NetWorthResult<ComputationOutput<FireOutput>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let annual_expenses = input.monthly_expenses * dec!(12);
    let target_amount = input
        .target_amount
        .unwrap_or(annual_expenses * config.expense_multiple);
    if target_amount <= Decimal::ZERO {
        return Err(NetWorthError::InvalidInput {
            field: "target_amount".into(),
            reason: "supply a positive target or positive monthly expenses".into(),
        });
    }

    let progress_percentage =
        (input.current_net_worth / target_amount * dec!(100)).round_dp(2);
    let monthly_passive_income =
        (target_amount * input.withdrawal_rate / dec!(100) / dec!(12)).round_dp(2);

    let projections = project(
        &ProjectionInput {
            current_wealth: input.current_net_worth,
            current_age: input.current_age,
            monthly_contribution: input.monthly_investment,
            annual_return_rate: input.expected_annual_return,
            target_amount,
            target_age: input.target_age,
        },
        config,
    )?;

    let years_to_fire = years_to_target(&projections, target_amount);
    let reached = projections
        .iter()
        .any(|p| p.projected_wealth >= target_amount && p.year > 0);
    if !reached {
        warnings.push(format!(
            "target not reached within the simulated horizon; showing year {} as best effort",
            years_to_fire
        ));
    }

    let result = FireOutput {
        current_net_worth: input.current_net_worth,
        target_amount,
        progress_percentage,
        years_to_fire,
        fire_age: input.current_age + years_to_fire,
        monthly_passive_income,
        annual_expenses: annual_expenses.round_dp(2),
        projections,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "FIRE projection (monthly compounding of recurring contributions)",
        &serde_json::json!({
            "expected_annual_return_pct": input.expected_annual_return.to_string(),
            "withdrawal_rate_pct": input.withdrawal_rate.to_string(),
            "target_amount": target_amount.to_string(),
            "target_age": input.target_age,
        }),
        warnings,
        elapsed,
        result,
    ))
}

/// Progress against a saved goal, including the contribution step-up
/// needed to stay on schedule.
pub fn goal_progress(
    input: &FireProgressInput,
) -> NetWorthResult<ComputationOutput<FireProgress>> {
    let start = Instant::now();

    if input.target_amount <= Decimal::ZERO {
        return Err(NetWorthError::InvalidInput {
            field: "target_amount".into(),
            reason: "target must be positive".into(),
        });
    }

    let months_remaining = (input.years_remaining * 12).max(1);
    let progress_percentage =
        (input.current_net_worth / input.target_amount * dec!(100)).round_dp(2);
    let gap_amount = input.target_amount - input.current_net_worth;

    let required = required_contribution(
        input.current_net_worth,
        input.target_amount,
        months_remaining,
        input.expected_annual_return,
    )?;
    let required_additional =
        (required - input.current_monthly_contribution).max(Decimal::ZERO);

    // Heuristic on-track test: compare progress with the fraction of the
    // accumulation window already behind us.
    let total_years = input.years_elapsed + input.years_remaining;
    let expected_progress = if total_years > 0 {
        Decimal::from(input.years_elapsed) / Decimal::from(total_years) * dec!(100)
    } else {
        Decimal::ZERO
    };
    let on_track = progress_percentage >= expected_progress;

    let result = FireProgress {
        current_net_worth: input.current_net_worth,
        target_amount: input.target_amount,
        progress_percentage,
        gap_amount: gap_amount.round_dp(2),
        years_remaining: input.years_remaining,
        required_monthly_contribution: required.round_dp(2),
        required_additional_contribution: required_additional.round_dp(2),
        on_track,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "FIRE goal progress (ordinary annuity against remaining months; elapsed-time on-track heuristic)",
        &serde_json::json!({
            "expected_annual_return_pct": input.expected_annual_return.to_string(),
            "months_remaining": months_remaining,
            "years_elapsed": input.years_elapsed,
        }),
        Vec::new(),
        elapsed,
        result,
    ))
}

/// Required contribution and projected outcome under conservative,
/// expected, and aggressive return assumptions.
pub fn scenarios(input: &FireScenariosInput) -> NetWorthResult<Vec<FireScenario>> {
    let named_rates = [
        ("conservative", input.conservative_return),
        ("expected", input.expected_return),
        ("aggressive", input.aggressive_return),
    ];

    let mut out = Vec::with_capacity(named_rates.len());
    for (name, rate) in named_rates {
        let required = required_contribution(
            input.current_net_worth,
            input.target_amount,
            input.months_remaining,
            rate,
        )?;
        out.push(FireScenario {
            scenario: name.to_string(),
            return_rate: rate,
            required_monthly_contribution: required.round_dp(2),
            projected_amount: projected_amount(
                input.current_net_worth,
                required,
                input.months_remaining,
                rate,
            ),
        });
    }
    Ok(out)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
