use chrono::{Datelike, Months, NaiveDate};
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

/// Statutory contribution policy. Defaults carry the current EPF/EPS rules
/// (12% both sides, 8.33% pension carve-out on wages capped at 15,000 with
/// a 1,250 ceiling); jurisdictions change these without touching the
/// schedule logic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpfConfig {
    /// Employee share of wage, as a fraction (0.12 = 12%).
    pub employee_rate: Rate,
    /// Employer share of wage, as a fraction.
    pub employer_rate: Rate,
    /// Pension carve-out rate applied to the capped wage base.
    pub pension_rate: Rate,
    pub pension_wage_cap: Money,
    pub pension_contribution_cap: Money,
}

impl Default for EpfConfig {
    fn default() -> Self {
        Self {
            employee_rate: dec!(0.12),
            employer_rate: dec!(0.12),
            pension_rate: dec!(0.0833),
            pension_wage_cap: dec!(15000),
            pension_contribution_cap: dec!(1250),
        }
    }
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// One month's statutory contribution split.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpfContribution {
    /// First-of-month date identifying the contribution month.
    pub month: NaiveDate,
    pub wage_base: Money,
    pub employee_share: Money,
    pub employer_share: Money,
    /// Capped wage the pension carve-out was computed on; zero for
    /// non-members.
    pub pension_wage_base: Money,
}

/// A provident-fund account snapshot. Contributions are one per calendar
/// month, contiguous and strictly increasing; `generate` preserves that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProvidentFundAccount {
    pub opening_employee_balance: Money,
    pub opening_employer_balance: Money,
    /// Monthly wage the statutory percentages apply to.
    pub wage: Money,
    pub is_pension_member: bool,
    /// Annual interest rate as a percentage (8.15 = 8.15%).
    pub annual_interest_rate: Rate,
    #[serde(default)]
    pub contributions: Vec<EpfContribution>,
}

/// Account summary with balances split by side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EpfSummary {
    pub opening_employee_balance: Money,
    pub opening_employer_balance: Money,
    pub total_employee_contribution: Money,
    pub total_employer_contribution: Money,
    pub current_employee_value: Money,
    pub current_employer_value: Money,
    pub current_value: Money,
    pub accrued_interest: Money,
    pub annual_interest_rate: Rate,
    pub is_pension_member: bool,
    pub wage: Money,
    pub contributions: Vec<EpfContribution>,
}

// ---------------------------------------------------------------------------
// Schedule generation
// ---------------------------------------------------------------------------

fn validate(account: &ProvidentFundAccount) -> NetWorthResult<()> {
    if account.wage < Decimal::ZERO {
        return Err(NetWorthError::InvalidInput {
            field: "wage".into(),
            reason: "wage must not be negative".into(),
        });
    }
    if account.annual_interest_rate < Decimal::ZERO {
        return Err(NetWorthError::InvalidInput {
            field: "annual_interest_rate".into(),
            reason: "interest rate must not be negative".into(),
        });
    }
    Ok(())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

fn next_month(month: NaiveDate) -> NetWorthResult<NaiveDate> {
    month
        .checked_add_months(Months::new(1))
        .ok_or_else(|| NetWorthError::DateError(format!("month overflow after {month}")))
}

fn monthly_shares(wage: Money, is_pension_member: bool, config: &EpfConfig) -> (Money, Money, Money) {
    let employee_share = wage * config.employee_rate;
    if is_pension_member {
        let pension_wage_base = wage.min(config.pension_wage_cap);
        let pension_carve_out =
            (pension_wage_base * config.pension_rate).min(config.pension_contribution_cap);
        let employer_share = wage * config.employer_rate - pension_carve_out;
        (employee_share, employer_share, pension_wage_base)
    } else {
        (employee_share, wage * config.employer_rate, Decimal::ZERO)
    }
}

/// Extend the monthly contribution schedule through `through_month`
/// (inclusive, first-of-month granularity).
///
/// Appends strictly after the last recorded month, so re-running with an
/// already-covered `through_month` is a no-op and history is never
/// rewritten. A fresh account starts at `start_month`.
pub fn generate(
    account: &ProvidentFundAccount,
    start_month: NaiveDate,
    through_month: NaiveDate,
    config: &EpfConfig,
) -> NetWorthResult<ProvidentFundAccount> {
    validate(account)?;

    let mut next = account.clone();
    let through = first_of_month(through_month);

    let mut month = match next.contributions.last() {
        Some(last) => next_month(first_of_month(last.month))?,
        None => first_of_month(start_month),
    };

    while month <= through {
        let (employee_share, employer_share, pension_wage_base) =
            monthly_shares(next.wage, next.is_pension_member, config);
        next.contributions.push(EpfContribution {
            month,
            wage_base: next.wage,
            employee_share,
            employer_share,
            pension_wage_base,
        });
        month = next_month(month)?;
    }

    Ok(next)
}

/// Rewrite shares for every contribution month at or after
/// `effective_from` at the new wage, leaving earlier months untouched.
pub fn apply_wage_change(
    account: &ProvidentFundAccount,
    new_wage: Money,
    effective_from: NaiveDate,
    config: &EpfConfig,
) -> NetWorthResult<ProvidentFundAccount> {
    validate(account)?;
    if new_wage < Decimal::ZERO {
        return Err(NetWorthError::InvalidInput {
            field: "new_wage".into(),
            reason: "wage must not be negative".into(),
        });
    }

    let mut next = account.clone();
    next.wage = new_wage;

    let effective = first_of_month(effective_from);
    let (employee_share, employer_share, pension_wage_base) =
        monthly_shares(new_wage, next.is_pension_member, config);

    for contribution in next
        .contributions
        .iter_mut()
        .filter(|c| c.month >= effective)
    {
        contribution.wage_base = new_wage;
        contribution.employee_share = employee_share;
        contribution.employer_share = employer_share;
        contribution.pension_wage_base = pension_wage_base;
    }

    Ok(next)
}

// ---------------------------------------------------------------------------
// Valuation
// ---------------------------------------------------------------------------

fn total_contributions(account: &ProvidentFundAccount) -> Money {
    account
        .contributions
        .iter()
        .map(|c| c.employee_share + c.employer_share)
        .sum()
}

/// Simple interest over the elapsed span: one application of
/// `(opening + contributions) * rate * months/12`, not month-over-month
/// compounding. The approximation is part of the valuation contract.
pub fn accrued_interest(account: &ProvidentFundAccount) -> Money {
    let opening = account.opening_employee_balance + account.opening_employer_balance;
    let months_elapsed = Decimal::from(account.contributions.len() as u64);
    (opening + total_contributions(account))
        * (account.annual_interest_rate / dec!(100))
        * (months_elapsed / dec!(12))
}

/// Opening balances plus all recorded shares plus accrued simple interest.
pub fn current_value(account: &ProvidentFundAccount) -> Money {
    account.opening_employee_balance
        + account.opening_employer_balance
        + total_contributions(account)
        + accrued_interest(account)
}

/// Full account summary. Interest accrues on the pooled balance and is
/// reported half to each side.
pub fn summary(
    account: &ProvidentFundAccount,
    config: &EpfConfig,
) -> NetWorthResult<ComputationOutput<EpfSummary>> {
    let start = Instant::now();
    validate(account)?;

    let mut warnings = Vec::new();
    if account.contributions.is_empty() {
        warnings.push("no contribution months recorded; value is opening balances only".into());
    }

    let total_employee: Money = account.contributions.iter().map(|c| c.employee_share).sum();
    let total_employer: Money = account.contributions.iter().map(|c| c.employer_share).sum();
    let interest = accrued_interest(account);
    let half_interest = interest / dec!(2);

    let result = EpfSummary {
        opening_employee_balance: account.opening_employee_balance,
        opening_employer_balance: account.opening_employer_balance,
        total_employee_contribution: total_employee,
        total_employer_contribution: total_employer,
        current_employee_value: account.opening_employee_balance + total_employee + half_interest,
        current_employer_value: account.opening_employer_balance + total_employer + half_interest,
        current_value: current_value(account),
        accrued_interest: interest,
        annual_interest_rate: account.annual_interest_rate,
        is_pension_member: account.is_pension_member,
        wage: account.wage,
        contributions: account.contributions.clone(),
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Provident fund accrual (statutory monthly shares, simple interest over elapsed months)",
        &serde_json::json!({
            "wage": account.wage.to_string(),
            "is_pension_member": account.is_pension_member,
            "annual_interest_rate_pct": account.annual_interest_rate.to_string(),
            "employee_rate": config.employee_rate.to_string(),
            "employer_rate": config.employer_rate.to_string(),
            "pension_rate": config.pension_rate.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
