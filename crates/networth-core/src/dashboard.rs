use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::provident::{self, ProvidentFundAccount};
use crate::types::{
    with_metadata, AssetClass, ComputationOutput, Money, Portfolio, Rate, Transaction,
    TransactionKind,
};
use crate::xirr::{self, SolverConfig};
use crate::NetWorthResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Everything on the dashboard: market portfolios plus provident-fund
/// accounts, which carry value but no market ledger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardInput {
    #[serde(default)]
    pub portfolios: Vec<Portfolio>,
    #[serde(default)]
    pub provident_accounts: Vec<ProvidentFundAccount>,
}

/// Value and share of one asset class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetAllocation {
    pub asset_class: AssetClass,
    pub value: Money,
    pub percentage: Rate,
}

/// Blended metrics for one asset class.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassMetrics {
    pub asset_class: AssetClass,
    pub current_value: Money,
    /// None means unavailable (no transactions or no positive value),
    /// which is distinct from a 0% return.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blended_xirr: Option<Rate>,
}

/// Cross-portfolio dashboard metrics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_net_worth: Money,
    pub total_invested: Money,
    pub total_gain: Money,
    pub gain_percentage: Rate,
    /// One blend across all growth-oriented classes; fixed-accrual classes
    /// never enter it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overall_xirr: Option<Rate>,
    pub class_metrics: Vec<ClassMetrics>,
    pub allocations: Vec<AssetAllocation>,
    pub provident_value: Money,
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

fn net_invested(transactions: &[Transaction]) -> Money {
    let mut total = Decimal::ZERO;
    for txn in transactions {
        match txn.kind {
            TransactionKind::Contribution => total += txn.amount,
            TransactionKind::Withdrawal => total -= txn.amount,
        }
    }
    total
}

/// Blended IRR of a portfolio group: every transaction pooled into one
/// solve against the group's pooled value. Averaging per-portfolio rates
/// would weight them wrongly; pooling is the contract.
fn blended_irr(
    portfolios: &[&Portfolio],
    pooled_value: Money,
    as_of: NaiveDate,
    solver: &SolverConfig,
) -> Option<Rate> {
    let pooled: Vec<Transaction> = portfolios
        .iter()
        .flat_map(|p| p.transactions.iter().cloned())
        .collect();
    if pooled.is_empty() || pooled_value <= Decimal::ZERO {
        return None;
    }
    xirr::calculate_xirr(&pooled, pooled_value, as_of, solver)
        .ok()
        .map(|r| r.xirr)
}

fn share_of(value: Money, total: Money) -> Rate {
    if total > Decimal::ZERO {
        (value / total * dec!(100)).round_dp(2)
    } else {
        Decimal::ZERO
    }
}

/// Group portfolios by asset class and blend their metrics.
pub fn aggregate(
    input: &DashboardInput,
    as_of: NaiveDate,
    solver: &SolverConfig,
) -> NetWorthResult<ComputationOutput<DashboardSummary>> {
    let start = Instant::now();
    let mut warnings = Vec::new();

    let provident_value: Money = input
        .provident_accounts
        .iter()
        .map(provident::current_value)
        .sum();
    let portfolio_value: Money = input.portfolios.iter().map(|p| p.current_value).sum();
    let total_net_worth = portfolio_value + provident_value;

    // Invested capital: transaction ledgers for market portfolios, opening
    // balances plus recorded shares for provident accounts.
    let mut total_invested = Decimal::ZERO;
    for portfolio in &input.portfolios {
        total_invested += net_invested(&portfolio.transactions);
    }
    for account in &input.provident_accounts {
        total_invested += account.opening_employee_balance
            + account.opening_employer_balance
            + account
                .contributions
                .iter()
                .map(|c| c.employee_share + c.employer_share)
                .sum::<Decimal>();
    }

    let total_gain = total_net_worth - total_invested;
    let gain_percentage = if total_invested > Decimal::ZERO {
        (total_gain / total_invested * dec!(100)).round_dp(2)
    } else {
        Decimal::ZERO
    };

    let mut class_metrics = Vec::new();
    let mut allocations = Vec::new();

    for class in AssetClass::ALL {
        let members: Vec<&Portfolio> = input
            .portfolios
            .iter()
            .filter(|p| p.asset_class == class)
            .collect();

        let mut class_value: Money = members.iter().map(|p| p.current_value).sum();
        if class == AssetClass::ProvidentFund {
            class_value += provident_value;
        }

        let present = !members.is_empty()
            || (class == AssetClass::ProvidentFund && !input.provident_accounts.is_empty());
        if !present {
            continue;
        }

        allocations.push(AssetAllocation {
            asset_class: class,
            value: class_value,
            percentage: share_of(class_value, total_net_worth),
        });

        let blended_xirr = blended_irr(&members, class_value, as_of, solver);
        if class.is_growth_oriented() && blended_xirr.is_none() {
            warnings.push(format!(
                "{:?}: blended IRR unavailable (no transactions or non-positive value)",
                class
            ));
        }
        class_metrics.push(ClassMetrics {
            asset_class: class,
            current_value: class_value,
            blended_xirr,
        });
    }

    let growth: Vec<&Portfolio> = input
        .portfolios
        .iter()
        .filter(|p| p.asset_class.is_growth_oriented())
        .collect();
    let growth_value: Money = growth.iter().map(|p| p.current_value).sum();
    let overall_xirr = blended_irr(&growth, growth_value, as_of, solver);

    let result = DashboardSummary {
        total_net_worth,
        total_invested,
        total_gain,
        gain_percentage,
        overall_xirr,
        class_metrics,
        allocations,
        provident_value,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Dashboard aggregation (weighted sums per asset class; pooled-transaction blended IRR)",
        &serde_json::json!({
            "as_of": as_of,
            "portfolio_count": input.portfolios.len(),
            "provident_account_count": input.provident_accounts.len(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn contribution(d: NaiveDate, amount: Decimal) -> Transaction {
        Transaction {
            date: d,
            amount,
            kind: TransactionKind::Contribution,
            units: None,
            unit_price: None,
            effective_date: None,
        }
    }

    fn portfolio(class: AssetClass, value: Decimal, transactions: Vec<Transaction>) -> Portfolio {
        Portfolio {
            asset_class: class,
            units_held: Decimal::ZERO,
            cost_basis: Decimal::ZERO,
            current_value: value,
            transactions,
        }
    }

    #[test]
    fn test_totals_and_allocation_shares() {
        let input = DashboardInput {
            portfolios: vec![
                portfolio(
                    AssetClass::Stock,
                    dec!(60000),
                    vec![contribution(date(2023, 1, 1), dec!(50000))],
                ),
                portfolio(
                    AssetClass::MutualFund,
                    dec!(40000),
                    vec![contribution(date(2023, 1, 1), dec!(35000))],
                ),
            ],
            provident_accounts: Vec::new(),
        };
        let output = aggregate(&input, date(2024, 1, 1), &SolverConfig::default()).unwrap();
        let s = &output.result;

        assert_eq!(s.total_net_worth, dec!(100000));
        assert_eq!(s.total_invested, dec!(85000));
        assert_eq!(s.total_gain, dec!(15000));

        let stock = s
            .allocations
            .iter()
            .find(|a| a.asset_class == AssetClass::Stock)
            .unwrap();
        assert_eq!(stock.percentage, dec!(60.00));
    }

    #[test]
    fn test_no_transactions_means_unavailable_not_zero() {
        let input = DashboardInput {
            portfolios: vec![portfolio(AssetClass::Stock, dec!(10000), Vec::new())],
            provident_accounts: Vec::new(),
        };
        let output = aggregate(&input, date(2024, 1, 1), &SolverConfig::default()).unwrap();
        let stock = &output.result.class_metrics[0];
        assert_eq!(stock.blended_xirr, None);
        assert!(output.result.overall_xirr.is_none());
        assert!(!output.warnings.is_empty());
    }

    #[test]
    fn test_overall_blend_excludes_fixed_accrual_classes() {
        let input = DashboardInput {
            portfolios: vec![
                portfolio(
                    AssetClass::Stock,
                    dec!(12000),
                    vec![contribution(date(2023, 1, 1), dec!(10000))],
                ),
                portfolio(
                    AssetClass::Savings,
                    dec!(100000),
                    vec![contribution(date(2023, 1, 1), dec!(100000))],
                ),
            ],
            provident_accounts: Vec::new(),
        };
        let output = aggregate(&input, date(2024, 1, 1), &SolverConfig::default()).unwrap();
        let overall = output.result.overall_xirr.unwrap();
        // Only the stock holding (10k -> 12k over a year, ~20%) blends;
        // a flat savings ledger would have dragged this toward zero.
        assert!(overall > dec!(15), "overall {}", overall);
    }

    #[test]
    fn test_provident_value_in_totals_but_not_blend() {
        let account = ProvidentFundAccount {
            opening_employee_balance: dec!(30000),
            opening_employer_balance: dec!(20000),
            wage: dec!(30000),
            is_pension_member: false,
            annual_interest_rate: dec!(0),
            contributions: Vec::new(),
        };
        let input = DashboardInput {
            portfolios: Vec::new(),
            provident_accounts: vec![account],
        };
        let output = aggregate(&input, date(2024, 1, 1), &SolverConfig::default()).unwrap();
        let s = &output.result;

        assert_eq!(s.total_net_worth, dec!(50000));
        assert_eq!(s.provident_value, dec!(50000));
        assert!(s.overall_xirr.is_none());

        let epf = s
            .class_metrics
            .iter()
            .find(|m| m.asset_class == AssetClass::ProvidentFund)
            .unwrap();
        assert_eq!(epf.blended_xirr, None);
    }
}
