use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::error::NetWorthError;
use crate::types::{CashFlow, Money, Portfolio, Rate, Transaction, TransactionKind, Years};
use crate::NetWorthResult;

const DAYS_PER_YEAR: Decimal = dec!(365);

/// Newton-Raphson policy knobs. The rate bounds cap what the tracker will
/// ever display (-99% to 1000%); they are a product policy, not a
/// numerical requirement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Starting rate for the iteration, as a fraction (0.10 = 10%).
    pub guess: Rate,
    pub tolerance: Decimal,
    pub max_iterations: u32,
    pub min_rate: Rate,
    pub max_rate: Rate,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            guess: dec!(0.10),
            tolerance: dec!(0.0000001),
            max_iterations: 100,
            min_rate: dec!(-0.99),
            max_rate: dec!(10.0),
        }
    }
}

/// Money-weighted return summary for one transaction ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XirrResult {
    /// Annualized rate as a percentage, rounded to 2dp.
    pub xirr: Rate,
    pub absolute_gain: Money,
    /// Net capital put in (contributions minus withdrawals). Signed and
    /// never clamped; callers must suppress the rate when this is <= 0.
    pub invested: Money,
    pub current_value: Money,
}

impl XirrResult {
    fn zero(current_value: Money) -> Self {
        Self {
            xirr: Decimal::ZERO,
            absolute_gain: Decimal::ZERO,
            invested: Decimal::ZERO,
            current_value,
        }
    }
}

/// Per-transaction return breakdown against a current unit price.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionDetail {
    pub date: NaiveDate,
    pub effective_date: NaiveDate,
    pub amount: Money,
    pub kind: TransactionKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub units: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gain: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub xirr: Option<Rate>,
}

/// Net present value of dated flows at `rate`, discounted from the
/// earliest flow's date with a 365-day year.
pub fn npv(rate: Rate, flows: &[CashFlow]) -> NetWorthResult<Money> {
    if rate <= dec!(-1) {
        return Err(NetWorthError::InvalidInput {
            field: "rate".into(),
            reason: "discount rate must be greater than -100%".into(),
        });
    }

    let Some(base_date) = flows.iter().map(|f| f.date).min() else {
        return Ok(Decimal::ZERO);
    };

    let one_plus_r = Decimal::ONE + rate;
    let mut total = Decimal::ZERO;

    for flow in flows {
        let years = Decimal::from((flow.date - base_date).num_days()) / DAYS_PER_YEAR;
        let discount = one_plus_r.powd(years);
        if discount.is_zero() {
            return Err(NetWorthError::DivisionByZero {
                context: format!("NPV discount factor at {}", flow.date),
            });
        }
        total += flow.amount / discount;
    }

    Ok(total)
}

/// Annualized internal rate of return over irregularly dated cash flows
/// (Newton-Raphson on the NPV function).
///
/// Never fails on degenerate-but-present input: when the derivative
/// collapses or the iteration cap is hit, the last stable rate comes back,
/// clamped to the configured bounds. A single flow or same-signed flows
/// therefore yield a boundary value the caller must not present as a
/// meaningful return.
pub fn solve(flows: &[CashFlow], config: &SolverConfig) -> NetWorthResult<Rate> {
    if flows.is_empty() {
        return Err(NetWorthError::InsufficientData(
            "XIRR requires at least one cash flow".into(),
        ));
    }

    let base_date = flows.iter().map(|f| f.date).min().unwrap_or(flows[0].date);
    let normalized: Vec<(Years, Money)> = flows
        .iter()
        .map(|f| {
            let days = (f.date - base_date).num_days();
            (Decimal::from(days) / DAYS_PER_YEAR, f.amount)
        })
        .collect();

    let mut rate = config.guess;

    for _ in 0..config.max_iterations {
        let mut npv_val = Decimal::ZERO;
        let mut derivative = Decimal::ZERO;
        let one_plus_r = Decimal::ONE + rate;

        for (years, amount) in &normalized {
            let discount = one_plus_r.powd(*years);
            if discount.is_zero() {
                continue;
            }
            npv_val += amount / discount;
            derivative -= years * amount / (one_plus_r * discount);
        }

        // Derivative too small to divide by; keep the last stable rate.
        if derivative.abs() < config.tolerance {
            break;
        }

        let new_rate = (rate - npv_val / derivative).clamp(config.min_rate, config.max_rate);

        if (new_rate - rate).abs() < config.tolerance {
            return Ok(new_rate);
        }

        rate = new_rate;
    }

    Ok(rate)
}

/// Money-weighted return of a transaction ledger against its current
/// valuation, which enters the flow series as one final inflow dated
/// `as_of` (as if the holding were sold that day).
///
/// An empty ledger yields an all-zero result carrying `current_value`
/// through, never an error.
pub fn calculate_xirr(
    transactions: &[Transaction],
    current_value: Money,
    as_of: NaiveDate,
    config: &SolverConfig,
) -> NetWorthResult<XirrResult> {
    if transactions.is_empty() {
        return Ok(XirrResult::zero(current_value));
    }

    let mut ordered: Vec<&Transaction> = transactions.iter().collect();
    ordered.sort_by_key(|t| t.date);

    let mut flows = Vec::with_capacity(ordered.len() + 1);
    let mut invested = Decimal::ZERO;

    for txn in ordered {
        let amount = match txn.kind {
            TransactionKind::Contribution => {
                invested += txn.amount;
                -txn.amount
            }
            TransactionKind::Withdrawal => {
                invested -= txn.amount;
                txn.amount
            }
        };
        flows.push(CashFlow {
            date: txn.date,
            amount,
        });
    }

    flows.push(CashFlow {
        date: as_of,
        amount: current_value,
    });

    let rate = solve(&flows, config)?;

    Ok(XirrResult {
        xirr: (rate * dec!(100)).round_dp(2),
        absolute_gain: current_value - invested,
        invested,
        current_value,
    })
}

/// Per-transaction view of a portfolio: each contribution valued at the
/// current unit price, with its own single-flow XIRR from the settlement
/// date. Withdrawals are listed but carry no return of their own.
///
/// The unit price is `override_unit_price` when supplied, otherwise the
/// portfolio's implied price (`current_value / units_held`).
pub fn transaction_details(
    portfolio: &Portfolio,
    override_unit_price: Option<Money>,
    as_of: NaiveDate,
    config: &SolverConfig,
) -> NetWorthResult<Vec<TransactionDetail>> {
    let unit_price = override_unit_price.unwrap_or_else(|| {
        if portfolio.units_held > Decimal::ZERO {
            portfolio.current_value / portfolio.units_held
        } else {
            Decimal::ZERO
        }
    });

    let mut details = Vec::with_capacity(portfolio.transactions.len());

    for txn in &portfolio.transactions {
        let mut current_value = None;
        let mut gain = None;
        let mut txn_xirr = None;

        if txn.kind == TransactionKind::Contribution && unit_price > Decimal::ZERO {
            // Prefer recorded units; otherwise estimate from the amount and
            // the recorded (or average) purchase price.
            let units = match txn.units {
                Some(u) if u > Decimal::ZERO => Some(u),
                _ => {
                    let purchase_price = txn.unit_price.unwrap_or(portfolio.cost_basis);
                    if purchase_price > Decimal::ZERO && txn.amount > Decimal::ZERO {
                        Some(txn.amount / purchase_price)
                    } else {
                        None
                    }
                }
            };

            if let Some(units) = units {
                let value = units * unit_price;
                current_value = Some(value);
                gain = Some(value - txn.amount);

                if value > Decimal::ZERO {
                    let flows = [
                        CashFlow {
                            date: txn.settlement_date(),
                            amount: -txn.amount,
                        },
                        CashFlow {
                            date: as_of,
                            amount: value,
                        },
                    ];
                    let rate = solve(&flows, config)?;
                    txn_xirr = Some((rate * dec!(100)).round_dp(2));
                }
            }
        }

        details.push(TransactionDetail {
            date: txn.date,
            effective_date: txn.settlement_date(),
            amount: txn.amount,
            kind: txn.kind,
            units: txn.units,
            unit_price: txn.unit_price,
            current_value,
            gain,
            xirr: txn_xirr,
        });
    }

    Ok(details)
}
