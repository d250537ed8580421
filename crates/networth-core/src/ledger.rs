use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::types::{Money, Portfolio, TransactionKind};

/// Rebuild a portfolio's derived fields (units held, average cost basis,
/// current value) from its transaction ledger.
///
/// Pure and idempotent: the input is untouched and the same inputs always
/// produce the same snapshot, so callers may recompute freely and persist
/// last-writer-wins.
///
/// The three steps run in a fixed order:
/// 1. Units resum from the ledger, but only when at least one transaction
///    records a unit count; a unit-less ledger leaves `units_held` alone.
/// 2. Cost basis becomes net invested capital per unit when both are
///    positive, drops to zero when the position is fully unwound, and is
///    otherwise left at its last known value.
/// 3. Valuation precedence: `override_unit_price` (live quote) beats the
///    most recent priced transaction, which beats keeping the stored value.
///    "Most recent" is judged by `date`, never `effective_date`.
pub fn recalculate(portfolio: &Portfolio, override_unit_price: Option<Money>) -> Portfolio {
    let mut next = portfolio.clone();

    // 1. Units
    let mut total_units = Decimal::ZERO;
    let mut has_unit_transactions = false;
    for txn in &next.transactions {
        if let Some(units) = txn.units {
            has_unit_transactions = true;
            match txn.kind {
                TransactionKind::Contribution => total_units += units,
                TransactionKind::Withdrawal => total_units -= units,
            }
        }
    }
    if has_unit_transactions {
        next.units_held = total_units;
    }

    // 2. Average cost basis
    if !next.transactions.is_empty() {
        let mut net_invested = Decimal::ZERO;
        for txn in &next.transactions {
            match txn.kind {
                TransactionKind::Contribution => net_invested += txn.amount,
                TransactionKind::Withdrawal => net_invested -= txn.amount,
            }
        }
        if next.units_held > Decimal::ZERO && net_invested > Decimal::ZERO {
            next.cost_basis = net_invested / next.units_held;
        } else if next.units_held == Decimal::ZERO {
            next.cost_basis = Decimal::ZERO;
        }
    }

    // 3. Valuation
    if next.units_held > Decimal::ZERO {
        if let Some(price) = override_unit_price {
            next.current_value = next.units_held * price;
        } else if let Some(price) = latest_transaction_price(&next) {
            next.current_value = next.units_held * price;
        }
    }

    next
}

/// Unit price of the most recent dated transaction that carries one.
/// Ties on `date` resolve to the earliest-recorded transaction.
fn latest_transaction_price(portfolio: &Portfolio) -> Option<Money> {
    let mut latest: Option<(NaiveDate, Money)> = None;
    for txn in &portfolio.transactions {
        if let Some(price) = txn.unit_price {
            match latest {
                Some((date, _)) if txn.date <= date => {}
                _ => latest = Some((txn.date, price)),
            }
        }
    }
    latest.map(|(_, price)| price)
}
