use chrono::NaiveDate;
use networth_core::ledger::recalculate;
use networth_core::types::{AssetClass, Portfolio, Transaction, TransactionKind};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Ledger reconciliation tests — units, cost basis, valuation precedence
// ===========================================================================

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn txn(
    d: NaiveDate,
    amount: Decimal,
    kind: TransactionKind,
    units: Option<Decimal>,
    unit_price: Option<Decimal>,
) -> Transaction {
    Transaction {
        date: d,
        amount,
        kind,
        units,
        unit_price,
        effective_date: None,
    }
}

fn base_portfolio(transactions: Vec<Transaction>) -> Portfolio {
    Portfolio {
        asset_class: AssetClass::MutualFund,
        units_held: Decimal::ZERO,
        cost_basis: Decimal::ZERO,
        current_value: Decimal::ZERO,
        transactions,
    }
}

// ---------------------------------------------------------------------------
// Idempotence
// ---------------------------------------------------------------------------

#[test]
fn test_recalculate_is_idempotent() {
    let portfolio = base_portfolio(vec![
        txn(
            date(2023, 1, 1),
            dec!(10000),
            TransactionKind::Contribution,
            Some(dec!(400)),
            Some(dec!(25)),
        ),
        txn(
            date(2023, 5, 1),
            dec!(2600),
            TransactionKind::Withdrawal,
            Some(dec!(100)),
            Some(dec!(26)),
        ),
    ]);

    let once = recalculate(&portfolio, Some(dec!(27)));
    let twice = recalculate(&once, Some(dec!(27)));
    assert_eq!(once, twice);

    let once_no_override = recalculate(&portfolio, None);
    let twice_no_override = recalculate(&once_no_override, None);
    assert_eq!(once_no_override, twice_no_override);
}

#[test]
fn test_recalculate_does_not_mutate_input() {
    let portfolio = base_portfolio(vec![txn(
        date(2023, 1, 1),
        dec!(10000),
        TransactionKind::Contribution,
        Some(dec!(400)),
        Some(dec!(25)),
    )]);
    let before = portfolio.clone();
    let _ = recalculate(&portfolio, Some(dec!(30)));
    assert_eq!(portfolio, before);
}

// ---------------------------------------------------------------------------
// Units
// ---------------------------------------------------------------------------

#[test]
fn test_contribution_only_units_sum_exactly() {
    let portfolio = base_portfolio(vec![
        txn(
            date(2023, 1, 1),
            dec!(1000),
            TransactionKind::Contribution,
            Some(dec!(33.333)),
            None,
        ),
        txn(
            date(2023, 2, 1),
            dec!(1000),
            TransactionKind::Contribution,
            Some(dec!(31.746)),
            None,
        ),
        txn(
            date(2023, 3, 1),
            dec!(1000),
            TransactionKind::Contribution,
            Some(dec!(30.303)),
            None,
        ),
    ]);
    let next = recalculate(&portfolio, None);
    // Decimal equality, no float drift.
    assert_eq!(next.units_held, dec!(95.382));
}

#[test]
fn test_mixed_ledger_without_units_preserves_units_held() {
    let mut portfolio = base_portfolio(vec![txn(
        date(2023, 1, 1),
        dec!(5000),
        TransactionKind::Contribution,
        None,
        None,
    )]);
    portfolio.units_held = dec!(123.456);
    let next = recalculate(&portfolio, None);
    assert_eq!(next.units_held, dec!(123.456));
}

// ---------------------------------------------------------------------------
// Cost basis
// ---------------------------------------------------------------------------

#[test]
fn test_cost_basis_is_net_invested_per_unit() {
    let portfolio = base_portfolio(vec![
        txn(
            date(2023, 1, 1),
            dec!(10000),
            TransactionKind::Contribution,
            Some(dec!(500)),
            Some(dec!(20)),
        ),
        txn(
            date(2023, 2, 1),
            dec!(6000),
            TransactionKind::Contribution,
            Some(dec!(250)),
            Some(dec!(24)),
        ),
    ]);
    let next = recalculate(&portfolio, None);
    // 16,000 over 750 units
    assert_eq!(next.cost_basis, dec!(16000) / dec!(750));
}

#[test]
fn test_cost_basis_untouched_when_net_invested_negative() {
    let mut portfolio = base_portfolio(vec![
        txn(
            date(2023, 1, 1),
            dec!(1000),
            TransactionKind::Contribution,
            Some(dec!(100)),
            None,
        ),
        txn(
            date(2023, 2, 1),
            dec!(1500),
            TransactionKind::Withdrawal,
            Some(dec!(50)),
            None,
        ),
    ]);
    portfolio.cost_basis = dec!(10);
    let next = recalculate(&portfolio, None);
    // Units positive but net invested negative: last known basis stands.
    assert_eq!(next.units_held, dec!(50));
    assert_eq!(next.cost_basis, dec!(10));
}

// ---------------------------------------------------------------------------
// Valuation precedence (override > history > unchanged)
// ---------------------------------------------------------------------------

#[test]
fn test_override_beats_history_beats_noop() {
    let mut portfolio = base_portfolio(vec![
        txn(
            date(2023, 1, 1),
            dec!(10000),
            TransactionKind::Contribution,
            Some(dec!(100)),
            Some(dec!(100)),
        ),
        txn(
            date(2023, 6, 1),
            dec!(5500),
            TransactionKind::Contribution,
            Some(dec!(50)),
            Some(dec!(110)),
        ),
    ]);
    portfolio.current_value = dec!(1);

    // Override wins.
    let live = recalculate(&portfolio, Some(dec!(120)));
    assert_eq!(live.current_value, dec!(18000));

    // No override: the latest dated transaction price wins.
    let historical = recalculate(&portfolio, None);
    assert_eq!(historical.current_value, dec!(16500));

    // No override, no priced transactions: value untouched.
    let mut unpriced = portfolio.clone();
    for t in &mut unpriced.transactions {
        t.unit_price = None;
    }
    let unchanged = recalculate(&unpriced, None);
    assert_eq!(unchanged.current_value, dec!(1));
}

#[test]
fn test_recency_judged_by_date_not_effective_date() {
    let mut early = txn(
        date(2023, 1, 1),
        dec!(1000),
        TransactionKind::Contribution,
        Some(dec!(100)),
        Some(dec!(10)),
    );
    // Back-dated booking with a late settlement must not win recency.
    early.effective_date = Some(date(2023, 12, 31));
    let late = txn(
        date(2023, 6, 1),
        dec!(1200),
        TransactionKind::Contribution,
        Some(dec!(100)),
        Some(dec!(12)),
    );

    let portfolio = base_portfolio(vec![early, late]);
    let next = recalculate(&portfolio, None);
    // 200 units at the June price of 12.
    assert_eq!(next.current_value, dec!(2400));
}
