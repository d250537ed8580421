use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates. Solver-internal rates are fractions (0.10 = 10%); user-facing
/// rates (XIRR, return assumptions, interest) are percentages (10 = 10%).
/// Each field documents which convention it uses.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// A single signed cash flow at a point in time. Outflows (money invested)
/// are negative, inflows (redemptions, the closing valuation) positive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CashFlow {
    pub date: NaiveDate,
    pub amount: Money,
}

/// Direction of a ledger transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    #[serde(rename = "CONTRIBUTION", alias = "DEPOSIT", alias = "BUY")]
    Contribution,
    #[serde(rename = "WITHDRAWAL", alias = "SELL")]
    Withdrawal,
}

/// One entry in a portfolio's append-only transaction ledger.
///
/// `amount` is an unsigned magnitude; direction comes from `kind`.
/// Ordering is by `date`, ties broken by insertion order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: NaiveDate,
    pub amount: Money,
    pub kind: TransactionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<Decimal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<Money>,
    /// Settlement date when it differs from the booking date. Valuation
    /// recency is always judged by `date`, never by this.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub effective_date: Option<NaiveDate>,
}

impl Transaction {
    /// The date money was actually put to work: `effective_date` when set,
    /// otherwise the booking date.
    pub fn settlement_date(&self) -> NaiveDate {
        self.effective_date.unwrap_or(self.date)
    }
}

/// Asset class a portfolio is declared under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetClass {
    #[serde(rename = "STOCK")]
    Stock,
    #[serde(rename = "MF")]
    MutualFund,
    #[serde(rename = "SIP")]
    Sip,
    #[serde(rename = "EPF")]
    ProvidentFund,
    #[serde(rename = "NPS")]
    Nps,
    #[serde(rename = "SAVING")]
    Savings,
}

impl AssetClass {
    pub const ALL: [AssetClass; 6] = [
        AssetClass::Stock,
        AssetClass::MutualFund,
        AssetClass::Sip,
        AssetClass::ProvidentFund,
        AssetClass::Nps,
        AssetClass::Savings,
    ];

    /// Classes whose ledgers carry market returns. Only these pool into
    /// blended IRR; fixed-accrual classes (provident funds, savings)
    /// contribute value but never a rate.
    pub fn is_growth_oriented(self) -> bool {
        matches!(
            self,
            AssetClass::Stock | AssetClass::MutualFund | AssetClass::Sip
        )
    }
}

/// Ledger view of a single holding: derived fields plus the transactions
/// they are derived from. The engine only ever returns fresh snapshots;
/// persistence belongs to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Portfolio {
    pub asset_class: AssetClass,
    pub units_held: Decimal,
    /// Weighted-average price paid per unit, net of withdrawals.
    pub cost_basis: Money,
    pub current_value: Money,
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
