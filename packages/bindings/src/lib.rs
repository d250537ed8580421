use chrono::NaiveDate;
use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use serde::Deserialize;

use networth_core::dashboard::DashboardInput;
use networth_core::fire::{FirePlanInput, FireProgressInput, FireScenariosInput};
use networth_core::provident::{EpfConfig, ProvidentFundAccount};
use networth_core::types::{Portfolio, Transaction};
use networth_core::xirr::SolverConfig;

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// XIRR and ledger
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct XirrRequest {
    transactions: Vec<Transaction>,
    current_value: Decimal,
    as_of: NaiveDate,
}

#[napi]
pub fn calculate_xirr(input_json: String) -> NapiResult<String> {
    let request: XirrRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::xirr::calculate_xirr(
        &request.transactions,
        request.current_value,
        request.as_of,
        &SolverConfig::default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RecalculateRequest {
    portfolio: Portfolio,
    #[serde(default)]
    override_unit_price: Option<Decimal>,
}

#[napi]
pub fn recalculate_portfolio(input_json: String) -> NapiResult<String> {
    let request: RecalculateRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output =
        networth_core::ledger::recalculate(&request.portfolio, request.override_unit_price);
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Provident fund
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct EpfScheduleRequest {
    account: ProvidentFundAccount,
    start_month: NaiveDate,
    through_month: NaiveDate,
}

#[napi]
pub fn generate_epf_schedule(input_json: String) -> NapiResult<String> {
    let request: EpfScheduleRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::provident::generate(
        &request.account,
        request.start_month,
        request.through_month,
        &EpfConfig::default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct EpfSummaryRequest {
    account: ProvidentFundAccount,
}

#[napi]
pub fn epf_summary(input_json: String) -> NapiResult<String> {
    let request: EpfSummaryRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::provident::summary(&request.account, &EpfConfig::default())
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct EpfWageChangeRequest {
    account: ProvidentFundAccount,
    new_wage: Decimal,
    effective_from: NaiveDate,
}

#[napi]
pub fn apply_epf_wage_change(input_json: String) -> NapiResult<String> {
    let request: EpfWageChangeRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::provident::apply_wage_change(
        &request.account,
        request.new_wage,
        request.effective_from,
        &EpfConfig::default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// FIRE
// ---------------------------------------------------------------------------

#[napi]
pub fn plan_fire(input_json: String) -> NapiResult<String> {
    let input: FirePlanInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::fire::plan_fire(
        &input,
        &networth_core::fire::FireConfig::default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fire_goal_progress(input_json: String) -> NapiResult<String> {
    let input: FireProgressInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::fire::goal_progress(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn fire_scenarios(input_json: String) -> NapiResult<String> {
    let input: FireScenariosInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::fire::scenarios(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[derive(Deserialize)]
struct RequiredContributionRequest {
    present_value: Decimal,
    target_value: Decimal,
    months: u32,
    annual_return_rate: Decimal,
}

#[napi]
pub fn required_contribution(input_json: String) -> NapiResult<String> {
    let request: RequiredContributionRequest =
        serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::fire::required_contribution(
        request.present_value,
        request.target_value,
        request.months,
        request.annual_return_rate,
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct DashboardRequest {
    #[serde(flatten)]
    input: DashboardInput,
    as_of: NaiveDate,
}

#[napi]
pub fn dashboard_summary(input_json: String) -> NapiResult<String> {
    let request: DashboardRequest = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = networth_core::dashboard::aggregate(
        &request.input,
        request.as_of,
        &SolverConfig::default(),
    )
    .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
