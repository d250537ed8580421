use networth_core::fire::{
    goal_progress, plan_fire, project, projected_amount, required_contribution, scenarios,
    years_to_target, FireConfig, FirePlanInput, FireProgressInput, FireScenariosInput,
    ProjectionInput,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

// ===========================================================================
// Wealth projector tests — monthly compounding, inverse annuity
// ===========================================================================

fn input(
    wealth: Decimal,
    age: u32,
    monthly: Decimal,
    rate: Decimal,
    target: Decimal,
) -> ProjectionInput {
    ProjectionInput {
        current_wealth: wealth,
        current_age: age,
        monthly_contribution: monthly,
        annual_return_rate: rate,
        target_amount: target,
        target_age: None,
    }
}

// ---------------------------------------------------------------------------
// Projection shape
// ---------------------------------------------------------------------------

#[test]
fn test_degenerate_all_zero_projection() {
    // Nothing in, nothing earned, target already met: wealth stays zero
    // and the series stops right after the year-0 guard.
    let points = project(
        &input(dec!(0), 30, dec!(0), dec!(0), dec!(0)),
        &FireConfig::default(),
    )
    .unwrap();

    assert_eq!(points[0].year, 0);
    assert_eq!(points[0].projected_wealth, Decimal::ZERO);
    assert!(points.len() <= 2);
    assert!(points.iter().all(|p| p.projected_wealth == Decimal::ZERO));
}

#[test]
fn test_target_below_current_wealth_yields_two_points() {
    // Year 0 alone meeting the target must not produce a single-point series.
    let points = project(
        &input(dec!(500000), 40, dec!(1000), dec!(8), dec!(100000)),
        &FireConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[1].year, 1);
    assert_eq!(years_to_target(&points, dec!(100000)), 1);
}

#[test]
fn test_unreachable_target_runs_full_horizon() {
    let points = project(
        &input(dec!(0), 30, dec!(100), dec!(1), dec!(100000000)),
        &FireConfig::default(),
    )
    .unwrap();
    assert_eq!(points.len(), 51); // years 0..=50
    assert_eq!(years_to_target(&points, dec!(100000000)), 50);
}

#[test]
fn test_wealth_is_monotonic_with_positive_inputs() {
    let points = project(
        &input(dec!(10000), 30, dec!(1000), dec!(12), dec!(10000000)),
        &FireConfig::default(),
    )
    .unwrap();
    assert!(points
        .windows(2)
        .all(|pair| pair[1].projected_wealth > pair[0].projected_wealth));
}

#[test]
fn test_zero_rate_projection_is_pure_contribution() {
    let points = project(
        &input(dec!(0), 30, dec!(1000), dec!(0), dec!(1000000000)),
        &FireConfig::default(),
    )
    .unwrap();
    // With no growth, each year adds exactly 12,000.
    assert_eq!(points[0].projected_wealth, dec!(12000));
    assert_eq!(points[4].projected_wealth, dec!(60000));
    assert_eq!(points[4].annual_growth, Decimal::ZERO);
}

#[test]
fn test_validation_rejects_bad_inputs() {
    assert!(project(
        &input(dec!(0), 30, dec!(-1), dec!(5), dec!(1000)),
        &FireConfig::default()
    )
    .is_err());
    assert!(project(
        &input(dec!(0), 30, dec!(100), dec!(-100), dec!(1000)),
        &FireConfig::default()
    )
    .is_err());
}

// ---------------------------------------------------------------------------
// Inverse annuity
// ---------------------------------------------------------------------------

#[test]
fn test_required_contribution_reference_value() {
    // 100k compounding at 10%/yr for 120 months leaves ~729k to fund via
    // the ordinary annuity; the level payment is ~3,560.
    let pmt = required_contribution(dec!(100000), dec!(1000000), 120, dec!(10)).unwrap();
    assert!(
        (pmt - dec!(3560.23)).abs() < dec!(1),
        "expected ~3560, got {}",
        pmt
    );
}

#[test]
fn test_required_contribution_zero_rate_exact() {
    let pmt = required_contribution(dec!(100000), dec!(1000000), 120, dec!(0)).unwrap();
    assert_eq!(pmt, dec!(7500));
}

#[test]
fn test_required_contribution_zero_when_already_funded() {
    let pmt = required_contribution(dec!(2000000), dec!(1000000), 60, dec!(6)).unwrap();
    assert_eq!(pmt, Decimal::ZERO);
}

#[test]
fn test_required_contribution_zero_months() {
    let pmt = required_contribution(dec!(0), dec!(1000000), 0, dec!(10)).unwrap();
    assert_eq!(pmt, Decimal::ZERO);
}

#[test]
fn test_annuity_inverse_agrees_with_forward_projection() {
    for rate in [dec!(4), dec!(8), dec!(12)] {
        let pmt = required_contribution(dec!(50000), dec!(800000), 180, rate).unwrap();
        let outcome = projected_amount(dec!(50000), pmt, 180, rate);
        assert!(
            (outcome - dec!(800000)).abs() < dec!(1),
            "rate {}: projected {} from payment {}",
            rate,
            outcome,
            pmt
        );
    }
}

// ---------------------------------------------------------------------------
// Plans, progress, scenarios
// ---------------------------------------------------------------------------

#[test]
fn test_plan_fire_reports_years_and_age() {
    let output = plan_fire(
        &FirePlanInput {
            current_net_worth: dec!(100000),
            current_age: 30,
            monthly_investment: dec!(3000),
            expected_annual_return: dec!(10),
            monthly_expenses: dec!(3000),
            withdrawal_rate: dec!(4),
            target_amount: Some(dec!(1000000)),
            target_age: None,
        },
        &FireConfig::default(),
    )
    .unwrap();

    let plan = &output.result;
    assert_eq!(plan.target_amount, dec!(1000000));
    assert_eq!(plan.progress_percentage, dec!(10.00));
    assert!(plan.years_to_fire > 0 && plan.years_to_fire < 20);
    assert_eq!(plan.fire_age, 30 + plan.years_to_fire);
    assert!(output.warnings.is_empty());
    let last = plan.projections.last().unwrap();
    assert!(last.projected_wealth >= dec!(1000000));
}

#[test]
fn test_plan_fire_warns_when_horizon_falls_short() {
    let output = plan_fire(
        &FirePlanInput {
            current_net_worth: dec!(0),
            current_age: 30,
            monthly_investment: dec!(10),
            expected_annual_return: dec!(2),
            monthly_expenses: dec!(5000),
            withdrawal_rate: dec!(4),
            target_amount: None,
            target_age: Some(40),
        },
        &FireConfig::default(),
    )
    .unwrap();
    assert!(!output.warnings.is_empty());
}

#[test]
fn test_goal_progress_behind_schedule() {
    let output = goal_progress(&FireProgressInput {
        current_net_worth: dec!(100000),
        target_amount: dec!(1000000),
        years_elapsed: 8,
        years_remaining: 2,
        current_monthly_contribution: dec!(1000),
        expected_annual_return: dec!(10),
    })
    .unwrap();

    let progress = &output.result;
    assert_eq!(progress.progress_percentage, dec!(10.00));
    // 10% done with 80% of the window spent.
    assert!(!progress.on_track);
    assert!(progress.required_additional_contribution > Decimal::ZERO);
    assert_eq!(progress.gap_amount, dec!(900000));
}

#[test]
fn test_scenarios_cover_three_rates() {
    let rows = scenarios(&FireScenariosInput {
        current_net_worth: dec!(200000),
        target_amount: dec!(2000000),
        months_remaining: 240,
        conservative_return: dec!(6),
        expected_return: dec!(10),
        aggressive_return: dec!(14),
    })
    .unwrap();

    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].scenario, "conservative");
    assert_eq!(rows[2].scenario, "aggressive");
    for row in &rows {
        // Each scenario's own projection reaches the target; a clamped
        // zero contribution means compounding alone overshoots it.
        assert!(
            row.projected_amount >= dec!(2000000) - dec!(1),
            "{} projects {}",
            row.scenario,
            row.projected_amount
        );
    }
}
