use log::{debug, info, warn};

use super::error::PlanError;
use super::formulation::{formulate, monthly_interest_rate};
use super::projector::project;
use super::solver::{LpSolver, SimplexSolver};
use super::trace::{derive_trace, max_abs_gap};
use super::types::{ScenarioInput, SpendingPlan};

const DEBT_RECONCILIATION_TOL: f64 = 1e-6;
/// Longest horizon accepted; the constraint matrices are dense in months.
pub const MAX_YEARS: u32 = 50;

pub fn optimize_spending(scenario: &ScenarioInput) -> Result<SpendingPlan, PlanError> {
    optimize_spending_with(scenario, &SimplexSolver)
}

pub fn optimize_spending_with<S: LpSolver>(
    scenario: &ScenarioInput,
    solver: &S,
) -> Result<SpendingPlan, PlanError> {
    validate_scenario(scenario)?;

    let projection = project(scenario);
    let r = monthly_interest_rate(scenario.interest_rate);
    let program = formulate(
        &projection.monthly_income,
        &projection.annual_credit_limits,
        scenario.max_credit_utilization,
        scenario.interest_rate,
        scenario.max_diff,
        scenario.initial_debt,
    );
    debug!(
        "formulated LP: {} vars, {} equalities, {} inequalities",
        program.num_vars(),
        program.b_eq.len(),
        program.b_ub.len()
    );

    let solution = solver.solve(&program)?;
    let layout = program.layout;
    let months = layout.months();
    let spending_factors = solution.x[..months].to_vec();
    let lp_debt = (0..months).map(|m| solution.x[layout.debt(m)]).collect::<Vec<_>>();
    let lp_slack = (0..months.saturating_sub(1))
        .map(|p| solution.x[layout.slack(p)])
        .collect::<Vec<_>>();

    let trace = derive_trace(
        &spending_factors,
        &projection.monthly_income,
        scenario.initial_debt,
        r,
    );

    let max_debt_gap = max_abs_gap(&lp_debt, &trace.debt);
    let debt_scale = 1.0 + lp_debt.iter().fold(0.0_f64, |acc, d| acc.max(d.abs()));
    if max_debt_gap > DEBT_RECONCILIATION_TOL * debt_scale {
        warn!(
            "LP debt and replayed debt diverge by {max_debt_gap:.6} (scale {debt_scale:.2})"
        );
    }

    let objective_value = -solution.objective;
    info!(
        "optimized {} months: total spending factor {objective_value:.6}, final debt {:.2}",
        months,
        trace.debt.last().copied().unwrap_or(scenario.initial_debt)
    );

    Ok(SpendingPlan {
        projection,
        monthly_interest_rate: r,
        spending_factors,
        lp_debt,
        lp_slack,
        trace,
        objective_value,
        max_debt_gap,
    })
}

pub fn validate_scenario(scenario: &ScenarioInput) -> Result<(), PlanError> {
    if scenario.years < 1 {
        return Err(PlanError::InvalidInput("years must be >= 1".to_string()));
    }
    if scenario.years > MAX_YEARS {
        return Err(PlanError::InvalidInput(format!(
            "years must be <= {MAX_YEARS}"
        )));
    }

    for (name, value) in [
        ("initial_income", scenario.initial_income),
        ("wage_increase_pct", scenario.wage_increase_pct),
        ("initial_credit_pct", scenario.initial_credit_pct),
        ("max_credit_utilization", scenario.max_credit_utilization),
        ("interest_rate", scenario.interest_rate),
        ("max_diff", scenario.max_diff),
        ("initial_debt", scenario.initial_debt),
    ] {
        if !value.is_finite() {
            return Err(PlanError::InvalidInput(format!("{name} must be finite")));
        }
    }

    if scenario.initial_income <= 0.0 {
        return Err(PlanError::InvalidInput(
            "initial_income must be > 0".to_string(),
        ));
    }
    if scenario.wage_increase_pct <= -100.0 {
        return Err(PlanError::InvalidInput(
            "wage_increase_pct must be > -100".to_string(),
        ));
    }
    if scenario.interest_rate <= -100.0 {
        return Err(PlanError::InvalidInput(
            "interest_rate must be > -100".to_string(),
        ));
    }
    if scenario.max_diff < 0.0 {
        return Err(PlanError::InvalidInput("max_diff must be >= 0".to_string()));
    }
    Ok(())
}
