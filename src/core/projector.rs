use super::types::{IncomeProjection, MONTHS_PER_YEAR, ScenarioInput};

pub fn project(scenario: &ScenarioInput) -> IncomeProjection {
    let annual_income = project_annual_income(
        scenario.initial_income,
        scenario.wage_increase_pct,
        scenario.years,
    );
    IncomeProjection {
        monthly_income: project_monthly_income(
            scenario.initial_income,
            scenario.wage_increase_pct,
            scenario.years,
        ),
        annual_credit_limits: annual_credit_limits(&annual_income, scenario.initial_credit_pct),
        annual_income,
    }
}

/// Monthly income, constant within a year and stepping up by the wage growth
/// factor at every year boundary.
pub fn project_monthly_income(initial_income: f64, wage_increase_pct: f64, years: u32) -> Vec<f64> {
    let mut monthly = Vec::with_capacity(years as usize * MONTHS_PER_YEAR);
    for year in 0..years {
        let monthly_income = annual_income_for_year(initial_income, wage_increase_pct, year)
            / MONTHS_PER_YEAR as f64;
        monthly.extend(std::iter::repeat_n(monthly_income, MONTHS_PER_YEAR));
    }
    monthly
}

pub fn project_annual_income(initial_income: f64, wage_increase_pct: f64, years: u32) -> Vec<f64> {
    (0..years)
        .map(|year| annual_income_for_year(initial_income, wage_increase_pct, year))
        .collect()
}

pub fn annual_credit_limits(annual_income: &[f64], initial_credit_pct: f64) -> Vec<f64> {
    annual_income
        .iter()
        .map(|income| income * (initial_credit_pct / 100.0))
        .collect()
}

fn annual_income_for_year(initial_income: f64, wage_increase_pct: f64, year: u32) -> f64 {
    initial_income * (1.0 + wage_increase_pct / 100.0).powi(year as i32)
}
