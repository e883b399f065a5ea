use serde::Serialize;

pub const MONTHS_PER_YEAR: usize = 12;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenarioInput {
    /// Annual income in the first year.
    pub initial_income: f64,
    pub wage_increase_pct: f64,
    pub years: u32,
    /// Nominal credit limit as a percentage of annual income.
    pub initial_credit_pct: f64,
    /// Share of the nominal limit usable as a hard debt ceiling, in percent.
    pub max_credit_utilization: f64,
    /// Annual nominal rate in percent, compounded monthly.
    pub interest_rate: f64,
    pub max_diff: f64,
    /// Opening balance; negative values are savings.
    pub initial_debt: f64,
}

impl ScenarioInput {
    pub fn months(&self) -> usize {
        self.years as usize * MONTHS_PER_YEAR
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IncomeProjection {
    pub monthly_income: Vec<f64>,
    pub annual_income: Vec<f64>,
    pub annual_credit_limits: Vec<f64>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct MonthlyTrace {
    pub goods_spending: Vec<f64>,
    pub interest: Vec<f64>,
    pub debt: Vec<f64>,
    pub total_spending: Vec<f64>,
}

impl MonthlyTrace {
    pub fn with_capacity(months: usize) -> Self {
        Self {
            goods_spending: Vec::with_capacity(months),
            interest: Vec::with_capacity(months),
            debt: Vec::with_capacity(months),
            total_spending: Vec::with_capacity(months),
        }
    }

    pub fn len(&self) -> usize {
        self.debt.len()
    }

    pub fn is_empty(&self) -> bool {
        self.debt.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct SpendingPlan {
    pub projection: IncomeProjection,
    pub monthly_interest_rate: f64,
    pub spending_factors: Vec<f64>,
    /// The solver's own debt variables, kept for reconciliation with the trace.
    pub lp_debt: Vec<f64>,
    pub lp_slack: Vec<f64>,
    pub trace: MonthlyTrace,
    pub objective_value: f64,
    pub max_debt_gap: f64,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PlanResult {
    pub optimal_spending_factors: Vec<f64>,
    pub monthly_spending: Vec<f64>,
    pub monthly_goods_spending: Vec<f64>,
    pub monthly_interest: Vec<f64>,
    pub monthly_debt: Vec<f64>,
    pub monthly_income_years: Vec<f64>,
    pub annual_credit_limits: Vec<f64>,
    pub objective_value: f64,
}

impl From<SpendingPlan> for PlanResult {
    fn from(plan: SpendingPlan) -> Self {
        Self {
            optimal_spending_factors: plan.spending_factors,
            monthly_spending: plan.trace.total_spending,
            monthly_goods_spending: plan.trace.goods_spending,
            monthly_interest: plan.trace.interest,
            monthly_debt: plan.trace.debt,
            monthly_income_years: plan.projection.monthly_income,
            annual_credit_limits: plan.projection.annual_credit_limits,
            objective_value: plan.objective_value,
        }
    }
}
