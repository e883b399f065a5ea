mod engine;
mod error;
mod formulation;
mod projector;
mod solver;
mod trace;
mod types;

pub use engine::{MAX_YEARS, optimize_spending, optimize_spending_with, validate_scenario};
pub use error::PlanError;
pub use formulation::{LinearProgram, VarBound, VariableLayout, formulate, monthly_interest_rate};
pub use projector::{annual_credit_limits, project, project_annual_income, project_monthly_income};
pub use solver::{LpSolution, LpSolver, SimplexSolver, verify_solution};
pub use trace::{derive_trace, max_abs_gap};
pub use types::{
    IncomeProjection, MONTHS_PER_YEAR, MonthlyTrace, PlanResult, ScenarioInput, SpendingPlan,
};
