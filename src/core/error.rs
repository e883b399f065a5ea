use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PlanError {
    #[error("invalid scenario: {0}")]
    InvalidInput(String),
    #[error(
        "no spending plan satisfies the debt, credit-limit and smoothness constraints"
    )]
    Infeasible,
    #[error("linear program is unbounded; the formulation is inconsistent")]
    Unbounded,
    #[error("solver failure: {0}")]
    Solver(String),
}
