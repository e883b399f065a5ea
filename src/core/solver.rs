use minilp::{ComparisonOp, LinearExpr, OptimizationDirection, Problem, Variable};
use ndarray::{Array1, Array2, ArrayView1};

use super::error::PlanError;
use super::formulation::{LinearProgram, VarBound};

const FEASIBILITY_TOL: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct LpSolution {
    pub x: Vec<f64>,
    /// Value of `c'x` for the minimization as formulated.
    pub objective: f64,
}

pub trait LpSolver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, PlanError>;
}

/// Sparse primal/dual simplex backed by `minilp`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimplexSolver;

impl LpSolver for SimplexSolver {
    fn solve(&self, program: &LinearProgram) -> Result<LpSolution, PlanError> {
        let mut problem = Problem::new(OptimizationDirection::Minimize);
        let vars: Vec<Variable> = program
            .objective
            .iter()
            .zip(&program.bounds)
            .map(|(&cost, bound)| problem.add_var(cost, solver_bounds(*bound)))
            .collect();

        add_rows(&mut problem, &vars, &program.a_eq, &program.b_eq, ComparisonOp::Eq);
        add_rows(&mut problem, &vars, &program.a_ub, &program.b_ub, ComparisonOp::Le);

        let solution = problem.solve().map_err(|err| match err {
            minilp::Error::Infeasible => PlanError::Infeasible,
            minilp::Error::Unbounded => PlanError::Unbounded,
        })?;

        // minilp hands back an unbounded ray as infinite values rather than an error.
        let x: Vec<f64> = vars.iter().map(|var| solution[*var]).collect();
        let objective = solution.objective();
        if !objective.is_finite() || x.iter().any(|v| v.is_infinite()) {
            return Err(PlanError::Unbounded);
        }
        verify_solution(program, &x)?;

        Ok(LpSolution { objective, x })
    }
}

fn solver_bounds(bound: VarBound) -> (f64, f64) {
    (
        bound.lower.unwrap_or(f64::NEG_INFINITY),
        bound.upper.unwrap_or(f64::INFINITY),
    )
}

fn add_rows(
    problem: &mut Problem,
    vars: &[Variable],
    a: &Array2<f64>,
    b: &Array1<f64>,
    op: ComparisonOp,
) {
    for (row, &rhs) in a.rows().into_iter().zip(b.iter()) {
        let mut expr = LinearExpr::empty();
        for (col, &coeff) in row.iter().enumerate() {
            if coeff != 0.0 {
                expr.add(vars[col], coeff);
            }
        }
        problem.add_constraint(expr, op, rhs);
    }
}

/// Checks a candidate point against every row and bound of the program.
pub fn verify_solution(program: &LinearProgram, x: &[f64]) -> Result<(), PlanError> {
    if x.len() != program.num_vars() {
        return Err(PlanError::Solver(format!(
            "solution has {} values for {} variables",
            x.len(),
            program.num_vars()
        )));
    }
    if let Some(idx) = x.iter().position(|v| !v.is_finite()) {
        return Err(PlanError::Solver(format!(
            "variable {idx} has non-finite value"
        )));
    }

    for (idx, (row, &rhs)) in program.a_eq.rows().into_iter().zip(&program.b_eq).enumerate() {
        let (lhs, scale) = row_value(row, x);
        if (lhs - rhs).abs() > FEASIBILITY_TOL * (1.0 + rhs.abs() + scale) {
            return Err(PlanError::Solver(format!(
                "equality row {idx} violated: {lhs} != {rhs}"
            )));
        }
    }

    for (idx, (row, &rhs)) in program.a_ub.rows().into_iter().zip(&program.b_ub).enumerate() {
        let (lhs, scale) = row_value(row, x);
        if lhs - rhs > FEASIBILITY_TOL * (1.0 + rhs.abs() + scale) {
            return Err(PlanError::Solver(format!(
                "inequality row {idx} violated: {lhs} > {rhs}"
            )));
        }
    }

    for (idx, (&value, bound)) in x.iter().zip(&program.bounds).enumerate() {
        if !bound.contains(value, FEASIBILITY_TOL * (1.0 + value.abs())) {
            return Err(PlanError::Solver(format!(
                "variable {idx} = {value} outside its bounds"
            )));
        }
    }
    Ok(())
}

fn row_value(row: ArrayView1<'_, f64>, x: &[f64]) -> (f64, f64) {
    row.iter()
        .zip(x)
        .filter(|(coeff, _)| **coeff != 0.0)
        .fold((0.0, 0.0), |(sum, scale), (coeff, value)| {
            let term = coeff * value;
            (sum + term, scale + term.abs())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formulation::VariableLayout;
    use approx::assert_abs_diff_eq;
    use ndarray::array;

    fn program(
        objective: Array1<f64>,
        a_eq: Array2<f64>,
        b_eq: Array1<f64>,
        a_ub: Array2<f64>,
        b_ub: Array1<f64>,
        bounds: Vec<VarBound>,
    ) -> LinearProgram {
        LinearProgram {
            layout: VariableLayout::new(0),
            objective,
            a_eq,
            b_eq,
            a_ub,
            b_ub,
            bounds,
        }
    }

    #[test]
    fn solves_mixed_equality_and_inequality_program() {
        // min -x + 4y  st  -3x + y <= 6,  x + 2y <= 4,  x + y = 1,  x, y >= 0
        let lp = program(
            array![-1.0, 4.0],
            array![[1.0, 1.0]],
            array![1.0],
            array![[-3.0, 1.0], [1.0, 2.0]],
            array![6.0, 4.0],
            vec![VarBound::NON_NEGATIVE; 2],
        );
        let solution = SimplexSolver.solve(&lp).expect("feasible program");
        assert_abs_diff_eq!(solution.x[0], 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.x[1], 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(solution.objective, -1.0, epsilon = 1e-9);
    }

    #[test]
    fn free_variables_may_go_negative() {
        // min x  st  x >= -5 written as -x <= 5, x free
        let lp = program(
            array![1.0],
            Array2::zeros((0, 1)),
            Array1::zeros(0),
            array![[-1.0]],
            array![5.0],
            vec![VarBound::FREE],
        );
        let solution = SimplexSolver.solve(&lp).expect("feasible program");
        assert_abs_diff_eq!(solution.x[0], -5.0, epsilon = 1e-9);
    }

    #[test]
    fn reports_infeasible_program() {
        // x >= 0 and x <= -1
        let lp = program(
            array![1.0],
            Array2::zeros((0, 1)),
            Array1::zeros(0),
            array![[1.0]],
            array![-1.0],
            vec![VarBound::NON_NEGATIVE],
        );
        assert_eq!(SimplexSolver.solve(&lp), Err(PlanError::Infeasible));
    }

    #[test]
    fn reports_unbounded_program() {
        // min -x - y  st  x - y <= 1,  x, y >= 0
        let lp = program(
            array![-1.0, -1.0],
            Array2::zeros((0, 2)),
            Array1::zeros(0),
            array![[1.0, -1.0]],
            array![1.0],
            vec![VarBound::NON_NEGATIVE; 2],
        );
        assert_eq!(SimplexSolver.solve(&lp), Err(PlanError::Unbounded));
    }

    #[test]
    fn free_variable_without_lower_row_is_unbounded() {
        // min x, x free, only an upper row
        let lp = program(
            array![1.0],
            Array2::zeros((0, 1)),
            Array1::zeros(0),
            array![[1.0]],
            array![3.0],
            vec![VarBound::FREE],
        );
        assert_eq!(SimplexSolver.solve(&lp), Err(PlanError::Unbounded));
    }

    #[test]
    fn verification_rejects_points_outside_the_polytope() {
        let lp = program(
            array![1.0, 1.0],
            array![[1.0, 1.0]],
            array![2.0],
            array![[1.0, 0.0]],
            array![1.5],
            vec![VarBound::NON_NEGATIVE; 2],
        );
        assert!(verify_solution(&lp, &[1.0, 1.0]).is_ok());
        assert!(matches!(
            verify_solution(&lp, &[1.0, 0.5]),
            Err(PlanError::Solver(msg)) if msg.contains("equality row 0")
        ));
        assert!(matches!(
            verify_solution(&lp, &[2.0, 0.0]),
            Err(PlanError::Solver(msg)) if msg.contains("inequality row 0")
        ));
        assert!(matches!(
            verify_solution(&lp, &[2.5, -0.5]),
            Err(PlanError::Solver(_))
        ));
        assert!(matches!(
            verify_solution(&lp, &[f64::NAN, 1.0]),
            Err(PlanError::Solver(msg)) if msg.contains("non-finite")
        ));
    }
}
