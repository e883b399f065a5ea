use ndarray::{Array1, Array2};

use super::types::MONTHS_PER_YEAR;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarBound {
    pub lower: Option<f64>,
    pub upper: Option<f64>,
}

impl VarBound {
    pub const FREE: VarBound = VarBound {
        lower: None,
        upper: None,
    };
    pub const NON_NEGATIVE: VarBound = VarBound {
        lower: Some(0.0),
        upper: None,
    };

    pub fn contains(self, value: f64, tol: f64) -> bool {
        self.lower.is_none_or(|lo| value >= lo - tol)
            && self.upper.is_none_or(|hi| value <= hi + tol)
    }
}

/// Column layout of the decision vector: spending factors, then end-of-month
/// debt, then one slack per consecutive month pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariableLayout {
    months: usize,
}

impl VariableLayout {
    pub fn new(months: usize) -> Self {
        Self { months }
    }

    pub fn months(self) -> usize {
        self.months
    }

    pub fn num_vars(self) -> usize {
        2 * self.months + self.months.saturating_sub(1)
    }

    pub fn factor(self, month: usize) -> usize {
        month
    }

    pub fn debt(self, month: usize) -> usize {
        self.months + month
    }

    pub fn slack(self, pair: usize) -> usize {
        2 * self.months + pair
    }

    pub fn num_equalities(self) -> usize {
        self.months
    }

    pub fn num_inequalities(self) -> usize {
        self.months + 3 * self.months.saturating_sub(1)
    }
}

/// `min c'x  s.t.  A_eq x = b_eq,  A_ub x <= b_ub,  bounds`.
#[derive(Debug, Clone)]
pub struct LinearProgram {
    pub layout: VariableLayout,
    pub objective: Array1<f64>,
    pub a_eq: Array2<f64>,
    pub b_eq: Array1<f64>,
    pub a_ub: Array2<f64>,
    pub b_ub: Array1<f64>,
    pub bounds: Vec<VarBound>,
}

impl LinearProgram {
    pub fn num_vars(&self) -> usize {
        self.objective.len()
    }
}

pub fn monthly_interest_rate(interest_rate: f64) -> f64 {
    (1.0 + interest_rate / 100.0).powf(1.0 / 12.0) - 1.0
}

pub fn formulate(
    monthly_income: &[f64],
    annual_credit_limits: &[f64],
    max_credit_utilization: f64,
    interest_rate: f64,
    max_diff: f64,
    initial_debt: f64,
) -> LinearProgram {
    let layout = VariableLayout::new(monthly_income.len());
    let months = layout.months();
    let n = layout.num_vars();
    let r = monthly_interest_rate(interest_rate);
    let growth = 1.0 + r;

    let mut objective = Array1::<f64>::zeros(n);
    for month in 0..months {
        objective[layout.factor(month)] = -1.0;
    }

    let mut a_eq = Array2::<f64>::zeros((layout.num_equalities(), n));
    let mut b_eq = Array1::<f64>::zeros(layout.num_equalities());
    for (month, &income) in monthly_income.iter().enumerate() {
        a_eq[[month, layout.debt(month)]] = 1.0;
        a_eq[[month, layout.factor(month)]] = -income;
        if month == 0 {
            b_eq[month] = initial_debt * growth;
        } else {
            a_eq[[month, layout.debt(month - 1)]] = -growth;
        }
    }

    let mut a_ub = Array2::<f64>::zeros((layout.num_inequalities(), n));
    let mut b_ub = Array1::<f64>::zeros(layout.num_inequalities());
    let utilization = max_credit_utilization / 100.0;
    for month in 0..months {
        a_ub[[month, layout.debt(month)]] = 1.0;
        b_ub[month] = annual_credit_limits[month / MONTHS_PER_YEAR] * utilization;
    }

    for pair in 0..months.saturating_sub(1) {
        let row = months + 3 * pair;
        let slack = layout.slack(pair);
        let this_month = layout.factor(pair);
        let next_month = layout.factor(pair + 1);

        a_ub[[row, this_month]] = -1.0;
        a_ub[[row, next_month]] = 1.0;
        a_ub[[row, slack]] = -1.0;

        a_ub[[row + 1, this_month]] = 1.0;
        a_ub[[row + 1, next_month]] = -1.0;
        a_ub[[row + 1, slack]] = -1.0;

        a_ub[[row + 2, slack]] = 1.0;
        b_ub[row + 2] = max_diff;
    }

    let mut bounds = vec![VarBound::FREE; n];
    for month in 0..months {
        bounds[layout.debt(month)] = VarBound::NON_NEGATIVE;
    }

    LinearProgram {
        layout,
        objective,
        a_eq,
        b_eq,
        a_ub,
        b_ub,
        bounds,
    }
}
