use crate::primal::tableau::Tableau;
use crate::solver::Solution;
use crate::util::EPS;

use log::debug;
use std::io::Write;

/// Ranges of the objective coefficients over which the optimal basis of a
/// solution stays optimal.
///
/// Ranges are expressed on the maximize form of the objective, so for a
/// minimization the range of the original coefficient `c` is
/// `[-right, -left]`.
#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectiveSensitivityAnalyser;

impl ObjectiveSensitivityAnalyser {
    pub const NAME: &'static str = "Cost Coefficient Sensitivity Analysis";

    pub fn new() -> Self {
        Self
    }

    pub fn name(&self) -> &'static str {
        Self::NAME
    }

    /// One `(left, right)` pair per variable of the solved model.
    pub fn analyse(&self, solution: &Solution) -> Vec<(f64, f64)> {
        let tableau = solution.tableau();
        let reduced_costs = tableau.reduced_costs();

        self.coefficients(solution)
            .into_iter()
            .enumerate()
            .map(|(j, coeff)| {
                let (left_delta, right_delta) = match tableau.basic_row(j) {
                    Some(row) => basic_deltas(tableau, &reduced_costs, row, j),
                    None if !tableau.is_movable(j) => (f64::NEG_INFINITY, f64::INFINITY),
                    //at its upper bound: only a decrease can push it out
                    None if tableau.is_complemented(j) => (reduced_costs[j], f64::INFINITY),
                    None => (f64::NEG_INFINITY, -reduced_costs[j]),
                };

                debug!(
                    "{}: coefficient {}, deltas [{}, {}]",
                    solution.model().variables()[j],
                    coeff,
                    left_delta,
                    right_delta
                );

                (coeff + left_delta, coeff + right_delta)
            })
            .collect()
    }

    pub fn interpret_results<W: Write>(
        &self,
        solution: &Solution,
        ranges: &[(f64, f64)],
        out: &mut W,
    ) -> std::io::Result<()> {
        let coeffs = self.coefficients(solution);

        writeln!(out, "* {}:", self.name())?;
        writeln!(
            out,
            "-> To keep the current optimum, the cost coefficients should stay in following ranges:"
        )?;

        let width = ranges
            .iter()
            .map(|(left, right)| {
                format!("{:.3}", left)
                    .len()
                    .max(format!("{:.3}", right).len())
            })
            .max()
            .unwrap_or(0);

        for (i, (left, right)) in ranges.iter().enumerate() {
            writeln!(
                out,
                "\t {:>w$.3} <= c{} <= {:>w$.3}, (originally: {:.3})",
                left,
                i,
                right,
                coeffs.get(i).copied().unwrap_or(f64::NAN),
                w = width
            )?;
        }

        Ok(())
    }

    //maximize-form objective coefficients of the original variables
    fn coefficients(&self, solution: &Solution) -> Vec<f64> {
        let variables = solution.model().variables();

        match solution.normal_model().objective() {
            Some(objective) => objective
                .expression
                .factor_vector(variables)
                .iter()
                .copied()
                .collect(),
            None => vec![0.; variables.len()],
        }
    }
}

/// Tightest deltas for the coefficient of the basic variable `col` of `row`.
/// Perturbing its cost by `delta` shifts the reduced cost of every nonbasic
/// column `j` by `-delta * row[j]`, which has to stay non-positive.
fn basic_deltas(tableau: &Tableau, reduced_costs: &[f64], row: usize, col: usize) -> (f64, f64) {
    let sign = if tableau.is_complemented(col) { -1. } else { 1. };
    let mut left = f64::NEG_INFINITY;
    let mut right = f64::INFINITY;

    for j in 0..tableau.cols() {
        if j == col || tableau.is_basic(j) || !tableau.is_movable(j) {
            continue;
        }

        let coeff = sign * tableau.coeff(row, j);

        if coeff.abs() <= EPS {
            continue;
        }

        let delta = reduced_costs[j] / coeff;

        if coeff < 0. {
            right = right.min(delta);
        } else {
            left = left.max(delta);
        }
    }

    (left, right)
}
