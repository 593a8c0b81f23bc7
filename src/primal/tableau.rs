#![allow(non_snake_case)]

use crate::error::SimplexError;
use crate::util::EPS;

use log::trace;

/// Dense simplex tableau with bounded variables.
///
/// Rows `0..m` are the constraint rows, row `m` is the Z-row
/// (`z_j = c_B . column_j`) and row `m + 1` holds the reduced costs
/// (`c_j - z_j`). The last column holds the right-hand sides, i.e. the values
/// of the basic variables; the last cell holds the objective value.
///
/// Every column is shifted by its lower bound. A nonbasic variable sitting at
/// its upper bound is stored complemented (`x = u - x'`), so all nonbasic
/// columns are at 0 and the rhs column stays non-negative.
#[derive(Debug, Clone)]
pub struct Tableau {
    table: nalgebra::DMatrix<f64>,
    basis: Vec<usize>,
    costs: nalgebra::DVector<f64>,
    lower: Vec<f64>,
    span: Vec<f64>,
    complemented: Vec<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Step {
    Pivoted { degenerate: bool },
    Optimal,
    Unbounded,
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Leaving {
    Row { row: usize, at_upper: bool, ratio: f64 },
    Flip { ratio: f64 },
    Unbounded,
}

impl Tableau {
    /// `b` must already be shifted by `lower`, and the `basis` columns of `A`
    /// must form an identity matrix.
    pub fn new(
        A: &nalgebra::DMatrix<f64>,
        b: &nalgebra::DVector<f64>,
        costs: nalgebra::DVector<f64>,
        lower: &[f64],
        upper: &[f64],
        basis: Vec<usize>,
    ) -> Result<Self, SimplexError> {
        let m = A.nrows();
        let n = A.ncols();

        if b.len() != m || basis.len() != m || costs.len() != n {
            return Err(SimplexError::InvalidModel(format!(
                "tableau dimensions mismatch: A is {}x{}, b has {}, basis has {}, c has {}",
                m,
                n,
                b.len(),
                basis.len(),
                costs.len()
            )));
        }

        let mut table = nalgebra::DMatrix::zeros(m + 2, n + 1);

        for i in 0..m {
            if b[i] < -EPS {
                return Err(SimplexError::NegativeBound { bound: b[i] });
            }

            for j in 0..n {
                table[(i, j)] = A[(i, j)];
            }

            table[(i, n)] = b[i].max(0.);
        }

        for (i, &col) in basis.iter().enumerate() {
            let is_unit = (0..m).all(|k| {
                let expected = if k == i { 1. } else { 0. };
                (A[(k, col)] - expected).abs() <= EPS
            });

            if !is_unit {
                return Err(SimplexError::InvalidModel(format!(
                    "column {} is not a unit column for row {}",
                    col, i
                )));
            }
        }

        let span = lower
            .iter()
            .zip(upper)
            .map(|(lb, ub)| (ub - lb).max(0.))
            .collect();

        let mut tableau = Self {
            table,
            basis,
            costs,
            lower: lower.to_vec(),
            span,
            complemented: vec![false; n],
        };

        tableau.reprice();
        Ok(tableau)
    }

    pub fn rows(&self) -> usize {
        self.basis.len()
    }

    pub fn cols(&self) -> usize {
        self.costs.len()
    }

    pub fn table(&self) -> &nalgebra::DMatrix<f64> {
        &self.table
    }

    /// Basic column of every constraint row.
    pub fn basis(&self) -> &[usize] {
        self.basis.as_slice()
    }

    pub fn is_basic(&self, col: usize) -> bool {
        self.basis.contains(&col)
    }

    pub fn basic_row(&self, col: usize) -> Option<usize> {
        self.basis.iter().position(|&b| b == col)
    }

    /// True if the column is stored as `u - x`.
    pub fn is_complemented(&self, col: usize) -> bool {
        self.complemented[col]
    }

    /// Columns with equal lower and upper bounds can never enter the basis.
    pub fn is_movable(&self, col: usize) -> bool {
        self.span[col] > EPS
    }

    pub fn coeff(&self, row: usize, col: usize) -> f64 {
        self.table[(row, col)]
    }

    pub fn z_row(&self) -> Vec<f64> {
        self.objective_row(self.rows())
    }

    pub fn reduced_costs(&self) -> Vec<f64> {
        self.objective_row(self.rows() + 1)
    }

    pub fn rhs(&self) -> Vec<f64> {
        let n = self.cols();
        (0..self.rows()).map(|i| self.table[(i, n)]).collect()
    }

    pub fn objective_value(&self) -> f64 {
        self.table[(self.rows() + 1, self.cols())]
    }

    /// Value of every column variable in the current basic solution.
    pub fn values(&self) -> Vec<f64> {
        let n = self.cols();
        let mut shifted = vec![0.; n];

        for (i, &col) in self.basis.iter().enumerate() {
            shifted[col] = self.table[(i, n)];
        }

        shifted
            .iter()
            .enumerate()
            .map(|(j, &x)| {
                let x = if self.complemented[j] {
                    self.span[j] - x
                } else {
                    x
                };

                self.lower[j] + x
            })
            .collect()
    }

    /// Replaces the objective and recomputes the Z-row and reduced costs.
    pub fn set_costs(&mut self, costs: nalgebra::DVector<f64>) {
        assert_eq!(costs.len(), self.cols());
        self.costs = costs;
        self.reprice();
    }

    /// Makes the given columns immovable. Used to pin the artificial
    /// variables to zero once phase 1 is over.
    pub fn fix_columns(&mut self, cols: &[usize]) {
        for &col in cols {
            self.span[col] = 0.;
        }
    }

    /// Performs one simplex iteration: picks the entering column (most
    /// positive reduced cost, or the first improving one under Bland's
    /// rule), runs the ratio test and pivots or flips a bound.
    pub fn iterate(&mut self, bland: bool) -> Step {
        let col = match self.entering_column(bland) {
            Some(col) => col,
            None => return Step::Optimal,
        };

        match self.leaving_row(col) {
            Leaving::Unbounded => Step::Unbounded,

            Leaving::Flip { ratio } => {
                trace!("column {} moves to its other bound", col);
                self.complement_nonbasic(col);
                self.refresh_objective_rows();
                Step::Pivoted {
                    degenerate: ratio < EPS,
                }
            }

            Leaving::Row {
                row,
                at_upper,
                ratio,
            } => {
                trace!(
                    "pivot on ({}, {}), {} leaves{}",
                    row,
                    col,
                    self.basis[row],
                    if at_upper { " at its upper bound" } else { "" }
                );

                if at_upper {
                    self.complement_basic(row);
                }

                self.pivot(row, col);

                Step::Pivoted {
                    degenerate: ratio < EPS,
                }
            }
        }
    }

    fn entering_column(&self, bland: bool) -> Option<usize> {
        let d_row = self.rows() + 1;
        let mut best: Option<(usize, f64)> = None;

        for j in 0..self.cols() {
            let d_j = self.table[(d_row, j)];

            if d_j <= EPS || !self.is_movable(j) || self.is_basic(j) {
                continue;
            }

            if bland {
                return Some(j);
            }

            match best {
                Some((_, best_d)) if d_j <= best_d => (),
                _ => best = Some((j, d_j)),
            }
        }

        best.map(|(j, _)| j)
    }

    fn leaving_row(&self, col: usize) -> Leaving {
        let n = self.cols();
        let mut best = if self.span[col].is_finite() {
            Leaving::Flip {
                ratio: self.span[col],
            }
        } else {
            Leaving::Unbounded
        };

        let mut best_ratio = self.span[col];
        let mut best_basic: Option<usize> = None;

        for (i, &basic) in self.basis.iter().enumerate() {
            let a = self.table[(i, col)];
            let rhs = self.table[(i, n)];

            let (ratio, at_upper) = if a > EPS {
                (rhs / a, false)
            } else if a < -EPS && self.span[basic].is_finite() {
                ((self.span[basic] - rhs) / -a, true)
            } else {
                continue;
            };

            let ratio = ratio.max(0.);

            //ties go to the smallest basic variable index
            let better = ratio < best_ratio - EPS
                || ((ratio - best_ratio).abs() <= EPS
                    && best_basic.map_or(false, |b| basic < b));

            if better {
                best_ratio = ratio;
                best_basic = Some(basic);
                best = Leaving::Row {
                    row: i,
                    at_upper,
                    ratio,
                };
            }
        }

        best
    }

    /// Gauss-Jordan pivot on (`row`, `col`); `col` replaces the basic
    /// variable of `row`.
    fn pivot(&mut self, row: usize, col: usize) {
        let m = self.rows();
        let n = self.cols();
        let pivot = self.table[(row, col)];

        for j in 0..=n {
            self.table[(row, j)] /= pivot;
        }

        for i in (0..m).chain(std::iter::once(m + 1)) {
            if i == row {
                continue;
            }

            let factor = self.table[(i, col)];

            if factor == 0. {
                continue;
            }

            for j in 0..=n {
                self.table[(i, j)] -= factor * self.table[(row, j)];
            }

            self.table[(i, col)] = 0.;
        }

        self.table[(row, col)] = 1.;
        self.basis[row] = col;
        self.refresh_objective_rows();
    }

    /// Substitutes `x = u - x'` for a nonbasic column.
    fn complement_nonbasic(&mut self, col: usize) {
        let m = self.rows();
        let n = self.cols();
        let u = self.span[col];

        for i in 0..m {
            let a = self.table[(i, col)];
            self.table[(i, n)] -= a * u;
            self.table[(i, col)] = -a;
        }

        self.table[(m + 1, col)] = -self.table[(m + 1, col)];
        self.complemented[col] = !self.complemented[col];
    }

    /// Substitutes `x = u - x'` for the basic variable of `row` and rescales
    /// the row so that `x'` keeps a unit coefficient.
    fn complement_basic(&mut self, row: usize) {
        let n = self.cols();
        let basic = self.basis[row];
        let u = self.span[basic];

        for j in 0..n {
            if j != basic {
                self.table[(row, j)] = -self.table[(row, j)];
            }
        }

        self.table[(row, n)] = u - self.table[(row, n)];
        self.complemented[basic] = !self.complemented[basic];
    }

    fn signed_cost(&self, col: usize) -> f64 {
        if self.complemented[col] {
            -self.costs[col]
        } else {
            self.costs[col]
        }
    }

    /// Recomputes the reduced costs from scratch for the current basis.
    fn reprice(&mut self) {
        let m = self.rows();

        for j in 0..self.cols() {
            let z_j: f64 = (0..m)
                .map(|i| self.signed_cost(self.basis[i]) * self.table[(i, j)])
                .sum();

            self.table[(m + 1, j)] = self.signed_cost(j) - z_j;
        }

        self.refresh_objective_rows();
    }

    fn refresh_objective_rows(&mut self) {
        let m = self.rows();
        let n = self.cols();

        for &col in &self.basis {
            self.table[(m + 1, col)] = 0.;
        }

        for j in 0..n {
            self.table[(m, j)] = self.signed_cost(j) - self.table[(m + 1, j)];
        }

        self.table[(m, n)] = (0..m)
            .map(|i| self.signed_cost(self.basis[i]) * self.table[(i, n)])
            .sum();

        let objective: f64 = self
            .values()
            .iter()
            .zip(self.costs.iter())
            .map(|(x, c)| x * c)
            .sum();

        self.table[(m + 1, n)] = objective;
    }

    fn objective_row(&self, row: usize) -> Vec<f64> {
        (0..self.cols()).map(|j| self.table[(row, j)]).collect()
    }
}

impl std::fmt::Display for Tableau {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let m = self.rows();
        let n = self.cols();

        write!(f, "{:>8} |", "basis")?;
        for j in 0..n {
            write!(f, " {:>8}", format!("x{}{}", j, if self.complemented[j] { "'" } else { "" }))?;
        }
        writeln!(f, " | {:>10}", "rhs")?;

        for i in 0..m + 2 {
            let label = if i < m {
                format!("x{}", self.basis[i])
            } else if i == m {
                "z_j".to_string()
            } else {
                "c_j-z_j".to_string()
            };

            write!(f, "{:>8} |", label)?;
            for j in 0..n {
                write!(f, " {:>8.3}", self.table[(i, j)])?;
            }
            writeln!(f, " | {:>10.3}", self.table[(i, n)])?;
        }

        Ok(())
    }
}
