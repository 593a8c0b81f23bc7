#![allow(non_snake_case)]

use crate::error::SimplexError;
use crate::expression::{Expression, Variable};
use crate::model::{Constraint, ConstraintType, Model, Objective};
use crate::util::EPS;

use log::debug;

/// Per-variable bounds folded out of the non-polynomial constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct VariableBounds {
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,
}

impl VariableBounds {
    /// Folds every constraint with at most one atom into a bound. Every
    /// variable starts with `[0, inf)`.
    pub fn fold(model: &Model) -> Result<Self, SimplexError> {
        let n = model.variables().len();
        let mut lower = vec![0f64; n];
        let mut upper = vec![f64::INFINITY; n];

        for constraint in model.constraints().iter().filter(|c| !c.is_polynomial()) {
            match constraint.expression.atoms().first() {
                Some(atom) if atom.factor.abs() > EPS => {
                    let i = atom.variable.index();
                    let value = constraint.bound / atom.factor;

                    let kind = if atom.factor < 0. {
                        -constraint.kind
                    } else {
                        constraint.kind
                    };

                    match kind {
                        ConstraintType::Le => upper[i] = upper[i].min(value),
                        ConstraintType::Ge => lower[i] = lower[i].max(value),
                        ConstraintType::Eq => {
                            upper[i] = upper[i].min(value);
                            lower[i] = lower[i].max(value);
                        }
                    }
                }

                //0 <=, =, >= bound
                _ => {
                    let holds = match constraint.kind {
                        ConstraintType::Le => constraint.bound >= -EPS,
                        ConstraintType::Eq => constraint.bound.abs() <= EPS,
                        ConstraintType::Ge => constraint.bound <= EPS,
                    };

                    if !holds {
                        debug!("constant constraint {} can never hold", constraint);
                        return Err(SimplexError::Infeasible);
                    }
                }
            }
        }

        for (i, (lb, ub)) in lower.iter().zip(upper.iter_mut()).enumerate() {
            if *lb > *ub + EPS {
                debug!(
                    "bounds of {} are contradictory: [{}, {}]",
                    model.variables()[i],
                    lb,
                    ub
                );
                return Err(SimplexError::Infeasible);
            }

            if *ub < *lb {
                *ub = *lb;
            }
        }

        Ok(Self { lower, upper })
    }

    fn extend(&mut self, n: usize) {
        self.lower.resize(n, 0.);
        self.upper.resize(n, f64::INFINITY);
    }
}

/// Rewrites a deep copy of `model` so that every polynomial constraint is an
/// equality with a non-negative right-hand side (after shifting by the lower
/// bounds) and the objective is maximized.
///
/// LE rows get a slack `s{i}`, GE rows a surplus `s{i}` plus an artificial
/// `R{i}`, EQ rows only an artificial `R{i}`. The new variables are appended
/// to the model, so the original variables keep their indices.
pub fn normalize(model: &Model) -> Result<(Model, VariableBounds), SimplexError> {
    let objective = model.validate()?.simplify().as_maximize();

    let mut normal = model.clone();
    normal.simplify();
    normal.name = format!("{} (normalized)", model.name);

    let mut bounds = VariableBounds::fold(&normal)?;
    let constraints = std::mem::take(&mut normal.constraints);
    let mut normalized = Vec::with_capacity(constraints.len());

    for (i, constraint) in constraints.into_iter().enumerate() {
        if !constraint.is_polynomial() {
            normalized.push(constraint);
            continue;
        }

        let shifted = constraint.bound - constraint.expression.evaluate(&bounds.lower);

        //a GE row with a zero rhs is an LE row in disguise, and LE rows need no artificial
        let constraint = if shifted < 0. || (shifted < EPS && constraint.kind == ConstraintType::Ge)
        {
            constraint.reversed()
        } else {
            constraint
        };

        normalized.push(normalize_constraint(&mut normal, constraint, i)?);
    }

    normal.constraints = normalized;
    normal.objective = Some(objective);
    bounds.extend(normal.variables().len());

    debug!(
        "normalized model has {} variables and {} rows",
        normal.variables().len(),
        normal.constraints().iter().filter(|c| c.is_polynomial()).count()
    );

    Ok((normal, bounds))
}

fn normalize_constraint(
    model: &mut Model,
    constraint: Constraint,
    index: usize,
) -> Result<Constraint, SimplexError> {
    let (extra_variable, extra_factor, artificial_variable) = match constraint.kind {
        ConstraintType::Le => (Some(fresh_variable(model, "s", index)?), 1., None),

        ConstraintType::Ge => {
            let surplus = fresh_variable(model, "s", index)?;
            (Some(surplus), -1., Some(fresh_variable(model, "R", index)?))
        }

        ConstraintType::Eq => (None, 0., Some(fresh_variable(model, "R", index)?)),
    };

    let mut expression: Expression = constraint.expression;

    if let Some(var) = &extra_variable {
        expression.add_term(var, extra_factor);
    }

    if let Some(var) = &artificial_variable {
        expression.add_term(var, 1.);
    }

    Ok(Constraint {
        expression,
        kind: ConstraintType::Eq,
        bound: constraint.bound,
        extra_variable,
        artificial_variable,
    })
}

fn fresh_variable(model: &mut Model, prefix: &str, index: usize) -> Result<Variable, SimplexError> {
    let mut name = format!("{}{}", prefix, index);

    while model.variable(&name).is_some() {
        name.push('\'');
    }

    model.create_variable(name)
}

/// Dense numeric form of a normalized model: `max c^T x` subject to
/// `A x = b`, `lower <= x <= upper`, with `b` already shifted by the lower
/// bounds so that `A (x - lower) = b` and `b >= 0`.
#[derive(Debug, Clone)]
pub struct StandardForm {
    pub c: nalgebra::DVector<f64>,
    pub A: nalgebra::DMatrix<f64>,
    pub b: nalgebra::DVector<f64>,
    pub lower: Vec<f64>,
    pub upper: Vec<f64>,

    /// Initial basic column of every row: the artificial variable if the
    /// row has one, otherwise its slack.
    pub basis: Vec<usize>,
    pub artificial: Vec<usize>,

    //keep the normalized model so solutions can be mapped back to variables
    pub model: Model,
    original_vars: usize,
}

impl std::convert::TryFrom<&Model> for StandardForm {
    type Error = SimplexError;

    fn try_from(prob: &Model) -> Result<StandardForm, SimplexError> {
        let (model, bounds) = normalize(prob)?;
        let VariableBounds { lower, upper } = bounds;

        let A = model.constraint_factors_matrix();
        let lower_vec = nalgebra::DVector::from_column_slice(&lower);
        let b = model.bounds_vector() - &A * lower_vec;

        let c = match model.objective() {
            Some(objective) => objective.expression.factor_vector(model.variables()),
            None => {
                return Err(SimplexError::InvalidModel(
                    "normalized model lost its objective".to_string(),
                ))
            }
        };

        let rows: Vec<&Constraint> = model
            .constraints()
            .iter()
            .filter(|c| c.is_polynomial())
            .collect();

        let mut basis = Vec::with_capacity(rows.len());

        for row in &rows {
            match row.artificial_variable.as_ref().or(row.extra_variable.as_ref()) {
                Some(var) => basis.push(var.index()),
                None => {
                    return Err(SimplexError::InvalidModel(format!(
                        "row {} has no basic variable",
                        row
                    )))
                }
            }
        }

        let artificial = rows
            .iter()
            .filter_map(|row| row.artificial_variable.as_ref().map(Variable::index))
            .collect();

        Ok(StandardForm {
            c,
            A,
            b,
            lower,
            upper,
            basis,
            artificial,
            model,
            original_vars: prob.variables().len(),
        })
    }
}

impl StandardForm {
    pub fn rows(&self) -> usize {
        self.A.nrows()
    }

    pub fn cols(&self) -> usize {
        self.A.ncols()
    }

    pub fn original_vars(&self) -> usize {
        self.original_vars
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.model.objective()
    }

    /// Starting point of the two-phase method: every nonbasic variable at its
    /// lower bound, every basic slack or artificial equal to its row's rhs.
    pub fn initial_point(&self) -> nalgebra::DVector<f64> {
        let mut x = nalgebra::DVector::from_column_slice(&self.lower);

        for (i, &col) in self.basis.iter().enumerate() {
            x[col] = self.lower[col] + self.b[i];
        }

        x
    }
}
