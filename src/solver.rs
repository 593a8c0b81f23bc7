use crate::error::SimplexError;
use crate::expression::Variable;
use crate::model::Model;
use crate::primal::primal_problem::PrimalPhase2;
use crate::primal::tableau::Tableau;
use crate::util::EPS;

pub type SimplexResult<T> = Result<T, SimplexError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolutionStatus {
    Optimal,
    Unbounded,
    MaxIter,
}

/// An optimal assignment for a model.
///
/// The assignment covers every variable of the normalized model: the
/// original variables first (same indices as in the caller's model), then
/// the slack, surplus and artificial variables in creation order.
#[derive(Debug, Clone)]
pub struct Solution {
    model: Model,
    normal_model: Model,
    assignment: Vec<f64>,
    tableau: Tableau,
}

impl Solution {
    pub(crate) fn new(model: Model, phase_2: PrimalPhase2) -> Self {
        let assignment = phase_2
            .tableau
            .values()
            .into_iter()
            .map(|x| if x.abs() < EPS { 0. } else { x })
            .collect();

        Self {
            model,
            normal_model: phase_2.std_form.model,
            assignment,
            tableau: phase_2.tableau,
        }
    }

    pub fn assignment(&self) -> &[f64] {
        self.assignment.as_slice()
    }

    /// Values of the caller's variables only.
    pub fn original_assignment(&self) -> &[f64] {
        &self.assignment[..self.model.variables().len()]
    }

    /// `None` for a variable that is not part of the solved model.
    pub fn value(&self, var: &Variable) -> Option<f64> {
        match self.normal_model.variables().get(var.index()) {
            Some(known) if known == var => self.assignment.get(var.index()).copied(),
            _ => None,
        }
    }

    /// Objective value in the caller's direction (MIN or MAX).
    pub fn objective_value(&self) -> f64 {
        self.model
            .objective()
            .map_or(0., |objective| objective.evaluate(&self.assignment))
    }

    /// Objective value of the maximize form the solver works with.
    pub fn normalized_objective_value(&self) -> f64 {
        self.normal_model
            .objective()
            .map_or(0., |objective| objective.evaluate(&self.assignment))
    }

    /// The model this solution was computed for.
    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn normal_model(&self) -> &Model {
        &self.normal_model
    }

    /// Final tableau of phase 2.
    pub fn tableau(&self) -> &Tableau {
        &self.tableau
    }

    /// Re-checks the caller's constraints against the assignment.
    pub fn is_feasible(&self) -> bool {
        self.model.is_feasible(&self.assignment)
    }

    /// Solutions are only produced for bounded programs.
    pub fn is_bounded(&self) -> bool {
        self.objective_value().is_finite()
    }
}

impl std::fmt::Display for Solution {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "- objective value : {}", self.objective_value())?;
        write!(f, "- assignment :")?;

        for (var, value) in self.normal_model.variables().iter().zip(&self.assignment) {
            write!(f, " {} = {};", var, value)?;
        }

        Ok(())
    }
}
