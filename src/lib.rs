mod analysis;
mod error;
pub mod expression;
mod integer;
pub mod model;
mod primal;
pub mod solver;
mod standard_form;
mod util;

pub use crate::analysis::ObjectiveSensitivityAnalyser;
pub use crate::error::SimplexError;
pub use crate::expression::{Atom, Expression, Variable};
pub use crate::integer::{BranchAndBoundSolver, SearchOutcome};
pub use crate::model::{Constraint, ConstraintType, Model, Objective, ObjectiveType};
pub use crate::primal::primal_problem::{PrimalPhase1, PrimalPhase2, TableauProblem};
pub use crate::primal::tableau::{Step, Tableau};
pub use crate::primal::PrimalSimplexSolver;
pub use crate::solver::{SimplexResult, Solution, SolutionStatus};
pub use crate::standard_form::{normalize, StandardForm, VariableBounds};
pub use crate::util::{DEGENERATE_STALL_LIMIT, EPS, INTEGRALITY_EPS};
