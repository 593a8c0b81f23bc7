use crate::error::SimplexError;
use crate::expression::{Expression, Variable};
use crate::primal::PrimalSimplexSolver;
use crate::solver::{SimplexResult, Solution};
use crate::util::EPS;

const LTE_STR: &str = "\u{2264}";
const EQ_STR: &str = "\u{003D}";
const GTE_STR: &str = "\u{2265}";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintType {
    Le,
    Eq,
    Ge,
}

impl std::ops::Neg for ConstraintType {
    type Output = ConstraintType;

    fn neg(self) -> ConstraintType {
        match self {
            ConstraintType::Le => ConstraintType::Ge,
            ConstraintType::Eq => ConstraintType::Eq,
            ConstraintType::Ge => ConstraintType::Le,
        }
    }
}

/// `expression kind bound`, plus the variables normalization attached to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub expression: Expression,
    pub kind: ConstraintType,
    pub bound: f64,
    pub extra_variable: Option<Variable>,
    pub artificial_variable: Option<Variable>,
}

impl Constraint {
    /// Rejects negative bounds, see [`Constraint::non_negative`] for the
    /// reversing constructor.
    pub fn new(
        expression: Expression,
        kind: ConstraintType,
        bound: f64,
    ) -> Result<Self, SimplexError> {
        if !bound.is_finite() {
            return Err(SimplexError::InvalidBound(bound));
        }

        if bound < 0. {
            return Err(SimplexError::NegativeBound { bound });
        }

        Ok(Self {
            expression,
            kind,
            bound,
            extra_variable: None,
            artificial_variable: None,
        })
    }

    /// Builds the constraint, reversing it first when the bound is negative.
    pub fn non_negative(
        expression: Expression,
        kind: ConstraintType,
        bound: f64,
    ) -> Result<Self, SimplexError> {
        if bound < 0. {
            Self::new(-expression, -kind, -bound)
        } else {
            Self::new(expression, kind, bound)
        }
    }

    /// Negates the expression, the bound and the relation.
    pub fn reversed(self) -> Self {
        Self {
            expression: -self.expression,
            kind: -self.kind,
            bound: -self.bound,
            ..self
        }
    }

    /// Constraints with at most one atom are variable bounds and never
    /// become tableau rows.
    pub fn is_polynomial(&self) -> bool {
        self.expression.len() > 1
    }

    pub fn factor_vector(&self, variables: &[Variable]) -> nalgebra::DVector<f64> {
        self.expression.factor_vector(variables)
    }

    pub fn is_satisfied(&self, assignment: &[f64]) -> bool {
        let lhs = self.expression.evaluate(assignment);

        match self.kind {
            ConstraintType::Le => lhs <= self.bound + EPS,
            ConstraintType::Eq => (lhs - self.bound).abs() <= EPS,
            ConstraintType::Ge => lhs >= self.bound - EPS,
        }
    }

    pub fn simplify(&self) -> Self {
        Self {
            expression: self.expression.simplify(),
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectiveType {
    Min,
    Max,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Objective {
    pub expression: Expression,
    pub kind: ObjectiveType,
}

impl Objective {
    pub fn new(expression: Expression, kind: ObjectiveType) -> Self {
        Self { expression, kind }
    }

    pub fn evaluate(&self, assignment: &[f64]) -> f64 {
        self.expression.evaluate(assignment)
    }

    /// Equivalent objective in maximize form.
    pub fn as_maximize(&self) -> Objective {
        match self.kind {
            ObjectiveType::Max => self.clone(),
            ObjectiveType::Min => Objective::new(-self.expression.clone(), ObjectiveType::Max),
        }
    }

    pub fn simplify(&self) -> Objective {
        Objective::new(self.expression.simplify(), self.kind)
    }
}

/// A linear program: variables (index == position), constraints and one
/// objective.
#[derive(Debug, Clone, Default)]
pub struct Model {
    pub name: String,
    pub(crate) variables: Vec<Variable>,
    pub(crate) constraints: Vec<Constraint>,
    pub(crate) objective: Option<Objective>,
}

impl Model {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn create_variable<S: Into<String>>(&mut self, name: S) -> Result<Variable, SimplexError> {
        let name = name.into();

        if self.variable(&name).is_some() {
            return Err(SimplexError::DuplicateVariable(name));
        }

        let var = Variable::new(name, self.variables.len());
        self.variables.push(var.clone());
        Ok(var)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.iter().find(|var| var.name() == name)
    }

    pub fn variables(&self) -> &[Variable] {
        self.variables.as_slice()
    }

    pub fn constraints(&self) -> &[Constraint] {
        self.constraints.as_slice()
    }

    pub fn objective(&self) -> Option<&Objective> {
        self.objective.as_ref()
    }

    pub fn add_constraint(
        &mut self,
        expression: Expression,
        kind: ConstraintType,
        bound: f64,
    ) -> Result<(), SimplexError> {
        let constraint = Constraint::non_negative(expression, kind, bound)?;
        self.push_constraint(constraint)
    }

    pub fn push_constraint(&mut self, constraint: Constraint) -> Result<(), SimplexError> {
        self.check_variables(&constraint.expression)?;
        self.constraints.push(constraint);
        Ok(())
    }

    pub fn maximize(&mut self, expression: Expression) -> Result<(), SimplexError> {
        self.set_objective(Objective::new(expression, ObjectiveType::Max))
    }

    pub fn minimize(&mut self, expression: Expression) -> Result<(), SimplexError> {
        self.set_objective(Objective::new(expression, ObjectiveType::Min))
    }

    pub fn set_objective(&mut self, objective: Objective) -> Result<(), SimplexError> {
        self.check_variables(&objective.expression)?;
        self.objective = Some(objective);
        Ok(())
    }

    /// Simplifies the expressions of every constraint and the objective in place.
    pub fn simplify(&mut self) {
        self.constraints = self.constraints.iter().map(Constraint::simplify).collect();
        self.objective = self.objective.as_ref().map(Objective::simplify);
    }

    /// A model can only be solved with at least one variable and an objective.
    pub fn validate(&self) -> Result<&Objective, SimplexError> {
        if self.variables.is_empty() {
            return Err(SimplexError::InvalidModel(
                "can't solve a model without any variables".to_string(),
            ));
        }

        self.objective.as_ref().ok_or_else(|| {
            SimplexError::InvalidModel("can't solve a model without an objective".to_string())
        })
    }

    pub fn bounds_vector(&self) -> nalgebra::DVector<f64> {
        let bounds: Vec<f64> = self
            .constraints
            .iter()
            .filter(|c| c.is_polynomial())
            .map(|c| c.bound)
            .collect();

        nalgebra::DVector::from_vec(bounds)
    }

    pub fn constraint_factors_matrix(&self) -> nalgebra::DMatrix<f64> {
        let rows: Vec<_> = self
            .constraints
            .iter()
            .filter(|c| c.is_polynomial())
            .map(|c| c.factor_vector(&self.variables))
            .collect();

        let mut matrix = nalgebra::DMatrix::zeros(rows.len(), self.variables.len());

        for (i, row) in rows.iter().enumerate() {
            for (j, &factor) in row.iter().enumerate() {
                matrix[(i, j)] = factor;
            }
        }

        matrix
    }

    /// True if `assignment` is non-negative and satisfies every constraint.
    pub fn is_feasible(&self, assignment: &[f64]) -> bool {
        if assignment.len() < self.variables.len() {
            return false;
        }

        assignment.iter().all(|&x| x >= -EPS)
            && self.constraints.iter().all(|c| c.is_satisfied(assignment))
    }

    /// Solves the model with the default primal simplex solver. The model
    /// itself is left untouched.
    pub fn solve(&self) -> SimplexResult<Solution> {
        PrimalSimplexSolver::default().solve(self)
    }

    fn check_variables(&self, expression: &Expression) -> Result<(), SimplexError> {
        match expression
            .atoms()
            .iter()
            .find(|atom| self.variables.get(atom.variable.index()) != Some(&atom.variable))
        {
            Some(atom) => Err(SimplexError::UnknownVariable {
                name: atom.variable.name().to_string(),
                index: atom.variable.index(),
            }),
            None => Ok(()),
        }
    }
}

impl std::fmt::Display for ConstraintType {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConstraintType::Le => write!(f, "{}", LTE_STR),
            ConstraintType::Eq => write!(f, "{}", EQ_STR),
            ConstraintType::Ge => write!(f, "{}", GTE_STR),
        }
    }
}

impl std::fmt::Display for Constraint {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{} {} {}", self.expression, self.kind, self.bound)
    }
}

impl std::fmt::Display for Objective {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self.kind {
            ObjectiveType::Max => write!(f, "maximize {}", self.expression),
            ObjectiveType::Min => write!(f, "minimize {}", self.expression),
        }
    }
}

impl std::fmt::Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        writeln!(f, "{}", self.name)?;

        match &self.objective {
            Some(objective) => writeln!(f, "{}", objective)?,
            None => writeln!(f, "no objective")?,
        }

        writeln!(f, "\nsubject to")?;

        for constraint in &self.constraints {
            writeln!(f, "{}", constraint)?;
        }

        writeln!(f, "\nwith the variables")?;

        let names: Vec<_> = self.variables.iter().map(Variable::name).collect();
        write!(f, "{} {} 0", names.join(", "), GTE_STR)
    }
}
