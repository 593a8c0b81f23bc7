use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SimplexError {
    #[error("invalid model: {0}")]
    InvalidModel(String),

    #[error("constraint bounds must be non-negative, got {bound}")]
    NegativeBound { bound: f64 },

    #[error("invalid constraint bound: {0}")]
    InvalidBound(f64),

    #[error("there is already a variable named {0}")]
    DuplicateVariable(String),

    #[error("variable {name} (index {index}) does not belong to this model")]
    UnknownVariable { name: String, index: usize },

    #[error("linear program is unbounded")]
    Unbounded,

    #[error("linear program is infeasible (positive artificial variables)")]
    Infeasible,

    #[error("reached the maximum of {0} iterations")]
    IterationLimit(u64),
}

impl SimplexError {
    /// True for the outcomes that say "no finite optimum exists" rather than
    /// "the request was malformed".
    pub fn is_solve_outcome(&self) -> bool {
        matches!(
            self,
            SimplexError::Unbounded | SimplexError::Infeasible | SimplexError::IterationLimit(..)
        )
    }
}
