pub mod primal_problem;
pub mod primal_simplex_solver;
pub mod tableau;

pub use primal_simplex_solver::PrimalSimplexSolver;
