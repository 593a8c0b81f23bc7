use crate::error::SimplexError;
use crate::expression::{Expression, Variable};
use crate::model::{ConstraintType, Model};
use crate::primal::PrimalSimplexSolver;
use crate::solver::{SimplexResult, Solution};
use crate::util::INTEGRALITY_EPS;

use log::{debug, info, trace};
use std::time::{Duration, Instant};

/// Depth-first branch and bound over LP relaxations, bounded by wall-clock
/// time. Every variable of the model is required to be integral.
#[derive(Debug, Clone, Copy)]
pub struct BranchAndBoundSolver {
    time_limit: Duration,
    simplex: PrimalSimplexSolver,
}

/// Result of a search, including the bookkeeping of how it ended.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub best: Option<Solution>,
    /// The time limit cut the search short; `best` may not be optimal.
    pub interrupted: bool,
    pub total_time: Duration,
    /// Relaxations solved.
    pub nodes: u64,
}

impl BranchAndBoundSolver {
    /// Limits that are negative or NaN mean no time at all.
    pub fn new(time_limit_secs: f64) -> Self {
        let time_limit = if time_limit_secs >= Duration::MAX.as_secs_f64() {
            Duration::MAX
        } else if time_limit_secs > 0. {
            Duration::from_secs_f64(time_limit_secs)
        } else {
            Duration::ZERO
        };

        Self::with_time_limit(time_limit)
    }

    pub fn with_time_limit(time_limit: Duration) -> Self {
        Self {
            time_limit,
            simplex: PrimalSimplexSolver::default(),
        }
    }

    /// Solver used for every relaxation.
    pub fn with_simplex(mut self, simplex: PrimalSimplexSolver) -> Self {
        self.simplex = simplex;
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Best integer solution found within the time limit, if any.
    pub fn solve(&self, model: &Model) -> SimplexResult<Option<Solution>> {
        Ok(self.search(model)?.best)
    }

    pub fn search(&self, model: &Model) -> SimplexResult<SearchOutcome> {
        model.validate()?;

        let mut search = Search::new(self);
        search.run(model.clone())?;

        let total_time = search.start.elapsed();

        match &search.best {
            Some(best) => info!(
                "branch and bound finished after {} nodes in {:?}, best objective {}",
                search.nodes,
                total_time,
                best.objective_value()
            ),
            None => info!(
                "branch and bound finished after {} nodes in {:?} without an integer solution",
                search.nodes, total_time
            ),
        }

        if search.interrupted {
            info!("time limit of {:?} reached", self.time_limit);
        }

        Ok(SearchOutcome {
            best: search.best,
            interrupted: search.interrupted,
            total_time,
            nodes: search.nodes,
        })
    }
}

struct Search<'a> {
    solver: &'a BranchAndBoundSolver,
    start: Instant,
    best: Option<Solution>,
    interrupted: bool,
    nodes: u64,
}

impl<'a> Search<'a> {
    fn new(solver: &'a BranchAndBoundSolver) -> Self {
        Self {
            solver,
            start: Instant::now(),
            best: None,
            interrupted: false,
            nodes: 0,
        }
    }

    /// Depth first, floor branch before ceil branch. Pending branches live on
    /// a heap-allocated stack, so deep trees are only limited by time.
    fn run(&mut self, root: Model) -> SimplexResult<()> {
        let mut pending = vec![root];

        while let Some(model) = pending.pop() {
            if self.start.elapsed() >= self.solver.time_limit {
                self.interrupted = true;
                break;
            }

            self.nodes += 1;

            if let Some((var, value)) = self.process(&model)? {
                trace!("branching on {} = {}", var, value);

                pending.push(with_bound(&model, &var, ConstraintType::Ge, value.ceil())?);
                pending.push(with_bound(&model, &var, ConstraintType::Le, value.floor())?);
            }
        }

        Ok(())
    }

    /// Solves one relaxation. Returns the variable to branch on, or `None`
    /// when the node is pruned or yields a new incumbent.
    fn process(&mut self, model: &Model) -> SimplexResult<Option<(Variable, f64)>> {
        let solution = match self.solver.simplex.solve(model) {
            Ok(solution) => solution,
            Err(err) if err.is_solve_outcome() => {
                trace!("pruned {}: {}", model.name, err);
                return Ok(None);
            }
            Err(err) => return Err(err),
        };

        //relaxations only get worse down the tree
        let bound = solution.normalized_objective_value();
        if let Some(best) = &self.best {
            if bound <= best.normalized_objective_value() {
                trace!("pruned {}: bound {} is no improvement", model.name, bound);
                return Ok(None);
            }
        }

        match fractional_variable(&solution) {
            Some(pair) => Ok(Some(pair)),
            None => {
                debug!("new incumbent with objective {}", solution.objective_value());
                self.best = Some(solution);
                Ok(None)
            }
        }
    }
}

fn fractional_variable(solution: &Solution) -> Option<(Variable, f64)> {
    solution
        .model()
        .variables()
        .iter()
        .zip(solution.original_assignment())
        .find(|(_, value)| (*value - value.round()).abs() > INTEGRALITY_EPS)
        .map(|(var, &value)| (var.clone(), value))
}

fn with_bound(
    model: &Model,
    var: &Variable,
    kind: ConstraintType,
    bound: f64,
) -> Result<Model, SimplexError> {
    let mut branch = model.clone();
    branch.add_constraint(Expression::new().with_term(var, 1.), kind, bound)?;
    Ok(branch)
}
