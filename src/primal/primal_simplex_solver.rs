use super::primal_problem::{PrimalPhase1, PrimalPhase2, TableauProblem};
use super::tableau::Step;
use crate::error::SimplexError;
use crate::model::Model;
use crate::solver::{SimplexResult, Solution, SolutionStatus};
use crate::standard_form::StandardForm;
use crate::util::{DEGENERATE_STALL_LIMIT, ITER_WIDTH};

use log::{debug, info, trace, warn};
use std::convert::TryFrom;

/// Two-phase primal simplex on a dense tableau.
#[derive(Debug, Clone, Copy)]
pub struct PrimalSimplexSolver {
    max_iter: u64,
}

impl std::default::Default for PrimalSimplexSolver {
    fn default() -> Self {
        Self { max_iter: 10_000 }
    }
}

impl PrimalSimplexSolver {
    /// `None` means no iteration limit.
    pub fn new(max_iter: Option<u64>) -> Self {
        Self {
            max_iter: max_iter.unwrap_or(u64::MAX),
        }
    }

    pub fn max_iter(&self) -> u64 {
        self.max_iter
    }

    /// Solves a deep copy of `model`; the caller's model is never mutated.
    pub fn solve(&self, model: &Model) -> SimplexResult<Solution> {
        let std_form = StandardForm::try_from(model)?;
        let mut phase_1 = PrimalPhase1::try_from(std_form)?;

        if !phase_1.is_trivial() {
            info!("PRIMAL PHASE 1");

            match self.solve_with_initial(&mut phase_1) {
                SolutionStatus::Optimal => debug!("phase 1 objective: {}", phase_1.obj()),

                SolutionStatus::Unbounded => {
                    warn!("primal phase 1 should never be unbounded");
                    return Err(SimplexError::InvalidModel(
                        "phase 1 objective is unbounded".to_string(),
                    ));
                }

                SolutionStatus::MaxIter => {
                    info!("reached maximum iterations");
                    return Err(SimplexError::IterationLimit(self.max_iter));
                }
            }
        }

        let mut phase_2 = match PrimalPhase2::try_from(phase_1) {
            Ok(phase_2) => phase_2,
            Err(err) => {
                info!("problem is infeasible");
                return Err(err);
            }
        };

        info!("PRIMAL PHASE 2");

        match self.solve_with_initial(&mut phase_2) {
            SolutionStatus::Optimal => {
                let solution = Solution::new(model.clone(), phase_2);

                info!(
                    "found optimal point with objective value {}",
                    solution.objective_value()
                );

                Ok(solution)
            }

            SolutionStatus::Unbounded => {
                info!("problem is unbounded");
                Err(SimplexError::Unbounded)
            }

            SolutionStatus::MaxIter => {
                info!("reached maximum iterations");
                Err(SimplexError::IterationLimit(self.max_iter))
            }
        }
    }

    pub fn solve_with_initial<P: TableauProblem>(&self, prob: &mut P) -> SolutionStatus {
        let tableau = prob.tableau_mut();

        info!(
            "solving problem with {} variables and {} constraints",
            tableau.cols(),
            tableau.rows()
        );

        trace!("initial tableau:\n{}", tableau);
        info!("Iteration  |  Objective");

        let mut iter = 1u64;
        let mut stalled = 0u64;

        loop {
            info!(
                "{:it$}  |  {:.8E}",
                iter,
                tableau.objective_value(),
                it = ITER_WIDTH
            );

            if iter > self.max_iter {
                debug!("reached max iterations");
                return SolutionStatus::MaxIter;
            }

            iter += 1;

            //Dantzig's rule can cycle on degenerate vertices, Bland's rule cannot
            let bland = stalled >= DEGENERATE_STALL_LIMIT;

            if stalled == DEGENERATE_STALL_LIMIT {
                debug!("{} degenerate pivots in a row, using Bland's rule", stalled);
            }

            match tableau.iterate(bland) {
                Step::Optimal => {
                    trace!("final tableau:\n{}", tableau);
                    return SolutionStatus::Optimal;
                }

                Step::Unbounded => return SolutionStatus::Unbounded,

                Step::Pivoted { degenerate } => {
                    if degenerate {
                        stalled += 1;
                    } else {
                        stalled = 0;
                    }
                }
            }
        }
    }
}
