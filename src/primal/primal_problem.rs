use super::tableau::Tableau;
use crate::error::SimplexError;
use crate::standard_form::StandardForm;
use crate::util::EPS;

use log::debug;

/// A standardized problem paired with the tableau the simplex loop works on.
pub trait TableauProblem {
    fn obj(&self) -> f64;
    fn tableau_mut(&mut self) -> &mut Tableau;
}

/// Phase 1: maximize `-sum(artificial)` starting from the slack/artificial basis.
#[derive(Debug)]
pub struct PrimalPhase1 {
    pub std_form: StandardForm,
    pub tableau: Tableau,
}

impl TableauProblem for PrimalPhase1 {
    #[inline]
    fn obj(&self) -> f64 {
        self.tableau.objective_value()
    }

    #[inline]
    fn tableau_mut(&mut self) -> &mut Tableau {
        &mut self.tableau
    }
}

impl PrimalPhase1 {
    /// With no artificial variable the initial basis is already feasible.
    pub fn is_trivial(&self) -> bool {
        self.std_form.artificial.is_empty()
    }

    /// Sum of the artificial variables in the current basic solution.
    pub fn infeasibility(&self) -> f64 {
        let x = self.tableau.values();
        self.std_form.artificial.iter().map(|&j| x[j]).sum()
    }
}

/// Phase 2: the real objective on the feasible basis left by phase 1.
#[derive(Debug)]
pub struct PrimalPhase2 {
    pub std_form: StandardForm,
    pub tableau: Tableau,
}

impl TableauProblem for PrimalPhase2 {
    #[inline]
    fn obj(&self) -> f64 {
        self.tableau.objective_value()
    }

    #[inline]
    fn tableau_mut(&mut self) -> &mut Tableau {
        &mut self.tableau
    }
}

impl std::convert::TryFrom<StandardForm> for PrimalPhase1 {
    type Error = SimplexError;

    fn try_from(std_form: StandardForm) -> Result<Self, SimplexError> {
        debug!(
            "building phase 1 tableau with {} artificial variables",
            std_form.artificial.len()
        );

        let mut c = nalgebra::DVector::zeros(std_form.cols());

        for &j in &std_form.artificial {
            c[j] = -1.;
        }

        let tableau = Tableau::new(
            &std_form.A,
            &std_form.b,
            c,
            &std_form.lower,
            &std_form.upper,
            std_form.basis.clone(),
        )?;

        Ok(PrimalPhase1 { std_form, tableau })
    }
}

//fails with Infeasible if an artificial variable is still positive
impl std::convert::TryFrom<PrimalPhase1> for PrimalPhase2 {
    type Error = SimplexError;

    fn try_from(phase_1: PrimalPhase1) -> Result<Self, SimplexError> {
        let infeasibility = phase_1.infeasibility();
        let scale = phase_1
            .std_form
            .b
            .iter()
            .fold(1., |acc: f64, b_i| acc.max(b_i.abs()));

        if infeasibility > EPS * scale {
            debug!(
                "artificial variables sum to {} after phase 1",
                infeasibility
            );
            return Err(SimplexError::Infeasible);
        }

        debug!("converting phase 1 tableau to phase 2 tableau");

        let PrimalPhase1 {
            std_form,
            mut tableau,
        } = phase_1;

        tableau.fix_columns(&std_form.artificial);
        tableau.set_costs(std_form.c.clone());

        Ok(PrimalPhase2 { std_form, tableau })
    }
}
