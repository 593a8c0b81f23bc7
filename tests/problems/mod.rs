use tableau_lp::*;

const EPS: f64 = 0.00000001;

pub fn assert_optimal(result: &SimplexResult<Solution>, expected_obj: f64, expected_x: &[f64]) {
    match result {
        Ok(sol) => {
            assert!(
                (sol.objective_value() - expected_obj).abs() < EPS,
                "obj: {}, expected: {}",
                sol.objective_value(),
                expected_obj
            );

            let x = sol.original_assignment();

            assert_eq!(x.len(), expected_x.len());

            for (x1, x2) in x.iter().zip(expected_x) {
                assert!((x1 - x2).abs() < EPS, "x_i: {}, expected: {}", x1, x2);
            }

            assert!(sol.is_feasible(), "infeasible assignment: {:?}", sol.assignment());
        }

        Err(err) => panic!("not optimal: {:?}", err),
    }
}

pub fn assert_optimal_obj(result: &SimplexResult<Solution>, expected_obj: f64) {
    match result {
        Ok(sol) => {
            assert!(
                (sol.objective_value() - expected_obj).abs() < EPS,
                "obj: {}, expected: {}",
                sol.objective_value(),
                expected_obj
            );
        }

        Err(err) => panic!("not optimal: {:?}", err),
    }
}

pub fn assert_infeasible(result: &SimplexResult<Solution>) {
    match result {
        Err(SimplexError::Infeasible) => (),
        _ => panic!("not infeasible: {:?}", result),
    }
}

pub fn assert_unbounded(result: &SimplexResult<Solution>) {
    match result {
        Err(SimplexError::Unbounded) => (),
        _ => panic!("not unbounded: {:?}", result),
    }
}

pub fn assert_invalid(result: &SimplexResult<Solution>) {
    match result {
        Err(SimplexError::InvalidModel(..)) => (),
        _ => panic!("not invalid: {:?}", result),
    }
}

pub struct TestProblem {
    pub model: Model,
    pub check_result: Box<dyn FnOnce(&SimplexResult<Solution>)>,
}

impl TestProblem {
    fn new<F: FnOnce(&SimplexResult<Solution>) + 'static>(model: Model, check_result: F) -> Self {
        Self {
            model,
            check_result: Box::new(check_result),
        }
    }
}

fn variables(model: &mut Model, names: &[&str]) -> Vec<Variable> {
    names
        .iter()
        .map(|name| model.create_variable(*name).unwrap())
        .collect()
}

fn expr(terms: &[(&Variable, f64)]) -> Expression {
    Expression::from_terms(terms.iter().copied())
}

pub fn empty_problem() -> TestProblem {
    let mut model = Model::new("empty");
    model.minimize(Expression::new()).unwrap();

    TestProblem::new(model, |result| assert_invalid(result))
}

pub fn no_objective() -> TestProblem {
    let mut model = Model::new("no objective");
    let x = variables(&mut model, &["x"]);

    model.add_constraint(expr(&[(&x[0], 1.)]), ConstraintType::Le, 1.).unwrap();

    TestProblem::new(model, |result| assert_invalid(result))
}

pub fn one_variable_no_constraints() -> TestProblem {
    let mut model = Model::new("one variable");
    let x = variables(&mut model, &["x1"]);

    model.minimize(expr(&[(&x[0], 2.)])).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, 0., &[0.]))
}

pub fn one_variable_infeasible() -> TestProblem {
    let mut model = Model::new("one variable");
    let x = variables(&mut model, &["x1"]);

    model.add_constraint(expr(&[(&x[0], 1.)]), ConstraintType::Le, 0.).unwrap();
    model.add_constraint(expr(&[(&x[0], 1.)]), ConstraintType::Ge, 1.).unwrap();
    model.minimize(expr(&[(&x[0], 2.)])).unwrap();

    TestProblem::new(model, |result| assert_infeasible(result))
}

pub fn one_variable_unbounded() -> TestProblem {
    let mut model = Model::new("one variable");
    let x = variables(&mut model, &["x1"]);

    model.minimize(expr(&[(&x[0], -2.)])).unwrap();

    TestProblem::new(model, |result| assert_unbounded(result))
}

pub fn two_variables_unbounded() -> TestProblem {
    let mut model = Model::new("two variables");
    let x = variables(&mut model, &["x1", "x2"]);

    model.add_constraint(expr(&[(&x[1], 1.)]), ConstraintType::Le, 1.).unwrap();
    model.maximize(expr(&[(&x[0], 2.), (&x[1], 2.)])).unwrap();

    TestProblem::new(model, |result| assert_unbounded(result))
}

pub fn two_variables_infeasible_with_bounds() -> TestProblem {
    let mut model = Model::new("two variables");
    let x = variables(&mut model, &["x1", "x2"]);

    model.add_constraint(expr(&[(&x[1], 1.)]), ConstraintType::Ge, 1.).unwrap();
    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], 1.)]), ConstraintType::Le, 0.)
        .unwrap();
    model.minimize(expr(&[(&x[0], 2.), (&x[1], 2.)])).unwrap();

    TestProblem::new(model, |result| assert_infeasible(result))
}

pub fn infeasible_constraint_without_coeffs() -> TestProblem {
    let mut model = Model::new("constant constraint");
    let x = variables(&mut model, &["x1"]);

    model.add_constraint(Expression::new(), ConstraintType::Eq, 1.).unwrap();
    model.minimize(expr(&[(&x[0], 2.)])).unwrap();

    TestProblem::new(model, |result| assert_infeasible(result))
}

pub fn feasible_constraint_without_coeffs() -> TestProblem {
    let mut model = Model::new("constant constraint");
    let x = variables(&mut model, &["x1"]);

    model.add_constraint(expr(&[(&x[0], 1.)]), ConstraintType::Ge, 3.).unwrap();
    model.add_constraint(Expression::new(), ConstraintType::Eq, 0.).unwrap();
    model.minimize(expr(&[(&x[0], 2.)])).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, 6., &[3.]))
}

pub fn linear_system_2d() -> TestProblem {
    let mut model = Model::new("linear system");
    let v = variables(&mut model, &["x", "y"]);

    model
        .add_constraint(expr(&[(&v[0], 2.), (&v[1], 1.)]), ConstraintType::Eq, 1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 3.), (&v[1], 1.)]), ConstraintType::Eq, 1.)
        .unwrap();
    model.minimize(Expression::new()).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, 0., &[0., 1.]))
}

pub fn linear_system_3d_infeasible() -> TestProblem {
    let mut model = Model::new("linear system");
    let v = variables(&mut model, &["x", "y", "z"]);

    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 2.), (&v[2], 4.)]), ConstraintType::Eq, 1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 3.), (&v[1], 4.), (&v[2], 8.)]), ConstraintType::Eq, 2.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 5.), (&v[1], 6.), (&v[2], 12.)]), ConstraintType::Eq, 5.)
        .unwrap();
    model.minimize(Expression::new()).unwrap();

    TestProblem::new(model, |result| assert_infeasible(result))
}

pub fn solvable_minimization() -> TestProblem {
    let mut model = Model::new("solvable minimization");
    let x = variables(&mut model, &["x1", "x2", "x3"]);

    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], 2.), (&x[2], 1.)]), ConstraintType::Ge, -100.)
        .unwrap();
    model
        .add_constraint(expr(&[(&x[0], 2.), (&x[1], 1.), (&x[2], 3.)]), ConstraintType::Ge, -200.)
        .unwrap();
    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], 2.), (&x[2], 4.)]), ConstraintType::Le, 300.)
        .unwrap();
    model
        .minimize(expr(&[(&x[0], 9.), (&x[1], 9.), (&x[2], 7.)]))
        .unwrap();

    TestProblem::new(model, |result| {
        assert_optimal(result, 0., &[0., 0., 0.]);

        let sol = result.as_ref().unwrap();
        assert_eq!(sol.assignment(), &[0., 0., 0., 100., 200., 300.]);
    })
}

pub fn unbounded_maximization() -> TestProblem {
    let mut model = Model::new("unbounded maximization");
    let x = variables(&mut model, &["x1", "x2", "x3"]);

    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], 1.)]), ConstraintType::Ge, -100.)
        .unwrap();
    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[2], -2.)]), ConstraintType::Ge, -200.)
        .unwrap();
    model
        .add_constraint(expr(&[(&x[1], 5.), (&x[2], 3.)]), ConstraintType::Ge, -300.)
        .unwrap();
    model
        .maximize(expr(&[(&x[0], 9.), (&x[1], 9.), (&x[2], 7.)]))
        .unwrap();

    TestProblem::new(model, |result| assert_unbounded(result))
}

pub fn infeasible_artificial() -> TestProblem {
    let mut model = Model::new("infeasible");
    let x = variables(&mut model, &["x1", "x2"]);

    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], 1.)]), ConstraintType::Eq, 150.)
        .unwrap();
    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], -1.)]), ConstraintType::Ge, 250.)
        .unwrap();
    model.maximize(expr(&[(&x[0], 1.)])).unwrap();

    TestProblem::new(model, |result| assert_infeasible(result))
}

pub fn artificial_basis() -> TestProblem {
    let mut model = Model::new("artificial basis");
    let x = variables(&mut model, &["x1", "x2"]);

    model
        .add_constraint(expr(&[(&x[0], 2.), (&x[1], -1.)]), ConstraintType::Le, -2.)
        .unwrap();
    model
        .add_constraint(expr(&[(&x[0], 1.), (&x[1], 1.)]), ConstraintType::Eq, 5.)
        .unwrap();
    model.maximize(expr(&[(&x[0], 1.), (&x[1], 3.)])).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, 15., &[0., 5.]))
}

pub fn small_prob_2() -> TestProblem {
    let mut model = Model::new("small problem 2");
    let v = variables(&mut model, &["x", "y"]);

    model.add_constraint(expr(&[(&v[0], 1.)]), ConstraintType::Le, 6.).unwrap();
    model
        .add_constraint(expr(&[(&v[0], 0.25), (&v[1], 1.)]), ConstraintType::Le, 6.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 3.), (&v[1], 2.)]), ConstraintType::Le, 22.)
        .unwrap();
    model.minimize(expr(&[(&v[0], -5.), (&v[1], -4.)])).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, -40., &[4., 5.]))
}

pub fn small_prob_3() -> TestProblem {
    let mut model = Model::new("small problem 3");
    let v = variables(&mut model, &["x", "y"]);

    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 2.)]), ConstraintType::Ge, -1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 2.), (&v[1], 1.)]), ConstraintType::Ge, 0.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], -1.)]), ConstraintType::Ge, -1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], -4.)]), ConstraintType::Ge, -13.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -4.), (&v[1], 1.)]), ConstraintType::Ge, -23.)
        .unwrap();
    model.minimize(expr(&[(&v[0], 3.), (&v[1], -6.)])).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, -15., &[3., 4.]))
}

pub fn small_prob_4() -> TestProblem {
    //NOTE: this problem has multiple optimal points, so we only test the objective value
    let mut model = Model::new("small problem 4");
    let v = variables(&mut model, &["x", "y", "z"]);

    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], -1.), (&v[2], 1.)]), ConstraintType::Ge, -2.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], 1.), (&v[2], 1.)]), ConstraintType::Ge, -3.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 1.), (&v[2], -1.)]), ConstraintType::Ge, -1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], -1.), (&v[2], -1.)]), ConstraintType::Ge, -4.)
        .unwrap();
    model
        .minimize(expr(&[(&v[0], -1.), (&v[1], -1.), (&v[2], -1.)]))
        .unwrap();

    TestProblem::new(model, |result| assert_optimal_obj(result, -4.))
}

pub fn small_prob_5() -> TestProblem {
    let mut model = Model::new("small problem 5");
    let v = variables(&mut model, &["x", "y"]);

    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 1.)]), ConstraintType::Ge, -1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 2.)]), ConstraintType::Ge, 1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 4.), (&v[1], 2.)]), ConstraintType::Ge, 8.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], -1.)]), ConstraintType::Ge, -3.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], 1.)]), ConstraintType::Ge, 1.)
        .unwrap();
    model.minimize(expr(&[(&v[0], 4.), (&v[1], 5.)])).unwrap();

    TestProblem::new(model, |result| assert_optimal(result, 14., &[1., 2.]))
}

pub fn small_prob_6() -> TestProblem {
    let mut model = Model::new("small problem 6");
    let v = variables(&mut model, &["x", "y", "z", "w"]);

    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], -3.), (&v[3], -1.)]), ConstraintType::Ge, -4.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -2.), (&v[1], -1.)]), ConstraintType::Ge, -3.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[1], -1.), (&v[2], -4.), (&v[3], -1.)]), ConstraintType::Ge, -3.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 1.), (&v[2], 2.)]), ConstraintType::Ge, 1.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], 1.), (&v[2], 4.)]), ConstraintType::Ge, 1.)
        .unwrap();
    model
        .minimize(expr(&[(&v[0], -2.), (&v[1], -4.), (&v[2], -1.), (&v[3], -1.)]))
        .unwrap();

    TestProblem::new(model, |result| {
        assert_optimal(result, -6.5, &[1., 1., 0.5, 0.])
    })
}

pub fn small_prob_unbounded_1() -> TestProblem {
    let mut model = Model::new("small unbounded problem 1");
    let v = variables(&mut model, &["x", "y", "z"]);

    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], 1.), (&v[2], 1.)]), ConstraintType::Ge, -3.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], 1.), (&v[2], -1.)]), ConstraintType::Ge, -4.)
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], 1.), (&v[1], -1.), (&v[2], -2.)]), ConstraintType::Ge, -1.)
        .unwrap();
    model
        .minimize(expr(&[(&v[0], -2.), (&v[1], -3.), (&v[2], 1.)]))
        .unwrap();

    TestProblem::new(model, |result| assert_unbounded(result))
}

pub fn small_prob_unbounded_2() -> TestProblem {
    let mut model = Model::new("small unbounded problem 2");
    let v = variables(&mut model, &["x", "y", "z", "w"]);

    model
        .add_constraint(expr(&[(&v[1], 1.), (&v[2], -2.), (&v[3], -1.)]), ConstraintType::Ge, -4.)
        .unwrap();
    model
        .add_constraint(
            expr(&[(&v[0], 2.), (&v[1], -1.), (&v[2], -1.), (&v[3], 4.)]),
            ConstraintType::Ge,
            -5.,
        )
        .unwrap();
    model
        .add_constraint(expr(&[(&v[0], -1.), (&v[1], 1.), (&v[3], -2.)]), ConstraintType::Ge, -3.)
        .unwrap();
    model
        .minimize(expr(&[(&v[0], -2.), (&v[1], -3.), (&v[2], 1.), (&v[3], 1.)]))
        .unwrap();

    TestProblem::new(model, |result| assert_unbounded(result))
}

pub fn beale_cycle() -> TestProblem {
    let mut model = Model::new("beale");
    let v = variables(&mut model, &["x", "y", "z", "w"]);

    model
        .add_constraint(
            expr(&[(&v[0], -0.5), (&v[1], 5.5), (&v[2], 2.5), (&v[3], -9.)]),
            ConstraintType::Ge,
            0.,
        )
        .unwrap();
    model
        .add_constraint(
            expr(&[(&v[0], -0.5), (&v[1], 1.5), (&v[2], 0.5), (&v[3], -1.)]),
            ConstraintType::Ge,
            0.,
        )
        .unwrap();
    model.add_constraint(expr(&[(&v[0], -1.)]), ConstraintType::Ge, -1.).unwrap();
    model
        .minimize(expr(&[(&v[0], -10.), (&v[1], 57.), (&v[2], 9.), (&v[3], 24.)]))
        .unwrap();

    TestProblem::new(model, |result| {
        assert_optimal(result, -1., &[1., 0., 1., 0.])
    })
}
