use std::ops::{Add, Neg, Sub};

/// A decision variable. The index is the variable's column in every matrix
/// built from the model that created it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Variable {
    name: String,
    index: usize,
}

impl Variable {
    pub(crate) fn new(name: String, index: usize) -> Self {
        Self { name, index }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> usize {
        self.index
    }
}

/// A single `factor * variable` term.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    pub variable: Variable,
    pub factor: f64,
}

impl Atom {
    pub fn new(variable: Variable, factor: f64) -> Self {
        Self { variable, factor }
    }

    pub fn evaluate(&self, value: f64) -> f64 {
        self.factor * value
    }
}

impl Neg for Atom {
    type Output = Atom;

    fn neg(self) -> Atom {
        Atom::new(self.variable, -self.factor)
    }
}

/// A linear polynomial, i.e. a sum of atoms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Expression {
    atoms: Vec<Atom>,
}

impl Expression {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn from_atoms(atoms: Vec<Atom>) -> Self {
        Self { atoms }
    }

    pub fn from_terms<'a, I>(terms: I) -> Self
    where
        I: IntoIterator<Item = (&'a Variable, f64)>,
    {
        let atoms = terms
            .into_iter()
            .map(|(var, factor)| Atom::new(var.clone(), factor))
            .collect();

        Self { atoms }
    }

    pub fn add_term(&mut self, var: &Variable, factor: f64) -> &mut Self {
        self.atoms.push(Atom::new(var.clone(), factor));
        self
    }

    pub fn with_term(mut self, var: &Variable, factor: f64) -> Self {
        self.add_term(var, factor);
        self
    }

    pub fn atoms(&self) -> &[Atom] {
        self.atoms.as_slice()
    }

    pub fn len(&self) -> usize {
        self.atoms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn contains(&self, var: &Variable) -> bool {
        self.atoms.iter().any(|atom| atom.variable.index == var.index)
    }

    /// Value of the expression for `assignment`, which must hold one value
    /// per variable of the owning model.
    pub fn evaluate(&self, assignment: &[f64]) -> f64 {
        self.atoms
            .iter()
            .map(|atom| atom.evaluate(assignment[atom.variable.index]))
            .sum()
    }

    /// Sorts the atoms by variable index and merges atoms sharing a variable.
    pub fn simplify(&self) -> Expression {
        let mut sorted = self.atoms.clone();
        sorted.sort_by_key(|atom| atom.variable.index);

        let mut atoms: Vec<Atom> = Vec::with_capacity(sorted.len());

        for atom in sorted {
            match atoms.last_mut() {
                Some(last) if last.variable.index == atom.variable.index => {
                    last.factor += atom.factor
                }
                _ => atoms.push(atom),
            }
        }

        Expression { atoms }
    }

    /// Simplified expression holding exactly one atom per entry of
    /// `variables`, with a zero factor for the ones it did not mention.
    pub fn simplify_for(&self, variables: &[Variable]) -> Expression {
        let mut simplified = self.simplify();

        for var in variables {
            if !simplified.contains(var) {
                simplified.atoms.push(Atom::new(var.clone(), 0.));
            }
        }

        simplified.simplify()
    }

    /// Dense coefficient vector over `variables`, zero where the expression
    /// has no term.
    pub fn factor_vector(&self, variables: &[Variable]) -> nalgebra::DVector<f64> {
        let mut factors = nalgebra::DVector::zeros(variables.len());

        for atom in self.simplify_for(variables).atoms {
            if let Some(pos) = variables
                .iter()
                .position(|var| var.index == atom.variable.index)
            {
                factors[pos] = atom.factor;
            }
        }

        factors
    }
}

impl Add for Expression {
    type Output = Expression;

    fn add(mut self, other: Expression) -> Expression {
        self.atoms.extend(other.atoms);
        self
    }
}

impl Sub for Expression {
    type Output = Expression;

    fn sub(self, other: Expression) -> Expression {
        self + (-other)
    }
}

impl Neg for Expression {
    type Output = Expression;

    fn neg(self) -> Expression {
        Expression {
            atoms: self.atoms.into_iter().map(|atom| -atom).collect(),
        }
    }
}

impl std::fmt::Display for Variable {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

impl std::fmt::Display for Atom {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}*{}", self.factor, self.variable)
    }
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut atoms = self.atoms.iter();

        match atoms.next() {
            Some(first) => write!(f, "{}", first)?,
            None => return write!(f, "0"),
        }

        for atom in atoms {
            write!(
                f,
                " {} {}*{}",
                if atom.factor >= 0. { "+" } else { "-" },
                atom.factor.abs(),
                atom.variable
            )?;
        }

        Ok(())
    }
}
