/// Absolute tolerance for every zero and sign comparison in the simplex engine
/// and the sensitivity analyser.
pub const EPS: f64 = 1e-9;

/// Distance from the nearest integer under which branch-and-bound treats a
/// value as integral.
pub const INTEGRALITY_EPS: f64 = 1e-5;

/// Consecutive degenerate pivots tolerated before switching to Bland's rule.
pub const DEGENERATE_STALL_LIMIT: u64 = 50;

pub(crate) const ITER_WIDTH: usize = 10;
