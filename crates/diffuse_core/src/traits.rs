use num_traits::{Float, FromPrimitive};
use std::fmt::Debug;

use crate::error::HeatResult;
use nalgebra::DVector;

/// A trait for types that can be used as scalars in the numeric kernels.
/// Must support basic arithmetic, debug printing, and conversion from f64.
pub trait Scalar: Float + FromPrimitive + Debug + 'static {}

impl<T: Float + FromPrimitive + Debug + 'static> Scalar for T {}

/// A solver bound to one implicit system matrix.
///
/// Implementations factorize the matrix once at construction; `solve` is
/// then forward/backward substitution against a fresh right-hand side. The
/// stepper calls `solve` once per time step with the same coefficients.
pub trait LinearSolver {
    /// Returns the dimension of the system.
    fn dimension(&self) -> usize;

    /// Solves `A x = rhs` for `x` using the stored factorization.
    fn solve(&self, rhs: &DVector<f64>) -> HeatResult<DVector<f64>>;
}

impl<S: LinearSolver + ?Sized> LinearSolver for Box<S> {
    fn dimension(&self) -> usize {
        (**self).dimension()
    }

    fn solve(&self, rhs: &DVector<f64>) -> HeatResult<DVector<f64>> {
        (**self).solve(rhs)
    }
}
