//! Linear solver backends for the implicit half of the scheme.
//!
//! Both backends factorize the implicit matrix exactly once; advancing a
//! step is then a pair of triangular sweeps. `DenseLu` handles any corner
//! topology; `BandedThomas` is the O(n) path for the plain tridiagonal band.

use nalgebra::linalg::LU;
use nalgebra::{DMatrix, DVector, Dyn};
use serde::{Deserialize, Serialize};

use crate::error::{HeatError, HeatResult};
use crate::traits::{LinearSolver, Scalar};

/// Which backend the driver should factorize.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SolverKind {
    #[default]
    DenseLu,
    BandedThomas,
}

/// LU factorization of the implicit matrix, computed once and reused for
/// every step's forward/backward substitution.
pub struct DenseLu {
    lu: LU<f64, Dyn, Dyn>,
    dim: usize,
}

impl DenseLu {
    pub fn factorize(matrix: &DMatrix<f64>) -> HeatResult<Self> {
        let dim = matrix.nrows();
        let lu = matrix.clone().lu();
        if !lu.is_invertible() {
            return Err(HeatError::SingularMatrix {
                context: format!("LU factorization of the {dim}x{dim} implicit matrix has a zero pivot"),
            });
        }
        Ok(Self { lu, dim })
    }
}

impl LinearSolver for DenseLu {
    fn dimension(&self) -> usize {
        self.dim
    }

    fn solve(&self, rhs: &DVector<f64>) -> HeatResult<DVector<f64>> {
        self.lu.solve(rhs).ok_or_else(|| HeatError::SingularMatrix {
            context: "LU back-substitution failed".to_string(),
        })
    }
}

/// Thomas-algorithm solver for a tridiagonal matrix with zero corners.
///
/// The forward-elimination coefficients depend only on the matrix, so they
/// are swept once at construction; each `solve` costs a single O(n) pass of
/// elimination and back-substitution over the right-hand side.
pub struct BandedThomas {
    sub: Vec<f64>,
    c_prime: Vec<f64>,
    inv_den: Vec<f64>,
}

impl BandedThomas {
    pub fn factorize(matrix: &DMatrix<f64>) -> HeatResult<Self> {
        let n = matrix.nrows();
        if n >= 3 && (matrix[(0, n - 1)] != 0.0 || matrix[(n - 1, 0)] != 0.0) {
            return Err(HeatError::InvalidGrid {
                parameter: "topology",
                message: "wrap-around corner entries require the dense LU solver".to_string(),
            });
        }

        let mut sub = vec![0.0; n];
        let mut diag = vec![0.0; n];
        let mut sup = vec![0.0; n];
        for i in 0..n {
            diag[i] = matrix[(i, i)];
            if i > 0 {
                sub[i] = matrix[(i, i - 1)];
            }
            if i + 1 < n {
                sup[i] = matrix[(i, i + 1)];
            }
        }

        let (c_prime, inv_den) =
            thomas_factor(&sub, &diag, &sup).ok_or_else(|| HeatError::SingularMatrix {
                context: format!("tridiagonal elimination of the {n}x{n} implicit matrix hit a vanishing pivot"),
            })?;
        Ok(Self {
            sub,
            c_prime,
            inv_den,
        })
    }
}

impl LinearSolver for BandedThomas {
    fn dimension(&self) -> usize {
        self.inv_den.len()
    }

    fn solve(&self, rhs: &DVector<f64>) -> HeatResult<DVector<f64>> {
        let x = thomas_substitute(&self.sub, &self.c_prime, &self.inv_den, rhs.as_slice());
        Ok(DVector::from_vec(x))
    }
}

/// Forward elimination of the band. Returns the swept super-diagonal and the
/// reciprocal pivots, or `None` if a pivot falls below machine epsilon.
fn thomas_factor<T: Scalar>(sub: &[T], diag: &[T], sup: &[T]) -> Option<(Vec<T>, Vec<T>)> {
    let n = diag.len();
    let mut c_prime = vec![T::zero(); n];
    let mut inv_den = vec![T::zero(); n];

    let mut den = diag[0];
    if den.abs() <= T::epsilon() {
        return None;
    }
    inv_den[0] = T::one() / den;
    if n > 1 {
        c_prime[0] = sup[0] * inv_den[0];
    }

    for i in 1..n {
        den = diag[i] - sub[i] * c_prime[i - 1];
        if den.abs() <= T::epsilon() {
            return None;
        }
        inv_den[i] = T::one() / den;
        if i + 1 < n {
            c_prime[i] = sup[i] * inv_den[i];
        }
    }
    Some((c_prime, inv_den))
}

/// Elimination and back-substitution over one right-hand side.
fn thomas_substitute<T: Scalar>(sub: &[T], c_prime: &[T], inv_den: &[T], rhs: &[T]) -> Vec<T> {
    let n = rhs.len();
    let mut x = vec![T::zero(); n];

    x[0] = rhs[0] * inv_den[0];
    for i in 1..n {
        x[i] = (rhs[i] - sub[i] * x[i - 1]) * inv_den[i];
    }
    for i in (0..n - 1).rev() {
        x[i] = x[i] - c_prime[i] * x[i + 1];
    }
    x
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Grid;
    use crate::matrices::{BandTopology, CoefficientMatrices};

    fn implicit_for(interior: usize) -> DMatrix<f64> {
        let grid = Grid::new(interior, 1.0, 4, 1.0, 0.05).unwrap();
        CoefficientMatrices::build(&grid, BandTopology::Dirichlet)
            .unwrap()
            .implicit()
            .clone()
    }

    #[test]
    fn lu_and_thomas_agree_on_the_same_band() {
        let matrix = implicit_for(8);
        let lu = DenseLu::factorize(&matrix).unwrap();
        let thomas = BandedThomas::factorize(&matrix).unwrap();
        assert_eq!(lu.dimension(), 8);
        assert_eq!(thomas.dimension(), 8);

        let rhs = DVector::from_fn(8, |i, _| (1.3 * i as f64).cos());
        let a = lu.solve(&rhs).unwrap();
        let b = thomas.solve(&rhs).unwrap();
        for i in 0..8 {
            assert!((a[i] - b[i]).abs() < 1e-12, "mismatch at {i}: {} vs {}", a[i], b[i]);
        }
    }

    #[test]
    fn solutions_satisfy_the_system() {
        let matrix = implicit_for(5);
        let thomas = BandedThomas::factorize(&matrix).unwrap();
        let rhs = DVector::from_fn(5, |i, _| i as f64 - 2.0);
        let x = thomas.solve(&rhs).unwrap();
        let residual = &matrix * &x - &rhs;
        assert!(residual.norm() < 1e-12);
    }

    #[test]
    fn singular_matrix_is_rejected_at_factorization() {
        let zeros = DMatrix::zeros(3, 3);
        assert!(matches!(
            DenseLu::factorize(&zeros),
            Err(HeatError::SingularMatrix { .. })
        ));
        assert!(matches!(
            BandedThomas::factorize(&zeros),
            Err(HeatError::SingularMatrix { .. })
        ));
    }

    #[test]
    fn thomas_refuses_wraparound_corners() {
        let grid = Grid::new(5, 1.0, 4, 1.0, 0.05).unwrap();
        let m = CoefficientMatrices::build(&grid, BandTopology::Periodic).unwrap();
        assert!(matches!(
            BandedThomas::factorize(m.implicit()),
            Err(HeatError::InvalidGrid {
                parameter: "topology",
                ..
            })
        ));
    }

    #[test]
    fn one_by_one_system() {
        let matrix = DMatrix::from_row_slice(1, 1, &[4.0]);
        let thomas = BandedThomas::factorize(&matrix).unwrap();
        let x = thomas.solve(&DVector::from_vec(vec![2.0])).unwrap();
        assert_eq!(x[0], 0.5);
    }
}
