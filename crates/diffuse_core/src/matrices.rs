//! Construction of the two banded Crank-Nicolson coefficient matrices.
//!
//! The implicit (unknown-side) matrix carries diagonal `2(1 + lambda)` and
//! off-diagonals `-lambda`; the explicit (known-side) matrix carries
//! `2(1 - lambda)` and `+lambda`. Both are built once per grid and never
//! mutated afterwards; only the right-hand side changes between steps.

use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use serde::{Deserialize, Serialize};

use crate::error::{HeatError, HeatResult};
use crate::grid::Grid;

/// Corner topology of the tridiagonal band.
///
/// `Dirichlet` leaves the `[0][n-1]` / `[n-1][0]` corners zero, which is the
/// standard construction for fixed endpoint values. `Periodic` links the
/// first and last interior rows through wrap-around entries and is only
/// correct when the domain itself is periodic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BandTopology {
    #[default]
    Dirichlet,
    Periodic,
}

/// The two constant coefficient matrices of the scheme.
///
/// The implicit matrix is kept dense for LU factorization; the explicit
/// matrix only ever participates in matrix-vector products, so it is stored
/// in CSR form and applied row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct CoefficientMatrices {
    implicit: DMatrix<f64>,
    explicit: CsrMatrix<f64>,
    topology: BandTopology,
}

impl CoefficientMatrices {
    pub fn build(grid: &Grid, topology: BandTopology) -> HeatResult<Self> {
        let n = grid.interior_count();
        let lambda = grid.lambda();
        if !lambda.is_finite() || lambda <= 0.0 {
            return Err(HeatError::InvalidGrid {
                parameter: "lambda",
                message: format!("coupling coefficient must be finite and positive, got {lambda}"),
            });
        }

        let mut implicit = DMatrix::zeros(n, n);
        let mut explicit = CooMatrix::new(n, n);
        for i in 0..n {
            implicit[(i, i)] = 2.0 * (1.0 + lambda);
            explicit.push(i, i, 2.0 * (1.0 - lambda));
            if i + 1 < n {
                implicit[(i, i + 1)] = -lambda;
                implicit[(i + 1, i)] = -lambda;
                explicit.push(i, i + 1, lambda);
                explicit.push(i + 1, i, lambda);
            }
        }
        // Wrap-around entries are distinct from the band only for n >= 3.
        if topology == BandTopology::Periodic && n >= 3 {
            implicit[(0, n - 1)] = -lambda;
            implicit[(n - 1, 0)] = -lambda;
            explicit.push(0, n - 1, lambda);
            explicit.push(n - 1, 0, lambda);
        }

        Ok(Self {
            implicit,
            explicit: CsrMatrix::from(&explicit),
            topology,
        })
    }

    pub fn interior_count(&self) -> usize {
        self.implicit.nrows()
    }

    pub fn implicit(&self) -> &DMatrix<f64> {
        &self.implicit
    }

    pub fn explicit(&self) -> &CsrMatrix<f64> {
        &self.explicit
    }

    pub fn topology(&self) -> BandTopology {
        self.topology
    }

    /// Forms the right-hand side `b = explicit * interior`.
    ///
    /// The CSR rows are walked in index order with a sequential accumulator,
    /// so the reduction order is fixed and repeated runs are bit-identical.
    pub fn rhs(&self, interior: &DVector<f64>) -> DVector<f64> {
        let n = self.interior_count();
        let offsets = self.explicit.row_offsets();
        let cols = self.explicit.col_indices();
        let vals = self.explicit.values();

        let mut out = DVector::zeros(n);
        for row in 0..n {
            let mut acc = 0.0;
            for k in offsets[row]..offsets[row + 1] {
                acc += vals[k] * interior[cols[k]];
            }
            out[row] = acc;
        }
        out
    }
}
