//! The `diffuse_core` crate is the numerical engine behind the Diffuse heat
//! equation simulator: Crank-Nicolson time integration of the 1D diffusion
//! equation on a uniform grid with fixed endpoint values.
//!
//! Key components:
//! - **Grid / BoundaryValues**: validated discretization parameters and the
//!   fixed Dirichlet endpoint pair.
//! - **CoefficientMatrices**: the two constant banded matrices of the
//!   scheme, built once per grid.
//! - **Solvers**: the `LinearSolver` seam with a factor-once dense LU
//!   backend and an O(n) banded Thomas backend.
//! - **TimeStepper**: owns the field history and advances it one snapshot
//!   per step; the buffer is released only after the run completes.
//! - **SimulationConfig / simulate**: the serializable entry contract used
//!   by the CLI and animation frontends.

pub mod config;
pub mod error;
pub mod grid;
pub mod matrices;
pub mod solver;
pub mod stepper;
pub mod traits;
