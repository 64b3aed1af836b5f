//! Time stepping: advances the field one snapshot at a time.
//!
//! Each step forms `b = explicit * v` from the previous interior slice,
//! solves `implicit * x = b` against the stored factorization, and appends
//! the result as the next snapshot. Steps are strictly sequential; snapshot
//! `l + 1` exists only once snapshot `l` has been written.

use nalgebra::DVector;
use serde::{Deserialize, Serialize};

use crate::error::{HeatError, HeatResult};
use crate::grid::{BoundaryValues, Grid};
use crate::matrices::CoefficientMatrices;
use crate::traits::LinearSolver;

/// Initial interior field, either given explicitly or sampled from a
/// canonical profile on the interior nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum InitialCondition {
    /// Explicit values for the `interior_count` unknowns.
    Interior { values: Vec<f64> },
    /// `amplitude * sin(pi * x / L)` evaluated at the interior nodes.
    SineHalfWave { amplitude: f64 },
}

impl InitialCondition {
    pub fn sample(&self, grid: &Grid) -> HeatResult<Vec<f64>> {
        let n = grid.interior_count();
        match self {
            Self::Interior { values } => {
                if values.len() != n {
                    return Err(HeatError::InvalidInitial {
                        message: format!(
                            "expected {n} interior values, got {}",
                            values.len()
                        ),
                    });
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(HeatError::InvalidInitial {
                        message: format!("interior value {bad} is not finite"),
                    });
                }
                Ok(values.clone())
            }
            Self::SineHalfWave { amplitude } => {
                if !amplitude.is_finite() {
                    return Err(HeatError::InvalidInitial {
                        message: format!("amplitude {amplitude} is not finite"),
                    });
                }
                let dx = grid.dx();
                let length = grid.space_length();
                Ok((0..n)
                    .map(|i| {
                        let x = (i + 1) as f64 * dx;
                        amplitude * (std::f64::consts::PI * x / length).sin()
                    })
                    .collect())
            }
        }
    }
}

/// Full time-by-space record of a run: `step_count + 1` snapshots of
/// `interior_count + 2` values each, boundary entries included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldBuffer {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FieldBuffer {
    fn zeroed(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Number of snapshots, the initial condition included.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Values per snapshot, the two boundary entries included.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// The full spatial field at time index `l`.
    pub fn snapshot(&self, l: usize) -> &[f64] {
        &self.data[l * self.cols..(l + 1) * self.cols]
    }

    /// The interior portion of snapshot `l`, boundary entries excluded.
    pub fn interior(&self, l: usize) -> &[f64] {
        &self.snapshot(l)[1..self.cols - 1]
    }

    fn snapshot_mut(&mut self, l: usize) -> &mut [f64] {
        let cols = self.cols;
        &mut self.data[l * cols..(l + 1) * cols]
    }
}

/// Lifecycle of a stepper. Construction populates snapshot 0, so a value in
/// hand is always at least `Initialized`; there is no way out of the two
/// terminal phases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StepperPhase {
    Initialized,
    Running,
    Completed,
    Failed,
}

impl StepperPhase {
    fn name(self) -> &'static str {
        match self {
            Self::Initialized => "Initialized",
            Self::Running => "Running",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
        }
    }
}

/// Owns the coefficient matrices, the factorized solver, and the evolving
/// field history for one run. The buffer is surrendered only after the run
/// reaches `Completed`, so readers never observe a half-written snapshot.
pub struct TimeStepper<S: LinearSolver> {
    grid: Grid,
    boundary: BoundaryValues,
    matrices: CoefficientMatrices,
    solver: S,
    buffer: FieldBuffer,
    cursor: usize,
    phase: StepperPhase,
    failure: Option<HeatError>,
}

impl<S: LinearSolver> TimeStepper<S> {
    pub fn new(
        grid: Grid,
        boundary: BoundaryValues,
        matrices: CoefficientMatrices,
        solver: S,
        initial_interior: Vec<f64>,
    ) -> HeatResult<Self> {
        let n = grid.interior_count();
        if matrices.interior_count() != n {
            return Err(HeatError::InvalidGrid {
                parameter: "matrices",
                message: format!(
                    "coefficient matrices are {}x{} but the grid has {n} interior points",
                    matrices.interior_count(),
                    matrices.interior_count()
                ),
            });
        }
        if solver.dimension() != n {
            return Err(HeatError::InvalidGrid {
                parameter: "solver",
                message: format!(
                    "solver dimension {} does not match {n} interior points",
                    solver.dimension()
                ),
            });
        }
        if initial_interior.len() != n {
            return Err(HeatError::InvalidInitial {
                message: format!(
                    "expected {n} interior values, got {}",
                    initial_interior.len()
                ),
            });
        }

        let mut buffer = FieldBuffer::zeroed(grid.step_count() + 1, n + 2);
        let first = buffer.snapshot_mut(0);
        first[0] = boundary.left();
        first[1..n + 1].copy_from_slice(&initial_interior);
        first[n + 1] = boundary.right();

        Ok(Self {
            grid,
            boundary,
            matrices,
            solver,
            buffer,
            cursor: 0,
            phase: StepperPhase::Initialized,
            failure: None,
        })
    }

    pub fn phase(&self) -> StepperPhase {
        self.phase
    }

    /// Index of the next step to advance; equals `step_count` when done.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Advances one step. Returns `Ok(true)` if a snapshot was written and
    /// `Ok(false)` once the run is complete. A failed solve transitions to
    /// `Failed` permanently; every later call returns the same error.
    pub fn advance(&mut self) -> HeatResult<bool> {
        if let Some(err) = &self.failure {
            return Err(err.clone());
        }
        if self.phase == StepperPhase::Completed {
            return Ok(false);
        }

        let l = self.cursor;
        let n = self.grid.interior_count();
        let v = DVector::from_column_slice(self.buffer.interior(l));
        let b = self.matrices.rhs(&v);
        let x = match self.solver.solve(&b) {
            Ok(x) => x,
            Err(source) => {
                let err = HeatError::LinearSolve {
                    step: l,
                    source: Box::new(source),
                };
                self.phase = StepperPhase::Failed;
                self.failure = Some(err.clone());
                return Err(err);
            }
        };

        let next = self.buffer.snapshot_mut(l + 1);
        next[0] = self.boundary.left();
        for i in 0..n {
            next[1 + i] = x[i];
        }
        next[n + 1] = self.boundary.right();

        self.cursor += 1;
        self.phase = if self.cursor == self.grid.step_count() {
            StepperPhase::Completed
        } else {
            StepperPhase::Running
        };
        Ok(true)
    }

    /// Drives `advance` until the run completes or a step fails.
    pub fn run(&mut self) -> HeatResult<()> {
        while self.advance()? {}
        Ok(())
    }

    /// Surrenders the field history. Only legal once the run is `Completed`.
    pub fn into_field_buffer(self) -> HeatResult<FieldBuffer> {
        if self.phase != StepperPhase::Completed {
            return Err(HeatError::RunNotCompleted {
                phase: self.phase.name(),
            });
        }
        Ok(self.buffer)
    }
}
