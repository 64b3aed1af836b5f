//! Entry contract: a deserializable description of one simulation run and
//! the driver that executes it end to end.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::grid::{BoundaryValues, Grid};
use crate::matrices::{BandTopology, CoefficientMatrices};
use crate::solver::{BandedThomas, DenseLu, SolverKind};
use crate::stepper::{FieldBuffer, InitialCondition, TimeStepper};
use crate::traits::LinearSolver;

/// Everything the engine needs for one run. Mirrors the parameters a CLI or
/// animation frontend would collect; the frontend itself lives elsewhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    pub interior_count: usize,
    pub space_length: f64,
    pub step_count: usize,
    pub total_time: f64,
    pub diffusion: f64,
    pub left_value: f64,
    pub right_value: f64,
    #[serde(default)]
    pub topology: BandTopology,
    #[serde(default)]
    pub solver: SolverKind,
    pub initial: InitialCondition,
}

/// Runs a configured simulation to completion and returns the field history.
///
/// Validation failures surface before any stepping starts; a failed solve
/// aborts mid-run with the offending step index attached.
pub fn simulate(config: &SimulationConfig) -> Result<FieldBuffer> {
    let grid = Grid::new(
        config.interior_count,
        config.space_length,
        config.step_count,
        config.total_time,
        config.diffusion,
    )
    .context("invalid grid specification")?;
    let boundary = BoundaryValues::new(config.left_value, config.right_value)
        .context("invalid boundary values")?;
    let matrices = CoefficientMatrices::build(&grid, config.topology)
        .context("building coefficient matrices")?;

    let kind = match (config.solver, config.topology) {
        (SolverKind::BandedThomas, BandTopology::Periodic) => {
            log::warn!(
                "banded Thomas solver cannot eliminate wrap-around corners; using dense LU"
            );
            SolverKind::DenseLu
        }
        (kind, _) => kind,
    };
    let solver: Box<dyn LinearSolver> = match kind {
        SolverKind::DenseLu => Box::new(
            DenseLu::factorize(matrices.implicit())
                .context("factorizing the implicit matrix")?,
        ),
        SolverKind::BandedThomas => Box::new(
            BandedThomas::factorize(matrices.implicit())
                .context("factorizing the implicit band")?,
        ),
    };

    let initial = config
        .initial
        .sample(&grid)
        .context("sampling the initial condition")?;

    log::info!(
        "advancing {} Crank-Nicolson steps over {} interior points (lambda = {:.6})",
        grid.step_count(),
        grid.interior_count(),
        grid.lambda()
    );
    let mut stepper = TimeStepper::new(grid, boundary, matrices, solver, initial)?;
    stepper.run().context("time stepping aborted")?;
    let buffer = stepper.into_field_buffer()?;
    log::debug!(
        "run complete: {} snapshots of {} values",
        buffer.rows(),
        buffer.cols()
    );
    Ok(buffer)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> SimulationConfig {
        SimulationConfig {
            interior_count: 9,
            space_length: 1.0,
            step_count: 12,
            total_time: 0.25,
            diffusion: 1.0,
            left_value: 0.0,
            right_value: 0.0,
            topology: BandTopology::default(),
            solver: SolverKind::default(),
            initial: InitialCondition::SineHalfWave { amplitude: 1.0 },
        }
    }

    #[test]
    fn simulate_produces_the_full_history() {
        let buffer = simulate(&base_config()).unwrap();
        assert_eq!(buffer.rows(), 13);
        assert_eq!(buffer.cols(), 11);
        // The hump diffuses outward into the cold boundaries.
        let first_peak = buffer.interior(0)[4];
        let last_peak = buffer.interior(12)[4];
        assert!(last_peak > 0.0 && last_peak < first_peak);
    }

    #[test]
    fn solver_backends_are_interchangeable() {
        let dense = simulate(&base_config()).unwrap();
        let mut config = base_config();
        config.solver = SolverKind::BandedThomas;
        let banded = simulate(&config).unwrap();
        for l in 0..dense.rows() {
            for (a, b) in dense.snapshot(l).iter().zip(banded.snapshot(l)) {
                assert!((a - b).abs() < 1e-10);
            }
        }
    }

    #[test]
    fn periodic_topology_falls_back_to_dense_lu() {
        let mut config = base_config();
        config.topology = BandTopology::Periodic;
        config.solver = SolverKind::BandedThomas;
        // Must not error: the driver swaps in the dense backend.
        let buffer = simulate(&config).unwrap();
        assert_eq!(buffer.rows(), 13);
    }

    #[test]
    fn invalid_parameters_fail_before_stepping() {
        let mut config = base_config();
        config.step_count = 0;
        assert!(simulate(&config).is_err());

        let mut config = base_config();
        config.left_value = f64::NAN;
        assert!(simulate(&config).is_err());

        let mut config = base_config();
        config.initial = InitialCondition::Interior { values: vec![1.0] };
        assert!(simulate(&config).is_err());
    }
}
