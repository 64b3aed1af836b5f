//! Discretization parameters and fixed endpoint values.

use serde::{Deserialize, Serialize};

use crate::error::{HeatError, HeatResult};

/// Uniform space/time discretization of the rod.
///
/// The domain `[0, space_length]` carries `interior_count` unknowns plus the
/// two fixed endpoints, so `dx = space_length / (interior_count + 1)`. Time
/// is split into `step_count` equal steps of `dt = total_time / step_count`.
/// The coupling coefficient `lambda = diffusion * dt / dx^2` may be
/// arbitrarily large; the Crank-Nicolson scheme is unconditionally stable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    interior_count: usize,
    space_length: f64,
    step_count: usize,
    total_time: f64,
    diffusion: f64,
}

impl Grid {
    pub fn new(
        interior_count: usize,
        space_length: f64,
        step_count: usize,
        total_time: f64,
        diffusion: f64,
    ) -> HeatResult<Self> {
        if interior_count < 1 {
            return Err(invalid("interior_count", "must be at least 1"));
        }
        if !space_length.is_finite() || space_length <= 0.0 {
            return Err(invalid("space_length", "must be finite and positive"));
        }
        if step_count < 1 {
            return Err(invalid("step_count", "must be at least 1"));
        }
        if !total_time.is_finite() || total_time <= 0.0 {
            return Err(invalid("total_time", "must be finite and positive"));
        }
        if !diffusion.is_finite() || diffusion <= 0.0 {
            return Err(invalid("diffusion", "must be finite and positive"));
        }

        let grid = Self {
            interior_count,
            space_length,
            step_count,
            total_time,
            diffusion,
        };
        // Derived quantities can still overflow for extreme inputs.
        if !grid.lambda().is_finite() || grid.lambda() <= 0.0 {
            return Err(invalid("lambda", "derived coupling coefficient is not finite"));
        }
        Ok(grid)
    }

    pub fn interior_count(&self) -> usize {
        self.interior_count
    }

    pub fn space_length(&self) -> f64 {
        self.space_length
    }

    pub fn step_count(&self) -> usize {
        self.step_count
    }

    pub fn total_time(&self) -> f64 {
        self.total_time
    }

    pub fn diffusion(&self) -> f64 {
        self.diffusion
    }

    /// Space step between adjacent nodes, endpoints included.
    pub fn dx(&self) -> f64 {
        self.space_length / (self.interior_count + 1) as f64
    }

    /// Time step.
    pub fn dt(&self) -> f64 {
        self.total_time / self.step_count as f64
    }

    /// Dimensionless coupling coefficient `D * dt / dx^2`.
    pub fn lambda(&self) -> f64 {
        self.diffusion * self.dt() / (self.dx() * self.dx())
    }
}

/// Dirichlet values imposed at the two endpoints for all time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundaryValues {
    left: f64,
    right: f64,
}

impl BoundaryValues {
    pub fn new(left: f64, right: f64) -> HeatResult<Self> {
        if !left.is_finite() {
            return Err(HeatError::InvalidBoundary {
                side: "left",
                value: left,
            });
        }
        if !right.is_finite() {
            return Err(HeatError::InvalidBoundary {
                side: "right",
                value: right,
            });
        }
        Ok(Self { left, right })
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }
}

fn invalid(parameter: &'static str, message: &str) -> HeatError {
    HeatError::InvalidGrid {
        parameter,
        message: message.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derived_steps_match_hand_computation() {
        // 3 interior nodes on [0, 2]: dx = 2/4 = 0.5; 2 steps over t in [0, 1]: dt = 0.5.
        let grid = Grid::new(3, 2.0, 2, 1.0, 1.0).unwrap();
        assert_eq!(grid.dx(), 0.5);
        assert_eq!(grid.dt(), 0.5);
        assert_eq!(grid.lambda(), 2.0);
    }

    #[test]
    fn rejects_out_of_range_parameters() {
        assert!(matches!(
            Grid::new(0, 1.0, 1, 1.0, 1.0),
            Err(HeatError::InvalidGrid {
                parameter: "interior_count",
                ..
            })
        ));
        assert!(matches!(
            Grid::new(1, 0.0, 1, 1.0, 1.0),
            Err(HeatError::InvalidGrid {
                parameter: "space_length",
                ..
            })
        ));
        assert!(matches!(
            Grid::new(1, 1.0, 0, 1.0, 1.0),
            Err(HeatError::InvalidGrid {
                parameter: "step_count",
                ..
            })
        ));
        assert!(matches!(
            Grid::new(1, 1.0, 1, -2.0, 1.0),
            Err(HeatError::InvalidGrid {
                parameter: "total_time",
                ..
            })
        ));
        assert!(matches!(
            Grid::new(1, 1.0, 1, 1.0, f64::NAN),
            Err(HeatError::InvalidGrid {
                parameter: "diffusion",
                ..
            })
        ));
    }

    #[test]
    fn rejects_overflowing_lambda() {
        let result = Grid::new(1, f64::MIN_POSITIVE, 1, 1.0, f64::MAX);
        assert!(matches!(
            result,
            Err(HeatError::InvalidGrid {
                parameter: "lambda",
                ..
            })
        ));
    }

    #[test]
    fn boundary_values_must_be_finite() {
        assert!(BoundaryValues::new(1.0, -3.5).is_ok());
        assert!(matches!(
            BoundaryValues::new(f64::NAN, 0.0),
            Err(HeatError::InvalidBoundary { side: "left", .. })
        ));
        assert!(matches!(
            BoundaryValues::new(0.0, f64::INFINITY),
            Err(HeatError::InvalidBoundary { side: "right", .. })
        ));
    }
}
