//! Evenly spaced value ranges.
//!
//! Used to sample isotherm models, to build prediction ranges and to lay out
//! diagnostic curves.

use std::fmt;

use crate::error::{ApError, ApResult};

/// Type of sweep progression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum SweepType {
    /// Uniformly spaced points
    #[default]
    Linear,
    /// Logarithmically spaced points
    Logarithmic,
}

/// Inclusive range `[start, end]` sampled at `num_points` points.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Sweep {
    pub start: f64,
    pub end: f64,
    pub num_points: usize,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sweep_type: SweepType,
}

impl Sweep {
    pub fn new(start: f64, end: f64, num_points: usize, sweep_type: SweepType) -> ApResult<Self> {
        let sweep = Self {
            start,
            end,
            num_points,
            sweep_type,
        };
        sweep.validate()?;
        Ok(sweep)
    }

    pub fn linear(start: f64, end: f64, num_points: usize) -> ApResult<Self> {
        Self::new(start, end, num_points, SweepType::Linear)
    }

    pub fn logarithmic(start: f64, end: f64, num_points: usize) -> ApResult<Self> {
        Self::new(start, end, num_points, SweepType::Logarithmic)
    }

    /// Require finite ascending bounds, at least two points, and positive
    /// bounds for logarithmic spacing.
    pub fn validate(&self) -> ApResult<()> {
        if !self.start.is_finite() || !self.end.is_finite() {
            return Err(ApError::invalid_range(format!(
                "sweep bounds must be finite ({} .. {})",
                self.start, self.end
            )));
        }
        if self.start >= self.end {
            return Err(ApError::invalid_range(format!(
                "sweep start {} must be below end {}",
                self.start, self.end
            )));
        }
        if self.num_points < 2 {
            return Err(ApError::invalid_range(format!(
                "sweep needs at least 2 points, got {}",
                self.num_points
            )));
        }
        if self.sweep_type == SweepType::Logarithmic && self.start <= 0.0 {
            return Err(ApError::invalid_range(format!(
                "logarithmic sweep needs a positive start, got {}",
                self.start
            )));
        }
        Ok(())
    }

    /// Generate all points in the sweep.
    pub fn generate_points(&self) -> Vec<f64> {
        match self.sweep_type {
            SweepType::Linear => self.generate_linear(),
            SweepType::Logarithmic => self.generate_logarithmic(),
        }
    }

    fn generate_linear(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }

        let delta = (self.end - self.start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| self.start + i as f64 * delta)
            .collect();

        // Ensure exact endpoint
        points[self.num_points - 1] = self.end;
        points
    }

    fn generate_logarithmic(&self) -> Vec<f64> {
        if self.num_points <= 1 {
            return vec![self.start];
        }
        if self.start <= 0.0 || self.end <= 0.0 {
            return self.generate_linear();
        }

        let log_start = self.start.ln();
        let log_delta = (self.end.ln() - log_start) / (self.num_points - 1) as f64;
        let mut points: Vec<f64> = (0..self.num_points)
            .map(|i| (log_start + i as f64 * log_delta).exp())
            .collect();

        points[0] = self.start;
        points[self.num_points - 1] = self.end;
        points
    }
}

impl fmt::Display for SweepType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Linear => write!(f, "linear"),
            Self::Logarithmic => write!(f, "logarithmic"),
        }
    }
}

impl fmt::Display for Sweep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} .. {} ({} points, {})",
            self.start, self.end, self.num_points, self.sweep_type
        )
    }
}
