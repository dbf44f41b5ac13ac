//! Scalar root finding: bracketing scan and bisection.
//!
//! Every solver loop in the engine is bounded by [`SolverConfig`] and reports
//! exhaustion as [`ApError::ConvergenceError`] instead of looping forever.

use crate::error::{ApError, ApResult};

/// Iteration budget and tolerances shared by the scalar solvers.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SolverConfig {
    /// Maximum iterations
    pub max_iterations: usize,
    /// Absolute tolerance on the bracket width
    pub abs_tol: f64,
    /// Relative tolerance on the bracket width
    pub rel_tol: f64,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 200,
            abs_tol: 1e-12,
            rel_tol: 1e-10,
        }
    }
}

impl SolverConfig {
    fn converged(&self, lo: f64, hi: f64) -> bool {
        let width = (hi - lo).abs();
        width <= self.abs_tol || width <= self.rel_tol * lo.abs().max(hi.abs())
    }
}

/// Root-finding result.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RootResult {
    pub x: f64,
    /// |f(x)| at the returned root
    pub residual: f64,
    pub iterations: usize,
}

/// Bisection on `[lo, hi]`. `f(lo)` and `f(hi)` must differ in sign.
pub fn bisect<F>(
    what: &'static str,
    f: F,
    mut lo: f64,
    mut hi: f64,
    config: &SolverConfig,
) -> ApResult<RootResult>
where
    F: Fn(f64) -> ApResult<f64>,
{
    if !(lo.is_finite() && hi.is_finite()) || lo >= hi {
        return Err(ApError::invalid_range(format!(
            "{what}: bracket [{lo}, {hi}] is not a valid interval"
        )));
    }

    let mut f_lo = f(lo)?;
    let f_hi = f(hi)?;
    if f_lo == 0.0 {
        return Ok(RootResult {
            x: lo,
            residual: 0.0,
            iterations: 0,
        });
    }
    if f_hi == 0.0 {
        return Ok(RootResult {
            x: hi,
            residual: 0.0,
            iterations: 0,
        });
    }
    if f_lo.signum() == f_hi.signum() {
        return Err(ApError::DomainError {
            what: format!("{what}: no sign change on [{lo}, {hi}]"),
        });
    }

    for iter in 1..=config.max_iterations {
        let mid = 0.5 * (lo + hi);
        let f_mid = f(mid)?;
        if f_mid == 0.0 || config.converged(lo, hi) {
            return Ok(RootResult {
                x: mid,
                residual: f_mid.abs(),
                iterations: iter,
            });
        }
        if f_mid.signum() == f_lo.signum() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    let mid = 0.5 * (lo + hi);
    Err(ApError::ConvergenceError {
        what,
        iterations: config.max_iterations,
        residual: f(mid).map(f64::abs).unwrap_or(f64::NAN),
    })
}

/// Scan `samples` for the first pair of consecutive values where `f` changes
/// sign. Points where `f` fails are skipped.
pub fn scan_bracket<F>(f: F, samples: &[f64]) -> Option<(f64, f64)>
where
    F: Fn(f64) -> ApResult<f64>,
{
    let mut prev: Option<(f64, f64)> = None;
    for &x in samples {
        let Ok(fx) = f(x) else {
            prev = None;
            continue;
        };
        if !fx.is_finite() {
            prev = None;
            continue;
        }
        if fx == 0.0 {
            return Some((x, x));
        }
        if let Some((x_prev, f_prev)) = prev {
            if f_prev.signum() != fx.signum() {
                return Some((x_prev, x));
            }
        }
        prev = Some((x, fx));
    }
    None
}

/// Bracket scan followed by bisection inside the first bracket found.
pub fn find_root<F>(
    what: &'static str,
    f: F,
    samples: &[f64],
    config: &SolverConfig,
) -> ApResult<RootResult>
where
    F: Fn(f64) -> ApResult<f64>,
{
    match scan_bracket(&f, samples) {
        Some((lo, hi)) if lo == hi => Ok(RootResult {
            x: lo,
            residual: 0.0,
            iterations: 0,
        }),
        Some((lo, hi)) => bisect(what, &f, lo, hi, config),
        None => Err(ApError::DomainError {
            what: format!("{what}: no root inside the search range"),
        }),
    }
}
