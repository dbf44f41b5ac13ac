//! Peng-Robinson family cubic equations of state.
//!
//! ```text
//! a = 0.45724 R²Tc²/Pc        b = 0.07780 R Tc/Pc
//! A = a α p/(RT)²             B = b p/(RT)
//! Z³ + (B-1)Z² + (A-3B²-2B)Z + (B³+B²-AB) = 0
//! ```
//!
//! Pressures in MPa, temperatures in K, molar volumes in cm³/mol.

use std::f64::consts::{PI, SQRT_2};

use ap_core::constants::GAS_CONSTANT_CM3_MPA as R;
use ap_core::{ApError, ApResult};

use crate::properties::{MolecularProperties, Property};

/// Temperature dependence of the attraction term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AlphaFunction {
    /// Original Peng-Robinson κ(ω)
    PengRobinson,
    /// Stryjek-Vera with one fitted parameter
    Prsv1 { kappa1: f64 },
    /// Stryjek-Vera with three fitted parameters
    Prsv2 { kappa1: f64, kappa2: f64, kappa3: f64 },
}

/// A pure-component cubic equation of state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicEos {
    pub critical_temperature: f64,
    pub critical_pressure: f64,
    pub acentric_factor: f64,
    pub alpha: AlphaFunction,
}

/// Iteration budget for the saturation-pressure solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EosSolverConfig {
    pub max_iterations: usize,
    /// Convergence threshold on |ln φ_L - ln φ_V|
    pub tolerance: f64,
}

impl Default for EosSolverConfig {
    fn default() -> Self {
        Self {
            max_iterations: 500,
            tolerance: 1e-10,
        }
    }
}

/// Compressibility factor of the PR critical point.
pub const CRITICAL_COMPRESSIBILITY: f64 = 0.307_4;

impl CubicEos {
    /// Resolve the required critical constants (and κ parameters) from `props`.
    pub fn from_properties(props: &MolecularProperties, alpha: AlphaKind) -> ApResult<Self> {
        let critical_temperature = props.require_positive(Property::CriticalTemperature)?;
        let critical_pressure = props.require_positive(Property::CriticalPressure)?;
        let acentric_factor = props.require(Property::AcentricFactor)?;
        let alpha = match alpha {
            AlphaKind::PengRobinson => AlphaFunction::PengRobinson,
            AlphaKind::Prsv1 => AlphaFunction::Prsv1 {
                kappa1: props.require(Property::Kappa1)?,
            },
            AlphaKind::Prsv2 => AlphaFunction::Prsv2 {
                kappa1: props.require(Property::Kappa1)?,
                kappa2: props.require(Property::Kappa2)?,
                kappa3: props.require(Property::Kappa3)?,
            },
        };
        Ok(Self {
            critical_temperature,
            critical_pressure,
            acentric_factor,
            alpha,
        })
    }

    fn a(&self) -> f64 {
        0.457_24 * (R * self.critical_temperature).powi(2) / self.critical_pressure
    }

    fn b(&self) -> f64 {
        0.077_80 * R * self.critical_temperature / self.critical_pressure
    }

    fn kappa(&self, tr: f64) -> f64 {
        let w = self.acentric_factor;
        let kappa0 = 0.378_893 + 1.489_715_3 * w - 0.171_318_48 * w * w + 0.019_655_4 * w.powi(3);
        match self.alpha {
            AlphaFunction::PengRobinson => 0.374_64 + 1.542_26 * w - 0.269_92 * w * w,
            AlphaFunction::Prsv1 { kappa1 } => {
                if tr <= 0.7 {
                    kappa0 + kappa1 * (1.0 + tr.sqrt()) * (0.7 - tr)
                } else {
                    kappa0
                }
            }
            AlphaFunction::Prsv2 {
                kappa1,
                kappa2,
                kappa3,
            } => {
                kappa0
                    + (kappa1 + kappa2 * (kappa3 - tr) * (1.0 - tr.sqrt()))
                        * (1.0 + tr.sqrt())
                        * (0.7 - tr)
            }
        }
    }

    pub fn alpha(&self, t: f64) -> f64 {
        let tr = t / self.critical_temperature;
        (1.0 + self.kappa(tr) * (1.0 - tr.sqrt())).powi(2)
    }

    /// Dimensionless `(A, B)` at `(t, p)`.
    pub fn coefficients(&self, t: f64, p: f64) -> (f64, f64) {
        let rt = R * t;
        let a = self.a() * self.alpha(t) * p / (rt * rt);
        let b = self.b() * p / rt;
        (a, b)
    }

    /// Pressure at temperature `t` and molar volume `v`.
    pub fn pressure(&self, t: f64, v: f64) -> ApResult<f64> {
        let b = self.b();
        if v <= b {
            return Err(ApError::domain(format!(
                "molar volume {v} is below the co-volume {b}"
            )));
        }
        let attraction = self.a() * self.alpha(t) / (v * v + 2.0 * b * v - b * b);
        Ok(R * t / (v - b) - attraction)
    }

    /// Molar volume of the PR critical point [cm³/mol].
    pub fn critical_volume(&self) -> f64 {
        CRITICAL_COMPRESSIBILITY * R * self.critical_temperature / self.critical_pressure
    }

    /// Physical compressibility roots (Z > B), ascending.
    pub fn compressibility_roots(&self, t: f64, p: f64) -> Vec<f64> {
        let (a, b) = self.coefficients(t, p);
        let mut roots = cubic_roots(b - 1.0, a - 3.0 * b * b - 2.0 * b, b.powi(3) + b * b - a * b);
        roots.retain(|z| *z > b);
        roots
    }

    /// Saturation pressure at `t` by successive substitution on the fugacity ratio.
    ///
    /// Starts from the Wilson/Edmister estimate and iterates `p ← p·φ_L/φ_V`.
    /// When only one physical root exists the pressure is pushed back toward
    /// the two-phase region.
    pub fn saturation_pressure(&self, t: f64, config: &EosSolverConfig) -> ApResult<f64> {
        let tc = self.critical_temperature;
        if t.is_nan() || t <= 0.0 || t >= tc {
            return Err(ApError::OutOfRange {
                what: "EOS saturation temperature",
                value: t,
                min: 0.0,
                max: tc,
            });
        }

        let mut p = self.critical_pressure
            * 10f64.powf(7.0 / 3.0 * (1.0 + self.acentric_factor) * (1.0 - tc / t));
        let mut residual = f64::INFINITY;

        for iter in 0..config.max_iterations {
            let roots = self.compressibility_roots(t, p);
            let (z_l, z_v) = match roots.as_slice() {
                [] => {
                    p *= 0.5;
                    continue;
                }
                [z] => {
                    // single phase: liquid-like roots mean p is too high
                    if *z < CRITICAL_COMPRESSIBILITY {
                        p *= 0.8;
                    } else {
                        p *= 1.25;
                    }
                    continue;
                }
                [first, .., last] => (*first, *last),
            };

            let (a, b) = self.coefficients(t, p);
            let ln_phi_l = ln_fugacity_coefficient(z_l, a, b);
            let ln_phi_v = ln_fugacity_coefficient(z_v, a, b);
            residual = (ln_phi_l - ln_phi_v).abs();

            if residual < config.tolerance {
                tracing::debug!(t, p, iterations = iter, "EOS saturation pressure converged");
                return Ok(p);
            }
            if (z_v - z_l).abs() < 1e-9 {
                // both roots collapsed onto one branch
                p *= if z_l < CRITICAL_COMPRESSIBILITY { 0.8 } else { 1.25 };
                continue;
            }
            p *= (ln_phi_l - ln_phi_v).exp();
            if !p.is_finite() || p <= 0.0 {
                break;
            }
        }

        Err(ApError::ConvergenceError {
            what: "EOS saturation pressure",
            iterations: config.max_iterations,
            residual,
        })
    }
}

/// Which alpha function to read from the molecular properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlphaKind {
    PengRobinson,
    Prsv1,
    Prsv2,
}

/// ln φ for the PR family.
pub fn ln_fugacity_coefficient(z: f64, a: f64, b: f64) -> f64 {
    let ratio = (z + (1.0 + SQRT_2) * b) / (z + (1.0 - SQRT_2) * b);
    z - 1.0 - (z - b).ln() - a / (2.0 * SQRT_2 * b) * ratio.ln()
}

/// Real roots of `z³ + c2 z² + c1 z + c0`, ascending.
pub fn cubic_roots(c2: f64, c1: f64, c0: f64) -> Vec<f64> {
    let q = (3.0 * c1 - c2 * c2) / 9.0;
    let r = (9.0 * c2 * c1 - 27.0 * c0 - 2.0 * c2.powi(3)) / 54.0;
    let disc = q.powi(3) + r * r;
    let shift = c2 / 3.0;

    if disc > 0.0 {
        let sq = disc.sqrt();
        return vec![(r + sq).cbrt() + (r - sq).cbrt() - shift];
    }
    if q >= 0.0 {
        return vec![-shift];
    }

    let rho = (-q).sqrt();
    let theta = (r / rho.powi(3)).clamp(-1.0, 1.0).acos();
    let mut roots: Vec<f64> = (0..3)
        .map(|k| 2.0 * rho * ((theta + 2.0 * PI * k as f64) / 3.0).cos() - shift)
        .collect();
    roots.sort_by(f64::total_cmp);
    roots
}
