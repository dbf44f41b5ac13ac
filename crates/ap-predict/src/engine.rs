//! Prediction engine: isotherms, isobars and isosteres from a characteristic
//! curve.
//!
//! Requested grid values outside the curve's reachable potential window
//! `[0, A_max]` are clamped to the nearest reachable value and recorded as
//! `OutOfRange`. Per-point failures are recorded and the point is skipped.

use ap_adsorbate::PropertyCorrelation;
use ap_core::constants::GAS_CONSTANT_KJ;
use ap_core::{ApError, ApResult, Diagnostics, SolverConfig, Sweep, bisect, find_root};
use ap_curve::{CurveInterpolator, loading_from_volume, pressure_at_potential};

use crate::request::{FreeVariable, PredictionKind, PredictionRequest, PredictionResult};

/// Relative slack before a grid value counts as out of range.
const CLAMP_SLACK: f64 = 1e-9;

/// Everything a prediction needs, resolved for one adsorbate.
#[derive(Clone, Copy)]
pub struct PredictionContext<'a> {
    pub curve: &'a dyn CurveInterpolator,
    pub saturation_pressure: &'a dyn PropertyCorrelation,
    pub density: &'a dyn PropertyCorrelation,
    pub solver: SolverConfig,
    /// Temperature search window [K] for isostere and isobar solves
    pub temperature_bracket: (f64, f64),
    /// Samples used to scan the bracket for a sign change
    pub bracket_samples: usize,
}

impl<'a> PredictionContext<'a> {
    pub fn new(
        curve: &'a dyn CurveInterpolator,
        saturation_pressure: &'a dyn PropertyCorrelation,
        density: &'a dyn PropertyCorrelation,
    ) -> Self {
        Self {
            curve,
            saturation_pressure,
            density,
            solver: SolverConfig::default(),
            temperature_bracket: (50.0, 1000.0),
            bracket_samples: 96,
        }
    }

    pub fn with_solver(mut self, solver: SolverConfig) -> Self {
        self.solver = solver;
        self
    }

    pub fn with_temperature_bracket(mut self, t_min: f64, t_max: f64) -> Self {
        self.temperature_bracket = (t_min, t_max);
        self
    }

    pub fn max_potential(&self) -> f64 {
        self.curve.potential_bounds().1
    }

    /// Potential at (T, p), clamped into `[0, A_max]`.
    fn potential(&self, t: f64, p0: f64, p: f64) -> f64 {
        (GAS_CONSTANT_KJ * t * (p0 / p).ln()).clamp(0.0, self.max_potential())
    }

    /// Predicted loading [mg/g] at temperature `t` [K] and pressure `p` [MPa].
    ///
    /// Pressures at or above saturation give the saturated loading; pressures
    /// below the curve's reach give the loading at `A_max`.
    pub fn loading_at(&self, t: f64, p: f64) -> ApResult<f64> {
        if p.is_nan() || p <= 0.0 {
            return Err(ApError::domain(format!("pressure must be positive, got {p}")));
        }
        let p0 = self.saturation_pressure.value_at(t)?;
        let rho = self.density.value_at(t)?;
        let a = self.potential(t, p0, p);
        Ok(loading_from_volume(self.curve.volume_at(a), rho))
    }
}

/// Run one prediction request.
///
/// Fails only for request-level problems (bad range, fixed condition that
/// cannot be evaluated). Points that fail are recorded in `diags` and
/// skipped; the result may therefore be shorter than the grid.
pub fn predict(
    request: &PredictionRequest,
    ctx: &PredictionContext<'_>,
    diags: &mut Diagnostics,
) -> ApResult<PredictionResult> {
    let grid = request.range.values()?;
    let scope = format!("prediction {}", request.name);

    let mut points = match request.kind {
        PredictionKind::Isotherm { temperature } => {
            isotherm(ctx, temperature, &grid, diags, &scope)?
        }
        PredictionKind::Isobar { pressure } => isobar(ctx, pressure, &grid, diags, &scope)?,
        PredictionKind::Isostere {
            loading,
            free: FreeVariable::Temperature,
        } => isostere_over_temperature(ctx, loading, &grid, diags, &scope)?,
        PredictionKind::Isostere {
            loading,
            free: FreeVariable::Pressure,
        } => isostere_over_pressure(ctx, loading, &grid, diags, &scope)?,
    };

    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    // clamping can map several grid values onto one boundary point
    points.dedup_by(|later, first| later.0 == first.0);

    tracing::info!(
        prediction = %request.name,
        kind = %request.kind,
        requested = grid.len(),
        produced = points.len(),
        "prediction finished"
    );
    Ok(PredictionResult {
        name: request.name.clone(),
        kind: request.kind,
        points,
    })
}

fn clamp_recorded(
    value: f64,
    min: f64,
    max: f64,
    what: &'static str,
    scope: &str,
    diags: &mut Diagnostics,
) -> f64 {
    let out_of_range = value < min * (1.0 - CLAMP_SLACK) || value > max * (1.0 + CLAMP_SLACK);
    if out_of_range {
        diags.push(
            scope,
            ApError::OutOfRange {
                what,
                value,
                min,
                max,
            },
        );
    }
    value.clamp(min, max)
}

fn isotherm(
    ctx: &PredictionContext<'_>,
    t: f64,
    grid: &[f64],
    diags: &mut Diagnostics,
    scope: &str,
) -> ApResult<Vec<(f64, f64)>> {
    ap_core::ensure_positive(t, "isotherm temperature")?;
    let p0 = ctx.saturation_pressure.evaluate(t, diags, scope)?;
    let rho = ctx.density.evaluate(t, diags, scope)?;
    let p_min = pressure_at_potential(ctx.max_potential(), p0, t);

    let points = grid
        .iter()
        .map(|&p| {
            let p = clamp_recorded(p, p_min, p0, "isotherm pressure", scope, diags);
            let a = ctx.potential(t, p0, p);
            (p, loading_from_volume(ctx.curve.volume_at(a), rho))
        })
        .collect();
    Ok(points)
}

fn isobar(
    ctx: &PredictionContext<'_>,
    p: f64,
    grid: &[f64],
    diags: &mut Diagnostics,
    scope: &str,
) -> ApResult<Vec<(f64, f64)>> {
    ap_core::ensure_positive(p, "isobar pressure")?;
    let a_max = ctx.max_potential();
    let unclamped = |t: f64| -> ApResult<f64> {
        let p0 = ctx.saturation_pressure.value_at(t)?;
        Ok(GAS_CONSTANT_KJ * t * (p0 / p).ln())
    };

    // reachable window: A(T) = 0 (saturation) up to A(T) = A_max
    let (t_lo, t_hi) = (grid[0], grid[grid.len() - 1]);
    let samples = if t_lo < t_hi {
        Sweep::linear(t_lo, t_hi, ctx.bracket_samples.max(2))?.generate_points()
    } else {
        Vec::new()
    };
    let t_saturation = find_root("isobar saturation temperature", &unclamped, &samples, &ctx.solver)
        .ok()
        .map(|r| r.x);
    let t_limit = find_root(
        "isobar limiting temperature",
        |t| -> ApResult<f64> { Ok(unclamped(t)? - a_max) },
        &samples,
        &ctx.solver,
    )
    .ok()
    .map(|r| r.x);
    let window = (t_saturation.unwrap_or(t_lo), t_limit.unwrap_or(t_hi));

    let mut points = Vec::with_capacity(grid.len());
    for &t in grid {
        let point = ctx.saturation_pressure.evaluate(t, diags, scope).and_then(|p0| {
            let a = GAS_CONSTANT_KJ * t * (p0 / p).ln();
            let (t, a) = if a < 0.0 || a > a_max {
                diags.push(
                    scope,
                    ApError::OutOfRange {
                        what: "isobar temperature",
                        value: t,
                        min: window.0.min(window.1),
                        max: window.0.max(window.1),
                    },
                );
                let boundary = if a < 0.0 { t_saturation } else { t_limit };
                (boundary.unwrap_or(t), a.clamp(0.0, a_max))
            } else {
                (t, a)
            };
            let rho = ctx.density.evaluate(t, diags, scope)?;
            Ok((t, loading_from_volume(ctx.curve.volume_at(a), rho)))
        });
        match point {
            Ok(point) => points.push(point),
            Err(err) => diags.push(format!("{scope} at T = {t}"), err),
        }
    }
    Ok(points)
}

fn isostere_over_temperature(
    ctx: &PredictionContext<'_>,
    loading: f64,
    grid: &[f64],
    diags: &mut Diagnostics,
    scope: &str,
) -> ApResult<Vec<(f64, f64)>> {
    ap_core::ensure_positive(loading, "isostere loading")?;
    let mut points = Vec::with_capacity(grid.len());
    for &t in grid {
        match isostere_point(ctx, loading, t, diags, scope) {
            Ok(point) => points.push(point),
            Err(err) => diags.push(format!("{scope} at T = {t}"), err),
        }
    }
    Ok(points)
}

/// Pressure at which `loading` is reached at temperature `t`.
fn isostere_point(
    ctx: &PredictionContext<'_>,
    loading: f64,
    t: f64,
    diags: &mut Diagnostics,
    scope: &str,
) -> ApResult<(f64, f64)> {
    let p0 = ctx.saturation_pressure.evaluate(t, diags, scope)?;
    let rho = ctx.density.evaluate(t, diags, scope)?;
    let a_max = ctx.max_potential();
    let residual =
        |a: f64| -> ApResult<f64> { Ok(loading_from_volume(ctx.curve.volume_at(a), rho) - loading) };

    let a = match bisect("isostere potential", residual, 0.0, a_max, &ctx.solver) {
        Ok(root) => root.x,
        Err(ApError::DomainError { .. }) => {
            // loading outside the curve's reach at this temperature
            let q_sat = loading_from_volume(ctx.curve.volume_at(0.0), rho);
            let q_min = loading_from_volume(ctx.curve.volume_at(a_max), rho);
            diags.push(
                format!("{scope} at T = {t}"),
                ApError::OutOfRange {
                    what: "isostere loading",
                    value: loading,
                    min: q_min.min(q_sat),
                    max: q_min.max(q_sat),
                },
            );
            ctx.curve.potential_at(loading / rho).clamp(0.0, a_max)
        }
        Err(err) => return Err(err),
    };
    Ok((t, pressure_at_potential(a, p0, t)))
}

fn isostere_over_pressure(
    ctx: &PredictionContext<'_>,
    loading: f64,
    grid: &[f64],
    diags: &mut Diagnostics,
    scope: &str,
) -> ApResult<Vec<(f64, f64)>> {
    ap_core::ensure_positive(loading, "isostere loading")?;
    let (t_min, t_max) = ctx.temperature_bracket;
    let samples = Sweep::linear(t_min, t_max, ctx.bracket_samples.max(2))?.generate_points();

    let mut points = Vec::with_capacity(grid.len());
    for &p in grid {
        let residual = |t: f64| -> ApResult<f64> { Ok(ctx.loading_at(t, p)? - loading) };
        match find_root("isostere temperature", residual, &samples, &ctx.solver) {
            Ok(root) => {
                tracing::debug!(p, t = root.x, iterations = root.iterations, "isostere point");
                // bracket samples are not recorded, only the solved temperature
                let checked = ctx
                    .saturation_pressure
                    .evaluate(root.x, diags, scope)
                    .and_then(|_| ctx.density.evaluate(root.x, diags, scope));
                match checked {
                    Ok(_) => points.push((root.x, p)),
                    Err(err) => diags.push(format!("{scope} at p = {p}"), err),
                }
            }
            Err(err) => diags.push(format!("{scope} at p = {p}"), err),
        }
    }
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::request::Range;
    use ap_adsorbate::{DensityModel, MolecularProperties, SaturationModel};
    use ap_curve::{CharacteristicCurve, CharacteristicPoint};

    fn linear_curve() -> CharacteristicCurve {
        // V falls linearly from 0.01 ml/g at A = 0 to 0 at A = 20 kJ/mol
        CharacteristicCurve::new(
            (0..=10)
                .map(|i| {
                    let a = 2.0 * i as f64;
                    CharacteristicPoint::new(a, 0.01 * (1.0 - a / 20.0))
                })
                .collect(),
        )
        .unwrap()
    }

    fn models() -> (ap_adsorbate::SaturationPressure, ap_adsorbate::AdsorbateDensity) {
        let props = MolecularProperties::default();
        (
            SaturationModel::Constant { value: 10.0 }.resolve(&props).unwrap(),
            DensityModel::Constant { value: 1000.0 }.resolve(&props).unwrap(),
        )
    }

    #[test]
    fn isotherm_range_is_clamped_to_reach() {
        let curve = linear_curve();
        let (p0, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho);
        let request = PredictionRequest::new(
            "wide",
            PredictionKind::Isotherm { temperature: 300.0 },
            Range::Explicit(vec![1e-9, 1.0, 50.0]),
        );
        let mut diags = Diagnostics::new();
        let result = predict(&request, &ctx, &mut diags).unwrap();
        assert_eq!(result.len(), 3);
        let p_min = pressure_at_potential(20.0, 10.0, 300.0);
        assert!((result.points[0].0 - p_min).abs() < 1e-15);
        assert_eq!(result.points[2], (10.0, 10.0));
        assert_eq!(diags.count_where(|e| matches!(e, ApError::OutOfRange { .. })), 2);
    }

    #[test]
    fn loading_at_saturation_is_full() {
        let curve = linear_curve();
        let (p0, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho);
        assert!((ctx.loading_at(300.0, 10.0).unwrap() - 10.0).abs() < 1e-12);
        assert!((ctx.loading_at(300.0, 20.0).unwrap() - 10.0).abs() < 1e-12);
        assert!(ctx.loading_at(300.0, 0.0).is_err());
    }

    #[test]
    fn isostere_round_trips_through_loading() {
        let curve = linear_curve();
        let (p0, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho);
        let request = PredictionRequest::new(
            "iso",
            PredictionKind::Isostere {
                loading: 4.0,
                free: FreeVariable::Temperature,
            },
            Range::Explicit(vec![280.0, 300.0, 320.0]),
        );
        let mut diags = Diagnostics::new();
        let result = predict(&request, &ctx, &mut diags).unwrap();
        assert_eq!(result.len(), 3);
        assert!(diags.is_empty());
        for (t, p) in result.points {
            assert!((ctx.loading_at(t, p).unwrap() - 4.0).abs() < 1e-6);
        }
    }

    #[test]
    fn unreachable_isostere_loading_is_clamped() {
        let curve = linear_curve();
        let (p0, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho);
        let request = PredictionRequest::new(
            "too-much",
            PredictionKind::Isostere {
                loading: 50.0,
                free: FreeVariable::Temperature,
            },
            Range::Explicit(vec![300.0]),
        );
        let mut diags = Diagnostics::new();
        let result = predict(&request, &ctx, &mut diags).unwrap();
        // clamped to saturation
        assert_eq!(result.points, vec![(300.0, 10.0)]);
        assert_eq!(diags.len(), 1);
    }

    fn subcritical_co2() -> MolecularProperties {
        MolecularProperties::new("CO2")
            .with(ap_adsorbate::Property::CriticalPressure, 7.3773)
            .with(ap_adsorbate::Property::CriticalTemperature, 304.13)
    }

    fn saturation_out_of_range(diags: &Diagnostics) -> usize {
        diags.count_where(|e| {
            matches!(
                e,
                ApError::OutOfRange {
                    what: "saturation pressure",
                    ..
                }
            )
        })
    }

    #[test]
    fn isobar_below_critical_records_saturation_validity() {
        let curve = linear_curve();
        let props = subcritical_co2();
        let p0 = SaturationModel::Dubinin.resolve(&props).unwrap();
        let (_, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho);
        let request = PredictionRequest::new(
            "below-tc",
            PredictionKind::Isobar { pressure: 1.0 },
            Range::Explicit(vec![250.0, 270.0, 290.0]),
        );
        let mut diags = Diagnostics::new();
        let result = predict(&request, &ctx, &mut diags).unwrap();
        assert_eq!(result.len(), 3);
        assert_eq!(saturation_out_of_range(&diags), 3);
    }

    #[test]
    fn isostere_over_pressure_records_saturation_validity_once_per_point() {
        let curve = linear_curve();
        let props = subcritical_co2();
        let p0 = SaturationModel::Dubinin.resolve(&props).unwrap();
        let (_, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho).with_temperature_bracket(200.0, 300.0);
        let request = PredictionRequest::new(
            "below-tc",
            PredictionKind::Isostere {
                loading: 5.0,
                free: FreeVariable::Pressure,
            },
            Range::Explicit(vec![0.05, 0.08]),
        );
        let mut diags = Diagnostics::new();
        let result = predict(&request, &ctx, &mut diags).unwrap();
        assert_eq!(result.len(), 2);
        assert_eq!(saturation_out_of_range(&diags), 2);
    }

    #[test]
    fn tiny_budget_skips_points_with_convergence_error() {
        let curve = linear_curve();
        let (p0, rho) = models();
        let ctx = PredictionContext::new(&curve, &p0, &rho).with_solver(SolverConfig {
            max_iterations: 2,
            abs_tol: 0.0,
            rel_tol: 0.0,
        });
        let request = PredictionRequest::new(
            "budget",
            PredictionKind::Isostere {
                loading: 3.3,
                free: FreeVariable::Temperature,
            },
            Range::Explicit(vec![280.0, 300.0]),
        );
        let mut diags = Diagnostics::new();
        let result = predict(&request, &ctx, &mut diags).unwrap();
        assert!(result.is_empty());
        assert_eq!(
            diags.count_where(|e| matches!(e, ApError::ConvergenceError { .. })),
            2
        );
    }
}
