//! Characteristic curve construction.

use ap_adsorbate::PropertyCorrelation;
use ap_core::{ApError, ApResult, Diagnostics};

use crate::curve::{CharacteristicCurve, CharacteristicPoint};
use crate::dataset::{DataKind, IsothermDataset};
use crate::potential::{adsorbed_volume, adsorption_potential};

/// Temperature-dependent models used to map (T, p, q) onto (A, V).
#[derive(Debug, Clone, Copy)]
pub struct CurveModels<'a> {
    pub saturation_pressure: &'a dyn PropertyCorrelation,
    pub density: &'a dyn PropertyCorrelation,
}

/// Convert one dataset into characteristic points.
///
/// Points at or above saturation (or with non-positive pressure) are dropped
/// and recorded as `DomainError`; so are points whose p₀ or ρ cannot be
/// evaluated. Fails when every point is dropped.
pub fn build_points(
    dataset: &IsothermDataset,
    models: CurveModels<'_>,
    diags: &mut Diagnostics,
) -> ApResult<Vec<CharacteristicPoint>> {
    let mut points = Vec::with_capacity(dataset.len());

    if dataset.kind == DataKind::Characteristic {
        for (i, &(a, v)) in dataset.points.iter().enumerate() {
            if a.is_finite() && v.is_finite() && a >= 0.0 && v >= 0.0 {
                points.push(CharacteristicPoint::new(a, v));
            } else {
                diags.push(
                    format!("dataset {} point {i}", dataset.name),
                    ApError::domain(format!("characteristic point ({a}, {v}) is not physical")),
                );
            }
        }
    } else {
        // (T, p₀, ρ) of the previous point; isotherms share one temperature
        let mut cached: Option<(f64, f64, f64)> = None;

        for i in 0..dataset.len() {
            let Some(obs) = dataset.observation(i) else {
                continue;
            };
            let scope = format!("dataset {} point {i}", dataset.name);
            let t = obs.temperature;

            let (p0, rho) = match cached {
                Some((ct, p0, rho)) if ct == t => (p0, rho),
                _ => {
                    let state = models
                        .saturation_pressure
                        .evaluate(t, diags, &scope)
                        .and_then(|p0| Ok((p0, models.density.evaluate(t, diags, &scope)?)));
                    match state {
                        Ok((p0, rho)) => {
                            cached = Some((t, p0, rho));
                            (p0, rho)
                        }
                        Err(err) => {
                            diags.push(scope, err);
                            continue;
                        }
                    }
                }
            };

            match adsorption_potential(t, p0, obs.pressure) {
                Ok(a) => points.push(CharacteristicPoint::new(a, adsorbed_volume(obs.loading, rho))),
                Err(err) => diags.push(scope, err),
            }
        }
    }

    if points.is_empty() {
        return Err(ApError::domain(format!(
            "dataset {} lost all {} points during curve construction",
            dataset.name,
            dataset.len()
        )));
    }
    tracing::debug!(
        dataset = %dataset.name,
        kept = points.len(),
        dropped = dataset.len() - points.len(),
        "converted dataset to characteristic points"
    );
    Ok(points)
}

/// Build one characteristic curve from a single dataset.
pub fn build(
    dataset: &IsothermDataset,
    models: CurveModels<'_>,
    diags: &mut Diagnostics,
) -> ApResult<CharacteristicCurve> {
    let points = build_points(dataset, models, diags)?;
    finish(points, diags, &dataset.name)
}

/// Pool every dataset of one adsorbate into a single curve.
///
/// A dataset that fails is recorded and left out; the pool fails only when
/// no dataset contributes or fewer than two distinct potentials remain.
/// Each dataset comes paired with its own p₀/ρ models.
pub fn build_pooled<'a, I>(
    name: &str,
    datasets: I,
    diags: &mut Diagnostics,
) -> ApResult<CharacteristicCurve>
where
    I: IntoIterator<Item = (&'a IsothermDataset, CurveModels<'a>)>,
{
    let mut pooled = Vec::new();
    let mut last_error = None;
    for (dataset, models) in datasets {
        match build_points(dataset, models, diags) {
            Ok(points) => pooled.extend(points),
            Err(err) => {
                diags.push(format!("dataset {}", dataset.name), err.clone());
                last_error = Some(err);
            }
        }
    }
    if pooled.is_empty() {
        return Err(last_error.unwrap_or(ApError::EmptyCurve { points: 0 }));
    }
    finish(pooled, diags, name)
}

fn finish(
    points: Vec<CharacteristicPoint>,
    diags: &mut Diagnostics,
    name: &str,
) -> ApResult<CharacteristicCurve> {
    let curve = CharacteristicCurve::new(points)?;
    let violations = curve.monotonicity_violations();
    if violations > 0 {
        diags.push(
            format!("curve {name}"),
            ApError::NonMonotoneCurve { violations },
        );
    }
    tracing::info!(curve = name, points = curve.len(), "built characteristic curve");
    Ok(curve)
}
