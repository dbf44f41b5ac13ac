//! Isosteric adsorption enthalpy from the characteristic curve.
//!
//! ```text
//! ΔH_ads = ΔH_vap + A - T·α·V·(dA/dV)
//! ΔH_vap = R·T²·d(ln p₀)/dT
//! ```
//!
//! All enthalpies in kJ/mol, reported as positive heat released.

use ap_adsorbate::PropertyCorrelation;
use ap_core::ApResult;
use ap_core::constants::GAS_CONSTANT_KJ;
use ap_curve::{CharacteristicCurve, loading_from_volume};

/// Enthalpy of vaporization [kJ/mol] at `t` by Clausius-Clapeyron on p₀(T).
pub fn vaporization_enthalpy(saturation_pressure: &dyn PropertyCorrelation, t: f64) -> ApResult<f64> {
    let h = 1e-3 * t;
    let hi = saturation_pressure.value_at(t + h)?.ln();
    let lo = saturation_pressure.value_at(t - h)?.ln();
    Ok(GAS_CONSTANT_KJ * t * t * (hi - lo) / (2.0 * h))
}

/// Derivative of `ys` with respect to `xs`, second order on uneven spacing,
/// one-sided at the ends.
fn gradient(xs: &[f64], ys: &[f64]) -> Vec<f64> {
    let n = xs.len();
    (0..n)
        .map(|i| {
            if i == 0 {
                (ys[1] - ys[0]) / (xs[1] - xs[0])
            } else if i == n - 1 {
                (ys[n - 1] - ys[n - 2]) / (xs[n - 1] - xs[n - 2])
            } else {
                let hl = xs[i] - xs[i - 1];
                let hr = xs[i + 1] - xs[i];
                (hl * hl * ys[i + 1] - hr * hr * ys[i - 1] + (hr * hr - hl * hl) * ys[i])
                    / (hl * hr * (hl + hr))
            }
        })
        .collect()
}

/// `(loading [mg/g], ΔH_ads [kJ/mol])` at every curve point, ascending in
/// loading. Points with a non-finite slope (repeated volumes) are skipped.
pub fn adsorption_enthalpy(
    curve: &CharacteristicCurve,
    t: f64,
    saturation_pressure: &dyn PropertyCorrelation,
    density: &dyn PropertyCorrelation,
    expansion: f64,
) -> ApResult<Vec<(f64, f64)>> {
    let h_vap = vaporization_enthalpy(saturation_pressure, t)?;
    let rho = density.value_at(t)?;

    let potentials: Vec<f64> = curve.points().iter().map(|p| p.potential).collect();
    let volumes: Vec<f64> = curve.points().iter().map(|p| p.volume).collect();
    let slopes = gradient(&volumes, &potentials);

    let mut points: Vec<(f64, f64)> = potentials
        .iter()
        .zip(&volumes)
        .zip(&slopes)
        .filter(|(_, slope)| slope.is_finite())
        .map(|((a, v), slope)| {
            let entropic = t * expansion * v * slope;
            (loading_from_volume(*v, rho), h_vap + a - entropic)
        })
        .collect();
    points.sort_by(|a, b| a.0.total_cmp(&b.0));
    Ok(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_adsorbate::{DensityModel, MolecularProperties, Property, SaturationModel};
    use ap_curve::CharacteristicPoint;

    #[test]
    fn clausius_clapeyron_on_exponential_vapor_pressure() {
        // Widom-Banuti: ln p₀ = ln Pc + A_s (T/Tc - 1), so d ln p₀/dT = A_s/Tc
        let props = MolecularProperties::new("x")
            .with(Property::CriticalPressure, 5.0)
            .with(Property::CriticalTemperature, 200.0);
        let p0 = SaturationModel::WidomBanuti { slope: 5.589 }.resolve(&props).unwrap();
        let t = 180.0;
        let expected = GAS_CONSTANT_KJ * t * t * 5.589 / 200.0;
        assert!((vaporization_enthalpy(&p0, t).unwrap() - expected).abs() < 1e-6);
    }

    #[test]
    fn gradient_is_exact_for_quadratics() {
        let xs = [0.0, 0.5, 1.5, 3.0];
        let ys: Vec<f64> = xs.iter().map(|x| x * x).collect();
        let g = gradient(&xs, &ys);
        assert!((g[1] - 1.0).abs() < 1e-12);
        assert!((g[2] - 3.0).abs() < 1e-12);
    }

    #[test]
    fn enthalpy_exceeds_vaporization_on_falling_curve() {
        let props = MolecularProperties::default();
        let p0 = SaturationModel::Constant { value: 1.0 }.resolve(&props).unwrap();
        let rho = DensityModel::Constant { value: 1000.0 }.resolve(&props).unwrap();
        let curve = CharacteristicCurve::new(vec![
            CharacteristicPoint::new(1.0, 0.3),
            CharacteristicPoint::new(5.0, 0.2),
            CharacteristicPoint::new(12.0, 0.1),
            CharacteristicPoint::new(14.0, 0.1),
        ])
        .unwrap();
        let points = adsorption_enthalpy(&curve, 300.0, &p0, &rho, 0.00165).unwrap();
        // constant p₀ has zero vaporization enthalpy; the repeated volume at the
        // end gives infinite slopes on its two points, which are skipped
        assert_eq!(points.len(), 2);
        assert!(points.windows(2).all(|w| w[0].0 < w[1].0));
        assert!(points.iter().all(|(_, h)| *h > 0.0));
    }
}
