//! Polanyi relations between pressure, potential, loading and volume.
//!
//! ```text
//! A = R·T·ln(p₀/p)          [kJ/mol]
//! V = q/ρ                   [ml/g] with q in mg/g and ρ in kg/m³ (= mg/ml)
//! ```

use ap_core::constants::GAS_CONSTANT_KJ;
use ap_core::{ApError, ApResult};

/// Adsorption potential [kJ/mol]. Requires `0 < p < p₀`.
pub fn adsorption_potential(t: f64, p0: f64, p: f64) -> ApResult<f64> {
    if p.is_nan() || p <= 0.0 || p >= p0 {
        return Err(ApError::domain(format!(
            "pressure {p} MPa must lie in (0, p0 = {p0} MPa) at T = {t} K"
        )));
    }
    Ok(GAS_CONSTANT_KJ * t * (p0 / p).ln())
}

/// Pressure [MPa] at which potential `a` is reached at temperature `t`.
pub fn pressure_at_potential(a: f64, p0: f64, t: f64) -> f64 {
    p0 * (-a / (GAS_CONSTANT_KJ * t)).exp()
}

/// Adsorbed volume [ml/g] from loading [mg/g] and density [kg/m³].
pub fn adsorbed_volume(loading: f64, density: f64) -> f64 {
    loading / density
}

/// Loading [mg/g] from adsorbed volume [ml/g] and density [kg/m³].
pub fn loading_from_volume(volume: f64, density: f64) -> f64 {
    volume * density
}
