//! Adsorbed-phase density estimator.

use std::fmt;

use ap_core::constants::GAS_CONSTANT_CM3_MPA;
use ap_core::{ApError, ApResult};

use crate::correlation::{PropertyCorrelation, Validity};
use crate::properties::{MolecularProperties, Property};
use crate::table::Table;

/// Default thermal expansion coefficient of the adsorbed phase [1/K].
pub const DEFAULT_EXPANSION: f64 = 0.001_65;

/// Adsorbed-phase density model selection.
#[derive(Debug, Clone, PartialEq)]
pub enum DensityModel {
    Constant { value: f64 },
    /// `ρ = 8·Pc·M/(R·Tc)`, temperature independent
    Empirical,
    /// `ρ = ρ_b·(1 - α·(T - T_b))`
    Hauer { expansion: f64 },
    /// `ρ = ρ_b·exp(-α·(T - T_b))`
    Ozawa { expansion: f64 },
    Tabulated(Table),
}

impl DensityModel {
    pub const NAMES: [&'static str; 5] = ["constant", "empirical", "hauer", "ozawa", "tabulated"];

    /// Model with default parameters for `name`.
    pub fn from_name(name: &str) -> ApResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "empirical" => Ok(Self::Empirical),
            "hauer" => Ok(Self::Hauer {
                expansion: DEFAULT_EXPANSION,
            }),
            "ozawa" => Ok(Self::Ozawa {
                expansion: DEFAULT_EXPANSION,
            }),
            _ => Err(ApError::UnsupportedModel {
                name: name.to_string(),
                family: "density",
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Constant { .. } => "constant",
            Self::Empirical => "empirical",
            Self::Hauer { .. } => "hauer",
            Self::Ozawa { .. } => "ozawa",
            Self::Tabulated(_) => "tabulated",
        }
    }

    pub fn resolve(&self, props: &MolecularProperties) -> ApResult<AdsorbateDensity> {
        AdsorbateDensity::resolve(self, props)
    }
}

impl fmt::Display for DensityModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Resolved {
    Constant(f64),
    Linear { rho_b: f64, t_b: f64, expansion: f64 },
    Exponential { rho_b: f64, t_b: f64, expansion: f64 },
    Table(Table),
}

/// Resolved adsorbed-phase density ρ(T) [kg/m³].
#[derive(Debug, Clone, PartialEq)]
pub struct AdsorbateDensity {
    name: &'static str,
    resolved: Resolved,
    validity: Validity,
}

impl AdsorbateDensity {
    pub fn resolve(model: &DensityModel, props: &MolecularProperties) -> ApResult<Self> {
        let liquid_range = Validity::new(
            props.triple_point_temperature.unwrap_or(0.0),
            props.critical_temperature.unwrap_or(f64::INFINITY),
        );
        let boiling = || -> ApResult<(f64, f64)> {
            Ok((
                props.require_positive(Property::BoilingDensity)?,
                props.require_positive(Property::BoilingTemperature)?,
            ))
        };

        let (resolved, validity) = match model {
            DensityModel::Constant { value } => (
                Resolved::Constant(ap_core::ensure_positive(*value, "constant density")?),
                Validity::UNBOUNDED,
            ),
            DensityModel::Empirical => {
                let pc = props.require_positive(Property::CriticalPressure)?;
                let tc = props.require_positive(Property::CriticalTemperature)?;
                let m = props.require_positive(Property::MolarMass)?;
                // exact R (8.314 cm³·MPa/(mol·K)), not the 8.205 often quoted with
                // this correlation, so values come out about 1.3% lower; g/cm³ -> kg/m³
                let rho = 8.0 * pc * m / (GAS_CONSTANT_CM3_MPA * tc) * 1000.0;
                (Resolved::Constant(rho), Validity::UNBOUNDED)
            }
            DensityModel::Hauer { expansion } => {
                let (rho_b, t_b) = boiling()?;
                let resolved = Resolved::Linear {
                    rho_b,
                    t_b,
                    expansion: *expansion,
                };
                (resolved, liquid_range)
            }
            DensityModel::Ozawa { expansion } => {
                let (rho_b, t_b) = boiling()?;
                let resolved = Resolved::Exponential {
                    rho_b,
                    t_b,
                    expansion: *expansion,
                };
                (resolved, liquid_range)
            }
            DensityModel::Tabulated(table) => {
                let (t_min, t_max) = table.bounds();
                (Resolved::Table(table.clone()), Validity::new(t_min, t_max))
            }
        };

        tracing::debug!(model = model.name(), %validity, "resolved density model");
        Ok(Self {
            name: model.name(),
            resolved,
            validity,
        })
    }
}

impl PropertyCorrelation for AdsorbateDensity {
    fn name(&self) -> &'static str {
        self.name
    }

    fn quantity(&self) -> &'static str {
        "adsorbate density"
    }

    fn value_at(&self, t: f64) -> ApResult<f64> {
        let rho = match &self.resolved {
            Resolved::Constant(rho) => *rho,
            Resolved::Linear {
                rho_b,
                t_b,
                expansion,
            } => rho_b * (1.0 - expansion * (t - t_b)),
            Resolved::Exponential {
                rho_b,
                t_b,
                expansion,
            } => rho_b * (-expansion * (t - t_b)).exp(),
            Resolved::Table(table) => table.eval(t),
        };
        if !rho.is_finite() || rho <= 0.0 {
            return Err(ApError::domain(format!(
                "{} density is non-positive at T = {t} ({rho})",
                self.name
            )));
        }
        Ok(rho)
    }

    fn validity(&self) -> Validity {
        self.validity
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_core::Diagnostics;

    fn co2() -> MolecularProperties {
        MolecularProperties::new("CO2")
            .with(Property::MolarMass, 44.01)
            .with(Property::CriticalPressure, 7.3773)
            .with(Property::CriticalTemperature, 304.13)
            .with(Property::BoilingTemperature, 194.7)
            .with(Property::TriplePointTemperature, 216.59)
            .with(Property::BoilingDensity, 1178.4)
    }

    #[test]
    fn empirical_density() {
        let rho = DensityModel::Empirical.resolve(&co2()).unwrap().value_at(300.0).unwrap();
        let expected = 8.0 * 7.3773 * 44.01 / (8.314_462_618 * 304.13) * 1000.0;
        assert!((rho - expected).abs() < 1e-9);
        let with_8_205 = 8.0 * 7.3773 * 44.01 / (8.205 * 304.13) * 1000.0;
        assert!((1.0 - rho / with_8_205 - 0.0132).abs() < 1e-3);
        assert!(rho > 1000.0 && rho < 1050.0);
    }

    #[test]
    fn hauer_and_ozawa_agree_at_boiling_point() {
        let props = co2();
        let hauer = DensityModel::from_name("hauer").unwrap().resolve(&props).unwrap();
        let ozawa = DensityModel::from_name("Ozawa").unwrap().resolve(&props).unwrap();
        assert!((hauer.value_at(194.7).unwrap() - 1178.4).abs() < 1e-9);
        assert!((ozawa.value_at(194.7).unwrap() - 1178.4).abs() < 1e-9);
        // both decrease with temperature, Hauer linearly
        let h = hauer.value_at(294.7).unwrap();
        assert!((h - 1178.4 * (1.0 - 0.165)).abs() < 1e-9);
        assert!(ozawa.value_at(294.7).unwrap() > h);
    }

    #[test]
    fn hauer_goes_non_positive_at_high_temperature() {
        let hauer = DensityModel::Hauer { expansion: 0.01 }.resolve(&co2()).unwrap();
        assert!(matches!(hauer.value_at(400.0), Err(ApError::DomainError { .. })));
    }

    #[test]
    fn out_of_validity_is_recorded() {
        let ozawa = DensityModel::from_name("ozawa").unwrap().resolve(&co2()).unwrap();
        let mut diags = Diagnostics::new();
        assert!(ozawa.evaluate(350.0, &mut diags, "test").is_ok());
        assert_eq!(diags.len(), 1);
        assert!(ozawa.evaluate(250.0, &mut diags, "test").is_ok());
        assert_eq!(diags.len(), 1);
    }

    #[test]
    fn missing_boiling_density() {
        let mut props = co2();
        props.boiling_density = None;
        assert_eq!(
            DensityModel::Hauer {
                expansion: DEFAULT_EXPANSION
            }
            .resolve(&props),
            Err(ApError::MissingProperty {
                property: "boiling_density"
            })
        );
        assert!(matches!(
            DensityModel::from_name("rackett"),
            Err(ApError::UnsupportedModel { family: "density", .. })
        ));
    }
}
