//! Molecular properties of an adsorbate.

use std::fmt;

use ap_core::{ApError, ApResult};

/// One named molecular property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    /// Molar mass [g/mol]
    MolarMass,
    /// Critical pressure [MPa]
    CriticalPressure,
    /// Critical temperature [K]
    CriticalTemperature,
    /// Normal boiling temperature [K]
    BoilingTemperature,
    /// Triple-point temperature [K]
    TriplePointTemperature,
    /// Liquid density at the boiling point [kg/m³]
    BoilingDensity,
    /// Acentric factor [-]
    AcentricFactor,
    /// PRSV fitting parameters [-]
    Kappa1,
    Kappa2,
    Kappa3,
}

impl Property {
    pub const ALL: [Property; 10] = [
        Self::MolarMass,
        Self::CriticalPressure,
        Self::CriticalTemperature,
        Self::BoilingTemperature,
        Self::TriplePointTemperature,
        Self::BoilingDensity,
        Self::AcentricFactor,
        Self::Kappa1,
        Self::Kappa2,
        Self::Kappa3,
    ];

    /// snake_case name, used in error messages and JSON files.
    pub fn name(self) -> &'static str {
        match self {
            Self::MolarMass => "molar_mass",
            Self::CriticalPressure => "critical_pressure",
            Self::CriticalTemperature => "critical_temperature",
            Self::BoilingTemperature => "boiling_temperature",
            Self::TriplePointTemperature => "triple_point_temperature",
            Self::BoilingDensity => "boiling_density",
            Self::AcentricFactor => "acentric_factor",
            Self::Kappa1 => "kappa1",
            Self::Kappa2 => "kappa2",
            Self::Kappa3 => "kappa3",
        }
    }

    /// Key used in key/value properties files.
    pub fn file_key(self) -> &'static str {
        match self {
            Self::MolarMass => "MOLECULAR_MASS",
            Self::CriticalPressure => "PRESSURE_CRITICAL",
            Self::CriticalTemperature => "TEMPERATURE_CRITICAL",
            Self::BoilingTemperature => "TEMPERATURE_BOILING",
            Self::TriplePointTemperature => "TEMPERATURE_TRIPLE_POINT",
            Self::BoilingDensity => "DENSITY_BOILING",
            Self::AcentricFactor => "ACENTRIC_FACTOR",
            Self::Kappa1 => "PRSV_KAPPA1",
            Self::Kappa2 => "PRSV_KAPPA2",
            Self::Kappa3 => "PRSV_KAPPA3",
        }
    }

    pub fn from_file_key(key: &str) -> Option<Self> {
        let key = key.trim().to_ascii_uppercase();
        Self::ALL.into_iter().find(|p| p.file_key() == key)
    }
}

impl fmt::Display for Property {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Molecular properties in base units.
///
/// Every field is optional; models that need a missing value fail with
/// [`ApError::MissingProperty`] when they are resolved.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MolecularProperties {
    pub name: Option<String>,
    pub molar_mass: Option<f64>,
    pub critical_pressure: Option<f64>,
    pub critical_temperature: Option<f64>,
    pub boiling_temperature: Option<f64>,
    pub triple_point_temperature: Option<f64>,
    pub boiling_density: Option<f64>,
    pub acentric_factor: Option<f64>,
    pub kappa1: Option<f64>,
    pub kappa2: Option<f64>,
    pub kappa3: Option<f64>,
}

impl MolecularProperties {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, property: Property) -> Option<f64> {
        match property {
            Property::MolarMass => self.molar_mass,
            Property::CriticalPressure => self.critical_pressure,
            Property::CriticalTemperature => self.critical_temperature,
            Property::BoilingTemperature => self.boiling_temperature,
            Property::TriplePointTemperature => self.triple_point_temperature,
            Property::BoilingDensity => self.boiling_density,
            Property::AcentricFactor => self.acentric_factor,
            Property::Kappa1 => self.kappa1,
            Property::Kappa2 => self.kappa2,
            Property::Kappa3 => self.kappa3,
        }
    }

    pub fn set(&mut self, property: Property, value: f64) {
        let slot = match property {
            Property::MolarMass => &mut self.molar_mass,
            Property::CriticalPressure => &mut self.critical_pressure,
            Property::CriticalTemperature => &mut self.critical_temperature,
            Property::BoilingTemperature => &mut self.boiling_temperature,
            Property::TriplePointTemperature => &mut self.triple_point_temperature,
            Property::BoilingDensity => &mut self.boiling_density,
            Property::AcentricFactor => &mut self.acentric_factor,
            Property::Kappa1 => &mut self.kappa1,
            Property::Kappa2 => &mut self.kappa2,
            Property::Kappa3 => &mut self.kappa3,
        };
        *slot = Some(value);
    }

    /// Builder-style setter.
    pub fn with(mut self, property: Property, value: f64) -> Self {
        self.set(property, value);
        self
    }

    /// Value of `property`, or `MissingProperty`.
    pub fn require(&self, property: Property) -> ApResult<f64> {
        self.get(property).ok_or(ApError::MissingProperty {
            property: property.name(),
        })
    }

    /// Like [`require`](Self::require) but also rejects non-positive values.
    pub fn require_positive(&self, property: Property) -> ApResult<f64> {
        let value = self.require(property)?;
        if value <= 0.0 || !value.is_finite() {
            return Err(ApError::domain(format!(
                "{property} must be positive, got {value}"
            )));
        }
        Ok(value)
    }
}
