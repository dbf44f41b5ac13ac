// ap-core/src/units.rs

//! Base units and unit conversion.
//!
//! The engine computes in six fixed base units (MPa, K, mg/g, kJ/mol, ml/g,
//! kg/m³). Every other unit is described by a `(factor, offset)` pair such that
//! `base = value * factor + offset`. Pressure, temperature and density factors
//! are taken from `uom` so they stay consistent with the SI definitions.

use std::fmt;

use uom::si::f64::{MassDensity, Pressure, ThermodynamicTemperature};
use uom::si::{mass_density, pressure, thermodynamic_temperature};

use crate::error::{ApError, ApResult};

/// Quantity family with one fixed base unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum QuantityKind {
    /// Pressure (base: MPa)
    Pressure,
    /// Temperature (base: K)
    Temperature,
    /// Specific adsorbed amount (base: mg/g)
    Loading,
    /// Adsorption potential (base: kJ/mol)
    Potential,
    /// Specific adsorbed volume (base: ml/g)
    Volume,
    /// Adsorbed-phase density (base: kg/m³)
    Density,
}

impl QuantityKind {
    pub const ALL: [QuantityKind; 6] = [
        Self::Pressure,
        Self::Temperature,
        Self::Loading,
        Self::Potential,
        Self::Volume,
        Self::Density,
    ];

    pub fn base_unit(self) -> &'static str {
        match self {
            Self::Pressure => "MPa",
            Self::Temperature => "K",
            Self::Loading => "mg/g",
            Self::Potential => "kJ/mol",
            Self::Volume => "ml/g",
            Self::Density => "kg/m3",
        }
    }

    /// Units accepted by [`convert`] for this quantity.
    ///
    /// Molar loading units are listed separately in [`MOLAR_LOADING_UNITS`].
    pub fn supported_units(self) -> &'static [&'static str] {
        match self {
            Self::Pressure => &["MPa", "kPa", "Pa", "bar", "mbar", "atm", "torr", "psia"],
            Self::Temperature => &["K", "C", "F", "R"],
            Self::Loading => &["mg/g", "g/kg", "g/g", "kg/kg"],
            Self::Potential => &["kJ/mol", "J/mol", "kcal/mol", "cal/mol"],
            Self::Volume => &["ml/g", "cm3/g", "l/kg", "dm3/kg", "m3/kg"],
            Self::Density => &["kg/m3", "g/cm3", "g/ml", "g/l", "lb/ft3"],
        }
    }
}

impl fmt::Display for QuantityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pressure => write!(f, "pressure"),
            Self::Temperature => write!(f, "temperature"),
            Self::Loading => write!(f, "loading"),
            Self::Potential => write!(f, "potential"),
            Self::Volume => write!(f, "volume"),
            Self::Density => write!(f, "density"),
        }
    }
}

/// Loading units that need the adsorbate molar mass.
pub const MOLAR_LOADING_UNITS: [&str; 3] = ["mmol/g", "mol/kg", "mol/g"];

/// Affine map from a unit to the base unit of its quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Affine {
    factor: f64,
    offset: f64,
}

impl Affine {
    const fn scale(factor: f64) -> Self {
        Self {
            factor,
            offset: 0.0,
        }
    }

    fn to_base(self, value: f64) -> f64 {
        value * self.factor + self.offset
    }

    fn from_base(self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }
}

fn normalize(unit: &str) -> String {
    unit.trim()
        .to_lowercase()
        .replace('°', "")
        .replace('³', "3")
        .replace('^', "")
}

fn pressure_factor(unit: &str) -> Option<f64> {
    use pressure::{atmosphere, bar, kilopascal, megapascal, millibar, pascal, pound_force_per_square_inch, torr};
    let one = match unit {
        "mpa" => Pressure::new::<megapascal>(1.0),
        "kpa" => Pressure::new::<kilopascal>(1.0),
        "pa" => Pressure::new::<pascal>(1.0),
        "bar" => Pressure::new::<bar>(1.0),
        "mbar" => Pressure::new::<millibar>(1.0),
        "atm" => Pressure::new::<atmosphere>(1.0),
        "torr" => Pressure::new::<torr>(1.0),
        "psia" => Pressure::new::<pound_force_per_square_inch>(1.0),
        _ => return None,
    };
    Some(one.get::<megapascal>())
}

fn temperature_affine(unit: &str) -> Option<Affine> {
    use thermodynamic_temperature::{degree_celsius, degree_fahrenheit, degree_rankine, kelvin};
    macro_rules! affine {
        ($u:ty) => {{
            let zero = ThermodynamicTemperature::new::<$u>(0.0).get::<kelvin>();
            let one = ThermodynamicTemperature::new::<$u>(1.0).get::<kelvin>();
            Affine {
                factor: one - zero,
                offset: zero,
            }
        }};
    }
    match unit {
        "k" | "kelvin" => Some(affine!(kelvin)),
        "c" | "celsius" => Some(affine!(degree_celsius)),
        "f" | "fahrenheit" => Some(affine!(degree_fahrenheit)),
        "r" | "rankine" => Some(affine!(degree_rankine)),
        _ => None,
    }
}

fn density_factor(unit: &str) -> Option<f64> {
    use mass_density::{gram_per_cubic_centimeter, kilogram_per_cubic_meter, pound_per_cubic_foot};
    let one = match unit {
        "kg/m3" => MassDensity::new::<kilogram_per_cubic_meter>(1.0),
        "g/cm3" => MassDensity::new::<gram_per_cubic_centimeter>(1.0),
        // g/ml is identical to g/cm3 (uom has no milliliter-based density unit)
        "g/ml" => MassDensity::new::<gram_per_cubic_centimeter>(1.0),
        // g/l is identical to kg/m3 (uom has no liter-based density unit)
        "g/l" => MassDensity::new::<kilogram_per_cubic_meter>(1.0),
        "lb/ft3" => MassDensity::new::<pound_per_cubic_foot>(1.0),
        _ => return None,
    };
    Some(one.get::<kilogram_per_cubic_meter>())
}

fn loading_factor(unit: &str, molar_mass: Option<f64>) -> ApResult<Option<f64>> {
    let factor = match unit {
        "mg/g" | "g/kg" => 1.0,
        "g/g" | "kg/kg" => 1000.0,
        "mmol/g" | "mol/kg" | "mol/g" => {
            let m = molar_mass.ok_or(ApError::MissingProperty {
                property: "molar_mass",
            })?;
            if unit == "mol/g" { m * 1000.0 } else { m }
        }
        _ => return Ok(None),
    };
    Ok(Some(factor))
}

fn potential_factor(unit: &str) -> Option<f64> {
    match unit {
        "kj/mol" => Some(1.0),
        "j/mol" => Some(1e-3),
        "kcal/mol" => Some(4.184),
        "cal/mol" => Some(4.184e-3),
        _ => None,
    }
}

fn volume_factor(unit: &str) -> Option<f64> {
    match unit {
        "ml/g" | "cm3/g" | "l/kg" | "dm3/kg" => Some(1.0),
        "m3/kg" => Some(1000.0),
        _ => None,
    }
}

fn lookup(kind: QuantityKind, unit: &str, molar_mass: Option<f64>) -> ApResult<Affine> {
    let key = normalize(unit);
    let affine = match kind {
        QuantityKind::Pressure => pressure_factor(&key).map(Affine::scale),
        QuantityKind::Temperature => temperature_affine(&key),
        QuantityKind::Loading => loading_factor(&key, molar_mass)?.map(Affine::scale),
        QuantityKind::Potential => potential_factor(&key).map(Affine::scale),
        QuantityKind::Volume => volume_factor(&key).map(Affine::scale),
        QuantityKind::Density => density_factor(&key).map(Affine::scale),
    };
    affine.ok_or_else(|| ApError::UnknownUnit {
        unit: unit.to_string(),
        kind,
    })
}

/// Convert `value` of quantity `kind` from `from` to `to`.
///
/// Molar loading units need the molar mass; use [`convert_loading`] for those.
pub fn convert(value: f64, kind: QuantityKind, from: &str, to: &str) -> ApResult<f64> {
    let from = lookup(kind, from, None)?;
    let to = lookup(kind, to, None)?;
    Ok(to.from_base(from.to_base(value)))
}

/// Convert a loading, allowing molar units (`mmol/g`, `mol/kg`, `mol/g`).
///
/// `molar_mass` is in g/mol.
pub fn convert_loading(value: f64, from: &str, to: &str, molar_mass: Option<f64>) -> ApResult<f64> {
    let from = lookup(QuantityKind::Loading, from, molar_mass)?;
    let to = lookup(QuantityKind::Loading, to, molar_mass)?;
    Ok(to.from_base(from.to_base(value)))
}

/// Check that `unit` is recognized for `kind` without converting anything.
pub fn validate_unit(kind: QuantityKind, unit: &str, molar_mass: Option<f64>) -> ApResult<()> {
    lookup(kind, unit, molar_mass).map(|_| ())
}

/// A numeric value tagged with its unit.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalQuantity {
    pub value: f64,
    pub kind: QuantityKind,
    pub unit: String,
}

impl PhysicalQuantity {
    pub fn new(value: f64, kind: QuantityKind, unit: impl Into<String>) -> Self {
        Self {
            value,
            kind,
            unit: unit.into(),
        }
    }

    /// Quantity expressed in its base unit.
    pub fn base(value: f64, kind: QuantityKind) -> Self {
        Self::new(value, kind, kind.base_unit())
    }

    /// Value in the base unit of this quantity.
    pub fn to_base(&self) -> ApResult<f64> {
        convert(self.value, self.kind, &self.unit, self.kind.base_unit())
    }

    /// Re-express this quantity in another unit of the same kind.
    pub fn in_unit(&self, unit: &str) -> ApResult<PhysicalQuantity> {
        let value = convert(self.value, self.kind, &self.unit, unit)?;
        Ok(Self::new(value, self.kind, unit))
    }
}

impl fmt::Display for PhysicalQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}

pub mod constants {
    /// Molar gas constant [J/(mol·K)]
    pub const GAS_CONSTANT: f64 = 8.314_462_618;

    /// Molar gas constant [kJ/(mol·K)], matching the potential base unit
    pub const GAS_CONSTANT_KJ: f64 = GAS_CONSTANT * 1e-3;

    /// Molar gas constant [cm³·MPa/(mol·K)]
    pub const GAS_CONSTANT_CM3_MPA: f64 = GAS_CONSTANT;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
    }

    #[test]
    fn pressure_conversions() {
        assert!(close(convert(1.0, QuantityKind::Pressure, "bar", "MPa").unwrap(), 0.1));
        assert!(close(convert(101_325.0, QuantityKind::Pressure, "Pa", "atm").unwrap(), 1.0));
        assert!(close(convert(250.0, QuantityKind::Pressure, "kPa", "MPa").unwrap(), 0.25));
    }

    #[test]
    fn temperature_offsets() {
        assert!(close(convert(0.0, QuantityKind::Temperature, "C", "K").unwrap(), 273.15));
        assert!(close(convert(32.0, QuantityKind::Temperature, "°F", "C").unwrap(), 0.0));
        // Rankine is a pure scale
        assert!(close(convert(540.0, QuantityKind::Temperature, "R", "K").unwrap(), 300.0));
    }

    #[test]
    fn density_conversions() {
        assert!(close(convert(1.0, QuantityKind::Density, "g/cm3", "kg/m3").unwrap(), 1000.0));
        assert!(close(convert(1.0, QuantityKind::Density, "g/l", "kg/m³").unwrap(), 1.0));
    }

    #[test]
    fn molar_loading_needs_molar_mass() {
        assert!(matches!(
            convert(1.0, QuantityKind::Loading, "mmol/g", "mg/g"),
            Err(ApError::MissingProperty { .. })
        ));
        let mg = convert_loading(2.0, "mmol/g", "mg/g", Some(44.01)).unwrap();
        assert!(close(mg, 88.02));
        let back = convert_loading(mg, "mg/g", "mol/kg", Some(44.01)).unwrap();
        assert!(close(back, 2.0));
    }

    #[test]
    fn unknown_unit_is_rejected() {
        let err = convert(1.0, QuantityKind::Pressure, "furlong", "MPa").unwrap_err();
        assert!(matches!(err, ApError::UnknownUnit { kind: QuantityKind::Pressure, .. }));
        assert!(convert(1.0, QuantityKind::Volume, "ml/g", "bar").is_err());
    }

    #[test]
    fn physical_quantity_base() {
        let q = PhysicalQuantity::new(25.0, QuantityKind::Temperature, "C");
        assert!(close(q.to_base().unwrap(), 298.15));
        let f = q.in_unit("F").unwrap();
        assert!(close(f.value, 77.0));
        assert_eq!(PhysicalQuantity::base(1.0, QuantityKind::Volume).unit, "ml/g");
    }
}
