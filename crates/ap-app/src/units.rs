//! Unit handling at the configuration boundary.

use ap_core::{ApResult, QuantityKind, convert, convert_loading, validate_unit};
use ap_project::UnitsDef;

/// Unit names for every quantity plus the molar mass needed by molar
/// loading units.
#[derive(Debug, Clone, PartialEq)]
pub struct UnitContext {
    units: UnitsDef,
    molar_mass: Option<f64>,
}

impl UnitContext {
    /// Fails with `UnknownUnit`, or `MissingProperty` for a molar loading
    /// unit without a molar mass.
    pub fn new(units: &UnitsDef, molar_mass: Option<f64>) -> ApResult<Self> {
        let ctx = Self {
            units: units.clone(),
            molar_mass,
        };
        for kind in QuantityKind::ALL {
            validate_unit(kind, ctx.unit(kind), molar_mass)?;
        }
        Ok(ctx)
    }

    pub fn base() -> Self {
        Self {
            units: UnitsDef::default(),
            molar_mass: None,
        }
    }

    pub fn unit(&self, kind: QuantityKind) -> &str {
        match kind {
            QuantityKind::Pressure => &self.units.pressure,
            QuantityKind::Temperature => &self.units.temperature,
            QuantityKind::Loading => &self.units.loading,
            QuantityKind::Potential => &self.units.potential,
            QuantityKind::Volume => &self.units.volume,
            QuantityKind::Density => &self.units.density,
        }
    }

    pub fn to_base(&self, kind: QuantityKind, value: f64) -> ApResult<f64> {
        match kind {
            QuantityKind::Loading => {
                convert_loading(value, self.unit(kind), kind.base_unit(), self.molar_mass)
            }
            _ => convert(value, kind, self.unit(kind), kind.base_unit()),
        }
    }

    pub fn from_base(&self, kind: QuantityKind, value: f64) -> ApResult<f64> {
        match kind {
            QuantityKind::Loading => {
                convert_loading(value, kind.base_unit(), self.unit(kind), self.molar_mass)
            }
            _ => convert(value, kind, kind.base_unit(), self.unit(kind)),
        }
    }

    /// Convert `(x, y)` pairs into base units.
    pub fn pairs_to_base(
        &self,
        columns: (QuantityKind, QuantityKind),
        points: &[(f64, f64)],
    ) -> ApResult<Vec<(f64, f64)>> {
        points
            .iter()
            .map(|&(x, y)| Ok((self.to_base(columns.0, x)?, self.to_base(columns.1, y)?)))
            .collect()
    }

    /// Convert `(x, y)` pairs out of base units.
    pub fn pairs_from_base(
        &self,
        columns: (QuantityKind, QuantityKind),
        points: &[(f64, f64)],
    ) -> ApResult<Vec<(f64, f64)>> {
        points
            .iter()
            .map(|&(x, y)| Ok((self.from_base(columns.0, x)?, self.from_base(columns.1, y)?)))
            .collect()
    }

    /// Column header such as `pressure [bar] loading [mmol/g]`.
    pub fn header(&self, columns: (QuantityKind, QuantityKind)) -> String {
        format!(
            "{} [{}] {} [{}]",
            columns.0,
            self.unit(columns.0),
            columns.1,
            self.unit(columns.1)
        )
    }
}
