//! Prediction requests and results.

use std::fmt;

use ap_core::{ApError, ApResult, QuantityKind, Sweep};

/// Which variable an isostere walks along.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FreeVariable {
    /// Grid over T, solve for p
    Temperature,
    /// Grid over p, solve for T
    Pressure,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PredictionKind {
    /// Loading vs. pressure at fixed temperature [K]
    Isotherm { temperature: f64 },
    /// Loading vs. temperature at fixed pressure [MPa]
    Isobar { pressure: f64 },
    /// Pressure vs. temperature at fixed loading [mg/g]
    Isostere { loading: f64, free: FreeVariable },
}

impl PredictionKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Isotherm { .. } => "isotherm",
            Self::Isobar { .. } => "isobar",
            Self::Isostere { .. } => "isostere",
        }
    }

    /// Quantity of the requested grid values.
    pub fn grid_quantity(&self) -> QuantityKind {
        match self {
            Self::Isotherm { .. } => QuantityKind::Pressure,
            Self::Isobar { .. } => QuantityKind::Temperature,
            Self::Isostere {
                free: FreeVariable::Temperature,
                ..
            } => QuantityKind::Temperature,
            Self::Isostere {
                free: FreeVariable::Pressure,
                ..
            } => QuantityKind::Pressure,
        }
    }

    /// Quantities of the `(x, y)` columns of the result.
    pub fn columns(&self) -> (QuantityKind, QuantityKind) {
        match self {
            Self::Isotherm { .. } => (QuantityKind::Pressure, QuantityKind::Loading),
            Self::Isobar { .. } => (QuantityKind::Temperature, QuantityKind::Loading),
            Self::Isostere { .. } => (QuantityKind::Temperature, QuantityKind::Pressure),
        }
    }
}

impl fmt::Display for PredictionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Isotherm { temperature } => write!(f, "isotherm at {temperature} K"),
            Self::Isobar { pressure } => write!(f, "isobar at {pressure} MPa"),
            Self::Isostere { loading, .. } => write!(f, "isostere at {loading} mg/g"),
        }
    }
}

/// Grid values of a request, in base units.
#[derive(Debug, Clone, PartialEq)]
pub enum Range {
    Explicit(Vec<f64>),
    Sweep(Sweep),
}

impl Range {
    /// Grid values, validated and sorted ascending.
    pub fn values(&self) -> ApResult<Vec<f64>> {
        let mut values = match self {
            Range::Explicit(values) => {
                if values.is_empty() {
                    return Err(ApError::invalid_range("explicit range has no values"));
                }
                if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
                    return Err(ApError::invalid_range(format!(
                        "explicit range contains {bad}"
                    )));
                }
                values.clone()
            }
            Range::Sweep(sweep) => {
                sweep.validate()?;
                sweep.generate_points()
            }
        };
        values.sort_by(f64::total_cmp);
        Ok(values)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionRequest {
    pub name: String,
    pub kind: PredictionKind,
    pub range: Range,
}

impl PredictionRequest {
    pub fn new(name: impl Into<String>, kind: PredictionKind, range: Range) -> Self {
        Self {
            name: name.into(),
            kind,
            range,
        }
    }
}

/// `(x, y)` pairs in base units, ascending in `x`.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionResult {
    pub name: String,
    pub kind: PredictionKind,
    pub points: Vec<(f64, f64)>,
}

impl PredictionResult {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}
