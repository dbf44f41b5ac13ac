//! Input datasets.

use std::fmt;

use ap_core::{ApError, ApResult};
use ap_isotherms::IsothermModel;

/// What the two columns of a dataset hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataKind {
    /// (p, q) at fixed T
    Isotherm,
    /// (T, q) at fixed p
    Isobar,
    /// (T, p) at fixed q
    Isostere,
    /// (A, V), no fixed condition
    Characteristic,
}

impl DataKind {
    pub fn from_name(name: &str) -> ApResult<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "isotherm" => Ok(Self::Isotherm),
            "isobar" => Ok(Self::Isobar),
            "isostere" => Ok(Self::Isostere),
            "characteristic" | "characteristic_curve" => Ok(Self::Characteristic),
            _ => Err(ApError::UnsupportedModel {
                name: name.to_string(),
                family: "data kind",
            }),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::Isotherm => "isotherm",
            Self::Isobar => "isobar",
            Self::Isostere => "isostere",
            Self::Characteristic => "characteristic",
        }
    }
}

impl fmt::Display for DataKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One measured state in base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    pub temperature: f64,
    pub pressure: f64,
    pub loading: f64,
}

/// Raw dataset in base units.
///
/// `condition` is the fixed variable of the kind (T for isotherms, p for
/// isobars, q for isosteres) and is ignored for characteristic data.
#[derive(Debug, Clone, PartialEq)]
pub struct IsothermDataset {
    pub name: String,
    pub kind: DataKind,
    pub condition: f64,
    pub points: Vec<(f64, f64)>,
}

impl IsothermDataset {
    pub fn new(
        name: impl Into<String>,
        kind: DataKind,
        condition: f64,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            condition,
            points,
        }
    }

    /// Synthetic isotherm at `temperature` sampled from an analytic model.
    pub fn from_model(
        name: impl Into<String>,
        temperature: f64,
        model: &IsothermModel,
        p_min: f64,
        p_max: f64,
        count: usize,
    ) -> ApResult<Self> {
        let points = model.synthesize(p_min, p_max, count)?;
        Ok(Self::new(name, DataKind::Isotherm, temperature, points))
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Points sorted by the independent variable.
    pub fn sorted_points(&self) -> Vec<(f64, f64)> {
        let mut points = self.points.clone();
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points
    }

    /// The `i`-th point as a full (T, p, q) state. `None` for characteristic data.
    pub fn observation(&self, i: usize) -> Option<Observation> {
        let (x, y) = *self.points.get(i)?;
        let c = self.condition;
        let obs = match self.kind {
            DataKind::Isotherm => Observation {
                temperature: c,
                pressure: x,
                loading: y,
            },
            DataKind::Isobar => Observation {
                temperature: x,
                pressure: c,
                loading: y,
            },
            DataKind::Isostere => Observation {
                temperature: x,
                pressure: y,
                loading: c,
            },
            DataKind::Characteristic => return None,
        };
        Some(obs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ap_isotherms::IsothermKind;

    #[test]
    fn observations_follow_kind() {
        let isobar = IsothermDataset::new("b", DataKind::Isobar, 0.1, vec![(300.0, 42.0)]);
        assert_eq!(
            isobar.observation(0),
            Some(Observation {
                temperature: 300.0,
                pressure: 0.1,
                loading: 42.0
            })
        );
        let isostere = IsothermDataset::new("s", DataKind::Isostere, 5.0, vec![(280.0, 0.3)]);
        assert_eq!(isostere.observation(0).unwrap().pressure, 0.3);
        let ch = IsothermDataset::new("c", DataKind::Characteristic, 0.0, vec![(1.0, 0.2)]);
        assert_eq!(ch.observation(0), None);
        assert_eq!(isobar.observation(3), None);
    }

    #[test]
    fn synthetic_dataset() {
        let model = IsothermModel::single(IsothermKind::Langmuir, &[5.0, 0.1]).unwrap();
        let ds = IsothermDataset::from_model("lang", 298.0, &model, 0.01, 10.0, 50).unwrap();
        assert_eq!(ds.len(), 50);
        assert_eq!(ds.kind, DataKind::Isotherm);
        assert_eq!(ds.condition, 298.0);
    }

    #[test]
    fn data_kind_names() {
        assert_eq!(DataKind::from_name("Isostere").unwrap(), DataKind::Isostere);
        assert!(DataKind::from_name("isochore").is_err());
    }
}
