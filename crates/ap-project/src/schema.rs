//! Run configuration schema.
//!
//! Values are in the units named by each adsorbate's `units` block; nothing
//! here is converted. Paths are relative to the configuration file.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunConfig {
    #[serde(default = "default_version")]
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub adsorbates: Vec<AdsorbateDef>,
    #[serde(default = "default_output_directory")]
    pub output_directory: PathBuf,
}

fn default_version() -> u32 {
    crate::validate::LATEST_VERSION
}

fn default_output_directory() -> PathBuf {
    PathBuf::from("Output")
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdsorbateDef {
    pub name: String,
    /// Molecular-properties file (key/value or `.json`)
    pub properties: PathBuf,
    #[serde(default)]
    pub units: UnitsDef,
    #[serde(default)]
    pub output_units: UnitsDef,
    pub datasets: Vec<DatasetDef>,
    #[serde(default)]
    pub predictions: Vec<PredictionDef>,
    #[serde(default)]
    pub diagnostics: DiagnosticsDef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub enthalpy: Option<EnthalpyDef>,
    #[serde(default)]
    pub solver: SolverDef,
}

/// Unit names per quantity. Missing entries are base units.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct UnitsDef {
    pub pressure: String,
    pub temperature: String,
    pub loading: String,
    pub potential: String,
    pub volume: String,
    pub density: String,
}

impl Default for UnitsDef {
    fn default() -> Self {
        Self {
            pressure: "MPa".to_string(),
            temperature: "K".to_string(),
            loading: "mg/g".to_string(),
            potential: "kJ/mol".to_string(),
            volume: "ml/g".to_string(),
            density: "kg/m3".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum DataKindDef {
    Isotherm,
    Isobar,
    Isostere,
    Characteristic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DatasetDef {
    pub name: String,
    pub kind: DataKindDef,
    /// Fixed variable: T for isotherms, p for isobars, q for isosteres
    #[serde(default)]
    pub condition: f64,
    pub source: SourceDef,
    pub saturation_pressure: SaturationDef,
    pub density: DensityDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum SourceDef {
    File {
        file: PathBuf,
    },
    Model {
        model: IsothermModelDef,
        /// `[p_min, p_max]`
        range: [f64; 2],
        #[serde(default = "default_points")]
        points: usize,
    },
}

fn default_points() -> usize {
    50
}

/// Fitted isotherm: one row per parameter, one column per site.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IsothermModelDef {
    pub kind: String,
    pub parameters: Vec<Vec<f64>>,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SupercriticalDef {
    #[default]
    Reject,
    Extrapolate,
}

/// Saturation-pressure model. Fields other than `kind` override the
/// model's defaults and are ignored by models that do not use them.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SaturationDef {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slope: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supercritical: Option<SupercriticalDef>,
    /// (T, p₀) table for `tabulated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
    /// Library entry for `library`; defaults to the adsorbate name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adsorbate: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DensityDef {
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    /// Thermal expansion coefficient [1/K]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<f64>,
    /// (T, ρ) table for `tabulated`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FreeVariableDef {
    Temperature,
    Pressure,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum PredictionDef {
    Isotherm {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        temperature: f64,
        range: RangeDef,
    },
    Isobar {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        pressure: f64,
        range: RangeDef,
    },
    Isostere {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        name: Option<String>,
        loading: f64,
        free: FreeVariableDef,
        range: RangeDef,
    },
}

impl PredictionDef {
    pub fn range(&self) -> &RangeDef {
        match self {
            Self::Isotherm { range, .. } | Self::Isobar { range, .. } | Self::Isostere { range, .. } => {
                range
            }
        }
    }

    /// Explicit name, or one derived from the kind and fixed value.
    pub fn display_name(&self) -> String {
        match self {
            Self::Isotherm { name: Some(name), .. }
            | Self::Isobar { name: Some(name), .. }
            | Self::Isostere { name: Some(name), .. } => name.clone(),
            Self::Isotherm { temperature, .. } => format!("isotherm_{temperature}"),
            Self::Isobar { pressure, .. } => format!("isobar_{pressure}"),
            Self::Isostere { loading, .. } => format!("isostere_{loading}"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SpacingDef {
    #[default]
    Linear,
    Logarithmic,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SweepDef {
    pub min: f64,
    pub max: f64,
    pub count: usize,
    #[serde(default)]
    pub spacing: SpacingDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RangeDef {
    Sweep(SweepDef),
    Values { values: Vec<f64> },
}

/// Optional (T, value) curves of the first dataset's models.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct DiagnosticsDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub saturation_pressure: Option<SweepDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub density: Option<SweepDef>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnthalpyDef {
    pub temperature: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expansion: Option<f64>,
}

/// Iteration budgets; unset fields keep the library defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SolverDef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// `[t_min, t_max]` searched by isostere-over-pressure solves
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature_bracket: Option<[f64; 2]>,
}
