//! Structural validation of a run configuration.
//!
//! Model and unit names are checked later, when the configuration is
//! resolved against the model catalogs.

use std::collections::HashSet;

use crate::schema::{AdsorbateDef, DataKindDef, DatasetDef, PredictionDef, RangeDef, RunConfig, SourceDef, SweepDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate name: {name} in {context}")]
    DuplicateName { name: String, context: String },

    #[error("Missing value: {field} in {context}")]
    Missing { field: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_config(config: &RunConfig) -> Result<(), ValidationError> {
    if config.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: config.version,
        });
    }
    if config.name.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "name".to_string(),
            context: "run".to_string(),
        });
    }

    let mut names = HashSet::new();
    for adsorbate in &config.adsorbates {
        if !names.insert(adsorbate.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: adsorbate.name.clone(),
                context: "adsorbates".to_string(),
            });
        }
        validate_adsorbate(adsorbate)?;
    }
    Ok(())
}

fn validate_adsorbate(adsorbate: &AdsorbateDef) -> Result<(), ValidationError> {
    let context = format!("adsorbate {}", adsorbate.name);
    if adsorbate.datasets.is_empty() {
        return Err(ValidationError::Missing {
            field: "datasets".to_string(),
            context,
        });
    }

    let mut names = HashSet::new();
    for dataset in &adsorbate.datasets {
        if !names.insert(dataset.name.as_str()) {
            return Err(ValidationError::DuplicateName {
                name: dataset.name.clone(),
                context,
            });
        }
        validate_dataset(dataset)?;
    }

    let mut names = HashSet::new();
    for prediction in &adsorbate.predictions {
        let name = prediction.display_name();
        if !names.insert(name.clone()) {
            return Err(ValidationError::DuplicateName {
                name,
                context: format!("{context} predictions"),
            });
        }
        validate_prediction(prediction)?;
    }

    if let Some(sweep) = &adsorbate.diagnostics.saturation_pressure {
        validate_sweep("diagnostics.saturation_pressure", sweep)?;
    }
    if let Some(sweep) = &adsorbate.diagnostics.density {
        validate_sweep("diagnostics.density", sweep)?;
    }
    if let Some(enthalpy) = &adsorbate.enthalpy {
        positive("enthalpy.temperature", enthalpy.temperature)?;
    }
    if let Some([lo, hi]) = adsorbate.solver.temperature_bracket {
        positive("solver.temperature_bracket", lo)?;
        if lo >= hi {
            return Err(invalid(
                "solver.temperature_bracket",
                format!("[{lo}, {hi}]"),
                "lower bound must be below upper bound",
            ));
        }
    }
    if adsorbate.solver.max_iterations == Some(0) {
        return Err(invalid("solver.max_iterations", "0", "must be at least 1"));
    }
    if let Some(tolerance) = adsorbate.solver.tolerance {
        positive("solver.tolerance", tolerance)?;
    }
    Ok(())
}

fn validate_dataset(dataset: &DatasetDef) -> Result<(), ValidationError> {
    if dataset.kind != DataKindDef::Characteristic {
        positive(&format!("datasets.{}.condition", dataset.name), dataset.condition)?;
    }
    if let SourceDef::Model { range, points, .. } = &dataset.source {
        let field = format!("datasets.{}.source.range", dataset.name);
        if dataset.kind != DataKindDef::Isotherm {
            return Err(invalid(
                &format!("datasets.{}.source", dataset.name),
                "model",
                "isotherm models only synthesize isotherm datasets",
            ));
        }
        if range[0] < 0.0 || range[0] >= range[1] {
            return Err(invalid(&field, format!("{range:?}"), "expected 0 <= min < max"));
        }
        if *points < 2 {
            return Err(invalid(&field, points.to_string(), "need at least 2 points"));
        }
    }
    if dataset.saturation_pressure.kind.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "saturation_pressure.kind".to_string(),
            context: format!("dataset {}", dataset.name),
        });
    }
    if dataset.density.kind.trim().is_empty() {
        return Err(ValidationError::Missing {
            field: "density.kind".to_string(),
            context: format!("dataset {}", dataset.name),
        });
    }
    Ok(())
}

fn validate_prediction(prediction: &PredictionDef) -> Result<(), ValidationError> {
    let name = prediction.display_name();
    match prediction {
        PredictionDef::Isotherm { temperature, .. } => {
            positive(&format!("{name}.temperature"), *temperature)?
        }
        PredictionDef::Isobar { pressure, .. } => positive(&format!("{name}.pressure"), *pressure)?,
        PredictionDef::Isostere { loading, .. } => positive(&format!("{name}.loading"), *loading)?,
    }
    match prediction.range() {
        RangeDef::Sweep(sweep) => validate_sweep(&format!("{name}.range"), sweep),
        RangeDef::Values { values } if values.is_empty() => Err(ValidationError::Missing {
            field: "range.values".to_string(),
            context: name,
        }),
        RangeDef::Values { values } => match values.iter().find(|v| !v.is_finite()) {
            Some(bad) => Err(invalid(&format!("{name}.range"), bad.to_string(), "not finite")),
            None => Ok(()),
        },
    }
}

fn validate_sweep(field: &str, sweep: &SweepDef) -> Result<(), ValidationError> {
    if !(sweep.min.is_finite() && sweep.max.is_finite()) || sweep.min >= sweep.max {
        return Err(invalid(
            field,
            format!("[{}, {}]", sweep.min, sweep.max),
            "expected finite min < max",
        ));
    }
    if sweep.count < 2 {
        return Err(invalid(field, sweep.count.to_string(), "need at least 2 points"));
    }
    Ok(())
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value.to_string(), "must be positive"))
    }
}

fn invalid(field: &str, value: impl Into<String>, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.into(),
        reason: reason.to_string(),
    }
}
