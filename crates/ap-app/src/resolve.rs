//! Resolve one adsorbate of a run configuration into core inputs.
//!
//! Everything leaving this module is in base units. Failures here are
//! configuration errors and abort only the adsorbate being resolved.

use std::path::Path;

use ap_adsorbate::{
    AdsorbateDensity, DEFAULT_EXPANSION, DensityModel, EosSolverConfig, MolecularProperties,
    SaturationModel, SaturationPressure, SupercriticalPolicy, Table,
};
use ap_core::{ApError, QuantityKind, SolverConfig, Sweep, SweepType};
use ap_curve::{DataKind, IsothermDataset};
use ap_isotherms::{IsothermKind, IsothermModel};
use ap_predict::{FreeVariable, PredictionKind, PredictionRequest, Range};
use ap_project::{
    AdsorbateDef, DataKindDef, DatasetDef, DensityDef, FreeVariableDef, PredictionDef, RangeDef,
    SaturationDef, SourceDef, SpacingDef, SupercriticalDef, SweepDef,
};

use crate::error::{AppError, AppResult};
use crate::units::UnitContext;

/// One dataset in base units with its own p₀(T) and ρ(T).
#[derive(Debug, Clone)]
pub struct ResolvedDataset {
    pub dataset: IsothermDataset,
    pub saturation_pressure: SaturationPressure,
    pub density: AdsorbateDensity,
}

/// Adsorption enthalpy request in base units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnthalpyRequest {
    pub temperature: f64,
    pub expansion: f64,
}

/// Everything needed to process one adsorbate.
#[derive(Debug, Clone)]
pub struct ResolvedAdsorbate {
    pub name: String,
    pub properties: MolecularProperties,
    pub output_units: UnitContext,
    pub datasets: Vec<ResolvedDataset>,
    pub predictions: Vec<PredictionRequest>,
    pub saturation_curve: Option<Sweep>,
    pub density_curve: Option<Sweep>,
    pub enthalpy: Option<EnthalpyRequest>,
    pub solver: SolverConfig,
    pub temperature_bracket: Option<(f64, f64)>,
}

pub fn resolve_adsorbate(def: &AdsorbateDef, config_path: &Path) -> AppResult<ResolvedAdsorbate> {
    let name = def.name.as_str();

    let properties_path = ap_project::resolve_path(config_path, &def.properties);
    let mut properties =
        ap_project::load_properties(&properties_path).map_err(|err| AppError::FileRead {
            what: "properties",
            path: properties_path.clone(),
            message: err.to_string(),
        })?;
    if properties.name.is_none() {
        properties.name = Some(def.name.clone());
    }

    let input = UnitContext::new(&def.units, properties.molar_mass).map_err(AppError::model(name))?;
    let output_units =
        UnitContext::new(&def.output_units, properties.molar_mass).map_err(AppError::model(name))?;

    let mut solver = SolverConfig::default();
    let mut eos_solver = EosSolverConfig::default();
    if let Some(max_iterations) = def.solver.max_iterations {
        solver.max_iterations = max_iterations;
        eos_solver.max_iterations = max_iterations;
    }
    if let Some(tolerance) = def.solver.tolerance {
        solver.rel_tol = tolerance;
        eos_solver.tolerance = tolerance;
    }

    let datasets = def
        .datasets
        .iter()
        .map(|dataset| resolve_dataset(dataset, name, &properties, &input, eos_solver, config_path))
        .collect::<AppResult<Vec<_>>>()?;

    let predictions = def
        .predictions
        .iter()
        .map(|prediction| resolve_prediction(prediction, &input))
        .collect::<Result<Vec<_>, ApError>>()
        .map_err(AppError::model(name))?;

    let temperature_sweep = |sweep: Option<&SweepDef>| -> AppResult<Option<Sweep>> {
        sweep
            .map(|s| to_sweep(s, &input, QuantityKind::Temperature))
            .transpose()
            .map_err(AppError::model(name))
    };
    let saturation_curve = temperature_sweep(def.diagnostics.saturation_pressure.as_ref())?;
    let density_curve = temperature_sweep(def.diagnostics.density.as_ref())?;

    let enthalpy = match &def.enthalpy {
        Some(e) => Some(EnthalpyRequest {
            temperature: input
                .to_base(QuantityKind::Temperature, e.temperature)
                .map_err(AppError::model(name))?,
            expansion: e.expansion.unwrap_or(DEFAULT_EXPANSION),
        }),
        None => None,
    };

    let temperature_bracket = match def.solver.temperature_bracket {
        Some([lo, hi]) => {
            let to_kelvin = |t| input.to_base(QuantityKind::Temperature, t);
            let lo = to_kelvin(lo).map_err(AppError::model(name))?;
            let hi = to_kelvin(hi).map_err(AppError::model(name))?;
            Some((lo, hi))
        }
        None => None,
    };

    tracing::debug!(
        adsorbate = name,
        datasets = datasets.len(),
        predictions = predictions.len(),
        "resolved adsorbate"
    );
    Ok(ResolvedAdsorbate {
        name: def.name.clone(),
        properties,
        output_units,
        datasets,
        predictions,
        saturation_curve,
        density_curve,
        enthalpy,
        solver,
        temperature_bracket,
    })
}

fn data_kind(kind: DataKindDef) -> DataKind {
    match kind {
        DataKindDef::Isotherm => DataKind::Isotherm,
        DataKindDef::Isobar => DataKind::Isobar,
        DataKindDef::Isostere => DataKind::Isostere,
        DataKindDef::Characteristic => DataKind::Characteristic,
    }
}

/// Quantities of the `(x, y)` columns of a dataset of `kind`.
pub fn data_columns(kind: DataKind) -> (QuantityKind, QuantityKind) {
    match kind {
        DataKind::Isotherm => (QuantityKind::Pressure, QuantityKind::Loading),
        DataKind::Isobar => (QuantityKind::Temperature, QuantityKind::Loading),
        DataKind::Isostere => (QuantityKind::Temperature, QuantityKind::Pressure),
        DataKind::Characteristic => (QuantityKind::Potential, QuantityKind::Volume),
    }
}

/// Quantity of the fixed condition of a dataset of `kind`.
fn condition_quantity(kind: DataKind) -> Option<QuantityKind> {
    match kind {
        DataKind::Isotherm => Some(QuantityKind::Temperature),
        DataKind::Isobar => Some(QuantityKind::Pressure),
        DataKind::Isostere => Some(QuantityKind::Loading),
        DataKind::Characteristic => None,
    }
}

fn resolve_dataset(
    def: &DatasetDef,
    adsorbate: &str,
    properties: &MolecularProperties,
    units: &UnitContext,
    eos_solver: EosSolverConfig,
    config_path: &Path,
) -> AppResult<ResolvedDataset> {
    let kind = data_kind(def.kind);
    let scoped = |err: ApError| AppError::Model {
        adsorbate: format!("{adsorbate} (dataset {})", def.name),
        source: err,
    };

    let raw = match &def.source {
        SourceDef::File { file } => read_table(config_path, file, "data")?,
        SourceDef::Model {
            model,
            range,
            points,
        } => {
            let kind = IsothermKind::from_name(&model.kind).map_err(scoped)?;
            IsothermModel::new(kind, model.parameters.clone())
                .and_then(|m| m.synthesize(range[0], range[1], *points))
                .map_err(scoped)?
        }
    };
    let points = units.pairs_to_base(data_columns(kind), &raw).map_err(scoped)?;
    let condition = match condition_quantity(kind) {
        Some(quantity) => units.to_base(quantity, def.condition).map_err(scoped)?,
        None => def.condition,
    };
    let dataset = IsothermDataset::new(def.name.clone(), kind, condition, points);

    let saturation_model = saturation_model(
        &def.saturation_pressure,
        adsorbate,
        properties,
        units,
        config_path,
    )?;
    let saturation_pressure = saturation_model
        .resolve(properties)
        .map_err(scoped)?
        .with_solver(eos_solver);
    let density = density_model(&def.density, adsorbate, units, config_path)?
        .resolve(properties)
        .map_err(scoped)?;

    tracing::debug!(
        dataset = %def.name,
        saturation_pressure = %saturation_model,
        density = def.density.kind.as_str(),
        points = dataset.len(),
        "resolved dataset"
    );
    Ok(ResolvedDataset {
        dataset,
        saturation_pressure,
        density,
    })
}

fn read_table(config_path: &Path, file: &Path, what: &'static str) -> AppResult<Vec<(f64, f64)>> {
    let path = ap_project::resolve_path(config_path, file);
    ap_project::read_two_column(&path).map_err(|err| AppError::FileRead {
        what,
        path: path.clone(),
        message: err.to_string(),
    })
}

fn normalized(kind: &str) -> String {
    kind.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

fn saturation_model(
    def: &SaturationDef,
    adsorbate: &str,
    properties: &MolecularProperties,
    units: &UnitContext,
    config_path: &Path,
) -> AppResult<SaturationModel> {
    let model_error = AppError::model(adsorbate);
    let model = match normalized(&def.kind).as_str() {
        "constant" => {
            let value = def.value.ok_or(ApError::MissingProperty {
                property: "saturation_pressure.value",
            });
            let value = value
                .and_then(|v| units.to_base(QuantityKind::Pressure, v))
                .map_err(model_error)?;
            SaturationModel::Constant { value }
        }
        "tabulated" => {
            let file = def.file.as_deref().ok_or_else(|| {
                AppError::InvalidInput(format!(
                    "tabulated saturation pressure of {adsorbate} needs a file"
                ))
            })?;
            let rows = read_table(config_path, file, "saturation pressure")?;
            let table = units
                .pairs_to_base((QuantityKind::Temperature, QuantityKind::Pressure), &rows)
                .and_then(Table::new)
                .map_err(model_error)?;
            SaturationModel::Tabulated(table)
        }
        _ => {
            let mut model = SaturationModel::from_name(&def.kind).map_err(model_error)?;
            match &mut model {
                SaturationModel::Amankwah { exponent } => {
                    *exponent = def.exponent.unwrap_or(*exponent);
                }
                SaturationModel::WidomBanuti { slope } => {
                    *slope = def.slope.unwrap_or(*slope);
                }
                SaturationModel::PengRobinson { supercritical }
                | SaturationModel::Prsv1 { supercritical }
                | SaturationModel::Prsv2 { supercritical } => {
                    if let Some(policy) = def.supercritical {
                        *supercritical = match policy {
                            SupercriticalDef::Reject => SupercriticalPolicy::Reject,
                            SupercriticalDef::Extrapolate => SupercriticalPolicy::Extrapolate,
                        };
                    }
                }
                SaturationModel::Library { adsorbate: entry } => {
                    *entry = def
                        .adsorbate
                        .clone()
                        .or_else(|| properties.name.clone())
                        .or_else(|| Some(adsorbate.to_string()));
                }
                _ => {}
            }
            model
        }
    };
    Ok(model)
}

fn density_model(
    def: &DensityDef,
    adsorbate: &str,
    units: &UnitContext,
    config_path: &Path,
) -> AppResult<DensityModel> {
    let model_error = AppError::model(adsorbate);
    let model = match normalized(&def.kind).as_str() {
        "constant" => {
            let value = def
                .value
                .ok_or(ApError::MissingProperty {
                    property: "density.value",
                })
                .and_then(|v| units.to_base(QuantityKind::Density, v))
                .map_err(model_error)?;
            DensityModel::Constant { value }
        }
        "tabulated" => {
            let file = def.file.as_deref().ok_or_else(|| {
                AppError::InvalidInput(format!("tabulated density of {adsorbate} needs a file"))
            })?;
            let rows = read_table(config_path, file, "density")?;
            let table = units
                .pairs_to_base((QuantityKind::Temperature, QuantityKind::Density), &rows)
                .and_then(Table::new)
                .map_err(model_error)?;
            DensityModel::Tabulated(table)
        }
        _ => {
            let mut model = DensityModel::from_name(&def.kind).map_err(model_error)?;
            if let DensityModel::Hauer { expansion } | DensityModel::Ozawa { expansion } = &mut model {
                *expansion = def.expansion.unwrap_or(*expansion);
            }
            model
        }
    };
    Ok(model)
}

fn to_sweep(def: &SweepDef, units: &UnitContext, quantity: QuantityKind) -> Result<Sweep, ApError> {
    let spacing = match def.spacing {
        SpacingDef::Linear => SweepType::Linear,
        SpacingDef::Logarithmic => SweepType::Logarithmic,
    };
    Sweep::new(
        units.to_base(quantity, def.min)?,
        units.to_base(quantity, def.max)?,
        def.count,
        spacing,
    )
}

fn resolve_prediction(def: &PredictionDef, units: &UnitContext) -> Result<PredictionRequest, ApError> {
    let kind = match def {
        PredictionDef::Isotherm { temperature, .. } => PredictionKind::Isotherm {
            temperature: units.to_base(QuantityKind::Temperature, *temperature)?,
        },
        PredictionDef::Isobar { pressure, .. } => PredictionKind::Isobar {
            pressure: units.to_base(QuantityKind::Pressure, *pressure)?,
        },
        PredictionDef::Isostere { loading, free, .. } => PredictionKind::Isostere {
            loading: units.to_base(QuantityKind::Loading, *loading)?,
            free: match free {
                FreeVariableDef::Temperature => FreeVariable::Temperature,
                FreeVariableDef::Pressure => FreeVariable::Pressure,
            },
        },
    };

    // grid values are generated in input units, then converted one by one
    let quantity = kind.grid_quantity();
    let values = match def.range() {
        RangeDef::Sweep(sweep) => {
            let spacing = match sweep.spacing {
                SpacingDef::Linear => SweepType::Linear,
                SpacingDef::Logarithmic => SweepType::Logarithmic,
            };
            Sweep::new(sweep.min, sweep.max, sweep.count, spacing)?.generate_points()
        }
        RangeDef::Values { values } => values.clone(),
    };
    let values = values
        .into_iter()
        .map(|v| units.to_base(quantity, v))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(PredictionRequest::new(
        def.display_name(),
        kind,
        Range::Explicit(values),
    ))
}
