//! Run execution service.
//!
//! Each adsorbate is processed on its own: a configuration error or a failed
//! curve build aborts that adsorbate and the run moves on to the next one.

use std::path::{Path, PathBuf};
use std::time::Instant;

use ap_adsorbate::{PropertyCorrelation, sample_curve};
use ap_core::{ApResult, Diagnostic, Diagnostics, QuantityKind};
use ap_curve::{CharacteristicCurve, CurveModels, build_pooled};
use ap_predict::{PredictionContext, PredictionResult, adsorption_enthalpy, predict};
use ap_project::RunConfig;

use crate::error::{AppError, AppResult};
use crate::resolve::{ResolvedAdsorbate, resolve_adsorbate};
use crate::units::UnitContext;

/// Options for executing a run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Write curve, prediction and diagnostic files
    pub write_outputs: bool,
    /// Overrides the configuration's `output_directory`
    pub output_directory: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            write_outputs: true,
            output_directory: None,
        }
    }
}

/// Request to execute a run.
pub struct RunRequest<'a> {
    pub config_path: &'a Path,
    pub options: RunOptions,
}

/// Computed results of one adsorbate, in base units.
#[derive(Debug, Clone)]
pub struct AdsorbateOutputs {
    pub curve: CharacteristicCurve,
    pub predictions: Vec<PredictionResult>,
    pub saturation_curve: Option<Vec<(f64, f64)>>,
    pub density_curve: Option<Vec<(f64, f64)>>,
    pub enthalpy: Option<Vec<(f64, f64)>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PredictionSummary {
    pub name: String,
    pub kind: &'static str,
    pub points: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdsorbateSummary {
    pub curve_points: usize,
    pub max_potential: f64,
    pub predictions: Vec<PredictionSummary>,
    pub files: Vec<PathBuf>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AdsorbateStatus {
    Completed(AdsorbateSummary),
    Failed { error: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AdsorbateReport {
    pub name: String,
    pub status: AdsorbateStatus,
    pub diagnostics: Vec<Diagnostic>,
}

/// Outcome of a whole run.
#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub name: String,
    pub adsorbates: Vec<AdsorbateReport>,
    pub total_time_s: f64,
}

impl RunReport {
    pub fn completed(&self) -> usize {
        self.adsorbates
            .iter()
            .filter(|a| matches!(a.status, AdsorbateStatus::Completed(_)))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.adsorbates.len() - self.completed()
    }

    pub fn warnings(&self) -> usize {
        self.adsorbates.iter().map(|a| a.diagnostics.len()).sum()
    }
}

/// Execute every adsorbate of the configuration at `request.config_path`.
///
/// Fails only when the configuration itself cannot be loaded.
pub fn run(request: &RunRequest) -> AppResult<RunReport> {
    let started = Instant::now();
    let config = ap_project::load_config(request.config_path)?;
    let output_root = output_root(&config, request);
    tracing::info!(run = %config.name, adsorbates = config.adsorbates.len(), "starting run");

    let mut reports = Vec::with_capacity(config.adsorbates.len());
    for def in &config.adsorbates {
        let span = tracing::info_span!("adsorbate", name = %def.name);
        let _guard = span.enter();

        let mut diags = Diagnostics::new();
        let status = match run_adsorbate(def, request, &output_root, &mut diags) {
            Ok(summary) => AdsorbateStatus::Completed(summary),
            Err(err) => {
                tracing::error!(adsorbate = %def.name, "{err}");
                AdsorbateStatus::Failed {
                    error: err.to_string(),
                }
            }
        };
        reports.push(AdsorbateReport {
            name: def.name.clone(),
            status,
            diagnostics: diags.into_vec(),
        });
    }

    let report = RunReport {
        name: config.name.clone(),
        adsorbates: reports,
        total_time_s: started.elapsed().as_secs_f64(),
    };
    tracing::info!(
        run = %report.name,
        completed = report.completed(),
        failed = report.failed(),
        warnings = report.warnings(),
        "run finished"
    );
    Ok(report)
}

fn output_root(config: &RunConfig, request: &RunRequest) -> PathBuf {
    let dir = request
        .options
        .output_directory
        .clone()
        .unwrap_or_else(|| ap_project::resolve_path(request.config_path, &config.output_directory));
    dir.join(file_name(&config.name))
}

fn run_adsorbate(
    def: &ap_project::AdsorbateDef,
    request: &RunRequest,
    output_root: &Path,
    diags: &mut Diagnostics,
) -> AppResult<AdsorbateSummary> {
    let resolved = resolve_adsorbate(def, request.config_path)?;
    let outputs = compute_adsorbate(&resolved, diags).map_err(AppError::model(&resolved.name))?;

    let files = if request.options.write_outputs {
        write_outputs(&output_root.join(file_name(&resolved.name)), &resolved, &outputs)?
    } else {
        Vec::new()
    };

    Ok(AdsorbateSummary {
        curve_points: outputs.curve.len(),
        max_potential: outputs.curve.max_potential(),
        predictions: outputs
            .predictions
            .iter()
            .map(|p| PredictionSummary {
                name: p.name.clone(),
                kind: p.kind.name(),
                points: p.len(),
            })
            .collect(),
        files,
    })
}

/// Build the pooled curve and run every requested computation.
///
/// Fails only when the curve cannot be built. A prediction that fails as a
/// whole is recorded and left out.
pub fn compute_adsorbate(
    resolved: &ResolvedAdsorbate,
    diags: &mut Diagnostics,
) -> ApResult<AdsorbateOutputs> {
    let curve = build_pooled(
        &resolved.name,
        resolved.datasets.iter().map(|d| {
            (
                &d.dataset,
                CurveModels {
                    saturation_pressure: &d.saturation_pressure,
                    density: &d.density,
                },
            )
        }),
        diags,
    )?;

    // predictions use the first dataset's models
    let Some(first) = resolved.datasets.first() else {
        return Err(ap_core::ApError::EmptyCurve { points: 0 });
    };
    let saturation_pressure: &dyn PropertyCorrelation = &first.saturation_pressure;
    let density: &dyn PropertyCorrelation = &first.density;

    let mut ctx =
        PredictionContext::new(&curve, saturation_pressure, density).with_solver(resolved.solver);
    if let Some((t_min, t_max)) = resolved.temperature_bracket {
        ctx = ctx.with_temperature_bracket(t_min, t_max);
    }

    let mut predictions = Vec::with_capacity(resolved.predictions.len());
    for request in &resolved.predictions {
        match predict(request, &ctx, diags) {
            Ok(result) => predictions.push(result),
            Err(err) => diags.push(format!("prediction {}", request.name), err),
        }
    }

    let saturation_curve = resolved
        .saturation_curve
        .as_ref()
        .map(|sweep| sample_curve(saturation_pressure, sweep, diags));
    let density_curve = resolved
        .density_curve
        .as_ref()
        .map(|sweep| sample_curve(density, sweep, diags));

    let enthalpy = match resolved.enthalpy {
        Some(request) => match adsorption_enthalpy(
            &curve,
            request.temperature,
            saturation_pressure,
            density,
            request.expansion,
        ) {
            Ok(points) => Some(points),
            Err(err) => {
                diags.push("adsorption enthalpy", err);
                None
            }
        },
        None => None,
    };

    Ok(AdsorbateOutputs {
        curve,
        predictions,
        saturation_curve,
        density_curve,
        enthalpy,
    })
}

/// Write every output of one adsorbate below `dir`, in output units.
pub fn write_outputs(
    dir: &Path,
    resolved: &ResolvedAdsorbate,
    outputs: &AdsorbateOutputs,
) -> AppResult<Vec<PathBuf>> {
    let units = &resolved.output_units;
    let mut files = Vec::new();

    write_pairs(
        &dir.join("characteristic_curve.dat"),
        &format!("characteristic curve of {}", resolved.name),
        units,
        (QuantityKind::Potential, QuantityKind::Volume),
        &outputs.curve.to_pairs(),
        &mut files,
    )?;

    for result in &outputs.predictions {
        write_pairs(
            &dir.join("predictions").join(format!("{}.dat", file_name(&result.name))),
            &format!("{} {}", resolved.name, result.kind),
            units,
            result.kind.columns(),
            &result.points,
            &mut files,
        )?;
    }

    if let Some(points) = &outputs.saturation_curve {
        write_pairs(
            &dir.join("saturation_pressure.dat"),
            "saturation pressure",
            units,
            (QuantityKind::Temperature, QuantityKind::Pressure),
            points,
            &mut files,
        )?;
    }
    if let Some(points) = &outputs.density_curve {
        write_pairs(
            &dir.join("density.dat"),
            "adsorbed phase density",
            units,
            (QuantityKind::Temperature, QuantityKind::Density),
            points,
            &mut files,
        )?;
    }
    if let Some(points) = &outputs.enthalpy {
        write_pairs(
            &dir.join("enthalpy.dat"),
            "isosteric adsorption enthalpy",
            units,
            (QuantityKind::Loading, QuantityKind::Potential),
            points,
            &mut files,
        )?;
    }

    tracing::info!(adsorbate = %resolved.name, files = files.len(), dir = %dir.display(), "wrote outputs");
    Ok(files)
}

fn write_pairs(
    path: &Path,
    title: &str,
    units: &UnitContext,
    columns: (QuantityKind, QuantityKind),
    points: &[(f64, f64)],
    files: &mut Vec<PathBuf>,
) -> AppResult<()> {
    let converted = units
        .pairs_from_base(columns, points)
        .map_err(|err| AppError::InvalidInput(err.to_string()))?;
    let header = format!("{title}\n{}", units.header(columns));
    ap_project::write_two_column(path, &header, &converted).map_err(|err| AppError::OutputWrite {
        path: path.to_path_buf(),
        message: err.to_string(),
    })?;
    files.push(path.to_path_buf());
    Ok(())
}

/// Summary of a configuration that loaded and resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationReport {
    pub name: String,
    /// Per adsorbate: dataset count and prediction count, or the error
    pub adsorbates: Vec<(String, Result<(usize, usize), String>)>,
}

impl ValidationReport {
    pub fn is_valid(&self) -> bool {
        self.adsorbates.iter().all(|(_, status)| status.is_ok())
    }
}

/// Load and resolve the configuration without computing anything.
pub fn validate(config_path: &Path) -> AppResult<ValidationReport> {
    let config = ap_project::load_config(config_path)?;
    let adsorbates = config
        .adsorbates
        .iter()
        .map(|def| {
            let status = resolve_adsorbate(def, config_path)
                .map(|r| (r.datasets.len(), r.predictions.len()))
                .map_err(|err| err.to_string());
            (def.name.clone(), status)
        })
        .collect();
    Ok(ValidationReport {
        name: config.name,
        adsorbates,
    })
}

/// Replace characters that do not belong in a file name.
fn file_name(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_names_are_sanitized() {
        assert_eq!(file_name("isotherm 318 K"), "isotherm_318_K");
        assert_eq!(file_name("a/b"), "a_b");
        assert_eq!(file_name("isotherm_318.5"), "isotherm_318.5");
    }
}
