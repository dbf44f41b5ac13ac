//! Application service layer for the adsorption-potential engine.
//!
//! Turns a run configuration into core inputs, drives curve construction and
//! prediction per adsorbate, and writes the results.

pub mod catalog;
pub mod error;
pub mod resolve;
pub mod run_service;
pub mod units;

pub use catalog::{ModelEntry, ModelFamily, model_catalog};
pub use error::{AppError, AppResult};
pub use resolve::{EnthalpyRequest, ResolvedAdsorbate, ResolvedDataset, resolve_adsorbate};
pub use run_service::{
    AdsorbateOutputs, AdsorbateReport, AdsorbateStatus, AdsorbateSummary, PredictionSummary,
    RunOptions, RunReport, RunRequest, ValidationReport, compute_adsorbate, run, validate,
    write_outputs,
};
pub use units::UnitContext;
