//! ap-adsorbate: bulk-adsorbate properties as functions of temperature.
//!
//! Contains:
//! - properties (molecular property record)
//! - table (tabulated data with slope extrapolation)
//! - library (built-in saturation-pressure tables)
//! - eos (Peng-Robinson family equations of state)
//! - saturation (saturation-pressure estimator)
//! - density (adsorbed-phase density estimator)
//! - correlation (shared temperature-correlation trait + diagnostic sampling)

pub mod correlation;
pub mod density;
pub mod eos;
pub mod library;
pub mod properties;
pub mod saturation;
pub mod table;

pub use correlation::{PropertyCorrelation, Validity, sample_curve};
pub use density::{AdsorbateDensity, DEFAULT_EXPANSION, DensityModel};
pub use eos::{AlphaFunction, AlphaKind, CubicEos, EosSolverConfig};
pub use library::{library_names, saturation_table};
pub use properties::{MolecularProperties, Property};
pub use saturation::{SaturationModel, SaturationPressure, SupercriticalPolicy};
pub use table::Table;
