//! ap-curve: characteristic curves from adsorption data.
//!
//! Contains:
//! - dataset (raw (x, y) data tagged with its kind and fixed condition)
//! - potential (Polanyi potential and adsorbed-volume relations)
//! - builder (dataset -> characteristic points, pooling)
//! - curve (sorted curve + linear interpolator/extrapolator)

pub mod builder;
pub mod curve;
pub mod dataset;
pub mod potential;

pub use builder::{CurveModels, build, build_pooled, build_points};
pub use curve::{CharacteristicCurve, CharacteristicPoint, CurveInterpolator};
pub use dataset::{DataKind, IsothermDataset, Observation};
pub use potential::{
    adsorbed_volume, adsorption_potential, loading_from_volume, pressure_at_potential,
};
