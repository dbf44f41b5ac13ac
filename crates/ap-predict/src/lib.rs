//! ap-predict: isotherm, isobar and isostere prediction from a characteristic
//! curve.
//!
//! Contains:
//! - request (prediction requests, grids and results)
//! - engine (prediction context + solver)
//! - enthalpy (isosteric adsorption enthalpy)

pub mod engine;
pub mod enthalpy;
pub mod request;

pub use engine::{PredictionContext, predict};
pub use enthalpy::{adsorption_enthalpy, vaporization_enthalpy};
pub use request::{FreeVariable, PredictionKind, PredictionRequest, PredictionResult, Range};
