//! ap-core: shared foundation for the adsorption-potential engine.
//!
//! Contains:
//! - units (base units, unit conversion, physical constants)
//! - numeric (finiteness/positivity checks, linear interpolation)
//! - sweeps (evenly spaced ranges)
//! - roots (bounded bracketing and bisection)
//! - diagnostics (non-fatal problem sink)
//! - error (shared error taxonomy)

pub mod diagnostics;
pub mod error;
pub mod numeric;
pub mod roots;
pub mod sweeps;
pub mod units;

pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ApError, ApResult};
pub use numeric::{ensure_finite, ensure_positive, lerp};
pub use roots::{RootResult, SolverConfig, bisect, find_root, scan_bracket};
pub use sweeps::{Sweep, SweepType};
pub use units::{
    MOLAR_LOADING_UNITS, PhysicalQuantity, QuantityKind, constants, convert, convert_loading,
    validate_unit,
};
