//! ap-isotherms: closed set of analytic isotherm equations.
//!
//! Each [`IsothermKind`] is a pure function of pressure and a fixed parameter
//! tuple. Parameters are stored as rows, one row per named parameter; n-site
//! variants carry one column per site and sum the single-site terms.

pub mod kind;
pub mod model;

pub use kind::{IsothermKind, ParameterSchema};
pub use model::{IsothermModel, synthesize};
