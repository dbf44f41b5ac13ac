use thiserror::Error;

use crate::units::QuantityKind;

pub type ApResult<T> = Result<T, ApError>;

/// Error taxonomy shared by every crate of the engine.
///
/// Configuration-level variants (`UnknownUnit`, `UnsupportedModel`,
/// `MissingProperty`, `InvalidParameterCount`, `InvalidRange`) are fatal at
/// model-resolution time. `DomainError`, `OutOfRange` and `ConvergenceError`
/// are usually recorded in [`crate::Diagnostics`] and the pipeline continues.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ApError {
    #[error("Unknown unit '{unit}' for {kind}")]
    UnknownUnit { unit: String, kind: QuantityKind },

    #[error("Unsupported model '{name}' ({family})")]
    UnsupportedModel { name: String, family: &'static str },

    #[error("Missing molecular property: {property}")]
    MissingProperty { property: &'static str },

    #[error("Invalid parameter count for {model}: expected {expected}, got {got}")]
    InvalidParameterCount {
        model: &'static str,
        expected: String,
        got: String,
    },

    #[error("Invalid range: {what}")]
    InvalidRange { what: String },

    #[error("Domain error: {what}")]
    DomainError { what: String },

    #[error("Out of range: {what} = {value} outside [{min}, {max}]")]
    OutOfRange {
        what: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    #[error("Convergence failed for {what} after {iterations} iterations (residual {residual:e})")]
    ConvergenceError {
        what: &'static str,
        iterations: usize,
        residual: f64,
    },

    #[error("Characteristic curve is not monotone: {violations} segment(s) gain volume with rising potential")]
    NonMonotoneCurve { violations: usize },

    #[error("Characteristic curve needs at least two points, got {points}")]
    EmptyCurve { points: usize },

    #[error("Non-finite numeric value for {what}: {value}")]
    NonFinite { what: &'static str, value: f64 },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },
}

impl ApError {
    /// Whether the error aborts the adsorbate it belongs to.
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            Self::UnknownUnit { .. }
                | Self::UnsupportedModel { .. }
                | Self::MissingProperty { .. }
                | Self::InvalidParameterCount { .. }
                | Self::InvalidRange { .. }
        )
    }

    pub fn domain(what: impl Into<String>) -> Self {
        Self::DomainError { what: what.into() }
    }

    pub fn invalid_range(what: impl Into<String>) -> Self {
        Self::InvalidRange { what: what.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ApError::UnknownUnit {
            unit: "furlong".into(),
            kind: QuantityKind::Pressure,
        };
        assert!(err.to_string().contains("furlong"));
        assert!(err.to_string().contains("pressure"));

        let err = ApError::ConvergenceError {
            what: "isostere temperature",
            iterations: 100,
            residual: 1e-3,
        };
        assert!(err.to_string().contains("100 iterations"));
    }

    #[test]
    fn configuration_errors_are_classified() {
        assert!(ApError::MissingProperty { property: "acentric_factor" }.is_configuration_error());
        assert!(ApError::invalid_range("p_min >= p_max").is_configuration_error());
        assert!(!ApError::domain("log of zero").is_configuration_error());
        assert!(!ApError::EmptyCurve { points: 1 }.is_configuration_error());
    }
}
