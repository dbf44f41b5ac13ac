//! Non-fatal problems collected while running a pipeline.
//!
//! A [`Diagnostics`] sink is passed explicitly through curve construction and
//! prediction. Each entry is also logged as a warning.

use std::fmt;

use crate::error::ApError;

/// One recorded problem and where it happened.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// Human-readable location, e.g. `dataset co2_273K point 4`
    pub scope: String,
    pub error: ApError,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.scope, self.error)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Diagnostics {
    entries: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, scope: impl Into<String>, error: ApError) {
        let scope = scope.into();
        tracing::warn!(scope = %scope, "{error}");
        self.entries.push(Diagnostic { scope, error });
    }

    pub fn extend(&mut self, other: Diagnostics) {
        self.entries.extend(other.entries);
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of entries whose error matches `pred`.
    pub fn count_where(&self, pred: impl Fn(&ApError) -> bool) -> usize {
        self.entries.iter().filter(|d| pred(&d.error)).count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.entries
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_and_count() {
        let mut diags = Diagnostics::new();
        diags.push("dataset a point 3", ApError::domain("p >= p0"));
        diags.push(
            "prediction 0",
            ApError::OutOfRange {
                what: "pressure",
                value: 20.0,
                min: 0.0,
                max: 10.0,
            },
        );
        assert_eq!(diags.len(), 2);
        assert_eq!(diags.count_where(|e| matches!(e, ApError::DomainError { .. })), 1);
        assert!(diags.entries()[0].to_string().starts_with("dataset a point 3"));
    }
}
