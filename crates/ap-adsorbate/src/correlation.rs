//! Temperature correlations shared by the saturation-pressure and density
//! estimators.

use std::fmt;

use ap_core::{ApError, ApResult, Diagnostics, Sweep};

/// Closed temperature interval on which a correlation is trusted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Validity {
    pub t_min: f64,
    pub t_max: f64,
}

impl Validity {
    pub const UNBOUNDED: Validity = Validity {
        t_min: 0.0,
        t_max: f64::INFINITY,
    };

    pub fn new(t_min: f64, t_max: f64) -> Self {
        Self { t_min, t_max }
    }

    pub fn contains(&self, t: f64) -> bool {
        t >= self.t_min && t <= self.t_max
    }
}

impl fmt::Display for Validity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{} K, {} K]", self.t_min, self.t_max)
    }
}

/// A resolved property as a function of temperature.
///
/// Implementations are immutable after resolution and safe to share across
/// threads.
pub trait PropertyCorrelation: Send + Sync + fmt::Debug {
    /// Model name as written in configuration files.
    fn name(&self) -> &'static str;

    /// Physical quantity this correlation produces, e.g. `saturation pressure`.
    fn quantity(&self) -> &'static str;

    /// Value at temperature `t` [K] in the base unit of the quantity.
    fn value_at(&self, t: f64) -> ApResult<f64>;

    fn validity(&self) -> Validity;

    /// [`value_at`](Self::value_at), recording a non-fatal `OutOfRange` in
    /// `diags` when `t` lies outside the validity domain.
    fn evaluate(&self, t: f64, diags: &mut Diagnostics, scope: &str) -> ApResult<f64> {
        let validity = self.validity();
        if !validity.contains(t) {
            diags.push(
                format!("{scope}: {} ({})", self.quantity(), self.name()),
                ApError::OutOfRange {
                    what: self.quantity(),
                    value: t,
                    min: validity.t_min,
                    max: validity.t_max,
                },
            );
        }
        self.value_at(t)
    }
}

/// Sample `model` over `sweep` for diagnostic output.
///
/// Out-of-validity points are still produced and recorded; points that fail
/// to evaluate are recorded and skipped.
pub fn sample_curve(
    model: &dyn PropertyCorrelation,
    sweep: &Sweep,
    diags: &mut Diagnostics,
) -> Vec<(f64, f64)> {
    let mut points = Vec::with_capacity(sweep.num_points);
    for t in sweep.generate_points() {
        let scope = format!("{} curve at T = {t}", model.quantity());
        match model.evaluate(t, diags, &scope) {
            Ok(value) => points.push((t, value)),
            Err(err) => diags.push(scope, err),
        }
    }
    points
}
