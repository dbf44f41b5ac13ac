use crate::ApError;

/// Reject NaN and infinities.
pub fn ensure_finite(v: f64, what: &'static str) -> Result<f64, ApError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(ApError::NonFinite { what, value: v })
    }
}

/// Ensure a value is strictly positive and finite.
pub fn ensure_positive(v: f64, what: &'static str) -> Result<f64, ApError> {
    let v = ensure_finite(v, what)?;
    if v <= 0.0 {
        return Err(ApError::domain(format!("{what} must be positive, got {v}")));
    }
    Ok(v)
}

/// Linear interpolation between `(x0, y0)` and `(x1, y1)`.
///
/// Extrapolates along the same line when `x` lies outside `[x0, x1]`.
/// A degenerate segment (`x0 == x1`) returns `y0`.
pub fn lerp(x: f64, x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    let dx = x1 - x0;
    if dx == 0.0 {
        return y0;
    }
    y0 + (y1 - y0) * (x - x0) / dx
}
