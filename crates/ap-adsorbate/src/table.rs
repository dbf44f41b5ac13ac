//! Tabulated (T, value) data with linear interpolation.

use ap_core::{ApError, ApResult, lerp};

/// Sorted table of `(x, y)` samples with at least two distinct abscissae.
///
/// Inside the table the value is interpolated linearly; outside it the first
/// or last segment is extended with its own slope.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    xs: Vec<f64>,
    ys: Vec<f64>,
}

impl Table {
    /// Build a table from unsorted samples. Repeated abscissae keep the first
    /// sample.
    pub fn new(mut points: Vec<(f64, f64)>) -> ApResult<Self> {
        if let Some((x, y)) = points.iter().find(|(x, y)| !x.is_finite() || !y.is_finite()) {
            return Err(ApError::domain(format!("table sample ({x}, {y}) is not finite")));
        }
        points.sort_by(|a, b| a.0.total_cmp(&b.0));
        points.dedup_by(|b, a| a.0 == b.0);
        if points.len() < 2 {
            return Err(ApError::invalid_range(format!(
                "table needs at least 2 distinct points, got {}",
                points.len()
            )));
        }
        let (xs, ys) = points.into_iter().unzip();
        Ok(Self { xs, ys })
    }

    pub fn len(&self) -> usize {
        self.xs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.xs.is_empty()
    }

    pub fn bounds(&self) -> (f64, f64) {
        (self.xs[0], self.xs[self.xs.len() - 1])
    }

    pub fn points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.xs.iter().copied().zip(self.ys.iter().copied())
    }

    /// Interpolated or slope-extrapolated value at `x`.
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.xs.len();
        let i = match self.xs.partition_point(|&xi| xi <= x) {
            0 => 0,
            k if k >= n => n - 2,
            k => k - 1,
        };
        lerp(x, self.xs[i], self.ys[i], self.xs[i + 1], self.ys[i + 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interpolates_and_extrapolates() {
        let table = Table::new(vec![(20.0, 4.0), (0.0, 0.0), (10.0, 2.0)]).unwrap();
        assert_eq!(table.bounds(), (0.0, 20.0));
        assert!((table.eval(5.0) - 1.0).abs() < 1e-12);
        assert!((table.eval(20.0) - 4.0).abs() < 1e-12);
        assert!((table.eval(-10.0) + 2.0).abs() < 1e-12);
        assert!((table.eval(30.0) - 6.0).abs() < 1e-12);
    }

    #[test]
    fn duplicate_abscissa_keeps_first() {
        let table = Table::new(vec![(0.0, 0.0), (1.0, 1.0), (1.0, 5.0), (2.0, 2.0)]).unwrap();
        assert_eq!(table.len(), 3);
        assert!((table.eval(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn too_few_points() {
        assert!(matches!(
            Table::new(vec![(1.0, 1.0), (1.0, 2.0)]),
            Err(ApError::InvalidRange { .. })
        ));
    }
}
