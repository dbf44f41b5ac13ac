//! Characteristic curve and its interpolator.

use ap_core::{ApError, ApResult, lerp};

/// One (potential, volume) pair: kJ/mol, ml/g.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharacteristicPoint {
    pub potential: f64,
    pub volume: f64,
}

impl CharacteristicPoint {
    pub fn new(potential: f64, volume: f64) -> Self {
        Self { potential, volume }
    }
}

/// Volume/potential lookup on a characteristic curve.
pub trait CurveInterpolator {
    /// Adsorbed volume at potential `a`; never negative.
    fn volume_at(&self, a: f64) -> f64;

    /// Potential at which volume `v` is adsorbed; never negative.
    fn potential_at(&self, v: f64) -> f64;

    /// Smallest and largest observed potential.
    fn potential_bounds(&self) -> (f64, f64);
}

/// Potential-sorted, pooled point set of one adsorbate.
///
/// Immutable after construction. Volume is expected to fall as potential
/// rises, but violations are kept and only counted.
#[derive(Debug, Clone, PartialEq)]
pub struct CharacteristicCurve {
    points: Vec<CharacteristicPoint>,
}

impl CharacteristicCurve {
    /// Sort by potential and drop repeated potentials, keeping the first
    /// occurrence. Fails with `EmptyCurve` below two distinct points.
    pub fn new(mut points: Vec<CharacteristicPoint>) -> ApResult<Self> {
        points.retain(|pt| pt.potential.is_finite() && pt.volume.is_finite());
        points.sort_by(|a, b| a.potential.total_cmp(&b.potential));
        points.dedup_by(|later, first| later.potential == first.potential);
        if points.len() < 2 {
            return Err(ApError::EmptyCurve {
                points: points.len(),
            });
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[CharacteristicPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn max_potential(&self) -> f64 {
        self.points[self.points.len() - 1].potential
    }

    /// Smallest and largest observed volume.
    pub fn volume_bounds(&self) -> (f64, f64) {
        self.points
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p.volume), hi.max(p.volume))
            })
    }

    /// Number of adjacent pairs whose volume grows with potential.
    pub fn monotonicity_violations(&self) -> usize {
        self.points
            .windows(2)
            .filter(|w| w[1].volume > w[0].volume)
            .count()
    }

    /// `(potential, volume)` rows for output.
    pub fn to_pairs(&self) -> Vec<(f64, f64)> {
        self.points.iter().map(|p| (p.potential, p.volume)).collect()
    }

    fn segment(&self, i: usize) -> (CharacteristicPoint, CharacteristicPoint) {
        (self.points[i], self.points[i + 1])
    }
}

impl CurveInterpolator for CharacteristicCurve {
    fn volume_at(&self, a: f64) -> f64 {
        let n = self.points.len();
        let i = match self.points.partition_point(|p| p.potential <= a) {
            0 => 0,
            k if k >= n => n - 2,
            k => k - 1,
        };
        let (p0, p1) = self.segment(i);
        lerp(a, p0.potential, p0.volume, p1.potential, p1.volume).max(0.0)
    }

    fn potential_at(&self, v: f64) -> f64 {
        for i in 0..self.points.len() - 1 {
            let (p0, p1) = self.segment(i);
            let (lo, hi) = (p0.volume.min(p1.volume), p0.volume.max(p1.volume));
            if v >= lo && v <= hi {
                return lerp(v, p0.volume, p0.potential, p1.volume, p1.potential).max(0.0);
            }
        }

        // Not bracketed: extend the boundary segment on the side of the
        // nearest volume extreme.
        let n = self.points.len();
        let (first, last) = (self.points[0], self.points[n - 1]);
        let (_, max_v) = self.volume_bounds();
        let use_first = if v > max_v {
            first.volume >= last.volume
        } else {
            first.volume <= last.volume
        };
        let (p0, p1) = if use_first {
            self.segment(0)
        } else {
            self.segment(n - 2)
        };
        if p0.volume == p1.volume {
            return if use_first { first.potential } else { last.potential };
        }
        lerp(v, p0.volume, p0.potential, p1.volume, p1.potential).max(0.0)
    }

    fn potential_bounds(&self) -> (f64, f64) {
        (self.points[0].potential, self.max_potential())
    }
}
