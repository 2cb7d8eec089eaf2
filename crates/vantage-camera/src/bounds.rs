use serde::{Deserialize, Serialize};
use vantage_math::Vec3;

/// Radius substituted for empty or degenerate scene bounds.
pub const DEFAULT_BOUND_RADIUS: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f64,
}

impl BoundingSphere {
    pub const fn new(center: Vec3, radius: f64) -> Self {
        Self { center, radius }
    }

    /// Sphere circumscribing an axis-aligned box.
    pub fn from_bounds(min: Vec3, max: Vec3) -> Self {
        let center = (min + max) * 0.5;
        let radius = (max - min).length() * 0.5;
        Self { center, radius }
    }

    pub fn from_points(points: &[Vec3]) -> Option<Self> {
        let mut iter = points.iter();
        let first = *iter.next()?;
        let (min, max) = iter.fold((first, first), |(min, max), p| (min.min(*p), max.max(*p)));
        let center = (min + max) * 0.5;
        let radius = points
            .iter()
            .map(|p| (*p - center).length())
            .fold(0.0, f64::max);
        Some(Self { center, radius })
    }

    pub fn is_valid(&self) -> bool {
        self.radius > 0.0 && self.radius.is_finite()
    }

    /// Radius used for framing and clip planes; falls back to
    /// [`DEFAULT_BOUND_RADIUS`] when the sphere is empty.
    pub fn effective_radius(&self) -> f64 {
        if self.is_valid() {
            self.radius
        } else {
            DEFAULT_BOUND_RADIUS
        }
    }
}
