/// Fibonacci (golden angle) sampling of the globe surface
///
/// Produces `count` near-uniform points running from the north pole (y = +1)
/// to the south pole (y = -1), each turned a golden angle further around the
/// y axis than the previous one.

use crate::error::{GlobeError, GlobeResult};
use glam::DVec3;
use std::f64::consts::TAU;

/// Golden angle as a fraction of a full turn: π(√5 − 1) / 2π = (√5 − 1) / 2
const GOLDEN_TURN_FRACTION: f64 = 0.618_033_988_749_894_8;

/// A point on the unit sphere (y is up)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpherePoint {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

/// A [`SpherePoint`] scaled by the globe radius
pub type SurfacePosition = DVec3;

impl SpherePoint {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Unit point in the direction of `vector`; fails for the zero vector
    pub fn from_direction(vector: DVec3) -> GlobeResult<Self> {
        let unit = vector.try_normalize().ok_or_else(|| {
            GlobeError::invalid_argument(format!("cannot take the direction of {:?}", vector))
        })?;
        Ok(Self::new(unit.x, unit.y, unit.z))
    }

    pub fn as_vec3(&self) -> DVec3 {
        DVec3::new(self.x, self.y, self.z)
    }

    pub fn length(&self) -> f64 {
        self.as_vec3().length()
    }

    pub fn scaled(&self, radius: f64) -> SurfacePosition {
        self.as_vec3() * radius
    }
}

/// One generated sample: the unit point and its radius-scaled position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SphereSample {
    pub unit: SpherePoint,
    pub position: SurfacePosition,
}

/// Deterministic golden-spiral sampler
pub struct SphereSampler;

impl SphereSampler {
    /// Generate `count` samples on a sphere of `radius`
    ///
    /// `count == 0` yields an empty vector. `count == 1` has no defined spacing
    /// between the poles and is rejected, as is a non-positive radius.
    pub fn generate(count: usize, radius: f64) -> GlobeResult<Vec<SphereSample>> {
        Self::validate(count, radius)?;
        Ok((0..count)
            .map(|index| {
                let unit = Self::unit_point(index, count);
                SphereSample {
                    unit,
                    position: unit.scaled(radius),
                }
            })
            .collect())
    }

    /// The `index`-th unit point of a `count`-point spiral; caller guarantees `count >= 2`
    fn unit_point(index: usize, count: usize) -> SpherePoint {
        let y = 1.0 - (index as f64 / (count - 1) as f64) * 2.0;
        let radius_at_y = (1.0 - y * y).max(0.0).sqrt();

        // index * golden angle, reduced to one turn before the trig calls
        let theta = TAU * (index as f64 * GOLDEN_TURN_FRACTION).fract();

        SpherePoint::new(theta.cos() * radius_at_y, y, theta.sin() * radius_at_y)
    }

    fn validate(count: usize, radius: f64) -> GlobeResult<()> {
        if count == 1 {
            return Err(GlobeError::invalid_argument(
                "dot count must be 0 or at least 2 to span the poles",
            ));
        }
        if !radius.is_finite() || radius <= 0.0 {
            return Err(GlobeError::invalid_argument(format!(
                "sphere radius must be positive, got {}",
                radius
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use std::f64::consts::PI;

    fn golden_angle() -> f64 {
        PI * (5.0_f64.sqrt() - 1.0)
    }

    #[test]
    fn test_generate_count_and_radius() {
        let samples = SphereSampler::generate(500, 2.5).unwrap();
        assert_eq!(samples.len(), 500);

        for sample in &samples {
            assert_abs_diff_eq!(sample.unit.length(), 1.0, epsilon = 1e-9);
            assert_abs_diff_eq!(sample.position.length() / 2.5, 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_spiral_spans_both_poles() {
        let samples = SphereSampler::generate(100, 1.0).unwrap();
        let first = samples.first().unwrap().unit;
        let last = samples.last().unwrap().unit;

        assert_eq!(first.y, 1.0);
        assert_eq!(last.y, -1.0);
        assert_abs_diff_eq!(first.x, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(last.z, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_reduced_angle_matches_unbounded_angle() {
        // Small indices: reducing per step must not move the points
        let count = 1000;
        let samples = SphereSampler::generate(count, 1.0).unwrap();
        for (i, sample) in samples.iter().enumerate().take(200) {
            let theta = i as f64 * golden_angle();
            let y = 1.0 - (i as f64 / (count - 1) as f64) * 2.0;
            let r = (1.0 - y * y).sqrt();
            assert_abs_diff_eq!(sample.unit.x, theta.cos() * r, epsilon = 1e-9);
            assert_abs_diff_eq!(sample.unit.z, theta.sin() * r, epsilon = 1e-9);
        }
    }

    #[test]
    fn test_zero_count_is_empty() {
        assert!(SphereSampler::generate(0, 1.0).unwrap().is_empty());
    }

    #[test]
    fn test_single_dot_is_rejected() {
        let result = SphereSampler::generate(1, 1.0);
        assert!(matches!(result, Err(GlobeError::InvalidArgument { .. })));
    }

    #[test]
    fn test_bad_radius_is_rejected() {
        assert!(SphereSampler::generate(10, 0.0).is_err());
        assert!(SphereSampler::generate(10, -1.0).is_err());
        assert!(SphereSampler::generate(10, f64::NAN).is_err());
    }

    #[test]
    fn test_from_direction() {
        let point = SpherePoint::from_direction(DVec3::new(0.0, 3.0, 0.0)).unwrap();
        assert_eq!(point, SpherePoint::new(0.0, 1.0, 0.0));
        assert!(SpherePoint::from_direction(DVec3::ZERO).is_err());
    }
}
