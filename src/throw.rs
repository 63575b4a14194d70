//! Throw velocity from the last pointer displacement.

use crate::math::{Vector2, Vector3};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowResolver {
    /// Negative so a flick reads as a throw in the opposite screen direction.
    factor: f64,
}

impl ThrowResolver {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    /// Planar launch velocity for a pointer moving from `last` to `release`.
    pub fn resolve(&self, last: Vector2, release: Vector2) -> Vector2 {
        (release - last).scale(self.factor)
    }

    /// Overwrite the x/y velocity with the launch velocity; z is kept.
    pub fn apply(&self, velocity: Vector3, last: Vector2, release: Vector2) -> Vector3 {
        let launch = self.resolve(last, release);
        Vector3::new(launch.x, launch.y, velocity.z)
    }
}
