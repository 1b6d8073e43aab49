//! Volume-bearing shape with a pose
//!
//! Geometry math lives outside this crate; the composition algebra only
//! needs to know how much space a material encloses and where it sits.

use glam::{Quat, Vec3};
use serde::{Deserialize, Serialize};

/// An opaque shape: an enclosed volume plus a pose.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    /// Enclosed volume (m³).
    pub volume: f64,
    /// Position of the shape origin in world space.
    pub position: Vec3,
    /// Orientation.
    pub rotation: Quat,
}

impl Shape {
    pub fn with_volume(volume: f64) -> Self {
        Self {
            volume: volume.max(0.0),
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }

    pub fn at(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotated(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    /// Copy of this shape holding a fraction of the volume, same pose.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            volume: self.volume * factor.max(0.0),
            position: self.position,
            rotation: self.rotation,
        }
    }
}

impl Default for Shape {
    fn default() -> Self {
        Self::with_volume(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_volume_clamps_negative() {
        assert_eq!(Shape::with_volume(-2.0).volume, 0.0);
    }

    #[test]
    fn test_scaled_keeps_pose() {
        let shape = Shape::with_volume(8.0).at(Vec3::new(1.0, 2.0, 3.0));
        let half = shape.scaled(0.5);
        assert_eq!(half.volume, 4.0);
        assert_eq!(half.position, shape.position);
        assert_eq!(half.rotation, shape.rotation);
    }
}
