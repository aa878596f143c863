//! Transform component and utilities for spatial positioning.

use glam::{Quat, Vec3};

/// A 3D transform representing position and facing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
        }
    }
}

impl Transform {
    /// Create a new transform at the given position.
    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    /// Get the forward direction (negative Z in right-handed coordinates).
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// Yaw to face along `direction` projected on the ground plane.
    /// Directions with no horizontal component leave the rotation untouched.
    pub fn face_horizontal(&mut self, direction: Vec3) {
        let flat = flatten(direction);
        if flat.length_squared() > 0.0001 {
            self.rotation = Quat::from_rotation_arc(-Vec3::Z, flat.normalize());
        }
    }
}

/// Drop the vertical component of a vector.
#[inline]
pub fn flatten(v: Vec3) -> Vec3 {
    Vec3::new(v.x, 0.0, v.z)
}

/// Unit direction from `from` to `to` on the ground plane, or zero if they are
/// vertically aligned.
pub fn horizontal_direction(from: Vec3, to: Vec3) -> Vec3 {
    flatten(to - from).normalize_or_zero()
}
