//! Walkability queries consumed by AI and player movement.

use engine_core::Vec3;

/// Answers whether a point in the level is unobstructed.
///
/// Implementations must be pure: asking never changes the answer to a later
/// query.
pub trait SpatialQuery {
    fn is_walkable(&self, position: Vec3) -> bool;
}

impl<F> SpatialQuery for F
where
    F: Fn(Vec3) -> bool,
{
    fn is_walkable(&self, position: Vec3) -> bool {
        self(position)
    }
}

/// Level with no obstacles at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGround;

impl SpatialQuery for OpenGround {
    fn is_walkable(&self, _position: Vec3) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn closures_are_spatial_queries() {
        let positive_x = |p: Vec3| p.x > 0.0;
        assert!(positive_x.is_walkable(Vec3::new(1.0, 0.0, 0.0)));
        assert!(!positive_x.is_walkable(Vec3::new(-1.0, 0.0, 0.0)));
        assert!(OpenGround.is_walkable(Vec3::splat(1e6)));
    }
}
