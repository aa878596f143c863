//! Arena collision: playable bounds plus static wall boxes.

use engine_core::Vec3;

use crate::{PhysicsWorld, SpatialQuery};

/// Radius of the test sphere used for walkability.
pub const ACTOR_RADIUS: f32 = 0.5;

/// A static box in the level.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Wall {
    pub center: Vec3,
    pub size: Vec3,
}

impl Wall {
    pub fn new(center: Vec3, size: Vec3) -> Self {
        Self { center, size }
    }
}

/// Square arena with walls, answering walkability through Rapier.
pub struct LevelGeometry {
    /// Minimum walkable X/Z coordinate.
    pub min: f32,
    /// Maximum walkable X/Z coordinate.
    pub max: f32,
    walls: Vec<Wall>,
    physics: PhysicsWorld,
}

impl LevelGeometry {
    /// Build a level from bounds and walls.
    pub fn new(min: f32, max: f32, walls: Vec<Wall>) -> Self {
        let mut physics = PhysicsWorld::new();
        for wall in &walls {
            physics.add_static_cuboid(wall.center, wall.size * 0.5);
        }
        physics.update_query_pipeline();
        log::debug!("Level built: {} walls, bounds {}..{}", walls.len(), min, max);
        Self {
            min,
            max,
            walls,
            physics,
        }
    }

    /// The 50x50 arena: four boundary walls and five interior pillars.
    pub fn arena() -> Self {
        let walls = vec![
            Wall::new(Vec3::new(25.0, 2.0, 0.0), Vec3::new(50.0, 4.0, 1.0)),
            Wall::new(Vec3::new(25.0, 2.0, 50.0), Vec3::new(50.0, 4.0, 1.0)),
            Wall::new(Vec3::new(0.0, 2.0, 25.0), Vec3::new(1.0, 4.0, 50.0)),
            Wall::new(Vec3::new(50.0, 2.0, 25.0), Vec3::new(1.0, 4.0, 50.0)),
            Wall::new(Vec3::new(15.0, 2.0, 15.0), Vec3::new(4.0, 4.0, 4.0)),
            Wall::new(Vec3::new(35.0, 2.0, 35.0), Vec3::new(4.0, 4.0, 4.0)),
            Wall::new(Vec3::new(15.0, 2.0, 35.0), Vec3::new(4.0, 4.0, 4.0)),
            Wall::new(Vec3::new(35.0, 2.0, 15.0), Vec3::new(4.0, 4.0, 4.0)),
            Wall::new(Vec3::new(25.0, 2.0, 25.0), Vec3::new(6.0, 4.0, 2.0)),
        ];
        Self::new(1.0, 49.0, walls)
    }

    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    fn in_bounds(&self, p: Vec3) -> bool {
        p.x >= self.min && p.x <= self.max && p.z >= self.min && p.z <= self.max
    }
}

impl SpatialQuery for LevelGeometry {
    fn is_walkable(&self, position: Vec3) -> bool {
        self.in_bounds(position) && !self.physics.overlaps_sphere(position, ACTOR_RADIUS)
    }
}
