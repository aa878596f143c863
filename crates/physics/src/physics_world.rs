//! Static collision world with Rapier3D.

use engine_core::Vec3;
use rapier3d::prelude::*;

/// Collision world holding the level's fixed colliders and the query
/// pipeline used to query them. Nothing here is ever stepped; the world only
/// answers overlap queries.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub query_pipeline: QueryPipeline,
    dirty: bool,
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl PhysicsWorld {
    pub fn new() -> Self {
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            query_pipeline: QueryPipeline::new(),
            dirty: false,
        }
    }

    /// Add a static axis-aligned box. No parent body; the collider is fixed in world.
    /// `center`: world position of the box center. `half_extents`: half sizes in X, Y, Z.
    pub fn add_static_cuboid(&mut self, center: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![center.x, center.y, center.z])
            .build();
        self.dirty = true;
        self.collider_set.insert(collider)
    }

    /// Update query pipeline after colliders changed.
    pub fn update_query_pipeline(&mut self) {
        if self.dirty {
            self.query_pipeline.update(&self.collider_set);
            self.dirty = false;
        }
    }

    /// Whether any collider intersects a sphere. Requires an up-to-date pipeline.
    pub fn overlaps_sphere(&self, center: Vec3, radius: f32) -> bool {
        debug_assert!(!self.dirty, "query pipeline is stale");

        let shape = Ball::new(radius);
        let shape_pos = Isometry::translation(center.x, center.y, center.z);
        let filter = QueryFilter::default();

        let mut hit = false;
        self.query_pipeline.intersections_with_shape(
            &self.rigid_body_set,
            &self.collider_set,
            &shape_pos,
            &shape,
            filter,
            |_collider| {
                hit = true;
                false // First hit is enough
            },
        );
        hit
    }

    pub fn collider_count(&self) -> usize {
        self.collider_set.len()
    }
}
