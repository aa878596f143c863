//! Enemy components and spawning.

use engine_core::{Health, Transform, Vec3};
use hecs::{Entity, World};

use crate::ai::EnemyAi;
use crate::config::EnemySpawn;

/// Enemy component: perception ranges and patrol route.
#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    /// Below this distance an idle or patrolling enemy notices the player.
    pub detection_range: f32,
    /// Below this distance a chasing enemy starts attacking.
    pub attack_range: f32,
    /// Waypoints visited in order, wrapping to the first. May be empty.
    pub patrol_route: Vec<Vec3>,
}

impl Enemy {
    pub fn new(patrol_route: Vec<Vec3>) -> Self {
        Self {
            patrol_route,
            ..Default::default()
        }
    }

    pub fn has_patrol_route(&self) -> bool {
        !self.patrol_route.is_empty()
    }
}

impl Default for Enemy {
    fn default() -> Self {
        Self {
            detection_range: 25.0,
            attack_range: 3.0,
            patrol_route: Vec::new(),
        }
    }
}

/// Bundle of components for spawning an enemy.
pub struct EnemyBundle {
    pub transform: Transform,
    pub health: Health,
    pub enemy: Enemy,
    pub ai: EnemyAi,
}

impl EnemyBundle {
    pub fn new(position: Vec3, patrol_route: Vec<Vec3>) -> Self {
        Self {
            transform: Transform::from_position(position),
            health: Health::new(100.0),
            enemy: Enemy::new(patrol_route),
            ai: EnemyAi::default(),
        }
    }

    pub fn from_spawn(spawn: &EnemySpawn) -> Self {
        Self {
            transform: Transform::from_position(spawn.position),
            health: Health::new(spawn.max_health),
            enemy: Enemy {
                detection_range: spawn.detection_range,
                attack_range: spawn.attack_range,
                patrol_route: spawn.patrol.clone(),
            },
            ai: EnemyAi::default(),
        }
    }

    /// Spawn into the ECS world.
    pub fn spawn(self, world: &mut World) -> Entity {
        world.spawn((self.transform, self.health, self.enemy, self.ai))
    }
}

/// Number of enemies still in the world.
pub fn living_enemies(world: &World) -> usize {
    world
        .query::<(&Health, &Enemy)>()
        .iter()
        .filter(|(_, (health, _))| health.is_alive())
        .count()
}
