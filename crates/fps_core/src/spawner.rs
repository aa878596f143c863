//! Level population from the configured roster.

use hecs::{Entity, World};
use physics::SpatialQuery;

use crate::config::EnemySpawn;
use crate::enemy::EnemyBundle;

/// Spawn every enemy in `roster`, returning their entities in roster order.
///
/// Placements the level reports as blocked are still spawned, with a warning:
/// such an enemy cannot move until the player comes to it.
pub fn spawn_roster<S: SpatialQuery + ?Sized>(world: &mut World, roster: &[EnemySpawn], spatial: &S) -> Vec<Entity> {
    let entities: Vec<Entity> = roster
        .iter()
        .enumerate()
        .map(|(i, spawn)| {
            if !spatial.is_walkable(spawn.position) {
                log::warn!("Enemy {} spawns inside level geometry at {}", i, spawn.position);
            }
            for (w, point) in spawn.patrol.iter().enumerate() {
                if !spatial.is_walkable(*point) {
                    log::warn!("Enemy {} patrol point {} at {} is not walkable", i, w, point);
                }
            }
            EnemyBundle::from_spawn(spawn).spawn(world)
        })
        .collect();

    log::info!("Spawned {} enemies", entities.len());
    entities
}
