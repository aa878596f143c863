//! Projectile flight and hit resolution against the enemy roster.

use engine_core::{Health, Transform, Vec3};
use hecs::{Entity, World};

use crate::enemy::Enemy;
use crate::events::{CombatEvent, DeathEvent, ProjectileSpawn};
use crate::pool::{Pool, PoolHandle};
use crate::projectile::Projectile;

pub const DEFAULT_HIT_RADIUS: f32 = 1.0;

/// Owns the projectile pool and the list of projectiles in flight.
pub struct CombatLoop {
    pool: Pool<Projectile>,
    active: Vec<PoolHandle>,
    hit_radius: f32,
}

struct Hit {
    enemy: Entity,
    position: Vec3,
    remaining_health: f32,
    killed: bool,
}

impl CombatLoop {
    pub fn new(pool_initial: usize, pool_max: usize, hit_radius: f32) -> Self {
        Self {
            pool: Pool::new(pool_initial, pool_max),
            active: Vec::new(),
            hit_radius,
        }
    }

    /// Put a projectile into flight.
    pub fn spawn(&mut self, spawn: &ProjectileSpawn) -> PoolHandle {
        let handle = self.pool.acquire();
        if let Some(projectile) = self.pool.get_mut(handle) {
            projectile.launch(spawn);
        }
        self.active.push(handle);
        handle
    }

    /// Advance every projectile by `dt` and resolve hits.
    ///
    /// Expired projectiles never hit. A live projectile damages at most one
    /// enemy, the first found within the hit radius. Killed enemies are
    /// despawned at once, so no later projectile this frame can strike them.
    pub fn step(&mut self, world: &mut World, dt: f32) -> Vec<CombatEvent> {
        let mut events = Vec::new();
        let mut i = 0;

        while i < self.active.len() {
            let handle = self.active[i];
            let Some(projectile) = self.pool.get_mut(handle) else {
                log::warn!("Active list held a released projectile {:?}", handle);
                self.active.swap_remove(i);
                continue;
            };

            projectile.advance(dt);
            if !projectile.is_active() {
                events.push(CombatEvent::ProjectileExpired {
                    position: projectile.position,
                });
                self.retire(i);
                continue;
            }

            let position = projectile.position;
            let damage = projectile.damage;
            let Some(hit) = strike_first_enemy(world, position, damage, self.hit_radius) else {
                i += 1;
                continue;
            };
            projectile.deactivate();

            events.push(CombatEvent::EnemyHit {
                enemy: hit.enemy,
                damage,
                remaining_health: hit.remaining_health,
            });
            if hit.killed {
                if let Err(e) = world.despawn(hit.enemy) {
                    log::warn!("Killed enemy {:?} already gone: {}", hit.enemy, e);
                }
                events.push(CombatEvent::EnemyKilled(DeathEvent {
                    enemy: hit.enemy,
                    position: hit.position,
                }));
            }
            self.retire(i);
        }

        events
    }

    /// Release the projectile at `active[i]` back to the pool.
    fn retire(&mut self, i: usize) {
        let handle = self.active.swap_remove(i);
        self.pool.release(handle);
    }

    /// Return every projectile in flight to the pool.
    pub fn clear(&mut self) {
        for handle in self.active.drain(..) {
            self.pool.release(handle);
        }
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Projectiles in flight, e.g. for drawing tracers.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> + '_ {
        self.active.iter().filter_map(|&h| self.pool.get(h))
    }

    pub fn pool(&self) -> &Pool<Projectile> {
        &self.pool
    }

    pub fn hit_radius(&self) -> f32 {
        self.hit_radius
    }
}

fn strike_first_enemy(world: &mut World, position: Vec3, damage: f32, radius: f32) -> Option<Hit> {
    for (entity, (transform, health, _)) in world.query_mut::<(&Transform, &mut Health, &Enemy)>() {
        if health.is_dead() || transform.position.distance(position) >= radius {
            continue;
        }
        let killed = health.take_damage(damage);
        return Some(Hit {
            enemy: entity,
            position: transform.position,
            remaining_health: health.current,
            killed,
        });
    }
    None
}
