//! Pooled projectile with traveled-distance expiry.

use glam::Vec3;

use crate::events::ProjectileSpawn;
use crate::pool::Poolable;
use crate::weapons::Tracer;

/// A moving point. Storage is owned by the projectile pool; a projectile is
/// relaunched from a [`ProjectileSpawn`] rather than constructed per shot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projectile {
    pub position: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
    pub max_range: f32,
    pub tracer: Tracer,
    origin: Vec3,
    distance_traveled: f32,
    active: bool,
}

impl Projectile {
    /// Re-initialize from a spawn request and mark active.
    pub fn launch(&mut self, spawn: &ProjectileSpawn) {
        self.position = spawn.position;
        self.origin = spawn.position;
        self.velocity = spawn.direction * spawn.speed;
        self.damage = spawn.damage;
        self.max_range = spawn.range;
        self.tracer = spawn.tracer;
        self.distance_traveled = 0.0;
        self.active = true;
    }

    /// Move along the velocity and expire once max range is covered.
    pub fn advance(&mut self, dt: f32) {
        if !self.active {
            return;
        }

        self.position += self.velocity * dt;
        self.distance_traveled = self.origin.distance(self.position);

        if self.distance_traveled >= self.max_range {
            self.active = false;
        }
    }

    /// Take the projectile out of play, e.g. after it hit something.
    pub fn deactivate(&mut self) {
        self.active = false;
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn distance_traveled(&self) -> f32 {
        self.distance_traveled
    }

    pub fn origin(&self) -> Vec3 {
        self.origin
    }
}

impl Poolable for Projectile {
    fn inert() -> Self {
        Self {
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            damage: 0.0,
            max_range: 0.0,
            tracer: Tracer::default(),
            origin: Vec3::ZERO,
            distance_traveled: 0.0,
            active: false,
        }
    }

    fn reset(&mut self) {
        *self = Self::inert();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spawn(speed: f32, range: f32) -> ProjectileSpawn {
        ProjectileSpawn {
            position: Vec3::new(5.0, 1.0, 5.0),
            direction: Vec3::X,
            speed,
            damage: 20.0,
            range,
            tracer: Tracer::Yellow,
        }
    }

    #[test]
    fn expires_exactly_at_max_range() {
        let mut p = Projectile::inert();
        p.launch(&spawn(25.0, 50.0));

        p.advance(1.0);
        assert!(p.is_active());
        assert_eq!(p.distance_traveled(), 25.0);

        p.advance(1.0);
        assert!(!p.is_active());
        assert_eq!(p.distance_traveled(), 50.0);
    }

    #[test]
    fn speed_fifty_range_fifty_expires_after_one_second() {
        let mut p = Projectile::inert();
        p.launch(&spawn(50.0, 50.0));
        p.advance(0.5);
        assert!(p.is_active());
        p.advance(0.5);
        assert!(!p.is_active());
    }

    #[test]
    fn inactive_projectile_does_not_move() {
        let mut p = Projectile::inert();
        p.launch(&spawn(10.0, 100.0));
        p.deactivate();
        let before = p.position;
        p.advance(1.0);
        assert_eq!(p.position, before);
    }

    #[test]
    fn reset_returns_to_inert() {
        let mut p = Projectile::inert();
        p.launch(&spawn(10.0, 100.0));
        p.advance(0.3);
        p.reset();
        assert_eq!(p, Projectile::inert());
    }
}
