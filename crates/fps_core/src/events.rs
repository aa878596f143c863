//! Notifications raised by the simulation core.
//!
//! Nothing here is delivered through callbacks: weapons queue events, the
//! combat loop and AI return them, and [`crate::Simulation`] gathers a frame's
//! worth into a [`crate::FrameReport`].

use engine_core::Entity;
use glam::Vec3;

use crate::ai::AiKind;
use crate::weapons::{Tracer, WeaponType};

/// Request to put one projectile into flight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileSpawn {
    pub position: Vec3,
    /// Unit direction of travel.
    pub direction: Vec3,
    pub speed: f32,
    pub damage: f32,
    pub range: f32,
    pub tracer: Tracer,
}

/// Advisory weapon notifications, for HUD display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponEvent {
    AmmoChanged {
        weapon: WeaponType,
        magazine: u32,
        reserve: u32,
    },
    Switched {
        index: usize,
        weapon: WeaponType,
    },
}

/// Raised exactly once, the moment an enemy's health reaches zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeathEvent {
    pub enemy: Entity,
    pub position: Vec3,
}

/// Outcome of resolving projectiles for one frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CombatEvent {
    EnemyHit {
        enemy: Entity,
        damage: f32,
        remaining_health: f32,
    },
    EnemyKilled(DeathEvent),
    /// Projectile reached its maximum range without hitting anything.
    ProjectileExpired { position: Vec3 },
}

/// An enemy's AI changed state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AiTransition {
    pub enemy: Entity,
    pub from: AiKind,
    pub to: AiKind,
}
