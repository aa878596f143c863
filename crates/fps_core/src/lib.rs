//! Simulation core of a first-person shooter: weapons, pooled projectiles,
//! enemy AI and the frame loop that ties them together.
//!
//! The core is headless and frame-driven. Callers feed [`PlayerInput`] into
//! [`Simulation::step`] with a frame delta and read back a [`FrameReport`];
//! level geometry is supplied through [`physics::SpatialQuery`].

pub mod ai;
pub mod combat;
pub mod config;
pub mod enemy;
pub mod error;
pub mod events;
pub mod player;
pub mod pool;
pub mod projectile;
pub mod spawner;
pub mod state;
pub mod weapons;

pub use ai::{AiKind, AiState, AiTuning, EnemyAi};
pub use combat::CombatLoop;
pub use config::{EnemySpawn, SimConfig};
pub use enemy::{Enemy, EnemyBundle};
pub use error::ConfigError;
pub use events::{AiTransition, CombatEvent, DeathEvent, ProjectileSpawn, WeaponEvent};
pub use player::PlayerController;
pub use pool::{Pool, PoolHandle, Poolable};
pub use projectile::Projectile;
pub use state::{EnemySnapshot, FrameReport, GamePhase, Look, PlayerInput, Simulation, WeaponCycle};
pub use weapons::{Tracer, WeaponCatalog, WeaponController, WeaponDefinition, WeaponType};
