//! Static level collision for the simulation, backed by Rapier3D.
//!
//! The simulation core only ever asks one question of the level: "can an
//! actor stand here?". That contract is [`SpatialQuery`]; [`LevelGeometry`]
//! answers it for the arena using Rapier's query pipeline.

pub mod level;
pub mod physics_world;
pub mod spatial;

pub use level::*;
pub use physics_world::*;
pub use spatial::*;

// Re-export Rapier for downstream crates
pub use rapier3d;
