//! Math, timing and component types shared by the simulation crates.
//!
//! Nothing here knows about weapons or enemies: [`Transform`] and the
//! ground-plane helpers, the [`Health`] component, and [`FrameClock`] for
//! fixed-step updates.

pub mod components;
pub mod time;
pub mod transform;

pub use components::*;
pub use time::*;
pub use transform::*;

pub use glam::{Quat, Vec2, Vec3};
pub use hecs::{Entity, World};
