//! Player controller and state.

use engine_core::{Health, Quat, Transform, Vec3};
use glam::Vec2;
use physics::SpatialQuery;

use crate::weapons::{WeaponCatalog, WeaponController};

/// Pitch limit, just short of straight up or down.
const MAX_PITCH: f32 = 1.55;

/// Player controller handling movement, look and weapons.
pub struct PlayerController {
    pub transform: Transform,
    pub health: Health,
    pub move_speed: f32,
    pub weapons: WeaponController,
    yaw: f32,
    pitch: f32,
}

impl PlayerController {
    pub fn new(position: Vec3, max_health: f32, move_speed: f32, catalog: WeaponCatalog) -> Self {
        Self {
            transform: Transform::from_position(position),
            health: Health::new(max_health),
            move_speed,
            weapons: WeaponController::new(catalog),
            yaw: 0.0,
            pitch: 0.0,
        }
    }

    /// Get player position. Shots leave from here.
    pub fn position(&self) -> Vec3 {
        self.transform.position
    }

    pub fn yaw(&self) -> f32 {
        self.yaw
    }

    pub fn pitch(&self) -> f32 {
        self.pitch
    }

    /// Unit view direction. Yaw 0, pitch 0 looks down -Z.
    pub fn look_direction(&self) -> Vec3 {
        self.transform.forward()
    }

    /// Set absolute look angles in radians. Pitch is clamped.
    pub fn set_look(&mut self, yaw: f32, pitch: f32) {
        self.yaw = yaw.rem_euclid(std::f32::consts::TAU);
        self.pitch = pitch.clamp(-MAX_PITCH, MAX_PITCH);
        self.transform.rotation = Quat::from_rotation_y(self.yaw) * Quat::from_rotation_x(self.pitch);
    }

    /// Turn by relative angles, as from mouse movement.
    pub fn turn(&mut self, delta_yaw: f32, delta_pitch: f32) {
        self.set_look(self.yaw + delta_yaw, self.pitch + delta_pitch);
    }

    /// Aim at a world point. Ignored when the point is at the eye.
    pub fn look_at(&mut self, target: Vec3) {
        let Some(dir) = (target - self.position()).try_normalize() else {
            return;
        };
        let yaw = (-dir.x).atan2(-dir.z);
        let pitch = dir.y.clamp(-1.0, 1.0).asin();
        self.set_look(yaw, pitch);
    }

    /// Walk on the ground plane relative to the current yaw.
    ///
    /// `movement.y` is forward, `movement.x` strafes right. The step is taken
    /// only if its destination is walkable. Returns whether the player moved.
    pub fn walk<S: SpatialQuery + ?Sized>(&mut self, movement: Vec2, dt: f32, spatial: &S) -> bool {
        let forward = Vec3::new(-self.yaw.sin(), 0.0, -self.yaw.cos());
        let right = forward.cross(Vec3::Y);
        let direction = (forward * movement.y + right * movement.x).normalize_or_zero();
        if direction == Vec3::ZERO {
            return false;
        }

        let destination = self.position() + direction * self.move_speed * dt;
        if !spatial.is_walkable(destination) {
            return false;
        }
        self.transform.position = destination;
        true
    }

    /// Advance weapon timers.
    pub fn update(&mut self, dt: f32) {
        self.weapons.tick(dt);
    }

    /// Take damage. Returns `true` on the hit that kills.
    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.health.take_damage(amount)
    }

    /// Check if player is dead.
    pub fn is_dead(&self) -> bool {
        self.health.is_dead()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::OpenGround;
    use std::f32::consts::FRAC_PI_2;

    fn player() -> PlayerController {
        PlayerController::new(Vec3::new(5.0, 1.0, 5.0), 100.0, 6.0, WeaponCatalog::standard())
    }

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn walks_forward_at_move_speed() {
        let mut p = player();
        assert!(p.walk(Vec2::new(0.0, 1.0), 0.5, &OpenGround));
        assert!(close(p.position(), Vec3::new(5.0, 1.0, 2.0)));
    }

    #[test]
    fn strafe_follows_yaw() {
        let mut p = player();
        p.set_look(FRAC_PI_2, 0.0);
        // Facing -X, right is -Z.
        assert!(close(p.look_direction(), Vec3::new(-1.0, 0.0, 0.0)));
        p.walk(Vec2::new(1.0, 0.0), 1.0, &OpenGround);
        assert!(close(p.position(), Vec3::new(5.0, 1.0, -1.0)));
    }

    #[test]
    fn diagonal_input_is_normalized() {
        let mut p = player();
        p.walk(Vec2::new(1.0, 1.0), 1.0, &OpenGround);
        assert!((p.position().distance(Vec3::new(5.0, 1.0, 5.0)) - 6.0).abs() < 1e-4);
    }

    #[test]
    fn blocked_step_is_refused() {
        let mut p = player();
        let wall = |pos: Vec3| pos.z > 4.0;
        assert!(!p.walk(Vec2::new(0.0, 1.0), 0.5, &wall));
        assert_eq!(p.position(), Vec3::new(5.0, 1.0, 5.0));
    }

    #[test]
    fn look_at_points_view_at_target() {
        let mut p = player();
        let target = Vec3::new(15.0, 3.0, 12.0);
        p.look_at(target);
        let expected = (target - p.position()).normalize();
        assert!(close(p.look_direction(), expected));
    }

    #[test]
    fn pitch_is_clamped() {
        let mut p = player();
        p.turn(0.0, 10.0);
        assert_eq!(p.pitch(), MAX_PITCH);
    }

    #[test]
    fn damage_reports_death_once() {
        let mut p = player();
        assert!(!p.take_damage(60.0));
        assert!(p.take_damage(60.0));
        assert!(p.is_dead());
        assert!(!p.take_damage(10.0));
    }
}
