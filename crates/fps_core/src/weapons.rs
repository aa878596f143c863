//! Weapon definitions and the per-actor firing/reload state machine.

use glam::{Quat, Vec3};
use rand::Rng;

use crate::events::{ProjectileSpawn, WeaponEvent};

/// Distance in front of the firing origin where projectiles appear.
const MUZZLE_OFFSET: f32 = 0.5;

/// Weapon archetypes available to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponType {
    /// Sidearm - slow, accurate, plenty of spare magazines.
    Pistol,
    /// Assault rifle - high fire rate, medium damage.
    AssaultRifle,
    /// Shotgun - pellet spread, short range.
    Shotgun,
}

/// Visual tag the renderer uses to draw a projectile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tracer {
    #[default]
    Yellow,
    Orange,
    Red,
}

/// Immutable weapon data. Created once at startup and shared by value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeaponDefinition {
    pub weapon_type: WeaponType,
    pub name: &'static str,
    pub damage: f32,
    /// Seconds between shots.
    pub fire_interval: f32,
    pub magazine_size: u32,
    pub max_ammo: u32,
    pub reload_time: f32,
    pub range: f32,
    /// Maximum angular deviation per axis, in radians.
    pub spread: f32,
    pub projectile_speed: f32,
    pub pellets_per_shot: u32,
    pub tracer: Tracer,
}

impl WeaponDefinition {
    pub fn new(weapon_type: WeaponType) -> Self {
        let (name, damage, interval, magazine, max_ammo, reload, range, spread, speed, pellets, tracer) =
            match weapon_type {
                WeaponType::Pistol => ("Pistol", 20.0, 0.5, 12, 84, 1.5, 50.0, 0.05, 50.0, 1, Tracer::Yellow),
                WeaponType::AssaultRifle => {
                    ("Assault Rifle", 25.0, 0.1, 30, 180, 2.5, 100.0, 0.08, 60.0, 1, Tracer::Orange)
                }
                WeaponType::Shotgun => ("Shotgun", 15.0, 1.0, 8, 40, 3.0, 30.0, 0.15, 40.0, 8, Tracer::Red),
            };

        Self {
            weapon_type,
            name,
            damage,
            fire_interval: interval,
            magazine_size: magazine,
            max_ammo,
            reload_time: reload,
            range,
            spread,
            projectile_speed: speed,
            pellets_per_shot: pellets,
            tracer,
        }
    }
}

/// Ordered roster of weapons an actor can cycle through.
#[derive(Debug, Clone, PartialEq)]
pub struct WeaponCatalog {
    weapons: Vec<WeaponDefinition>,
}

impl WeaponCatalog {
    /// Pistol, assault rifle, shotgun, in slot order.
    pub fn standard() -> Self {
        Self::with_definitions(vec![
            WeaponDefinition::new(WeaponType::Pistol),
            WeaponDefinition::new(WeaponType::AssaultRifle),
            WeaponDefinition::new(WeaponType::Shotgun),
        ])
    }

    pub fn with_definitions(weapons: Vec<WeaponDefinition>) -> Self {
        assert!(!weapons.is_empty(), "weapon catalog must hold at least one weapon");
        Self { weapons }
    }

    pub fn get(&self, index: usize) -> Option<&WeaponDefinition> {
        self.weapons.get(index)
    }

    pub fn len(&self) -> usize {
        self.weapons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.weapons.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &WeaponDefinition> {
        self.weapons.iter()
    }
}

impl Default for WeaponCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Firing, reload and weapon-switch state for one combatant.
///
/// Invalid requests (firing while reloading or empty, reloading a full
/// magazine, switching to a bad slot) are ignored rather than reported.
/// Ammo and switch notifications queue up until [`drain_events`](Self::drain_events).
#[derive(Debug, Clone)]
pub struct WeaponController {
    catalog: WeaponCatalog,
    index: usize,
    current_ammo: u32,
    reserve_ammo: u32,
    time_since_shot: f32,
    reload_timer: f32,
    is_reloading: bool,
    events: Vec<WeaponEvent>,
}

impl WeaponController {
    /// Create a controller with the first catalog slot equipped.
    pub fn new(catalog: WeaponCatalog) -> Self {
        let mut controller = Self {
            catalog,
            index: 0,
            current_ammo: 0,
            reserve_ammo: 0,
            time_since_shot: 0.0,
            reload_timer: 0.0,
            is_reloading: false,
            events: Vec::new(),
        };
        controller.equip(0);
        controller
    }

    /// The equipped weapon's definition.
    pub fn current(&self) -> &WeaponDefinition {
        &self.catalog.weapons[self.index]
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn catalog(&self) -> &WeaponCatalog {
        &self.catalog
    }

    pub fn current_ammo(&self) -> u32 {
        self.current_ammo
    }

    pub fn reserve_ammo(&self) -> u32 {
        self.reserve_ammo
    }

    pub fn is_reloading(&self) -> bool {
        self.is_reloading
    }

    /// Fraction of the reload completed, 0 when not reloading.
    pub fn reload_progress(&self) -> f32 {
        if !self.is_reloading {
            return 0.0;
        }
        let total = self.current().reload_time;
        if total <= 0.0 {
            1.0
        } else {
            (1.0 - self.reload_timer / total).clamp(0.0, 1.0)
        }
    }

    /// Advance timers; completes a pending reload once its countdown runs out.
    pub fn tick(&mut self, dt: f32) {
        self.time_since_shot += dt;

        if self.is_reloading {
            self.reload_timer -= dt;
            if self.reload_timer <= 0.0 {
                self.finish_reload();
            }
        }
    }

    /// Check if the weapon can fire right now.
    pub fn can_fire(&self) -> bool {
        !self.is_reloading
            && self.current_ammo > 0
            && self.time_since_shot >= self.current().fire_interval
    }

    /// Pull the trigger. Returns one spawn request per pellet, or nothing when
    /// the shot is gated by reload, empty magazine, or fire rate.
    pub fn try_fire<R: Rng + ?Sized>(&mut self, origin: Vec3, aim: Vec3, rng: &mut R) -> Vec<ProjectileSpawn> {
        if !self.can_fire() {
            log::trace!(
                "{} shot rejected (reloading={}, ammo={})",
                self.current().name,
                self.is_reloading,
                self.current_ammo
            );
            return Vec::new();
        }

        let aim = aim.normalize_or_zero();
        if aim == Vec3::ZERO || !aim.is_finite() {
            log::debug!("Ignoring shot with degenerate aim direction");
            return Vec::new();
        }

        let def = *self.current();
        self.time_since_shot = 0.0;
        self.current_ammo -= 1;

        let position = origin + aim * MUZZLE_OFFSET;
        let spawns = (0..def.pellets_per_shot)
            .map(|_| ProjectileSpawn {
                position,
                direction: apply_spread(aim, def.spread, rng),
                speed: def.projectile_speed,
                damage: def.damage,
                range: def.range,
                tracer: def.tracer,
            })
            .collect();

        self.push_ammo_changed();

        if self.current_ammo == 0 && self.reserve_ammo > 0 {
            self.start_reload();
        }

        spawns
    }

    /// Start reloading.
    pub fn start_reload(&mut self) {
        if self.is_reloading || self.current_ammo == self.current().magazine_size || self.reserve_ammo == 0 {
            return;
        }

        self.is_reloading = true;
        self.reload_timer = self.current().reload_time;
        log::debug!("Reloading {} ({:.1}s)", self.current().name, self.reload_timer);
    }

    /// Finish reloading.
    fn finish_reload(&mut self) {
        let needed = self.current().magazine_size - self.current_ammo;
        let available = needed.min(self.reserve_ammo);

        self.current_ammo += available;
        self.reserve_ammo -= available;
        self.is_reloading = false;
        self.reload_timer = 0.0;

        self.push_ammo_changed();
    }

    /// Equip the weapon in `index`. Ignored for the current slot, an unknown
    /// slot, or while a reload is in progress.
    pub fn switch_weapon(&mut self, index: usize) {
        if index >= self.catalog.len() || index == self.index || self.is_reloading {
            log::debug!("Weapon switch to slot {} ignored", index);
            return;
        }
        self.equip(index);
    }

    pub fn next_weapon(&mut self) {
        let next = (self.index + 1) % self.catalog.len();
        self.switch_weapon(next);
    }

    pub fn previous_weapon(&mut self) {
        let prev = (self.index + self.catalog.len() - 1) % self.catalog.len();
        self.switch_weapon(prev);
    }

    /// Take all queued notifications.
    pub fn drain_events(&mut self) -> Vec<WeaponEvent> {
        std::mem::take(&mut self.events)
    }

    /// Get ammo display string.
    pub fn ammo_display(&self) -> String {
        if self.is_reloading {
            format!("{}: RELOADING... {}", self.current().name, self.reserve_ammo)
        } else {
            format!("{}: {} / {}", self.current().name, self.current_ammo, self.reserve_ammo)
        }
    }

    // Switching refills both magazine and reserve; ammo is not carried per slot.
    fn equip(&mut self, index: usize) {
        self.index = index;
        let def = *self.current();
        self.current_ammo = def.magazine_size;
        self.reserve_ammo = def.max_ammo;
        self.is_reloading = false;
        self.reload_timer = 0.0;
        self.time_since_shot = def.fire_interval;

        self.events.push(WeaponEvent::Switched {
            index,
            weapon: def.weapon_type,
        });
        self.push_ammo_changed();
    }

    fn push_ammo_changed(&mut self) {
        self.events.push(WeaponEvent::AmmoChanged {
            weapon: self.current().weapon_type,
            magazine: self.current_ammo,
            reserve: self.reserve_ammo,
        });
    }
}

/// Rotate `aim` by independent uniform angles in `[-spread, spread]` around
/// two axes perpendicular to it.
fn apply_spread<R: Rng + ?Sized>(aim: Vec3, spread: f32, rng: &mut R) -> Vec3 {
    if spread <= 0.0 {
        return aim;
    }

    let right = aim.cross(Vec3::Y);
    let right = if right.length_squared() < 1e-6 {
        aim.any_orthonormal_vector()
    } else {
        right.normalize()
    };
    let up = right.cross(aim);

    let yaw = rng.gen_range(-spread..=spread);
    let pitch = rng.gen_range(-spread..=spread);
    let rotation = Quat::from_axis_angle(up, yaw) * Quat::from_axis_angle(right, pitch);
    (rotation * aim).normalize()
}
