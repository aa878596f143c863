//! Frame orchestration: player, enemy roster, combat and game phase.

use engine_core::{Health, Transform, Vec3};
use glam::Vec2;
use hecs::{Entity, World};
use physics::SpatialQuery;
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ai::{update_enemies, AiContext, AiKind, EnemyAi};
use crate::combat::CombatLoop;
use crate::config::SimConfig;
use crate::enemy::Enemy;
use crate::events::{AiTransition, CombatEvent, DeathEvent, ProjectileSpawn, WeaponEvent};
use crate::player::PlayerController;
use crate::spawner::spawn_roster;
use crate::weapons::WeaponCatalog;

/// Points awarded per kill.
pub const KILL_SCORE: u32 = 100;

/// Game phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    /// Frozen until [`Simulation::resume`].
    Paused,
    Victory,
    GameOver,
}

/// Weapon cycling request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponCycle {
    Next,
    Previous,
}

/// How the player wants to aim this frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Look {
    /// Turn by relative yaw/pitch in radians.
    Turn { yaw: f32, pitch: f32 },
    /// Face a world point.
    At(Vec3),
}

/// One frame of player commands.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerInput {
    /// `y` forward, `x` strafe right. Normalized when non-zero.
    pub movement: Vec2,
    pub look: Option<Look>,
    pub fire: bool,
    pub reload: bool,
    /// Equip the weapon in this catalog slot.
    pub select_slot: Option<usize>,
    pub cycle: Option<WeaponCycle>,
}

/// Everything that happened during one [`Simulation::step`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameReport {
    pub spawns: Vec<ProjectileSpawn>,
    pub weapon_events: Vec<WeaponEvent>,
    pub combat_events: Vec<CombatEvent>,
    pub transitions: Vec<AiTransition>,
    /// Health the player lost. Strikes past zero health are not counted.
    pub player_damage: f32,
    /// Set when the phase changed this frame.
    pub phase_change: Option<GamePhase>,
}

impl FrameReport {
    pub fn deaths(&self) -> impl Iterator<Item = &DeathEvent> {
        self.combat_events.iter().filter_map(|event| match event {
            CombatEvent::EnemyKilled(death) => Some(death),
            _ => None,
        })
    }
}

/// Read-only view of one enemy, for drivers and debug output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySnapshot {
    pub entity: Entity,
    pub position: Vec3,
    pub health: f32,
    pub state: AiKind,
}

/// The simulation core for one level.
pub struct Simulation<S: SpatialQuery> {
    config: SimConfig,
    spatial: S,
    world: World,
    player: PlayerController,
    combat: CombatLoop,
    rng: StdRng,
    phase: GamePhase,
    score: u32,
    kills: u32,
    total_enemies: usize,
    frame: u64,
}

impl<S: SpatialQuery> Simulation<S> {
    pub fn new(config: SimConfig, spatial: S) -> Self {
        let mut world = World::new();
        let total_enemies = spawn_roster(&mut world, &config.enemies, &spatial).len();
        let player = new_player(&config);
        let combat = CombatLoop::new(config.pool_initial, config.pool_max, config.hit_radius);
        let rng = StdRng::seed_from_u64(config.seed);

        log::info!(
            "Level ready: {} enemies, player at {}, seed {}",
            total_enemies,
            config.player_start,
            config.seed
        );

        Self {
            config,
            spatial,
            world,
            player,
            combat,
            rng,
            phase: GamePhase::Playing,
            score: 0,
            kills: 0,
            total_enemies,
            frame: 0,
        }
    }

    /// Rebuild the level from config: fresh roster, player, projectiles,
    /// score and RNG.
    pub fn reset(&mut self) {
        self.world.clear();
        self.total_enemies = spawn_roster(&mut self.world, &self.config.enemies, &self.spatial).len();
        self.player = new_player(&self.config);
        self.combat.clear();
        self.rng = StdRng::seed_from_u64(self.config.seed);
        self.phase = GamePhase::Playing;
        self.score = 0;
        self.kills = 0;
        self.frame = 0;
        log::info!("Level reset");
    }

    /// Freeze the level. Only a game in progress can be paused.
    pub fn pause(&mut self) -> bool {
        if self.phase != GamePhase::Playing {
            return false;
        }
        self.phase = GamePhase::Paused;
        log::info!("Paused on frame {}", self.frame);
        true
    }

    pub fn resume(&mut self) -> bool {
        if self.phase != GamePhase::Paused {
            return false;
        }
        self.phase = GamePhase::Playing;
        log::info!("Resumed on frame {}", self.frame);
        true
    }

    /// Run one frame. Does nothing while paused or once the game is won or
    /// lost.
    pub fn step(&mut self, dt: f32, input: &PlayerInput) -> FrameReport {
        let mut report = FrameReport::default();
        if self.phase != GamePhase::Playing {
            return report;
        }
        self.frame += 1;

        // Player look, movement and weapon timers
        match input.look {
            Some(Look::Turn { yaw, pitch }) => self.player.turn(yaw, pitch),
            Some(Look::At(target)) => self.player.look_at(target),
            None => {}
        }
        self.player.walk(input.movement, dt, &self.spatial);
        self.player.update(dt);

        // Weapon commands
        if let Some(slot) = input.select_slot {
            self.player.weapons.switch_weapon(slot);
        }
        match input.cycle {
            Some(WeaponCycle::Next) => self.player.weapons.next_weapon(),
            Some(WeaponCycle::Previous) => self.player.weapons.previous_weapon(),
            None => {}
        }
        if input.reload {
            self.player.weapons.start_reload();
        }
        if input.fire {
            let origin = self.player.position();
            let aim = self.player.look_direction();
            report.spawns = self.player.weapons.try_fire(origin, aim, &mut self.rng);
        }
        for spawn in &report.spawns {
            self.combat.spawn(spawn);
        }

        // Projectiles
        report.combat_events = self.combat.step(&mut self.world, dt);
        let kills = report.deaths().count() as u32;
        if kills > 0 {
            self.kills += kills;
            self.score += kills * KILL_SCORE;
            log::info!("Kills {}/{}, score {}", self.kills, self.total_enemies, self.score);
        }

        // Enemies
        let ctx = AiContext {
            player_position: self.player.position(),
            spatial: &self.spatial,
            tuning: &self.config.ai,
            dt,
        };
        let ai = update_enemies(&mut self.world, &ctx);
        report.transitions = ai.transitions;
        let health_before = self.player.health.current;
        for damage in ai.player_damage {
            if self.player.take_damage(damage) {
                log::info!("Player killed on frame {}", self.frame);
            }
        }
        report.player_damage = health_before - self.player.health.current;

        report.weapon_events = self.player.weapons.drain_events();

        // Phase
        if self.player.is_dead() {
            self.enter_phase(GamePhase::GameOver, &mut report);
        } else if self.total_enemies > 0 && self.kills as usize >= self.total_enemies {
            self.enter_phase(GamePhase::Victory, &mut report);
        }

        report
    }

    fn enter_phase(&mut self, phase: GamePhase, report: &mut FrameReport) {
        log::info!("{:?} with score {} after {} frames", phase, self.score, self.frame);
        self.phase = phase;
        report.phase_change = Some(phase);
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn kills(&self) -> u32 {
        self.kills
    }

    pub fn total_enemies(&self) -> usize {
        self.total_enemies
    }

    /// Frames stepped while playing.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    pub fn player(&self) -> &PlayerController {
        &self.player
    }

    pub fn player_health(&self) -> Health {
        self.player.health
    }

    pub fn combat(&self) -> &CombatLoop {
        &self.combat
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn spatial(&self) -> &S {
        &self.spatial
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    /// Living enemies, in world iteration order.
    pub fn enemies(&self) -> Vec<EnemySnapshot> {
        self.world
            .query::<(&Transform, &Health, &Enemy, &EnemyAi)>()
            .iter()
            .filter(|(_, (_, health, _, _))| health.is_alive())
            .map(|(entity, (transform, health, _, ai))| EnemySnapshot {
                entity,
                position: transform.position,
                health: health.current,
                state: ai.kind(),
            })
            .collect()
    }
}

fn new_player(config: &SimConfig) -> PlayerController {
    PlayerController::new(
        config.player_start,
        config.player_max_health,
        config.player_speed,
        WeaponCatalog::standard(),
    )
}
