//! Headless driver: runs the reference arena with a scripted player.
//!
//! Usage: `fps_sim [config.ron]`. Without an argument, `sim.ron` in the working
//! directory is used if present.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use engine_core::{FrameClock, Vec3};
use fps_core::{
    EnemySnapshot, GamePhase, Look, PlayerInput, SimConfig, Simulation, WeaponCycle,
};
use glam::Vec2;
use physics::LevelGeometry;

/// Display frame times fed to the clock, cycled. Uneven on purpose so the
/// fixed-step accumulator has something to do.
const FRAME_PATTERN_MS: [u64; 4] = [16, 17, 16, 18];

/// Distance the scripted player keeps from its target.
const ENGAGE_DISTANCE: f32 = 12.0;

/// Scripted player: walks to the nearest enemy and shoots it.
struct Autopilot {
    last_position: Vec3,
    strafe: f32,
    strafe_ticks: u32,
    stuck_ticks: u32,
}

impl Autopilot {
    fn new(start: Vec3) -> Self {
        Self {
            last_position: start,
            strafe: 1.0,
            strafe_ticks: 0,
            stuck_ticks: 0,
        }
    }

    fn input(&mut self, sim: &Simulation<LevelGeometry>) -> PlayerInput {
        let player = sim.player();
        let position = player.position();

        let Some(target) = nearest(position, &sim.enemies()) else {
            return PlayerInput::default();
        };
        let distance = position.distance(target.position);

        let advancing = distance > ENGAGE_DISTANCE;

        // Side-step around pillars when forward progress stalls.
        let stalled = position.distance_squared(self.last_position) < 1e-6;
        self.last_position = position;
        if advancing && stalled {
            self.stuck_ticks += 1;
            if self.stuck_ticks > 10 {
                self.strafe = -self.strafe;
                self.strafe_ticks = 60;
                self.stuck_ticks = 0;
            }
        } else {
            self.stuck_ticks = 0;
        }
        self.strafe_ticks = self.strafe_ticks.saturating_sub(1);
        let strafe = if self.strafe_ticks > 0 { self.strafe } else { 0.0 };

        let forward = if advancing { 1.0 } else { 0.0 };
        let weapons = &player.weapons;
        let in_range = distance < weapons.current().range * 0.8;

        PlayerInput {
            movement: Vec2::new(strafe, forward),
            look: Some(Look::At(target.position)),
            fire: in_range,
            reload: weapons.current_ammo() == 0,
            select_slot: None,
            cycle: None,
        }
    }
}

fn nearest(from: Vec3, enemies: &[EnemySnapshot]) -> Option<EnemySnapshot> {
    enemies
        .iter()
        .min_by(|a, b| {
            from.distance_squared(a.position)
                .total_cmp(&from.distance_squared(b.position))
        })
        .copied()
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => SimConfig::load_from(&path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => SimConfig::load(),
    };

    log::info!("Starting headless simulation");

    let mut clock = FrameClock::with_rate(config.tick_rate);
    let dt = clock.fixed_timestep_seconds();
    let max_ticks = (config.run_seconds * config.tick_rate).ceil() as u64;

    let mut sim = Simulation::new(config, LevelGeometry::arena());
    let mut pilot = Autopilot::new(sim.player().position());

    // Rifle for the run
    sim.step(
        0.0,
        &PlayerInput {
            cycle: Some(WeaponCycle::Next),
            ..Default::default()
        },
    );

    let mut frame = 0usize;
    'run: while clock.tick_count() < max_ticks {
        clock.advance(Duration::from_millis(FRAME_PATTERN_MS[frame % FRAME_PATTERN_MS.len()]));
        frame += 1;

        while clock.should_tick() {
            let input = pilot.input(&sim);
            let report = sim.step(dt, &input);

            for death in report.deaths() {
                log::info!("Enemy down at {}", death.position);
            }
            if report.player_damage > 0.0 {
                log::debug!(
                    "Player hit for {}, health {:.0}",
                    report.player_damage,
                    sim.player_health().current
                );
            }
            if report.phase_change.is_some() || clock.tick_count() >= max_ticks {
                break 'run;
            }
        }
    }

    let outcome = match sim.phase() {
        GamePhase::Victory => "VICTORY",
        GamePhase::GameOver => "GAME OVER",
        GamePhase::Playing | GamePhase::Paused => "TIME UP",
    };
    println!("{outcome}");
    println!("  score:      {}", sim.score());
    println!("  kills:      {} / {}", sim.kills(), sim.total_enemies());
    println!("  health:     {:.0}", sim.player_health().current);
    println!("  weapon:     {}", sim.player().weapons.ammo_display());
    println!(
        "  simulated:  {:.1}s over {} ticks",
        clock.elapsed_seconds(),
        clock.tick_count()
    );

    Ok(())
}
