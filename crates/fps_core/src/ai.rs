//! Enemy decision making: a four-state machine per enemy.
//!
//! Each state carries only its own timers, so entering a state always starts
//! from a clean slate. Transition distances are full 3D; movement happens on
//! the ground plane and only when [`SpatialQuery`] says the next position is
//! walkable (no alternate pathing).

use engine_core::{flatten, horizontal_direction, Health, Transform, Vec3};
use hecs::World;
use physics::SpatialQuery;
use serde::{Deserialize, Serialize};

use crate::enemy::Enemy;
use crate::events::AiTransition;

/// Chase stops closing in once the horizontal gap is this small (squared).
const MIN_CHASE_GAP_SQ: f32 = 1.0;

/// Tag of an [`AiState`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AiKind {
    Idle,
    Patrol,
    Chase,
    Attack,
}

/// Active AI state with its transient data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AiState {
    Idle {
        idle_timer: f32,
    },
    Patrol {
        waypoint: usize,
        wait_timer: f32,
    },
    Chase,
    Attack {
        /// Time since the last strike. Starts at the cooldown so the first
        /// strike lands on the first update in range.
        attack_timer: f32,
    },
}

impl AiState {
    /// Fresh state for `kind`, as on entry.
    pub fn enter(kind: AiKind, tuning: &AiTuning) -> Self {
        match kind {
            AiKind::Idle => AiState::Idle { idle_timer: 0.0 },
            AiKind::Patrol => AiState::Patrol {
                waypoint: 0,
                wait_timer: 0.0,
            },
            AiKind::Chase => AiState::Chase,
            AiKind::Attack => AiState::Attack {
                attack_timer: tuning.attack_cooldown,
            },
        }
    }

    pub fn kind(&self) -> AiKind {
        match self {
            AiState::Idle { .. } => AiKind::Idle,
            AiState::Patrol { .. } => AiKind::Patrol,
            AiState::Chase => AiKind::Chase,
            AiState::Attack { .. } => AiKind::Attack,
        }
    }
}

impl Default for AiState {
    fn default() -> Self {
        AiState::Idle { idle_timer: 0.0 }
    }
}

/// Behaviour constants shared by all enemies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiTuning {
    /// Seconds idle before setting off on a patrol route.
    pub idle_duration: f32,
    pub patrol_speed: f32,
    /// Distance at which a waypoint counts as reached.
    pub waypoint_radius: f32,
    /// Seconds spent at a waypoint before moving to the next one.
    pub waypoint_wait: f32,
    pub chase_speed: f32,
    /// Chase gives up beyond `detection_range * chase_give_up_factor`.
    pub chase_give_up_factor: f32,
    pub attack_cooldown: f32,
    pub attack_damage: f32,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            idle_duration: 2.0,
            patrol_speed: 2.0,
            waypoint_radius: 1.5,
            waypoint_wait: 1.5,
            chase_speed: 3.5,
            chase_give_up_factor: 1.5,
            attack_cooldown: 1.0,
            attack_damage: 12.0,
        }
    }
}

/// Per-frame inputs shared by every enemy update.
pub struct AiContext<'a, S: SpatialQuery + ?Sized> {
    pub player_position: Vec3,
    pub spatial: &'a S,
    pub tuning: &'a AiTuning,
    pub dt: f32,
}

/// Result of one enemy update.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AiOutcome {
    /// `(from, to)` when the state changed this update.
    pub transition: Option<(AiKind, AiKind)>,
    /// Damage to apply to the player.
    pub player_damage: Option<f32>,
}

/// AI component.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EnemyAi {
    pub state: AiState,
}

impl EnemyAi {
    pub fn kind(&self) -> AiKind {
        self.state.kind()
    }

    /// Run one update of the state machine, moving `transform` as needed.
    pub fn update<S: SpatialQuery + ?Sized>(
        &mut self,
        transform: &mut Transform,
        enemy: &Enemy,
        ctx: &AiContext<'_, S>,
    ) -> AiOutcome {
        let tuning = ctx.tuning;
        let distance = transform.position.distance(ctx.player_position);
        let mut outcome = AiOutcome::default();

        let next = match &mut self.state {
            AiState::Idle { idle_timer } => {
                *idle_timer += ctx.dt;
                if distance < enemy.detection_range {
                    Some(AiKind::Chase)
                } else if *idle_timer >= tuning.idle_duration && enemy.has_patrol_route() {
                    Some(AiKind::Patrol)
                } else {
                    None
                }
            }
            AiState::Patrol { waypoint, wait_timer } => {
                if distance < enemy.detection_range {
                    Some(AiKind::Chase)
                } else if !enemy.has_patrol_route() {
                    Some(AiKind::Idle)
                } else {
                    let route = &enemy.patrol_route;
                    let target = route[*waypoint % route.len()];
                    if transform.position.distance(target) < tuning.waypoint_radius {
                        *wait_timer += ctx.dt;
                        if *wait_timer >= tuning.waypoint_wait {
                            *waypoint = (*waypoint + 1) % route.len();
                            *wait_timer = 0.0;
                        }
                    } else {
                        let direction = horizontal_direction(transform.position, target);
                        step_if_walkable(transform, direction * tuning.patrol_speed * ctx.dt, ctx.spatial);
                    }
                    None
                }
            }
            AiState::Chase => {
                if distance > enemy.detection_range * tuning.chase_give_up_factor {
                    Some(AiKind::Patrol)
                } else if distance < enemy.attack_range {
                    Some(AiKind::Attack)
                } else {
                    let gap = flatten(ctx.player_position - transform.position);
                    if gap.length_squared() > MIN_CHASE_GAP_SQ {
                        let step = gap.normalize() * tuning.chase_speed * ctx.dt;
                        step_if_walkable(transform, step, ctx.spatial);
                    }
                    None
                }
            }
            AiState::Attack { attack_timer } => {
                *attack_timer += ctx.dt;
                if distance > enemy.attack_range {
                    Some(AiKind::Chase)
                } else {
                    if *attack_timer >= tuning.attack_cooldown {
                        outcome.player_damage = Some(tuning.attack_damage);
                        *attack_timer = 0.0;
                    }
                    None
                }
            }
        };

        if let Some(kind) = next {
            let from = self.kind();
            self.state = AiState::enter(kind, tuning);
            outcome.transition = Some((from, kind));
        }

        outcome
    }
}

fn step_if_walkable<S: SpatialQuery + ?Sized>(transform: &mut Transform, step: Vec3, spatial: &S) {
    let destination = transform.position + step;
    if spatial.is_walkable(destination) {
        transform.position = destination;
        transform.face_horizontal(step);
    }
}

/// Everything the enemy roster produced in one frame.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AiReport {
    pub transitions: Vec<AiTransition>,
    /// Damage dealt to the player, one entry per strike.
    pub player_damage: Vec<f32>,
}

/// Update every living enemy in the world.
pub fn update_enemies<S: SpatialQuery + ?Sized>(world: &mut World, ctx: &AiContext<'_, S>) -> AiReport {
    let mut report = AiReport::default();

    for (entity, (transform, health, enemy, ai)) in
        world.query_mut::<(&mut Transform, &Health, &Enemy, &mut EnemyAi)>()
    {
        if health.is_dead() {
            continue;
        }

        let outcome = ai.update(transform, enemy, ctx);
        if let Some((from, to)) = outcome.transition {
            log::debug!("Enemy {:?}: {:?} -> {:?}", entity, from, to);
            report.transitions.push(AiTransition { enemy: entity, from, to });
        }
        if let Some(damage) = outcome.player_damage {
            report.player_damage.push(damage);
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use physics::OpenGround;

    const BLOCKED: fn(Vec3) -> bool = |_| false;

    fn ctx<'a, S: SpatialQuery + ?Sized>(
        player: Vec3,
        spatial: &'a S,
        tuning: &'a AiTuning,
        dt: f32,
    ) -> AiContext<'a, S> {
        AiContext {
            player_position: player,
            spatial,
            tuning,
            dt,
        }
    }

    fn ai_in(kind: AiKind, tuning: &AiTuning) -> EnemyAi {
        EnemyAi {
            state: AiState::enter(kind, tuning),
        }
    }

    #[test]
    fn idle_detects_player_and_chases() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = EnemyAi::default();

        let out = ai.update(&mut t, &enemy, &ctx(Vec3::new(10.0, 0.0, 0.0), &OpenGround, &tuning, 0.016));
        assert_eq!(out.transition, Some((AiKind::Idle, AiKind::Chase)));
        assert_eq!(ai.kind(), AiKind::Chase);
    }

    #[test]
    fn idle_without_route_stays_idle() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = EnemyAi::default();
        let far = Vec3::new(30.0, 0.0, 0.0);

        for _ in 0..10 {
            let out = ai.update(&mut t, &enemy, &ctx(far, &OpenGround, &tuning, 0.5));
            assert_eq!(out.transition, None);
        }
        assert_eq!(ai.kind(), AiKind::Idle);
    }

    #[test]
    fn idle_starts_patrol_at_idle_duration() {
        let tuning = AiTuning::default();
        let enemy = Enemy::new(vec![Vec3::new(0.0, 0.0, 5.0)]);
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = EnemyAi::default();
        let far = Vec3::new(30.0, 0.0, 0.0);

        for _ in 0..3 {
            ai.update(&mut t, &enemy, &ctx(far, &OpenGround, &tuning, 0.5));
            assert_eq!(ai.kind(), AiKind::Idle);
        }
        let out = ai.update(&mut t, &enemy, &ctx(far, &OpenGround, &tuning, 0.5));
        assert_eq!(out.transition, Some((AiKind::Idle, AiKind::Patrol)));
        assert_eq!(
            ai.state,
            AiState::Patrol {
                waypoint: 0,
                wait_timer: 0.0
            }
        );
    }

    #[test]
    fn patrol_walks_flat_toward_waypoint() {
        let tuning = AiTuning::default();
        let enemy = Enemy::new(vec![Vec3::new(10.0, 5.0, 0.0)]);
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Patrol, &tuning);
        let far = Vec3::new(-100.0, 0.0, 0.0);

        ai.update(&mut t, &enemy, &ctx(far, &OpenGround, &tuning, 0.5));
        assert!((t.position - Vec3::new(1.0, 0.0, 0.0)).length() < 1e-5);
    }

    #[test]
    fn patrol_blocked_does_not_move() {
        let tuning = AiTuning::default();
        let enemy = Enemy::new(vec![Vec3::new(10.0, 0.0, 0.0)]);
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Patrol, &tuning);

        ai.update(&mut t, &enemy, &ctx(Vec3::splat(100.0), &BLOCKED, &tuning, 0.5));
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(ai.kind(), AiKind::Patrol);
    }

    #[test]
    fn patrol_waits_then_advances_cyclically() {
        let tuning = AiTuning::default();
        let enemy = Enemy::new(vec![Vec3::ZERO, Vec3::new(20.0, 0.0, 0.0)]);
        let mut t = Transform::from_position(Vec3::new(0.5, 0.0, 0.0));
        let mut ai = ai_in(AiKind::Patrol, &tuning);
        let far = Vec3::new(-100.0, 0.0, 0.0);

        ai.update(&mut t, &enemy, &ctx(far, &BLOCKED, &tuning, 1.0));
        assert_eq!(
            ai.state,
            AiState::Patrol {
                waypoint: 0,
                wait_timer: 1.0
            }
        );
        ai.update(&mut t, &enemy, &ctx(far, &BLOCKED, &tuning, 0.5));
        assert_eq!(
            ai.state,
            AiState::Patrol {
                waypoint: 1,
                wait_timer: 0.0
            }
        );

        // At the second waypoint the index wraps back to the first.
        t.position = Vec3::new(20.0, 0.0, 0.0);
        ai.update(&mut t, &enemy, &ctx(far, &BLOCKED, &tuning, 1.5));
        assert_eq!(
            ai.state,
            AiState::Patrol {
                waypoint: 0,
                wait_timer: 0.0
            }
        );
    }

    #[test]
    fn patrol_without_route_returns_to_idle() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::default();
        let mut ai = ai_in(AiKind::Patrol, &tuning);
        let out = ai.update(&mut t, &enemy, &ctx(Vec3::splat(100.0), &OpenGround, &tuning, 0.1));
        assert_eq!(out.transition, Some((AiKind::Patrol, AiKind::Idle)));
    }

    #[test]
    fn chase_moves_toward_player_on_ground_plane() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Chase, &tuning);

        ai.update(&mut t, &enemy, &ctx(Vec3::new(0.0, 3.0, 10.0), &OpenGround, &tuning, 1.0));
        assert!((t.position - Vec3::new(0.0, 0.0, 3.5)).length() < 1e-5);
        assert_eq!(ai.kind(), AiKind::Chase);
    }

    #[test]
    fn chase_enters_attack_in_range() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Chase, &tuning);

        let out = ai.update(&mut t, &enemy, &ctx(Vec3::new(2.0, 0.0, 0.0), &OpenGround, &tuning, 0.1));
        assert_eq!(out.transition, Some((AiKind::Chase, AiKind::Attack)));
        assert_eq!(t.position, Vec3::ZERO);
    }

    #[test]
    fn chase_and_patrol_hysteresis() {
        let tuning = AiTuning::default();
        let enemy = Enemy {
            detection_range: 10.0,
            attack_range: 2.0,
            patrol_route: vec![Vec3::new(0.0, 0.0, -50.0)],
        };
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Chase, &tuning);

        // Dead zone: 10 < d <= 15 keeps chasing.
        for d in [12.0, 14.9, 15.0] {
            ai.update(&mut t, &enemy, &ctx(Vec3::new(d, 0.0, 0.0), &BLOCKED, &tuning, 0.1));
            assert_eq!(ai.kind(), AiKind::Chase, "distance {d}");
        }

        ai.update(&mut t, &enemy, &ctx(Vec3::new(15.5, 0.0, 0.0), &BLOCKED, &tuning, 0.1));
        assert_eq!(ai.kind(), AiKind::Patrol);

        // Same dead zone does not pull a patroller back into chase.
        for d in [15.0, 12.0, 10.0] {
            ai.update(&mut t, &enemy, &ctx(Vec3::new(d, 0.0, 0.0), &BLOCKED, &tuning, 0.1));
            assert_eq!(ai.kind(), AiKind::Patrol, "distance {d}");
        }

        ai.update(&mut t, &enemy, &ctx(Vec3::new(9.9, 0.0, 0.0), &BLOCKED, &tuning, 0.1));
        assert_eq!(ai.kind(), AiKind::Chase);
    }

    #[test]
    fn attack_strikes_immediately_then_on_cooldown() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Attack, &tuning);
        let player = Vec3::new(1.0, 0.0, 0.0);

        let first = ai.update(&mut t, &enemy, &ctx(player, &OpenGround, &tuning, 0.25));
        assert_eq!(first.player_damage, Some(12.0));

        let strikes: usize = (0..3)
            .filter_map(|_| ai.update(&mut t, &enemy, &ctx(player, &OpenGround, &tuning, 0.25)).player_damage)
            .count();
        assert_eq!(strikes, 0);

        let fourth = ai.update(&mut t, &enemy, &ctx(player, &OpenGround, &tuning, 0.25));
        assert_eq!(fourth.player_damage, Some(12.0));
    }

    #[test]
    fn attack_cadence_independent_of_frame_size() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let player = Vec3::new(1.0, 0.0, 0.0);

        let count_strikes = |dt: f32, frames: usize| {
            let mut t = Transform::from_position(Vec3::ZERO);
            let mut ai = ai_in(AiKind::Attack, &tuning);
            // Opening strike
            ai.update(&mut t, &enemy, &ctx(player, &OpenGround, &tuning, dt));
            (0..frames)
                .filter_map(|_| ai.update(&mut t, &enemy, &ctx(player, &OpenGround, &tuning, dt)).player_damage)
                .count()
        };

        assert_eq!(count_strikes(0.125, 8), 1);
        assert_eq!(count_strikes(1.0, 1), 1);
        assert_eq!(count_strikes(0.1, 10), 1);
        assert_eq!(count_strikes(0.125, 16), 2);
    }

    #[test]
    fn attack_breaks_off_when_player_leaves_range() {
        let tuning = AiTuning::default();
        let enemy = Enemy::default();
        let mut t = Transform::from_position(Vec3::ZERO);
        let mut ai = ai_in(AiKind::Attack, &tuning);

        let out = ai.update(&mut t, &enemy, &ctx(Vec3::new(3.5, 0.0, 0.0), &OpenGround, &tuning, 0.1));
        assert_eq!(out.transition, Some((AiKind::Attack, AiKind::Chase)));
        assert_eq!(out.player_damage, None);
    }

    #[test]
    fn update_enemies_skips_dead() {
        let tuning = AiTuning::default();
        let mut world = World::new();
        let mut health = Health::new(10.0);
        health.take_damage(10.0);
        world.spawn((Transform::default(), health, Enemy::default(), EnemyAi::default()));
        let alive = world.spawn((
            Transform::default(),
            Health::default(),
            Enemy::default(),
            EnemyAi::default(),
        ));

        let report = update_enemies(&mut world, &ctx(Vec3::new(5.0, 0.0, 0.0), &OpenGround, &tuning, 0.1));
        assert_eq!(report.transitions.len(), 1);
        assert_eq!(report.transitions[0].enemy, alive);
    }
}
