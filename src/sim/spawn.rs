//! Level spawner
//!
//! Fully replaces the star/enemy/shooter collections. Called on game reset
//! and on level clear. All randomness flows through the state's seeded RNG.

use glam::Vec2;
use rand::Rng;
use rand_pcg::Pcg32;

use super::state::{BackgroundCircle, Enemy, GameState, Shooter, Tier, SHOOTER_COLS};
use crate::secs_to_ticks;

/// Rejection-sampling budget for overlap-free big-tier placement
const PLACEMENT_ATTEMPTS: u32 = 100;
/// Extra clearance between sampled big enemies and existing ones, in pixels
const PLACEMENT_GAP: f32 = 4.0;

/// Uniform sample that tolerates a degenerate range (tiny viewports)
fn uniform(rng: &mut Pcg32, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.random_range(lo..hi) } else { lo }
}

fn random_sign(rng: &mut Pcg32) -> f32 {
    if rng.random_bool(0.5) { -1.0 } else { 1.0 }
}

/// Populate stars, enemies, and shooters for a fresh level
pub fn spawn_level(state: &mut GameState) {
    spawn_stars(state);
    spawn_enemies(state);
    spawn_shooters(state);
    log::debug!(
        "Spawned level: {} enemies, {} stars, {} shooters",
        state.enemies.len(),
        state.stars.len(),
        state.shooters.len()
    );
}

/// Decorative starfield, uniform over the whole canvas
pub fn spawn_stars(state: &mut GameState) {
    let m = &state.metrics;
    let count = (m.width * m.height / (1200.0 * m.scale)).floor() as usize;
    let (w, h, scale) = (m.width, m.height, m.scale);
    state.stars.clear();
    for _ in 0..count {
        let radius = if state.rng.random_bool(0.7) {
            uniform(&mut state.rng, 0.5, 1.5) * scale
        } else {
            uniform(&mut state.rng, 1.5, 2.5) * scale
        };
        let pos = Vec2::new(
            uniform(&mut state.rng, 0.0, w),
            uniform(&mut state.rng, 0.0, h),
        );
        state.stars.push(BackgroundCircle { pos, radius });
    }
}

/// Probabilistic per-tier enemy rolls. Big-tier placement is rejection-sampled
/// against all prior enemies; on budget exhaustion the last sample is accepted
/// even if it overlaps.
pub fn spawn_enemies(state: &mut GameState) {
    state.enemies.clear();
    let tri_rad = state.metrics.triangle_radius();

    for tier in Tier::ALL {
        let rolls = tier.spawn_rolls(&state.base);
        for _ in 0..rolls {
            if !state.rng.random_bool(tier.spawn_chance()) {
                continue;
            }
            let radius = tier.radius(tri_rad);
            let pos = match tier {
                Tier::Big => place_clear_of_others(state, radius),
                _ => random_position(state, radius),
            };
            let vel = random_velocity(state, tier);
            state.enemies.push(Enemy {
                tier,
                pos,
                vel,
                radius,
                hits: 0,
            });
        }
    }

    clamp_velocities(state);

    // Every roll can miss; a level with nothing to destroy could never be
    // cleared, so force one mid-tier enemy in that case.
    if state.enemies.is_empty() {
        let radius = Tier::Mid.radius(tri_rad);
        let pos = random_position(state, radius);
        let vel = random_velocity(state, Tier::Mid);
        state.enemies.push(Enemy {
            tier: Tier::Mid,
            pos,
            vel,
            radius,
            hits: 0,
        });
    }
}

fn random_position(state: &mut GameState, radius: f32) -> Vec2 {
    let m = state.metrics.clone();
    let y_min = m.enemy_ceiling() + radius + 8.0 * m.scale;
    Vec2::new(
        uniform(&mut state.rng, radius, m.width - radius),
        uniform(&mut state.rng, y_min, m.height - radius),
    )
}

fn place_clear_of_others(state: &mut GameState, radius: f32) -> Vec2 {
    let mut pos = random_position(state, radius);
    for _ in 0..PLACEMENT_ATTEMPTS {
        let clear = state
            .enemies
            .iter()
            .all(|e| e.pos.distance(pos) >= e.radius + radius + PLACEMENT_GAP);
        if clear {
            break;
        }
        pos = random_position(state, radius);
    }
    pos
}

fn random_velocity(state: &mut GameState, tier: Tier) -> Vec2 {
    let scale = state.metrics.scale;
    let (vx_lo, vx_hi) = tier.vx_range();
    let vx = random_sign(&mut state.rng) * uniform(&mut state.rng, vx_lo, vx_hi) * scale;
    let vy = if state.rng.random_bool(0.65) {
        let (vy_lo, vy_hi) = tier.vy_range();
        random_sign(&mut state.rng) * uniform(&mut state.rng, vy_lo, vy_hi) * scale
    } else {
        0.0
    };
    Vec2::new(vx, vy)
}

/// Keep every enemy moving at a sane speed regardless of tier rolls
fn clamp_velocities(state: &mut GameState) {
    let scale = state.metrics.scale;
    for enemy in &mut state.enemies {
        let vx = enemy.vel.x;
        enemy.vel.x = vx.signum() * vx.abs().clamp(0.5 * scale, 3.5 * scale);
        if enemy.vel.y != 0.0 {
            let vy = enemy.vel.y;
            enemy.vel.y = vy.signum() * vy.abs().clamp(0.3 * scale, 2.5 * scale);
        }
    }
}

/// Turret position at column `i` for the current viewport. Also used to
/// re-seat turrets when the canvas is resized.
pub fn shooter_position(metrics: &crate::tuning::Metrics, i: usize) -> Vec2 {
    let spacing = metrics.width / (SHOOTER_COLS as f32 + 1.0);
    let y = metrics.ui_inset / 2.0 + metrics.shooter_size / 2.0 + 6.0 * metrics.scale;
    Vec2::new(spacing * (i as f32 + 1.0), y)
}

/// Exactly three turrets at fixed horizontal divisions, each with a
/// randomized first-fire delay and no live bullet.
pub fn spawn_shooters(state: &mut GameState) {
    state.shooters.clear();
    for i in 0..SHOOTER_COLS {
        let delay_secs =
            state.base.shot_interval_secs * (1.0 + state.rng.random_range(0.0..1.0f32));
        state.shooters.push(Shooter {
            pos: shooter_position(&state.metrics, i),
            next_shot_tick: state.time_ticks + u64::from(secs_to_ticks(delay_secs)),
            bullet: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::{BaseTuning, Viewport};

    fn test_state(seed: u64) -> GameState {
        GameState::new(seed, BaseTuning::default(), Viewport::new(400.0, 800.0))
    }

    #[test]
    fn test_shooters_at_fixed_divisions() {
        let state = test_state(1);
        assert_eq!(state.shooters.len(), SHOOTER_COLS);
        let spacing = state.metrics.width / 4.0;
        for (i, shooter) in state.shooters.iter().enumerate() {
            assert!((shooter.pos.x - spacing * (i as f32 + 1.0)).abs() < 1e-3);
            assert!(shooter.bullet.is_none());
        }
    }

    #[test]
    fn test_first_shot_delay_randomized_past_interval() {
        let state = test_state(2);
        let min_delay = u64::from(crate::secs_to_ticks(state.base.shot_interval_secs));
        for shooter in &state.shooters {
            assert!(shooter.next_shot_tick >= state.time_ticks + min_delay);
        }
    }

    #[test]
    fn test_enemies_within_bounds() {
        for seed in 0..20 {
            let state = test_state(seed);
            let m = &state.metrics;
            for enemy in &state.enemies {
                assert!(enemy.pos.x >= enemy.radius - 1e-3);
                assert!(enemy.pos.x <= m.width - enemy.radius + 1e-3);
                assert!(enemy.pos.y >= m.enemy_ceiling() + enemy.radius - 1e-3);
                assert!(enemy.pos.y <= m.height - enemy.radius + 1e-3);
            }
        }
    }

    #[test]
    fn test_spawn_never_empty() {
        for seed in 0..50 {
            let state = test_state(seed);
            assert!(!state.enemies.is_empty(), "seed {seed} spawned no enemies");
        }
    }

    #[test]
    fn test_velocity_clamps() {
        for seed in 0..20 {
            let state = test_state(seed);
            let scale = state.metrics.scale;
            for enemy in &state.enemies {
                let vx = enemy.vel.x.abs();
                assert!(vx >= 0.5 * scale - 1e-3 && vx <= 3.5 * scale + 1e-3);
                if enemy.vel.y != 0.0 {
                    let vy = enemy.vel.y.abs();
                    assert!(vy >= 0.3 * scale - 1e-3 && vy <= 2.5 * scale + 1e-3);
                }
            }
        }
    }

    #[test]
    fn test_same_seed_same_level() {
        let a = test_state(42);
        let b = test_state(42);
        assert_eq!(a.enemies.len(), b.enemies.len());
        for (ea, eb) in a.enemies.iter().zip(&b.enemies) {
            assert_eq!(ea.pos, eb.pos);
            assert_eq!(ea.vel, eb.vel);
        }
    }
}
