//! Game state and core simulation types

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::secs_to_ticks;
use crate::tuning::{BaseTuning, Metrics, Viewport};

/// Current phase of a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    Playing,
    GameOver,
}

/// Enemy size class. Radius and durability scale with the tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    Small,
    Mid,
    Big,
}

impl Tier {
    pub const ALL: [Tier; 3] = [Tier::Small, Tier::Mid, Tier::Big];

    /// Radius relative to the player triangle's half-extent
    pub fn radius(&self, triangle_radius: f32) -> f32 {
        match self {
            Tier::Small => triangle_radius / 2.0,
            Tier::Mid => triangle_radius,
            Tier::Big => triangle_radius * 2.0,
        }
    }

    /// Hits required to destroy an enemy of this tier
    pub fn max_hits(&self) -> u32 {
        match self {
            Tier::Small => 1,
            Tier::Mid => 5,
            Tier::Big => 10,
        }
    }

    /// Number of spawn dice thrown for this tier
    pub fn spawn_rolls(&self, base: &BaseTuning) -> u32 {
        match self {
            Tier::Small => base.small_rolls,
            Tier::Mid => base.mid_rolls,
            Tier::Big => base.big_rolls,
        }
    }

    /// Probability that a single spawn roll produces an enemy
    pub fn spawn_chance(&self) -> f64 {
        match self {
            Tier::Small => 0.25,
            Tier::Mid => 0.5,
            Tier::Big => 0.25,
        }
    }

    /// Horizontal speed bounds (unscaled, per tick)
    pub fn vx_range(&self) -> (f32, f32) {
        match self {
            Tier::Small => (1.5, 3.5),
            Tier::Mid => (1.0, 2.5),
            Tier::Big => (0.5, 1.5),
        }
    }

    /// Vertical speed bounds (unscaled, per tick)
    pub fn vy_range(&self) -> (f32, f32) {
        match self {
            Tier::Small => (1.0, 2.5),
            Tier::Mid => (0.7, 2.0),
            Tier::Big => (0.3, 1.0),
        }
    }
}

/// The player's triangle. Width/height/speed come from [`Metrics`].
#[derive(Debug, Clone)]
pub struct Player {
    pub pos: Vec2,
    /// Remaining invulnerability window, in ticks
    pub immune_ticks: u32,
}

impl Player {
    /// Resting position for a fresh level
    pub fn spawn(metrics: &Metrics) -> Self {
        let (x, y) = metrics.clamp_player(
            metrics.width / 2.0,
            metrics.height - metrics.triangle_h * 2.0,
        );
        Self {
            pos: Vec2::new(x, y),
            immune_ticks: 0,
        }
    }

    pub fn is_immune(&self) -> bool {
        self.immune_ticks > 0
    }

    /// Muzzle point projectiles spawn from
    pub fn muzzle(&self, metrics: &Metrics) -> Vec2 {
        Vec2::new(self.pos.x, self.pos.y - metrics.triangle_h / 2.0)
    }
}

/// A player projectile, moving straight up
#[derive(Debug, Clone, Copy)]
pub struct Projectile {
    pub pos: Vec2,
}

/// An enemy circle
#[derive(Debug, Clone)]
pub struct Enemy {
    pub tier: Tier,
    pub pos: Vec2,
    pub vel: Vec2,
    pub radius: f32,
    pub hits: u32,
}

impl Enemy {
    pub fn max_hits(&self) -> u32 {
        self.tier.max_hits()
    }
}

/// Decorative background star, no gameplay interaction
#[derive(Debug, Clone, Copy)]
pub struct BackgroundCircle {
    pub pos: Vec2,
    pub radius: f32,
}

/// A turret bullet, moving straight down
#[derive(Debug, Clone, Copy)]
pub struct Bullet {
    pub pos: Vec2,
}

/// A stationary turret. Holding the live bullet in an `Option` enforces the
/// one-bullet-per-shooter invariant structurally.
#[derive(Debug, Clone)]
pub struct Shooter {
    pub pos: Vec2,
    /// Simulation tick of the next allowed shot
    pub next_shot_tick: u64,
    pub bullet: Option<Bullet>,
}

/// Number of turret columns per level
pub const SHOOTER_COLS: usize = 3;

/// Complete game state, owned by one controller and mutated only by the
/// update step. The renderer reads it.
#[derive(Debug, Clone)]
pub struct GameState {
    pub seed: u64,
    pub rng: Pcg32,
    pub base: BaseTuning,
    pub metrics: Metrics,
    pub phase: GamePhase,
    pub score: u32,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Remaining level countdown, in ticks
    pub timer_ticks: u32,
    pub player: Player,
    pub projectiles: Vec<Projectile>,
    pub enemies: Vec<Enemy>,
    pub stars: Vec<BackgroundCircle>,
    pub shooters: Vec<Shooter>,
    /// Set when the last enemy dies; consumed at the end of the next tick
    pub pending_level_clear: bool,
    /// Latch so the name prompt appears once per game-over
    pub score_submitted: bool,
}

impl GameState {
    /// Create a new run with the given seed and viewport
    pub fn new(seed: u64, base: BaseTuning, viewport: Viewport) -> Self {
        let metrics = Metrics::derive(&base, viewport);
        let player = Player::spawn(&metrics);
        let timer_ticks = base.level_secs * crate::consts::TICKS_PER_SECOND;
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            base,
            metrics,
            phase: GamePhase::Playing,
            score: 0,
            time_ticks: 0,
            timer_ticks,
            player,
            projectiles: Vec::new(),
            enemies: Vec::new(),
            stars: Vec::new(),
            shooters: Vec::new(),
            pending_level_clear: false,
            score_submitted: false,
        };
        super::spawn::spawn_level(&mut state);
        state.player.immune_ticks =
            secs_to_ticks(state.base.immune_reset_secs * state.metrics.scale);
        state
    }

    /// Restart the run in place, keeping tuning and viewport
    pub fn reset(&mut self, seed: u64) {
        let viewport = Viewport::new(self.metrics.width, self.metrics.height);
        *self = Self::new(seed, self.base.clone(), viewport);
        log::info!("Game reset (seed {seed})");
    }

    /// Re-derive size-dependent constants and re-clamp positions after the
    /// host canvas changed dimensions.
    pub fn handle_resize(&mut self, viewport: Viewport) {
        self.metrics = Metrics::derive(&self.base, viewport);
        let (x, y) = self.metrics.clamp_player(self.player.pos.x, self.player.pos.y);
        self.player.pos = Vec2::new(x, y);
        for enemy in &mut self.enemies {
            enemy.pos.x = enemy
                .pos
                .x
                .min(self.metrics.width - enemy.radius)
                .max(enemy.radius);
            enemy.pos.y = enemy
                .pos
                .y
                .min(self.metrics.enemy_floor() - enemy.radius)
                .max(self.metrics.enemy_ceiling() + enemy.radius);
        }
        // Turret positions are derived from the viewport; re-seat them and
        // keep any live bullet falling in its turret's new column.
        for (i, shooter) in self.shooters.iter_mut().enumerate() {
            shooter.pos = super::spawn::shooter_position(&self.metrics, i);
            if let Some(bullet) = &mut shooter.bullet {
                bullet.pos.x = shooter.pos.x;
            }
        }
        for star in &mut self.stars {
            star.pos.x = star.pos.x.min(self.metrics.width).max(0.0);
            star.pos.y = star.pos.y.min(self.metrics.height).max(0.0);
        }
    }

    /// Remaining countdown, rounded up to whole seconds for the HUD
    pub fn remaining_secs(&self) -> u32 {
        self.timer_ticks.div_ceil(crate::consts::TICKS_PER_SECOND)
    }

    pub fn is_game_over(&self) -> bool {
        self.phase == GamePhase::GameOver
    }

    /// Called by the host once the name prompt has been answered
    pub fn mark_score_submitted(&mut self) {
        self.score_submitted = true;
    }
}
