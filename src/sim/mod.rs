//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only, all timers counted in ticks
//! - Seeded RNG only
//! - No rendering or platform dependencies

pub mod collision;
pub mod spawn;
pub mod state;
pub mod tick;

pub use state::{
    BackgroundCircle, Bullet, Enemy, GamePhase, GameState, Player, Projectile, Shooter, Tier,
    SHOOTER_COLS,
};
pub use tick::{tick, TickInput};
