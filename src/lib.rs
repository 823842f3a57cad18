//! Triangle Blitz - a timed dodge-and-shoot arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (spawning, collisions, game state)
//! - `tuning`: Parameterized game balance and viewport scaling
//! - `render`: Platform-neutral display list assembly
//! - `platform`: Input and storage ports (web LocalStorage behind cfg)
//! - `highscores`: Local top-10 scoreboard

pub mod highscores;
pub mod platform;
pub mod render;
pub mod sim;
pub mod tuning;

pub use highscores::Scoreboard;
pub use tuning::{BaseTuning, Metrics, SafeZonePolicy, Viewport};

/// Game timing constants
pub mod consts {
    /// Simulation tick rate (matches the 60 Hz display loop the game targets)
    pub const TICKS_PER_SECOND: u32 = 60;
    /// Fixed simulation timestep in seconds
    pub const SIM_DT: f32 = 1.0 / TICKS_PER_SECOND as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
}

/// Convert a duration in seconds to whole simulation ticks (rounded)
#[inline]
pub fn secs_to_ticks(secs: f32) -> u32 {
    (secs * consts::TICKS_PER_SECOND as f32).round().max(0.0) as u32
}
