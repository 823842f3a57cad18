//! Platform-neutral rendering
//!
//! The core emits a display list of primitives each frame; the host draws it
//! onto whatever surface it owns (Canvas 2D on the web). Keeps the game loop
//! free of any platform dependency.

pub mod scene;

use glam::Vec2;

pub use scene::{build, Scene};

/// RGBA color, components in 0..=1
pub type Color = [f32; 4];

pub const BACKGROUND: Color = [0.0, 0.0, 0.0, 1.0];
pub const STAR: Color = [1.0, 1.0, 1.0, 1.0];
pub const ENEMY: Color = [1.0, 0.133, 0.133, 1.0];
pub const PROJECTILE: Color = [0.0, 1.0, 0.266, 1.0];
pub const SHOOTER: Color = [0.0, 1.0, 0.266, 1.0];
pub const BULLET: Color = [0.627, 0.125, 0.941, 1.0];
pub const PLAYER: Color = [0.0, 0.47, 1.0, 1.0];
pub const IMMUNE_OUTLINE: Color = [0.0, 1.0, 0.8, 1.0];
pub const SUMMARY_BG: Color = [1.0, 1.0, 1.0, 1.0];
pub const SUMMARY_TEXT: Color = [0.0, 0.0, 0.0, 1.0];

#[inline]
pub fn with_alpha(color: Color, alpha: f32) -> Color {
    [color[0], color[1], color[2], alpha]
}

/// Horizontal text anchoring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// One drawing primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCmd {
    Clear {
        color: Color,
    },
    Circle {
        center: Vec2,
        radius: f32,
        color: Color,
    },
    Rect {
        min: Vec2,
        size: Vec2,
        color: Color,
    },
    TriangleFill {
        points: [Vec2; 3],
        color: Color,
    },
    TriangleStroke {
        points: [Vec2; 3],
        color: Color,
        line_width: f32,
    },
    Text {
        pos: Vec2,
        size: f32,
        text: String,
        color: Color,
        align: TextAlign,
        bold: bool,
    },
}
