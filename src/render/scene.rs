//! Per-frame scene assembly
//!
//! Reads the game state and produces the display list: gameplay entities and
//! HUD while playing, the full-screen summary once the run is over.

use glam::Vec2;

use super::{
    with_alpha, Color, DrawCmd, TextAlign, BACKGROUND, BULLET, ENEMY, IMMUNE_OUTLINE, PLAYER,
    PROJECTILE, SHOOTER, STAR, SUMMARY_BG, SUMMARY_TEXT,
};
use crate::highscores::Scoreboard;
use crate::sim::GameState;
use crate::tuning::Metrics;

/// A frame's worth of drawing, plus host-side UI requests
#[derive(Debug, Clone, Default)]
pub struct Scene {
    pub cmds: Vec<DrawCmd>,
    /// The host should collect a player name for the scoreboard
    pub name_prompt: bool,
    /// The host should offer a "play again" control
    pub play_again: bool,
}

/// Assemble the frame. `time_secs` drives the pulsing immunity outline.
pub fn build(state: &GameState, board: &Scoreboard, time_secs: f64) -> Scene {
    if state.is_game_over() {
        summary_scene(state, board)
    } else {
        gameplay_scene(state, time_secs)
    }
}

fn gameplay_scene(state: &GameState, time_secs: f64) -> Scene {
    let m = &state.metrics;
    let mut cmds = Vec::with_capacity(
        state.stars.len() + state.enemies.len() + state.projectiles.len() + 16,
    );
    cmds.push(DrawCmd::Clear { color: BACKGROUND });

    for star in &state.stars {
        cmds.push(DrawCmd::Circle {
            center: star.pos,
            radius: star.radius,
            color: STAR,
        });
    }

    // Enemies render as squares sized by radius
    for enemy in &state.enemies {
        cmds.push(DrawCmd::Rect {
            min: enemy.pos - Vec2::splat(enemy.radius),
            size: Vec2::splat(enemy.radius * 2.0),
            color: ENEMY,
        });
    }

    for projectile in &state.projectiles {
        cmds.push(DrawCmd::Rect {
            min: Vec2::new(
                projectile.pos.x - m.projectile_w / 2.0,
                projectile.pos.y - m.projectile_h,
            ),
            size: Vec2::new(m.projectile_w, m.projectile_h),
            color: PROJECTILE,
        });
    }

    for shooter in &state.shooters {
        cmds.push(DrawCmd::Rect {
            min: shooter.pos - Vec2::splat(m.shooter_size / 2.0),
            size: Vec2::splat(m.shooter_size),
            color: SHOOTER,
        });
        if let Some(bullet) = &shooter.bullet {
            cmds.push(DrawCmd::Rect {
                min: Vec2::new(
                    bullet.pos.x - m.bullet_size / 2.0,
                    bullet.pos.y - m.bullet_size,
                ),
                size: Vec2::new(m.bullet_size, m.bullet_size * 2.0),
                color: BULLET,
            });
        }
    }

    push_hud(&mut cmds, state, m);

    if state.player.is_immune() {
        let alpha = 0.5 + 0.5 * (time_secs * 10.0).sin() as f32;
        cmds.push(DrawCmd::TriangleStroke {
            points: player_points(state, m),
            color: with_alpha(IMMUNE_OUTLINE, alpha),
            line_width: 8.0 * m.scale,
        });
    }

    cmds.push(DrawCmd::TriangleFill {
        points: player_points(state, m),
        color: PLAYER,
    });

    Scene {
        cmds,
        name_prompt: false,
        play_again: false,
    }
}

fn push_hud(cmds: &mut Vec<DrawCmd>, state: &GameState, m: &Metrics) {
    let hud_y = 24.0 * m.scale + 0.04 * m.height;
    let hud_color: Color = [1.0, 1.0, 1.0, 0.92];
    cmds.push(DrawCmd::Text {
        pos: Vec2::new(m.width - 32.0 * m.scale, hud_y),
        size: 20.0 * m.scale,
        text: format!("Score: {}", state.score),
        color: hud_color,
        align: TextAlign::Right,
        bold: true,
    });
    cmds.push(DrawCmd::Text {
        pos: Vec2::new(32.0 * m.scale, hud_y),
        size: 20.0 * m.scale,
        text: format!("Time: {}s", state.remaining_secs()),
        color: hud_color,
        align: TextAlign::Left,
        bold: true,
    });
}

fn summary_scene(state: &GameState, board: &Scoreboard) -> Scene {
    let m = &state.metrics;
    let center_x = m.width / 2.0;
    let mid_y = m.height / 2.0;
    let mut cmds = vec![DrawCmd::Clear { color: SUMMARY_BG }];

    cmds.push(DrawCmd::Text {
        pos: Vec2::new(center_x, mid_y - 60.0 * m.scale),
        size: 48.0 * m.scale,
        text: "Game Over".to_string(),
        color: SUMMARY_TEXT,
        align: TextAlign::Center,
        bold: true,
    });
    cmds.push(DrawCmd::Text {
        pos: Vec2::new(center_x, mid_y - 10.0 * m.scale),
        size: 24.0 * m.scale,
        text: format!("Score: {}", state.score),
        color: SUMMARY_TEXT,
        align: TextAlign::Center,
        bold: false,
    });
    cmds.push(DrawCmd::Text {
        pos: Vec2::new(center_x, mid_y + 40.0 * m.scale),
        size: 24.0 * m.scale,
        text: "Top 10 Scores".to_string(),
        color: SUMMARY_TEXT,
        align: TextAlign::Center,
        bold: true,
    });
    for (i, entry) in board.entries().iter().enumerate() {
        cmds.push(DrawCmd::Text {
            pos: Vec2::new(center_x, mid_y + (80.0 + 30.0 * i as f32) * m.scale),
            size: 18.0 * m.scale,
            text: format!("{}. {}: {}", i + 1, entry.name, entry.score),
            color: SUMMARY_TEXT,
            align: TextAlign::Center,
            bold: false,
        });
    }

    Scene {
        cmds,
        name_prompt: !state.score_submitted,
        play_again: true,
    }
}

fn player_points(state: &GameState, m: &Metrics) -> [Vec2; 3] {
    let p = state.player.pos;
    [
        Vec2::new(p.x, p.y - m.triangle_h / 2.0),
        Vec2::new(p.x - m.triangle_w / 2.0, p.y + m.triangle_h / 2.0),
        Vec2::new(p.x + m.triangle_w / 2.0, p.y + m.triangle_h / 2.0),
    ]
}
