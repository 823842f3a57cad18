//! Collision checks
//!
//! All checks are strict: exactly touching shapes do not collide. The player
//! triangle collides via its bounding box; enemy circles collide with the
//! player as squares of their radius.

use glam::Vec2;

use super::state::{Bullet, Enemy, Projectile};
use crate::tuning::Metrics;

/// Axis-aligned overlap between two center/half-extent boxes
#[inline]
pub fn aabb_overlap(center_a: Vec2, half_a: Vec2, center_b: Vec2, half_b: Vec2) -> bool {
    (center_a.x - half_a.x) < (center_b.x + half_b.x)
        && (center_a.x + half_a.x) > (center_b.x - half_b.x)
        && (center_a.y - half_a.y) < (center_b.y + half_b.y)
        && (center_a.y + half_a.y) > (center_b.y - half_b.y)
}

/// Projectile tip vs enemy circle, by center distance against the radius sum.
/// Tangent contact is a miss.
#[inline]
pub fn projectile_hits_enemy(projectile: &Projectile, metrics: &Metrics, enemy: &Enemy) -> bool {
    let tip = Vec2::new(
        projectile.pos.x,
        projectile.pos.y + metrics.projectile_h / 2.0,
    );
    tip.distance(enemy.pos) < enemy.radius + metrics.projectile_w / 2.0
}

/// Player bounding box vs enemy circle approximated as a square
#[inline]
pub fn player_hits_enemy(player_pos: Vec2, metrics: &Metrics, enemy: &Enemy) -> bool {
    aabb_overlap(
        player_pos,
        Vec2::new(metrics.triangle_w / 2.0, metrics.triangle_h / 2.0),
        enemy.pos,
        Vec2::splat(enemy.radius),
    )
}

/// Turret bullet vs player bounding box. The bullet collides along its
/// vertical extent but only through its center line horizontally.
#[inline]
pub fn bullet_hits_player(bullet: &Bullet, metrics: &Metrics, player_pos: Vec2) -> bool {
    let half_w = metrics.triangle_w / 2.0;
    let half_h = metrics.triangle_h / 2.0;
    let half_bullet = metrics.bullet_size / 2.0;
    bullet.pos.x > player_pos.x - half_w
        && bullet.pos.x < player_pos.x + half_w
        && bullet.pos.y + half_bullet > player_pos.y - half_h
        && bullet.pos.y - half_bullet < player_pos.y + half_h
}
