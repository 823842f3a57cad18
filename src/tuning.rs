//! Game balance and viewport scaling
//!
//! The original builds of this game were near-duplicate copies differing only
//! in constants. This module unifies them: [`BaseTuning`] enumerates the
//! unscaled knobs, [`Viewport`] + [`Metrics`] derive every size-dependent
//! value from the current canvas dimensions.

/// Policy for the reserved UI band at the top of the screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SafeZonePolicy {
    /// Screen edges are the only boundaries.
    None,
    /// A top band (holding HUD text and turrets) deflects enemies and
    /// excludes player movement; enemies also floor just above the player's
    /// resting position.
    #[default]
    TopBand,
}

/// Unscaled gameplay constants, multiplied by the viewport scale factor.
#[derive(Debug, Clone)]
pub struct BaseTuning {
    pub triangle_w: f32,
    pub triangle_h: f32,
    /// Player movement per tick
    pub triangle_speed: f32,
    pub projectile_w: f32,
    pub projectile_h: f32,
    /// Projectile movement per tick (upward)
    pub projectile_speed: f32,
    /// Per-tier spawn rolls: count of dice thrown
    pub small_rolls: u32,
    pub mid_rolls: u32,
    pub big_rolls: u32,
    pub shooter_size: f32,
    pub bullet_size: f32,
    /// Turret bullet movement per tick (downward)
    pub bullet_speed: f32,
    /// Level countdown in seconds
    pub level_secs: u32,
    /// Turret shot interval in seconds (after the randomized first shot)
    pub shot_interval_secs: f32,
    /// Invulnerability window on a fresh game, scaled by viewport scale
    pub immune_reset_secs: f32,
    /// Invulnerability window on level clear, scaled by viewport scale
    pub immune_clear_secs: f32,
    /// Hold-to-fire repeat interval in seconds
    pub fire_repeat_secs: f32,
    pub safe_zone: SafeZonePolicy,
}

impl Default for BaseTuning {
    fn default() -> Self {
        Self {
            triangle_w: 38.0,
            triangle_h: 50.0,
            triangle_speed: 5.0,
            projectile_w: 6.0,
            projectile_h: 12.0,
            projectile_speed: 10.0,
            small_rolls: 20,
            mid_rolls: 20,
            big_rolls: 3,
            shooter_size: 26.0,
            bullet_size: 10.0,
            bullet_speed: 3.0,
            level_secs: 40,
            shot_interval_secs: 5.0,
            immune_reset_secs: 3.0,
            immune_clear_secs: 2.0,
            fire_repeat_secs: 0.12,
            safe_zone: SafeZonePolicy::TopBand,
        }
    }
}

/// Current canvas dimensions in CSS pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Scale factor: design width is 400 in portrait, design height 700 in
    /// landscape. Clamped to avoid upscaling on huge screens.
    pub fn scale(&self) -> f32 {
        let scale = if self.height < self.width {
            self.height / 700.0
        } else {
            self.width / 400.0
        };
        scale.min(1.5)
    }
}

/// All size-dependent constants, re-derived on every resize.
#[derive(Debug, Clone)]
pub struct Metrics {
    pub width: f32,
    pub height: f32,
    pub scale: f32,
    pub triangle_w: f32,
    pub triangle_h: f32,
    pub triangle_speed: f32,
    pub projectile_w: f32,
    pub projectile_h: f32,
    pub projectile_speed: f32,
    pub shooter_size: f32,
    pub bullet_size: f32,
    pub bullet_speed: f32,
    /// Height of the reserved top band (0 when the policy is `None`)
    pub ui_inset: f32,
    pub safe_zone: SafeZonePolicy,
}

impl Metrics {
    pub fn derive(base: &BaseTuning, viewport: Viewport) -> Self {
        let scale = viewport.scale();
        let ui_inset = match base.safe_zone {
            SafeZonePolicy::None => 0.0,
            SafeZonePolicy::TopBand => (100.0 * scale).max(0.13 * viewport.height),
        };
        Self {
            width: viewport.width,
            height: viewport.height,
            scale,
            triangle_w: base.triangle_w * scale,
            triangle_h: base.triangle_h * scale,
            triangle_speed: base.triangle_speed * scale,
            projectile_w: base.projectile_w * scale,
            projectile_h: base.projectile_h * scale,
            projectile_speed: base.projectile_speed * scale,
            shooter_size: base.shooter_size * scale,
            bullet_size: base.bullet_size * scale,
            bullet_speed: base.bullet_speed * scale,
            ui_inset,
            safe_zone: base.safe_zone,
        }
    }

    /// Enemy radius reference: half the smaller triangle dimension
    pub fn triangle_radius(&self) -> f32 {
        self.triangle_w.min(self.triangle_h) / 2.0
    }

    /// Lowest y the player's center may occupy
    pub fn player_min_y(&self) -> f32 {
        match self.safe_zone {
            SafeZonePolicy::None => self.triangle_h / 2.0,
            SafeZonePolicy::TopBand => self.ui_inset + self.triangle_h / 2.0 + 10.0 * self.scale,
        }
    }

    /// Highest y the player's center may occupy
    pub fn player_max_y(&self) -> f32 {
        self.height - self.triangle_h / 2.0
    }

    /// Clamp a player center position fully on screen, respecting the band.
    /// On degenerate viewports the lower bound wins.
    pub fn clamp_player(&self, x: f32, y: f32) -> (f32, f32) {
        let half_w = self.triangle_w / 2.0;
        (
            x.min(self.width - half_w).max(half_w),
            y.min(self.player_max_y()).max(self.player_min_y()),
        )
    }

    /// Floor for enemy motion: just above the player's resting position
    /// under `TopBand`, the bottom edge otherwise.
    pub fn enemy_floor(&self) -> f32 {
        match self.safe_zone {
            SafeZonePolicy::None => self.height,
            SafeZonePolicy::TopBand => self.height - self.triangle_h * 1.2,
        }
    }

    /// Ceiling for enemy motion
    pub fn enemy_ceiling(&self) -> f32 {
        match self.safe_zone {
            SafeZonePolicy::None => 0.0,
            SafeZonePolicy::TopBand => self.ui_inset,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_portrait_scale() {
        let vp = Viewport::new(400.0, 800.0);
        assert!((vp.scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_landscape_scale_fits_height() {
        let vp = Viewport::new(1400.0, 700.0);
        assert!((vp.scale() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_scale_clamped_on_huge_screens() {
        let vp = Viewport::new(4000.0, 8000.0);
        assert!((vp.scale() - 1.5).abs() < 1e-6);
    }

    #[test]
    fn test_top_band_inset() {
        let m = Metrics::derive(&BaseTuning::default(), Viewport::new(400.0, 800.0));
        // max(100 * 1.0, 0.13 * 800) = 104
        assert!((m.ui_inset - 104.0).abs() < 1e-3);
        assert!(m.player_min_y() > m.ui_inset);
    }

    #[test]
    fn test_no_band_inset() {
        let base = BaseTuning {
            safe_zone: SafeZonePolicy::None,
            ..Default::default()
        };
        let m = Metrics::derive(&base, Viewport::new(400.0, 800.0));
        assert_eq!(m.ui_inset, 0.0);
        assert!((m.player_min_y() - m.triangle_h / 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_clamp_player_keeps_on_screen() {
        let m = Metrics::derive(&BaseTuning::default(), Viewport::new(400.0, 800.0));
        let (x, y) = m.clamp_player(-50.0, 9999.0);
        assert!((x - m.triangle_w / 2.0).abs() < 1e-6);
        assert!((y - m.player_max_y()).abs() < 1e-6);
    }
}
