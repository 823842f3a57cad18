//! Input adapter
//!
//! Folds pointer/touch/keyboard events into per-tick [`TickInput`] and the
//! direct player drag the original supported. The host event loop feeds
//! events in as they arrive; the game loop asks for one `TickInput` per tick.

use glam::Vec2;

use crate::secs_to_ticks;
use crate::sim::{GameState, TickInput};

/// Pan gestures shorter than this are ignored, in CSS pixels
const TOUCH_MOVE_THRESHOLD: f32 = 10.0;

/// Logical keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Left,
    Right,
    Up,
    Down,
    Fire,
    Restart,
}

/// Host events, already translated to canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    PointerDown { pos: Vec2 },
    PointerMove { pos: Vec2 },
    PointerUp,
    KeyDown(Key),
    KeyUp(Key),
    /// Dedicated fire control pressed (mobile button)
    FirePressed,
    FireReleased,
}

/// Accumulates host events between ticks
#[derive(Debug, Default)]
pub struct InputAdapter {
    left: bool,
    right: bool,
    up: bool,
    down: bool,
    /// Pointer grabbed the player; offset from pointer to player center
    drag_offset: Option<Vec2>,
    /// Anchor of a pan gesture outside the player
    pan_anchor: Option<Vec2>,
    queued_fires: u32,
    fire_held: bool,
    fire_cooldown: u32,
    restart_requested: bool,
}

impl InputAdapter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one host event. Dragging and panning mutate the player position
    /// directly, clamped by the current metrics, exactly like the original's
    /// pointer handlers.
    pub fn handle(&mut self, event: InputEvent, state: &mut GameState) {
        match event {
            InputEvent::PointerDown { pos } => {
                let m = &state.metrics;
                let half = Vec2::new(m.triangle_w / 2.0, m.triangle_h / 2.0);
                let delta = pos - state.player.pos;
                if delta.x.abs() <= half.x && delta.y.abs() <= half.y {
                    self.drag_offset = Some(delta);
                } else {
                    self.pan_anchor = Some(pos);
                    // A tap above the player fires
                    if pos.y < state.player.pos.y - half.y {
                        self.queued_fires += 1;
                    }
                }
            }
            InputEvent::PointerMove { pos } => {
                if let Some(offset) = self.drag_offset {
                    let target = pos - offset;
                    let (x, y) = state.metrics.clamp_player(target.x, target.y);
                    state.player.pos = Vec2::new(x, y);
                } else if let Some(anchor) = self.pan_anchor {
                    let delta = pos - anchor;
                    if delta.length() > TOUCH_MOVE_THRESHOLD {
                        let target = state.player.pos + delta;
                        let (x, y) = state.metrics.clamp_player(target.x, target.y);
                        state.player.pos = Vec2::new(x, y);
                        self.pan_anchor = Some(pos);
                    }
                }
            }
            InputEvent::PointerUp => {
                self.drag_offset = None;
                self.pan_anchor = None;
            }
            InputEvent::KeyDown(key) => match key {
                Key::Left => self.left = true,
                Key::Right => self.right = true,
                Key::Up => self.up = true,
                Key::Down => self.down = true,
                Key::Fire => {
                    if !state.is_game_over() {
                        self.queued_fires += 1;
                    }
                }
                Key::Restart => {
                    if state.is_game_over() {
                        self.restart_requested = true;
                    }
                }
            },
            InputEvent::KeyUp(key) => match key {
                Key::Left => self.left = false,
                Key::Right => self.right = false,
                Key::Up => self.up = false,
                Key::Down => self.down = false,
                Key::Fire | Key::Restart => {}
            },
            InputEvent::FirePressed => {
                if !state.is_game_over() {
                    self.queued_fires += 1;
                    self.fire_held = true;
                    self.fire_cooldown = self.repeat_ticks(state);
                }
            }
            InputEvent::FireReleased => {
                self.fire_held = false;
            }
        }
    }

    /// Produce the input for the next simulation tick, advancing the
    /// hold-to-fire repeat clock.
    pub fn tick_input(&mut self, state: &GameState) -> TickInput {
        if self.fire_cooldown > 0 {
            self.fire_cooldown -= 1;
        }
        if self.fire_held && self.fire_cooldown == 0 {
            self.queued_fires += 1;
            self.fire_cooldown = self.repeat_ticks(state);
        }

        let fire = self.queued_fires > 0;
        self.queued_fires = self.queued_fires.saturating_sub(1);

        TickInput {
            left: self.left,
            right: self.right,
            up: self.up,
            down: self.down,
            fire,
        }
    }

    /// True once per restart request
    pub fn take_restart(&mut self) -> bool {
        std::mem::take(&mut self.restart_requested)
    }

    fn repeat_ticks(&self, state: &GameState) -> u32 {
        secs_to_ticks(state.base.fire_repeat_secs).max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::GamePhase;
    use crate::tuning::{BaseTuning, Viewport};

    fn test_state() -> GameState {
        GameState::new(3, BaseTuning::default(), Viewport::new(400.0, 800.0))
    }

    #[test]
    fn test_drag_moves_player_with_offset() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        let start = state.player.pos;

        adapter.handle(
            InputEvent::PointerDown {
                pos: start + Vec2::new(5.0, -5.0),
            },
            &mut state,
        );
        adapter.handle(
            InputEvent::PointerMove {
                pos: start + Vec2::new(45.0, -5.0),
            },
            &mut state,
        );
        assert!((state.player.pos.x - (start.x + 40.0)).abs() < 1e-3);
        assert!((state.player.pos.y - start.y).abs() < 1e-3);
    }

    #[test]
    fn test_drag_is_clamped() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        let start = state.player.pos;

        adapter.handle(InputEvent::PointerDown { pos: start }, &mut state);
        adapter.handle(
            InputEvent::PointerMove {
                pos: Vec2::new(-500.0, 10_000.0),
            },
            &mut state,
        );
        assert!((state.player.pos.x - state.metrics.triangle_w / 2.0).abs() < 1e-3);
        assert!((state.player.pos.y - state.metrics.player_max_y()).abs() < 1e-3);
    }

    #[test]
    fn test_pan_requires_threshold() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        let start = state.player.pos;
        let far = Vec2::new(50.0, 300.0);

        adapter.handle(InputEvent::PointerDown { pos: far }, &mut state);
        adapter.handle(
            InputEvent::PointerMove {
                pos: far + Vec2::new(4.0, 4.0),
            },
            &mut state,
        );
        assert_eq!(state.player.pos, start);

        adapter.handle(
            InputEvent::PointerMove {
                pos: far + Vec2::new(20.0, 0.0),
            },
            &mut state,
        );
        assert!((state.player.pos.x - (start.x + 20.0)).abs() < 1e-3);
    }

    #[test]
    fn test_tap_above_player_fires() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        let above = Vec2::new(state.player.pos.x, 100.0);

        adapter.handle(InputEvent::PointerDown { pos: above }, &mut state);
        assert!(adapter.tick_input(&state).fire);
        assert!(!adapter.tick_input(&state).fire);
    }

    #[test]
    fn test_hold_to_fire_repeats() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        let repeat = secs_to_ticks(state.base.fire_repeat_secs).max(1);

        adapter.handle(InputEvent::FirePressed, &mut state);
        let mut fires = 0;
        let ticks = repeat * 3 + 1;
        for _ in 0..ticks {
            if adapter.tick_input(&state).fire {
                fires += 1;
            }
        }
        assert_eq!(fires, 4); // immediate + one per repeat interval

        adapter.handle(InputEvent::FireReleased, &mut state);
        for _ in 0..repeat * 2 {
            assert!(!adapter.tick_input(&state).fire);
        }
    }

    #[test]
    fn test_held_keys_map_to_tick_input() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        adapter.handle(InputEvent::KeyDown(Key::Left), &mut state);
        adapter.handle(InputEvent::KeyDown(Key::Up), &mut state);
        let input = adapter.tick_input(&state);
        assert!(input.left && input.up && !input.right && !input.down);

        adapter.handle(InputEvent::KeyUp(Key::Left), &mut state);
        let input = adapter.tick_input(&state);
        assert!(!input.left && input.up);
    }

    #[test]
    fn test_fire_ignored_after_game_over() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();
        state.phase = GamePhase::GameOver;

        adapter.handle(InputEvent::KeyDown(Key::Fire), &mut state);
        adapter.handle(InputEvent::FirePressed, &mut state);
        for _ in 0..secs_to_ticks(state.base.fire_repeat_secs) * 2 {
            assert!(!adapter.tick_input(&state).fire);
        }
    }

    #[test]
    fn test_restart_only_when_game_over() {
        let mut state = test_state();
        let mut adapter = InputAdapter::new();

        adapter.handle(InputEvent::KeyDown(Key::Restart), &mut state);
        assert!(!adapter.take_restart());

        state.phase = GamePhase::GameOver;
        adapter.handle(InputEvent::KeyDown(Key::Restart), &mut state);
        assert!(adapter.take_restart());
        assert!(!adapter.take_restart());
    }
}
