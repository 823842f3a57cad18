//! Triangle Blitz entry point
//!
//! Handles platform-specific initialization and runs the game loop.

#[cfg(target_arch = "wasm32")]
mod wasm_game {
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;
    use wasm_bindgen::prelude::*;
    use wasm_bindgen::JsCast;
    use web_sys::{
        CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, TouchEvent,
    };

    use triangle_blitz::consts::{MAX_SUBSTEPS, SIM_DT};
    use triangle_blitz::platform::{InputAdapter, InputEvent, Key, LocalStorageStore};
    use triangle_blitz::render::{self, DrawCmd, TextAlign};
    use triangle_blitz::sim::{tick, GameState};
    use triangle_blitz::tuning::{BaseTuning, Viewport};
    use triangle_blitz::Scoreboard;

    /// Everything the frame loop owns
    struct Game {
        state: GameState,
        board: Scoreboard,
        store: LocalStorageStore,
        input: InputAdapter,
        accumulator: f32,
        last_time: f64,
    }

    impl Game {
        fn new(viewport: Viewport) -> Self {
            let store = LocalStorageStore;
            let board = Scoreboard::load(&store);
            Self {
                state: GameState::new(seed_from_clock(), BaseTuning::default(), viewport),
                board,
                store,
                input: InputAdapter::new(),
                accumulator: 0.0,
                last_time: 0.0,
            }
        }

        fn update(&mut self, now_ms: f64) {
            let dt = (((now_ms - self.last_time) / 1000.0) as f32).min(0.1);
            self.last_time = now_ms;
            self.accumulator += dt;

            let mut substeps = 0;
            while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
                let input = self.input.tick_input(&self.state);
                tick(&mut self.state, &input);
                self.accumulator -= SIM_DT;
                substeps += 1;
            }

            if self.input.take_restart() {
                self.state.reset(seed_from_clock());
            }
        }

        fn submit_score(&mut self, name: &str) {
            self.board.submit(name, self.state.score);
            self.board.save(&mut self.store);
            self.state.mark_score_submitted();
        }
    }

    fn seed_from_clock() -> u64 {
        js_sys::Date::now() as u64
    }

    fn css_color(color: render::Color) -> String {
        format!(
            "rgba({},{},{},{})",
            (color[0] * 255.0).round() as u8,
            (color[1] * 255.0).round() as u8,
            (color[2] * 255.0).round() as u8,
            color[3]
        )
    }

    fn draw_scene(ctx: &CanvasRenderingContext2d, scene: &render::Scene, viewport: Viewport) {
        for cmd in &scene.cmds {
            match cmd {
                DrawCmd::Clear { color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(0.0, 0.0, viewport.width as f64, viewport.height as f64);
                }
                DrawCmd::Circle {
                    center,
                    radius,
                    color,
                } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.begin_path();
                    let _ = ctx.arc(
                        center.x as f64,
                        center.y as f64,
                        *radius as f64,
                        0.0,
                        std::f64::consts::TAU,
                    );
                    ctx.fill();
                }
                DrawCmd::Rect { min, size, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    ctx.fill_rect(min.x as f64, min.y as f64, size.x as f64, size.y as f64);
                }
                DrawCmd::TriangleFill { points, color } => {
                    ctx.set_fill_style_str(&css_color(*color));
                    trace_triangle(ctx, points);
                    ctx.fill();
                }
                DrawCmd::TriangleStroke {
                    points,
                    color,
                    line_width,
                } => {
                    ctx.set_stroke_style_str(&css_color(*color));
                    ctx.set_line_width(*line_width as f64);
                    trace_triangle(ctx, points);
                    ctx.stroke();
                }
                DrawCmd::Text {
                    pos,
                    size,
                    text,
                    color,
                    align,
                    bold,
                } => {
                    let weight = if *bold { "bold " } else { "" };
                    ctx.set_font(&format!("{weight}{size}px Arial"));
                    ctx.set_text_align(match align {
                        TextAlign::Left => "left",
                        TextAlign::Center => "center",
                        TextAlign::Right => "right",
                    });
                    ctx.set_fill_style_str(&css_color(*color));
                    let _ = ctx.fill_text(text, pos.x as f64, pos.y as f64);
                }
            }
        }
    }

    fn trace_triangle(ctx: &CanvasRenderingContext2d, points: &[Vec2; 3]) {
        ctx.begin_path();
        ctx.move_to(points[0].x as f64, points[0].y as f64);
        ctx.line_to(points[1].x as f64, points[1].y as f64);
        ctx.line_to(points[2].x as f64, points[2].y as f64);
        ctx.close_path();
    }

    fn key_from_event(event: &KeyboardEvent) -> Option<Key> {
        match event.key().to_lowercase().as_str() {
            "a" | "arrowleft" => Some(Key::Left),
            "d" | "arrowright" => Some(Key::Right),
            "w" | "arrowup" => Some(Key::Up),
            "s" | "arrowdown" => Some(Key::Down),
            " " => Some(Key::Fire),
            "r" => Some(Key::Restart),
            _ => None,
        }
    }

    fn canvas_viewport(canvas: &HtmlCanvasElement) -> Viewport {
        let window = web_sys::window().expect("no window");
        let width = window
            .inner_width()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(400.0) as f32;
        let height = window
            .inner_height()
            .ok()
            .and_then(|v| v.as_f64())
            .unwrap_or(800.0) as f32;
        canvas.set_width(width as u32);
        canvas.set_height(height as u32);
        Viewport::new(width, height)
    }

    fn mouse_pos(canvas: &HtmlCanvasElement, event: &MouseEvent) -> Vec2 {
        let rect = canvas.get_bounding_client_rect();
        Vec2::new(
            event.client_x() as f32 - rect.left() as f32,
            event.client_y() as f32 - rect.top() as f32,
        )
    }

    fn touch_pos(canvas: &HtmlCanvasElement, event: &TouchEvent) -> Option<Vec2> {
        let touch = event.touches().get(0)?;
        let rect = canvas.get_bounding_client_rect();
        Some(Vec2::new(
            touch.client_x() as f32 - rect.left() as f32,
            touch.client_y() as f32 - rect.top() as f32,
        ))
    }

    pub fn run() {
        console_error_panic_hook::set_once();
        let _ = console_log::init_with_level(log::Level::Info);

        let window = web_sys::window().expect("no window");
        let document = window.document().expect("no document");
        let canvas: HtmlCanvasElement = document
            .get_element_by_id("gameCanvas")
            .expect("missing #gameCanvas")
            .dyn_into()
            .expect("#gameCanvas is not a canvas");
        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .expect("no 2d context")
            .dyn_into()
            .expect("context type");

        let viewport = canvas_viewport(&canvas);
        let game = Rc::new(RefCell::new(Game::new(viewport)));
        log::info!(
            "Triangle Blitz starting ({}x{})",
            viewport.width,
            viewport.height
        );

        register_listeners(&window, &canvas, &game);

        // requestAnimationFrame loop
        let loop_cell: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> =
            Rc::new(RefCell::new(None));
        let loop_cell_clone = loop_cell.clone();
        let game_loop = game.clone();
        let window_loop = window.clone();
        *loop_cell.borrow_mut() = Some(Closure::new(move |now_ms: f64| {
            let mut g = game_loop.borrow_mut();
            if g.last_time == 0.0 {
                g.last_time = now_ms;
            }
            g.update(now_ms);

            let vp = Viewport::new(g.state.metrics.width, g.state.metrics.height);
            let scene = render::build(&g.state, &g.board, now_ms / 1000.0);
            draw_scene(&ctx, &scene, vp);

            if scene.name_prompt {
                match window_loop.prompt_with_message("Enter your name").ok().flatten() {
                    Some(name) => g.submit_score(&name),
                    // Cancelled: leave the score unrecorded, don't ask again
                    None => g.state.mark_score_submitted(),
                }
            }
            drop(g);

            if let Some(closure) = loop_cell_clone.borrow().as_ref() {
                let _ = window_loop.request_animation_frame(closure.as_ref().unchecked_ref());
            }
        }));
        if let Some(closure) = loop_cell.borrow().as_ref() {
            let _ = window.request_animation_frame(closure.as_ref().unchecked_ref());
        }
    }

    fn register_listeners(
        window: &web_sys::Window,
        canvas: &HtmlCanvasElement,
        game: &Rc<RefCell<Game>>,
    ) {
        // Keyboard
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_event(&event) {
                    let g = &mut *game.borrow_mut();
                    g.input.handle(InputEvent::KeyDown(key), &mut g.state);
                }
            });
            let _ = window
                .add_event_listener_with_callback("keydown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: KeyboardEvent| {
                if let Some(key) = key_from_event(&event) {
                    let g = &mut *game.borrow_mut();
                    g.input.handle(InputEvent::KeyUp(key), &mut g.state);
                }
            });
            let _ =
                window.add_event_listener_with_callback("keyup", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Mouse
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = mouse_pos(&canvas_ref, &event);
                let g = &mut *game.borrow_mut();
                g.input.handle(InputEvent::PointerDown { pos }, &mut g.state);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousedown", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: MouseEvent| {
                let pos = mouse_pos(&canvas_ref, &event);
                let g = &mut *game.borrow_mut();
                g.input.handle(InputEvent::PointerMove { pos }, &mut g.state);
            });
            let _ = canvas
                .add_event_listener_with_callback("mousemove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        for event_name in ["mouseup", "mouseleave"] {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: MouseEvent| {
                let g = &mut *game.borrow_mut();
                g.input.handle(InputEvent::PointerUp, &mut g.state);
            });
            let _ = canvas
                .add_event_listener_with_callback(event_name, closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Touch
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_ref, &event) {
                    let g = &mut *game.borrow_mut();
                    g.input.handle(InputEvent::PointerDown { pos }, &mut g.state);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchstart", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |event: TouchEvent| {
                event.prevent_default();
                if let Some(pos) = touch_pos(&canvas_ref, &event) {
                    let g = &mut *game.borrow_mut();
                    g.input.handle(InputEvent::PointerMove { pos }, &mut g.state);
                }
            });
            let _ = canvas
                .add_event_listener_with_callback("touchmove", closure.as_ref().unchecked_ref());
            closure.forget();
        }
        {
            let game = game.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: TouchEvent| {
                let g = &mut *game.borrow_mut();
                g.input.handle(InputEvent::PointerUp, &mut g.state);
            });
            let _ = canvas
                .add_event_listener_with_callback("touchend", closure.as_ref().unchecked_ref());
            closure.forget();
        }

        // Resize: re-derive scaled constants and re-clamp positions
        {
            let game = game.clone();
            let canvas_ref = canvas.clone();
            let closure = Closure::<dyn FnMut(_)>::new(move |_event: web_sys::Event| {
                let viewport = canvas_viewport(&canvas_ref);
                game.borrow_mut().state.handle_resize(viewport);
            });
            let _ = window
                .add_event_listener_with_callback("resize", closure.as_ref().unchecked_ref());
            closure.forget();
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    wasm_game::run();
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use triangle_blitz::consts::TICKS_PER_SECOND;
    use triangle_blitz::platform::MemoryStore;
    use triangle_blitz::sim::{tick, GameState, TickInput};
    use triangle_blitz::tuning::{BaseTuning, Viewport};
    use triangle_blitz::Scoreboard;

    env_logger::init();
    log::info!("Triangle Blitz (native) - headless demo run");

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(1);
    let mut state = GameState::new(seed, BaseTuning::default(), Viewport::new(400.0, 800.0));

    // Scripted run: hold fire and strafe until the run ends
    let input = TickInput {
        fire: true,
        right: true,
        ..Default::default()
    };
    let max_ticks = u64::from(state.base.level_secs * TICKS_PER_SECOND) * 3;
    while !state.is_game_over() && state.time_ticks < max_ticks {
        tick(&mut state, &input);
    }

    let mut store = MemoryStore::new();
    let mut board = Scoreboard::load(&store);
    board.submit("demo", state.score);
    board.save(&mut store);

    println!(
        "Run over after {:.1}s: score {}, top entry {:?}",
        state.time_ticks as f64 / f64::from(TICKS_PER_SECOND),
        state.score,
        board.entries().first().map(|e| e.score)
    );
}
