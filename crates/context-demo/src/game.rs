use context_engine::{Canvas, Color, EngineCtx, FillMode, Key, Rect, Rng, Scene, Vec2};

pub const WORLD_WIDTH: f32 = 800.0;
pub const WORLD_HEIGHT: f32 = 600.0;

const PLAYER_SIZE: f32 = 50.0;
const PLAYER_SPEED: f32 = 200.0;
const BLOCK_COUNT: usize = 5;
const BLOCK_SIZE: f32 = 80.0;
const BLOCK_BASE_Y: f32 = 200.0;
const ZOOM_SPEED: f32 = 5.0;
const ZOOMED_IN: f32 = 2.0;

/// Player square steered with the arrow keys, followed by the camera.
pub struct GameScene {
    player: Vec2,
    blocks: Vec<(Rect, Color)>,
    zoom: f32,
    target_zoom: f32,
    mouse: Vec2,
    window_size: Vec2,
}

impl GameScene {
    pub fn new(rng: &mut Rng) -> Self {
        let blocks = (0..BLOCK_COUNT)
            .map(|i| {
                let x = 100.0 + i as f32 * 120.0;
                let rect = Rect::new(x, BLOCK_BASE_Y, BLOCK_SIZE, BLOCK_SIZE);
                let color = Color::rgb(
                    (rng.next_u32() & 0xff) as u8,
                    (rng.next_u32() & 0xff) as u8,
                    (rng.next_u32() & 0xff) as u8,
                );
                (rect, color)
            })
            .collect();

        Self {
            player: Vec2::new(400.0, 300.0),
            blocks,
            zoom: 1.0,
            target_zoom: 1.0,
            mouse: Vec2::zero(),
            window_size: Vec2::new(WORLD_WIDTH, WORLD_HEIGHT),
        }
    }

    pub fn player_rect(&self) -> Rect {
        Rect::from_origin_size(self.player, Vec2::new(PLAYER_SIZE, PLAYER_SIZE))
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    fn move_player(&mut self, dt: f32, ctx: &EngineCtx<'_>) {
        let step = PLAYER_SPEED * dt;
        if ctx.is_key_pressed(Key::ArrowLeft) {
            self.player.x -= step;
        }
        if ctx.is_key_pressed(Key::ArrowRight) {
            self.player.x += step;
        }
        if ctx.is_key_pressed(Key::ArrowUp) {
            self.player.y -= step;
        }
        if ctx.is_key_pressed(Key::ArrowDown) {
            self.player.y += step;
        }

        self.player.x = self.player.x.clamp(0.0, WORLD_WIDTH - PLAYER_SIZE);
        self.player.y = self.player.y.clamp(0.0, WORLD_HEIGHT - PLAYER_SIZE);
    }

    fn approach_zoom(&mut self, dt: f32) {
        let step = ZOOM_SPEED * dt;
        if self.zoom < self.target_zoom {
            self.zoom = (self.zoom + step).min(self.target_zoom);
        } else if self.zoom > self.target_zoom {
            self.zoom = (self.zoom - step).max(self.target_zoom);
        }
    }

    fn draw_hud(&self, canvas: &mut Canvas) {
        let white = Color::WHITE;
        canvas.draw_rounded_rect(
            Rect::new(10.0, 10.0, 200.0, 100.0),
            15.0,
            Color::rgba(0, 0, 0, 200),
            FillMode::Fill,
        );
        canvas.draw_text("Score: 100", Vec2::new(20.0, 20.0), white, 1.0);
        canvas.draw_text("Press Z to zoom", Vec2::new(20.0, 50.0), white, 1.0);
        let size = format!("{}x{}", self.window_size.x as u32, self.window_size.y as u32);
        canvas.draw_text(&size, Vec2::new(20.0, 80.0), white, 1.0);

        // Zoom indicator: taller when zoomed in.
        let (x, y, s) = (20.0, 80.0, 10.0);
        canvas.draw_triangle(
            Vec2::new(x, y),
            Vec2::new(x + s * 2.0, y),
            Vec2::new(x + s, y - s * self.zoom),
            white,
            FillMode::Fill,
        );
    }
}

impl Scene for GameScene {
    fn on_load(&mut self) {
        log::info!("game scene loaded");
    }

    fn on_exit(&mut self) {
        log::info!("game scene exited");
    }

    fn update(&mut self, dt: f32, ctx: &mut EngineCtx<'_>) {
        self.mouse = ctx.mouse_position();
        self.window_size = ctx.window_size();

        self.move_player(dt, ctx);

        for (i, (rect, _)) in self.blocks.iter_mut().enumerate() {
            rect.origin.y = BLOCK_BASE_Y + (self.mouse.x * 0.01 + i as f32).sin() * 50.0;
        }

        self.target_zoom = if ctx.is_key_pressed(Key::Z) { ZOOMED_IN } else { 1.0 };
        self.approach_zoom(dt);

        if ctx.is_key_pressed(Key::Escape) {
            ctx.quit();
        }
    }

    fn render(&mut self, canvas: &mut Canvas) {
        canvas.set_camera_position(self.player - Vec2::new(400.0, 300.0));
        canvas.set_camera_zoom(self.zoom);
        canvas.clear(Color::rgb(40, 40, 60));

        canvas.draw_rect_lines(Rect::new(0.0, 0.0, 2000.0, 2000.0), Color::rgb(100, 100, 100));

        for (rect, color) in &self.blocks {
            canvas.draw_rounded_rect(*rect, 10.0, *color, FillMode::Fill);
            canvas.draw_rounded_rect_lines(*rect, 10.0, Color::WHITE);
        }

        let center = self.player_rect().center();
        let half = PLAYER_SIZE * 0.5;
        canvas.draw_triangle(
            Vec2::new(center.x, center.y - half),
            Vec2::new(center.x - half, center.y + half),
            Vec2::new(center.x + half, center.y + half),
            Color::rgb(0, 128, 255),
            FillMode::Fill,
        );

        let yellow = Color::rgb(255, 255, 0);
        canvas.draw_circle(center, 10.0, yellow, FillMode::Fill);
        let mouse_world = canvas.screen_to_world(self.mouse);
        canvas.draw_line(center, mouse_world, yellow);

        canvas.enable_camera(false);
        self.draw_hud(canvas);
        canvas.enable_camera(true);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Instant;

    use context_engine::input::{InputFrame, InputState};
    use context_engine::time::FrameTime;

    use super::*;

    fn frame(dt: f32) -> FrameTime {
        FrameTime { dt, now: Instant::now(), frame_index: 0 }
    }

    /// Runs one update with `held` keys down; returns whether quit was requested.
    fn step(scene: &mut GameScene, dt: f32, held: &[Key]) -> bool {
        let mut input = InputState::default();
        input.keys_down.extend(held.iter().copied());
        let input_frame = InputFrame::default();
        let mut ctx = EngineCtx::new(&input, &input_frame, frame(dt), Vec2::new(800.0, 600.0));
        scene.update(dt, &mut ctx);
        ctx.is_quit_requested()
    }

    fn scene() -> GameScene {
        GameScene::new(&mut Rng::with_seed(1))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    #[test]
    fn arrows_move_at_player_speed() {
        let mut s = scene();
        step(&mut s, 0.5, &[Key::ArrowRight, Key::ArrowUp]);
        let r = s.player_rect();
        assert!(approx(r.origin.x, 500.0));
        assert!(approx(r.origin.y, 200.0));
    }

    #[test]
    fn player_stays_inside_world() {
        let mut s = scene();
        for _ in 0..20 {
            step(&mut s, 0.25, &[Key::ArrowRight, Key::ArrowDown]);
        }
        let r = s.player_rect();
        assert_eq!(r.max(), Vec2::new(WORLD_WIDTH, WORLD_HEIGHT));

        for _ in 0..40 {
            step(&mut s, 0.25, &[Key::ArrowLeft, Key::ArrowUp]);
        }
        assert_eq!(s.player_rect().origin, Vec2::zero());
    }

    #[test]
    fn zoom_eases_without_overshoot() {
        let mut s = scene();
        step(&mut s, 0.1, &[Key::Z]);
        assert!(approx(s.zoom(), 1.5));
        step(&mut s, 0.25, &[Key::Z]);
        assert_eq!(s.zoom(), 2.0);

        step(&mut s, 0.1, &[]);
        assert!(approx(s.zoom(), 1.5));
        step(&mut s, 1.0, &[]);
        assert_eq!(s.zoom(), 1.0);
    }

    #[test]
    fn blocks_follow_mouse_wave() {
        let mut s = scene();
        step(&mut s, 0.016, &[]);
        for (i, (rect, _)) in s.blocks.iter().enumerate() {
            let expected = BLOCK_BASE_Y + (i as f32).sin() * 50.0;
            assert!(approx(rect.origin.y, expected), "block {i}");
            assert!(approx(rect.origin.x, 100.0 + i as f32 * 120.0));
        }
    }

    #[test]
    fn escape_requests_quit() {
        let mut s = scene();
        assert!(!step(&mut s, 0.016, &[]));
        assert!(step(&mut s, 0.016, &[Key::Escape]));
    }

    #[test]
    fn render_restores_camera_for_next_frame() {
        let mut s = scene();
        let mut canvas = Canvas::new();
        s.render(&mut canvas);
        assert!(canvas.is_camera_enabled());
        assert_eq!(canvas.camera_position(), Vec2::new(0.0, 0.0));
        assert_eq!(canvas.clear_color(), Color::rgb(40, 40, 60));
        assert!(!canvas.draw_list().is_empty());
    }
}
