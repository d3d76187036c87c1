use std::path::PathBuf;
use std::time::Instant;

use context_engine::{Canvas, Color, EngineCtx, FillMode, InputEvent, Key, Rect, Rng, Scene, Vec2};

use crate::typing::{wrap_words, Keystroke, Phase, Shake, TypingTest, SENTENCES};

pub const FONT_ENV: &str = "CONTEXT_TYPING_FONT";
pub const DEFAULT_FONT_PATH: &str = "/usr/share/fonts/TTF/JetBrainsMono-Regular.ttf";
const FONT_NAME: &str = "monospace";
const FONT_SIZE: f32 = 16.0;

const MAX_CHARS_PER_LINE: usize = 78;
const LINE_HEIGHT: f32 = 30.0;
const TEXT_SCALE: f32 = 1.2;
const CHAR_WIDTH: f32 = 12.0;
const BLINK_MS: u128 = 500;

const BG: Color = rgb(40, 44, 52);
const TEXT: Color = rgb(220, 223, 228);
const HIGHLIGHT: Color = rgb(86, 182, 194);
const ERROR: Color = rgb(224, 108, 117);
const CORRECT: Color = rgb(152, 195, 121);
const PANEL: Color = rgb(30, 34, 42);
const MUTED: Color = rgb(150, 150, 150);

const TEXT_BOX: Rect = Rect::new(50.0, 150.0, 1050.0, 225.0);
const INPUT_BOX: Rect = Rect::new(50.0, 400.0, 1050.0, 90.0);

const fn rgb(r: u8, g: u8, b: u8) -> Color {
    Color::from_premul(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0)
}

/// Font path from `CONTEXT_TYPING_FONT`, or the bundled default location.
pub fn font_path_from_env() -> PathBuf {
    std::env::var_os(FONT_ENV)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_FONT_PATH))
}

pub struct TypingScene {
    test: TypingTest,
    shake: Shake,
    rng: Rng,
    font_path: PathBuf,
    /// `None` until the first render; then whether the monospace font loaded.
    font_loaded: Option<bool>,
    /// Set when Escape left a run; held Escape must be released before it quits.
    escape_latched: bool,
    elapsed: f32,
}

impl TypingScene {
    pub fn new(mut rng: Rng, font_path: PathBuf) -> Self {
        let sentence = pick_sentence(&mut rng);
        Self {
            test: TypingTest::new(sentence),
            shake: Shake::default(),
            rng,
            font_path,
            font_loaded: None,
            escape_latched: false,
            elapsed: 0.0,
        }
    }

    pub fn test(&self) -> &TypingTest {
        &self.test
    }

    fn on_key(&mut self, key: Key, shift: bool, now: Instant) {
        match self.test.phase() {
            Phase::Start => {
                if key == Key::Enter {
                    self.test.start(now);
                }
            }
            Phase::Typing => match key {
                Key::Escape => {
                    self.test.cancel();
                    self.escape_latched = true;
                }
                Key::Backspace => self.test.backspace(),
                _ => {
                    let Some(c) = key.to_char(shift) else { return; };
                    if self.test.type_char(c, now) == Keystroke::Wrong {
                        self.shake.trigger();
                    }
                }
            },
            Phase::Finished => {
                if key == Key::Enter {
                    let sentence = pick_sentence(&mut self.rng);
                    self.test.set_sentence(sentence);
                    self.test.start(now);
                }
            }
        }
    }

    fn cursor_visible(&self) -> bool {
        let ms = (self.elapsed * 1000.0) as u128;
        (ms / BLINK_MS) % 2 == 0
    }

    fn text(&self, canvas: &mut Canvas, s: &str, x: f32, y: f32, color: Color, scale: f32) {
        let pos = Vec2::new(x, y);
        if self.font_loaded == Some(true) {
            canvas.draw_text_with(s, pos, color, FONT_NAME, scale);
        } else {
            canvas.draw_text(s, pos, color, scale);
        }
    }

    fn wrapped(&self, canvas: &mut Canvas, s: &str, x: f32, y: f32, color: Color) {
        for (i, line) in wrap_words(s, MAX_CHARS_PER_LINE).iter().enumerate() {
            self.text(canvas, line, x, y + i as f32 * LINE_HEIGHT, color, TEXT_SCALE);
        }
    }

    fn panels(&self, canvas: &mut Canvas) {
        canvas.draw_rounded_rect(TEXT_BOX, 15.0, PANEL, FillMode::Fill);
        self.wrapped(
            canvas,
            &self.test.sentence(),
            TEXT_BOX.origin.x + 20.0,
            TEXT_BOX.origin.y + 30.0,
            TEXT,
        );
        canvas.draw_rounded_rect(INPUT_BOX, 15.0, PANEL, FillMode::Fill);
    }

    fn draw_typing(&self, canvas: &mut Canvas) {
        self.panels(canvas);

        let x0 = INPUT_BOX.origin.x + 20.0;
        let right = INPUT_BOX.max().x - 30.0;
        let mut x = x0;
        let mut y = INPUT_BOX.origin.y + 30.0;

        let mut buf = [0u8; 4];
        for (i, c) in self.test.input().chars().enumerate() {
            let color = if self.test.is_correct_at(i) { CORRECT } else { ERROR };
            self.text(canvas, c.encode_utf8(&mut buf), x, y, color, TEXT_SCALE);
            x += CHAR_WIDTH;
            if x > right {
                x = x0;
                y += LINE_HEIGHT;
            }
        }

        if self.cursor_visible() {
            let typed = self.test.input().chars().count();
            let cx = x0 + (typed % (MAX_CHARS_PER_LINE - 2)) as f32 * CHAR_WIDTH;
            canvas.draw_rect_outline(Rect::new(cx, y - 2.0, 2.0, 24.0), HIGHLIGHT);
        }

        let wpm = format!("WPM: {:.1}", self.test.wpm());
        self.text(canvas, &wpm, 50.0, 520.0, TEXT, TEXT_SCALE);
    }

    fn draw_finished(&self, canvas: &mut Canvas) {
        self.panels(canvas);
        self.wrapped(
            canvas,
            self.test.input(),
            INPUT_BOX.origin.x + 20.0,
            INPUT_BOX.origin.y + 30.0,
            HIGHLIGHT,
        );

        self.text(canvas, "Typing test completed!", 300.0, 100.0, TEXT, TEXT_SCALE);
        let wpm = format!("WPM: {:.1}", self.test.wpm());
        self.text(canvas, &wpm, 380.0, 520.0, TEXT, TEXT_SCALE);
        let accuracy = format!("Accuracy: {:.1}%", self.test.accuracy());
        self.text(canvas, &accuracy, 620.0, 520.0, TEXT, TEXT_SCALE);
        self.text(canvas, "Press ENTER to try again", 300.0, 550.0, TEXT, TEXT_SCALE);
    }

    fn ensure_font(&mut self, canvas: &mut Canvas) {
        if self.font_loaded.is_some() {
            return;
        }
        let loaded = match canvas.load_font(FONT_NAME, &self.font_path, FONT_SIZE) {
            Ok(()) => {
                log::info!("monospace font loaded from {}", self.font_path.display());
                true
            }
            Err(e) => {
                log::warn!("monospace font unavailable ({e}); falling back to the default font");
                false
            }
        };
        self.font_loaded = Some(loaded);
    }
}

fn pick_sentence(rng: &mut Rng) -> &'static str {
    rng.index(SENTENCES.len())
        .and_then(|i| SENTENCES.get(i))
        .copied()
        .unwrap_or(SENTENCES[0])
}

impl Scene for TypingScene {
    fn on_load(&mut self) {
        log::info!("typing test ready: {:?}", self.test.sentence());
    }

    fn handle_event(&mut self, event: &InputEvent) {
        if let Some((key, modifiers)) = event.key_pressed() {
            self.on_key(key, modifiers.shift, Instant::now());
        }
    }

    fn update(&mut self, dt: f32, ctx: &mut EngineCtx<'_>) {
        self.elapsed += dt;

        let rng = &mut self.rng;
        self.shake.update(dt, |lo, hi| rng.range_f32(lo, hi));

        self.test.refresh_wpm(ctx.time().now);

        let escape = ctx.is_key_pressed(Key::Escape);
        if !escape {
            self.escape_latched = false;
        } else if !self.escape_latched && self.test.phase() != Phase::Typing {
            ctx.quit();
        }
    }

    fn render(&mut self, canvas: &mut Canvas) {
        self.ensure_font(canvas);

        canvas.clear(BG);
        let (sx, sy) = self.shake.offset();
        canvas.set_camera_position(Vec2::new(sx, sy));

        self.text(canvas, "Typing Speed Test", 350.0, 50.0, TEXT, 2.0);

        match self.test.phase() {
            Phase::Start => {
                self.text(canvas, "Press ENTER to start typing", 300.0, 100.0, TEXT, TEXT_SCALE);
                self.wrapped(
                    canvas,
                    &self.test.sentence(),
                    TEXT_BOX.origin.x + 20.0,
                    TEXT_BOX.origin.y + 30.0,
                    MUTED,
                );
            }
            Phase::Typing => self.draw_typing(canvas),
            Phase::Finished => self.draw_finished(canvas),
        }

        canvas.set_camera_position(Vec2::zero());
    }
}

#[cfg(test)]
mod tests {
    use context_engine::input::{InputFrame, InputState, KeyState, Modifiers};
    use context_engine::time::FrameTime;

    use super::*;

    fn scene() -> TypingScene {
        TypingScene::new(Rng::with_seed(42), PathBuf::from("/definitely/not/a/font.ttf"))
    }

    fn press(scene: &mut TypingScene, key: Key, shift: bool) {
        scene.handle_event(&InputEvent::Key {
            key,
            state: KeyState::Pressed,
            modifiers: Modifiers { shift, ..Modifiers::default() },
            code: 0,
            repeat: false,
        });
    }

    /// One update with `held` keys down; returns whether quit was requested.
    fn update(scene: &mut TypingScene, held: &[Key]) -> bool {
        let mut input = InputState::default();
        input.keys_down.extend(held.iter().copied());
        let frame = InputFrame::default();
        let time = FrameTime { dt: 0.016, now: Instant::now(), frame_index: 0 };
        let mut ctx = EngineCtx::new(&input, &frame, time, Vec2::new(1200.0, 700.0));
        scene.update(time.dt, &mut ctx);
        ctx.is_quit_requested()
    }

    /// Key that types `c` on a US layout.
    fn key_for(c: char) -> Option<(Key, bool)> {
        const KEYS: [Key; 47] = [
            Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
            Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
            Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
            Key::Digit0, Key::Digit1, Key::Digit2, Key::Digit3, Key::Digit4,
            Key::Digit5, Key::Digit6, Key::Digit7, Key::Digit8, Key::Digit9,
            Key::Space, Key::Minus, Key::Equal, Key::BracketLeft, Key::BracketRight,
            Key::Backslash, Key::Semicolon, Key::Quote, Key::Comma, Key::Period, Key::Slash,
        ];
        KEYS.iter().find_map(|&k| {
            if k.to_char(false) == Some(c) {
                Some((k, false))
            } else if k.to_char(true) == Some(c) {
                Some((k, true))
            } else {
                None
            }
        })
    }

    #[test]
    fn enter_starts_and_escape_returns_to_start() {
        let mut s = scene();
        assert_eq!(s.test().phase(), Phase::Start);
        press(&mut s, Key::Enter, false);
        assert_eq!(s.test().phase(), Phase::Typing);
        press(&mut s, Key::Escape, false);
        assert_eq!(s.test().phase(), Phase::Start);
    }

    #[test]
    fn wrong_key_counts_error_and_shakes() {
        let mut s = scene();
        press(&mut s, Key::Enter, false);
        let first = s.test().sentence().chars().next();
        let wrong = if first == Some('Q') { Key::Z } else { Key::Q };
        press(&mut s, wrong, true);
        assert_eq!(s.test().errors(), 1);
        assert!(s.shake.is_active());
    }

    #[test]
    fn typing_the_sentence_finishes_and_enter_restarts() {
        let mut s = scene();
        press(&mut s, Key::Enter, false);
        for c in s.test().sentence().chars() {
            let (key, shift) = key_for(c).unwrap_or_else(|| panic!("no key for {c:?}"));
            press(&mut s, key, shift);
        }
        assert_eq!(s.test().phase(), Phase::Finished);
        assert_eq!(s.test().errors(), 0);
        assert_eq!(s.test().accuracy(), 100.0);

        press(&mut s, Key::Enter, false);
        assert_eq!(s.test().phase(), Phase::Typing);
        assert_eq!(s.test().position(), 0);
    }

    #[test]
    fn escape_quits_only_outside_a_run() {
        let mut s = scene();
        press(&mut s, Key::Enter, false);
        assert!(!update(&mut s, &[Key::Escape]), "typing ignores held escape");

        press(&mut s, Key::Escape, false);
        assert!(!update(&mut s, &[Key::Escape]), "escape that left the run does not quit");
        assert!(!update(&mut s, &[]));
        assert!(update(&mut s, &[Key::Escape]));
    }

    #[test]
    fn cursor_blinks_every_half_second() {
        let mut s = scene();
        assert!(s.cursor_visible());
        s.elapsed = 0.6;
        assert!(!s.cursor_visible());
        s.elapsed = 1.1;
        assert!(s.cursor_visible());
    }

    #[test]
    fn missing_font_falls_back_and_render_resets_camera() {
        let mut s = scene();
        let mut canvas = Canvas::new();
        s.render(&mut canvas);
        assert_eq!(s.font_loaded, Some(false));
        assert_eq!(canvas.camera_position(), Vec2::zero());
        assert_eq!(canvas.clear_color(), BG);
    }
}
