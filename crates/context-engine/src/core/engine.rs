use anyhow::Result;

use crate::canvas::Canvas;
use crate::coords::Vec2;
use crate::input::{InputEvent, InputFrame, InputState};
use crate::time::FrameTime;

use super::config::EngineConfig;
use super::ctx::EngineCtx;
use super::scene::Scene;

/// Owns the scenes, the canvas and input state, and drives one active scene.
///
/// The window loop lives in [`run`](Engine::run); everything else is plain
/// state that can be driven directly, which is how the tests use it.
pub struct Engine {
    config: EngineConfig,
    scenes: Vec<Box<dyn Scene>>,
    current: Option<usize>,

    canvas: Canvas,
    input: InputState,
    input_frame: InputFrame,

    running: bool,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            scenes: Vec::new(),
            current: None,
            canvas: Canvas::new(),
            input: InputState::default(),
            input_frame: InputFrame::default(),
            running: true,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Appends a scene. The first scene added becomes active right away.
    pub fn add_scene(&mut self, scene: impl Scene + 'static) {
        self.scenes.push(Box::new(scene));
        log::debug!("scene {} added", self.scenes.len() - 1);

        if self.current.is_none() {
            self.activate(0);
        }
    }

    /// Makes scene `index` active: the current scene exits, then the new one
    /// loads. Switching to the active index reloads it. Out-of-range indices
    /// are ignored and return `false`.
    pub fn switch_scene(&mut self, index: usize) -> bool {
        if index >= self.scenes.len() {
            log::warn!(
                "switch to scene {index} ignored; only {} scene(s) registered",
                self.scenes.len()
            );
            return false;
        }

        if let Some(cur) = self.current {
            self.scenes[cur].on_exit();
        }
        self.activate(index);
        true
    }

    fn activate(&mut self, index: usize) {
        self.current = Some(index);
        self.scenes[index].on_load();
        log::info!("scene {index} loaded");
    }

    pub fn current_scene_index(&self) -> Option<usize> {
        self.current
    }

    pub fn scene_count(&self) -> usize {
        self.scenes.len()
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// For setup before `run`, e.g. loading extra fonts.
    pub fn canvas_mut(&mut self) -> &mut Canvas {
        &mut self.canvas
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stops the loop after the current frame.
    pub fn quit(&mut self) {
        self.running = false;
    }

    fn active_scene(&mut self) -> Option<&mut Box<dyn Scene>> {
        let index = self.current?;
        self.scenes.get_mut(index)
    }

    /// Applies `event` to the input state, then hands it to the active scene.
    pub fn dispatch_event(&mut self, event: InputEvent) {
        if matches!(event, InputEvent::CloseRequested) {
            log::info!("close requested");
            self.running = false;
        }

        self.input.apply_event(&mut self.input_frame, event.clone());

        if let Some(scene) = self.active_scene() {
            scene.handle_event(&event);
        }
    }

    /// Runs the active scene's `update`, then applies its quit/switch requests.
    pub fn update(&mut self, time: FrameTime, window_size: Vec2) {
        let Some(index) = self.current else { return; };

        let (quit, switch_to) = {
            let mut ctx = EngineCtx::new(&self.input, &self.input_frame, time, window_size);
            self.scenes[index].update(time.dt, &mut ctx);
            (ctx.is_quit_requested(), ctx.requested_scene())
        };

        if let Some(next) = switch_to {
            self.switch_scene(next);
        }
        if quit {
            log::info!("quit requested by scene {index}");
            self.quit();
        }
    }

    /// Resets the canvas to an empty black frame and lets the active scene draw.
    pub fn render(&mut self) {
        self.canvas.begin_frame();
        let Some(index) = self.current else { return; };
        self.scenes[index].render(&mut self.canvas);
    }

    /// Drops this frame's input transitions.
    pub fn end_frame(&mut self) {
        self.input_frame.clear();
    }

    pub(crate) fn load_default_font(&mut self) {
        let Some(font) = self.config.default_font.clone() else { return; };
        if let Err(e) = self.canvas.load_font(&font.name, &font.path, font.size) {
            log::warn!("default font not loaded: {e}");
        }
    }

    /// Opens the window and runs the frame loop until a quit is requested or
    /// the window closes.
    pub fn run(self) -> Result<()> {
        crate::window::run(self)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::coords::Rect;
    use crate::input::{Key, KeyState, Modifiers};
    use crate::paint::Color;
    use crate::time::FrameClock;

    type Log = Rc<RefCell<Vec<String>>>;

    /// Records every callback it receives into a shared log.
    struct Recorder {
        name: &'static str,
        log: Log,
        quit_on_update: bool,
        switch_on_update: Option<usize>,
    }

    impl Recorder {
        fn new(name: &'static str, log: &Log) -> Self {
            Self {
                name,
                log: Rc::clone(log),
                quit_on_update: false,
                switch_on_update: None,
            }
        }

        fn note(&self, what: &str) {
            self.log.borrow_mut().push(format!("{}:{what}", self.name));
        }
    }

    impl Scene for Recorder {
        fn on_load(&mut self) {
            self.note("load");
        }

        fn on_exit(&mut self) {
            self.note("exit");
        }

        fn handle_event(&mut self, _event: &InputEvent) {
            self.note("event");
        }

        fn update(&mut self, _dt: f32, ctx: &mut EngineCtx<'_>) {
            self.note("update");
            if self.quit_on_update {
                ctx.quit();
            }
            if let Some(i) = self.switch_on_update {
                ctx.switch_scene(i);
            }
        }

        fn render(&mut self, canvas: &mut Canvas) {
            self.note("render");
            canvas.draw_rect(Rect::new(0.0, 0.0, 4.0, 4.0), Color::WHITE);
        }
    }

    fn engine() -> Engine {
        Engine::new(EngineConfig::default().no_default_font())
    }

    fn tick() -> FrameTime {
        FrameClock::new().tick()
    }

    fn take(log: &Log) -> Vec<String> {
        std::mem::take(&mut *log.borrow_mut())
    }

    #[test]
    fn first_scene_loads_immediately() {
        let log = Log::default();
        let mut e = engine();
        assert_eq!(e.current_scene_index(), None);

        e.add_scene(Recorder::new("a", &log));
        e.add_scene(Recorder::new("b", &log));
        assert_eq!(e.current_scene_index(), Some(0));
        assert_eq!(e.scene_count(), 2);
        assert_eq!(take(&log), ["a:load"]);
    }

    #[test]
    fn switch_exits_then_loads() {
        let log = Log::default();
        let mut e = engine();
        e.add_scene(Recorder::new("a", &log));
        e.add_scene(Recorder::new("b", &log));
        take(&log);

        assert!(e.switch_scene(1));
        assert_eq!(take(&log), ["a:exit", "b:load"]);
        assert_eq!(e.current_scene_index(), Some(1));
    }

    #[test]
    fn switching_to_active_scene_reloads_it() {
        let log = Log::default();
        let mut e = engine();
        e.add_scene(Recorder::new("a", &log));
        take(&log);

        assert!(e.switch_scene(0));
        assert_eq!(take(&log), ["a:exit", "a:load"]);
    }

    #[test]
    fn out_of_range_switch_is_ignored() {
        let log = Log::default();
        let mut e = engine();
        assert!(!e.switch_scene(0));

        e.add_scene(Recorder::new("a", &log));
        take(&log);
        assert!(!e.switch_scene(5));
        assert!(take(&log).is_empty());
        assert_eq!(e.current_scene_index(), Some(0));
    }

    #[test]
    fn only_the_active_scene_is_driven() {
        let log = Log::default();
        let mut e = engine();
        e.add_scene(Recorder::new("a", &log));
        e.add_scene(Recorder::new("b", &log));
        take(&log);

        e.dispatch_event(InputEvent::Focused(true));
        e.update(tick(), Vec2::new(800.0, 600.0));
        e.render();
        assert_eq!(take(&log), ["a:event", "a:update", "a:render"]);
        assert!(!e.canvas().draw_list().is_empty());
    }

    #[test]
    fn no_scene_is_a_no_op() {
        let mut e = engine();
        e.dispatch_event(InputEvent::Focused(true));
        e.update(tick(), Vec2::zero());
        e.render();
        assert!(e.canvas().draw_list().is_empty());
        assert!(e.is_running());
    }

    #[test]
    fn scene_can_quit() {
        let log = Log::default();
        let mut e = engine();
        let mut scene = Recorder::new("a", &log);
        scene.quit_on_update = true;
        e.add_scene(scene);

        e.update(tick(), Vec2::zero());
        assert!(!e.is_running());
    }

    #[test]
    fn scene_switch_is_applied_after_update() {
        let log = Log::default();
        let mut e = engine();
        let mut a = Recorder::new("a", &log);
        a.switch_on_update = Some(1);
        e.add_scene(a);
        e.add_scene(Recorder::new("b", &log));
        take(&log);

        e.update(tick(), Vec2::zero());
        assert_eq!(take(&log), ["a:update", "a:exit", "b:load"]);
        assert_eq!(e.current_scene_index(), Some(1));
    }

    #[test]
    fn close_request_stops_the_engine() {
        let mut e = engine();
        e.dispatch_event(InputEvent::CloseRequested);
        assert!(!e.is_running());
    }

    #[test]
    fn input_is_applied_before_scene_sees_it() {
        struct HeldZ(Rc<RefCell<bool>>);
        impl Scene for HeldZ {
            fn update(&mut self, _dt: f32, ctx: &mut EngineCtx<'_>) {
                *self.0.borrow_mut() = ctx.is_key_pressed(Key::Z);
            }
        }

        let seen = Rc::new(RefCell::new(false));
        let mut e = engine();
        e.add_scene(HeldZ(Rc::clone(&seen)));
        e.dispatch_event(InputEvent::Key {
            key: Key::Z,
            state: KeyState::Pressed,
            modifiers: Modifiers::default(),
            code: 0,
            repeat: false,
        });
        e.update(tick(), Vec2::zero());
        assert!(*seen.borrow());

        e.end_frame();
        assert!(e.input().key_down(Key::Z), "held keys survive the frame");
    }

    #[test]
    fn render_starts_from_black() {
        let mut e = engine();
        e.canvas_mut().clear(Color::WHITE);
        e.render();
        assert_eq!(e.canvas().clear_color(), Color::BLACK);
    }
}
