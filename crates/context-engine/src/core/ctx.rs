use crate::coords::Vec2;
use crate::input::{InputFrame, InputState, Key, Modifiers, MouseButton};
use crate::time::FrameTime;

/// Engine facade handed to [`Scene::update`](super::Scene::update).
///
/// Read access to input and timing, plus requests that the engine applies
/// once `update` returns.
pub struct EngineCtx<'a> {
    input: &'a InputState,
    input_frame: &'a InputFrame,
    time: FrameTime,
    window_size: Vec2,

    quit_requested: bool,
    switch_request: Option<usize>,
}

impl<'a> EngineCtx<'a> {
    pub fn new(
        input: &'a InputState,
        input_frame: &'a InputFrame,
        time: FrameTime,
        window_size: Vec2,
    ) -> Self {
        Self {
            input,
            input_frame,
            time,
            window_size,
            quit_requested: false,
            switch_request: None,
        }
    }

    /// Key is currently held.
    pub fn is_key_pressed(&self, key: Key) -> bool {
        self.input.key_down(key)
    }

    /// Key went down during this frame.
    pub fn was_key_pressed(&self, key: Key) -> bool {
        self.input_frame.key_pressed(key)
    }

    pub fn was_key_released(&self, key: Key) -> bool {
        self.input_frame.key_released(key)
    }

    pub fn modifiers(&self) -> Modifiers {
        self.input.modifiers
    }

    /// Last known pointer position; origin when the pointer is outside.
    pub fn mouse_position(&self) -> Vec2 {
        self.input.pointer_pos.map_or(Vec2::zero(), Vec2::from)
    }

    pub fn mouse_x(&self) -> f32 {
        self.mouse_position().x
    }

    pub fn mouse_y(&self) -> f32 {
        self.mouse_position().y
    }

    /// Left button held.
    pub fn is_mouse_down(&self) -> bool {
        self.input.button_down(MouseButton::Left)
    }

    /// Left button released during this frame.
    pub fn is_mouse_released(&self) -> bool {
        self.input_frame.button_released(MouseButton::Left)
    }

    /// Logical window size.
    pub fn window_size(&self) -> Vec2 {
        self.window_size
    }

    pub fn time(&self) -> FrameTime {
        self.time
    }

    /// Stops the engine loop after the current frame.
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    pub fn is_quit_requested(&self) -> bool {
        self.quit_requested
    }

    /// Switches scenes after `update` returns. The last request wins.
    pub fn switch_scene(&mut self, index: usize) {
        self.switch_request = Some(index);
    }

    pub fn requested_scene(&self) -> Option<usize> {
        self.switch_request
    }
}
