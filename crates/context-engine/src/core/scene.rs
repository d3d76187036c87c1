use crate::canvas::Canvas;
use crate::input::InputEvent;

use super::ctx::EngineCtx;

/// A unit of interactive behaviour driven by the engine while it is active.
///
/// Per frame the active scene sees every input event through
/// [`handle_event`](Scene::handle_event), then one
/// [`update`](Scene::update), then one [`render`](Scene::render).
pub trait Scene {
    /// The scene became the active scene.
    fn on_load(&mut self) {}

    /// The scene stops being the active scene.
    fn on_exit(&mut self) {}

    /// Called after the engine has applied `event` to its own input state.
    fn handle_event(&mut self, event: &InputEvent) {
        let _ = event;
    }

    fn update(&mut self, dt: f32, ctx: &mut EngineCtx<'_>) {
        let _ = (dt, ctx);
    }

    fn render(&mut self, canvas: &mut Canvas) {
        let _ = canvas;
    }
}
