//! Keyboard, mouse and window input, independent of winit.
//!
//! The runtime translates window events into [`InputEvent`]s; the engine
//! folds them into [`InputState`] (what is held now) and [`InputFrame`]
//! (what changed this frame).

mod frame;
pub(crate) mod platform;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{
    InputEvent, Key, KeyState, Modifiers, MouseButton, MouseButtonState, MouseWheelDelta,
    PointerButtonEvent, PointerMoveEvent, TextEvent,
};
