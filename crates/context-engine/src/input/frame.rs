use std::collections::HashSet;

use super::types::{InputEvent, Key, MouseButton, TextEvent};

/// What happened to input during one frame.
///
/// Held state lives in [`InputState`](super::InputState); this only records
/// edges and the raw event stream, and is cleared after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    pub events: Vec<InputEvent>,
    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,
    pub text: Vec<TextEvent>,
}

impl InputFrame {
    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn key_released(&self, key: Key) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn button_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    /// No events arrived this frame.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Empties every set, keeping allocations.
    pub fn clear(&mut self) {
        let Self {
            events,
            keys_pressed,
            keys_released,
            buttons_pressed,
            buttons_released,
            text,
        } = self;
        events.clear();
        keys_pressed.clear();
        keys_released.clear();
        buttons_pressed.clear();
        buttons_released.clear();
        text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clear_drops_edges_and_events() {
        let mut frame = InputFrame::default();
        frame.keys_pressed.insert(Key::Enter);
        frame.buttons_released.insert(MouseButton::Left);
        frame.push_event(InputEvent::CloseRequested);
        assert!(frame.key_pressed(Key::Enter));
        assert!(frame.button_released(MouseButton::Left));

        frame.clear();
        assert!(frame.is_empty());
        assert!(!frame.key_pressed(Key::Enter));
        assert!(!frame.button_released(MouseButton::Left));
    }
}
