use std::fmt;

/// Keyboard key identifier.
///
/// The runtime maps platform key codes into these variants where possible.
/// Letters, digits and punctuation follow the physical US layout.
/// For unsupported keys, `Key::Unknown(u32)` carries a stable platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    // Common control keys
    Escape,
    Enter,
    Tab,
    Backspace,
    Space,

    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Modifiers as keys
    Shift,
    Control,
    Alt,
    Meta,

    // Letters
    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    // Digits
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    // Punctuation
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Comma,
    Period,
    Slash,
    Backquote,

    // Function keys
    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    /// Platform-dependent key not yet represented here.
    Unknown(u32),
}

impl Key {
    /// Printable ASCII character this key produces on a US layout.
    ///
    /// `shift` uppercases letters and selects the shifted symbol for digits and
    /// punctuation. Returns `None` for non-printable keys.
    pub fn to_char(self, shift: bool) -> Option<char> {
        if let Some(c) = self.letter() {
            return Some(if shift { c.to_ascii_uppercase() } else { c });
        }

        let (plain, shifted) = match self {
            Key::Space => (' ', ' '),
            Key::Digit1 => ('1', '!'),
            Key::Digit2 => ('2', '@'),
            Key::Digit3 => ('3', '#'),
            Key::Digit4 => ('4', '$'),
            Key::Digit5 => ('5', '%'),
            Key::Digit6 => ('6', '^'),
            Key::Digit7 => ('7', '&'),
            Key::Digit8 => ('8', '*'),
            Key::Digit9 => ('9', '('),
            Key::Digit0 => ('0', ')'),
            Key::Minus => ('-', '_'),
            Key::Equal => ('=', '+'),
            Key::BracketLeft => ('[', '{'),
            Key::BracketRight => (']', '}'),
            Key::Backslash => ('\\', '|'),
            Key::Semicolon => (';', ':'),
            Key::Quote => ('\'', '"'),
            Key::Comma => (',', '<'),
            Key::Period => ('.', '>'),
            Key::Slash => ('/', '?'),
            Key::Backquote => ('`', '~'),
            _ => return None,
        };

        Some(if shift { shifted } else { plain })
    }

    fn letter(self) -> Option<char> {
        const LETTERS: [Key; 26] = [
            Key::A, Key::B, Key::C, Key::D, Key::E, Key::F, Key::G, Key::H, Key::I,
            Key::J, Key::K, Key::L, Key::M, Key::N, Key::O, Key::P, Key::Q, Key::R,
            Key::S, Key::T, Key::U, Key::V, Key::W, Key::X, Key::Y, Key::Z,
        ];
        LETTERS
            .iter()
            .position(|&k| k == self)
            .map(|i| (b'a' + i as u8) as char)
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum KeyState {
    Pressed,
    Released,
}

/// Mouse button identifier.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum MouseButtonState {
    Pressed,
    Released,
}

/// Modifier keys state.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta.
///
/// `Line` corresponds to "scroll lines" style input; `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line { x: f32, y: f32 },
    Pixel { x: f32, y: f32 },
}

/// Pointer move event in logical pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerMoveEvent {
    pub x: f32,
    pub y: f32,
}

/// Pointer button event.
///
/// Coordinates are the tracked pointer position at the time of the click.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct PointerButtonEvent {
    pub button: MouseButton,
    pub state: MouseButtonState,
    pub x: f32,
    pub y: f32,
    pub modifiers: Modifiers,
}

/// Committed text (IME commit).
#[derive(Debug, Clone, PartialEq)]
pub struct TextEvent {
    pub text: String,
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Every event is applied to the engine's `InputState` first and then handed
/// to the active scene.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: KeyState,
        modifiers: Modifiers,
        /// Stable platform code when available.
        code: u32,
        /// True when event is a key-repeat.
        repeat: bool,
    },

    PointerMoved(PointerMoveEvent),
    PointerButton(PointerButtonEvent),

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    Text(TextEvent),

    /// Pointer left the window surface.
    PointerLeft,

    /// Window focus change.
    Focused(bool),

    /// The user asked to close the window.
    CloseRequested,

    /// Window resized; logical pixels.
    Resized { width: f32, height: f32 },
}

impl InputEvent {
    /// Returns the key if this is a key press (including repeats).
    pub fn key_pressed(&self) -> Option<(Key, Modifiers)> {
        match self {
            InputEvent::Key {
                key,
                state: KeyState::Pressed,
                modifiers,
                ..
            } => Some((*key, *modifiers)),
            _ => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
