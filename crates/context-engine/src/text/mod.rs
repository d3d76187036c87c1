//! Font loading and text metrics (fontdue).

mod font_system;

pub use font_system::{FontError, FontId, FontSystem, NamedFont};
