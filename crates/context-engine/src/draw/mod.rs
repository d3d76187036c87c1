//! Per-frame draw stream recorded by the canvas and consumed by the renderer.

mod cmd;
mod list;

pub use cmd::{DrawCmd, TextCmd};
pub use list::{Batch, DrawList};
