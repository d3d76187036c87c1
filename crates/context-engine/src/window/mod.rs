//! Window and frame loop (winit).

mod runtime;

pub(crate) use runtime::run;
