use std::path::PathBuf;
use std::time::Duration;

use crate::device::GpuInit;

/// Environment variable overriding the default font path.
pub const FONT_PATH_ENV: &str = "CONTEXT_ENGINE_FONT";

/// A font file to load under `name` at `size` pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSource {
    pub name: String,
    pub path: PathBuf,
    pub size: f32,
}

impl FontSource {
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>, size: f32) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            size,
        }
    }
}

impl Default for FontSource {
    fn default() -> Self {
        Self::new("default", "assets/font.ttf", 16.0)
    }
}

/// Window, pacing and GPU settings for an [`Engine`](super::Engine).
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub title: String,
    /// Logical pixels.
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    /// Time between frames.
    pub frame_interval: Duration,
    /// Loaded when the engine starts; a missing file is only a warning.
    pub default_font: Option<FontSource>,
    pub gpu: GpuInit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            title: "Context Engine".to_string(),
            width: 800,
            height: 600,
            resizable: true,
            frame_interval: Duration::from_millis(16),
            default_font: Some(FontSource::default()),
            gpu: GpuInit::default(),
        }
    }
}

impl EngineConfig {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    /// Zero is raised to 1 ms.
    pub fn frame_interval(mut self, interval: Duration) -> Self {
        self.frame_interval = interval.max(Duration::from_millis(1));
        self
    }

    pub fn default_font(mut self, font: FontSource) -> Self {
        self.default_font = Some(font);
        self
    }

    pub fn no_default_font(mut self) -> Self {
        self.default_font = None;
        self
    }

    pub fn gpu(mut self, gpu: GpuInit) -> Self {
        self.gpu = gpu;
        self
    }

    /// Applies `CONTEXT_ENGINE_FONT` when set.
    pub fn with_env_overrides(self) -> Self {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(mut self, var: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(path) = var(FONT_PATH_ENV).filter(|p| !p.is_empty()) {
            log::debug!("{FONT_PATH_ENV} overrides default font path: {path}");
            let font = self.default_font.take().unwrap_or_default();
            self.default_font = Some(FontSource {
                path: PathBuf::from(path),
                ..font
            });
        }
        self
    }
}
