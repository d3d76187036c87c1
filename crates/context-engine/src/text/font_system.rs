use std::collections::HashMap;
use std::path::{Path, PathBuf};

use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};

use crate::coords::Vec2;

/// Errors from loading a font into the [`FontSystem`].
#[derive(Debug, thiserror::Error)]
pub enum FontError {
    #[error("failed to read font file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse font '{name}': {message}")]
    Parse { name: String, message: String },

    #[error("invalid font size {0}; must be finite and > 0")]
    InvalidSize(f32),
}

/// Handle to a parsed font inside a [`FontSystem`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct FontId(pub(crate) usize);

/// A named font resolved to its handle and the pixel size it was loaded at.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct NamedFont {
    pub id: FontId,
    pub size: f32,
}

/// Fonts registered by name.
///
/// Every font carries the base pixel size it was loaded at; text draws scale
/// that size. The first font that loads successfully becomes the default.
/// Loading under an existing name replaces the entry.
#[derive(Default)]
pub struct FontSystem {
    fonts: Vec<fontdue::Font>,
    by_name: HashMap<String, NamedFont>,
    default_name: Option<String>,
}

impl FontSystem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads and registers a TrueType/OpenType file.
    pub fn load_font(
        &mut self,
        name: &str,
        path: impl AsRef<Path>,
        size: f32,
    ) -> Result<(), FontError> {
        validate_size(size)?;
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|source| FontError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_font_bytes(name, &bytes, size)?;
        log::info!("loaded font '{name}' from {} at {size}px", path.display());
        Ok(())
    }

    /// Registers a font from raw bytes.
    pub fn load_font_bytes(
        &mut self,
        name: &str,
        bytes: &[u8],
        size: f32,
    ) -> Result<(), FontError> {
        validate_size(size)?;
        let settings = fontdue::FontSettings {
            scale: size,
            ..fontdue::FontSettings::default()
        };
        let font = fontdue::Font::from_bytes(bytes, settings).map_err(|message| FontError::Parse {
            name: name.to_owned(),
            message: message.to_owned(),
        })?;

        // Reloading a name replaces its font in place.
        let id = match self.by_name.get(name) {
            Some(existing) => {
                self.fonts[existing.id.0] = font;
                existing.id
            }
            None => {
                self.fonts.push(font);
                FontId(self.fonts.len() - 1)
            }
        };
        self.by_name.insert(name.to_owned(), NamedFont { id, size });

        if self.default_name.is_none() {
            log::debug!("'{name}' is now the default font");
            self.default_name = Some(name.to_owned());
        }
        Ok(())
    }

    pub fn has_font(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    pub fn default_font_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Looks up a font by name, or the default font for `None`.
    pub fn resolve(&self, name: Option<&str>) -> Option<NamedFont> {
        let name = match name {
            Some(n) => n,
            None => self.default_name.as_deref()?,
        };
        self.by_name.get(name).copied()
    }

    pub(crate) fn get(&self, id: FontId) -> Option<&fontdue::Font> {
        self.fonts.get(id.0)
    }

    /// Extent of a single line of text laid out at `px_size`.
    ///
    /// Width is the pen position after the last glyph, so trailing spaces
    /// count. Height is at least the line height of the font.
    pub fn measure(&self, text: &str, id: FontId, px_size: f32) -> Vec2 {
        let Some(font) = self.get(id) else {
            return Vec2::zero();
        };

        let line_height = font
            .horizontal_line_metrics(px_size)
            .map_or(px_size * 1.2, |m| m.new_line_size);

        let mut layout: Layout<()> = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[font], &TextStyle::new(text, px_size, 0));

        let width = layout
            .glyphs()
            .iter()
            .map(|g| {
                let m = font.metrics_indexed(g.key.glyph_index, px_size);
                (g.x - m.xmin as f32 + m.advance_width).max(0.0)
            })
            .fold(0.0f32, f32::max);

        Vec2::new(width, layout.height().max(line_height))
    }
}

fn validate_size(size: f32) -> Result<(), FontError> {
    if size.is_finite() && size > 0.0 {
        Ok(())
    } else {
        Err(FontError::InvalidSize(size))
    }
}
