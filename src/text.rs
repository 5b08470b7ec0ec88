//! Text metrics.
//!
//! Glyph measurement is an injected collaborator: the engine only needs the
//! bounding box of a string to know its aspect ratio and where to put the
//! baseline. Implementations must be pure; they may be called repeatedly and
//! in any order.

use crate::render::defaults;

/// Font selection passed to a [`TextMeasurer`].
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub weight: String,
    pub size: f64,
}

impl Default for FontSpec {
    fn default() -> Self {
        FontSpec {
            family: defaults::FONT_FAMILY.to_string(),
            weight: defaults::FONT_WEIGHT.to_string(),
            size: 1.0,
        }
    }
}

impl FontSpec {
    pub fn is_bold(&self) -> bool {
        matches!(self.weight.as_str(), "bold" | "bolder" | "600" | "700" | "800" | "900")
    }
}

/// Ink box of a string relative to its origin (left end of the baseline),
/// y pointing down.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GlyphBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl GlyphBox {
    pub fn aspect(&self) -> Option<f64> {
        (self.width > 0.0 && self.height > 0.0).then(|| self.width / self.height)
    }
}

pub trait TextMeasurer {
    /// Bounding box of `text`, or `None` when it cannot be measured.
    fn measure(&self, text: &str, font: &FontSpec) -> Option<GlyphBox>;
}

/// Deterministic measurer built on a proportional character-width table.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProportionalMeasurer;

impl ProportionalMeasurer {
    /// Width of `text` in hundredths of an average glyph.
    pub fn text_length(text: &str) -> u32 {
        text.chars()
            .map(|c| match c {
                ' '..='~' => defaults::AW_CHAR[(c as usize) - 0x20] as u32,
                _ => 100,
            })
            .sum()
    }
}

impl TextMeasurer for ProportionalMeasurer {
    fn measure(&self, text: &str, font: &FontSpec) -> Option<GlyphBox> {
        let mut width = Self::text_length(text) as f64 * 0.01 * defaults::CHAR_EM * font.size;
        if font.is_bold() {
            width *= 1.1;
        }
        Some(GlyphBox {
            x: 0.0,
            y: -defaults::ASCENT_EM * font.size,
            width,
            height: (defaults::ASCENT_EM + defaults::DESCENT_EM) * font.size,
        })
    }
}

/// A measurer with no metrics; text nodes end up without an aspect.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullMeasurer;

impl TextMeasurer for NullMeasurer {
    fn measure(&self, _text: &str, _font: &FontSpec) -> Option<GlyphBox> {
        None
    }
}
