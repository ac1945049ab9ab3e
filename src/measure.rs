//! Text measurement seam used by the wrap and composition passes.

/// Text measurement hook for width-accurate line fitting.
///
/// Measurement is keyed by font size because the same string renders at
/// different widths for every slider position.
pub trait TextMeasurer: Send + Sync {
    /// Measure rendered text width in pixels at the given font size.
    fn measure_text_px(&self, text: &str, font_size_px: u16) -> f32;
}

impl<F> TextMeasurer for F
where
    F: Fn(&str, u16) -> f32 + Send + Sync,
{
    fn measure_text_px(&self, text: &str, font_size_px: u16) -> f32 {
        self(text, font_size_px)
    }
}

/// Width model where every character advances by `font_size * ratio`.
///
/// Useful as a deterministic stand-in for a real font when no rendering
/// backend is around.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixedAdvanceMeasurer {
    advance_ratio: f32,
}

impl FixedAdvanceMeasurer {
    /// Create a measurer with the given advance-to-font-size ratio.
    pub fn new(advance_ratio: f32) -> Self {
        Self {
            advance_ratio: if advance_ratio.is_finite() {
                advance_ratio.max(0.0)
            } else {
                0.0
            },
        }
    }

    /// Advance of a single character at `font_size_px`.
    pub fn advance_px(&self, font_size_px: u16) -> f32 {
        f32::from(font_size_px) * self.advance_ratio
    }
}

impl Default for FixedAdvanceMeasurer {
    fn default() -> Self {
        Self::new(0.55)
    }
}

impl TextMeasurer for FixedAdvanceMeasurer {
    fn measure_text_px(&self, text: &str, font_size_px: u16) -> f32 {
        text.chars().count() as f32 * self.advance_px(font_size_px)
    }
}
