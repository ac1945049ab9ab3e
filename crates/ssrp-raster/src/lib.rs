//! Raster backend for `ssrp-render` frames.
//!
//! Text is drawn with embedded-graphics mono fonts onto an RGBA surface, and
//! [`MonoTextMeasurer`] exposes the same width model to the layout core so
//! wrapping decisions match what ends up in the exported PNG.

#![cfg_attr(
    not(test),
    deny(
        clippy::disallowed_methods,
        clippy::expect_used,
        clippy::unwrap_used,
        clippy::panic,
        clippy::panic_in_result_fn,
        clippy::todo,
        clippy::unimplemented
    )
)]

use core::convert::Infallible;
use core::fmt::{self, Write as _};
use std::borrow::Cow;
use std::io::Cursor;
use std::sync::Arc;

use embedded_graphics::{
    mono_font::{
        ascii::{
            FONT_10X20, FONT_6X13, FONT_6X13_BOLD, FONT_7X14, FONT_7X14_BOLD, FONT_9X18,
            FONT_9X18_BOLD,
        },
        MonoFont, MonoTextStyle,
    },
    pixelcolor::Rgb888,
    prelude::*,
    text::{Baseline, Text},
};
use image::{ImageFormat, Rgba, RgbaImage};
use rand::Rng;
use ssrp_editor::{EditorError, EditorSession, ExportConfig, ImageInfo, LineKind, TextMeasurer};
use ssrp_render::{DrawCommand, Frame, ImageCommand, RenderEngine, TextCommand};

#[cfg(feature = "async")]
mod fs;
#[cfg(feature = "async")]
pub use fs::{load_image_file, write_export};

/// Raster backend error.
#[derive(Debug)]
pub enum RasterError {
    /// Export requested without a loaded image.
    MissingImage,
    /// Image bytes could not be decoded.
    Decode(String),
    /// PNG encoding failed.
    Encode(String),
    /// Export filename does not fit the fixed-size buffer.
    FilenameTooLong,
    /// File read/write failed.
    Io(std::io::Error),
    /// Editor core rejected the operation.
    Editor(EditorError),
}

impl fmt::Display for RasterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingImage => write!(f, "no image loaded; upload an image first"),
            Self::Decode(msg) => write!(f, "image decode failed: {}", msg),
            Self::Encode(msg) => write!(f, "png encode failed: {}", msg),
            Self::FilenameTooLong => write!(f, "export filename too long"),
            Self::Io(err) => write!(f, "io error: {}", err),
            Self::Editor(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RasterError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Editor(err) => Some(err),
            _ => None,
        }
    }
}

impl From<EditorError> for RasterError {
    fn from(value: EditorError) -> Self {
        match value {
            EditorError::MissingImage => Self::MissingImage,
            other => Self::Editor(other),
        }
    }
}

impl From<std::io::Error> for RasterError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

/// Mono font selection by font size bucket.
///
/// Each bucket pairs a regular and a bold face with identical advances, so
/// special lines can be drawn bold without changing their measured width.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoFontBackend;

impl MonoFontBackend {
    /// Face used to draw a line of `kind` at `size_px`.
    pub fn font_for(size_px: u16, kind: LineKind) -> &'static MonoFont<'static> {
        let special = kind == LineKind::Special;
        match size_px {
            0..=12 if special => &FONT_6X13_BOLD,
            0..=12 => &FONT_6X13,
            13..=16 if special => &FONT_7X14_BOLD,
            13..=16 => &FONT_7X14,
            17..=19 if special => &FONT_9X18_BOLD,
            17..=19 => &FONT_9X18,
            _ => &FONT_10X20,
        }
    }

    /// Width of `text` in pixels when drawn at `size_px`.
    pub fn text_width_px(text: &str, size_px: u16) -> u32 {
        let font = Self::font_for(size_px, LineKind::Normal);
        let chars = normalize_text_for_mono(text).chars().count() as u32;
        if chars == 0 {
            return 0;
        }
        chars * font.character_size.width + (chars - 1) * font.character_spacing
    }
}

/// [`TextMeasurer`] backed by [`MonoFontBackend`] metrics.
#[derive(Clone, Copy, Debug, Default)]
pub struct MonoTextMeasurer;

impl MonoTextMeasurer {
    /// Create a shared measurer trait object for session wiring.
    pub fn shared() -> Arc<dyn TextMeasurer> {
        Arc::new(Self)
    }
}

impl TextMeasurer for MonoTextMeasurer {
    fn measure_text_px(&self, text: &str, font_size_px: u16) -> f32 {
        MonoFontBackend::text_width_px(text, font_size_px) as f32
    }
}

fn normalize_text_for_mono(text: &str) -> Cow<'_, str> {
    if !text.chars().any(|ch| {
        matches!(
            ch,
            '\u{00A0}' // nbsp
                | '\u{2013}' // en dash
                | '\u{2014}' // em dash
                | '\u{2018}' // left single quote
                | '\u{2019}' // right single quote
                | '\u{201C}' // left double quote
                | '\u{201D}' // right double quote
                | '\u{2026}' // ellipsis
        )
    }) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\u{00A0}' => out.push(' '),
            '\u{2013}' | '\u{2014}' => out.push('-'),
            '\u{2018}' | '\u{2019}' => out.push('\''),
            '\u{201C}' | '\u{201D}' => out.push('"'),
            '\u{2026}' => out.push_str("..."),
            other => out.push(other),
        }
    }
    Cow::Owned(out)
}

/// Colours used when rasterizing a frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RasterStyle {
    /// Surface fill for [`DrawCommand::Clear`].
    pub background: [u8; 4],
    /// Normal line colour.
    pub normal_text: [u8; 3],
    /// Special line colour.
    pub special_text: [u8; 3],
}

impl Default for RasterStyle {
    fn default() -> Self {
        Self {
            background: [0, 0, 0, 0],
            normal_text: [0xFF, 0xFF, 0xFF],
            special_text: [0xC2, 0xA2, 0xDA],
        }
    }
}

/// Decoded RGBA image ready for compositing.
#[derive(Clone, Debug, PartialEq)]
pub struct DecodedImage {
    pixels: RgbaImage,
}

impl DecodedImage {
    pub fn from_rgba(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn info(&self) -> ImageInfo {
        ImageInfo {
            width: self.pixels.width(),
            height: self.pixels.height(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}

/// Decode image bytes (PNG, JPEG, GIF, WebP).
pub fn decode_image(bytes: &[u8]) -> Result<DecodedImage, RasterError> {
    match image::load_from_memory(bytes) {
        Ok(decoded) => Ok(DecodedImage::from_rgba(decoded.to_rgba8())),
        Err(err) => {
            log::warn!("image decode failed ({} bytes): {}", bytes.len(), err);
            Err(RasterError::Decode(err.to_string()))
        }
    }
}

/// Decode `bytes` and hand the result to the session.
///
/// On failure the session keeps its previous image.
pub fn load_image_into(
    session: &mut EditorSession,
    bytes: &[u8],
) -> Result<DecodedImage, RasterError> {
    let decoded = decode_image(bytes)?;
    session.load_image(decoded.info());
    Ok(decoded)
}

/// `DrawTarget` over an RGBA buffer.
#[derive(Clone, Debug)]
pub struct RgbaSurface {
    pixels: RgbaImage,
}

impl RgbaSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
        }
    }

    pub fn fill(&mut self, rgba: [u8; 4]) {
        for px in self.pixels.pixels_mut() {
            *px = Rgba(rgba);
        }
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    pub fn image(&self) -> &RgbaImage {
        &self.pixels
    }

    fn draw_image(&mut self, src: &RgbaImage, cmd: &ImageCommand) {
        if !cmd.scale.is_finite() || cmd.scale <= 0.0 {
            return;
        }
        let (x0, y0, w, h) = cmd.dest_rect();
        let (surface_w, surface_h) = self.pixels.dimensions();
        let start_x = x0.max(0.0).floor() as u32;
        let start_y = y0.max(0.0).floor() as u32;
        let end_x = ((x0 + w).ceil().max(0.0) as u32).min(surface_w);
        let end_y = ((y0 + h).ceil().max(0.0) as u32).min(surface_h);

        for dy in start_y..end_y {
            let sy = ((dy as f32 + 0.5 - y0) / cmd.scale).floor();
            if sy < 0.0 || sy >= src.height() as f32 {
                continue;
            }
            for dx in start_x..end_x {
                let sx = ((dx as f32 + 0.5 - x0) / cmd.scale).floor();
                if sx < 0.0 || sx >= src.width() as f32 {
                    continue;
                }
                let source = *src.get_pixel(sx as u32, sy as u32);
                blend_over(self.pixels.get_pixel_mut(dx, dy), source);
            }
        }
    }

    fn draw_text(&mut self, cmd: &TextCommand, style: &RasterStyle) {
        let font = MonoFontBackend::font_for(cmd.style.size_px, cmd.style.kind);
        let [r, g, b] = if cmd.style.is_special() {
            style.special_text
        } else {
            style.normal_text
        };
        let glyph_h = font.character_size.height as i32;
        let top = cmd.y + ((cmd.style.line_height - glyph_h) / 2).max(0);
        let text = normalize_text_for_mono(&cmd.text);
        let text_style = MonoTextStyle::new(font, Rgb888::new(r, g, b));
        let origin = Point::new(cmd.x, top);
        let _ = Text::with_baseline(&text, origin, text_style, Baseline::Top).draw(self);
    }
}

impl OriginDimensions for RgbaSurface {
    fn size(&self) -> Size {
        Size::new(self.pixels.width(), self.pixels.height())
    }
}

impl DrawTarget for RgbaSurface {
    type Color = Rgb888;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        let (w, h) = self.pixels.dimensions();
        for Pixel(point, color) in pixels {
            if point.x < 0 || point.y < 0 {
                continue;
            }
            let (x, y) = (point.x as u32, point.y as u32);
            if x >= w || y >= h {
                continue;
            }
            self.pixels
                .put_pixel(x, y, Rgba([color.r(), color.g(), color.b(), 0xFF]));
        }
        Ok(())
    }
}

fn blend_over(dst: &mut Rgba<u8>, src: Rgba<u8>) {
    let sa = u32::from(src[3]);
    if sa == 0xFF {
        *dst = src;
        return;
    }
    if sa == 0 {
        return;
    }
    let da = u32::from(dst[3]) * (0xFF - sa) / 0xFF;
    let out_a = sa + da;
    for c in 0..3 {
        let v = (u32::from(src[c]) * sa + u32::from(dst[c]) * da) / out_a;
        dst[c] = v as u8;
    }
    dst[3] = out_a as u8;
}

/// Rasterize a frame. Image commands are skipped when `image` is `None`.
pub fn rasterize(frame: &Frame, image: Option<&DecodedImage>, style: &RasterStyle) -> RgbaImage {
    let mut surface = RgbaSurface::new(frame.width, frame.height);
    for cmd in frame.commands_iter() {
        match cmd {
            DrawCommand::Clear => surface.fill(style.background),
            DrawCommand::Image(image_cmd) => match image {
                Some(decoded) => surface.draw_image(decoded.pixels(), image_cmd),
                None => log::warn!("frame draws an image but none was supplied"),
            },
            DrawCommand::Text(text) => surface.draw_text(text, style),
        }
    }
    surface.into_image()
}

/// Encode an RGBA buffer as PNG.
pub fn encode_png(pixels: &RgbaImage) -> Result<Vec<u8>, RasterError> {
    let mut out = Cursor::new(Vec::new());
    pixels
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|err| RasterError::Encode(err.to_string()))?;
    Ok(out.into_inner())
}

/// Fixed-capacity export filename.
pub type ExportFilename = heapless::String<64>;

/// `<prefix><suffix>.png` with a suffix drawn uniformly from the configured range.
pub fn export_filename<R: Rng>(
    cfg: &ExportConfig,
    rng: &mut R,
) -> Result<ExportFilename, RasterError> {
    let lo = cfg.suffix_min.min(cfg.suffix_max);
    let hi = cfg.suffix_min.max(cfg.suffix_max);
    let suffix: u16 = rng.gen_range(lo..=hi);
    let mut name = ExportFilename::new();
    write!(name, "{}{}.png", cfg.file_prefix, suffix).map_err(|_| RasterError::FilenameTooLong)?;
    Ok(name)
}

/// Exported composition.
#[derive(Clone, Debug, PartialEq)]
pub struct ExportedImage {
    pub filename: ExportFilename,
    /// PNG bytes.
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Captures the current session into a PNG.
#[derive(Clone, Debug, Default)]
pub struct Exporter {
    style: RasterStyle,
}

impl Exporter {
    pub fn new(style: RasterStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &RasterStyle {
        &self.style
    }

    /// Export with a thread-local random suffix.
    pub fn export(
        &self,
        session: &mut EditorSession,
        engine: &RenderEngine,
        image: Option<&DecodedImage>,
    ) -> Result<ExportedImage, RasterError> {
        self.export_with_rng(session, engine, image, &mut rand::thread_rng())
    }

    /// Export using `rng` for the filename suffix.
    ///
    /// Fails without producing output when no image is loaded; the session is
    /// left as it was in every failure case.
    pub fn export_with_rng<R: Rng>(
        &self,
        session: &mut EditorSession,
        engine: &RenderEngine,
        image: Option<&DecodedImage>,
        rng: &mut R,
    ) -> Result<ExportedImage, RasterError> {
        let info = session.ensure_exportable()?;
        let Some(image) = image else {
            return Err(RasterError::MissingImage);
        };
        if image.info() != info {
            log::warn!(
                "exporting {}x{} pixels for a session image of {}x{}",
                image.info().width,
                image.info().height,
                info.width,
                info.height
            );
        }

        let frame = engine.render(session);
        let pixels = rasterize(&frame, Some(image), &self.style);
        let (width, height) = pixels.dimensions();
        let png = encode_png(&pixels).inspect_err(|err| log::error!("export failed: {}", err))?;
        let filename = export_filename(&session.config().export, rng)
            .inspect_err(|err| log::error!("export failed: {}", err))?;
        log::debug!("exported {} ({} bytes)", filename, png.len());
        Ok(ExportedImage {
            filename,
            png,
            width,
            height,
        })
    }
}
