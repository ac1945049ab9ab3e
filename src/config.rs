//! Editor configuration.
//!
//! Every field has a default matching the stock editor page, so a config file
//! only needs to name what it overrides.

use serde::{Deserialize, Serialize};

use crate::compose::ComposeOptions;
use crate::error::EditorError;
use crate::geometry::{Point, Size};

/// Spacing constants that bound the overlay inside its container.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayMargins {
    /// Minimum distance from the top and left edges.
    pub margin: f32,
    /// Reserved distance between the overlay's left edge and the right edge.
    pub edge_margin_x: f32,
    /// Height kept visible below the overlay's top edge.
    pub min_overlay_height: f32,
    /// Gap kept between the wrapped text and the container's right edge.
    pub trailing_margin: f32,
    /// Wrap budget floor when the overlay sits near the right edge.
    pub min_wrap_width: f32,
}

impl Default for OverlayMargins {
    fn default() -> Self {
        Self {
            margin: 2.0,
            edge_margin_x: 4.0,
            min_overlay_height: 40.0,
            trailing_margin: 2.0,
            min_wrap_width: 10.0,
        }
    }
}

/// Exported file naming.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportConfig {
    /// Literal filename prefix, e.g. `samp-tools-`.
    pub file_prefix: String,
    /// Inclusive lower bound of the random numeric suffix.
    pub suffix_min: u16,
    /// Inclusive upper bound of the random numeric suffix.
    pub suffix_max: u16,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_prefix: "samp-tools-".to_string(),
            suffix_min: 1000,
            suffix_max: 9999,
        }
    }
}

/// Top-level editor configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Font size used on start and after reset.
    pub default_font_size_px: u16,
    /// Smallest accepted font size.
    pub min_font_size_px: u16,
    /// Largest accepted font size.
    pub max_font_size_px: u16,
    /// Canvas size used on start and after reset.
    pub default_container: Size,
    /// Image zoom used on start and after reset.
    pub default_zoom: f32,
    /// Overlay bounds.
    pub margins: OverlayMargins,
    /// Marker prepended to the first segment of each special line.
    pub special_prefix: String,
    /// Text shown when both blocks compose to nothing.
    pub placeholder_text: String,
    /// Line advance as a multiple of the font size.
    pub line_height_ratio: f32,
    /// Special-line composition options.
    pub compose: ComposeOptions,
    /// Export naming.
    pub export: ExportConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_font_size_px: 14,
            min_font_size_px: 8,
            max_font_size_px: 72,
            default_container: Size::new(800.0, 600.0),
            default_zoom: 1.0,
            margins: OverlayMargins::default(),
            special_prefix: "* ".to_string(),
            placeholder_text: "RP Action Text".to_string(),
            line_height_ratio: 1.2,
            compose: ComposeOptions::default(),
            export: ExportConfig::default(),
        }
    }
}

impl EditorConfig {
    /// Parse a JSON config document and validate it.
    pub fn from_json_str(json: &str) -> Result<Self, EditorError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| EditorError::ConfigParse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Serialize to pretty JSON.
    pub fn to_json_string(&self) -> Result<String, EditorError> {
        serde_json::to_string_pretty(self).map_err(|err| EditorError::ConfigParse(err.to_string()))
    }

    /// Reject configs the layout math cannot work with.
    pub fn validate(&self) -> Result<(), EditorError> {
        if self.min_font_size_px == 0 || self.min_font_size_px > self.max_font_size_px {
            return Err(EditorError::InvalidConfig(
                "font size range must be non-empty and start above zero",
            ));
        }
        if !(self.min_font_size_px..=self.max_font_size_px).contains(&self.default_font_size_px) {
            return Err(EditorError::InvalidConfig(
                "default font size outside the font size range",
            ));
        }
        if !is_positive(self.default_container.width) || !is_positive(self.default_container.height)
        {
            return Err(EditorError::InvalidConfig(
                "default container size must be positive",
            ));
        }
        if !is_positive(self.default_zoom) {
            return Err(EditorError::InvalidConfig("default zoom must be positive"));
        }
        if !is_positive(self.line_height_ratio) {
            return Err(EditorError::InvalidConfig(
                "line height ratio must be positive",
            ));
        }
        let m = &self.margins;
        let margins = [
            m.margin,
            m.edge_margin_x,
            m.min_overlay_height,
            m.trailing_margin,
            m.min_wrap_width,
        ];
        if margins.iter().any(|v| !v.is_finite() || *v < 0.0) {
            return Err(EditorError::InvalidConfig(
                "overlay margins must be finite and non-negative",
            ));
        }
        if self.export.suffix_min > self.export.suffix_max {
            return Err(EditorError::InvalidConfig("export suffix range is empty"));
        }
        Ok(())
    }

    /// Overlay position on start and after reset.
    pub fn default_overlay_position(&self) -> Point {
        Point::new(self.margins.margin, self.margins.margin)
    }

    /// Clamp a requested font size into the configured range.
    pub fn clamp_font_size(&self, font_size_px: u16) -> u16 {
        font_size_px.clamp(self.min_font_size_px, self.max_font_size_px)
    }
}

fn is_positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}
