//! Overlay placement within the canvas container.

use serde::{Deserialize, Serialize};

use crate::config::OverlayMargins;

/// Position in container pixels, origin at the top-left corner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Component-wise `self + (other - origin)`.
    pub fn offset_by(self, origin: Point, current: Point) -> Point {
        Point::new(self.x + (current.x - origin.x), self.y + (current.y - origin.y))
    }
}

/// Container dimensions in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// Clamp an overlay position into the container.
///
/// `x` lands in `[margin, width - edge_margin_x]` and `y` in
/// `[margin, height - min_overlay_height]`. When the container is too small
/// for that range the margin wins. `NaN` coordinates clamp to the margin.
pub fn clamp_position(position: Point, container: Size, margins: &OverlayMargins) -> Point {
    let max_x = container.width - margins.edge_margin_x;
    let max_y = container.height - margins.min_overlay_height;
    Point::new(
        clamp_axis(position.x, margins.margin, max_x),
        clamp_axis(position.y, margins.margin, max_y),
    )
}

fn clamp_axis(value: f32, min: f32, max: f32) -> f32 {
    if value.is_nan() {
        return min;
    }
    value.min(max).max(min)
}

/// Wrap budget for an overlay whose left edge sits at `overlay_x`.
pub fn available_width(container_width: f32, overlay_x: f32, margins: &OverlayMargins) -> f32 {
    (container_width - overlay_x - margins.trailing_margin).max(margins.min_wrap_width)
}
