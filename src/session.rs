//! The single mutable editor session.
//!
//! All editor state lives here: text blocks, font size, container size,
//! overlay and image placement, and the two drag trackers. Input handlers
//! mutate it and the pure layout functions read from it.

use std::sync::Arc;

use crate::compose::{compose_lines_with_options, Line, TextBlock};
use crate::config::EditorConfig;
use crate::drag::DragTracker;
use crate::error::EditorError;
use crate::geometry::{available_width, clamp_position, Point, Size};
use crate::input::{parse_slider_float, parse_slider_int, DragTarget, EditorInput, PointerPhase};
use crate::measure::TextMeasurer;

/// Layout inputs that persist for the session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LayoutState {
    pub font_size_px: u16,
    pub container: Size,
    /// Top-left corner of the overlay, always clamped into the container.
    pub overlay: Point,
}

/// Pixel dimensions of a decoded image.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

/// Canvas transform applied when drawing the image.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImageTransform {
    /// Translation of the image's top-left corner.
    pub offset: Point,
    /// Uniform zoom factor.
    pub scale: f32,
}

/// Editor state for one compositing session.
pub struct EditorSession {
    cfg: EditorConfig,
    measurer: Arc<dyn TextMeasurer>,
    layout: LayoutState,
    special: TextBlock,
    normal: TextBlock,
    image: Option<ImageInfo>,
    transform: ImageTransform,
    image_drag: DragTracker,
    overlay_drag: DragTracker,
    lines: Option<Vec<Line>>,
}

impl core::fmt::Debug for EditorSession {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EditorSession")
            .field("layout", &self.layout)
            .field("special", &self.special)
            .field("normal", &self.normal)
            .field("image", &self.image)
            .field("transform", &self.transform)
            .field("image_drag", &self.image_drag)
            .field("overlay_drag", &self.overlay_drag)
            .finish_non_exhaustive()
    }
}

impl EditorSession {
    /// Create a session from a validated config.
    pub fn new(cfg: EditorConfig, measurer: Arc<dyn TextMeasurer>) -> Result<Self, EditorError> {
        cfg.validate()?;
        Ok(Self::from_valid_config(cfg, measurer))
    }

    /// Create a session with the stock editor defaults.
    pub fn with_defaults(measurer: Arc<dyn TextMeasurer>) -> Self {
        Self::from_valid_config(EditorConfig::default(), measurer)
    }

    fn from_valid_config(cfg: EditorConfig, measurer: Arc<dyn TextMeasurer>) -> Self {
        let layout = Self::default_layout(&cfg);
        let transform = ImageTransform {
            offset: Point::default(),
            scale: cfg.default_zoom,
        };
        Self {
            cfg,
            measurer,
            layout,
            special: TextBlock::special(""),
            normal: TextBlock::normal(""),
            image: None,
            transform,
            image_drag: DragTracker::new(),
            overlay_drag: DragTracker::new(),
            lines: None,
        }
    }

    fn default_layout(cfg: &EditorConfig) -> LayoutState {
        LayoutState {
            font_size_px: cfg.default_font_size_px,
            container: cfg.default_container,
            overlay: clamp_position(
                cfg.default_overlay_position(),
                cfg.default_container,
                &cfg.margins,
            ),
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.cfg
    }

    pub fn measurer(&self) -> &dyn TextMeasurer {
        self.measurer.as_ref()
    }

    pub fn layout_state(&self) -> LayoutState {
        self.layout
    }

    pub fn image(&self) -> Option<ImageInfo> {
        self.image
    }

    pub fn image_transform(&self) -> ImageTransform {
        self.transform
    }

    pub fn special_text(&self) -> &str {
        &self.special.content
    }

    pub fn normal_text(&self) -> &str {
        &self.normal.content
    }

    pub fn is_dragging(&self, target: DragTarget) -> bool {
        match target {
            DragTarget::Image => self.image_drag.is_dragging(),
            DragTarget::Overlay => self.overlay_drag.is_dragging(),
        }
    }

    /// Current wrap budget, derived from the container width and overlay x.
    pub fn overlay_width(&self) -> f32 {
        available_width(
            self.layout.container.width,
            self.layout.overlay.x,
            &self.cfg.margins,
        )
    }

    /// Composed overlay lines, recomputed after any content, font size, or
    /// width change.
    pub fn lines(&mut self) -> &[Line] {
        if self.lines.is_none() {
            let composed = self.compose();
            self.lines = Some(composed);
        }
        self.lines.as_deref().unwrap_or(&[])
    }

    fn compose(&self) -> Vec<Line> {
        compose_lines_with_options(
            &self.special,
            &self.normal,
            self.overlay_width(),
            self.layout.font_size_px,
            &self.cfg.special_prefix,
            self.cfg.compose,
            self.measurer.as_ref(),
        )
    }

    fn invalidate_lines(&mut self) {
        self.lines = None;
    }

    /// Replace the special block content.
    pub fn set_special_text(&mut self, content: impl Into<String>) {
        self.special.content = content.into();
        self.after_text_change();
    }

    /// Replace the normal block content.
    pub fn set_normal_text(&mut self, content: impl Into<String>) {
        self.normal.content = content.into();
        self.after_text_change();
    }

    fn after_text_change(&mut self) {
        if self.special.is_empty() && self.normal.is_empty() {
            // Cleared overlay snaps back to the top.
            self.layout.overlay.y = self.cfg.margins.margin;
            self.reposition_overlay();
        }
        self.invalidate_lines();
    }

    /// Set the font size, clamped into the configured range.
    pub fn set_font_size(&mut self, font_size_px: u16) {
        let clamped = self.cfg.clamp_font_size(font_size_px);
        if clamped != font_size_px {
            log::warn!(
                "font size {}px outside [{}, {}], using {}px",
                font_size_px,
                self.cfg.min_font_size_px,
                self.cfg.max_font_size_px,
                clamped
            );
        }
        if clamped != self.layout.font_size_px {
            self.layout.font_size_px = clamped;
            self.invalidate_lines();
        }
    }

    /// Set the font size from raw slider input.
    pub fn set_font_size_input(&mut self, raw: &str) {
        let size = parse_slider_int(raw, self.layout.font_size_px);
        self.set_font_size(size);
    }

    /// Resize the container.
    ///
    /// The overlay is clamped into the new bounds before the wrap width is
    /// recomputed, so the next wrap pass never sees a stale width.
    pub fn resize_container(&mut self, container: Size) {
        let valid = |v: f32| v.is_finite() && v > 0.0;
        if !valid(container.width) || !valid(container.height) {
            log::warn!(
                "ignoring container resize to {}x{}",
                container.width,
                container.height
            );
            return;
        }
        log::debug!(
            "container resize {}x{} -> {}x{}",
            self.layout.container.width,
            self.layout.container.height,
            container.width,
            container.height
        );
        self.layout.container = container;
        if self.image.is_some() {
            self.center_image();
        }
        self.reposition_overlay();
        self.invalidate_lines();
    }

    /// Set the container width from raw slider input.
    pub fn set_container_width_input(&mut self, raw: &str) {
        let current = self.layout.container;
        let width = parse_slider_float(raw, current.width);
        self.resize_container(Size::new(width, current.height));
    }

    /// Set the container height from raw slider input.
    pub fn set_container_height_input(&mut self, raw: &str) {
        let current = self.layout.container;
        let height = parse_slider_float(raw, current.height);
        self.resize_container(Size::new(current.width, height));
    }

    /// Set the image zoom. Non-positive or non-finite values are ignored.
    pub fn set_zoom(&mut self, scale: f32) {
        if !scale.is_finite() || scale <= 0.0 {
            log::warn!("ignoring zoom {}", scale);
            return;
        }
        self.transform.scale = scale;
    }

    /// Set the image zoom from raw slider input.
    pub fn set_zoom_input(&mut self, raw: &str) {
        let scale = parse_slider_float(raw, self.transform.scale);
        self.set_zoom(scale);
    }

    /// Record a freshly decoded image and centre it in the container.
    pub fn load_image(&mut self, info: ImageInfo) {
        log::debug!("image loaded: {}x{}", info.width, info.height);
        self.image = Some(info);
        self.image_drag.end();
        self.center_image();
    }

    /// Centre the loaded image at the current zoom. No-op without an image.
    pub fn center_image(&mut self) {
        let Some(info) = self.image else {
            return;
        };
        let w = info.width as f32 * self.transform.scale;
        let h = info.height as f32 * self.transform.scale;
        self.transform.offset = Point::new(
            (self.layout.container.width - w) / 2.0,
            (self.layout.container.height - h) / 2.0,
        );
    }

    /// Move the overlay, clamped into the container.
    pub fn set_overlay_position(&mut self, position: Point) {
        let clamped = clamp_position(position, self.layout.container, &self.cfg.margins);
        if clamped.x != self.layout.overlay.x {
            self.invalidate_lines();
        }
        self.layout.overlay = clamped;
    }

    fn reposition_overlay(&mut self) {
        let overlay = self.layout.overlay;
        self.set_overlay_position(overlay);
    }

    /// Apply one pointer event. Returns whether anything visible changed.
    pub fn handle_input(&mut self, input: EditorInput) -> bool {
        match (input.target, input.phase) {
            (DragTarget::Image, PointerPhase::Down) => {
                if self.image.is_none() {
                    return false;
                }
                self.image_drag.begin(input.position, self.transform.offset);
                log::debug!("image drag started at {:?}", input.position);
                false
            }
            (DragTarget::Image, PointerPhase::Move) => match self.image_drag.update(input.position)
            {
                Some(offset) => {
                    self.transform.offset = offset;
                    true
                }
                None => false,
            },
            (DragTarget::Overlay, PointerPhase::Down) => {
                self.overlay_drag.begin(input.position, self.layout.overlay);
                log::debug!("overlay drag started at {:?}", input.position);
                false
            }
            (DragTarget::Overlay, PointerPhase::Move) => {
                match self.overlay_drag.update(input.position) {
                    Some(position) => {
                        let before = self.layout.overlay;
                        self.set_overlay_position(position);
                        self.layout.overlay != before
                    }
                    None => false,
                }
            }
            (DragTarget::Image, PointerPhase::Up | PointerPhase::Leave) => {
                if self.image_drag.end() {
                    log::debug!("image drag ended");
                }
                false
            }
            (DragTarget::Overlay, PointerPhase::Up | PointerPhase::Leave) => {
                if self.overlay_drag.end() {
                    log::debug!("overlay drag ended");
                }
                false
            }
        }
    }

    /// Return the loaded image, or fail when there is nothing to export.
    pub fn ensure_exportable(&self) -> Result<ImageInfo, EditorError> {
        self.image.ok_or(EditorError::MissingImage)
    }

    /// Restore every field to the configured defaults and drop the image.
    ///
    /// Callers reload their default image afterwards if they have one.
    pub fn reset(&mut self) {
        self.layout = Self::default_layout(&self.cfg);
        self.special.content.clear();
        self.normal.content.clear();
        self.image = None;
        self.transform = ImageTransform {
            offset: Point::default(),
            scale: self.cfg.default_zoom,
        };
        self.image_drag.end();
        self.overlay_drag.end();
        self.invalidate_lines();
        log::debug!("editor reset");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::LineKind;
    use crate::measure::FixedAdvanceMeasurer;

    fn session() -> EditorSession {
        EditorSession::with_defaults(Arc::new(FixedAdvanceMeasurer::new(0.5)))
    }

    fn overlay_event(phase: PointerPhase, x: f32, y: f32) -> EditorInput {
        EditorInput::pointer(DragTarget::Overlay, phase, x, y)
    }

    fn image_event(phase: PointerPhase, x: f32, y: f32) -> EditorInput {
        EditorInput::pointer(DragTarget::Image, phase, x, y)
    }

    #[test]
    fn starts_from_defaults() {
        let s = session();
        let layout = s.layout_state();
        assert_eq!(layout.font_size_px, 14);
        assert_eq!(layout.container, Size::new(800.0, 600.0));
        assert_eq!(layout.overlay, Point::new(2.0, 2.0));
        assert_eq!(s.overlay_width(), 796.0);
        assert_eq!(s.image_transform().scale, 1.0);
    }

    #[test]
    fn lines_follow_text_edits() {
        let mut s = session();
        assert!(s.lines().is_empty());
        s.set_special_text("waves");
        s.set_normal_text("hello there");
        let lines = s.lines().to_vec();
        assert_eq!(
            lines,
            vec![
                Line::new("* waves", LineKind::Special),
                Line::new("hello there", LineKind::Normal)
            ]
        );
    }

    #[test]
    fn font_size_change_rewraps() {
        let mut s = session();
        s.resize_container(Size::new(100.0, 200.0));
        s.set_normal_text("aaaa bbbb cccc dddd");
        // 96px budget, 7px per char at 14px: whole text is 133px.
        assert_eq!(s.lines().len(), 2);
        s.set_font_size(28);
        assert_eq!(s.lines().len(), 4);
    }

    #[test]
    fn font_size_input_falls_back_to_previous() {
        let mut s = session();
        s.set_font_size_input("20");
        assert_eq!(s.layout_state().font_size_px, 20);
        s.set_font_size_input("oops");
        assert_eq!(s.layout_state().font_size_px, 20);
        s.set_font_size_input("500");
        assert_eq!(s.layout_state().font_size_px, 72);
    }

    #[test]
    fn overlay_drag_applies_delta_then_clamps() {
        let mut s = session();
        assert!(!s.handle_input(overlay_event(PointerPhase::Down, 50.0, 50.0)));
        assert!(s.is_dragging(DragTarget::Overlay));
        assert!(s.handle_input(overlay_event(PointerPhase::Move, 150.0, 80.0)));
        assert_eq!(s.layout_state().overlay, Point::new(102.0, 32.0));
        assert_eq!(s.overlay_width(), 696.0);

        s.handle_input(overlay_event(PointerPhase::Move, 5000.0, 5000.0));
        assert_eq!(s.layout_state().overlay, Point::new(796.0, 560.0));
        assert_eq!(s.overlay_width(), 10.0);

        s.handle_input(overlay_event(PointerPhase::Leave, 0.0, 0.0));
        assert!(!s.is_dragging(DragTarget::Overlay));
        assert!(!s.handle_input(overlay_event(PointerPhase::Move, 0.0, 0.0)));
        assert_eq!(s.layout_state().overlay, Point::new(796.0, 560.0));
    }

    #[test]
    fn overlay_drag_rewraps_with_new_width() {
        let mut s = session();
        s.set_normal_text("aaaa bbbb cccc");
        assert_eq!(s.lines().len(), 1);
        s.handle_input(overlay_event(PointerPhase::Down, 0.0, 0.0));
        // Overlay x = 702 leaves 96px: "aaaa bbbb cccc" is 98px at 7px/char.
        s.handle_input(overlay_event(PointerPhase::Move, 700.0, 0.0));
        assert_eq!(s.overlay_width(), 96.0);
        assert_eq!(s.lines().len(), 2);
    }

    #[test]
    fn image_drag_requires_an_image() {
        let mut s = session();
        s.handle_input(image_event(PointerPhase::Down, 10.0, 10.0));
        assert!(!s.is_dragging(DragTarget::Image));
        assert!(!s.handle_input(image_event(PointerPhase::Move, 20.0, 20.0)));
    }

    #[test]
    fn image_drag_is_unclamped() {
        let mut s = session();
        s.load_image(ImageInfo {
            width: 400,
            height: 200,
        });
        assert_eq!(s.image_transform().offset, Point::new(200.0, 200.0));
        s.handle_input(image_event(PointerPhase::Down, 10.0, 10.0));
        assert!(s.handle_input(image_event(PointerPhase::Move, -1000.0, 15.0)));
        assert_eq!(s.image_transform().offset, Point::new(-810.0, 205.0));
        s.handle_input(image_event(PointerPhase::Up, 0.0, 0.0));
        assert!(!s.is_dragging(DragTarget::Image));
    }

    #[test]
    fn resize_clamps_overlay_before_width() {
        let mut s = session();
        s.set_overlay_position(Point::new(700.0, 500.0));
        s.resize_container(Size::new(300.0, 200.0));
        assert_eq!(s.layout_state().overlay, Point::new(296.0, 160.0));
        assert_eq!(s.overlay_width(), 10.0);
    }

    #[test]
    fn resize_recenters_loaded_image() {
        let mut s = session();
        s.load_image(ImageInfo {
            width: 100,
            height: 100,
        });
        s.set_zoom(2.0);
        s.resize_container(Size::new(400.0, 300.0));
        assert_eq!(s.image_transform().offset, Point::new(100.0, 50.0));
    }

    #[test]
    fn invalid_resize_and_zoom_are_ignored() {
        let mut s = session();
        s.resize_container(Size::new(0.0, 100.0));
        s.resize_container(Size::new(f32::NAN, 100.0));
        assert_eq!(s.layout_state().container, Size::new(800.0, 600.0));
        s.set_zoom(-1.0);
        s.set_zoom_input("wat");
        assert_eq!(s.image_transform().scale, 1.0);
        s.set_container_width_input("640");
        assert_eq!(s.layout_state().container, Size::new(640.0, 600.0));
        s.set_container_height_input("nope");
        assert_eq!(s.layout_state().container, Size::new(640.0, 600.0));
    }

    #[test]
    fn clearing_both_blocks_returns_overlay_to_top() {
        let mut s = session();
        s.set_normal_text("hi");
        s.set_overlay_position(Point::new(40.0, 300.0));
        s.set_normal_text("");
        assert_eq!(s.layout_state().overlay, Point::new(40.0, 2.0));
    }

    #[test]
    fn export_requires_image() {
        let mut s = session();
        assert_eq!(s.ensure_exportable(), Err(EditorError::MissingImage));
        let info = ImageInfo {
            width: 1,
            height: 1,
        };
        s.load_image(info);
        assert_eq!(s.ensure_exportable(), Ok(info));
    }

    #[test]
    fn reset_restores_defaults() {
        let mut s = session();
        s.set_special_text("*waves");
        s.set_normal_text("hello");
        s.set_font_size(30);
        s.resize_container(Size::new(320.0, 240.0));
        s.set_overlay_position(Point::new(100.0, 100.0));
        s.load_image(ImageInfo {
            width: 10,
            height: 10,
        });
        s.set_zoom(3.0);
        s.handle_input(overlay_event(PointerPhase::Down, 0.0, 0.0));

        s.reset();

        let layout = s.layout_state();
        assert_eq!(layout.font_size_px, 14);
        assert_eq!(layout.container, Size::new(800.0, 600.0));
        assert_eq!(layout.overlay, Point::new(2.0, 2.0));
        assert_eq!(s.image(), None);
        assert_eq!(s.image_transform().scale, 1.0);
        assert_eq!(s.special_text(), "");
        assert_eq!(s.normal_text(), "");
        assert!(!s.is_dragging(DragTarget::Overlay));
        assert!(s.lines().is_empty());
    }

    #[test]
    fn new_rejects_invalid_config() {
        let cfg = EditorConfig {
            default_zoom: 0.0,
            ..EditorConfig::default()
        };
        let err = EditorSession::new(cfg, Arc::new(FixedAdvanceMeasurer::default())).unwrap_err();
        assert!(matches!(err, EditorError::InvalidConfig(_)));
    }
}
