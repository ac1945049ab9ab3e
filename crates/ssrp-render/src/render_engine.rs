use std::fmt;
use std::sync::{Arc, Mutex};

use ssrp_editor::{EditorSession, Line, LineKind};

use crate::render_ir::{DrawCommand, Frame, ImageCommand, OverlayBox, ResolvedTextStyle, TextCommand};

/// Runtime diagnostics from frame building.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderDiagnostic {
    /// Both text blocks were empty and the placeholder line was drawn.
    PlaceholderSubstituted,
    /// A single word is wider than the wrap budget and overflows its line.
    OverflowingLine {
        index: usize,
        width_px: f32,
        budget_px: f32,
    },
}

type DiagnosticCallback = Arc<Mutex<Box<dyn FnMut(RenderDiagnostic) + Send + 'static>>>;
type DiagnosticSink = Option<DiagnosticCallback>;

/// Frame-building options.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderEngineOptions {
    /// Font family carried on every text command.
    pub font_family: String,
    /// Draw the placeholder line when there is no text.
    pub placeholder_enabled: bool,
}

impl Default for RenderEngineOptions {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            placeholder_enabled: true,
        }
    }
}

/// Turns editor sessions into [`Frame`]s.
#[derive(Clone, Default)]
pub struct RenderEngine {
    opts: RenderEngineOptions,
    diagnostic_sink: DiagnosticSink,
}

impl fmt::Debug for RenderEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderEngine")
            .field("opts", &self.opts)
            .finish_non_exhaustive()
    }
}

impl RenderEngine {
    /// Create a render engine.
    pub fn new(opts: RenderEngineOptions) -> Self {
        Self {
            opts,
            diagnostic_sink: None,
        }
    }

    pub fn options(&self) -> &RenderEngineOptions {
        &self.opts
    }

    /// Register or replace the diagnostics sink.
    pub fn set_diagnostic_sink<F>(&mut self, sink: F)
    where
        F: FnMut(RenderDiagnostic) + Send + 'static,
    {
        self.diagnostic_sink = Some(Arc::new(Mutex::new(Box::new(sink))));
    }

    fn emit_diagnostic(&self, diagnostic: RenderDiagnostic) {
        let Some(sink) = &self.diagnostic_sink else {
            return;
        };
        if let Ok(mut sink) = sink.lock() {
            sink(diagnostic);
        }
    }

    /// Build the frame for the session's current state.
    ///
    /// Recomposes the overlay lines first if the session invalidated them.
    pub fn render(&self, session: &mut EditorSession) -> Frame {
        let layout = session.layout_state();
        let cfg = session.config();
        let line_height = line_height_px(layout.font_size_px, cfg.line_height_ratio);
        let placeholder = cfg.placeholder_text.clone();
        let budget_px = session.overlay_width();

        let mut frame = Frame::new(
            surface_dim(layout.container.width),
            surface_dim(layout.container.height),
        );
        frame.overlay = OverlayBox {
            x: layout.overlay.x,
            y: layout.overlay.y,
            width: budget_px,
            line_height,
        };

        frame.push_canvas_command(DrawCommand::Clear);
        if let Some(info) = session.image() {
            let transform = session.image_transform();
            frame.push_canvas_command(DrawCommand::Image(ImageCommand {
                translate_x: transform.offset.x,
                translate_y: transform.offset.y,
                scale: transform.scale,
                source_width: info.width,
                source_height: info.height,
            }));
        }

        let mut lines = session.lines().to_vec();
        if lines.is_empty() && self.opts.placeholder_enabled {
            self.emit_diagnostic(RenderDiagnostic::PlaceholderSubstituted);
            lines.push(Line::new(placeholder, LineKind::Normal));
        }

        let x = layout.overlay.x.round() as i32;
        let top = layout.overlay.y.round() as i32;
        for (idx, line) in lines.into_iter().enumerate() {
            let width_px = session
                .measurer()
                .measure_text_px(&line.text, layout.font_size_px);
            if width_px > budget_px {
                self.emit_diagnostic(RenderDiagnostic::OverflowingLine {
                    index: idx,
                    width_px,
                    budget_px,
                });
            }
            frame.push_overlay_command(DrawCommand::Text(TextCommand {
                x,
                y: top.saturating_add((idx as i32).saturating_mul(line_height)),
                text: line.text,
                style: ResolvedTextStyle {
                    family: self.opts.font_family.clone(),
                    size_px: layout.font_size_px,
                    line_height,
                    kind: line.kind,
                },
            }));
        }

        log::debug!(
            "rendered frame {}x{} with {} commands",
            frame.width,
            frame.height,
            frame.commands_len()
        );
        frame
    }
}

fn line_height_px(font_size_px: u16, ratio: f32) -> i32 {
    ((f32::from(font_size_px) * ratio).round() as i32).max(1)
}

fn surface_dim(value: f32) -> u32 {
    if value.is_finite() && value > 0.0 {
        value.round() as u32
    } else {
        0
    }
}
