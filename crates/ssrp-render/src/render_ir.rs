use serde::{Deserialize, Serialize};
use ssrp_editor::LineKind;

/// Iterator over canvas-then-overlay frame commands.
pub type FrameCommandIter<'a> =
    core::iter::Chain<core::slice::Iter<'a, DrawCommand>, core::slice::Iter<'a, DrawCommand>>;

/// One composed editor view as backend-agnostic draw commands.
///
/// Commands are split into the canvas layer (the image) and the overlay layer
/// (the positioned text). Backends draw canvas first.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    /// Container width in pixels.
    pub width: u32,
    /// Container height in pixels.
    pub height: u32,
    /// Canvas-layer commands.
    pub canvas_commands: Vec<DrawCommand>,
    /// Overlay-layer commands.
    pub overlay_commands: Vec<DrawCommand>,
    /// Overlay placement and wrap budget used for this frame.
    pub overlay: OverlayBox,
}

impl Frame {
    /// Create an empty frame.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            canvas_commands: Vec::with_capacity(2),
            overlay_commands: Vec::new(),
            overlay: OverlayBox::default(),
        }
    }

    pub fn push_canvas_command(&mut self, cmd: DrawCommand) {
        self.canvas_commands.push(cmd);
    }

    pub fn push_overlay_command(&mut self, cmd: DrawCommand) {
        self.overlay_commands.push(cmd);
    }

    /// Iterate commands in draw order without allocating.
    pub fn commands_iter(&self) -> FrameCommandIter<'_> {
        self.canvas_commands
            .iter()
            .chain(self.overlay_commands.iter())
    }

    /// Total command count across both layers.
    pub fn commands_len(&self) -> usize {
        self.canvas_commands.len() + self.overlay_commands.len()
    }

    /// Overlay text commands in draw order.
    pub fn text_commands(&self) -> impl Iterator<Item = &TextCommand> {
        self.overlay_commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text(text) => Some(text),
            _ => None,
        })
    }

    /// The image command, if the frame draws one.
    pub fn image_command(&self) -> Option<&ImageCommand> {
        self.canvas_commands.iter().find_map(|cmd| match cmd {
            DrawCommand::Image(image) => Some(image),
            _ => None,
        })
    }

    /// Debug dump as pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// Overlay rectangle as laid out for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct OverlayBox {
    pub x: f32,
    pub y: f32,
    /// Wrap budget, also the overlay's drawn width.
    pub width: f32,
    /// Line advance in pixels.
    pub line_height: i32,
}

/// Backend-agnostic draw command.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DrawCommand {
    /// Clear the whole surface to transparent.
    Clear,
    /// Draw the loaded image.
    Image(ImageCommand),
    /// Draw one overlay line.
    Text(TextCommand),
}

/// Image draw with translate-then-scale transform.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImageCommand {
    pub translate_x: f32,
    pub translate_y: f32,
    pub scale: f32,
    /// Source image width in pixels.
    pub source_width: u32,
    /// Source image height in pixels.
    pub source_height: u32,
}

impl ImageCommand {
    /// Destination rectangle `(x, y, width, height)` on the surface.
    pub fn dest_rect(&self) -> (f32, f32, f32, f32) {
        (
            self.translate_x,
            self.translate_y,
            self.source_width as f32 * self.scale,
            self.source_height as f32 * self.scale,
        )
    }
}

/// Text draw command. `y` is the top of the line box.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TextCommand {
    pub x: i32,
    pub y: i32,
    pub text: String,
    pub style: ResolvedTextStyle,
}

/// Resolved style for an overlay line.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ResolvedTextStyle {
    /// Preferred font family name.
    pub family: String,
    pub size_px: u16,
    pub line_height: i32,
    /// Normal or special (accent) styling.
    pub kind: LineKind,
}

impl ResolvedTextStyle {
    pub fn is_special(&self) -> bool {
        self.kind == LineKind::Special
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(y: i32) -> DrawCommand {
        DrawCommand::Text(TextCommand {
            x: 2,
            y,
            text: "hi".to_string(),
            style: ResolvedTextStyle {
                family: "Inter".to_string(),
                size_px: 14,
                line_height: 17,
                kind: LineKind::Normal,
            },
        })
    }

    #[test]
    fn commands_iter_draws_canvas_before_overlay() {
        let mut frame = Frame::new(10, 10);
        frame.push_overlay_command(text(2));
        frame.push_canvas_command(DrawCommand::Clear);
        let order: Vec<_> = frame.commands_iter().collect();
        assert_eq!(order.len(), 2);
        assert_eq!(order[0], &DrawCommand::Clear);
        assert_eq!(frame.commands_len(), 2);
    }

    #[test]
    fn image_dest_rect_applies_scale() {
        let cmd = ImageCommand {
            translate_x: -5.0,
            translate_y: 10.0,
            scale: 1.5,
            source_width: 100,
            source_height: 40,
        };
        assert_eq!(cmd.dest_rect(), (-5.0, 10.0, 150.0, 60.0));
    }

    #[test]
    fn json_dump_tags_commands() {
        let mut frame = Frame::new(4, 4);
        frame.push_canvas_command(DrawCommand::Clear);
        frame.push_overlay_command(text(2));
        let json = frame.to_json().expect("frame should serialize");
        assert!(json.contains("\"kind\": \"clear\""));
        assert!(json.contains("\"kind\": \"text\""));
        let back: Frame = serde_json::from_str(&json).expect("frame should parse");
        assert_eq!(back, frame);
    }
}
