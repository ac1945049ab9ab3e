//! Composition of the special and normal text blocks into styled lines.

use serde::{Deserialize, Serialize};

use crate::measure::TextMeasurer;
use crate::wrap::{greedy_wrap, wrap_segments_with_prefix};

/// Styling class of a rendered line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineKind {
    /// Plain overlay text.
    #[default]
    Normal,
    /// Text sourced from the special block, drawn with accent styling.
    Special,
}

/// Raw user-entered text for one of the two overlay inputs.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextBlock {
    /// Newline-separated content, replaced wholesale on each edit.
    pub content: String,
    /// Which block this is.
    pub kind: LineKind,
}

impl TextBlock {
    pub fn special(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: LineKind::Special,
        }
    }

    pub fn normal(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            kind: LineKind::Normal,
        }
    }

    pub fn is_special(&self) -> bool {
        self.kind == LineKind::Special
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }
}

/// One wrapped, renderable line.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Line {
    pub text: String,
    pub kind: LineKind,
}

impl Line {
    pub fn new(text: impl Into<String>, kind: LineKind) -> Self {
        Self {
            text: text.into(),
            kind,
        }
    }

    pub fn is_special(&self) -> bool {
        self.kind == LineKind::Special
    }
}

/// Knobs for [`compose_lines`] beyond the plain wrap inputs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposeOptions {
    /// Drop one literal leading `*` from each special line before prefixing.
    ///
    /// Off by default, so `"*waves"` renders as `"* *waves"`.
    pub strip_leading_marker: bool,
}

/// Compose the special and normal blocks into a single ordered line list.
///
/// Special content is split on newlines, blank lines are dropped, and each
/// remaining line is wrapped with `special_prefix` reserved on its first
/// segment (and prepended to it). Normal content is wrapped as one paragraph.
/// Every special-derived line precedes every normal-derived line.
pub fn compose_lines(
    special: &TextBlock,
    normal: &TextBlock,
    max_width_px: f32,
    font_size_px: u16,
    special_prefix: &str,
    measurer: &dyn TextMeasurer,
) -> Vec<Line> {
    compose_lines_with_options(
        special,
        normal,
        max_width_px,
        font_size_px,
        special_prefix,
        ComposeOptions::default(),
        measurer,
    )
}

/// [`compose_lines`] with explicit [`ComposeOptions`].
pub fn compose_lines_with_options(
    special: &TextBlock,
    normal: &TextBlock,
    max_width_px: f32,
    font_size_px: u16,
    special_prefix: &str,
    options: ComposeOptions,
    measurer: &dyn TextMeasurer,
) -> Vec<Line> {
    let mut out = Vec::new();

    for raw in special.content.split('\n') {
        let mut line = raw.trim();
        if options.strip_leading_marker {
            if let Some(rest) = line.strip_prefix('*') {
                line = rest.trim_start();
            }
        }
        if line.is_empty() {
            continue;
        }
        let segments =
            wrap_segments_with_prefix(line, max_width_px, font_size_px, special_prefix, measurer);
        for (idx, seg) in segments.into_iter().enumerate() {
            let text = if idx == 0 {
                let mut prefixed = String::with_capacity(special_prefix.len() + seg.len());
                prefixed.push_str(special_prefix);
                prefixed.push_str(&seg);
                prefixed
            } else {
                seg
            };
            out.push(Line::new(text, LineKind::Special));
        }
    }

    let normal_lines = greedy_wrap(
        &normal.content,
        max_width_px,
        max_width_px,
        font_size_px,
        measurer,
    );
    out.extend(
        normal_lines
            .into_iter()
            .map(|seg| Line::new(seg, LineKind::Normal)),
    );

    log::debug!(
        "composed {} overlay lines at {}px (budget {:.1}px)",
        out.len(),
        font_size_px,
        max_width_px
    );
    out
}
