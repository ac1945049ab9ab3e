//! Greedy word wrapping against a pixel budget.
//!
//! Words are split on single spaces and are never broken: a word wider than
//! the budget overflows its own line.

use smallvec::SmallVec;

use crate::measure::TextMeasurer;

/// Wrapped segments of one source line. Most overlay lines wrap into a handful
/// of segments, so these stay inline.
pub(crate) type Segments = SmallVec<[String; 4]>;

/// Wrap `text` into lines no wider than `max_width_px` at `font_size_px`.
///
/// Empty input yields no lines.
pub fn wrap(
    text: &str,
    max_width_px: f32,
    font_size_px: u16,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    greedy_wrap(text, max_width_px, max_width_px, font_size_px, measurer).into_vec()
}

/// Wrap `text` reserving room for `prefix` on the first output line only.
///
/// The first line budget is `max_width_px - measure(prefix)`, floored at zero.
/// The prefix itself is not inserted; callers prepend it to the first line.
pub fn wrap_with_prefix(
    text: &str,
    max_width_px: f32,
    font_size_px: u16,
    prefix: &str,
    measurer: &dyn TextMeasurer,
) -> Vec<String> {
    wrap_segments_with_prefix(text, max_width_px, font_size_px, prefix, measurer).into_vec()
}

pub(crate) fn wrap_segments_with_prefix(
    text: &str,
    max_width_px: f32,
    font_size_px: u16,
    prefix: &str,
    measurer: &dyn TextMeasurer,
) -> Segments {
    let first_budget = if prefix.is_empty() {
        max_width_px
    } else {
        (max_width_px - measurer.measure_text_px(prefix, font_size_px)).max(0.0)
    };
    greedy_wrap(text, first_budget, max_width_px, font_size_px, measurer)
}

pub(crate) fn greedy_wrap(
    text: &str,
    first_line_budget_px: f32,
    budget_px: f32,
    font_size_px: u16,
    measurer: &dyn TextMeasurer,
) -> Segments {
    let mut lines = Segments::new();
    if text.is_empty() {
        return lines;
    }

    let mut current = String::new();
    for word in text.split(' ') {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            let mut joined = String::with_capacity(current.len() + 1 + word.len());
            joined.push_str(&current);
            joined.push(' ');
            joined.push_str(word);
            joined
        };
        let limit = if lines.is_empty() {
            first_line_budget_px
        } else {
            budget_px
        };
        let width = measurer.measure_text_px(&candidate, font_size_px);
        if width > limit && !current.is_empty() {
            lines.push(core::mem::replace(&mut current, word.to_string()));
        } else {
            current = candidate;
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}
