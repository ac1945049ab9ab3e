//! Input events consumed by [`EditorSession`](crate::EditorSession).
//!
//! Mouse and touch input are folded into one pointer stream; a touch maps to
//! its first contact point, and touch-end maps to [`PointerPhase::Up`].

use crate::geometry::Point;

/// Which draggable surface an event targets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DragTarget {
    /// The canvas, dragging the loaded image.
    Image,
    /// The text overlay.
    Overlay,
}

/// Pointer lifecycle phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    Leave,
}

/// One pointer event in client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EditorInput {
    pub target: DragTarget,
    pub phase: PointerPhase,
    pub position: Point,
}

impl EditorInput {
    pub fn pointer(target: DragTarget, phase: PointerPhase, x: f32, y: f32) -> Self {
        Self {
            target,
            phase,
            position: Point::new(x, y),
        }
    }

    /// Build an event from a touch list, using the first contact.
    ///
    /// Touch-end carries no contacts, so `Up` and `Leave` fall back to the
    /// origin; the position is unused for those phases.
    pub fn touch(target: DragTarget, phase: PointerPhase, touches: &[Point]) -> Option<Self> {
        let position = match (phase, touches.first()) {
            (_, Some(first)) => *first,
            (PointerPhase::Up | PointerPhase::Leave, None) => Point::default(),
            (PointerPhase::Down | PointerPhase::Move, None) => return None,
        };
        Some(Self {
            target,
            phase,
            position,
        })
    }
}

/// Parse an integer slider value, keeping `previous` when the raw value is
/// not a number.
pub fn parse_slider_int(raw: &str, previous: u16) -> u16 {
    match raw.trim().parse::<f64>() {
        Ok(value) if value.is_finite() => value.trunc().clamp(0.0, f64::from(u16::MAX)) as u16,
        _ => {
            log::warn!("ignoring non-numeric slider value {:?}", raw);
            previous
        }
    }
}

/// Parse a float slider value, keeping `previous` when the raw value is not a
/// finite number.
pub fn parse_slider_float(raw: &str, previous: f32) -> f32 {
    match raw.trim().parse::<f32>() {
        Ok(value) if value.is_finite() => value,
        _ => {
            log::warn!("ignoring non-numeric slider value {:?}", raw);
            previous
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_int_parses_and_truncates() {
        assert_eq!(parse_slider_int("18", 14), 18);
        assert_eq!(parse_slider_int(" 18.9 ", 14), 18);
        assert_eq!(parse_slider_int("-3", 14), 0);
    }

    #[test]
    fn slider_int_falls_back_on_garbage() {
        assert_eq!(parse_slider_int("", 14), 14);
        assert_eq!(parse_slider_int("abc", 14), 14);
        assert_eq!(parse_slider_int("NaN", 14), 14);
    }

    #[test]
    fn slider_float_falls_back_on_non_finite() {
        assert_eq!(parse_slider_float("1.5", 1.0), 1.5);
        assert_eq!(parse_slider_float("inf", 1.0), 1.0);
        assert_eq!(parse_slider_float("zoom", 1.0), 1.0);
    }

    #[test]
    fn touch_uses_first_contact() {
        let ev = EditorInput::touch(
            DragTarget::Overlay,
            PointerPhase::Down,
            &[Point::new(3.0, 4.0), Point::new(9.0, 9.0)],
        )
        .expect("touch down with contacts");
        assert_eq!(ev.position, Point::new(3.0, 4.0));
    }

    #[test]
    fn touch_end_without_contacts_is_still_an_event() {
        let ev = EditorInput::touch(DragTarget::Image, PointerPhase::Up, &[]);
        assert!(ev.is_some());
        assert!(EditorInput::touch(DragTarget::Image, PointerPhase::Move, &[]).is_none());
    }
}
