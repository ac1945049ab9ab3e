//! Text overlay layout core for the SSRP image/text compositing editor.
//!
//! The crate is split along the same seams the editor has at runtime:
//!
//! - [`measure`]: the injected text-measurement capability.
//! - [`wrap`]: greedy word wrapping, with an optional reduced first line.
//! - [`compose`]: merging the special and normal text blocks into styled lines.
//! - [`geometry`]: overlay clamping and wrap-width recompute.
//! - [`drag`]: the Idle/Dragging pointer state machine.
//! - [`session`]: the single mutable editor state that ties it all together.
//!
//! ```rust
//! use ssrp_editor::{wrap, FixedAdvanceMeasurer};
//!
//! let measurer = FixedAdvanceMeasurer::new(0.5);
//! let lines = wrap("hello brave new world", 80.0, 14, &measurer);
//! assert_eq!(lines, vec!["hello brave", "new world"]);
//! ```

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

pub mod compose;
pub mod config;
pub mod drag;
pub mod error;
pub mod geometry;
pub mod input;
pub mod measure;
pub mod session;
pub mod wrap;

pub use compose::{compose_lines, ComposeOptions, Line, LineKind, TextBlock};
pub use config::{EditorConfig, ExportConfig, OverlayMargins};
pub use drag::{DragState, DragTracker};
pub use error::EditorError;
pub use geometry::{available_width, clamp_position, Point, Size};
pub use input::{parse_slider_float, parse_slider_int, DragTarget, EditorInput, PointerPhase};
pub use measure::{FixedAdvanceMeasurer, TextMeasurer};
pub use session::{EditorSession, ImageInfo, ImageTransform, LayoutState};
pub use wrap::{wrap, wrap_with_prefix};
