//! Frame IR and frame building for `ssrp-editor`.

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

mod render_engine;
mod render_ir;

pub use render_engine::{RenderDiagnostic, RenderEngine, RenderEngineOptions};
pub use render_ir::{
    DrawCommand, Frame, FrameCommandIter, ImageCommand, OverlayBox, ResolvedTextStyle,
    TextCommand,
};
pub use ssrp_editor::LineKind;
