use std::sync::Arc;

use ssrp_editor::{
    DragTarget, EditorInput, EditorSession, FixedAdvanceMeasurer, ImageInfo, PointerPhase, Size,
};
use ssrp_render::{DrawCommand, Frame, RenderEngine};

/// 7px per character at the default 14px font size.
fn build_session() -> EditorSession {
    EditorSession::with_defaults(Arc::new(FixedAdvanceMeasurer::new(0.5)))
}

fn frame_texts(frame: &Frame) -> Vec<String> {
    frame.text_commands().map(|t| t.text.clone()).collect()
}

fn widest_line_px(frame: &Frame) -> f32 {
    frame
        .text_commands()
        .map(|t| t.text.chars().count() as f32 * 7.0)
        .fold(0.0, f32::max)
}

#[test]
fn overlay_lines_fit_budget_after_every_drag_step() {
    let engine = RenderEngine::default();
    let mut session = build_session();
    session.set_special_text("*waves at the crowd\n\n*bows deeply");
    session.set_normal_text("Thanks everyone for coming out tonight to the show");

    session.handle_input(EditorInput::pointer(
        DragTarget::Overlay,
        PointerPhase::Down,
        0.0,
        0.0,
    ));
    for step in 0..12 {
        let x = step as f32 * 60.0;
        session.handle_input(EditorInput::pointer(
            DragTarget::Overlay,
            PointerPhase::Move,
            x,
            x / 2.0,
        ));
        let frame = engine.render(&mut session);
        let budget = frame.overlay.width;
        for text in frame.text_commands() {
            let width = text.text.chars().count() as f32 * 7.0;
            assert!(
                width <= budget || !text.text.trim_start_matches("* ").contains(' '),
                "line {:?} is {}px over a {}px budget",
                text.text,
                width,
                budget
            );
        }
        assert!(frame.overlay.x >= 2.0 && frame.overlay.x <= 796.0);
        assert!(frame.overlay.y >= 2.0 && frame.overlay.y <= 560.0);
    }
}

#[test]
fn narrow_container_wraps_more_lines() {
    let engine = RenderEngine::default();
    let mut session = build_session();
    session.set_normal_text("Hello world this is a test of the overlay wrapping");

    let wide = engine.render(&mut session);
    session.resize_container(Size::new(120.0, 300.0));
    let narrow = engine.render(&mut session);

    assert_eq!(frame_texts(&wide).len(), 1);
    assert!(frame_texts(&narrow).len() > 1);
    assert!(widest_line_px(&narrow) <= narrow.overlay.width);
    assert_eq!(narrow.width, 120);
    assert_eq!(narrow.height, 300);
}

#[test]
fn special_marker_duplicates_by_default() {
    let engine = RenderEngine::default();
    let mut session = build_session();
    session.set_special_text("*waves");
    let frame = engine.render(&mut session);
    assert_eq!(frame_texts(&frame), vec!["* *waves"]);
}

#[test]
fn reset_then_render_matches_fresh_session() {
    let engine = RenderEngine::default();
    let mut session = build_session();
    session.load_image(ImageInfo {
        width: 640,
        height: 480,
    });
    session.set_normal_text("some text");
    session.set_font_size(22);
    session.reset();

    let reset_frame = engine.render(&mut session);
    let fresh_frame = engine.render(&mut build_session());
    assert_eq!(reset_frame, fresh_frame);
    assert!(!reset_frame
        .commands_iter()
        .any(|cmd| matches!(cmd, DrawCommand::Image(_))));
}
