#![forbid(unsafe_code)]

//! End-to-end resize scenarios through the drag controller.
//!
//! Each test drives the controller the way a host would (pointer and key
//! events, frame callbacks, teardown) and checks the committed widths, the
//! paint calls and the capture commands.

use colgrip_core::capture::{CaptureCommand, CaptureLog};
use colgrip_core::direction::TextDirection;
use colgrip_core::event::{
    KeyCode, KeyEvent, KeyEventKind, Modifiers, PointerButton, PointerId, PointerPosition,
};
use colgrip_layout::{CancelReason, ColumnId, ColumnSpec, ResizePhase, ResizePolicy};
use colgrip_widgets::{
    CssVariablePort, DragController, EndReason, IgnoredReason, MeasuredLayout, ResizeConfig,
    ResizeDispatch, ResizeEvent,
};
use pretty_assertions::assert_eq;
use tracing::Level;

type Controller = DragController<CssVariablePort, CaptureLog, MeasuredLayout>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(Level::DEBUG)
        .try_init();
}

fn pointer(raw: u32) -> PointerId {
    PointerId::new(raw).expect("non-zero pointer id")
}

fn at(x: i32) -> PointerPosition {
    PointerPosition::new(x, 8)
}

fn id(raw: &str) -> ColumnId {
    ColumnId::from(raw)
}

/// Columns `a`, `b`, `c` at 200/300/300 (host 800), min width 50.
///
/// The host reports no live widths, so start widths come from the store.
fn grid(policy: ResizePolicy, direction: TextDirection) -> Controller {
    init_tracing();
    let mut controller = DragController::new(
        ResizeConfig::default().with_policy(policy),
        [
            ColumnSpec::text("a").min_width(50).initial_width(200),
            ColumnSpec::text("b").min_width(50).initial_width(300),
            ColumnSpec::text("c").min_width(50).initial_width(300),
        ],
        CssVariablePort::new(),
        CaptureLog::new(),
        MeasuredLayout::new().with_direction(direction),
    );
    controller.initialize(None);
    controller
}

fn drag(controller: &mut Controller, column: &str, from: i32, to: i32) -> ResizeDispatch {
    let p = pointer(1);
    assert!(matches!(
        controller.pointer_down(column, p, PointerButton::Primary, at(from)),
        ResizeDispatch::Began(_)
    ));
    controller.pointer_move(p, at(to));
    controller.pointer_up(p, at(to))
}

// ═════════════════════════════════════════════════════════════════════════
// Fit policy
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn fit_basic_drag_redistributes_between_neighbours() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let dispatch = drag(&mut controller, "a", 200, 250);

    let end = dispatch.ended().expect("drag commits");
    assert_eq!(end.width, 250);
    assert_eq!(end.next_column_width, Some(250));
    assert_eq!(end.host_width_delta, 0);
    assert_eq!(controller.width("a"), 250);
    assert_eq!(controller.width("b"), 250);
    assert_eq!(controller.host_width(), 800);
    assert_eq!(controller.render().column_width(&id("b")), Some(250));
}

#[test]
fn fit_clamps_neighbour_at_minimum() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    controller.pointer_move(p, at(1200));
    let painted = controller.on_frame().expect("pending indicator");
    // The indicator stops where the clamp stops.
    assert_eq!(painted.x, 450);
    controller.pointer_up(p, at(1200));

    assert_eq!(controller.width("a"), 450);
    assert_eq!(controller.width("b"), 50);
    assert_eq!(controller.store().total_width(), 800);
}

#[test]
fn fit_on_last_column_falls_back_to_expand() {
    let mut controller = DragController::new(
        ResizeConfig::default().with_policy(ResizePolicy::Fit),
        [
            ColumnSpec::text("a").min_width(50).initial_width(200),
            ColumnSpec::text("b").min_width(50).initial_width(300),
        ],
        CssVariablePort::new(),
        CaptureLog::new(),
        MeasuredLayout::from_widths([("a", 200), ("b", 300)]),
    );
    controller.initialize_from_host();

    let p = pointer(1);
    let begin = controller.pointer_down("b", p, PointerButton::Primary, at(500));
    let ResizeDispatch::Began(begin) = begin else {
        panic!("expected session start, got {begin:?}");
    };
    assert_eq!(begin.policy, ResizePolicy::Expand);

    controller.pointer_move(p, at(540));
    let end = controller.pointer_up(p, at(540));
    let end = end.ended().expect("commit");
    assert_eq!(end.width, 340);
    assert_eq!(end.host_width_delta, 40);
    assert_eq!(controller.width("a"), 200);
    assert_eq!(controller.host_width(), 540);
    assert_eq!(controller.render().host_width(), Some(540));
}

#[test]
fn fit_with_fixed_neighbour_falls_back_to_expand() {
    init_tracing();
    let mut controller = DragController::new(
        ResizeConfig::default().with_policy(ResizePolicy::Fit),
        [
            ColumnSpec::text("a").min_width(50).initial_width(200),
            ColumnSpec::text("locked").initial_width(120).resizable(false),
        ],
        CssVariablePort::new(),
        CaptureLog::new(),
        MeasuredLayout::new(),
    );
    controller.initialize(None);

    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    controller.pointer_up(p, at(230));
    assert_eq!(controller.width("a"), 230);
    assert_eq!(controller.width("locked"), 120);
    assert_eq!(controller.host_width(), 350);
}

#[test]
fn live_measurement_overrides_stored_width() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    // The host reflowed after initialization.
    controller.host_mut().set_width("a", 220);
    controller.host_mut().set_width("b", 280);

    let end = drag(&mut controller, "a", 220, 250);
    let end = end.ended().expect("commit");
    assert_eq!(end.width, 250);
    assert_eq!(end.delta, 30);
    assert_eq!(controller.width("b"), 250);
}

#[test]
fn initialize_from_host_uses_measured_widths() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    controller.host_mut().set_width("a", 180);
    controller.initialize_from_host();

    assert_eq!(controller.width("a"), 180);
    // Not laid out: configured initial width.
    assert_eq!(controller.width("c"), 300);
    assert_eq!(controller.host_width(), 780);
}

#[test]
fn fit_commit_from_undersized_start_keeps_host_in_sync() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    // Host laid a and b out below their 50px minimum.
    controller.host_mut().set_width("a", 30);
    controller.host_mut().set_width("b", 30);
    controller.initialize_from_host();
    assert_eq!(controller.host_width(), 360);

    let end = drag(&mut controller, "a", 0, 0);
    let end = end.ended().expect("commit");
    assert_eq!(end.width, 50);
    assert_eq!(end.next_column_width, Some(50));
    assert_eq!(end.host_width_delta, 40);

    assert_eq!(controller.host_width(), controller.store().total_width());
    assert_eq!(controller.host_width(), 400);
    assert_eq!(
        controller.render().host_width(),
        Some(controller.host_width())
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Expand policy
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn expand_growth_widens_host() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    let end = drag(&mut controller, "a", 200, 280);

    let end = end.ended().expect("commit");
    assert_eq!(end.width, 280);
    assert_eq!(end.next_column_width, None);
    assert_eq!(controller.width("b"), 300);
    assert_eq!(controller.host_width(), 880);
    assert_eq!(controller.render().host_width(), Some(880));
}

#[test]
fn expand_shrink_stops_at_minimum() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    drag(&mut controller, "b", 500, -100);
    assert_eq!(controller.width("b"), 50);
    assert_eq!(controller.host_width(), 550);
}

#[test]
fn commit_updates_sticky_left_offsets() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    drag(&mut controller, "a", 200, 260);

    let lefts: Vec<u32> = controller.geometry().iter().map(|g| g.left).collect();
    assert_eq!(lefts, vec![0, 260, 560]);
    assert_eq!(controller.render().column_left(&id("c")), Some(560));
}

// ═════════════════════════════════════════════════════════════════════════
// Right-to-left
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn rtl_drag_mirrors_delta() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Rtl);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(600));

    // Moving left grows the column in RTL.
    let update = controller.pointer_move(p, at(570));
    let ResizeDispatch::Updated(update) = update else {
        panic!("expected update, got {update:?}");
    };
    assert_eq!(update.width, 230);
    assert_eq!(update.indicator_x, 570);

    // Moving far right shrinks it to the minimum; the indicator stops there.
    let update = controller.pointer_move(p, at(900));
    let ResizeDispatch::Updated(update) = update else {
        panic!("expected update, got {update:?}");
    };
    assert_eq!(update.width, 50);
    assert_eq!(update.indicator_x, 750);

    controller.pointer_up(p, at(560));
    assert_eq!(controller.width("a"), 240);
    assert_eq!(controller.host_width(), 840);
}

#[test]
fn rtl_fit_moves_width_to_neighbour() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Rtl);
    drag(&mut controller, "a", 600, 650);
    assert_eq!(controller.width("a"), 150);
    assert_eq!(controller.width("b"), 350);
}

// ═════════════════════════════════════════════════════════════════════════
// Paint coalescing
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn move_burst_requests_one_frame_and_paints_latest() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));

    let requested: Vec<bool> = [205, 210, 220, 235, 240]
        .into_iter()
        .map(|x| match controller.pointer_move(p, at(x)) {
            ResizeDispatch::Updated(update) => update.frame_requested,
            other => panic!("unexpected dispatch {other:?}"),
        })
        .collect();
    assert_eq!(requested, vec![true, false, false, false, false]);
    assert_eq!(controller.render().frame_requests(), 1);

    let painted = controller.on_frame().expect("one pending paint");
    assert_eq!(painted.x, 240);
    assert_eq!(painted.width, 240);
    assert_eq!(controller.render().indicator(), Some(&painted));
    assert_eq!(controller.on_frame(), None);

    controller.pointer_move(p, at(250));
    assert_eq!(controller.render().frame_requests(), 2);
}

#[test]
fn commit_does_not_wait_for_frame() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    for x in [210, 230, 260] {
        controller.pointer_move(p, at(x));
    }
    assert!(controller.has_pending_paint());

    // Release lands somewhere no move reported.
    controller.pointer_up(p, at(275));
    assert_eq!(controller.width("a"), 275);
    assert!(!controller.has_pending_paint());
    assert_eq!(controller.on_frame(), None);
    assert_eq!(controller.render().indicator(), None);
}

// ═════════════════════════════════════════════════════════════════════════
// Capture and pointer identity
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn capture_acquired_on_down_and_released_on_up() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let p = pointer(7);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    assert!(controller.capture().is_held(p));
    assert!(controller.is_resizing());
    assert!(controller.render().is_resizing());

    controller.pointer_up(p, at(220));
    assert_eq!(
        controller.capture().commands(),
        &[
            CaptureCommand::Acquire { pointer: p },
            CaptureCommand::Release { pointer: p },
        ]
    );
    assert!(!controller.render().is_resizing());
}

#[test]
fn foreign_pointer_cannot_move_or_release_session() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    controller.pointer_down("a", pointer(1), PointerButton::Primary, at(200));
    controller.pointer_move(pointer(1), at(220));

    assert_eq!(
        controller.pointer_move(pointer(2), at(400)).ignored_reason(),
        Some(IgnoredReason::PointerMismatch)
    );
    assert_eq!(
        controller.pointer_up(pointer(2), at(400)).ignored_reason(),
        Some(IgnoredReason::PointerMismatch)
    );
    assert_eq!(
        controller.pointer_cancel(Some(pointer(2))).ignored_reason(),
        Some(IgnoredReason::PointerMismatch)
    );
    assert_eq!(controller.phase(), ResizePhase::Dragging);
    assert_eq!(controller.session().map(|s| s.current_x), Some(220));

    controller.pointer_up(pointer(1), at(220));
    assert_eq!(controller.width("a"), 220);
}

#[test]
fn input_without_session_is_ignored() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    assert_eq!(
        controller.pointer_move(pointer(1), at(10)).ignored_reason(),
        Some(IgnoredReason::NoActiveSession)
    );
    assert_eq!(
        controller.pointer_up(pointer(1), at(10)).ignored_reason(),
        Some(IgnoredReason::NoActiveSession)
    );
    assert!(controller.events().is_empty());
}

// ═════════════════════════════════════════════════════════════════════════
// Cancellation
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn cancel_soft_commits_last_position() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    controller.pointer_move(p, at(260));

    let end = controller.blur();
    let end = end.ended().expect("blur ends the session");
    assert_eq!(end.reason, EndReason::Canceled(CancelReason::Blur));
    assert_eq!(controller.width("a"), 260);
    assert_eq!(controller.width("b"), 240);
    assert!(!controller.capture().any_held());
}

#[test]
fn double_cancel_is_a_noop() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    controller.pointer_move(p, at(230));

    assert!(controller.pointer_cancel(Some(p)).ended().is_some());
    let events_after_first = controller.events().len();
    let paints_after_first = controller.render().geometry_paints();

    assert_eq!(
        controller.cancel(CancelReason::Programmatic).ignored_reason(),
        Some(IgnoredReason::NoActiveSession)
    );
    assert_eq!(controller.events().len(), events_after_first);
    assert_eq!(controller.render().geometry_paints(), paints_after_first);
    assert_eq!(controller.capture().commands().len(), 2);
}

#[test]
fn escape_cancels_active_drag() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    controller.pointer_move(p, at(150));

    let end = controller.key_down("a", KeyEvent::new(KeyCode::Escape));
    let end = end.ended().expect("escape ends the session");
    assert_eq!(end.reason, EndReason::Canceled(CancelReason::EscapeKey));
    assert_eq!(controller.width("a"), 150);
    assert_eq!(controller.host_width(), 750);
}

// ═════════════════════════════════════════════════════════════════════════
// Keyboard
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn arrow_keys_step_width() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);

    let end = controller.key_down("a", KeyEvent::new(KeyCode::Right));
    assert_eq!(end.ended().map(|end| end.width), Some(210));
    assert_eq!(controller.width("b"), 290);

    controller.key_down(
        "a",
        KeyEvent::new(KeyCode::Left).with_modifiers(Modifiers::SHIFT),
    );
    assert_eq!(controller.width("a"), 160);
    assert_eq!(controller.width("b"), 340);

    // Keyboard sessions never touch pointer capture.
    assert!(controller.capture().commands().is_empty());
    assert!(!controller.is_resizing());
    assert_eq!(controller.phase(), ResizePhase::Idle);
}

#[test]
fn rtl_left_arrow_grows_column() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Rtl);
    controller.key_down("a", KeyEvent::new(KeyCode::Left));
    assert_eq!(controller.width("a"), 210);
}

#[test]
fn keyboard_emits_begin_and_end() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    controller.key_down("c", KeyEvent::new(KeyCode::Right));

    let events = controller.drain_events();
    assert_eq!(events.len(), 2);
    assert!(matches!(&events[0], ResizeEvent::Begin(begin) if begin.pointer.is_keyboard()));
    assert!(matches!(&events[1], ResizeEvent::End(end) if end.reason == EndReason::Keyboard));
}

#[test]
fn keyboard_ignores_release_and_other_keys() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    assert_eq!(
        controller
            .key_down(
                "a",
                KeyEvent::new(KeyCode::Right).with_kind(KeyEventKind::Release)
            )
            .ignored_reason(),
        Some(IgnoredReason::KeyRelease)
    );
    assert_eq!(
        controller
            .key_down("a", KeyEvent::new(KeyCode::Up))
            .ignored_reason(),
        Some(IgnoredReason::UnhandledKey)
    );
    assert_eq!(
        controller
            .key_down("a", KeyEvent::new(KeyCode::Escape))
            .ignored_reason(),
        Some(IgnoredReason::NoActiveSession)
    );
    assert_eq!(controller.width("a"), 200);
}

#[test]
fn keyboard_is_rejected_during_pointer_drag() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    controller.pointer_down("a", pointer(1), PointerButton::Primary, at(200));
    assert_eq!(
        controller
            .key_down("b", KeyEvent::new(KeyCode::Right))
            .ignored_reason(),
        Some(IgnoredReason::ActiveSessionInProgress)
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Teardown
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn drop_mid_drag_releases_everything_without_commit() {
    init_tracing();
    let mut port = CssVariablePort::new();
    let mut capture = CaptureLog::new();
    {
        let mut controller = DragController::new(
            ResizeConfig::default().with_policy(ResizePolicy::Fit),
            [
                ColumnSpec::text("a").min_width(50).initial_width(200),
                ColumnSpec::text("b").min_width(50).initial_width(300),
            ],
            &mut port,
            &mut capture,
            MeasuredLayout::new(),
        );
        controller.initialize(None);
        let p = pointer(3);
        controller.pointer_down("a", p, PointerButton::Primary, at(200));
        controller.pointer_move(p, at(260));
        controller.on_frame();
        assert!(controller.is_resizing());
    }

    assert!(!port.is_resizing());
    assert_eq!(port.indicator(), None);
    assert_eq!(port.column_width(&id("a")), Some(200));
    assert!(!capture.any_held());
    assert_eq!(
        capture.commands().last(),
        Some(&CaptureCommand::Release { pointer: pointer(3) })
    );
}

#[test]
fn teardown_discards_session_and_emits_no_end() {
    let mut controller = grid(ResizePolicy::Expand, TextDirection::Ltr);
    let p = pointer(1);
    controller.pointer_down("a", p, PointerButton::Primary, at(200));
    controller.pointer_move(p, at(300));

    assert!(controller.teardown());
    assert_eq!(controller.width("a"), 200);
    assert_eq!(controller.host_width(), 800);
    assert!(
        controller
            .events()
            .iter()
            .all(|event| !matches!(event, ResizeEvent::End(_)))
    );
    assert_eq!(
        controller.pointer_up(p, at(300)).ignored_reason(),
        Some(IgnoredReason::NoActiveSession)
    );
}

// ═════════════════════════════════════════════════════════════════════════
// Persistence
// ═════════════════════════════════════════════════════════════════════════

#[test]
fn snapshot_restores_into_fresh_controller() {
    let mut controller = grid(ResizePolicy::Fit, TextDirection::Ltr);
    drag(&mut controller, "a", 200, 240);
    let json = serde_json::to_string(&controller.to_snapshot()).expect("serialize");

    let mut fresh = grid(ResizePolicy::Fit, TextDirection::Ltr);
    fresh.restore(&serde_json::from_str(&json).expect("parse"));
    assert_eq!(fresh.geometry(), controller.geometry());
    assert_eq!(fresh.host_width(), 800);
}
