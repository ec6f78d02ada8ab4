#![no_main]

use arbitrary::Arbitrary;
use colgrip_core::capture::CaptureLog;
use colgrip_core::direction::TextDirection;
use colgrip_core::event::{KeyCode, KeyEvent, Modifiers, PointerButton, PointerId, PointerPosition};
use colgrip_layout::{CancelReason, ColumnSpec, ResizePhase, ResizePolicy};
use colgrip_widgets::{CssVariablePort, DragController, MeasuredLayout, ResizeConfig};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
enum Op {
    Down { column: u8, pointer: u8, x: i16 },
    Move { pointer: u8, x: i16 },
    Up { pointer: u8, x: i16 },
    Frame,
    Cancel { pointer: Option<u8> },
    LostCapture { pointer: u8 },
    Blur,
    Key { column: u8, right: bool, shift: bool, escape: bool },
    Teardown,
}

#[derive(Debug, Arbitrary)]
struct Input {
    fit: bool,
    rtl: bool,
    columns: Vec<(u16, u16, Option<u16>)>,
    ops: Vec<Op>,
}

fn pointer(raw: u8) -> PointerId {
    PointerId::new(u32::from(raw)).unwrap_or(PointerId::KEYBOARD)
}

fuzz_target!(|input: Input| {
    if input.columns.is_empty() || input.columns.len() > 16 || input.ops.len() > 256 {
        return;
    }
    let ids: Vec<String> = (0..input.columns.len()).map(|i| format!("c{i}")).collect();
    let specs = ids.iter().zip(&input.columns).map(|(id, &(initial, min, max))| {
        let spec = ColumnSpec::text(id.as_str())
            .min_width(u32::from(min))
            .initial_width(u32::from(initial));
        match max {
            Some(max) => spec.max_width(u32::from(max)),
            None => spec,
        }
    });
    let policy = if input.fit {
        ResizePolicy::Fit
    } else {
        ResizePolicy::Expand
    };
    let direction = TextDirection::from_rtl(input.rtl);
    let mut controller = DragController::new(
        ResizeConfig::default().with_policy(policy),
        specs,
        CssVariablePort::new(),
        CaptureLog::new(),
        MeasuredLayout::new().with_direction(direction),
    );
    controller.initialize(None);
    let column = |index: u8| ids[usize::from(index) % ids.len()].as_str();

    for op in input.ops {
        match op {
            Op::Down { column: c, pointer: p, x } => {
                controller.pointer_down(
                    column(c),
                    pointer(p),
                    PointerButton::Primary,
                    PointerPosition::new(i32::from(x), 0),
                );
            }
            Op::Move { pointer: p, x } => {
                controller.pointer_move(pointer(p), PointerPosition::new(i32::from(x), 0));
            }
            Op::Up { pointer: p, x } => {
                controller.pointer_up(pointer(p), PointerPosition::new(i32::from(x), 0));
            }
            Op::Frame => {
                controller.on_frame();
            }
            Op::Cancel { pointer: p } => {
                controller.pointer_cancel(p.map(pointer));
            }
            Op::LostCapture { pointer: p } => {
                controller.lost_capture(pointer(p));
            }
            Op::Blur => {
                controller.cancel(CancelReason::Blur);
            }
            Op::Key {
                column: c,
                right,
                shift,
                escape,
            } => {
                let code = match (escape, right) {
                    (true, _) => KeyCode::Escape,
                    (false, true) => KeyCode::Right,
                    (false, false) => KeyCode::Left,
                };
                let modifiers = if shift { Modifiers::SHIFT } else { Modifiers::NONE };
                controller.key_down(column(c), KeyEvent::new(code).with_modifiers(modifiers));
            }
            Op::Teardown => {
                controller.teardown();
            }
        }

        for id in &ids {
            let bounds = controller.columns().bounds(id);
            assert!(bounds.contains(controller.width(id)), "{id} out of bounds");
        }
        if controller.phase() == ResizePhase::Idle {
            assert!(!controller.capture().any_held(), "capture leaked");
            assert!(!controller.is_resizing(), "resizing mode leaked");
        }
    }
});
