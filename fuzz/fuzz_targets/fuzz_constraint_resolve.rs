#![no_main]

use arbitrary::Arbitrary;
use colgrip_layout::constraint::{self, fit_delta_range};
use colgrip_layout::{ColumnExtent, ResizePolicy, WidthBounds};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    fit: bool,
    delta: i32,
    start: u32,
    min: u32,
    max: Option<u32>,
    next: Option<(u32, u32, Option<u32>)>,
}

fuzz_target!(|input: Input| {
    let active = ColumnExtent::new(input.start, WidthBounds::new(input.min, input.max));
    let next = input
        .next
        .map(|(start, min, max)| ColumnExtent::new(start, WidthBounds::new(min, max)));
    let policy = if input.fit {
        ResizePolicy::Fit
    } else {
        ResizePolicy::Expand
    };

    let result = constraint::resolve(policy, input.delta, active, next);

    assert!(active.bounds.contains(result.width), "width out of bounds");
    match (result.policy, next) {
        (ResizePolicy::Fit, Some(next)) => {
            let next_width = result.next_width.expect("fit reports neighbour width");
            assert!(next.bounds.contains(next_width), "neighbour out of bounds");
            if fit_delta_range(active, next).is_some() {
                assert_eq!(
                    u64::from(result.width) + u64::from(next_width),
                    u64::from(active.start_width) + u64::from(next.start_width),
                    "fit must conserve the pair's width"
                );
            }
        }
        (ResizePolicy::Expand, _) => {
            assert_eq!(result.next_width, None);
            assert_eq!(
                i64::from(result.host_delta),
                i64::from(result.width) - i64::from(active.start_width)
            );
        }
        (ResizePolicy::Fit, None) => panic!("fit without neighbour must fall back"),
    }
});
