// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Property tests for the recycler under random interleavings of scrolling,
//! resizing, and content mutation.
//!
//! After every flush:
//!
//! 1. The visible range lies inside `[0, content_len]`.
//! 2. The pool holds exactly `min(needed, content_len)` slots.
//! 3. Every index of the visible range is bound to exactly one slot, and no
//!    slot is bound outside it.
//! 4. Every bound slot shows the item currently at its index, at its position.
//! 5. A second flush with no new trigger does nothing.

use std::collections::HashSet;

use kurbo::Point;
use proptest::prelude::*;
use understory_recycler::{ObservableVec, Recycler, RecyclerConfig, Renderer, geometry};

/// Renderer whose handles index a table of what each view currently shows.
#[derive(Default)]
struct TableRenderer {
    shown: Vec<Option<(u32, Point)>>,
    live: usize,
}

impl Renderer for TableRenderer {
    type Item = u32;
    type Handle = usize;
    type Error = core::convert::Infallible;

    fn create(&mut self) -> Result<usize, Self::Error> {
        self.shown.push(None);
        self.live += 1;
        Ok(self.shown.len() - 1)
    }

    fn bind(
        &mut self,
        handle: &mut usize,
        item: &u32,
        position: Point,
        _index: usize,
    ) -> Result<(), Self::Error> {
        self.shown[*handle] = Some((*item, position));
        Ok(())
    }

    fn prepare_for_reuse(&mut self, handle: &mut usize) {
        self.shown[*handle] = None;
    }

    fn destroy(&mut self, handle: usize) {
        self.shown[handle] = None;
        self.live -= 1;
    }
}

#[derive(Debug, Clone)]
enum Op {
    Scroll(f64),
    Resize(f64, f64),
    Push(u32),
    Insert(usize, u32),
    Remove(usize),
    Replace(usize, u32),
    Truncate(usize),
    Splice(usize, usize, Vec<u32>),
    Padding(usize),
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (0.0_f64..=6_000.0).prop_map(Op::Scroll),
        1 => (1.0_f64..=600.0, 1.0_f64..=600.0).prop_map(|(w, h)| Op::Resize(w, h)),
        2 => any::<u32>().prop_map(Op::Push),
        2 => (0_usize..=200, any::<u32>()).prop_map(|(at, item)| Op::Insert(at, item)),
        2 => (0_usize..=200).prop_map(Op::Remove),
        2 => (0_usize..=200, any::<u32>()).prop_map(|(at, item)| Op::Replace(at, item)),
        1 => (0_usize..=200).prop_map(Op::Truncate),
        2 => (0_usize..=200, 0_usize..=8, proptest::collection::vec(any::<u32>(), 0..8))
            .prop_map(|(at, removed, added)| Op::Splice(at, removed, added)),
        1 => (0_usize..=3).prop_map(Op::Padding),
    ]
}

fn apply(recycler: &mut Recycler<ObservableVec<u32>, TableRenderer>, op: &Op) {
    match op {
        Op::Scroll(offset) => recycler.on_scroll(*offset),
        Op::Resize(width, height) => recycler.on_resize(*width, *height),
        Op::Padding(padding) => recycler.set_padding_count(*padding),
        _ => {
            let Some(content) = recycler.content_mut() else {
                return;
            };
            let len = content.len();
            match op {
                Op::Push(item) => content.push(*item),
                Op::Insert(at, item) => content.insert((*at).min(len), *item),
                Op::Remove(at) if len > 0 => {
                    content.remove(at % len);
                }
                Op::Replace(at, item) if len > 0 => {
                    content.replace(at % len, *item);
                }
                Op::Truncate(to) => content.truncate(*to),
                Op::Splice(at, removed, added) => {
                    let start = (*at).min(len);
                    let end = start.saturating_add(*removed).min(len);
                    content.splice(start..end, added.iter().copied());
                }
                _ => {}
            }
        }
    }
}

fn check_invariants(
    recycler: &Recycler<ObservableVec<u32>, TableRenderer>,
) -> Result<(), TestCaseError> {
    let content = recycler.content().expect("attached");
    let len = content.len();
    let geometry = recycler.geometry();
    let range = recycler.visible_range();

    prop_assert!(range.start <= range.end && range.end <= len, "{range:?} vs len {len}");
    prop_assert_eq!(recycler.pool().len(), geometry.needed.min(len));
    prop_assert_eq!(recycler.renderer().live, recycler.pool().len());

    let mut seen = HashSet::new();
    for slot in recycler.slots() {
        let Some(index) = slot.content_index() else {
            continue;
        };
        prop_assert!(seen.insert(index), "index {index} bound twice");
        prop_assert!(range.contains(index), "index {index} bound outside {range:?}");
        let expected = geometry.position_for_index(index);
        prop_assert_eq!(slot.position(), expected);
        prop_assert_eq!(
            recycler.renderer().shown[*slot.handle()],
            Some((content.as_slice()[index], expected)),
            "slot for index {} shows a stale item",
            index
        );
    }
    prop_assert_eq!(seen.len(), range.len());
    Ok(())
}

fn recycler(len: u32, element_width: Option<f64>) -> Recycler<ObservableVec<u32>, TableRenderer> {
    let mut config = RecyclerConfig::new(25.0);
    if let Some(width) = element_width {
        config = config.with_element_width(width);
    }
    let mut recycler = Recycler::new(TableRenderer::default(), config).with_viewport(300.0, 200.0);
    recycler.attach((0..len).collect());
    recycler
}

proptest! {
    #[test]
    fn flushes_keep_the_pool_consistent(
        len in 0_u32..150,
        element_width in proptest::option::of(40.0_f64..=160.0),
        ops in proptest::collection::vec(op_strategy(), 1..40),
        flush_every in 1_usize..4,
    ) {
        let mut recycler = recycler(len, element_width);
        recycler.flush().unwrap();
        check_invariants(&recycler)?;

        for (step, op) in ops.iter().enumerate() {
            apply(&mut recycler, op);
            if step % flush_every == 0 {
                recycler.flush().unwrap();
                check_invariants(&recycler)?;
            }
        }
        recycler.flush().unwrap();
        check_invariants(&recycler)?;

        let report = recycler.flush().unwrap();
        prop_assert!(report.is_idle(), "second flush did work: {report:?}");
        prop_assert!(!recycler.has_pending());
    }

    #[test]
    fn extent_matches_row_count(
        len in 0_usize..10_000,
        columns in 1_usize..8,
        row_height in 1.0_f64..100.0,
    ) {
        let extent = geometry::total_extent(len, columns, row_height);
        let rows = len.div_ceil(columns);
        prop_assert_eq!(extent, rows as f64 * row_height);
        if len > 0 {
            let last = geometry::position_for_index(len - 1, columns, row_height, None);
            prop_assert!(last.y + row_height <= extent + 1e-9);
        }
    }

    #[test]
    fn visible_range_is_bounded(
        len in 0_usize..10_000,
        offset in 0.0_f64..1.0e6,
        height in 0.0_f64..2_000.0,
        padding in 0_usize..4,
    ) {
        let columns = 1;
        let needed = geometry::needed_slot_count(height, 20.0, padding, columns);
        let start = geometry::starting_index(offset, 20.0, columns);
        let range = geometry::visible_range(len, start, needed);
        prop_assert!(range.end <= len);
        prop_assert!(range.len() <= needed);
        prop_assert!(range.start <= range.end);
    }
}

#[test]
fn detaching_destroys_every_view() {
    let mut recycler = recycler(100, None);
    recycler.flush().unwrap();
    assert_eq!(recycler.renderer().live, 9);
    let source = recycler.detach().unwrap();
    assert_eq!(source.subscriber_count(), 0);
    assert_eq!(recycler.renderer().live, 0);
}
