// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Transform scrolling over a recycled grid: `understory_scroll` + `understory_recycler`.
//!
//! This example shows how to combine:
//! - `understory_recycler` for the pool of views bound to the visible cells,
//! - `understory_scroll::TransformScroll` for wheel, drag, and momentum input,
//! - a per-frame loop that ticks the scroller, forwards its offset, and flushes.
//!
//! Run:
//! - `cargo run -p understory_examples --example recycler_transform_scroll`

use kurbo::Point;
use understory_recycler::{ObservableVec, Recycler, RecyclerConfig, Renderer};
use understory_scroll::{
    ScrollAlign, ScrollPhase, ScrollSource, TransformScroll, WheelDelta, drive,
    refresh_dimensions, scroll_to_index,
};

/// A stand-in for a widget: the text it shows and where it sits.
#[derive(Debug, Default)]
struct Cell {
    text: String,
    origin: Point,
}

/// Creates cells and counts how much work the pool asks for.
#[derive(Debug, Default)]
struct Cells {
    created: usize,
    binds: usize,
    extent: f64,
}

impl Renderer for Cells {
    type Item = String;
    type Handle = Cell;
    type Error = std::convert::Infallible;

    fn create(&mut self) -> Result<Cell, Self::Error> {
        self.created += 1;
        Ok(Cell::default())
    }

    fn bind(
        &mut self,
        cell: &mut Cell,
        item: &String,
        position: Point,
        _index: usize,
    ) -> Result<(), Self::Error> {
        self.binds += 1;
        cell.text.clone_from(item);
        cell.origin = position;
        Ok(())
    }

    fn prepare_for_reuse(&mut self, cell: &mut Cell) {
        cell.text.clear();
    }

    fn destroy(&mut self, _cell: Cell) {}

    fn sync_did_end(&mut self, total_extent: f64) {
        // A host would size its scrollable spacer here.
        self.extent = total_extent;
    }
}

/// Forwards the scroller's offset, flushes, and prints the visible window.
fn frame(
    label: &str,
    scroll: &TransformScroll,
    grid: &mut Recycler<ObservableVec<String>, Cells>,
) {
    drive(scroll, grid);
    let report = grid.flush().expect("infallible renderer");
    let range = grid.visible_range();
    let first = grid
        .slots()
        .iter()
        .filter(|slot| slot.content_index() == Some(range.start))
        .map(|slot| slot.handle().text.as_str())
        .next()
        .unwrap_or("-");
    println!(
        "{label:<18} offset {:>7.1}  cells {:>4}..{:<4} first {first:<10} rebound {:>2}",
        scroll.offset(),
        range.start,
        range.end,
        report.rebound,
    );
}

fn main() {
    // 10 000 labels in cells of 120 × 40, in a 400 × 300 viewport: three columns.
    let labels: ObservableVec<String> = (0..10_000).map(|i| format!("item {i}")).collect();
    let config = RecyclerConfig::new(40.0).with_element_width(120.0);
    let mut grid = Recycler::new(Cells::default(), config).with_viewport(400.0, 300.0);
    grid.attach(labels);

    let mut scroll = TransformScroll::new();
    refresh_dimensions(&mut scroll, &grid);
    frame("initial", &scroll, &mut grid);
    println!(
        "{} columns, {} views for {} items, extent {}",
        grid.column_count(),
        grid.pool().len(),
        grid.content().map_or(0, ObservableVec::len),
        grid.renderer().extent,
    );

    // A few wheel notches.
    for _ in 0..3 {
        scroll.on_wheel(WheelDelta {
            delta_y: -120.0,
            inverted: false,
        });
        frame("wheel", &scroll, &mut grid);
    }

    // A quick upward flick: the content keeps moving after release.
    let mut time = 0.0;
    scroll.begin(250.0, time);
    for y in [230.0, 200.0, 160.0, 110.0] {
        time += 16.0;
        if scroll.move_to(y, time) == Some(ScrollPhase::Started) {
            println!("drag started");
        }
        frame("drag", &scroll, &mut grid);
    }
    time += 8.0;
    scroll.end(time);
    while scroll.is_scrolling() {
        let phase = scroll.tick(16.0);
        frame("momentum", &scroll, &mut grid);
        if phase == Some(ScrollPhase::Completed) {
            println!("momentum settled");
        }
    }

    // Jump far away with an animation, then edit content while it is on screen.
    let target = scroll_to_index(7_500, ScrollAlign::Center, &grid);
    scroll.scroll_to(target, true);
    while scroll.is_scrolling() {
        let phase = scroll.tick(50.0);
        let label = if phase.is_some() { "arrived" } else { "animate" };
        frame(label, &scroll, &mut grid);
    }

    let start = grid.visible_range().start;
    if let Some(labels) = grid.content_mut() {
        labels.replace(start, String::from("edited"));
    }
    frame("after edit", &scroll, &mut grid);

    // The scrollable height follows the content.
    if let Some(labels) = grid.content_mut() {
        labels.truncate(30);
    }
    refresh_dimensions(&mut scroll, &grid);
    frame("truncated", &scroll, &mut grid);

    println!(
        "created {} views and bound {} times; the transform is {:?}",
        grid.renderer().created,
        grid.renderer().binds,
        scroll.transform().translation(),
    );
}
