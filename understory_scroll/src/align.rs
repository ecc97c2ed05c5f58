// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Index-aligned scrolling.

use understory_recycler::{ContentSource, Recycler, Renderer};

use crate::{clamp_offset, max_offset};

/// Alignment strategy for [`scroll_to_index`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollAlign {
    /// Align the top of the item's row with the top of the viewport.
    Start,
    /// Center the item's row within the viewport.
    Center,
    /// Align the bottom of the item's row with the bottom of the viewport.
    End,
    /// Move just enough to make the row fully visible, preferring the
    /// smallest change from the current scroll offset.
    Nearest,
}

/// Returns the scroll offset that brings content index `index` into view.
///
/// The index is clamped to the attached content and the result to
/// `[0, total_extent - viewport_height]`. In a grid the whole row holding
/// `index` is aligned. With no content the result is `0.0`.
///
/// The recycler is not modified: feed the result to a scroll source, or
/// straight to [`Recycler::on_scroll`].
#[must_use]
pub fn scroll_to_index<C, R>(index: usize, align: ScrollAlign, recycler: &Recycler<C, R>) -> f64
where
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    let len = recycler.content().map_or(0, C::len);
    if len == 0 {
        return 0.0;
    }
    let index = index.min(len - 1);
    let item_start = recycler.offset_of_index(index);
    let item_end = item_start + recycler.config().row_height;
    let viewport = recycler.viewport().height();
    let current = recycler.viewport().scroll_offset();

    let offset = match align {
        ScrollAlign::Start => item_start,
        ScrollAlign::End => item_end - viewport,
        ScrollAlign::Center => (item_start + item_end) / 2.0 - viewport / 2.0,
        ScrollAlign::Nearest => {
            if item_start >= current && item_end <= current + viewport {
                current
            } else if item_start < current {
                item_start
            } else {
                item_end - viewport
            }
        }
    };
    clamp_offset(offset, max_offset(viewport, recycler.total_extent()))
}
