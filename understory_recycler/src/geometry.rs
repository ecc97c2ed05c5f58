// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-row grid geometry.
//!
//! Every function here is pure and total for `content_len >= 0`,
//! `row_height > 0` and `columns >= 1`. Values outside that domain are a
//! caller bug; they trip a `debug_assert!` and are clamped back into the
//! domain in release builds (row height and column count fall back to `1`).
//!
//! Items are laid out row-major: index `i` lives in row `i / columns` and
//! column `i % columns`, so a grid is a strip of *rows* (tracks) that each hold
//! `columns` cells.

use core::ops::Range;

use kurbo::Point;

use crate::{RecyclerConfig, Viewport};

/// Half-open interval `[start, end)` of content indices that must be rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct VisibleRange {
    /// First index to render (inclusive).
    pub start: usize,
    /// One past the last index to render (exclusive).
    pub end: usize,
}

impl VisibleRange {
    /// The empty range at index `0`.
    pub const EMPTY: Self = Self { start: 0, end: 0 };

    /// Creates a range, collapsing it to `[end, end)` if `start > end`.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        if start > end {
            Self { start: end, end }
        } else {
            Self { start, end }
        }
    }

    /// Number of indices in the range.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.end - self.start
    }

    /// Returns `true` if the range holds no index.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// Returns `true` if `index` lies inside the range.
    #[must_use]
    pub const fn contains(&self, index: usize) -> bool {
        self.start <= index && index < self.end
    }

    /// Iterates the indices of the range in ascending order.
    #[must_use]
    pub const fn indices(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Number of columns that fit in `viewport_width`.
///
/// `None` (or a non-positive width) means a single column. A viewport narrower
/// than one column still yields `1` so callers can divide by the result.
#[must_use]
pub fn column_count(viewport_width: f64, element_width: Option<f64>) -> usize {
    match element_width {
        Some(width) if width > 0.0 && width.is_finite() => {
            floor_to_usize(viewport_width / width).max(1)
        }
        _ => 1,
    }
}

/// Number of renderer slots needed to cover the viewport plus `padding_count`
/// extra rows, independent of the content length.
#[must_use]
pub fn needed_slot_count(
    viewport_height: f64,
    row_height: f64,
    padding_count: usize,
    columns: usize,
) -> usize {
    let row_height = guard_row_height(row_height);
    let columns = guard_columns(columns);
    let rows = ceil_to_usize(viewport_height / row_height);
    rows.saturating_add(padding_count).saturating_mul(columns)
}

/// First index of the row at (or partially above) `scroll_offset`.
#[must_use]
pub fn starting_index(scroll_offset: f64, row_height: f64, columns: usize) -> usize {
    let row_height = guard_row_height(row_height);
    let columns = guard_columns(columns);
    floor_to_usize(scroll_offset / row_height).saturating_mul(columns)
}

/// The range `[starting_index, min(content_len, starting_index + needed))`.
///
/// When the viewport has been scrolled past the end of the content the range
/// collapses to `[content_len, content_len)`.
#[must_use]
pub fn visible_range(content_len: usize, starting_index: usize, needed: usize) -> VisibleRange {
    let end = content_len.min(starting_index.saturating_add(needed));
    VisibleRange::new(starting_index, end)
}

/// Top-left corner of the cell holding `index`.
#[must_use]
pub fn position_for_index(
    index: usize,
    columns: usize,
    row_height: f64,
    element_width: Option<f64>,
) -> Point {
    let row_height = guard_row_height(row_height);
    let columns = guard_columns(columns);
    let row = index / columns;
    let column = index % columns;
    let x = match element_width {
        Some(width) if width > 0.0 => column as f64 * width,
        _ => 0.0,
    };
    Point::new(x, row as f64 * row_height)
}

/// Total scrollable extent of `content_len` items: `ceil(len / columns) * row_height`.
#[must_use]
pub fn total_extent(content_len: usize, columns: usize, row_height: f64) -> f64 {
    let row_height = guard_row_height(row_height);
    let columns = guard_columns(columns);
    content_len.div_ceil(columns) as f64 * row_height
}

/// Geometry resolved for one sync cycle from the layout constants and viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Geometry {
    /// Height of every row.
    pub row_height: f64,
    /// Width of every column, `None` for a single-column list.
    pub element_width: Option<f64>,
    /// Resolved column count (always `>= 1`).
    pub columns: usize,
    /// Slots needed to cover the viewport plus padding.
    pub needed: usize,
    /// First index of the first visible row.
    pub starting_index: usize,
}

impl Geometry {
    /// Resolves the geometry of `config` laid out in `viewport`.
    #[must_use]
    pub fn resolve(config: &RecyclerConfig, viewport: &Viewport) -> Self {
        let row_height = config.row_height;
        let columns = column_count(viewport.width(), config.element_width);
        Self {
            row_height,
            element_width: config.element_width,
            columns,
            needed: needed_slot_count(
                viewport.height(),
                row_height,
                config.padding_count,
                columns,
            ),
            starting_index: starting_index(viewport.scroll_offset(), row_height, columns),
        }
    }

    /// Slots the pool should hold for `content_len` items: `min(needed, content_len)`.
    #[must_use]
    pub const fn desired_slot_count(&self, content_len: usize) -> usize {
        if self.needed < content_len {
            self.needed
        } else {
            content_len
        }
    }

    /// Visible range for `content_len` items.
    #[must_use]
    pub fn visible_range(&self, content_len: usize) -> VisibleRange {
        visible_range(content_len, self.starting_index, self.needed)
    }

    /// Position of the cell holding `index`.
    #[must_use]
    pub fn position_for_index(&self, index: usize) -> Point {
        position_for_index(index, self.columns, self.row_height, self.element_width)
    }

    /// Total extent of `content_len` items.
    #[must_use]
    pub fn total_extent(&self, content_len: usize) -> f64 {
        total_extent(content_len, self.columns, self.row_height)
    }
}

fn guard_row_height(row_height: f64) -> f64 {
    debug_assert!(
        row_height > 0.0 && row_height.is_finite(),
        "row height must be finite and strictly positive; got {row_height:?}"
    );
    if row_height > 0.0 && row_height.is_finite() {
        row_height
    } else {
        1.0
    }
}

fn guard_columns(columns: usize) -> usize {
    debug_assert!(columns >= 1, "column count must be at least 1");
    columns.max(1)
}

/// `floor(value)` for non-negative values; negatives and NaN map to `0`.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "Value is checked to be positive and saturates at usize::MAX"
)]
pub(crate) fn floor_to_usize(value: f64) -> usize {
    if value.is_nan() || value <= 0.0 {
        return 0;
    }
    if value >= usize::MAX as f64 {
        return usize::MAX;
    }
    // Truncation rounds toward zero, which is floor for positive values.
    value as usize
}

/// `ceil(value)` for non-negative values; negatives and NaN map to `0`.
pub(crate) fn ceil_to_usize(value: f64) -> usize {
    let floor = floor_to_usize(value);
    if (floor as f64) < value {
        floor.saturating_add(1)
    } else {
        floor
    }
}
