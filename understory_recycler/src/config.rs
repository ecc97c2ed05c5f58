// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout constants and padding configuration.

/// Configuration surface of a [`Recycler`](crate::Recycler).
///
/// `row_height` and `element_width` are the layout constants: they stay fixed
/// for the duration of a sync cycle and changing them forces a full resync.
/// The viewport size is not part of the configuration; it is bound to the host
/// layout through [`Recycler::on_resize`](crate::Recycler::on_resize).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecyclerConfig {
    /// Height of every row, in the same units as the scroll offset.
    pub row_height: f64,
    /// Width of every column. `None` lays items out in a single column.
    pub element_width: Option<f64>,
    /// Extra rows materialized beyond the viewport.
    pub padding_count: usize,
}

impl RecyclerConfig {
    /// Creates a single-column configuration with one row of padding.
    #[must_use]
    pub const fn new(row_height: f64) -> Self {
        Self {
            row_height,
            element_width: None,
            padding_count: 1,
        }
    }

    /// Lays items out in as many columns of `element_width` as fit the viewport.
    #[must_use]
    pub const fn with_element_width(mut self, element_width: f64) -> Self {
        self.element_width = Some(element_width);
        self
    }

    /// Sets the number of padding rows.
    #[must_use]
    pub const fn with_padding_count(mut self, padding_count: usize) -> Self {
        self.padding_count = padding_count;
        self
    }

    /// Returns a copy with out-of-domain layout constants replaced by fallbacks.
    ///
    /// A non-finite or non-positive row height becomes `1.0`; a non-finite or
    /// non-positive element width becomes `None` (single column). Debug builds
    /// assert instead, since both are caller bugs.
    #[must_use]
    pub fn sanitized(self) -> Self {
        debug_assert!(
            self.row_height > 0.0 && self.row_height.is_finite(),
            "RecyclerConfig row_height must be finite and strictly positive; got {:?}",
            self.row_height
        );
        debug_assert!(
            self.element_width
                .is_none_or(|width| width > 0.0 && width.is_finite()),
            "RecyclerConfig element_width must be finite and strictly positive; got {:?}",
            self.element_width
        );
        let row_height = if self.row_height > 0.0 && self.row_height.is_finite() {
            self.row_height
        } else {
            1.0
        };
        let element_width = self
            .element_width
            .filter(|width| *width > 0.0 && width.is_finite());
        Self {
            row_height,
            element_width,
            padding_count: self.padding_count,
        }
    }
}

impl Default for RecyclerConfig {
    fn default() -> Self {
        Self::new(1.0)
    }
}
