// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scroll offset and viewport size: the host state geometry is computed from.

/// Viewport state consumed by the geometry functions.
///
/// The scroll offset is *not* clamped to the content here. Keeping the offset
/// inside `[0, total_extent - height]` is the job of the scroll source; this
/// type only rejects negative and NaN values, which it treats as `0`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    scroll_offset: f64,
    width: f64,
    height: f64,
}

impl Viewport {
    /// Creates a viewport of `width × height` scrolled to the top.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        Self {
            scroll_offset: 0.0,
            width: non_negative(width),
            height: non_negative(height),
        }
    }

    /// Returns the current scroll offset.
    #[must_use]
    pub const fn scroll_offset(&self) -> f64 {
        self.scroll_offset
    }

    /// Returns the viewport width.
    #[must_use]
    pub const fn width(&self) -> f64 {
        self.width
    }

    /// Returns the viewport height.
    #[must_use]
    pub const fn height(&self) -> f64 {
        self.height
    }

    /// Sets the scroll offset. Returns `true` if it changed.
    pub fn set_scroll_offset(&mut self, offset: f64) -> bool {
        let offset = non_negative(offset);
        if offset != self.scroll_offset {
            self.scroll_offset = offset;
            true
        } else {
            false
        }
    }

    /// Sets the viewport size. Returns `true` if either dimension changed.
    pub fn set_size(&mut self, width: f64, height: f64) -> bool {
        let width = non_negative(width);
        let height = non_negative(height);
        if width != self.width || height != self.height {
            self.width = width;
            self.height = height;
            true
        } else {
            false
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

fn non_negative(value: f64) -> f64 {
    if value > 0.0 { value } else { 0.0 }
}

#[cfg(test)]
mod tests {
    use super::Viewport;

    #[test]
    fn setters_report_changes() {
        let mut viewport = Viewport::new(300.0, 200.0);
        assert!(!viewport.set_scroll_offset(0.0));
        assert!(viewport.set_scroll_offset(125.0));
        assert!(!viewport.set_scroll_offset(125.0));
        assert!(viewport.set_size(300.0, 250.0));
        assert!(!viewport.set_size(300.0, 250.0));
    }

    #[test]
    fn offset_is_unbounded_above_but_not_below() {
        let mut viewport = Viewport::new(100.0, 100.0);
        viewport.set_scroll_offset(1.0e9);
        assert_eq!(viewport.scroll_offset(), 1.0e9);
        viewport.set_scroll_offset(-40.0);
        assert_eq!(viewport.scroll_offset(), 0.0);
        viewport.set_scroll_offset(f64::NAN);
        assert_eq!(viewport.scroll_offset(), 0.0);
    }
}
