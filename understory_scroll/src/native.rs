// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A scroll source that mirrors a native scroll container.

use crate::{ScrollSource, clamp_offset, max_offset};

/// Mirrors the offset of a host-provided scrolling element.
///
/// The host reads its container's scroll position in its scroll handler and
/// forwards it with [`NativeScroll::on_native_scroll`]. Hosts without native
/// scrolling can feed wheel deltas through [`NativeScroll::on_wheel`] instead.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NativeScroll {
    offset: f64,
    viewport_height: f64,
    content_extent: f64,
}

impl NativeScroll {
    /// Creates a source at offset `0` with no content.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            offset: 0.0,
            viewport_height: 0.0,
            content_extent: 0.0,
        }
    }

    /// Records the native container's offset. Returns `true` if it changed.
    pub fn on_native_scroll(&mut self, offset: f64) -> bool {
        self.set_offset(offset)
    }

    /// Scrolls by a wheel delta in offset units. Returns `true` if the offset moved.
    pub fn on_wheel(&mut self, delta_y: f64) -> bool {
        self.set_offset(self.offset + delta_y)
    }

    fn set_offset(&mut self, offset: f64) -> bool {
        let offset = clamp_offset(offset, self.max_offset());
        if offset == self.offset {
            return false;
        }
        self.offset = offset;
        true
    }
}

impl ScrollSource for NativeScroll {
    fn offset(&self) -> f64 {
        self.offset
    }

    fn set_dimensions(&mut self, viewport_height: f64, content_extent: f64) {
        self.viewport_height = viewport_height;
        self.content_extent = content_extent;
        self.offset = clamp_offset(self.offset, self.max_offset());
    }

    fn max_offset(&self) -> f64 {
        max_offset(self.viewport_height, self.content_extent)
    }
}

#[cfg(test)]
mod tests {
    use super::NativeScroll;
    use crate::ScrollSource;

    #[test]
    fn native_offsets_are_clamped_to_the_content() {
        let mut scroll = NativeScroll::new();
        scroll.set_dimensions(200.0, 1_000.0);
        assert!(scroll.on_native_scroll(300.0));
        assert!(!scroll.on_native_scroll(300.0));
        assert!(scroll.on_native_scroll(5_000.0));
        assert_eq!(scroll.offset(), 800.0);
        assert!(scroll.on_native_scroll(-20.0));
        assert_eq!(scroll.offset(), 0.0);
    }

    #[test]
    fn wheel_deltas_accumulate() {
        let mut scroll = NativeScroll::new();
        scroll.set_dimensions(200.0, 1_000.0);
        scroll.on_wheel(120.0);
        scroll.on_wheel(120.0);
        assert_eq!(scroll.offset(), 240.0);
        // Native containers stop at the edge instead of rejecting the step.
        assert!(scroll.on_wheel(-1_000.0));
        assert_eq!(scroll.offset(), 0.0);
        assert!(!scroll.on_wheel(-10.0));
    }

    #[test]
    fn shrinking_content_pulls_the_offset_back() {
        let mut scroll = NativeScroll::new();
        scroll.set_dimensions(200.0, 1_000.0);
        scroll.on_native_scroll(700.0);
        scroll.set_dimensions(200.0, 500.0);
        assert_eq!(scroll.offset(), 300.0);
        // Content shorter than the viewport cannot scroll.
        scroll.set_dimensions(200.0, 100.0);
        assert_eq!(scroll.max_offset(), 0.0);
        assert_eq!(scroll.offset(), 0.0);
    }
}
