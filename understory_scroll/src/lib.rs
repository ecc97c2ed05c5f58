// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_scroll --heading-base-level=0

//! Understory Scroll: scroll sources that drive an [`understory_recycler::Recycler`].
//!
//! The recycler only needs a scroll offset. Where that offset comes from is a
//! separate concern, captured by the [`ScrollSource`] trait:
//!
//! - [`NativeScroll`] mirrors a host element that scrolls on its own. The host
//!   forwards the element's offset from its scroll handler.
//! - [`TransformScroll`] owns a virtual offset and moves the content layer with
//!   an [`Affine`](kurbo::Affine) translation. It turns wheel deltas and
//!   pointer drags into offsets, plays out drag [`Momentum`], and animates
//!   programmatic scrolls.
//!
//! Both report the same offsets for the same input, so the recycler sees the
//! same sequence of windows whichever backend is in use. [`drive`] forwards a
//! source's offset to a recycler and [`refresh_dimensions`] hands the
//! recycler's extent back to the source. [`scroll_to_index`] computes the offset
//! that brings an item into view.
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_recycler::{ObservableVec, Recycler, RecyclerConfig, Renderer};
//! use understory_scroll::{NativeScroll, ScrollAlign, drive, refresh_dimensions, scroll_to_index};
//!
//! struct Rows;
//!
//! impl Renderer for Rows {
//!     type Item = u32;
//!     type Handle = Option<u32>;
//!     type Error = core::convert::Infallible;
//!
//!     fn create(&mut self) -> Result<Option<u32>, Self::Error> {
//!         Ok(None)
//!     }
//!
//!     fn bind(
//!         &mut self,
//!         row: &mut Option<u32>,
//!         item: &u32,
//!         _position: Point,
//!         _index: usize,
//!     ) -> Result<(), Self::Error> {
//!         *row = Some(*item);
//!         Ok(())
//!     }
//!
//!     fn destroy(&mut self, _row: Option<u32>) {}
//! }
//!
//! let mut list = Recycler::new(Rows, RecyclerConfig::new(20.0)).with_viewport(300.0, 100.0);
//! list.attach((0..1000).collect::<ObservableVec<u32>>());
//!
//! let mut scroll = NativeScroll::new();
//! refresh_dimensions(&mut scroll, &list);
//!
//! // The host's scroll handler.
//! scroll.on_native_scroll(scroll_to_index(500, ScrollAlign::Start, &list));
//! drive(&scroll, &mut list);
//! list.flush().unwrap();
//! assert_eq!(list.visible_range().start, 500);
//! ```
//!
//! This crate is `no_std`.

#![no_std]

mod align;
mod momentum;
mod native;
mod transform;

use understory_recycler::{ContentSource, Recycler, Renderer};

pub use align::{ScrollAlign, scroll_to_index};
pub use momentum::{Momentum, MomentumConfig};
pub use native::NativeScroll;
pub use transform::{SCROLL_ANIMATION_MS, TransformScroll, WheelConfig, WheelDelta};

/// Boundary of a user-visible scroll gesture or animation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ScrollPhase {
    /// The content started moving.
    Started,
    /// The content came to rest.
    Completed,
}

/// A source of scroll offsets for a recycler.
pub trait ScrollSource {
    /// Current scroll offset, in `[0, max_offset]`.
    fn offset(&self) -> f64;

    /// Updates the scrollable dimensions, clamping the offset to fit them.
    fn set_dimensions(&mut self, viewport_height: f64, content_extent: f64);

    /// Largest reachable offset.
    fn max_offset(&self) -> f64;
}

/// Forwards the source's offset to the recycler.
///
/// The recycler ignores offsets it already has, so calling this every frame is
/// fine.
pub fn drive<S, C, R>(source: &S, recycler: &mut Recycler<C, R>)
where
    S: ScrollSource + ?Sized,
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    recycler.on_scroll(source.offset());
}

/// Updates the source with the recycler's viewport height and content extent.
pub fn refresh_dimensions<S, C, R>(source: &mut S, recycler: &Recycler<C, R>)
where
    S: ScrollSource + ?Sized,
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    source.set_dimensions(recycler.viewport().height(), recycler.total_extent());
}

pub(crate) fn max_offset(viewport_height: f64, content_extent: f64) -> f64 {
    (content_extent - viewport_height).max(0.0)
}

/// Clamps `offset` to `[0, max]`; NaN becomes `0`.
pub(crate) fn clamp_offset(offset: f64, max: f64) -> f64 {
    if offset.is_nan() {
        return 0.0;
    }
    offset.clamp(0.0, max.max(0.0))
}
