// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

// After you edit the crate's doc comment, run this command, then check README.md for any missing links
// cargo rdme --workspace-project=understory_recycler --heading-base-level=0

//! Understory Recycler: windowing and view recycling for virtualized lists and grids.
//!
//! This crate keeps a small, fixed pool of views ("renderer slots") bound to
//! whichever items of a potentially huge collection are currently visible.
//! Scrolling rebinds slots round-robin instead of creating new views, so the
//! number of live views is bounded by the viewport, not by the collection.
//!
//! The core concepts are:
//!
//! - [`Geometry`]: pure functions from row height, optional column width,
//!   viewport size, and scroll offset to the [`VisibleRange`], slot count,
//!   cell positions, and total extent.
//! - [`ContentSource`]: an ordered, observable collection that queues a
//!   [`Splice`] for every mutation. [`ObservableVec`] implements it over a `Vec`.
//! - [`Renderer`]: the contract for creating, binding, and destroying the views
//!   behind slots. The recycler never looks inside a view.
//! - [`RendererPool`]: the slots themselves. Content index `i` is always shown
//!   by slot `i % pool.len()`, which keeps every index on at most one slot.
//! - [`Recycler`]: the controller. Event handlers record scroll, resize, and
//!   layout changes and schedule work; [`Recycler::flush`] runs the coalesced
//!   work once per turn and reports what it did in a [`FlushReport`].
//!
//! This crate deliberately does **not** know about any widget system or any
//! scroll physics. Host frameworks are responsible for:
//!
//! - Implementing [`Renderer`] over their own view type.
//! - Calling [`Recycler::on_scroll`] and [`Recycler::on_resize`] from their
//!   event handlers, and [`Recycler::flush`] once per frame.
//! - Sizing their scrollable area from [`Renderer::sync_did_end`] or
//!   [`Recycler::total_extent`].
//!
//! ## Minimal example
//!
//! ```rust
//! use kurbo::Point;
//! use understory_recycler::{ObservableVec, Recycler, RecyclerConfig, Renderer};
//!
//! /// Views are plain strings here.
//! #[derive(Default)]
//! struct Labels;
//!
//! impl Renderer for Labels {
//!     type Item = u32;
//!     type Handle = String;
//!     type Error = core::convert::Infallible;
//!
//!     fn create(&mut self) -> Result<String, Self::Error> {
//!         Ok(String::new())
//!     }
//!
//!     fn bind(
//!         &mut self,
//!         label: &mut String,
//!         item: &u32,
//!         position: Point,
//!         _index: usize,
//!     ) -> Result<(), Self::Error> {
//!         *label = format!("item {item} at y={}", position.y);
//!         Ok(())
//!     }
//!
//!     fn destroy(&mut self, _label: String) {}
//! }
//!
//! // 1000 rows of 20 logical pixels in a 100px tall viewport.
//! let mut list = Recycler::new(Labels, RecyclerConfig::new(20.0)).with_viewport(300.0, 100.0);
//! list.attach((0..1000).collect::<ObservableVec<u32>>());
//! list.flush().unwrap();
//! // Five visible rows plus one row of padding.
//! assert_eq!(list.pool().len(), 6);
//!
//! list.on_scroll(410.0);
//! let report = list.flush().unwrap();
//! assert_eq!(list.visible_range().start, 20);
//! assert!(report.rebound > 0);
//! assert_eq!(list.slots()[2].handle(), "item 20 at y=400");
//! ```
//!
//! ## Grids
//!
//! Setting [`RecyclerConfig::with_element_width`] lays items out left to right
//! in as many columns as fit the viewport width. Rows stay uniform in height.
//!
//! ```rust
//! use understory_recycler::{RecyclerConfig, geometry};
//!
//! let config = RecyclerConfig::new(50.0).with_element_width(100.0);
//! assert_eq!(geometry::column_count(350.0, config.element_width), 3);
//! let position = geometry::position_for_index(4, 3, 50.0, config.element_width);
//! assert_eq!((position.x, position.y), (100.0, 50.0));
//! ```
//!
//! This crate is `no_std` and uses `alloc`.

#![no_std]

extern crate alloc;

mod coalesce;
mod config;
mod content;
mod error;
pub mod geometry;
mod lifecycle;
mod pool;
mod reconcile;
mod recycler;
mod renderer;
mod sync;
mod viewport;

#[cfg(test)]
mod testing;

pub use coalesce::Coalescer;
pub use config::RecyclerConfig;
pub use content::{ContentSource, ObservableVec, Splice, SubscriptionId};
pub use error::RecycleError;
pub use geometry::{Geometry, VisibleRange};
pub use pool::{RendererPool, Slot};
pub use recycler::Recycler;
pub use renderer::Renderer;
pub use sync::{FlushReport, ResyncReason, SyncOp};
pub use viewport::Viewport;
