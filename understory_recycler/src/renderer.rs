// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The renderer contract consumed by the slot pool.

use kurbo::Point;

/// Creates, binds, and tears down the views behind renderer slots.
///
/// The recycler never inspects a [`Renderer::Handle`]; it only moves handles
/// between content indices. A host toolkit implements this trait over its own
/// widget or view type.
///
/// `create` and `bind` may fail. Their errors propagate out of
/// [`Recycler::flush`](crate::Recycler::flush) wrapped in
/// [`RecycleError::Renderer`](crate::RecycleError::Renderer); the pool keeps
/// every reuse that completed before the failure.
pub trait Renderer {
    /// Item type shown by the views.
    type Item;
    /// Opaque view handle owned by one slot.
    type Handle;
    /// Error reported by [`Renderer::create`] and [`Renderer::bind`].
    type Error;

    /// Creates a new, unbound view.
    fn create(&mut self) -> Result<Self::Handle, Self::Error>;

    /// Shows `item` (content index `index`) at `position` in `handle`.
    fn bind(
        &mut self,
        handle: &mut Self::Handle,
        item: &Self::Item,
        position: Point,
        index: usize,
    ) -> Result<(), Self::Error>;

    /// Clears view-local transient state before `handle` shows another item,
    /// or before it is left unbound.
    fn prepare_for_reuse(&mut self, handle: &mut Self::Handle) {
        let _ = handle;
    }

    /// Releases the resources of a view removed from the pool.
    fn destroy(&mut self, handle: Self::Handle);

    /// Called before a sync pass touches any slot.
    fn sync_will_begin(&mut self) {}

    /// Called after a sync pass with the current total content extent, so the
    /// host can size its scrollable area.
    fn sync_did_end(&mut self, total_extent: f64) {
        let _ = total_extent;
    }
}
