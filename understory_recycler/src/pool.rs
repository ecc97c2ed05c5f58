// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The fixed-size pool of renderer slots.
//!
//! Slots are recycled round-robin over the visible range: content index `i` is
//! always shown by the slot at position `i % pool.len()`. After every sync pass
//! each bound slot at position `k` holds an index `i` with `i % len == k`, so
//! no two bound slots can share an index.

use alloc::vec::Vec;

use kurbo::Point;

use crate::{ContentSource, Geometry, RecycleError, Renderer, VisibleRange};

/// A pooled view bound to at most one content index.
#[derive(Debug)]
pub struct Slot<H> {
    content_index: Option<usize>,
    position: Point,
    handle: H,
}

impl<H> Slot<H> {
    fn unbound(handle: H) -> Self {
        Self {
            content_index: None,
            position: Point::ORIGIN,
            handle,
        }
    }

    /// Content index currently shown, or `None` if the slot is unbound.
    #[must_use]
    pub const fn content_index(&self) -> Option<usize> {
        self.content_index
    }

    /// Position assigned by the last bind.
    #[must_use]
    pub const fn position(&self) -> Point {
        self.position
    }

    /// The renderer's handle for this slot.
    #[must_use]
    pub const fn handle(&self) -> &H {
        &self.handle
    }

    /// Returns `true` if the slot shows an item.
    #[must_use]
    pub const fn is_bound(&self) -> bool {
        self.content_index.is_some()
    }
}

/// The set of renderer slots owned by a recycler.
#[derive(Debug)]
pub struct RendererPool<H> {
    slots: Vec<Slot<H>>,
}

impl<H> RendererPool<H> {
    /// Creates an empty pool.
    #[must_use]
    pub const fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Number of slots, bound or not.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns `true` if the pool holds no slot.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// All slots in pool order.
    #[must_use]
    pub fn slots(&self) -> &[Slot<H>] {
        &self.slots
    }

    /// Content indices of the bound slots, in pool order.
    pub fn bound_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.slots.iter().filter_map(Slot::content_index)
    }

    /// Slot that shows content index `index`: `index % len`.
    ///
    /// Returns `None` for an empty pool, which has no slot to map onto.
    #[must_use]
    pub fn slot_for_index(&self, index: usize) -> Option<usize> {
        let len = self.slots.len();
        if len == 0 { None } else { Some(index % len) }
    }

    /// Creates `n` slots and binds each to the next index yielded by `targets`.
    ///
    /// A slot for which `targets` has run dry stays unbound. New slots are
    /// appended before they are bound, so a failing bind leaves them in the
    /// pool, unbound.
    pub(crate) fn grow<C, R>(
        &mut self,
        n: usize,
        targets: &mut impl Iterator<Item = usize>,
        renderer: &mut R,
        content: &C,
        geometry: &Geometry,
    ) -> Result<usize, RecycleError<R::Error>>
    where
        C: ContentSource,
        R: Renderer<Item = C::Item, Handle = H>,
    {
        for _ in 0..n {
            let handle = renderer.create().map_err(RecycleError::Renderer)?;
            self.slots.push(Slot::unbound(handle));
            if let Some(index) = targets.next() {
                let slot = self.slots.len() - 1;
                let position = geometry.position_for_index(index);
                self.reuse(slot, index, position, true, renderer, content)?;
            }
        }
        Ok(n)
    }

    /// Destroys the `n` slots with the highest content indices.
    ///
    /// Unbound slots rank above every bound one and are dropped first. Leaves
    /// the remaining slots ordered by content index.
    pub(crate) fn shrink<R>(&mut self, n: usize, renderer: &mut R) -> usize
    where
        R: Renderer<Handle = H>,
    {
        self.sort_by_content_index();
        let keep = self.slots.len().saturating_sub(n);
        let removed = self.slots.len() - keep;
        for slot in self.slots.drain(keep..) {
            renderer.destroy(slot.handle);
        }
        removed
    }

    /// Destroys every slot.
    pub(crate) fn destroy_all<R>(&mut self, renderer: &mut R) -> usize
    where
        R: Renderer<Handle = H>,
    {
        let len = self.slots.len();
        self.shrink(len, renderer)
    }

    /// Binds slot `slot` to `index` at `position`.
    ///
    /// A no-op returning `Ok(false)` when the slot already shows `index` and
    /// `force` is unset. Otherwise the slot is prepared for reuse, marked
    /// unbound, bound through the renderer, and only then records its new
    /// position and index.
    pub(crate) fn reuse<C, R>(
        &mut self,
        slot: usize,
        index: usize,
        position: Point,
        force: bool,
        renderer: &mut R,
        content: &C,
    ) -> Result<bool, RecycleError<R::Error>>
    where
        C: ContentSource,
        R: Renderer<Item = C::Item, Handle = H>,
    {
        let slot = &mut self.slots[slot];
        if slot.content_index == Some(index) && !force {
            return Ok(false);
        }
        let item = content.item_at(index).ok_or(RecycleError::MissingItem {
            index,
            len: content.len(),
        })?;
        renderer.prepare_for_reuse(&mut slot.handle);
        slot.content_index = None;
        renderer
            .bind(&mut slot.handle, item, position, index)
            .map_err(RecycleError::Renderer)?;
        slot.position = position;
        slot.content_index = Some(index);
        Ok(true)
    }

    /// Clears slot `slot`. Returns `true` if it was bound.
    pub(crate) fn unbind<R>(&mut self, slot: usize, renderer: &mut R) -> bool
    where
        R: Renderer<Handle = H>,
    {
        let slot = &mut self.slots[slot];
        if slot.content_index.take().is_some() {
            renderer.prepare_for_reuse(&mut slot.handle);
            true
        } else {
            false
        }
    }

    /// Unbinds every slot whose index is outside `range` or sits at the wrong
    /// round-robin position. Returns the number of slots unbound.
    pub(crate) fn release_misplaced<R>(&mut self, range: &VisibleRange, renderer: &mut R) -> usize
    where
        R: Renderer<Handle = H>,
    {
        let len = self.slots.len();
        let mut released = 0;
        for position in 0..len {
            let misplaced = self.slots[position]
                .content_index
                .is_some_and(|index| !range.contains(index) || index % len != position);
            if misplaced && self.unbind(position, renderer) {
                released += 1;
            }
        }
        released
    }

    /// Orders slots by content index, unbound slots last.
    fn sort_by_content_index(&mut self) {
        self.slots
            .sort_by_key(|slot| slot.content_index.unwrap_or(usize::MAX));
    }

    /// Moves each bound slot to its round-robin position `index % len`.
    ///
    /// Slots showing an index inside `range` claim their position first, then
    /// the remaining bound slots by ascending index. Slots that lose their
    /// position, and unbound slots, fill the free positions in order. Nothing
    /// is rebound, so slots that keep their index across a pool resize cost
    /// nothing in the following pass.
    pub(crate) fn align_to_residues(&mut self, range: &VisibleRange) {
        let len = self.slots.len();
        if len == 0 {
            return;
        }
        self.slots.sort_by_key(|slot| match slot.content_index {
            Some(index) if range.contains(index) => (0, index),
            Some(index) => (1, index),
            None => (2, 0),
        });
        let mut placed: Vec<Option<Slot<H>>> = (0..len).map(|_| None).collect();
        let mut leftovers = Vec::new();
        for slot in self.slots.drain(..) {
            match slot.content_index {
                Some(index) if placed[index % len].is_none() => placed[index % len] = Some(slot),
                _ => leftovers.push(slot),
            }
        }
        let mut leftovers = leftovers.into_iter();
        self.slots.extend(
            placed
                .into_iter()
                .filter_map(|slot| slot.or_else(|| leftovers.next())),
        );
        debug_assert_eq!(self.slots.len(), len, "aligning must not lose slots");
    }
}

impl<H> Default for RendererPool<H> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use alloc::vec::Vec;

    use super::RendererPool;
    use crate::testing::{Call, RecordingRenderer};
    use crate::{Geometry, ObservableVec, RecyclerConfig, Viewport, VisibleRange};

    fn geometry() -> Geometry {
        Geometry::resolve(&RecyclerConfig::new(50.0), &Viewport::new(100.0, 200.0))
    }

    fn grown(n: usize) -> (RendererPool<u32>, RecordingRenderer, ObservableVec<u32>) {
        let content: ObservableVec<u32> = (0..100).collect();
        let mut renderer = RecordingRenderer::default();
        let mut pool = RendererPool::new();
        pool.grow(n, &mut (0..n), &mut renderer, &content, &geometry())
            .unwrap();
        (pool, renderer, content)
    }

    #[test]
    fn grow_creates_and_binds_in_order() {
        let (pool, renderer, _) = grown(3);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.bound_indices().collect::<Vec<_>>(), [0, 1, 2]);
        assert_eq!(renderer.created(), 3);
        assert_eq!(pool.slots()[2].position(), kurbo::Point::new(0.0, 100.0));
    }

    #[test]
    fn grow_leaves_slots_unbound_when_targets_run_out() {
        let content: ObservableVec<u32> = (0..100).collect();
        let mut renderer = RecordingRenderer::default();
        let mut pool = RendererPool::new();
        pool.grow(3, &mut [7].into_iter(), &mut renderer, &content, &geometry())
            .unwrap();
        assert_eq!(pool.bound_indices().collect::<Vec<_>>(), [7]);
        assert_eq!(pool.len(), 3);
    }

    #[test]
    fn reuse_is_a_noop_for_the_same_index_unless_forced() {
        let (mut pool, mut renderer, content) = grown(2);
        renderer.clear_calls();
        let position = pool.slots()[1].position();
        assert!(!pool.reuse(1, 1, position, false, &mut renderer, &content).unwrap());
        assert!(renderer.calls().is_empty());
        assert!(pool.reuse(1, 1, position, true, &mut renderer, &content).unwrap());
        assert_eq!(
            renderer.calls(),
            [Call::Prepare(1), Call::Bind { handle: 1, index: 1, item: 1 }]
        );
    }

    #[test]
    fn reuse_of_a_missing_item_reports_the_index() {
        let (mut pool, mut renderer, content) = grown(1);
        let err = pool
            .reuse(0, 500, kurbo::Point::ORIGIN, false, &mut renderer, &content)
            .unwrap_err();
        assert_eq!(
            err,
            crate::RecycleError::MissingItem {
                index: 500,
                len: 100
            }
        );
        // The slot still shows its previous item.
        assert_eq!(pool.slots()[0].content_index(), Some(0));
    }

    #[test]
    fn shrink_drops_unbound_then_highest_indices() {
        let (mut pool, mut renderer, content) = grown(4);
        let geometry = geometry();
        pool.reuse(0, 9, geometry.position_for_index(9), false, &mut renderer, &content)
            .unwrap();
        pool.unbind(2, &mut renderer);
        // Slots now show [9, 1, -, 3].
        assert_eq!(pool.shrink(2, &mut renderer), 2);
        assert_eq!(pool.bound_indices().collect::<Vec<_>>(), [1, 3]);
        assert_eq!(renderer.destroyed(), 2);
    }

    #[test]
    fn slot_for_index_is_round_robin() {
        let (pool, _, _) = grown(5);
        assert_eq!(pool.slot_for_index(0), Some(0));
        assert_eq!(pool.slot_for_index(7), Some(2));
        assert_eq!(RendererPool::<u32>::new().slot_for_index(7), None);
    }

    #[test]
    fn align_places_slots_at_their_residue() {
        let content: ObservableVec<u32> = (0..100).collect();
        let mut renderer = RecordingRenderer::default();
        let mut pool = RendererPool::new();
        pool.grow(3, &mut [10, 11, 12].into_iter(), &mut renderer, &content, &geometry())
            .unwrap();
        pool.align_to_residues(&VisibleRange::new(10, 13));
        // 10 % 3 == 1, 11 % 3 == 2, 12 % 3 == 0.
        assert_eq!(pool.bound_indices().collect::<Vec<_>>(), [12, 10, 11]);
        assert_eq!(pool.release_misplaced(&VisibleRange::new(10, 13), &mut renderer), 0);
    }

    #[test]
    fn release_misplaced_unbinds_off_range_and_wrong_residue() {
        let (mut pool, mut renderer, _) = grown(3);
        // 0, 1, 2 are all at their residue; a shorter range releases 2.
        assert_eq!(pool.release_misplaced(&VisibleRange::new(0, 2), &mut renderer), 1);
        assert_eq!(pool.bound_indices().collect::<Vec<_>>(), [0, 1]);
        // Swapping two slots moves both off their residue.
        pool.slots.swap(0, 1);
        assert_eq!(pool.release_misplaced(&VisibleRange::new(0, 100), &mut renderer), 2);
        assert_eq!(pool.bound_indices().count(), 0);
    }
}
