// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content source contract and a `Vec`-backed observable implementation.
//!
//! A [`ContentSource`] reports mutations as [`Splice`] values queued per
//! subscription. The recycler subscribes when a source is attached, drains the
//! queue once per turn in [`Recycler::flush`](crate::Recycler::flush), and
//! unsubscribes when the source is detached or the recycler is dropped.

use alloc::vec::Vec;
use core::ops::RangeBounds;

use hashbrown::HashMap;

/// A single mutation of a content source: at `start`, `removed` items were
/// replaced by `added` new ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Splice {
    /// First index affected by the mutation.
    pub start: usize,
    /// Number of items removed at `start`.
    pub removed: usize,
    /// Number of items inserted at `start`.
    pub added: usize,
}

impl Splice {
    /// Creates a splice record.
    #[must_use]
    pub const fn new(start: usize, removed: usize, added: usize) -> Self {
        Self {
            start,
            removed,
            added,
        }
    }

    /// Clamps the splice to a source whose length is now `len`.
    ///
    /// `start` is clamped to `[0, len]` and `added` to the items that actually
    /// exist after `start`.
    #[must_use]
    pub fn clamped(self, len: usize) -> Self {
        let start = self.start.min(len);
        Self {
            start,
            removed: self.removed,
            added: self.added.min(len - start),
        }
    }

    /// Returns `true` if the splice neither removed nor added anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.removed == 0 && self.added == 0
    }

    /// Returns `true` if the items at and after `start + added` kept their indices.
    #[must_use]
    pub const fn preserves_tail(&self) -> bool {
        self.removed == self.added
    }
}

/// An ordered, observable collection of items.
///
/// The recycler holds the source while attached and reads it only through this
/// trait. Implementations queue a [`Splice`] for every live subscription on
/// each mutation.
pub trait ContentSource {
    /// Item type handed to the renderer.
    type Item;
    /// Token identifying one subscription.
    type Subscription;

    /// Number of items.
    fn len(&self) -> usize;

    /// Returns `true` if there are no items.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The item at `index`, or `None` if `index >= len()`.
    fn item_at(&self, index: usize) -> Option<&Self::Item>;

    /// Starts recording mutations for a new subscriber.
    fn subscribe(&mut self) -> Self::Subscription;

    /// Stops recording mutations for `subscription` and drops its queue.
    fn unsubscribe(&mut self, subscription: Self::Subscription);

    /// Moves the mutations queued for `subscription` into `out`, oldest first.
    fn take_changes(&mut self, subscription: &Self::Subscription, out: &mut Vec<Splice>);
}

/// Subscription token issued by [`ObservableVec`].
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// A `Vec<T>` that records a [`Splice`] for every subscriber on each mutation.
#[derive(Debug, Clone)]
pub struct ObservableVec<T> {
    items: Vec<T>,
    queues: HashMap<u64, Vec<Splice>>,
    next_subscription: u64,
}

impl<T> ObservableVec<T> {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self::from(Vec::new())
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if there are no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// The item at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// All items as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Number of live subscriptions.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.queues.len()
    }

    /// Appends an item.
    pub fn push(&mut self, item: T) {
        let start = self.items.len();
        self.items.push(item);
        self.record(Splice::new(start, 0, 1));
    }

    /// Inserts an item at `index`, shifting later items.
    ///
    /// # Panics
    ///
    /// Panics if `index > len()`.
    pub fn insert(&mut self, index: usize, item: T) {
        self.items.insert(index, item);
        self.record(Splice::new(index, 0, 1));
    }

    /// Removes and returns the item at `index`, shifting later items.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn remove(&mut self, index: usize) -> T {
        let item = self.items.remove(index);
        self.record(Splice::new(index, 1, 0));
        item
    }

    /// Replaces the item at `index` and returns the previous one.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len()`.
    pub fn replace(&mut self, index: usize, item: T) -> T {
        let previous = core::mem::replace(&mut self.items[index], item);
        self.record(Splice::new(index, 1, 1));
        previous
    }

    /// Replaces `range` with `replace_with`, returning the removed items.
    ///
    /// # Panics
    ///
    /// Panics if the range is out of bounds.
    pub fn splice<R, I>(&mut self, range: R, replace_with: I) -> Vec<T>
    where
        R: RangeBounds<usize>,
        I: IntoIterator<Item = T>,
    {
        let before = self.items.len();
        let start = match range.start_bound() {
            core::ops::Bound::Included(&s) => s,
            core::ops::Bound::Excluded(&s) => s + 1,
            core::ops::Bound::Unbounded => 0,
        };
        let removed: Vec<T> = self.items.splice(range, replace_with).collect();
        let added = self.items.len() + removed.len() - before;
        self.record(Splice::new(start, removed.len(), added));
        removed
    }

    /// Shortens the collection to `len` items.
    pub fn truncate(&mut self, len: usize) {
        let before = self.items.len();
        if len < before {
            self.items.truncate(len);
            self.record(Splice::new(len, before - len, 0));
        }
    }

    /// Removes every item.
    pub fn clear(&mut self) {
        self.truncate(0);
    }

    fn record(&mut self, splice: Splice) {
        if splice.is_noop() {
            return;
        }
        for queue in self.queues.values_mut() {
            queue.push(splice);
        }
    }
}

impl<T> Default for ObservableVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> From<Vec<T>> for ObservableVec<T> {
    fn from(items: Vec<T>) -> Self {
        Self {
            items,
            queues: HashMap::new(),
            next_subscription: 0,
        }
    }
}

impl<T> FromIterator<T> for ObservableVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

impl<T> ContentSource for ObservableVec<T> {
    type Item = T;
    type Subscription = SubscriptionId;

    fn len(&self) -> usize {
        self.items.len()
    }

    fn item_at(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    fn subscribe(&mut self) -> SubscriptionId {
        let id = self.next_subscription;
        self.next_subscription += 1;
        self.queues.insert(id, Vec::new());
        SubscriptionId(id)
    }

    fn unsubscribe(&mut self, subscription: SubscriptionId) {
        self.queues.remove(&subscription.0);
    }

    fn take_changes(&mut self, subscription: &SubscriptionId, out: &mut Vec<Splice>) {
        if let Some(queue) = self.queues.get_mut(&subscription.0) {
            out.append(queue);
        }
    }
}
