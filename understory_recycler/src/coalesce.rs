// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Run-at-most-once-per-turn deduplication of named operations.
//!
//! Triggers that arrive within one scheduling turn (for example several scroll
//! events before the next paint) are scheduled by key. Scheduling an already
//! pending key does nothing. The host drains the pending keys once per turn,
//! in first-scheduled order, and runs each operation once.

use core::hash::Hash;

use hashbrown::HashSet;
use smallvec::SmallVec;

/// A pending-trigger set keyed by operation.
#[derive(Debug, Clone)]
pub struct Coalescer<K> {
    order: SmallVec<[K; 4]>,
    pending: HashSet<K>,
}

impl<K: Copy + Eq + Hash> Coalescer<K> {
    /// Creates an empty coalescer.
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: SmallVec::new(),
            pending: HashSet::new(),
        }
    }

    /// Schedules `key` for the current turn. Returns `false` if it was already pending.
    pub fn schedule(&mut self, key: K) -> bool {
        if self.pending.insert(key) {
            self.order.push(key);
            true
        } else {
            false
        }
    }

    /// Returns `true` if `key` is pending.
    #[must_use]
    pub fn is_scheduled(&self, key: &K) -> bool {
        self.pending.contains(key)
    }

    /// Returns `true` if nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Number of pending keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Ends the turn: removes and returns every pending key in scheduling order.
    pub fn take(&mut self) -> SmallVec<[K; 4]> {
        self.pending.clear();
        core::mem::take(&mut self.order)
    }

    /// Drops every pending key.
    pub fn clear(&mut self) {
        self.pending.clear();
        self.order.clear();
    }
}

impl<K: Copy + Eq + Hash> Default for Coalescer<K> {
    fn default() -> Self {
        Self::new()
    }
}
