// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Attachment state of the content source.

use core::fmt;

use crate::ContentSource;

/// Whether a content source is attached, and the subscription it was given.
///
/// The subscription is acquired exactly on the transition to `Attached` and
/// released exactly on the transition back to `Detached`.
pub(crate) enum Lifecycle<C: ContentSource> {
    Detached,
    Attached {
        source: C,
        subscription: C::Subscription,
    },
}

impl<C: ContentSource> Lifecycle<C> {
    /// Subscribes to `source` and takes ownership of it.
    pub(crate) fn attach(mut source: C) -> Self {
        let subscription = source.subscribe();
        Self::Attached {
            source,
            subscription,
        }
    }

    pub(crate) const fn is_attached(&self) -> bool {
        matches!(self, Self::Attached { .. })
    }

    pub(crate) const fn source(&self) -> Option<&C> {
        match self {
            Self::Attached { source, .. } => Some(source),
            Self::Detached => None,
        }
    }

    pub(crate) fn source_mut(&mut self) -> Option<&mut C> {
        match self {
            Self::Attached { source, .. } => Some(source),
            Self::Detached => None,
        }
    }

    /// Source and subscription together, for draining queued changes.
    pub(crate) fn parts_mut(&mut self) -> Option<(&mut C, &C::Subscription)> {
        match self {
            Self::Attached {
                source,
                subscription,
            } => Some((source, subscription)),
            Self::Detached => None,
        }
    }

    /// Moves to `Detached`, unsubscribing and returning the source if one was attached.
    pub(crate) fn release(&mut self) -> Option<C> {
        match core::mem::replace(self, Self::Detached) {
            Self::Attached {
                mut source,
                subscription,
            } => {
                source.unsubscribe(subscription);
                Some(source)
            }
            Self::Detached => None,
        }
    }
}

impl<C: ContentSource> fmt::Debug for Lifecycle<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Detached => f.write_str("Detached"),
            Self::Attached { source, .. } => f
                .debug_struct("Attached")
                .field("len", &source.len())
                .finish_non_exhaustive(),
        }
    }
}
