// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The sync engine: positional sync passes and pool-resizing resyncs.
//!
//! Two passes keep the pool aligned with the visible range:
//!
//! - The *positional* pass (the scroll path) maps every index of the visible
//!   range onto its round-robin slot and rebinds the slots whose index changed.
//!   It is skipped entirely when the range equals the last applied one.
//! - The *resync* pass (the resize / layout / content path) first grows or
//!   shrinks the pool to `min(needed, content_len)` slots and then runs the
//!   positional pass, forced when the reason requires a full repaint.

use hashbrown::HashSet;

use crate::{ContentSource, Geometry, RecycleError, Recycler, Renderer, VisibleRange};

bitflags::bitflags! {
    /// Why a resync was scheduled. Reasons accumulate until the next flush.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ResyncReason: u8 {
        /// The viewport size or padding changed.
        const VIEWPORT = 0b0000_0001;
        /// Row height or element width changed.
        const LAYOUT   = 0b0000_0010;
        /// The content source was mutated.
        const CONTENT  = 0b0000_0100;
        /// A content source was attached.
        const ATTACH   = 0b0000_1000;
        /// The host asked for a full resync.
        const EXPLICIT = 0b0001_0000;
    }
}

impl ResyncReason {
    /// Returns `true` if every bound slot must be repainted.
    ///
    /// Content mutations alone do not repaint: the reconciler has already
    /// rebound the slots whose item changed, and every other slot still shows
    /// the right item at the right position.
    #[must_use]
    pub const fn forces_repaint(self) -> bool {
        self.intersects(
            Self::VIEWPORT
                .union(Self::LAYOUT)
                .union(Self::ATTACH)
                .union(Self::EXPLICIT),
        )
    }
}

/// Operations coalesced per turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum SyncOp {
    /// Positional sync pass.
    Position,
    /// Pool resize followed by a positional pass.
    Resync,
}

impl SyncOp {
    /// Stable operation name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Position => "sync_positions",
            Self::Resync => "resync",
        }
    }
}

/// Work done by one [`Recycler::flush`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Content splices reconciled.
    pub reconciled: usize,
    /// A resync ran.
    pub resynced: bool,
    /// A positional pass ran (not short-circuited by the range memo).
    pub synced: bool,
    /// Slots created.
    pub created: usize,
    /// Slots destroyed.
    pub destroyed: usize,
    /// Slots rebound to a new item or position.
    pub rebound: usize,
    /// Slots left unbound.
    pub unbound: usize,
}

impl FlushReport {
    /// Returns `true` if the flush touched no slot.
    #[must_use]
    pub const fn is_idle(&self) -> bool {
        self.created == 0 && self.destroyed == 0 && self.rebound == 0 && self.unbound == 0
    }
}

/// Last applied range and extent, used to short-circuit redundant passes.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub(crate) struct SyncMemo {
    pub(crate) range: Option<VisibleRange>,
    pub(crate) extent: Option<f64>,
}

impl<C, R> Recycler<C, R>
where
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    /// Positional pass over the current visible range.
    pub(crate) fn sync_positions(
        &mut self,
        force: bool,
        report: &mut FlushReport,
    ) -> Result<(), RecycleError<R::Error>> {
        let geometry = self.geometry();
        let Self {
            pool,
            renderer,
            lifecycle,
            memo,
            ..
        } = self;
        let Some(content) = lifecycle.source() else {
            return Ok(());
        };
        let len = content.len();
        let range = geometry.visible_range(len);
        if !force && memo.range == Some(range) {
            return Ok(());
        }

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!(
            "sync_positions",
            start = range.start,
            end = range.end,
            force,
            slots = pool.len()
        )
        .entered();

        report.synced = true;
        renderer.sync_will_begin();
        for index in range.indices() {
            let Some(slot) = pool.slot_for_index(index) else {
                break;
            };
            let position = geometry.position_for_index(index);
            if pool.reuse(slot, index, position, force, renderer, content)? {
                report.rebound += 1;
            }
        }
        report.unbound += pool.release_misplaced(&range, renderer);

        let extent = geometry.total_extent(len);
        memo.range = Some(range);
        memo.extent = Some(extent);
        renderer.sync_did_end(extent);
        Ok(())
    }

    /// Resizes the pool to `min(needed, content_len)` and runs a positional pass.
    pub(crate) fn resync(
        &mut self,
        reasons: ResyncReason,
        report: &mut FlushReport,
    ) -> Result<(), RecycleError<R::Error>> {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("resync", ?reasons).entered();

        report.resynced = true;
        if !self.lifecycle.is_attached() {
            report.destroyed += self.pool.destroy_all(&mut self.renderer);
            self.memo = SyncMemo::default();
            return Ok(());
        }

        let geometry = self.geometry();
        {
            let Self {
                pool,
                renderer,
                lifecycle,
                ..
            } = self;
            let Some(content) = lifecycle.source() else {
                return Ok(());
            };
            let len = content.len();
            let desired = geometry.desired_slot_count(len);
            let range = geometry.visible_range(len);
            let current = pool.len();
            if current > desired {
                let destroyed = pool.shrink(current - desired, renderer);
                report.destroyed += destroyed;
                #[cfg(feature = "tracing")]
                tracing::debug!(destroyed, desired, "shrank renderer pool");
            } else if current < desired {
                // A forced pass binds every slot anyway, so new slots start unbound.
                let force = reasons.forces_repaint();
                let held: HashSet<usize> = pool.bound_indices().collect();
                let mut targets = range
                    .indices()
                    .filter(|index| !force && !held.contains(index));
                let created =
                    pool.grow(desired - current, &mut targets, renderer, content, &geometry)?;
                report.created += created;
                #[cfg(feature = "tracing")]
                tracing::debug!(created, desired, "grew renderer pool");
            }
            pool.align_to_residues(&range);
        }

        self.memo.range = None;
        self.sync_positions(reasons.forces_repaint(), report)
    }

    /// Geometry for the current configuration and viewport.
    #[must_use]
    pub fn geometry(&self) -> Geometry {
        Geometry::resolve(&self.config, &self.viewport)
    }
}

#[cfg(test)]
mod tests {
    use super::{FlushReport, ResyncReason, SyncOp};

    #[test]
    fn only_content_reasons_skip_the_repaint() {
        assert!(!ResyncReason::CONTENT.forces_repaint());
        assert!(!ResyncReason::empty().forces_repaint());
        assert!(ResyncReason::VIEWPORT.forces_repaint());
        assert!((ResyncReason::CONTENT | ResyncReason::LAYOUT).forces_repaint());
        assert!(ResyncReason::ATTACH.forces_repaint());
        assert!(ResyncReason::EXPLICIT.forces_repaint());
    }

    #[test]
    fn op_names_are_distinct() {
        assert_ne!(SyncOp::Position.name(), SyncOp::Resync.name());
    }

    #[test]
    fn default_report_is_idle() {
        assert!(FlushReport::default().is_idle());
        let report = FlushReport {
            rebound: 1,
            ..FlushReport::default()
        };
        assert!(!report.is_idle());
    }
}
