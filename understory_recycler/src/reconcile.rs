// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Content mutation reconciliation.
//!
//! Each [`Splice`] drained from the content source is mapped onto the pool:
//! bound slots whose index now shows a different item are rebound in place
//! (or unbound when the index no longer exists or falls outside the current
//! visible range), and a content resync is scheduled so the pool size follows
//! the new length.

use smallvec::SmallVec;

use crate::{ContentSource, FlushReport, RecycleError, Recycler, Renderer, ResyncReason, Splice};

/// Indices whose item may differ after a splice.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct ChangedSpan {
    start: usize,
    /// `None` when every index from `start` on shifted.
    end: Option<usize>,
}

impl ChangedSpan {
    /// Span of `splice` against a source that now holds `len` items.
    ///
    /// Whether the tail shifted is decided on the splice as recorded, before
    /// clamping, so a later truncation can only widen the span.
    fn of(splice: Splice, len: usize) -> Self {
        let end = splice
            .preserves_tail()
            .then(|| splice.start.saturating_add(splice.added));
        Self {
            start: splice.start.min(len),
            end,
        }
    }

    fn contains(&self, index: usize) -> bool {
        index >= self.start && self.end.is_none_or(|end| index < end)
    }
}

impl<C, R> Recycler<C, R>
where
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    /// Drains and reconciles every change queued by the attached source.
    ///
    /// If a rebind fails, the splices not yet reconciled are dropped and an
    /// explicit resync is scheduled so the next flush repaints every slot.
    pub(crate) fn drain_content_changes(
        &mut self,
        report: &mut FlushReport,
    ) -> Result<(), RecycleError<R::Error>> {
        let mut changes = core::mem::take(&mut self.changes);
        if let Some((source, subscription)) = self.lifecycle.parts_mut() {
            source.take_changes(subscription, &mut changes);
        }
        let mut result = Ok(());
        for splice in changes.drain(..) {
            if let Err(err) = self.reconcile(splice, report) {
                self.schedule_resync(ResyncReason::EXPLICIT);
                result = Err(err);
                break;
            }
        }
        changes.clear();
        self.changes = changes;
        result
    }

    /// Applies one splice to the pool and schedules a content resync.
    fn reconcile(
        &mut self,
        splice: Splice,
        report: &mut FlushReport,
    ) -> Result<(), RecycleError<R::Error>> {
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
            let clamped = splice.clamped(len);
            if clamped.is_noop() {
                return Ok(());
            }
            let span = ChangedSpan::of(splice, len);

            #[cfg(feature = "tracing")]
            tracing::trace!(
                start = clamped.start,
                removed = clamped.removed,
                added = clamped.added,
                len,
                "reconciling content splice"
            );

            let touched: SmallVec<[(usize, usize); 8]> = pool
                .slots()
                .iter()
                .enumerate()
                .filter_map(|(slot, s)| {
                    s.content_index()
                        .filter(|&index| span.contains(index))
                        .map(|index| (slot, index))
                })
                .collect();
            // Only indices inside the range the coming pass applies are repainted.
            let visible = geometry.visible_range(len);
            for (slot, index) in touched {
                if visible.contains(index) {
                    let position = geometry.position_for_index(index);
                    pool.reuse(slot, index, position, true, renderer, content)?;
                    report.rebound += 1;
                } else if pool.unbind(slot, renderer) {
                    report.unbound += 1;
                }
            }
            report.reconciled += 1;
        }
        self.schedule_resync(ResyncReason::CONTENT);
        Ok(())
    }
}
