// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The recycling controller that owns the pool, viewport, and content source.

use alloc::vec::Vec;
use core::fmt;

use crate::lifecycle::Lifecycle;
use crate::sync::SyncMemo;
use crate::{
    Coalescer, ContentSource, FlushReport, RecycleError, RecyclerConfig, Renderer,
    RendererPool, ResyncReason, Slot, Splice, SyncOp, Viewport, VisibleRange,
};

/// Controller for a virtualized list or grid backed by a fixed pool of views.
///
/// This type:
/// - owns the attached [`ContentSource`] and its subscription,
/// - owns the [`RendererPool`] and the [`Renderer`] that backs it,
/// - stores the [`Viewport`] state and [`RecyclerConfig`],
/// - coalesces scroll, resize, and content triggers until [`Recycler::flush`].
///
/// Event handlers (`on_scroll`, `on_resize`, `set_config`, ...) only update
/// state and schedule work. The host calls [`Recycler::flush`] once per turn,
/// typically right before paint, and the pool is brought up to date there.
pub struct Recycler<C: ContentSource, R: Renderer<Item = C::Item>> {
    pub(crate) renderer: R,
    pub(crate) pool: RendererPool<R::Handle>,
    pub(crate) config: RecyclerConfig,
    pub(crate) viewport: Viewport,
    pub(crate) lifecycle: Lifecycle<C>,
    pub(crate) memo: SyncMemo,
    pending: Coalescer<SyncOp>,
    reasons: ResyncReason,
    pub(crate) changes: Vec<Splice>,
}

impl<C, R> Recycler<C, R>
where
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    /// Creates a detached recycler with an empty pool and a zero-sized viewport.
    #[must_use]
    pub fn new(renderer: R, config: RecyclerConfig) -> Self {
        let config = config.sanitized();
        Self {
            renderer,
            pool: RendererPool::new(),
            viewport: Viewport::default(),
            config,
            lifecycle: Lifecycle::Detached,
            memo: SyncMemo::default(),
            pending: Coalescer::new(),
            reasons: ResyncReason::empty(),
            changes: Vec::new(),
        }
    }

    /// Sets the initial viewport size.
    #[must_use]
    pub fn with_viewport(mut self, width: f64, height: f64) -> Self {
        self.on_resize(width, height);
        self
    }

    /// Attaches `source`, subscribing to its changes, and schedules a resync.
    ///
    /// Returns the previously attached source, unsubscribed. The slots it was
    /// shown in are kept and rebound by the next flush.
    pub fn attach(&mut self, source: C) -> Option<C> {
        let previous = self.lifecycle.release();
        self.changes.clear();
        self.lifecycle = Lifecycle::attach(source);
        self.memo = SyncMemo::default();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            replaced = previous.is_some(),
            len = self.lifecycle.source().map(C::len),
            "attached content source"
        );

        self.schedule_resync(ResyncReason::ATTACH);
        previous
    }

    /// Detaches the content source, destroying every slot.
    ///
    /// Returns the source, unsubscribed, or `None` if nothing was attached.
    pub fn detach(&mut self) -> Option<C> {
        let source = self.lifecycle.release()?;

        #[cfg(feature = "tracing")]
        tracing::debug!(slots = self.pool.len(), "detaching content source");

        self.pool.destroy_all(&mut self.renderer);
        self.changes.clear();
        self.memo = SyncMemo::default();
        self.pending.clear();
        self.reasons = ResyncReason::empty();
        Some(source)
    }

    /// Returns `true` if a content source is attached.
    #[must_use]
    pub const fn is_attached(&self) -> bool {
        self.lifecycle.is_attached()
    }

    /// The attached content source.
    #[must_use]
    pub const fn content(&self) -> Option<&C> {
        self.lifecycle.source()
    }

    /// The attached content source, for mutation.
    ///
    /// Mutations are picked up from the source's change queue by the next
    /// [`Recycler::flush`].
    pub fn content_mut(&mut self) -> Option<&mut C> {
        self.lifecycle.source_mut()
    }

    /// Records a new scroll offset and schedules a positional pass.
    pub fn on_scroll(&mut self, offset: f64) {
        if self.viewport.set_scroll_offset(offset) {
            self.pending.schedule(SyncOp::Position);
        }
    }

    /// Records a new viewport size and schedules a resync.
    pub fn on_resize(&mut self, width: f64, height: f64) {
        if self.viewport.set_size(width, height) {
            self.schedule_resync(ResyncReason::VIEWPORT);
        }
    }

    /// Replaces the layout constants and schedules a resync.
    pub fn set_config(&mut self, config: RecyclerConfig) {
        let config = config.sanitized();
        if config == self.config {
            return;
        }
        let padding_changed = config.padding_count != self.config.padding_count;
        let layout_changed = config.row_height != self.config.row_height
            || config.element_width != self.config.element_width;
        self.config = config;
        if layout_changed {
            self.schedule_resync(ResyncReason::LAYOUT);
        }
        if padding_changed {
            self.schedule_resync(ResyncReason::VIEWPORT);
        }
    }

    /// Sets the number of extra rows kept beyond the viewport and schedules a resync.
    pub fn set_padding_count(&mut self, padding_count: usize) {
        if padding_count != self.config.padding_count {
            self.config.padding_count = padding_count;
            self.schedule_resync(ResyncReason::VIEWPORT);
        }
    }

    /// Schedules a resync that repaints every bound slot.
    pub fn force_resync(&mut self) {
        self.schedule_resync(ResyncReason::EXPLICIT);
    }

    /// Returns `true` if a trigger is waiting for [`Recycler::flush`].
    ///
    /// Queued content changes are not visible here until they are drained.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }

    /// Runs the work scheduled this turn.
    ///
    /// Content changes are reconciled first. Then at most one resync runs,
    /// which includes the positional pass, or else at most one positional pass.
    ///
    /// # Errors
    ///
    /// Returns the first renderer failure, or a [`RecycleError::MissingItem`]
    /// when the content source breaks its contract. The failed work stays
    /// scheduled, so the next flush retries it.
    pub fn flush(&mut self) -> Result<FlushReport, RecycleError<R::Error>> {
        let mut report = FlushReport::default();
        self.drain_content_changes(&mut report)?;

        let ops = self.pending.take();
        let reasons = core::mem::take(&mut self.reasons);

        // A resync subsumes the positional pass.
        let op = [SyncOp::Resync, SyncOp::Position]
            .into_iter()
            .find(|op| ops.contains(op));

        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("flush", op = op.map(SyncOp::name), ?reasons).entered();

        let result = match op {
            Some(SyncOp::Resync) => self.resync(reasons, &mut report),
            Some(SyncOp::Position) => self.sync_positions(false, &mut report),
            None => Ok(()),
        };

        if let Err(err) = result {
            #[cfg(feature = "tracing")]
            tracing::debug!("flush failed; work stays scheduled");
            for op in ops {
                self.pending.schedule(op);
            }
            self.reasons |= reasons;
            self.memo.range = None;
            return Err(err);
        }
        Ok(report)
    }

    /// Total extent of the attached content, `0.0` when detached.
    #[must_use]
    pub fn total_extent(&self) -> f64 {
        let len = self.lifecycle.source().map_or(0, C::len);
        self.geometry().total_extent(len)
    }

    /// Extent reported to the renderer at the end of the last sync pass.
    #[must_use]
    pub const fn last_extent(&self) -> Option<f64> {
        self.memo.extent
    }

    /// Visible range for the current viewport and content.
    #[must_use]
    pub fn visible_range(&self) -> VisibleRange {
        let len = self.lifecycle.source().map_or(0, C::len);
        self.geometry().visible_range(len)
    }

    /// Range applied by the last sync pass, if it is still current.
    #[must_use]
    pub const fn last_range(&self) -> Option<VisibleRange> {
        self.memo.range
    }

    /// Number of columns for the current viewport width.
    #[must_use]
    pub fn column_count(&self) -> usize {
        self.geometry().columns
    }

    /// The renderer slot pool.
    #[must_use]
    pub const fn pool(&self) -> &RendererPool<R::Handle> {
        &self.pool
    }

    /// All slots in pool order.
    #[must_use]
    pub fn slots(&self) -> &[Slot<R::Handle>] {
        self.pool.slots()
    }

    /// The renderer.
    #[must_use]
    pub const fn renderer(&self) -> &R {
        &self.renderer
    }

    /// The renderer, for mutation.
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Current viewport state.
    #[must_use]
    pub const fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Current layout constants.
    #[must_use]
    pub const fn config(&self) -> &RecyclerConfig {
        &self.config
    }

    /// Offset at which the row holding content index `index` starts.
    #[must_use]
    pub fn offset_of_index(&self, index: usize) -> f64 {
        self.geometry().position_for_index(index).y
    }

    pub(crate) fn schedule_resync(&mut self, reason: ResyncReason) {
        self.reasons |= reason;
        self.pending.schedule(SyncOp::Resync);
    }
}

impl<C, R> Drop for Recycler<C, R>
where
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    fn drop(&mut self) {
        drop(self.lifecycle.release());
        self.pool.destroy_all(&mut self.renderer);
    }
}

impl<C, R> fmt::Debug for Recycler<C, R>
where
    C: ContentSource,
    R: Renderer<Item = C::Item>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recycler")
            .field("lifecycle", &self.lifecycle)
            .field("slots", &self.pool.len())
            .field("config", &self.config)
            .field("viewport", &self.viewport)
            .field("last_range", &self.memo.range)
            .field("pending", &self.pending.len())
            .field("reasons", &self.reasons)
            .finish_non_exhaustive()
    }
}
