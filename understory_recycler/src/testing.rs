// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A renderer that records every call, for unit tests.

use alloc::vec::Vec;

use kurbo::Point;

use crate::Renderer;

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Call {
    Create(u32),
    Bind { handle: u32, index: usize, item: u32 },
    Prepare(u32),
    Destroy(u32),
    WillSync,
    DidSync(f64),
}

#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    next_handle: u32,
    calls: Vec<Call>,
    live: usize,
    created: usize,
    destroyed: usize,
    /// Binding this content index fails.
    pub(crate) fail_bind_at: Option<usize>,
    /// Creating more than this many views fails.
    pub(crate) create_limit: Option<usize>,
}

impl RecordingRenderer {
    pub(crate) fn calls(&self) -> &[Call] {
        &self.calls
    }

    pub(crate) fn clear_calls(&mut self) {
        self.calls.clear();
    }

    pub(crate) fn created(&self) -> usize {
        self.created
    }

    pub(crate) fn destroyed(&self) -> usize {
        self.destroyed
    }

    pub(crate) fn live(&self) -> usize {
        self.live
    }

    pub(crate) fn binds(&self) -> usize {
        self.calls
            .iter()
            .filter(|call| matches!(call, Call::Bind { .. }))
            .count()
    }
}

impl Renderer for RecordingRenderer {
    type Item = u32;
    type Handle = u32;
    type Error = &'static str;

    fn create(&mut self) -> Result<u32, Self::Error> {
        if self.create_limit.is_some_and(|limit| self.created >= limit) {
            return Err("create limit reached");
        }
        let handle = self.next_handle;
        self.next_handle += 1;
        self.created += 1;
        self.live += 1;
        self.calls.push(Call::Create(handle));
        Ok(handle)
    }

    fn bind(
        &mut self,
        handle: &mut u32,
        item: &u32,
        _position: Point,
        index: usize,
    ) -> Result<(), Self::Error> {
        if self.fail_bind_at == Some(index) {
            return Err("bind failed");
        }
        self.calls.push(Call::Bind {
            handle: *handle,
            index,
            item: *item,
        });
        Ok(())
    }

    fn prepare_for_reuse(&mut self, handle: &mut u32) {
        self.calls.push(Call::Prepare(*handle));
    }

    fn destroy(&mut self, handle: u32) {
        self.destroyed += 1;
        self.live -= 1;
        self.calls.push(Call::Destroy(handle));
    }

    fn sync_will_begin(&mut self) {
        self.calls.push(Call::WillSync);
    }

    fn sync_did_end(&mut self, total_extent: f64) {
        self.calls.push(Call::DidSync(total_extent));
    }
}
