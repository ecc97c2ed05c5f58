// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors surfaced by a flush.

use core::fmt;

/// Failure of a sync pass.
///
/// `E` is the renderer's own error type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecycleError<E> {
    /// [`Renderer::create`](crate::Renderer::create) or
    /// [`Renderer::bind`](crate::Renderer::bind) failed.
    Renderer(E),
    /// The content source reported `len` items but had none at `index`.
    MissingItem {
        /// Index that was requested.
        index: usize,
        /// Length reported by the source.
        len: usize,
    },
}

impl<E: fmt::Display> fmt::Display for RecycleError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renderer(err) => write!(f, "renderer failed: {err}"),
            Self::MissingItem { index, len } => {
                write!(f, "content source of length {len} has no item at {index}")
            }
        }
    }
}

impl<E> core::error::Error for RecycleError<E>
where
    E: core::error::Error + 'static,
{
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Renderer(err) => Some(err),
            Self::MissingItem { .. } => None,
        }
    }
}
