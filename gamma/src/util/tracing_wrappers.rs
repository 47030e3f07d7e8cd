// Copyright (c) the Gamma Index Project Authors. All rights reserved.
//
// Use of this source code is governed by a BSD-style
// license that can be found in the LICENSE file.

//! Thin wrappers around `tracing`'s macros that compile to no-ops when the
//! `tracing` feature is disabled, so the hot per-voxel loop never pays for
//! instrumentation it did not ask for.
//!
//! `#[tracing::instrument]` itself is applied at call sites with
//! `#[cfg_attr(feature = "tracing", tracing::instrument(...))]` rather than
//! through this module, since attribute macros cannot be re-exported under a
//! `macro_rules!` fallback.

#[cfg(feature = "tracing")]
pub use tracing::{debug, trace, warn};

#[cfg(not(feature = "tracing"))]
pub use crate::{noop_debug as debug, noop_trace as trace, noop_warn as warn};

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! noop_trace {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! noop_debug {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
#[macro_export]
macro_rules! noop_warn {
    ($($arg:tt)*) => {};
}
