// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Cross-process shared state for a `Brain`.
//!
//! [`SharedStore`] is the single authoritative map, held by the main
//! process. Every process — the main process and any child workers —
//! reads and writes through its own [`Mirror`], reconciled against the
//! store by the periodic routine in [`sync`].

mod mirror;
mod store;
pub mod sync;

pub use mirror::{Local, Mirror, Shared};
pub use store::{SharedStore, VersionedValue};
pub use sync::{InProcessTransport, SyncError, SyncHandle, SyncTransport, DEFAULT_SYNC_REFRESH_RATE};
