// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! cortex-wire: the request/response protocol spoken between a `Brain`'s
//! main process and its per-task child process.
//!
//! Wire format: 4-byte length prefix (big-endian) + JSON payload.

mod codec;
mod protocol;

pub use codec::{
    decode, encode, read_message, read_value, write_message, write_value, ProtocolError,
};
pub use protocol::{Request, Response, SyncEntry};
