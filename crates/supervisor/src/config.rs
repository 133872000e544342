// SPDX-License-Identifier: MIT
// Copyright (c) 2026 the cortex authors

//! Supervisor configuration: the tunables left to the host program rather
//! than to a file format of its own. A plain struct with documented field
//! defaults, constructed directly by the host rather than parsed from disk.

use std::time::Duration;

/// Tunables for a running [`crate::Supervisor`].
#[derive(Debug, Clone)]
pub struct SupervisorConfig {
    /// How often the synchronization routine reconciles a mirror against
    /// the authoritative store. Defaults to 10ms.
    pub sync_refresh_rate: Duration,

    /// How often the supervisor checks that a spawned child is still alive.
    pub child_liveness_poll: Duration,

    /// How long `Supervisor::shutdown` waits for a child to exit cleanly
    /// after `Request::Shutdown` before calling `Child::start_kill()`.
    pub shutdown_grace: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            sync_refresh_rate: cortex_store::DEFAULT_SYNC_REFRESH_RATE,
            child_liveness_poll: Duration::from_secs(1),
            shutdown_grace: Duration::from_millis(500),
        }
    }
}
