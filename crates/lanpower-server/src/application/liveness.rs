//! Best-effort reachability check built on a single `ping`.

use std::sync::Arc;

use lanpower_core::{ping_args, Platform, PING_PROGRAM};
use tracing::debug;

use crate::application::ports::ProcessRunner;

/// Reduces one `ping` run to "reachable" or "not reachable".
///
/// Never fails: a spawn error, a timeout, and a non-zero exit all mean
/// `false`, because an unreachable host is an expected answer rather than a
/// fault.
pub struct LivenessProber {
    runner: Arc<dyn ProcessRunner>,
    platform: Platform,
}

impl LivenessProber {
    /// Creates a prober for the platform this binary was compiled for.
    pub fn new(runner: Arc<dyn ProcessRunner>) -> Self {
        Self::with_platform(runner, Platform::current())
    }

    /// Creates a prober using a specific argument dialect.
    pub fn with_platform(runner: Arc<dyn ProcessRunner>, platform: Platform) -> Self {
        Self { runner, platform }
    }

    /// Sends one echo request to `host`.
    pub async fn is_reachable(&self, host: &str) -> bool {
        let args = ping_args(self.platform, host);
        match self.runner.run(PING_PROGRAM, &args).await {
            Ok(success) => success,
            Err(e) => {
                debug!(host, error = %e, "failed to launch ping");
                false
            }
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
