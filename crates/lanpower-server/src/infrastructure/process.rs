//! Subprocess adapter used by the liveness probe.

use std::process::Stdio;

use async_trait::async_trait;
use tokio::process::Command;

use crate::application::ports::ProcessRunner;

/// Spawns real processes with `tokio::process`.
///
/// stdin, stdout and stderr are all redirected to the null device; only the
/// exit status matters.  The child is not killed if the caller stops
/// waiting, so an abandoned probe still runs to its own timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemProcessRunner;

#[async_trait]
impl ProcessRunner for SystemProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<bool> {
        let status = Command::new(program)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .await?;
        Ok(status.success())
    }
}
