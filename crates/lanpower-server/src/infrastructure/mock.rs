//! In-memory adapters for tests.
//!
//! The real adapters broadcast UDP datagrams, open SSH sessions, and spawn
//! `ping`.  None of that is observable from a test, and an SSH server is not
//! something a test machine can be assumed to have.  The doubles here record
//! every call in a `Mutex<Vec<...>>` so assertions can inspect exactly what
//! the service asked for.
//!
//! # Usage in tests
//!
//! ```ignore
//! let transmitter = Arc::new(RecordingTransmitter::new());
//! let service = PowerService::new(config, Arc::clone(&transmitter), remote, runner);
//!
//! service.wake().await.unwrap();
//!
//! let sent = transmitter.sent.lock().unwrap();
//! assert_eq!(sent.len(), 1);
//! assert_eq!(sent[0].payload.len(), 102);
//! ```
//!
//! These types are public so the integration tests under `tests/` can use
//! them too.

use std::sync::Mutex;

use async_trait::async_trait;
use lanpower_core::MagicPacket;

use crate::application::ports::{
    CommandOutput, ProcessRunner, RemoteCommandRunner, SessionError, TransmitError,
    WakeTransmitter,
};
use crate::domain::config::SshTarget;

/// One call to [`WakeTransmitter::send`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentPacket {
    pub payload: Vec<u8>,
    pub broadcast: String,
    pub port: u16,
}

/// Records every packet instead of sending it.
#[derive(Debug, Default)]
pub struct RecordingTransmitter {
    pub sent: Mutex<Vec<SentPacket>>,
    /// When `true`, `send` records nothing and returns a `Send` error.
    pub should_fail: bool,
}

impl RecordingTransmitter {
    pub fn new() -> Self {
        Self::default()
    }

    /// A transmitter whose every send fails with "network unreachable".
    pub fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl WakeTransmitter for RecordingTransmitter {
    async fn send(
        &self,
        packet: &MagicPacket,
        broadcast: &str,
        port: u16,
    ) -> Result<(), TransmitError> {
        if self.should_fail {
            return Err(TransmitError::Send {
                dest: format!("{broadcast}:{port}"),
                source: std::io::Error::new(std::io::ErrorKind::Other, "network unreachable"),
            });
        }
        // A poisoned lock only happens if another test thread panicked.
        if let Ok(mut sent) = self.sent.lock() {
            sent.push(SentPacket {
                payload: packet.as_bytes().to_vec(),
                broadcast: broadcast.to_string(),
                port,
            });
        }
        Ok(())
    }
}

/// What a [`ScriptedCommandRunner`] does when called.
#[derive(Debug, Clone)]
enum Script {
    Output(CommandOutput),
    RejectAuth,
    Timeout,
}

/// Returns a fixed result for every remote command and records `(host, command)`.
#[derive(Debug)]
pub struct ScriptedCommandRunner {
    pub calls: Mutex<Vec<(String, String)>>,
    script: Script,
}

impl ScriptedCommandRunner {
    fn scripted(script: Script) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            script,
        }
    }

    /// Every command "runs" and exits with `code`.
    pub fn exiting(code: u32) -> Self {
        Self::with_output(CommandOutput {
            exit_code: Some(code),
            ..CommandOutput::default()
        })
    }

    /// Every command "runs" and produces exactly `output`.
    pub fn with_output(output: CommandOutput) -> Self {
        Self::scripted(Script::Output(output))
    }

    /// Every session fails at authentication.
    pub fn rejecting() -> Self {
        Self::scripted(Script::RejectAuth)
    }

    /// Every session fails to connect within the 5-second limit.
    pub fn timing_out() -> Self {
        Self::scripted(Script::Timeout)
    }
}

#[async_trait]
impl RemoteCommandRunner for ScriptedCommandRunner {
    async fn run(&self, target: &SshTarget, command: &str) -> Result<CommandOutput, SessionError> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((target.host.clone(), command.to_string()));
        }
        match &self.script {
            Script::Output(output) => Ok(output.clone()),
            Script::RejectAuth => Err(SessionError::AuthRejected {
                user: target.user.clone(),
            }),
            Script::Timeout => Err(SessionError::Timeout {
                addr: format!("{}:{}", target.host, target.port),
                secs: 5,
            }),
        }
    }
}

/// Stands in for `ping`: answers with a fixed reachability verdict.
#[derive(Debug, Default)]
pub struct StubProcessRunner {
    /// Each `(program, args)` pair that was "launched".
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
    /// Whether the process "exits" successfully.
    pub online: bool,
    /// When `true`, launching fails as if the program were not installed.
    pub spawn_fails: bool,
}

impl StubProcessRunner {
    /// Every probe reports the host reachable.
    pub fn online() -> Self {
        Self {
            online: true,
            ..Self::default()
        }
    }

    /// Every probe reports the host unreachable.
    pub fn offline() -> Self {
        Self::default()
    }

    /// Every launch fails with `NotFound`.
    pub fn missing_program() -> Self {
        Self {
            spawn_fails: true,
            ..Self::default()
        }
    }
}

#[async_trait]
impl ProcessRunner for StubProcessRunner {
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<bool> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push((program.to_string(), args.to_vec()));
        }
        if self.spawn_fails {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                format!("{program}: not found"),
            ));
        }
        Ok(self.online)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::Secret;
    use lanpower_core::MacAddress;

    fn target() -> SshTarget {
        SshTarget {
            host: "desk.lan".into(),
            port: 22,
            user: "admin".into(),
            password: Secret::new("pw"),
        }
    }

    #[tokio::test]
    async fn test_recording_transmitter_captures_payload() {
        let transmitter = RecordingTransmitter::new();
        let packet = MagicPacket::new(MacAddress::new([1, 2, 3, 4, 5, 6]));

        transmitter.send(&packet, "10.0.0.255", 9).await.unwrap();

        let sent = transmitter.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].payload, packet.as_bytes().to_vec());
        assert_eq!(sent[0].broadcast, "10.0.0.255");
    }

    #[tokio::test]
    async fn test_failing_transmitter_records_nothing() {
        let transmitter = RecordingTransmitter::failing();
        let packet = MagicPacket::new(MacAddress::new([1, 2, 3, 4, 5, 6]));

        let result = transmitter.send(&packet, "10.0.0.255", 9).await;

        assert!(matches!(result, Err(TransmitError::Send { .. })));
        assert!(transmitter.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_scripted_runner_rejection_names_user() {
        let runner = ScriptedCommandRunner::rejecting();

        let err = runner.run(&target(), "true").await.unwrap_err();

        assert_eq!(err.to_string(), "authentication rejected for user admin");
        assert_eq!(runner.calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_scripted_runner_timeout_names_address() {
        let runner = ScriptedCommandRunner::timing_out();

        let err = runner.run(&target(), "true").await.unwrap_err();

        assert_eq!(err.to_string(), "timed out connecting to desk.lan:22 after 5s");
    }

    #[tokio::test]
    async fn test_stub_process_runner_missing_program() {
        let runner = StubProcessRunner::missing_program();

        let result = runner.run("ping", &["-c".into(), "1".into()]).await;

        assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
        assert_eq!(runner.calls.lock().unwrap()[0].0, "ping");
    }
}
