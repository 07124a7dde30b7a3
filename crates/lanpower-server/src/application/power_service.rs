//! The three use cases behind the HTTP API: wake, sleep, and status.
//!
//! [`PowerService`] owns the validated configuration and the ports it needs.
//! Each method is one self-contained unit of work; nothing is shared between
//! concurrent calls except the read-only configuration, so two overlapping
//! `sleep` requests simply open two independent SSH sessions.

use std::sync::Arc;

use lanpower_core::{AddressError, MacAddress, MagicPacket};
use thiserror::Error;
use tracing::debug;

use crate::application::liveness::LivenessProber;
use crate::application::ports::{
    CommandOutput, ProcessRunner, RemoteCommandRunner, SessionError, TransmitError,
    WakeTransmitter,
};
use crate::domain::config::ServerConfig;

/// Errors surfaced by the wake and sleep use cases.
///
/// The `Display` text of each variant is what the API returns in the
/// `error` field of a failed response.
#[derive(Debug, Error)]
pub enum PowerError {
    /// The configured MAC does not contain exactly 12 hex digits.
    #[error(transparent)]
    InvalidAddress(#[from] AddressError),

    /// The magic packet could not be sent.
    #[error("wake packet not sent: {0}")]
    TransmitFailure(#[from] TransmitError),

    /// The SSH session could not be established or used.
    #[error("SSH session failed: {0}")]
    SessionFailure(#[from] SessionError),

    /// The sleep command ran but did not exit with status 0.
    #[error("SSH command failed (code {})", describe_exit(.code))]
    RemoteCommandFailure { code: Option<u32>, output: CommandOutput },
}

fn describe_exit(code: &Option<u32>) -> String {
    match code {
        Some(c) => c.to_string(),
        None => "none".to_string(),
    }
}

/// Wake / sleep / status orchestration over the configured target machine.
pub struct PowerService {
    config: Arc<ServerConfig>,
    transmitter: Arc<dyn WakeTransmitter>,
    remote: Arc<dyn RemoteCommandRunner>,
    prober: LivenessProber,
}

impl PowerService {
    /// Creates the service with the given adapters.
    pub fn new(
        config: Arc<ServerConfig>,
        transmitter: Arc<dyn WakeTransmitter>,
        remote: Arc<dyn RemoteCommandRunner>,
        process_runner: Arc<dyn ProcessRunner>,
    ) -> Self {
        Self::with_prober(config, transmitter, remote, LivenessProber::new(process_runner))
    }

    /// Creates the service with an explicitly configured prober.
    pub fn with_prober(
        config: Arc<ServerConfig>,
        transmitter: Arc<dyn WakeTransmitter>,
        remote: Arc<dyn RemoteCommandRunner>,
        prober: LivenessProber,
    ) -> Self {
        Self {
            config,
            transmitter,
            remote,
            prober,
        }
    }

    /// The configuration this service was built with.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Builds the magic packet for the configured MAC and broadcasts it once.
    ///
    /// The MAC is parsed before any socket is opened, so a malformed address
    /// never reaches the network.  Returns the parsed MAC on success.
    ///
    /// # Errors
    ///
    /// [`PowerError::InvalidAddress`] or [`PowerError::TransmitFailure`].
    pub async fn wake(&self) -> Result<MacAddress, PowerError> {
        let wake = &self.config.wake;
        let packet = MagicPacket::from_mac_str(&wake.mac)?;
        debug!(mac = %packet.target(), broadcast = %wake.broadcast, port = wake.port, "sending magic packet");
        self.transmitter
            .send(&packet, &wake.broadcast, wake.port)
            .await?;
        Ok(packet.target())
    }

    /// Runs the configured sleep command on the SSH target.
    ///
    /// Returns the captured output when the command exits with status 0.
    ///
    /// # Errors
    ///
    /// [`PowerError::SessionFailure`] if the session cannot be established,
    /// [`PowerError::RemoteCommandFailure`] for any other exit status.
    pub async fn sleep(&self) -> Result<CommandOutput, PowerError> {
        let output = self
            .remote
            .run(&self.config.ssh, &self.config.sleep_command)
            .await?;

        match output.exit_code {
            Some(0) => Ok(output),
            code => Err(PowerError::RemoteCommandFailure { code, output }),
        }
    }

    /// Reports whether the SSH host answers a single ping.
    pub async fn status(&self) -> bool {
        self.prober.is_reachable(&self.config.ssh.host).await
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::ports::MockProcessRunner;
    use crate::domain::config::RawSettings;
    use crate::infrastructure::mock::{RecordingTransmitter, ScriptedCommandRunner};
    use lanpower_core::Platform;

    fn config_with_mac(mac: &str) -> Arc<ServerConfig> {
        let raw = RawSettings {
            wake_mac: Some(mac.into()),
            wake_broadcast: Some("192.168.1.255".into()),
            wake_port: Some("7".into()),
            sleep_host: Some("desk.lan".into()),
            ssh_pass: Some("secret".into()),
            sleep_command: Some("systemctl suspend".into()),
            ..RawSettings::default()
        };
        Arc::new(raw.validate().unwrap())
    }

    fn idle_prober() -> LivenessProber {
        LivenessProber::with_platform(Arc::new(MockProcessRunner::new()), Platform::Other)
    }

    fn service(
        mac: &str,
        transmitter: Arc<RecordingTransmitter>,
        remote: Arc<ScriptedCommandRunner>,
    ) -> PowerService {
        PowerService::with_prober(config_with_mac(mac), transmitter, remote, idle_prober())
    }

    #[tokio::test]
    async fn test_wake_sends_one_packet_to_configured_destination() {
        // Arrange
        let transmitter = Arc::new(RecordingTransmitter::new());
        let svc = service(
            "00:11:22:33:44:55",
            Arc::clone(&transmitter),
            Arc::new(ScriptedCommandRunner::exiting(0)),
        );

        // Act
        let mac = svc.wake().await.unwrap();

        // Assert
        assert_eq!(mac.to_string(), "00:11:22:33:44:55");
        let sent = transmitter.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].broadcast, "192.168.1.255");
        assert_eq!(sent[0].port, 7);
        assert_eq!(sent[0].payload.len(), 102);
    }

    #[tokio::test]
    async fn test_wake_with_invalid_mac_never_transmits() {
        // Arrange
        let transmitter = Arc::new(RecordingTransmitter::new());
        let svc = service(
            "00:11:22",
            Arc::clone(&transmitter),
            Arc::new(ScriptedCommandRunner::exiting(0)),
        );

        // Act
        let result = svc.wake().await;

        // Assert
        assert!(matches!(result, Err(PowerError::InvalidAddress(_))));
        assert!(transmitter.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wake_propagates_transmit_failure() {
        let transmitter = Arc::new(RecordingTransmitter::failing());
        let svc = service(
            "00:11:22:33:44:55",
            transmitter,
            Arc::new(ScriptedCommandRunner::exiting(0)),
        );

        let err = svc.wake().await.unwrap_err();

        assert!(matches!(err, PowerError::TransmitFailure(_)));
        assert!(err.to_string().starts_with("wake packet not sent"));
    }

    #[tokio::test]
    async fn test_sleep_exit_zero_succeeds() {
        // Arrange
        let remote = Arc::new(ScriptedCommandRunner::exiting(0));
        let svc = service(
            "00:11:22:33:44:55",
            Arc::new(RecordingTransmitter::new()),
            Arc::clone(&remote),
        );

        // Act
        let output = svc.sleep().await.unwrap();

        // Assert
        assert_eq!(output.exit_code, Some(0));
        let calls = remote.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].0, "desk.lan");
        assert_eq!(calls[0].1, "systemctl suspend");
    }

    #[tokio::test]
    async fn test_sleep_nonzero_exit_is_remote_command_failure() {
        let svc = service(
            "00:11:22:33:44:55",
            Arc::new(RecordingTransmitter::new()),
            Arc::new(ScriptedCommandRunner::exiting(1)),
        );

        let err = svc.sleep().await.unwrap_err();

        assert!(matches!(
            err,
            PowerError::RemoteCommandFailure { code: Some(1), .. }
        ));
        assert_eq!(err.to_string(), "SSH command failed (code 1)");
    }

    #[tokio::test]
    async fn test_sleep_without_exit_status_is_failure() {
        let svc = service(
            "00:11:22:33:44:55",
            Arc::new(RecordingTransmitter::new()),
            Arc::new(ScriptedCommandRunner::with_output(CommandOutput::default())),
        );

        let err = svc.sleep().await.unwrap_err();

        assert_eq!(err.to_string(), "SSH command failed (code none)");
    }

    #[tokio::test]
    async fn test_sleep_session_error_is_session_failure() {
        let svc = service(
            "00:11:22:33:44:55",
            Arc::new(RecordingTransmitter::new()),
            Arc::new(ScriptedCommandRunner::rejecting()),
        );

        let err = svc.sleep().await.unwrap_err();

        assert!(matches!(err, PowerError::SessionFailure(_)));
        assert!(err.to_string().contains("authentication rejected"));
    }

    #[tokio::test]
    async fn test_status_pings_ssh_host() {
        // Arrange
        let mut runner = MockProcessRunner::new();
        runner
            .expect_run()
            .withf(|_, args| args.last().map(|h| h == "desk.lan").unwrap_or(false))
            .times(1)
            .returning(|_, _| Ok(true));
        let svc = PowerService::with_prober(
            config_with_mac("00:11:22:33:44:55"),
            Arc::new(RecordingTransmitter::new()),
            Arc::new(ScriptedCommandRunner::exiting(0)),
            LivenessProber::with_platform(Arc::new(runner), Platform::Other),
        );

        // Act / Assert
        assert!(svc.status().await);
    }
}
