//! Ports: the traits the use cases call to reach the outside world.
//!
//! Each trait has one production adapter in `infrastructure` and test doubles
//! in [`crate::infrastructure::mock`].  Keeping the seams here lets the
//! application layer be tested without sockets, SSH servers, or a `ping`
//! binary.

use async_trait::async_trait;
use lanpower_core::MagicPacket;
use thiserror::Error;

use crate::domain::config::SshTarget;

/// Failure to put the magic packet on the wire.
#[derive(Debug, Error)]
pub enum TransmitError {
    /// The ephemeral UDP socket could not be bound.
    #[error("failed to open UDP socket: {0}")]
    Bind(#[source] std::io::Error),

    /// `SO_BROADCAST` could not be enabled on the socket.
    #[error("failed to enable broadcast: {0}")]
    Broadcast(#[source] std::io::Error),

    /// The datagram could not be sent (unreachable network, bad address, ...).
    #[error("failed to send to {dest}: {source}")]
    Send {
        dest: String,
        #[source]
        source: std::io::Error,
    },

    /// The OS accepted fewer bytes than the full packet.
    #[error("short send: {sent} of {expected} bytes")]
    ShortSend { sent: usize, expected: usize },
}

/// Failure to establish or use the SSH session.
#[derive(Debug, Error)]
pub enum SessionError {
    /// TCP connect, key exchange and authentication did not finish in time.
    #[error("timed out connecting to {addr} after {secs}s")]
    Timeout { addr: String, secs: u64 },

    /// The TCP connection or SSH handshake failed.
    #[error("connection to {addr} failed: {message}")]
    Connect { addr: String, message: String },

    /// The server refused the username/password pair.
    #[error("authentication rejected for user {user}")]
    AuthRejected { user: String },

    /// Opening the channel or starting the command failed after login.
    #[error("channel error: {0}")]
    Channel(String),
}

/// Everything the remote command produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    /// `None` when the channel closed without reporting an exit status
    /// (for example when the remote process was killed by a signal).
    pub exit_code: Option<u32>,
}

/// Sends one magic packet as a single UDP datagram.
#[async_trait]
pub trait WakeTransmitter: Send + Sync {
    /// Sends `packet` to `broadcast:port` exactly once.
    ///
    /// # Errors
    ///
    /// Returns [`TransmitError`] if the socket cannot be opened, broadcast
    /// cannot be enabled, or the send fails.  Nothing is retried.
    async fn send(
        &self,
        packet: &MagicPacket,
        broadcast: &str,
        port: u16,
    ) -> Result<(), TransmitError>;
}

/// Runs one command over one authenticated SSH session.
#[async_trait]
pub trait RemoteCommandRunner: Send + Sync {
    /// Connects to `target`, runs `command`, and collects its output.
    ///
    /// A non-zero exit status is **not** an error at this level; it is
    /// reported in [`CommandOutput::exit_code`] and judged by the caller.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError`] if the session cannot be established or the
    /// command cannot be started.
    async fn run(&self, target: &SshTarget, command: &str) -> Result<CommandOutput, SessionError>;
}

/// Launches a subprocess and reports whether it exited successfully.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Runs `program args...` to completion with all stdio discarded.
    ///
    /// # Errors
    ///
    /// Returns the I/O error if the process could not be spawned.
    async fn run(&self, program: &str, args: &[String]) -> std::io::Result<bool>;
}
