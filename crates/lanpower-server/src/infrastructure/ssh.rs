//! SSH adapter: one password-authenticated session, one command.
//!
//! # Session lifecycle
//!
//! ```text
//! TCP connect ─▶ key exchange ─▶ password auth     (bounded by connect_timeout)
//!      ─▶ open session channel ─▶ exec(command)
//!      ─▶ collect stdout / stderr until the channel closes
//!      ─▶ disconnect
//! ```
//!
//! Only the first three steps are time-limited.  Once the command is running
//! the adapter waits for the remote side to close the channel; a suspend
//! command usually does so promptly, before the machine actually sleeps.
//!
//! # Host keys
//!
//! The server's host key is accepted without verification.  The target is a
//! single machine on the local network chosen by whoever deployed this
//! service, and there is no known_hosts store to check against.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use russh::client::{self, Handle};
use russh::{ChannelMsg, Disconnect};
use russh_keys::key::PublicKey;
use tokio::time::timeout;
use tracing::debug;

use crate::application::ports::{CommandOutput, RemoteCommandRunner, SessionError};
use crate::domain::config::SshTarget;

/// Limit for TCP connect, key exchange and authentication combined.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// SSH extended-data stream number for stderr (RFC 4254 §5.2).
const SSH_EXTENDED_DATA_STDERR: u32 = 1;

/// russh client callbacks.  Only host key checking is customised.
struct TrustingClient;

#[async_trait]
impl client::Handler for TrustingClient {
    type Error = russh::Error;

    async fn check_server_key(
        &mut self,
        _server_public_key: &PublicKey,
    ) -> Result<bool, Self::Error> {
        Ok(true)
    }
}

/// Runs commands over `russh` client sessions.
pub struct RusshCommandRunner {
    config: Arc<client::Config>,
    connect_timeout: Duration,
}

impl RusshCommandRunner {
    /// Creates a runner with the standard 5-second connect timeout.
    pub fn new() -> Self {
        Self::with_connect_timeout(CONNECT_TIMEOUT)
    }

    /// Creates a runner with a custom connect timeout.
    pub fn with_connect_timeout(connect_timeout: Duration) -> Self {
        Self {
            config: Arc::new(client::Config::default()),
            connect_timeout,
        }
    }

    async fn open_session(
        &self,
        target: &SshTarget,
        addr: &str,
    ) -> Result<Handle<TrustingClient>, SessionError> {
        let mut session = client::connect(
            Arc::clone(&self.config),
            (target.host.as_str(), target.port),
            TrustingClient,
        )
        .await
        .map_err(|e| SessionError::Connect {
            addr: addr.to_string(),
            message: e.to_string(),
        })?;

        let accepted = session
            .authenticate_password(target.user.as_str(), target.password.expose())
            .await
            .map_err(|e| SessionError::Connect {
                addr: addr.to_string(),
                message: e.to_string(),
            })?;

        if !accepted {
            return Err(SessionError::AuthRejected {
                user: target.user.clone(),
            });
        }
        Ok(session)
    }
}

impl Default for RusshCommandRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteCommandRunner for RusshCommandRunner {
    async fn run(&self, target: &SshTarget, command: &str) -> Result<CommandOutput, SessionError> {
        let addr = format!("{}:{}", target.host, target.port);

        let session = match timeout(self.connect_timeout, self.open_session(target, &addr)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SessionError::Timeout {
                    addr,
                    secs: self.connect_timeout.as_secs(),
                })
            }
        };
        debug!(%addr, user = %target.user, "SSH session authenticated");

        let result = execute(&session, command).await;

        if let Err(e) = session
            .disconnect(Disconnect::ByApplication, "", "en")
            .await
        {
            // The remote host may already be suspending.
            debug!(%addr, error = %e, "SSH disconnect failed");
        }
        result
    }
}

/// Runs `command` on a fresh channel and drains it until the remote closes it.
async fn execute(
    session: &Handle<TrustingClient>,
    command: &str,
) -> Result<CommandOutput, SessionError> {
    let mut channel = session
        .channel_open_session()
        .await
        .map_err(|e| SessionError::Channel(e.to_string()))?;
    channel
        .exec(true, command)
        .await
        .map_err(|e| SessionError::Channel(e.to_string()))?;

    let mut stdout = Vec::new();
    let mut stderr = Vec::new();
    let mut exit_code = None;

    while let Some(msg) = channel.wait().await {
        match msg {
            ChannelMsg::Data { ref data } => stdout.extend_from_slice(data),
            ChannelMsg::ExtendedData { ref data, ext } if ext == SSH_EXTENDED_DATA_STDERR => {
                stderr.extend_from_slice(data)
            }
            ChannelMsg::ExitStatus { exit_status } => exit_code = Some(exit_status),
            _ => {}
        }
    }

    Ok(CommandOutput {
        stdout: String::from_utf8_lossy(&stdout).into_owned(),
        stderr: String::from_utf8_lossy(&stderr).into_owned(),
        exit_code,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
