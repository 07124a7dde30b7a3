//! Server configuration types and validation.
//!
//! Startup moves through three states exactly once:
//!
//! ```text
//! Unconfigured ──validate()──▶ Validated ──run_server()──▶ Listening
//!  RawSettings                  ServerConfig                 (axum)
//! ```
//!
//! [`RawSettings`] holds the untrusted strings collected from flags and
//! environment variables.  [`RawSettings::validate`] applies defaults, checks
//! that required values are present and that every port is in `1..=65535`,
//! and produces an immutable [`ServerConfig`].  Any failure is a
//! [`ConfigError`], which `main.rs` treats as fatal before binding a socket.
//!
//! Keeping validation here (no environment reads, no file access) makes every
//! rule testable with plain struct literals.

use std::fmt;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use thiserror::Error;

/// HTTP listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 8080;
/// Interface the HTTP listener binds to when `BIND_ADDRESS` is unset.
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";
/// Destination of the magic packet when `WAKE_BROADCAST` is unset.
pub const DEFAULT_WAKE_BROADCAST: &str = "255.255.255.255";
/// UDP "discard" port, the conventional Wake-on-LAN destination.
pub const DEFAULT_WAKE_PORT: u16 = 9;
pub const DEFAULT_SSH_PORT: u16 = 22;
pub const DEFAULT_SSH_USER: &str = "root";
/// Re-arms Wake-on-LAN on the NIC (some drivers clear it on resume), then suspends.
pub const DEFAULT_SLEEP_COMMAND: &str =
    "/usr/sbin/ethtool -s nic0 wol g && /bin/systemctl suspend";

/// Errors detected while validating the startup configuration.
///
/// Every variant is fatal: the process logs it and exits with status 1.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A required setting was absent or empty.
    #[error("{0} is required")]
    Missing(&'static str),

    /// A port setting was not an integer in `1..=65535`.
    #[error("{name} is invalid: {value:?} is not a port in 1-65535")]
    InvalidPort { name: &'static str, value: String },

    /// `BIND_ADDRESS` was not an IPv4 or IPv6 address.
    #[error("BIND_ADDRESS is invalid: {0:?} is not an IP address")]
    InvalidBindAddress(String),

    /// `STATIC_DIR` does not name an existing directory.
    #[error("STATIC_DIR is invalid: {} is not a directory", .0.display())]
    StaticDirNotFound(PathBuf),
}

/// A string that must never appear in logs.
///
/// `Debug` prints `Secret("***")`; call [`Secret::expose`] at the single
/// point where the value is handed to the SSH client.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(\"***\")")
    }
}

/// Where and to whom the magic packet is sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WakeTarget {
    /// MAC address exactly as configured.  It is parsed on every wake request
    /// so a malformed value surfaces as an `InvalidAddress` API error.
    pub mac: String,
    /// Broadcast address (or hostname) the datagram is sent to.
    pub broadcast: String,
    /// Destination UDP port.
    pub port: u16,
}

/// Credentials and address of the machine the sleep command runs on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SshTarget {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Secret,
}

/// The validated, immutable server configuration.
///
/// Built once at startup and shared with every request handler through an
/// `Arc`.  There is no global configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address the HTTP listener binds to.
    pub listen_addr: SocketAddr,
    pub wake: WakeTarget,
    /// SSH endpoint for the sleep command.  Its `host` is also the target of
    /// the status ping.
    pub ssh: SshTarget,
    /// Shell command executed on the remote host by `POST /api/sleep`.
    pub sleep_command: String,
    /// Optional directory served for every non-API path.
    pub static_dir: Option<PathBuf>,
}

/// Unvalidated settings as collected from CLI flags and the environment.
///
/// `None` and empty strings both mean "not set".
#[derive(Debug, Clone, Default)]
pub struct RawSettings {
    pub port: Option<String>,
    pub bind_address: Option<String>,
    pub wake_mac: Option<String>,
    pub wake_broadcast: Option<String>,
    pub wake_port: Option<String>,
    pub sleep_host: Option<String>,
    pub ssh_port: Option<String>,
    pub ssh_user: Option<String>,
    pub ssh_pass: Option<String>,
    pub sleep_command: Option<String>,
    pub static_dir: Option<PathBuf>,
}

impl RawSettings {
    /// Applies defaults and validates every field.
    ///
    /// Checks run in a fixed order so the first reported error is
    /// deterministic: `WAKE_MAC`, `SLEEP_HOST`, `PORT`, `WAKE_PORT`,
    /// `SSH_PORT`, `SSH_PASS`, `BIND_ADDRESS`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] encountered.
    pub fn validate(self) -> Result<ServerConfig, ConfigError> {
        let wake_mac = required("WAKE_MAC", self.wake_mac)?;
        let sleep_host = required("SLEEP_HOST", self.sleep_host)?;
        let port = port_or_default("PORT", self.port, DEFAULT_PORT)?;
        let wake_port = port_or_default("WAKE_PORT", self.wake_port, DEFAULT_WAKE_PORT)?;
        let ssh_port = port_or_default("SSH_PORT", self.ssh_port, DEFAULT_SSH_PORT)?;
        let ssh_pass = required("SSH_PASS", self.ssh_pass)?;

        let bind_raw = or_default(self.bind_address, DEFAULT_BIND_ADDRESS);
        let bind_ip: IpAddr = bind_raw
            .parse()
            .map_err(|_| ConfigError::InvalidBindAddress(bind_raw.clone()))?;

        let static_dir = self
            .static_dir
            .filter(|dir| !dir.as_os_str().is_empty());

        Ok(ServerConfig {
            listen_addr: SocketAddr::new(bind_ip, port),
            wake: WakeTarget {
                mac: wake_mac,
                broadcast: or_default(self.wake_broadcast, DEFAULT_WAKE_BROADCAST),
                port: wake_port,
            },
            ssh: SshTarget {
                host: sleep_host,
                port: ssh_port,
                user: or_default(self.ssh_user, DEFAULT_SSH_USER),
                password: Secret::new(ssh_pass),
            },
            // The command is passed to the remote shell verbatim; only an
            // entirely blank value falls back to the default.
            sleep_command: match self.sleep_command {
                Some(cmd) if !cmd.trim().is_empty() => cmd,
                _ => DEFAULT_SLEEP_COMMAND.to_string(),
            },
            static_dir,
        })
    }
}

/// Trims `value` and maps an empty result to `None`.
fn present(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn required(name: &'static str, value: Option<String>) -> Result<String, ConfigError> {
    present(value).ok_or(ConfigError::Missing(name))
}

fn or_default(value: Option<String>, default: &str) -> String {
    present(value).unwrap_or_else(|| default.to_string())
}

/// Parses a port, rejecting zero, negatives, and anything above 65535.
fn port_or_default(
    name: &'static str,
    value: Option<String>,
    default: u16,
) -> Result<u16, ConfigError> {
    let Some(raw) = present(value) else {
        return Ok(default);
    };
    raw.parse::<u16>()
        .ok()
        .filter(|&p| p != 0)
        .ok_or(ConfigError::InvalidPort { name, value: raw })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
