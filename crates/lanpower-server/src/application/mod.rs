//! Application layer for lanpower-server.
//!
//! The application layer knows *what* each API call does; it delegates *how*
//! to the infrastructure adapters behind the traits in [`ports`].
//!
//! # Responsibilities
//!
//! - Parsing the configured MAC and building the magic packet before any I/O
//! - Judging the remote command's exit status
//! - Reducing the ping result to a boolean
//! - Defining [`PowerError`], the error returned to the HTTP façade
//!
//! # What does NOT belong here?
//!
//! - Opening sockets, SSH sessions, or subprocesses (infrastructure)
//! - HTTP status codes and JSON framing (infrastructure::http)

pub mod liveness;
pub mod ports;
pub mod power_service;

pub use liveness::LivenessProber;
pub use ports::{
    CommandOutput, ProcessRunner, RemoteCommandRunner, SessionError, TransmitError,
    WakeTransmitter,
};
pub use power_service::{PowerError, PowerService};
