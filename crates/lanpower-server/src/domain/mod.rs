//! Domain layer for lanpower-server.
//!
//! Pure types with no dependencies on sockets, subprocesses, or the async
//! runtime.
//!
//! # What belongs in the domain layer?
//!
//! - The validated configuration and the rules that validate it
//! - The JSON bodies returned by the HTTP API
//!
//! # What does NOT belong here?
//!
//! - Reading environment variables or files (done in `main.rs`)
//! - Anything that could block or fail due to external state

pub mod config;
pub mod responses;

pub use config::{ConfigError, RawSettings, Secret, ServerConfig, SshTarget, WakeTarget};
pub use responses::{ActionResponse, StatusResponse};
