//! Infrastructure layer for lanpower-server.
//!
//! Everything that touches the network, the filesystem, or a subprocess.
//!
//! # Responsibilities
//!
//! - Serving the JSON API and the optional static frontend ([`http`])
//! - Broadcasting the magic packet over UDP ([`udp`])
//! - Running the sleep command over SSH ([`ssh`])
//! - Launching `ping` for the status probe ([`process`])
//! - Recording doubles of all three ports for tests ([`mock`])
//!
//! # What does NOT belong here?
//!
//! - Deciding whether an exit status means success (application layer)
//! - Validating configuration values (domain layer)

pub mod http;
pub mod mock;
pub mod process;
pub mod ssh;
pub mod udp;

pub use http::{build_router, run_server, verify_static_dir};
pub use process::SystemProcessRunner;
pub use ssh::RusshCommandRunner;
pub use udp::UdpWakeTransmitter;
