//! lanpower-server library crate.
//!
//! This crate provides a small HTTP control surface for one machine on the
//! local network: wake it with a Wake-on-LAN magic packet, put it to sleep by
//! running a command over SSH, and ask whether it currently answers ping.
//!
//! # Architecture (clean architecture)
//!
//! ```text
//! Browser / curl (JSON over HTTP)
//!         ↕
//! [lanpower-server]
//!   ├── domain/           Pure types: ServerConfig, JSON response bodies
//!   ├── application/      Use cases and the I/O ports they call through
//!   └── infrastructure/
//!         ├── http/       axum router and listener
//!         ├── udp/        broadcast socket for the magic packet
//!         ├── ssh/        russh session running the sleep command
//!         └── process/    `ping` subprocess launcher
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O and no async code.
//! - `application` depends on `domain` and `lanpower-core`, and talks to the
//!   outside world only through the traits in [`application::ports`].
//! - `infrastructure` implements those traits with `tokio`, `russh` and `axum`.

/// Domain layer: configuration and wire types (no I/O).
pub mod domain;

/// Application layer: wake / sleep / status use cases.
pub mod application;

/// Infrastructure layer: HTTP server and protocol adapters.
pub mod infrastructure;
