//! # lanpower-core
//!
//! Shared library for lanpower containing the Wake-on-LAN packet builder and
//! the platform mapping used by the liveness probe.
//!
//! This crate has zero dependencies on sockets, subprocesses, or async
//! runtimes.  Everything here is a pure function over bytes and strings, so it
//! can be tested on any platform without network access.
//!
//! # What is Wake-on-LAN? (for beginners)
//!
//! Many network cards keep listening while the computer is asleep or powered
//! off.  If they see a *magic packet* addressed to their own hardware (MAC)
//! address, they signal the motherboard to power on.  A magic packet is just
//! 102 bytes: six `0xFF` bytes followed by the target MAC repeated 16 times.
//! It is normally sent as a UDP broadcast so it reaches the sleeping machine
//! without needing its IP address.
//!
//! # Modules
//!
//! - **`wol`** – MAC address parsing and magic packet construction.
//! - **`probe`** – Maps the current platform to the `ping` arguments used for
//!   a one-shot reachability check.

pub mod probe;
pub mod wol;

// Re-export the most-used types at the crate root so callers can write
// `lanpower_core::MagicPacket` instead of `lanpower_core::wol::packet::MagicPacket`.
pub use probe::{ping_args, Platform, PING_PROGRAM};
pub use wol::mac::{AddressError, MacAddress};
pub use wol::packet::{MagicPacket, MAGIC_PACKET_LEN};
