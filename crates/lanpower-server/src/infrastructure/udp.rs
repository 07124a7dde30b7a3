//! UDP broadcast adapter for the Wake-on-LAN packet.
//!
//! # How the packet reaches a sleeping machine (for beginners)
//!
//! A powered-down machine has no IP stack running, so it cannot receive a
//! unicast datagram addressed to it.  Its network card *can* still see every
//! frame on the wire, and broadcasts are delivered to every port on the LAN
//! segment.  Sending the magic packet to the broadcast address (by default
//! `255.255.255.255`) therefore guarantees the card sees it; the destination
//! port is irrelevant to the card, and 9 ("discard") is the convention.
//!
//! The socket is bound to an ephemeral port for the duration of one call and
//! dropped on every exit path.  Sockets refuse to send to a broadcast address
//! unless `SO_BROADCAST` is set, hence [`UdpSocket::set_broadcast`].

use std::net::SocketAddr;

use async_trait::async_trait;
use lanpower_core::MagicPacket;
use tokio::net::UdpSocket;

use crate::application::ports::{TransmitError, WakeTransmitter};

/// Sends each magic packet from a fresh, ephemeral IPv4 UDP socket.
#[derive(Debug, Clone)]
pub struct UdpWakeTransmitter {
    bind_addr: SocketAddr,
}

impl UdpWakeTransmitter {
    /// Binds to `0.0.0.0:0` (any interface, OS-chosen port).
    pub fn new() -> Self {
        Self::with_bind_addr(SocketAddr::from(([0, 0, 0, 0], 0)))
    }

    /// Binds to a specific local address, e.g. to pick the outgoing interface.
    pub fn with_bind_addr(bind_addr: SocketAddr) -> Self {
        Self { bind_addr }
    }
}

impl Default for UdpWakeTransmitter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl WakeTransmitter for UdpWakeTransmitter {
    async fn send(
        &self,
        packet: &MagicPacket,
        broadcast: &str,
        port: u16,
    ) -> Result<(), TransmitError> {
        let socket = UdpSocket::bind(self.bind_addr)
            .await
            .map_err(TransmitError::Bind)?;
        socket
            .set_broadcast(true)
            .map_err(TransmitError::Broadcast)?;

        let payload = packet.as_bytes();
        let sent = socket
            .send_to(payload, (broadcast, port))
            .await
            .map_err(|source| TransmitError::Send {
                dest: format!("{broadcast}:{port}"),
                source,
            })?;

        if sent != payload.len() {
            return Err(TransmitError::ShortSend {
                sent,
                expected: payload.len(),
            });
        }
        Ok(())
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
