//! Magic packet construction.
//!
//! Wire format:
//! ```text
//! [0xFF × 6][MAC × 16]
//! ```
//! Total size: 102 bytes.  There is no header, checksum, or password field;
//! the network card only looks for the sync stream followed by its own address.

use crate::wol::mac::{AddressError, MacAddress};

/// Length of the leading `0xFF` synchronisation stream.
pub const SYNC_LEN: usize = 6;

/// Number of times the target MAC is repeated after the sync stream.
pub const MAC_REPETITIONS: usize = 16;

/// Total size of a magic packet in bytes.
pub const MAGIC_PACKET_LEN: usize = SYNC_LEN + MAC_REPETITIONS * 6;

/// An immutable, fully built Wake-on-LAN payload.
///
/// # Examples
///
/// ```rust
/// use lanpower_core::{MagicPacket, MAGIC_PACKET_LEN};
///
/// let packet = MagicPacket::from_mac_str("01:23:45:67:89:ab").unwrap();
/// assert_eq!(packet.as_bytes().len(), MAGIC_PACKET_LEN);
/// assert_eq!(&packet.as_bytes()[..6], &[0xFF; 6]);
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct MagicPacket {
    target: MacAddress,
    bytes: [u8; MAGIC_PACKET_LEN],
}

impl MagicPacket {
    /// Builds the packet for `target`.
    pub fn new(target: MacAddress) -> Self {
        let mut bytes = [0xFFu8; MAGIC_PACKET_LEN];
        let octets = target.octets();
        for chunk in bytes[SYNC_LEN..].chunks_exact_mut(6) {
            chunk.copy_from_slice(&octets);
        }
        Self { target, bytes }
    }

    /// Parses `mac` and builds the packet in one step.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidAddress`] if `mac` does not contain
    /// exactly 12 hexadecimal digits.
    pub fn from_mac_str(mac: &str) -> Result<Self, AddressError> {
        MacAddress::parse(mac).map(Self::new)
    }

    /// The hardware address this packet wakes.
    pub fn target(&self) -> MacAddress {
        self.target
    }

    /// The raw 102-byte payload, ready to be sent in a single datagram.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl AsRef<[u8]> for MagicPacket {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl std::fmt::Debug for MagicPacket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The payload is fully determined by the target; printing 102 bytes is noise.
        f.debug_struct("MagicPacket")
            .field("target", &self.target)
            .field("len", &MAGIC_PACKET_LEN)
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
