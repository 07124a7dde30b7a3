//! Wake-on-LAN module containing the MAC address type and the packet builder.

pub mod mac;
pub mod packet;

pub use mac::{AddressError, MacAddress};
pub use packet::{MagicPacket, MAGIC_PACKET_LEN};
