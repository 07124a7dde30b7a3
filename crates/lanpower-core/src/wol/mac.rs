//! MAC (hardware) address parsing.
//!
//! Users type MAC addresses in many shapes: `AA:BB:CC:DD:EE:FF`,
//! `aa-bb-cc-dd-ee-ff`, `aabb.ccdd.eeff`, or just `AABBCCDDEEFF`.  Rather than
//! recognising each notation, the parser keeps only the hexadecimal digits and
//! requires exactly twelve of them to remain.  Any other character is treated
//! as a separator and discarded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Number of hexadecimal digits in a MAC address once separators are removed.
pub const MAC_HEX_DIGITS: usize = 12;

/// Errors that can occur while parsing a MAC address.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    /// After stripping separators the input did not contain exactly 12 hex digits.
    #[error("invalid MAC address: expected 12 hex digits, found {hex_digits}")]
    InvalidAddress { hex_digits: usize },
}

/// A 6-byte hardware address.
///
/// Displayed as lowercase colon-separated pairs, e.g. `aa:bb:cc:dd:ee:ff`.
///
/// # Examples
///
/// ```rust
/// use lanpower_core::MacAddress;
///
/// let mac: MacAddress = "AA-BB-CC-DD-EE-FF".parse().unwrap();
/// assert_eq!(mac.octets(), [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF]);
/// assert_eq!(mac.to_string(), "aa:bb:cc:dd:ee:ff");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MacAddress([u8; 6]);

impl MacAddress {
    /// Wraps six raw octets.
    pub const fn new(octets: [u8; 6]) -> Self {
        Self(octets)
    }

    /// Parses a MAC address, ignoring every non-hexadecimal character.
    ///
    /// # Errors
    ///
    /// Returns [`AddressError::InvalidAddress`] if the number of hexadecimal
    /// digits left after stripping separators is not exactly 12.
    pub fn parse(input: &str) -> Result<Self, AddressError> {
        let digits: Vec<u8> = input
            .chars()
            .filter_map(|c| c.to_digit(16))
            .map(|d| d as u8)
            .collect();

        if digits.len() != MAC_HEX_DIGITS {
            return Err(AddressError::InvalidAddress {
                hex_digits: digits.len(),
            });
        }

        let mut octets = [0u8; 6];
        for (octet, pair) in octets.iter_mut().zip(digits.chunks_exact(2)) {
            *octet = (pair[0] << 4) | pair[1];
        }
        Ok(Self(octets))
    }

    /// Returns the six address bytes in transmission order.
    pub const fn octets(&self) -> [u8; 6] {
        self.0
    }
}

impl FromStr for MacAddress {
    type Err = AddressError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MacAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02x}:{b:02x}:{c:02x}:{d:02x}:{e:02x}:{g:02x}")
    }
}

impl From<[u8; 6]> for MacAddress {
    fn from(octets: [u8; 6]) -> Self {
        Self(octets)
    }
}

// Serialized as the display string so JSON payloads stay human readable.
impl Serialize for MacAddress {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for MacAddress {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
