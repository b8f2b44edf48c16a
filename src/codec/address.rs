//! Ethereum address parsing and normalization

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::CodecError;

/// Raw address length
pub const ETHEREUM_ADDRESS_LEN: usize = 20;

/// Text length of a `0x`-prefixed address
pub const ETHEREUM_ADDRESS_TEXT_LEN: usize = 2 + 2 * ETHEREUM_ADDRESS_LEN;

/// 20-byte Ethereum address
///
/// Displays as lower-case `0x` + 40 hex digits, the normalized form used as
/// the registry key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct EthereumAddress([u8; ETHEREUM_ADDRESS_LEN]);

impl EthereumAddress {
    pub fn from_bytes(bytes: [u8; ETHEREUM_ADDRESS_LEN]) -> Self {
        Self(bytes)
    }

    /// Low 20 bytes of a keccak-256 digest
    pub fn from_digest(digest: &[u8; 32]) -> Self {
        let mut bytes = [0u8; ETHEREUM_ADDRESS_LEN];
        bytes.copy_from_slice(&digest[32 - ETHEREUM_ADDRESS_LEN..]);
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; ETHEREUM_ADDRESS_LEN] {
        &self.0
    }
}

impl fmt::Display for EthereumAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.0))
    }
}

impl FromStr for EthereumAddress {
    type Err = CodecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_hex_address(s)
    }
}

impl TryFrom<String> for EthereumAddress {
    type Error = CodecError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        parse_hex_address(&value)
    }
}

impl From<EthereumAddress> for String {
    fn from(address: EthereumAddress) -> Self {
        address.to_string()
    }
}

/// Parse `0x` + 40 hex digits (either case) into an address
///
/// # Example
///
/// ```
/// use unregd::codec::parse_hex_address;
///
/// let address = parse_hex_address("0x00000000000000000000000000000000000000FF").unwrap();
/// assert_eq!(address.as_bytes()[19], 0xff);
/// ```
pub fn parse_hex_address(text: &str) -> Result<EthereumAddress, CodecError> {
    let digits = text
        .strip_prefix("0x")
        .ok_or_else(|| CodecError::MissingHexPrefix(text.to_string()))?;

    let mut bytes = [0u8; ETHEREUM_ADDRESS_LEN];
    let chars: Vec<char> = digits.chars().collect();
    if chars.len() != 2 * ETHEREUM_ADDRESS_LEN {
        return Err(CodecError::InvalidAddressLength(chars.len()));
    }

    for (byte, pair) in bytes.iter_mut().zip(chars.chunks(2)) {
        *byte = (hex_value(pair[0])? << 4) | hex_value(pair[1])?;
    }

    Ok(EthereumAddress(bytes))
}

fn hex_value(ch: char) -> Result<u8, CodecError> {
    ch.to_digit(16)
        .map(|d| d as u8)
        .ok_or(CodecError::InvalidHexCharacter(ch))
}
