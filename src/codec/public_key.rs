//! Public key string parsing
//!
//! Two textual formats are accepted:
//! - legacy `EOS` + base58(33-byte point || 4-byte checksum) -> K1 key
//! - `PUB_R1_` + base58(33-byte point || 4-byte checksum) -> R1 key
//!
//! The trailing checksum is decoded but not verified.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::base58::decode_base58;
use super::CodecError;

/// Compressed curve point length
pub const PUBLIC_KEY_LEN: usize = 33;

const CHECKSUM_LEN: usize = 4;
const ENCODED_KEY_LEN: usize = PUBLIC_KEY_LEN + CHECKSUM_LEN;

const LEGACY_PREFIX: &str = "EOS";
const R1_PREFIX: &str = "PUB_R1_";

/// Curve of a public key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyType {
    /// secp256k1
    K1 = 0,
    /// secp256r1
    R1 = 1,
}

impl KeyType {
    pub fn as_str(&self) -> &'static str {
        match self {
            KeyType::K1 => "k1",
            KeyType::R1 => "r1",
        }
    }
}

/// Parsed public key: curve type and compressed point
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey {
    pub key_type: KeyType,
    pub data: [u8; PUBLIC_KEY_LEN],
}

impl PublicKey {
    /// `"<type>:<hex point>"`, the form the local ledger stores in authorities
    pub fn to_storage_string(&self) -> String {
        format!("{}:{}", self.key_type.as_str(), hex::encode(self.data))
    }
}

impl TryFrom<String> for PublicKey {
    type Error = CodecError;

    /// Parse the `"<type>:<hex point>"` storage form
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let malformed = || CodecError::UnrecognizedPublicKeyFormat(value.clone());

        let (key_type, point) = value.split_once(':').ok_or_else(malformed)?;
        let key_type = match key_type {
            "k1" => KeyType::K1,
            "r1" => KeyType::R1,
            _ => return Err(malformed()),
        };

        let bytes = hex::decode(point).map_err(|_| malformed())?;
        let data: [u8; PUBLIC_KEY_LEN] = bytes.try_into().map_err(|_| malformed())?;

        Ok(PublicKey { key_type, data })
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_storage_string()
    }
}

impl fmt::Display for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_storage_string())
    }
}

/// Parse a public key string into its type and 33-byte point
///
/// # Errors
///
/// `UnrecognizedPublicKeyFormat` for unknown prefixes, base58 errors for a
/// malformed body.
pub fn parse_public_key(text: &str) -> Result<PublicKey, CodecError> {
    if let Some(body) = text.strip_prefix(LEGACY_PREFIX) {
        decode_key(body, KeyType::K1)
    } else if let Some(body) = text.strip_prefix(R1_PREFIX) {
        decode_key(body, KeyType::R1)
    } else {
        Err(CodecError::UnrecognizedPublicKeyFormat(text.to_string()))
    }
}

fn decode_key(body: &str, key_type: KeyType) -> Result<PublicKey, CodecError> {
    let whole = decode_base58::<ENCODED_KEY_LEN>(body)?;

    let mut data = [0u8; PUBLIC_KEY_LEN];
    data.copy_from_slice(&whole[..PUBLIC_KEY_LEN]);

    Ok(PublicKey { key_type, data })
}
