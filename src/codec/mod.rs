//! Text codecs for claim inputs
//!
//! Base58 decoding, public key strings and `0x` Ethereum addresses.

pub mod address;
pub mod base58;
pub mod public_key;

pub use address::{
    parse_hex_address, EthereumAddress, ETHEREUM_ADDRESS_LEN, ETHEREUM_ADDRESS_TEXT_LEN,
};
pub use base58::decode_base58;
pub use public_key::{parse_public_key, KeyType, PublicKey, PUBLIC_KEY_LEN};

/// Codec errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CodecError {
    #[error("Invalid base-58 character: {0:?}")]
    InvalidBase58Character(char),

    #[error("Base-58 value is out of range for {0} bytes")]
    Base58OutOfRange(usize),

    #[error("Unrecognized public key format: {0}")]
    UnrecognizedPublicKeyFormat(String),

    #[error("Ethereum address must start with 0x: {0}")]
    MissingHexPrefix(String),

    #[error("Ethereum address must have 40 hex digits, got {0}")]
    InvalidAddressLength(usize),

    #[error("Invalid hex character: {0:?}")]
    InvalidHexCharacter(char),

    #[error("Invalid block id: {0}")]
    InvalidBlockId(String),
}
