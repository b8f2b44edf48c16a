//! Claim verification
//!
//! Rebuilds the message a claimant signed with their Ethereum key and derives
//! the signer's address from the signature alone. The derived address is the
//! only thing used to look up a pending balance.

use serde::{Deserialize, Serialize};

use crate::codec::{CodecError, EthereumAddress};
use crate::crypto::{self, CryptoError, SIGNATURE_LEN, UNCOMPRESSED_POINT_LEN};
use crate::types::AccountName;

/// Prefix of the Ethereum personal-message signing convention
const SIGNED_MESSAGE_TAG: &str = "\x19Ethereum Signed Message:\n";

/// Replay anchor of the transaction carrying a claim
///
/// Binds a signature to a recent block so it cannot be replayed much later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaposAnchor {
    pub ref_block_num: u32,
    pub ref_block_prefix: u32,
}

impl TaposAnchor {
    pub fn new(ref_block_num: u32, ref_block_prefix: u32) -> Self {
        Self {
            ref_block_num,
            ref_block_prefix,
        }
    }

    /// Derive the anchor from a 32-byte hex block id
    ///
    /// `ref_block_num` is the low 16 bits of the big-endian block number in
    /// bytes 0..4, `ref_block_prefix` the little-endian u32 in bytes 8..12.
    pub fn from_block_id(block_id: &str) -> Result<Self, CodecError> {
        let bytes = hex::decode(block_id)
            .map_err(|e| CodecError::InvalidBlockId(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CodecError::InvalidBlockId(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }

        let block_num = u32::from_be_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let ref_block_prefix = u32::from_le_bytes([bytes[8], bytes[9], bytes[10], bytes[11]]);

        Ok(Self::new(block_num & 0xffff, ref_block_prefix))
    }
}

/// Message a claimant signs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClaimMessage<'a> {
    pub anchor: TaposAnchor,
    pub public_key: &'a str,
    pub account: &'a AccountName,
}

impl<'a> ClaimMessage<'a> {
    pub fn new(anchor: TaposAnchor, public_key: &'a str, account: &'a AccountName) -> Self {
        Self {
            anchor,
            public_key,
            account,
        }
    }

    /// `"<block num>,<block prefix>,<public key>,<account>"`
    pub fn inner_text(&self) -> String {
        format!(
            "{},{},{},{}",
            self.anchor.ref_block_num, self.anchor.ref_block_prefix, self.public_key, self.account
        )
    }

    /// Inner text wrapped in the personal-message envelope
    pub fn wrapped(&self) -> String {
        let inner = self.inner_text();
        format!("{}{}{}", SIGNED_MESSAGE_TAG, inner.len(), inner)
    }

    pub fn digest(&self) -> [u8; 32] {
        crypto::keccak256(self.wrapped().as_bytes())
    }
}

/// Identity recovered from a claim signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecoveredIdentity {
    pub compressed_public_key: [u8; 33],
    pub decompressed_public_key: [u8; UNCOMPRESSED_POINT_LEN],
    pub ethereum_address: EthereumAddress,
}

/// Ethereum address of a raw 64-byte public key
pub fn address_from_point(point: &[u8; UNCOMPRESSED_POINT_LEN]) -> EthereumAddress {
    EthereumAddress::from_digest(&crypto::keccak256(point))
}

/// Recover the signer of `message` and derive their Ethereum address
pub fn recover_identity(
    message: &ClaimMessage<'_>,
    signature: &[u8; SIGNATURE_LEN],
) -> Result<RecoveredIdentity, CryptoError> {
    let digest = message.digest();
    let compressed_public_key = crypto::recover_compressed_key(&digest, signature)?;
    let decompressed_public_key = crypto::decompress_point(&compressed_public_key)?;
    let ethereum_address = address_from_point(&decompressed_public_key);

    log::debug!(
        "Recovered signer {} for message {:?}",
        ethereum_address,
        message.inner_text()
    );

    Ok(RecoveredIdentity {
        compressed_public_key,
        decompressed_public_key,
        ethereum_address,
    })
}
