//! Claimant-side helpers
//!
//! What a balance holder runs with their Ethereum secret key: find the
//! address their snapshot balance sits under and sign a claim for it.

use secp256k1::SecretKey;

use crate::codec::EthereumAddress;
use crate::crypto::{self, SIGNATURE_LEN};
use crate::types::AccountName;
use crate::verifier::{address_from_point, ClaimMessage, TaposAnchor};

/// Ethereum address controlled by `secret_key`
pub fn eth_address_from_secret(secret_key: &SecretKey) -> EthereumAddress {
    address_from_point(&crypto::public_point(secret_key))
}

/// Sign a claim for `account`, to be controlled by `public_key`
///
/// The signature only verifies inside a transaction carrying the same
/// `anchor`, and only for the exact public key string given here.
pub fn sign_claim(
    secret_key: &SecretKey,
    anchor: TaposAnchor,
    public_key: &str,
    account: &AccountName,
) -> [u8; SIGNATURE_LEN] {
    let message = ClaimMessage::new(anchor, public_key, account);
    log::debug!("Signing claim message {:?}", message.inner_text());
    crypto::sign_digest(secret_key, &message.digest())
}
