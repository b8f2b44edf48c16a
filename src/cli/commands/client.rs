//! Claimant-side commands: address lookup and claim signing
//!
//! These never touch the contract database.

use crate::cli::args::AnchorArgs;
use crate::client::{eth_address_from_secret, sign_claim};
use crate::crypto::{parse_secret_key, CryptoError};
use crate::error::FormatError;
use crate::provisioner::validate_claim_account;

use super::{resolve_anchor, AnchorArgsError};

#[derive(Debug, thiserror::Error)]
pub enum ClientCommandError {
    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Invalid anchor: {0}")]
    Anchor(#[from] AnchorArgsError),

    #[error("Format error: {0}")]
    Format(#[from] FormatError),
}

/// Print the Ethereum address of a secret key
pub fn eth_address(secret_key: String) -> Result<(), ClientCommandError> {
    let secret_key = parse_secret_key(&secret_key)?;
    println!("{}", eth_address_from_secret(&secret_key));
    Ok(())
}

/// Print a hex claim signature
pub fn sign(
    secret_key: String,
    account: String,
    public_key: String,
    anchor: AnchorArgs,
) -> Result<(), ClientCommandError> {
    let secret_key = parse_secret_key(&secret_key)?;
    let account = validate_claim_account(&account)?;
    let anchor = resolve_anchor(&anchor)?;

    let signature = sign_claim(&secret_key, anchor, &public_key, &account);

    println!("✓ Claim signed");
    println!("  Signer:    {}", eth_address_from_secret(&secret_key));
    println!("  Anchor:    {},{}", anchor.ref_block_num, anchor.ref_block_prefix);
    println!("  Signature: {}", hex::encode(signature));

    Ok(())
}
