//! Claim command

use crate::cli::args::AnchorArgs;
use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::error::ContractError;
use crate::manager::{ClaimManager, ManagerError};
use crate::provisioner::ClaimRequest;

use super::{resolve_anchor, AnchorArgsError};

#[derive(Debug, thiserror::Error)]
pub enum ClaimCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("Claim rejected: {0}")]
    Contract(#[from] ContractError),

    #[error("Invalid anchor: {0}")]
    Anchor(#[from] AnchorArgsError),

    #[error("Signature is not valid hex: {0}")]
    SignatureHex(#[from] hex::FromHexError),
}

/// Submit a signed claim
pub fn claim(
    signature: String,
    account: String,
    public_key: String,
    anchor: AnchorArgs,
    overrides: ConfigOverrides,
) -> Result<(), ClaimCommandError> {
    let config = load_config(None, overrides)?;
    let anchor = resolve_anchor(&anchor)?;
    let signature = hex::decode(signature.strip_prefix("0x").unwrap_or(&signature))?;

    let request = ClaimRequest {
        signature,
        account,
        public_key,
    };

    let mut manager = ClaimManager::open(config)?;
    let receipt = manager.claim(anchor, &request)?;

    println!("✓ Account '{}' created", receipt.account);
    println!();
    println!("  Ethereum address: {}", receipt.ethereum_address);
    println!("  Claimed balance:  {}", receipt.balance);
    println!("  NET stake:        {}", receipt.stake_net);
    println!("  CPU stake:        {}", receipt.stake_cpu);
    println!("  Liquid:           {}", receipt.liquid);
    println!("  RAM:              {} bytes for {}", receipt.ram_bytes, receipt.ram_price);

    Ok(())
}
