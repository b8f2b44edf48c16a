//! CLI command implementations

pub mod claim;
pub mod client;
pub mod config;
pub mod ledger;
pub mod registry;

use crate::cli::args::AnchorArgs;
use crate::codec::CodecError;
use crate::config::GlobalConfig;
use crate::types::{AccountName, AssetError};
use crate::verifier::TaposAnchor;

#[derive(Debug, thiserror::Error)]
pub enum AnchorArgsError {
    #[error("Provide --block-id, or both --ref-block-num and --ref-block-prefix")]
    Missing,

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Build the reference block anchor from `--block-id` or num + prefix
pub fn resolve_anchor(args: &AnchorArgs) -> Result<TaposAnchor, AnchorArgsError> {
    if let Some(block_id) = &args.block_id {
        return Ok(TaposAnchor::from_block_id(block_id)?);
    }
    match (args.ref_block_num, args.ref_block_prefix) {
        (Some(num), Some(prefix)) => Ok(TaposAnchor::new(num, prefix)),
        _ => Err(AnchorArgsError::Missing),
    }
}

/// Parse `--actor`, falling back to the contract account
///
/// The local CLI holds the contract's authority, so an omitted actor passes
/// the admin check. An explicit actor is checked like any other.
pub fn resolve_actor(actor: Option<String>, config: &GlobalConfig) -> Result<AccountName, AssetError> {
    match actor {
        Some(name) => name.parse(),
        None => {
            log::debug!("No --actor given, acting as {}", config.contract.account);
            Ok(config.contract.account.clone())
        }
    }
}
